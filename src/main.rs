mod aggregate;
mod api;
mod config;
mod export;
mod models;
mod parser;
mod report;
mod schedule;
mod settings;
mod ui;

use anyhow::{Context, Result};
use api::{GradeSource, LmsClient, MockBackend};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use config::Config;
use models::GradeReport;
use settings::SettingsStore;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use ui::App;

/// Student served by the mock backend when no id is configured.
const MOCK_USER_ID: i64 = 2210001;

#[derive(Parser)]
#[command(name = "lms-grade-report")]
#[command(about = "Grade overview for LMS students: GPA by semester, course and assessment type", long_about = None)]
struct Cli {
    /// University id of the student (overrides LMS_USER_ID)
    #[arg(long, global = true)]
    user_id: Option<i64>,

    /// Serve grades from the built-in mock backend
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive grade dashboard (default)
    Dashboard {
        /// Directory CSV exports are written to
        #[arg(long, default_value = ".")]
        export_dir: PathBuf,
    },
    /// Print a markdown grade report
    Summary {
        /// Write the report to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Export per-course summaries to CSV
    Export {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Print the weekly timetable and the upcoming class dates
    Schedule {
        /// Number of weeks after the current one to list
        #[arg(long, default_value_t = schedule::DEFAULT_WEEKS_AHEAD)]
        weeks: u32,
        /// Start from the week containing this date (YYYY-MM-DD) instead of today
        #[arg(long)]
        from: Option<NaiveDate>,
    },
    /// Show or change the saved theme
    Theme {
        #[arg(long)]
        dark: Option<bool>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        font: Option<String>,
        /// Restore the default theme
        #[arg(long, conflicts_with_all = ["dark", "color", "font"])]
        reset: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();
    let config = Config::load().context("Failed to load configuration")?;

    // Logs go to a file so they never draw over the dashboard
    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "lms-grade-report.log");
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(non_blocking_file),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut settings = SettingsStore::load(&config.settings_path)?;

    let command = cli.command.take().unwrap_or(Commands::Dashboard {
        export_dir: PathBuf::from("."),
    });

    match command {
        Commands::Dashboard { export_dir } => {
            let (source, user_id) = grade_source(&cli, &config)?;
            let mut app = App::new(source, settings, user_id, export_dir);
            app.run().await?;
        }
        Commands::Summary { out } => {
            let (source, user_id) = grade_source(&cli, &config)?;
            let records = source.get_grades(user_id).await?;
            let report = report::build_report(user_id, &GradeReport::from_records(&records));
            match out {
                Some(path) => {
                    std::fs::write(&path, report)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Report written to {}.", path.display());
                }
                None => print!("{}", report),
            }
        }
        Commands::Export { dir } => {
            let (source, user_id) = grade_source(&cli, &config)?;
            let records = source.get_grades(user_id).await?;
            let path = export::export_to_csv(&GradeReport::from_records(&records), user_id, &dir)?;
            println!("Exported grades to {}.", path.display());
        }
        Commands::Schedule { weeks, from } => {
            let (source, user_id) = grade_source(&cli, &config)?;
            let items = source.get_schedule(user_id).await?;
            let today = from.unwrap_or_else(|| chrono::Local::now().date_naive());
            print!(
                "{}",
                report::build_schedule_report(user_id, &items, today, weeks)
            );
        }
        Commands::Theme {
            dark,
            color,
            font,
            reset,
        } => {
            if reset {
                settings.reset()?;
            }
            if let Some(dark) = dark {
                settings.set_dark_mode(dark)?;
            }
            if let Some(color) = color {
                settings.set_primary_color(&color)?;
            }
            if let Some(font) = font {
                settings.set_font_family(&font)?;
            }
            let current = settings.settings();
            println!("Theme ({}):", settings.path().display());
            println!("  dark mode:     {}", current.dark_mode);
            println!("  primary color: {}", current.primary_color);
            println!("  font family:   {}", current.font_family);
        }
    }

    Ok(())
}

/// Pick the grade source and the student whose grades are shown.
fn grade_source(cli: &Cli, config: &Config) -> Result<(GradeSource, i64)> {
    let use_mock = cli.mock || config.use_mock;
    let source = if use_mock {
        GradeSource::Mock(MockBackend::new())
    } else {
        GradeSource::Remote(LmsClient::new(&config.api_base, config.api_token.clone())?)
    };

    let user_id = match cli.user_id.or(config.user_id) {
        Some(id) => id,
        None if use_mock => MOCK_USER_ID,
        None => anyhow::bail!("No student selected: pass --user-id or set LMS_USER_ID"),
    };
    info!(user_id, source = %source.describe(), "grade source selected");

    Ok((source, user_id))
}
