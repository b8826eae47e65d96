use crate::aggregate::compute_overall_gpa;
use crate::api::GradeSource;
use crate::export;
use crate::models::GradeReport;
use crate::settings::SettingsStore;
use crate::ui::render::render_ui;
use crate::ui::state::{course_entries, AppState, CourseDetail};
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use tracing::{error, info, warn};

pub struct App {
    source: GradeSource,
    settings: SettingsStore,
    user_id: i64,
    export_dir: PathBuf,
    state: AppState,
    reload_requested: bool,
}

impl App {
    pub fn new(source: GradeSource, settings: SettingsStore, user_id: i64, export_dir: PathBuf) -> Self {
        Self {
            source,
            settings,
            user_id,
            export_dir,
            state: AppState::Loading {
                message: format!("Loading grades for {}...", user_id),
            },
            reload_requested: true,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        loop {
            terminal.draw(|f| render_ui(f, &self.state, self.settings.settings()))?;

            // Fetch after the loading screen is on screen
            if self.reload_requested {
                self.reload_requested = false;
                self.load_grades().await;
                continue;
            }

            if event::poll(std::time::Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && self.handle_key_event(key).await {
                        break;
                    }
                }
            }

            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        Ok(())
    }

    async fn load_grades(&mut self) {
        match self.source.get_grades(self.user_id).await {
            Ok(records) => {
                let report = GradeReport::from_records(&records);
                info!(
                    user_id = self.user_id,
                    records = records.len(),
                    courses = report.course_count,
                    "grade report ready"
                );
                self.state = AppState::Overview {
                    report,
                    selected_index: 0,
                    status: None,
                };
            }
            Err(e) => {
                error!(user_id = self.user_id, error = %format!("{:#}", e), "failed to load grades");
                self.state = AppState::Error {
                    message: format!("Failed to load grades from {}: {:#}", self.source.describe(), e),
                };
            }
        }
    }

    fn request_reload(&mut self) {
        self.state = AppState::Loading {
            message: format!("Loading grades for {}...", self.user_id),
        };
        self.reload_requested = true;
    }

    /// Returns `true` when the user asked to quit.
    async fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('t') {
            if let Err(e) = self.settings.toggle_dark_mode() {
                warn!(error = %format!("{:#}", e), "could not save theme");
                self.set_status(format!("Could not save theme: {:#}", e));
            }
            return false;
        }

        let current_state = std::mem::replace(
            &mut self.state,
            AppState::Loading {
                message: String::new(),
            },
        );

        match current_state {
            AppState::Overview {
                report,
                mut selected_index,
                status,
            } => match key.code {
                KeyCode::Char('q') => return true,
                KeyCode::Char('r') => self.request_reload(),
                KeyCode::Up => {
                    selected_index = selected_index.saturating_sub(1);
                    self.state = AppState::Overview {
                        report,
                        selected_index,
                        status: None,
                    };
                }
                KeyCode::Down => {
                    if selected_index < report.course_count.saturating_sub(1) {
                        selected_index += 1;
                    }
                    self.state = AppState::Overview {
                        report,
                        selected_index,
                        status: None,
                    };
                }
                KeyCode::Char('e') => {
                    let status = match export::export_to_csv(&report, self.user_id, &self.export_dir) {
                        Ok(path) => format!("Exported to {}", path.display()),
                        Err(e) => format!("Export failed: {:#}", e),
                    };
                    self.state = AppState::Overview {
                        report,
                        selected_index,
                        status: Some(status),
                    };
                }
                KeyCode::Enter => {
                    self.state = self.open_course(report, selected_index).await;
                }
                _ => {
                    self.state = AppState::Overview {
                        report,
                        selected_index,
                        status,
                    };
                }
            },
            AppState::CourseDetail {
                report,
                selected_index,
                detail,
            } => match key.code {
                KeyCode::Char('q') => return true,
                KeyCode::Esc | KeyCode::Backspace => {
                    self.state = AppState::Overview {
                        report,
                        selected_index,
                        status: None,
                    };
                }
                _ => {
                    self.state = AppState::CourseDetail {
                        report,
                        selected_index,
                        detail,
                    };
                }
            },
            AppState::Error { message } => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return true,
                KeyCode::Char('r') | KeyCode::Enter => self.request_reload(),
                _ => self.state = AppState::Error { message },
            },
            state @ AppState::Loading { .. } => {
                if key.code == KeyCode::Char('q') {
                    return true;
                }
                self.state = state;
            }
        }

        false
    }

    async fn open_course(&self, report: GradeReport, selected_index: usize) -> AppState {
        let target = course_entries(&report).get(selected_index).map(|entry| {
            (
                format!("{} ({})", entry.course_key, entry.semester),
                entry.group.course_name.clone(),
                entry.group.course_id.clone(),
                entry.group.grades.clone(),
            )
        });
        let Some((course_key, course_name, course_id, group_grades)) = target else {
            return AppState::Overview {
                report,
                selected_index,
                status: None,
            };
        };

        // Courses without an id cannot be looked up, show the group as is
        let grades = match &course_id {
            Some(course_id) => self.source.get_course_grades(self.user_id, course_id).await,
            None => Ok(group_grades),
        };

        match grades {
            Ok(grades) => AppState::CourseDetail {
                report,
                selected_index,
                detail: CourseDetail {
                    course_key,
                    course_name,
                    gpa: compute_overall_gpa(&grades),
                    grades,
                },
            },
            Err(e) => AppState::Overview {
                report,
                selected_index,
                status: Some(format!("Failed to load course {}: {:#}", course_key, e)),
            },
        }
    }

    fn set_status(&mut self, message: String) {
        if let AppState::Overview { status, .. } = &mut self.state {
            *status = Some(message);
        }
    }
}
