use crate::aggregate::{course_gpa, semester_gpa, semesters_for_display};
use crate::models::{GradeRecord, GradeReport};
use crate::settings::ThemeSettings;
use crate::ui::state::{AppState, CourseDetail};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, List, ListItem, Paragraph, Row, Table, Wrap},
    Frame,
};

const TITLE: &str = "LMS Grade Report";

/// Colours derived from the persisted theme.
#[derive(Debug, Clone, Copy)]
struct Palette {
    border: Color,
    text: Color,
    muted: Color,
    accent: Color,
    highlight: Color,
}

impl Palette {
    fn from_theme(theme: &ThemeSettings) -> Self {
        if theme.dark_mode {
            Palette {
                border: Color::Magenta,
                text: Color::White,
                muted: Color::Gray,
                accent: Color::LightCyan,
                highlight: Color::LightYellow,
            }
        } else {
            Palette {
                border: Color::Cyan,
                text: Color::Reset,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                highlight: Color::Yellow,
            }
        }
    }

    fn block(&self, title: impl Into<String>) -> Block<'static> {
        Block::default()
            .title(title.into())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border))
    }
}

pub fn render_ui(frame: &mut Frame, state: &AppState, theme: &ThemeSettings) {
    let palette = Palette::from_theme(theme);
    match state {
        AppState::Loading { message } => render_loading(frame, &palette, message),
        AppState::Overview {
            report,
            selected_index,
            status,
        } => render_overview(frame, &palette, report, *selected_index, status.as_deref()),
        AppState::CourseDetail { detail, .. } => render_course_detail(frame, &palette, detail),
        AppState::Error { message } => render_error(frame, &palette, message),
    }
}

fn render_loading(frame: &mut Frame, palette: &Palette, message: &str) {
    let paragraph = Paragraph::new(message.to_string())
        .block(palette.block(TITLE))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, frame.area());
}

fn render_overview(
    frame: &mut Frame,
    palette: &Palette,
    report: &GradeReport,
    selected_index: usize,
    status: Option<&str>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_stat_cards(frame, palette, report, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_semester_list(frame, palette, report, selected_index, body[0]);
    render_charts(frame, palette, report, body[1]);

    let help_text = match status {
        Some(status) => status.to_string(),
        None => "[↑↓: Navigate | Enter: Course details | e: Export CSV | t: Theme | r: Reload | q: Quit]"
            .to_string(),
    };
    let help = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);

    frame.render_widget(help, chunks[2]);
}

fn render_stat_cards(frame: &mut Frame, palette: &Palette, report: &GradeReport, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let stats = [
        ("GPA", report.overall_gpa.to_string(), "Overall GPA"),
        ("Courses", report.course_count.to_string(), "Total courses with grades"),
        ("Credits", report.total_credits.to_string(), "Total credits"),
        ("Assessments", report.total_assessments.to_string(), "Total assessments"),
    ];

    for ((title, value, caption), card) in stats.into_iter().zip(cards.iter()) {
        let paragraph = Paragraph::new(vec![
            Line::from(Span::styled(
                value,
                Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(caption, Style::default().fg(palette.muted))),
        ])
        .block(palette.block(title))
        .alignment(Alignment::Center);

        frame.render_widget(paragraph, *card);
    }
}

fn render_semester_list(
    frame: &mut Frame,
    palette: &Palette,
    report: &GradeReport,
    selected_index: usize,
    area: Rect,
) {
    let mut items: Vec<ListItem> = Vec::new();
    let mut course_index = 0;

    for (semester, courses) in semesters_for_display(&report.semesters) {
        items.push(ListItem::new(Line::from(vec![
            Span::styled(
                format!("Semester: {}", semester),
                Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" • GPA: {}", semester_gpa(courses)),
                Style::default().fg(palette.accent),
            ),
        ])));

        for (course_key, group) in courses {
            let selected = course_index == selected_index;
            let style = if selected {
                Style::default().fg(palette.highlight).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.text)
            };
            let prefix = if selected { "> " } else { "  " };
            let content = format!(
                "{}{} ({}, {} credits) - GPA {}",
                prefix,
                group.course_name,
                course_key,
                group.credits,
                course_gpa(group)
            );
            items.push(ListItem::new(content).style(style));
            course_index += 1;
        }
    }

    if items.is_empty() {
        items.push(ListItem::new("No grades available").style(Style::default().fg(palette.muted)));
    }

    let list = List::new(items).block(palette.block("Semesters"));
    frame.render_widget(list, area);
}

fn render_charts(frame: &mut Frame, palette: &Palette, report: &GradeReport, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Percentage(30),
            Constraint::Percentage(25),
        ])
        .split(area);

    // Bar values are hundredths so two-decimal averages survive the u64 scale
    let ranking_bars: Vec<Bar> = report
        .ranking
        .iter()
        .map(|entry| {
            Bar::default()
                .value(to_hundredths(entry.gpa))
                .label(Line::from(entry.name.clone()))
                .text_value(format!("{:.2}", entry.gpa))
        })
        .collect();
    let ranking = BarChart::default()
        .block(palette.block("GPA by Course"))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .bar_style(Style::default().fg(palette.accent))
        .value_style(Style::default().fg(palette.highlight))
        .data(BarGroup::default().bars(&ranking_bars));
    frame.render_widget(ranking, chunks[0]);

    let breakdown_bars: Vec<Bar> = report
        .breakdown
        .iter()
        .map(|entry| {
            Bar::default()
                .value(to_hundredths(entry.average_score))
                .label(Line::from(entry.label))
                .text_value(format!("{:.2}", entry.average_score))
        })
        .collect();
    let breakdown = BarChart::default()
        .block(palette.block("Average Score by Assessment"))
        .bar_width(10)
        .bar_gap(2)
        .bar_style(Style::default().fg(palette.border))
        .value_style(Style::default().fg(palette.text).add_modifier(Modifier::BOLD))
        .data(BarGroup::default().bars(&breakdown_bars));
    frame.render_widget(breakdown, chunks[1]);

    let rows: Vec<Row> = report
        .trend
        .iter()
        .map(|point| {
            Row::new(vec![
                point.semester.clone(),
                format!("{:.2}", point.average_gpa),
                point.sample_count.to_string(),
            ])
        })
        .collect();
    let trend = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(
        Row::new(vec!["Semester", "GPA", "Graded"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(palette.block("Semester Trend"));
    frame.render_widget(trend, chunks[2]);
}

fn render_course_detail(frame: &mut Frame, palette: &Palette, detail: &CourseDetail) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let info = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Course: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(detail.course_name.clone()),
        ]),
        Line::from(vec![
            Span::styled("Course ID: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(detail.course_key.clone()),
        ]),
        Line::from(vec![
            Span::styled("Average GPA: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(detail.gpa.to_string(), Style::default().fg(palette.accent)),
        ]),
    ])
    .block(palette.block(TITLE));
    frame.render_widget(info, chunks[0]);

    let rows: Vec<Row> = detail.grades.iter().map(assessment_row).collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Min(10),
        ],
    )
    .header(
        Row::new(vec![
            "Assessment", "Semester", "Quiz", "Assign.", "Midterm", "Final", "GPA", "Status",
        ])
        .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(palette.block("Grade Details"));
    frame.render_widget(table, chunks[1]);

    let help = Paragraph::new("[Esc: Back | t: Theme | q: Quit]")
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[2]);
}

fn assessment_row(record: &GradeRecord) -> Row<'static> {
    Row::new(vec![
        record
            .assessment_id
            .map(|id| format!("#{}", id))
            .unwrap_or_else(|| "-".to_string()),
        record.semester.clone().unwrap_or_else(|| "-".to_string()),
        format_score(record.quiz_grade),
        format_score(record.assignment_grade),
        format_score(record.midterm_grade),
        format_score(record.final_grade),
        format_score(record.gpa),
        record.status.clone().unwrap_or_default(),
    ])
}

fn render_error(frame: &mut Frame, palette: &Palette, message: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(frame.area());

    let paragraph = Paragraph::new(message.to_string())
        .block(
            Block::default()
                .title("Error")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, chunks[0]);

    let help = Paragraph::new("[r/Enter: Retry | q/Esc: Quit]")
        .block(palette.block(""))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[1]);
}

fn format_score(score: Option<f64>) -> String {
    score
        .map(|s| format!("{:.2}", s))
        .unwrap_or_else(|| "-".to_string())
}

fn to_hundredths(value: f64) -> u64 {
    (value.max(0.0) * 100.0).round() as u64
}
