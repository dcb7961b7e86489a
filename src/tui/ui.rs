use chrono::{Datelike, Duration};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::commands::bar_text;
use crate::deadline::{BadgeTone, ColorToken};
use crate::filters::week_bounds;
use crate::models::parse_hex_color;

use super::app::{App, InputField, InputMode, TaskItem};
use super::Mode;

pub fn ui(f: &mut Frame, app: &mut App) {
    match app.mode {
        Mode::Dashboard => dashboard(f, app),
        Mode::Tv => tv(f, app),
    }
}

fn dashboard(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Table
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    let rows: Vec<Row> = app.items.iter().map(task_row).collect();
    let widths = [
        Constraint::Length(4),
        Constraint::Min(24),
        Constraint::Length(16),
        Constraint::Length(12),
        Constraint::Length(16),
        Constraint::Length(20),
        Constraint::Length(16),
        Constraint::Length(14),
    ];

    let mut title = format!("studiocal - {} tasks", app.items.len());
    if let Some(period) = app.filter.period {
        title.push_str(&format!(" | {:?}", period));
    }
    if let Some(search) = &app.filter.search {
        title.push_str(&format!(" | \"{}\"", search));
    }
    if !app.filter.hide_completed {
        title.push_str(" | all");
    }

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["ID", "Description", "Client", "Type", "Date", "Time Left", "Progress", "Staff"])
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .bottom_margin(1),
        )
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[0], &mut app.state);

    let help_text = match (&app.status, &app.input_mode) {
        (Some(err), InputMode::Normal) => err.clone(),
        (None, InputMode::Normal) => {
            "q: Quit | a: Add | e: Desc | t: Date | D: Deadline | Space: Done | d: Del | /: Search | p: Period | c: Toggle Done | x: Clear".to_string()
        }
        (_, InputMode::Editing) => "Enter: Save | Esc: Cancel".to_string(),
        (_, InputMode::Adding) => "Enter: Next Step | Esc: Cancel".to_string(),
    };
    let help_style = if app.status.is_some() { Color::Red } else { Color::Gray };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(help_style))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[1]);

    if app.input_mode != InputMode::Normal {
        let area = centered_rect(60, 3, f.area());
        f.render_widget(Clear, area);

        let title = match app.input_mode {
            InputMode::Adding => match app.add_state.step {
                0 => "Add Task: Enter Description",
                1 => "Add Task: Enter Date (YYYY-MM-DD, empty for today)",
                _ => "Add Task: Enter Deadline (YYYY-MM-DDTHH:MM, optional)",
            },
            _ => match app.input_field {
                InputField::Description => "Edit Description",
                InputField::Date => "Edit Date (YYYY-MM-DD)",
                InputField::Deadline => "Edit Deadline (empty to clear)",
                InputField::Search => "Search",
                InputField::None => "Edit",
            },
        };
        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(input, area);
    }
}

fn task_row(item: &TaskItem) -> Row<'static> {
    let t = &item.task;
    let badge = item.view.urgency.badge();

    let mut description = vec![Span::raw(t.description.clone())];
    if let Some(badge) = badge {
        let mut style = Style::default().fg(Color::Black).add_modifier(Modifier::BOLD);
        style = match badge.tone {
            BadgeTone::Danger => style.bg(Color::Red),
            BadgeTone::Warning => style.bg(Color::Yellow),
        };
        if badge.pulse {
            style = style.add_modifier(Modifier::SLOW_BLINK);
        }
        description.push(Span::raw(" "));
        description.push(Span::styled(format!(" {} ", badge.label), style));
    }

    let date = match t.start_time {
        Some(start) => format!("{} {}", t.due_date.format("%d/%m"), start.format("%H:%M")),
        None => t.due_date.format("%d/%m").to_string(),
    };
    let left = if t.completed {
        String::new()
    } else {
        item.view.relative.clone().unwrap_or_default()
    };
    let progress = if t.deadline.is_some() {
        Cell::from(format!("{} {:>3}%", bar_text(item.view.progress.percent, 10), item.view.progress.percent))
            .style(Style::default().fg(token_color(item.view.progress.color)))
    } else {
        Cell::from("")
    };
    let kind = match &item.kind {
        Some((name, color)) => Cell::from(name.clone()).style(Style::default().fg(hex_color(color))),
        None => Cell::from(""),
    };

    let style = if t.completed {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };

    Row::new(vec![
        Cell::from(t.id.to_string()),
        Cell::from(Line::from(description)),
        Cell::from(item.client.clone().unwrap_or_default()),
        kind,
        Cell::from(date),
        Cell::from(left),
        progress,
        Cell::from(item.staff.clone().unwrap_or_default()),
    ])
    .style(style)
}

fn tv(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Percentage(45), Constraint::Min(0)])
        .split(f.area());

    let header = Paragraph::new(Line::from(vec![
        Span::styled("studiocal", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {}", app.today.format("%d/%m/%Y"))),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    week_strip(f, app, chunks[1]);
    alerts(f, app, chunks[2]);
}

fn week_strip(f: &mut Frame, app: &App, area: Rect) {
    let (monday, _) = week_bounds(app.today);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 7); 7])
        .split(area);

    for (i, column) in columns.iter().enumerate() {
        let day = monday + Duration::days(i as i64);
        let mut lines: Vec<Line> = app
            .week
            .iter()
            .filter(|item| item.task.due_date == day)
            .map(|item| {
                let time = item.task.start_time.map(|t| t.format("%H:%M ").to_string()).unwrap_or_default();
                let style = match item.view.urgency.badge().map(|b| b.tone) {
                    _ if item.task.completed => Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT),
                    Some(BadgeTone::Danger) => Style::default().fg(Color::Red),
                    Some(BadgeTone::Warning) => Style::default().fg(Color::Yellow),
                    None => Style::default(),
                };
                Line::styled(format!("{}{}", time, item.task.description), style)
            })
            .collect();
        let posts = app.week_posts.get(&day).map_or(0, Vec::len);
        if posts > 0 {
            lines.push(Line::styled(format!("{} post(s)", posts), Style::default().fg(Color::Magenta)));
        }

        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{} {}", app.locale.weekday_short(day.weekday()), day.day()));
        if day == app.today {
            block = block.border_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        }
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(block), *column);
    }
}

/// Urgent, critical and overdue tasks with a progress gauge each.
fn alerts(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Prazos");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let flagged: Vec<&TaskItem> = app.items.iter().filter(|i| i.view.urgency.badge().is_some()).collect();
    if flagged.is_empty() {
        f.render_widget(Paragraph::new("Nenhum prazo próximo.").style(Style::default().fg(Color::Green)), inner);
        return;
    }

    let max_rows = (inner.height / 2) as usize;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(2); flagged.len().min(max_rows)])
        .split(inner);

    for (item, row) in flagged.iter().zip(rows.iter()) {
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(*row);
        let label = item.view.urgency.badge().map(|b| b.label).unwrap_or_default();
        let text = format!(
            "{} [{}] {} {}",
            item.task.description,
            label,
            item.client.as_deref().unwrap_or(""),
            item.view.relative.as_deref().unwrap_or(""),
        );
        f.render_widget(Paragraph::new(text), parts[0]);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(token_color(item.view.progress.color)))
            .percent(u16::from(item.view.progress.percent));
        f.render_widget(gauge, parts[1]);
    }
}

fn token_color(token: ColorToken) -> Color {
    let (r, g, b) = token.rgb();
    Color::Rgb(r, g, b)
}

fn hex_color(hex: &str) -> Color {
    match parse_hex_color(hex) {
        Some((r, g, b)) => Color::Rgb(r, g, b),
        None => Color::Reset,
    }
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(r.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Length(r.height.saturating_sub(height) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
