// lift-log-tui/src/ui/layout.rs
use crate::{
    app::{ActiveModal, App},
    ui::{log_tab::render_log_tab, modals::render_modal, status_bar::render_status_bar},
};
use lift_log_lib::StandardColor;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &mut App) {
    let size = f.size();

    // Create main layout: day tabs on top, content below, status bar at bottom
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status Bar
        ])
        .split(size);

    render_tabs(f, app, main_chunks[0]);
    if app.view.is_empty() {
        let empty = Paragraph::new("The program has no days.").alignment(Alignment::Center);
        f.render_widget(empty, main_chunks[1]);
    } else {
        render_log_tab(f, app, main_chunks[1]);
    }
    render_status_bar(f, app, main_chunks[2]);

    // Render modal last if active
    if app.active_modal != ActiveModal::None {
        render_modal(f, app);
    }
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = app
        .view
        .days
        .iter()
        .enumerate()
        .map(|(i, day)| {
            Line::from(Span::styled(
                format!("{} ({})", day.title, i + 1),
                Style::default().fg(Color::Gray),
            ))
        })
        .collect();

    let title = app
        .service
        .program
        .program_name
        .clone()
        .unwrap_or_else(|| "Program".to_string());

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::BOTTOM).title(title))
        .select(app.selected_day)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}

/// Header color from the configured theme, green if the name is unknown.
pub fn header_color(app: &App) -> Color {
    match lift_log_lib::parse_color(&app.service.config.theme.header_color) {
        Ok(color) => to_tui_color(color),
        Err(_) => Color::Green,
    }
}

const fn to_tui_color(color: StandardColor) -> Color {
    match color {
        StandardColor::Black => Color::Black,
        StandardColor::Red => Color::LightRed,
        StandardColor::Green => Color::LightGreen,
        StandardColor::Yellow => Color::LightYellow,
        StandardColor::Blue => Color::LightBlue,
        StandardColor::Magenta => Color::LightMagenta,
        StandardColor::Cyan => Color::LightCyan,
        StandardColor::White => Color::White,
        StandardColor::DarkGrey => Color::DarkGray,
        StandardColor::DarkRed => Color::Red,
        StandardColor::DarkGreen => Color::Green,
        StandardColor::DarkYellow => Color::Yellow,
        StandardColor::DarkBlue => Color::Blue,
        StandardColor::DarkMagenta => Color::Magenta,
        StandardColor::DarkCyan => Color::Cyan,
        StandardColor::Grey => Color::Gray,
    }
}

/// Helper function to create a centered rectangle for modals
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let percent_x = percent_x.min(100);
    let percent_y = percent_y.min(100);
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
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

/// Fixed-height variant used by the form modals.
pub fn centered_rect_height(percent_x: u16, height: u16, r: Rect) -> Rect {
    let height = height.min(r.height);
    let top = (r.height - height) / 2;
    let band = Rect::new(r.x, r.y + top, r.width, height);
    centered_rect(percent_x, 100, band)
}
