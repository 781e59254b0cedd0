// lift-log-tui/src/ui/status_bar.rs
use crate::app::{ActiveModal, App, LogFocus};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

pub fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status_text = match app.active_modal {
        ActiveModal::None => match app.log_focus {
            LogFocus::ExerciseList => {
                "[Tab] Focus | [↑↓/jk] Nav | [←→/hl] Day | [a]dd entry | [r]eload | [?] Help | [q]uit "
            }
            LogFocus::EntryTable => {
                "[Tab] Focus | [↑↓/jk] Nav | [←→/hl] Day | [a]dd | [d]elete | [?] Help | [q]uit "
            }
        },
        ActiveModal::Help => " [Esc/Enter/?] Close Help ",
        ActiveModal::AddEntry { .. } => {
            " [Esc] Close | [Enter] Next/Save | [Tab] Navigate | [↑↓] Inc/Dec Number "
        }
        ActiveModal::ConfirmDelete { .. } => " [y/Enter] Delete | [n/Esc] Keep ",
    };

    let error_text = app.last_error.as_deref().unwrap_or("");

    let status_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let status_paragraph =
        Paragraph::new(status_text).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(status_paragraph, status_chunks[0]);

    let error_paragraph = Paragraph::new(error_text)
        .style(Style::default().bg(Color::DarkGray).fg(Color::Red))
        .alignment(Alignment::Right);
    f.render_widget(error_paragraph, status_chunks[1]);
}
