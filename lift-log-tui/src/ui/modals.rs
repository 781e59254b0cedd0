// lift-log-tui/src/ui/modals.rs
use crate::{
    app::{ActiveModal, App},
    ui::layout::{centered_rect, centered_rect_height},
};
use lift_log_lib::{EntryField, ExerciseId};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use strum::IntoEnumIterator;

pub fn render_modal(f: &mut Frame, app: &App) {
    match &app.active_modal {
        ActiveModal::Help => render_help_modal(f),
        ActiveModal::AddEntry {
            id,
            exercise_name,
            focused_field,
            error_message,
        } => render_add_entry_modal(
            f,
            app,
            *id,
            exercise_name,
            *focused_field,
            error_message.as_deref(),
        ),
        ActiveModal::ConfirmDelete {
            action,
            exercise_name,
        } => render_confirm_delete_modal(f, app, exercise_name, action.index),
        ActiveModal::None => {} // Should not happen if called correctly
    }
}

fn render_help_modal(f: &mut Frame) {
    let block = Block::default()
        .title("Help (?)")
        .borders(Borders::ALL)
        .title_style(Style::new().bold())
        .border_style(Style::new().yellow());
    let area = centered_rect(60, 70, f.size());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let help_text = vec![
        Line::from("--- Global ---").style(Style::new().bold().underlined()),
        Line::from(" q: Quit"),
        Line::from(" ?: Show/Hide This Help"),
        Line::from(" h / ←, l / →: Previous / Next Day"),
        Line::from(" 1-9: Jump to Day"),
        Line::from(" r: Reload Entries From Storage"),
        Line::from(""),
        Line::from("--- Exercises ---").style(Style::new().bold().underlined()),
        Line::from(" k / ↑, j / ↓: Navigate"),
        Line::from(" Tab: Switch Focus (Exercises <=> Entries)"),
        Line::from(" a / Enter: Log New Entry"),
        Line::from(""),
        Line::from("--- Entries ---").style(Style::new().bold().underlined()),
        Line::from(" k / ↑, j / ↓: Navigate"),
        Line::from(" d / Delete: Delete Selected Entry"),
        Line::from(" a: Log New Entry"),
        Line::from(""),
        Line::from("--- Log Entry ---").style(Style::new().bold().underlined()),
        Line::from(" Tab / Shift-Tab: Next / Previous Field"),
        Line::from(" ↑ / ↓: Increase / Decrease Number"),
        Line::from(" Enter: Next Field (Save on Notes)"),
        Line::from(" Esc: Close (Typed Values Are Kept)"),
        Line::from(""),
        Line::from(Span::styled(
            " Press Esc, ?, or Enter to close ",
            Style::new().italic().yellow(),
        )),
    ];

    let paragraph = Paragraph::new(help_text).wrap(Wrap { trim: false });
    f.render_widget(
        paragraph,
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}

fn render_add_entry_modal(
    f: &mut Frame,
    app: &App,
    id: ExerciseId,
    exercise_name: &str,
    focused_field: EntryField,
    error_message: Option<&str>,
) {
    let Some(card) = app.view.card(id) else {
        return;
    };
    let weight_unit = app.service.config.units.weight_label();

    let block = Block::default()
        .title(format!("Log Entry: {exercise_name}"))
        .borders(Borders::ALL)
        .border_style(Style::new().yellow());
    let fields: Vec<EntryField> = EntryField::iter().collect();
    // Label + input per field, then a blank line and the error line
    let height = fields.len() as u16 * 2 + 6;
    let area = centered_rect_height(50, height, f.size());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let mut constraints: Vec<Constraint> = Vec::new();
    for _ in &fields {
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area.inner(&Margin {
            vertical: 1,
            horizontal: 2,
        }));

    for (i, field) in fields.iter().enumerate() {
        let label_area = chunks[i * 2];
        let input_area = chunks[i * 2 + 1];
        let marker = if field.is_required() { "*" } else { "" };
        let label = match field {
            EntryField::Weight => format!("{} ({weight_unit}){marker}:", field.label()),
            _ => format!("{}{marker}:", field.label()),
        };
        f.render_widget(Paragraph::new(label), label_area);

        let value = card.form.field(*field);
        let style = if *field == focused_field {
            Style::default().reversed()
        } else {
            Style::default()
        };
        f.render_widget(Paragraph::new(value).style(style), input_area);

        if *field == focused_field {
            f.set_cursor(input_area.x + value.chars().count() as u16, input_area.y);
        }
    }

    if let Some(err) = error_message {
        f.render_widget(
            Paragraph::new(err)
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true }),
            chunks[fields.len() * 2 + 1],
        );
    }
}

fn render_confirm_delete_modal(f: &mut Frame, app: &App, exercise_name: &str, index: usize) {
    let total = app.selected_card().map_or(0, |card| card.list.rows().len());
    let block = Block::default()
        .title("Confirm Deletion")
        .borders(Borders::ALL)
        .border_style(Style::new().red());
    let area = centered_rect_height(50, 7, f.size());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let text = vec![
        Line::from(format!(
            "Delete entry {} of {} for {exercise_name}?",
            index + 1,
            total
        )),
        Line::from(""),
        Line::from(Span::styled(
            " [Y]es / [N]o ",
            Style::new().bold(),
        )),
    ];
    f.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}
