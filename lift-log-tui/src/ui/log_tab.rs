use crate::app::{App, LogFocus};
use crate::ui::layout::header_color;
use lift_log_lib::{ListBody, SectionView};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, Wrap},
    Frame,
};

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn render_log_tab(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    render_exercise_list(f, app, chunks[0]);
    render_entry_table(f, app, chunks[1]);
}

fn render_exercise_list(f: &mut Frame, app: &mut App, area: Rect) {
    // One item per card, in the same order as `DayView::cards`
    let list_items: Vec<ListItem> = app
        .current_day()
        .map(|day| {
            day.sections
                .iter()
                .flat_map(|section| {
                    let prefix = match section {
                        SectionView::MainLift(_) => None,
                        SectionView::Superset { label, .. } => Some(label.clone()),
                    };
                    section.cards().iter().map(move |card| {
                        let count = card.list.rows().len();
                        let mut spans = Vec::new();
                        if let Some(label) = &prefix {
                            spans.push(Span::styled(format!("{label} · "), Style::new().dim()));
                        }
                        spans.push(Span::raw(card.exercise.name.clone()));
                        if count > 0 {
                            spans.push(Span::styled(format!(" ({count})"), Style::new().cyan()));
                        }
                        ListItem::new(Line::from(spans))
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let title = app
        .current_day()
        .map_or_else(|| "Exercises".to_string(), |day| day.title.clone());

    let list = List::new(list_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(focus_style(app.log_focus == LogFocus::ExerciseList)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, &mut app.exercise_list_state);
}

fn render_entry_table(f: &mut Frame, app: &mut App, area: Rect) {
    let block_style = focus_style(app.log_focus == LogFocus::EntryTable);
    let header_fg = header_color(app);
    let weight_header = format!("Weight ({})", app.service.config.units.weight_label());

    let Some(card) = app.selected_card() else {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Select an Exercise")
            .border_style(block_style);
        f.render_widget(block, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let details = card.exercise.details();
    let summary = vec![
        Line::from(Span::styled(card.exercise.name.clone(), Style::new().bold())),
        Line::from(if details.is_empty() {
            "-".to_string()
        } else {
            details
        }),
        Line::from(Span::styled(format!("id: {}", card.id), Style::new().dim())),
    ];
    f.render_widget(
        Paragraph::new(summary)
            .block(Block::default().borders(Borders::LEFT | Borders::TOP | Borders::RIGHT))
            .wrap(Wrap { trim: true }),
        chunks[0],
    );

    let table_block = Block::default()
        .borders(Borders::ALL)
        .title("Entries")
        .border_style(block_style);

    let rows: Vec<Row> = match card.list.body() {
        ListBody::Placeholder(text) => {
            let placeholder = Paragraph::new(*text)
                .alignment(Alignment::Center)
                .block(table_block);
            f.render_widget(placeholder, chunks[1]);
            return;
        }
        ListBody::Table(rows) => rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Row::new(vec![
                    Cell::from(format!("{}", i + 1)),
                    Cell::from(row.entry.week.clone()),
                    Cell::from(row.entry.weight.clone()),
                    Cell::from(row.entry.reps.clone()),
                    Cell::from(row.entry.sets.clone()),
                    Cell::from(row.entry.notes.clone()),
                ])
            })
            .collect(),
    };

    let header = Row::new(
        ["#", "Week", weight_header.as_str(), "Reps", "Sets", "Notes"]
            .into_iter()
            .map(|h| Cell::from(h.to_string()).style(Style::default().fg(header_fg))),
    )
    .height(1)
    .bottom_margin(1);

    let widths = [
        Constraint::Length(4),
        Constraint::Length(6),
        Constraint::Length(13),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Min(10), // Notes column expands
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(table_block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[1], &mut app.entry_table_state);
}
