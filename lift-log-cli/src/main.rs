//src/main.rs
mod cli; // Keep cli module for parsing args

use anyhow::{bail, Context, Result};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use std::fs;
use std::io::{self, stdout};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use lift_log_lib::{
    AppService, Entry, EntryField, EntryForm, ExerciseCard, ListBody, ProgramSource, SectionView,
    SubmitError, Units,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    // --- Check for completion generation request FIRST ---
    let cli_args = cli::parse_args(); // Parse arguments once
    let export_csv = cli_args.export_csv;

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command(); // Get the command structure
        let bin_name = cmd.get_name().to_string(); // Get the binary name

        eprintln!("Generating completion script for {shell}..."); // Print to stderr
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout()); // Print script to stdout
        return Ok(());
    }

    // Initialize the application service (loads config, opens storage, loads program)
    let mut service = AppService::initialize_with_program(cli_args.program.as_deref())
        .context("Failed to initialize application service")?;

    let header_color = lift_log_lib::parse_color(&service.config.theme.header_color)
        .map(Color::from)
        .unwrap_or(Color::Green); // Fallback
    let units = service.config.units;

    debug!(command = ?cli_args.command, program = ?service.program_source, "dispatching command");
    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } => {
            // This case is handled above, but keep it exhaustive
            unreachable!("Completion generation should have exited already");
        }
        cli::Commands::Show { day } => {
            let view = service.render();
            if view.is_empty() {
                println!("The program has no days.");
                return Ok(());
            }
            let selected = match day {
                Some(0) => bail!("Day numbers start at 1."),
                Some(n) if n > view.days.len() => {
                    bail!("Day {} does not exist (program has {} days).", n, view.days.len())
                }
                Some(n) => n - 1..n,
                None => 0..view.days.len(),
            };
            if let Some(name) = &service.program.program_name {
                println!("{name}");
            }
            if let ProgramSource::File(path) = &service.program_source {
                println!("(from {})", path.display());
            }
            for day_view in &view.days[selected] {
                println!();
                println!("=== {} ===", day_view.title);
                for section in &day_view.sections {
                    match section {
                        SectionView::MainLift(card) => print_card(card, header_color, units),
                        SectionView::Superset { label, cards } => {
                            println!();
                            println!("-- {label} --");
                            for card in cards {
                                print_card(card, header_color, units);
                            }
                        }
                    }
                }
            }
        }
        cli::Commands::Ids => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    Cell::new("ID").fg(header_color),
                    Cell::new("Day").fg(header_color),
                    Cell::new("Exercise").fg(header_color),
                    Cell::new("Prescription").fg(header_color),
                    Cell::new("Entries").fg(header_color),
                ]);
            let counts = service.entry_counts();
            for (id, exercise) in service.program.exercises() {
                let day = service
                    .program
                    .days
                    .get(id.day)
                    .map_or_else(String::new, |d| d.day.clone());
                table.add_row(vec![
                    Cell::new(id.to_string()),
                    Cell::new(day),
                    Cell::new(&exercise.name),
                    Cell::new(exercise.details()),
                    Cell::new(counts.get(&id).copied().unwrap_or(0)),
                ]);
            }
            println!("{table}");
        }
        cli::Commands::List { exercise } => {
            let (id, definition) = service.resolve_exercise(&exercise)?;
            let name = definition.name.clone();
            let entries = service.entries(id);
            if export_csv {
                print_entries_csv(&entries, units)?;
            } else if entries.is_empty() {
                println!("{name} ({id}): no entries yet.");
            } else {
                println!("{name} ({id})");
                print_entries_table(&entries, header_color, units);
            }
        }
        cli::Commands::Add {
            exercise,
            week,
            weight,
            reps,
            sets,
            notes,
        } => {
            let (id, definition) = service.resolve_exercise(&exercise)?;
            let name = definition.name.clone();
            let mut form = EntryForm::new();
            form.set(EntryField::Week, week)
                .set(EntryField::Weight, weight)
                .set(EntryField::Reps, reps)
                .set(EntryField::Sets, sets)
                .set(EntryField::Notes, notes);

            match service.log_entry(id, &mut form) {
                Ok(entry) => {
                    let count = service.entries(id).len();
                    println!(
                        "Logged {name} week {}: {} {} x {} reps x {} sets (entry #{count}).",
                        entry.week,
                        entry.weight,
                        units.weight_label(),
                        entry.reps,
                        entry.sets
                    );
                }
                Err(SubmitError::Validation(e)) => bail!("{e}"),
                Err(e) => return Err(e).context(format!("Error logging entry for {id}")),
            }
        }
        cli::Commands::Delete { exercise, row } => {
            let (id, definition) = service.resolve_exercise(&exercise)?;
            let name = definition.name.clone();
            let removed = match row.checked_sub(1) {
                Some(index) => service.delete_entry(id, index)?,
                None => None,
            };
            match removed {
                Some(entry) => println!(
                    "Deleted row {row} of {name} (week {}, {} x {}).",
                    entry.week, entry.weight, entry.reps
                ),
                None => println!("{name} has no row {row}; nothing deleted."),
            }
        }
        cli::Commands::Export { output } => {
            let document = service.export_entries()?;
            match output {
                Some(path) => {
                    fs::write(&path, document)
                        .with_context(|| format!("Failed to write export to {path:?}"))?;
                    println!("Exported entries to {}", path.display());
                }
                None => println!("{document}"),
            }
        }
        cli::Commands::Import { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read import file {file:?}"))?;
            let count = service.import_entries(&text)?;
            println!("Imported {count} entries from {}.", file.display());
        }
        cli::Commands::Clear { yes } => {
            if !yes {
                bail!("This deletes every logged entry. Re-run with --yes to confirm.");
            }
            service.clear_entries()?;
            println!("All entries cleared.");
        }
        cli::Commands::StoragePath => {
            println!("Storage file is located at: {:?}", service.get_storage_path());
        }
        cli::Commands::ConfigPath => {
            println!("Config file is located at: {:?}", service.get_config_path());
        }
    }

    Ok(())
}

fn print_card(card: &ExerciseCard, header_color: Color, units: Units) {
    println!();
    println!("{} [{}]", card.exercise.name, card.id);
    let details = card.exercise.details();
    if !details.is_empty() {
        println!("  {details}");
    }
    match card.list.body() {
        ListBody::Placeholder(text) => println!("  {text}"),
        ListBody::Table(rows) => {
            let entries: Vec<Entry> = rows.iter().map(|row| row.entry.clone()).collect();
            print_entries_table(&entries, header_color, units);
        }
    }
}

fn print_entries_table(entries: &[Entry], header_color: Color, units: Units) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Row").fg(header_color),
            Cell::new("Week").fg(header_color),
            Cell::new(format!("Weight ({})", units.weight_label())).fg(header_color),
            Cell::new("Reps").fg(header_color),
            Cell::new("Sets").fg(header_color),
            Cell::new("Notes").fg(header_color),
        ]);

    for (i, entry) in entries.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1).add_attribute(Attribute::Dim),
            Cell::new(&entry.week),
            Cell::new(&entry.weight),
            Cell::new(&entry.reps),
            Cell::new(&entry.sets),
            Cell::new(&entry.notes),
        ]);
    }
    println!("{table}");
}

fn print_entries_csv(entries: &[Entry], units: Units) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    let weight_header = format!("Weight_{}", units.weight_label());
    writer.write_record([
        "Row",
        "Week",
        weight_header.as_str(),
        "Reps",
        "Sets",
        "Notes",
    ])?;
    for (i, entry) in entries.iter().enumerate() {
        writer.write_record([
            &(i + 1).to_string(),
            &entry.week,
            &entry.weight,
            &entry.reps,
            &entry.sets,
            &entry.notes,
        ])?;
    }
    writer.flush()?;
    Ok(())
}
