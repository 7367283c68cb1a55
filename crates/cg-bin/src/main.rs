//! cellgrid demo entrypoint.
//!
//! Wires the sample dog roster into a grid session, logs every change the
//! session commits, and drives a scripted editing sequence (quick-edit,
//! append edit with cancel, multi-stage composition) so the full protocol is
//! observable from a plain terminal.

use anyhow::Result;
use clap::Parser;
use grid_config::load_from;
use grid_events::{InputEvent, KeyCode, KeyEvent};
use grid_model::{CellAddr, ColumnDef, GridModel, RowValues};
use grid_session::{CellChange, ChangeObserver, GridSession, SessionOptions};
use std::path::PathBuf;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthStr;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "cellgrid", version, about = "Editable data grid demo")] // minimal metadata
struct Args {
    /// Optional configuration file path (overrides discovery of `cellgrid.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
    /// Optional log file; without it, logs go to stderr.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

/// Prints each committed change the way the sample harness always has:
/// row, column, field, new value, old value.
struct ConsoleObserver;

impl ChangeObserver for ConsoleObserver {
    fn on_value_changed(&self, c: &CellChange<'_>) -> bool {
        println!(
            "{}, {}, \"{}\", \"{}\", \"{}\"",
            c.row, c.col, c.field, c.new_text, c.old_text
        );
        true
    }
}

fn dog_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::pinned("name"),
        ColumnDef::from("Breed"),
        ColumnDef::from("Age"),
        ColumnDef::from("Owner"),
        ColumnDef::from("Eating Habits"),
    ]
}

fn dog_rows() -> Vec<RowValues> {
    vec![
        RowValues::new()
            .with("name", "Knocky")
            .with("Breed", "Jack Russell")
            .with("Age", "16")
            .with("Owner", "Mother-in-law")
            .with("Eating Habits", "Eats everyone's leftovers"),
        RowValues::new()
            .with("name", "Flor")
            .with("Breed", "Poodle")
            .with("Age", "9")
            .with("Owner", "Me")
            .with("Eating Habits", "Nibbles at food"),
        RowValues::new()
            .with("name", "Ella")
            .with("Breed", "Streetdog")
            .with("Age", "10")
            .with("Owner", "Me")
            .with("Eating Habits", "Hearty eater"),
        RowValues::new()
            .with("name", "Juan")
            .with("Breed", "Cocker Spaniel")
            .with("Age", "5")
            .with("Owner", "Sister-in-law")
            .with("Eating Habits", "Will eat till he explodes"),
    ]
}

/// Pad to a display width; CJK cells are double-width, so byte or char
/// padding would misalign the table.
fn pad(text: &str, width: usize) -> String {
    let w = text.width();
    format!("{}{}", text, " ".repeat(width.saturating_sub(w)))
}

fn print_grid(model: &GridModel) {
    // Pinned header columns first, then the editable body, mirroring the
    // two-part visual structure of the widget.
    let mut columns: Vec<(String, Vec<String>)> = Vec::new();
    for col in model.pinned_columns() {
        let values = (0..model.row_count())
            .map(|row| {
                model
                    .row_values(row)
                    .and_then(|v| v.get(col.field_key()))
                    .unwrap_or_default()
                    .to_string()
            })
            .collect();
        columns.push((col.name().to_string(), values));
    }
    for (c, col) in model.editable_columns().enumerate() {
        let values = (0..model.row_count())
            .map(|row| {
                model
                    .cell_text(CellAddr::new(row, c))
                    .unwrap_or_default()
                    .to_string()
            })
            .collect();
        columns.push((col.name().to_string(), values));
    }

    let widths: Vec<usize> = columns
        .iter()
        .map(|(header, values)| {
            values
                .iter()
                .map(|v| v.width())
                .chain([header.width()])
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header_line: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|((header, _), w)| pad(header, *w))
        .collect();
    println!("  {}", header_line.join("  "));
    for row in 0..model.row_count() {
        let line: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|((_, values), w)| pad(&values[row], *w))
            .collect();
        println!("  {}", line.join("  "));
    }
}

fn press(session: &mut GridSession, code: KeyCode) {
    session.dispatch(InputEvent::KeyPress(KeyEvent::new(code)));
}

fn type_text(session: &mut GridSession, text: &str) {
    for c in text.chars() {
        press(session, KeyCode::Char(c));
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = init_logging(args.log_file.as_ref())?;

    let config = load_from(args.config)?;
    info!(
        target: "demo",
        delete_notifies = config.file.edit.delete_notifies,
        guard_composition_keys = config.file.edit.guard_composition_keys,
        "config_loaded"
    );

    let model = GridModel::new(dog_columns(), dog_rows())?;
    let mut session = GridSession::new(model);
    session.set_options(SessionOptions {
        delete_notifies: config.file.edit.delete_notifies,
        guard_composition_keys: config.file.edit.guard_composition_keys,
    });
    session.add_observer(Box::new(ConsoleObserver));

    println!("before:");
    print_grid(session.model());
    println!();

    // Quick-edit: a printable key overwrites the first breed; Enter commits
    // and moves down.
    session.dispatch(InputEvent::CellFocused { row: 0, col: 0 });
    type_text(&mut session, "Pug");
    press(&mut session, KeyCode::Enter);

    // Append edit on the next row, abandoned with Escape: no callback fires.
    press(&mut session, KeyCode::F(2));
    type_text(&mut session, "???");
    press(&mut session, KeyCode::Esc);

    // Multi-stage composition on the last column; Tab at the row end cannot
    // move, so it commits in place.
    session.dispatch(InputEvent::CellFocused { row: 2, col: 3 });
    session.dispatch(InputEvent::CompositionStarted);
    session.dispatch(InputEvent::CompositionUpdate {
        preedit: "なんでも".to_string(),
    });
    session.dispatch(InputEvent::CompositionEnded {
        text: "何でも".to_string(),
    });
    press(&mut session, KeyCode::Tab);

    session.dispatch(InputEvent::CellBlurred);

    println!();
    println!("after:");
    print_grid(session.model());
    Ok(())
}
