//! Checkcycle - cycle markdown checkbox markers from the command line.
//!
//! # Usage
//!
//! ```bash
//! checkcycle cycle TODO.md --line 3
//! checkcycle line "- [ ] Write report"
//! checkcycle markers add '?'
//! checkcycle markers move 3 0
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use checkcycle::command::Command;
use checkcycle::config::{JsonFileStore, SettingsManager, SettingsStore, global_config_path};
use checkcycle::cycle::cycle;
use checkcycle::editor::{CursorPosition, EditorBuffer, TextDocument};
use checkcycle::sequence::Preset;

/// Cycle markdown checkbox markers through a configurable sequence
#[derive(Parser, Debug)]
#[command(name = "checkcycle", version, about, long_about = None)]
struct Cli {
    /// Settings file (defaults to the per-user config location)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Cycle the checkbox on one line of a file
    Cycle {
        /// Markdown file to edit
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Line to cycle (1-based)
        #[arg(short, long)]
        line: usize,

        /// Cursor column on that line (1-based)
        #[arg(short, long, default_value_t = 1)]
        column: usize,

        /// Print the new line instead of writing the file
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the cycled form of a single line
    Line {
        #[arg(value_name = "TEXT", allow_hyphen_values = true)]
        text: String,
    },

    /// Show or edit the marker sequence
    #[command(subcommand)]
    Markers(MarkersAction),
}

#[derive(Subcommand, Debug)]
enum MarkersAction {
    /// List markers in cycle order
    List,

    /// Add a marker at the end of the cycle
    Add {
        #[arg(allow_hyphen_values = true)]
        marker: String,
    },

    /// Remove the marker at INDEX
    Remove { index: usize },

    /// Move the marker at FROM to position TO
    Move { from: usize, to: usize },

    /// Replace the marker at INDEX
    Set {
        index: usize,
        #[arg(allow_hyphen_values = true)]
        marker: String,
    },

    /// Restore a built-in marker set
    Reset {
        #[arg(long, value_enum, default_value = "basic")]
        preset: Preset,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let store = JsonFileStore::new(cli.config.unwrap_or_else(global_config_path));
    tracing::debug!(path = %store.path().display(), "using settings file");

    match cli.action {
        Action::Cycle {
            file,
            line,
            column,
            dry_run,
        } => run_cycle(&store, &file, line, column, dry_run),
        Action::Line { text } => {
            let settings = store.load().context("Failed to load settings")?;
            println!("{}", cycle(&text, 0, &settings.markers).line);
            Ok(())
        }
        Action::Markers(action) => run_markers(store, action),
    }
}

fn run_cycle(
    store: &JsonFileStore,
    file: &Path,
    line: usize,
    column: usize,
    dry_run: bool,
) -> Result<()> {
    if line == 0 {
        anyhow::bail!("Line numbers start at 1");
    }
    let settings = store.load().context("Failed to load settings")?;
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let mut buffer = EditorBuffer::from_text(&text);
    if line > buffer.line_count() {
        anyhow::bail!(
            "{} has {} lines, cannot cycle line {line}",
            file.display(),
            buffer.line_count()
        );
    }
    buffer.set_cursor(CursorPosition::new(line - 1, column.saturating_sub(1)));

    let Some(cursor) = Command::CycleCheckbox.run(&mut buffer, &settings.markers) else {
        anyhow::bail!("Line {line} does not exist in {}", file.display());
    };
    let updated = buffer.line(cursor.line).unwrap_or_default();

    if dry_run {
        println!("{updated}");
        return Ok(());
    }
    if buffer.is_dirty() {
        fs::write(file, buffer.text())
            .with_context(|| format!("Failed to write {}", file.display()))?;
        buffer.mark_clean();
    }
    println!("{}:{}:{}", file.display(), cursor.line + 1, cursor.column + 1);
    Ok(())
}

fn run_markers(store: JsonFileStore, action: MarkersAction) -> Result<()> {
    let mut manager = SettingsManager::load(store).context("Failed to load settings")?;
    match action {
        MarkersAction::List => {}
        MarkersAction::Add { marker } => manager.append(&marker)?,
        MarkersAction::Remove { index } => {
            manager.remove_at(index)?;
        }
        MarkersAction::Move { from, to } => manager.move_to(from, to)?,
        MarkersAction::Set { index, marker } => {
            manager.replace_at(index, &marker)?;
        }
        MarkersAction::Reset { preset } => manager.reset(preset)?,
    }

    if manager.markers().is_empty() {
        println!("(empty: cycling uses ' ')");
    }
    for (index, marker) in manager.markers().iter().enumerate() {
        println!("{index}: [{marker}]");
    }
    Ok(())
}
