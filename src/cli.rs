//! Command-line interface for par-grid.
//!
//! Offline tools for stored layout files: print the tree, check it against
//! the layout invariants, and rewrite it at the current schema version.

use crate::grid::{EditorGridState, GridAction, GridSettings, check, reduce};
use crate::layout::LayoutNode;
use crate::persistence::{CURRENT_VERSION, PersistedLayout, decode_layout, migrate};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use par_grid_config::{GridConfig, LogLevel};
use std::path::{Path, PathBuf};

/// par-grid - editor layout engine tools
#[derive(Parser)]
#[command(name = "par-grid")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to the user config)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set debug log level (overrides config and RUST_LOG)
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevelArg>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Off => LogLevel::Off,
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the layout tree stored in a file
    Inspect {
        /// Layout JSON file
        file: PathBuf,
    },

    /// Load a layout file and report invariant violations
    Validate {
        /// Layout JSON file
        file: PathBuf,
    },

    /// Rewrite a layout file at the current schema version
    Migrate {
        /// Layout JSON file
        file: PathBuf,

        /// Write here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

/// Run a parsed command and return the process exit code
pub fn run(cli: Cli) -> Result<i32> {
    let config = load_config(cli.config.as_deref());
    match cli.command {
        Commands::Inspect { file } => inspect(&file, &config),
        Commands::Validate { file } => validate(&file, &config),
        Commands::Migrate { file, output } => migrate_file(&file, output.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> GridConfig {
    let result = match path {
        Some(path) => GridConfig::load_from(path),
        None => GridConfig::load(),
    };
    match result {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Using default configuration: {}", e);
            GridConfig::default()
        }
    }
}

fn read_layout(file: &Path) -> Result<PersistedLayout> {
    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    decode_layout(&bytes).with_context(|| format!("{} is not a usable layout", file.display()))
}

fn restore(layout: &PersistedLayout, config: &GridConfig) -> EditorGridState {
    reduce(
        &EditorGridState::new(GridSettings::from(config)),
        GridAction::RestoreLayout {
            root: layout.editor_grid.clone(),
            active_leaf_id: layout.last_focused.leaf_id.clone(),
        },
    )
}

fn inspect(file: &Path, config: &GridConfig) -> Result<i32> {
    let layout = read_layout(file)?;
    let state = restore(&layout, config);

    println!("{} (schema v{})", file.display(), layout.version);
    if !layout.saved_at.is_empty() {
        println!("saved at {}", layout.saved_at);
    }
    println!();
    print_node(state.root(), state.active_leaf_id(), 0);
    println!();
    println!(
        "{} leaves, depth {}, active leaf {}",
        state.leaf_count(),
        state.root().depth(),
        state.active_leaf_id()
    );
    Ok(0)
}

fn print_node(node: &LayoutNode, active_leaf_id: &str, depth: usize) {
    let indent = "  ".repeat(depth);
    match node {
        LayoutNode::Split(split) => {
            let sizes: Vec<String> = split.sizes.iter().map(|s| format!("{:.1}", s)).collect();
            println!(
                "{}split {} {:?} [{}]",
                indent,
                split.id,
                split.direction,
                sizes.join(", ")
            );
            for child in &split.children {
                print_node(child, active_leaf_id, depth + 1);
            }
        }
        LayoutNode::Leaf(leaf) => {
            let marker = if leaf.id == active_leaf_id { " *" } else { "" };
            println!("{}leaf {}{}", indent, leaf.id, marker);
            for tab in &leaf.tabs {
                let active = if leaf.active_tab_id.as_deref() == Some(tab.id.as_str()) {
                    ">"
                } else {
                    " "
                };
                let dirty = if tab.dirty { " (modified)" } else { "" };
                println!(
                    "{}  {} {} \"{}\" [{}]{}",
                    indent, active, tab.id, tab.title, tab.widget.kind, dirty
                );
            }
        }
    }
}

fn validate(file: &Path, config: &GridConfig) -> Result<i32> {
    let layout = match read_layout(file) {
        Ok(layout) => layout,
        Err(e) => {
            eprintln!("{:#}", e);
            return Ok(1);
        }
    };
    let state = restore(&layout, config);
    let violations = check(&state);
    if violations.is_empty() {
        println!("{}: ok ({} leaves)", file.display(), state.leaf_count());
        return Ok(0);
    }
    for violation in &violations {
        println!("{}: {}", file.display(), violation);
    }
    Ok(1)
}

fn migrate_file(file: &Path, output: Option<&Path>) -> Result<i32> {
    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)
        .with_context(|| format!("{} is not JSON", file.display()))?;
    let migrated = migrate(value).context("Migration failed")?;
    let text = serde_json::to_string_pretty(&migrated)?;

    // Refuse to write something the loader would reject
    decode_layout(text.as_bytes()).context("Migrated layout does not decode")?;

    match output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", text))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!(
                "Migrated {} to schema v{} at {}",
                file.display(),
                CURRENT_VERSION,
                path.display()
            );
        }
        None => println!("{}", text),
    }
    Ok(0)
}
