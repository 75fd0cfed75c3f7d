use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::env;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;
use wpconfig_patcher::config::{apply_batch, load_from_path};
use wpconfig_patcher::wpconfig::{self, ConfigFile};
use wpconfig_patcher::{
    find_declaration, patch_bytes, Change, Directive, DirectiveKind, Literal, DEFAULT_ANCHORS,
};

/// Log level options for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Parser)]
#[command(name = "wpconfig-patcher")]
#[command(about = "Set or update constants and variables in wp-config.php", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to wp-config.php (otherwise WP_CONFIG_PATH, then searched upwards)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level (overrides --verbose)
    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set or update a constant or variable in wp-config.php
    UpdateConfig {
        /// Name of the constant or variable
        name: String,

        /// Desired value. Supported types are string, int, float and bool
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Use the value as is, without type detection or quoting
        #[arg(long)]
        plain: bool,

        /// Set a variable instead of a constant (e.g. table_prefix)
        #[arg(long)]
        variable: bool,

        /// Show what would change without writing the file
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,
    },

    /// Print the current value of a constant or variable
    GetConfig {
        /// Name of the constant or variable
        name: String,

        /// Read a variable instead of a constant
        #[arg(long)]
        variable: bool,
    },

    /// Apply every directive listed in a TOML batch file
    Apply {
        /// Batch file to apply
        file: PathBuf,

        /// Show what would change without writing the file
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let result = match cli.command {
        Commands::UpdateConfig {
            name,
            value,
            plain,
            variable,
            dry_run,
            diff,
        } => cmd_update_config(
            cli.config.as_deref(),
            Directive::new(name, DirectiveKind::from_flag(variable)),
            Literal::from_input(&value, plain),
            dry_run,
            diff,
        ),
        Commands::GetConfig { name, variable } => cmd_get_config(
            cli.config.as_deref(),
            Directive::new(name, DirectiveKind::from_flag(variable)),
        ),
        Commands::Apply {
            file,
            dry_run,
            diff,
        } => cmd_apply(cli.config.as_deref(), &file, dry_run, diff),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = cli.log_level.map(LevelFilter::from).unwrap_or(if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    });

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wpconfig_patcher={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Helper: locate and read the config file
fn open_config(explicit: Option<&Path>) -> Result<ConfigFile> {
    let cwd = env::current_dir().context("cannot determine current directory")?;
    let path = wpconfig::locate(explicit, &cwd)?;
    Ok(ConfigFile::read(path)?)
}

/// Helper: Show unified diff between original and modified content
fn display_diff(file: &Path, original: &[u8], modified: &[u8]) {
    let original = String::from_utf8_lossy(original);
    let modified = String::from_utf8_lossy(modified);

    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (patched)", file.display()).dimmed());

    let diff = TextDiff::from_lines(&*original, &*modified);

    for group in diff.grouped_ops(2) {
        for op in &group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => format!("-{}", change).red(),
                    ChangeTag::Insert => format!("+{}", change).green(),
                    ChangeTag::Equal => format!(" {}", change).normal(),
                };
                print!("{}", sign);
            }
        }
    }
}

/// Helper: write unless dry-running, then report
fn finish(file: &ConfigFile, new_content: &[u8], dry_run: bool, show_diff: bool) -> Result<()> {
    if show_diff && new_content != file.content() {
        display_diff(file.path(), file.content(), new_content);
    }

    if dry_run {
        info!("dry run, {} left untouched", file.path().display());
        println!("{}", "[DRY RUN - nothing written]".cyan());
        return Ok(());
    }

    file.save(new_content)?;
    Ok(())
}

fn describe(directive: &Directive, change: &Change) -> String {
    match change {
        Change::Replaced { line, previous } => {
            format!("{directive}: updated on line {line} (was {previous})")
        }
        Change::Inserted { line } => format!("{directive}: added on line {line}"),
        Change::Unchanged { line } => format!("{directive}: already set on line {line}"),
    }
}

fn cmd_update_config(
    explicit: Option<&Path>,
    directive: Directive,
    value: Literal,
    dry_run: bool,
    show_diff: bool,
) -> Result<bool> {
    let file = open_config(explicit)?;
    let patched = patch_bytes(file.content(), &directive, &value, DEFAULT_ANCHORS)?;

    finish(&file, &patched.content, dry_run, show_diff)?;

    let glyph = if patched.is_unchanged() {
        "⊙".yellow()
    } else {
        "✓".green()
    };
    println!("{} {}", glyph, describe(&directive, &patched.change));
    Ok(true)
}

fn cmd_get_config(explicit: Option<&Path>, directive: Directive) -> Result<bool> {
    let file = open_config(explicit)?;

    match find_declaration(file.content(), &directive)? {
        Some(declaration) => {
            println!("{}", declaration.value);
            Ok(true)
        }
        None => {
            eprintln!(
                "{} {} is not declared in {}",
                "⊘".cyan(),
                directive,
                file.path().display()
            );
            Ok(false)
        }
    }
}

fn cmd_apply(explicit: Option<&Path>, batch: &Path, dry_run: bool, show_diff: bool) -> Result<bool> {
    let config = load_from_path(batch)?;
    let file = open_config(explicit)?;

    println!("Config: {}", file.path().display());
    println!("Loading directives from {}...", batch.display());

    let outcome = apply_batch(file.content(), &config)?;

    finish(&file, &outcome.content, dry_run, show_diff)?;

    for (directive, change) in &outcome.changes {
        let glyph = match change {
            Change::Unchanged { .. } => "⊙".yellow(),
            _ => "✓".green(),
        };
        println!("{} {}", glyph, describe(directive, change));
    }

    println!();
    println!("{}", "Summary:".bold());
    println!("  {} changed", format!("{}", outcome.changed()).green());
    println!(
        "  {} already set",
        format!("{}", outcome.changes.len() - outcome.changed()).yellow()
    );

    Ok(true)
}
