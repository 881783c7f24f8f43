mod commands;
mod core;
mod graph;
mod logging;
mod ui;
mod workspace;

use clap::{Parser, Subcommand};
use core::error::{WsError, print_error};
use std::path::PathBuf;

/// Map dependency relationships between packages in a yarn workspace
#[derive(Parser)]
#[command(name = "wsmap")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Directory to run in (default: current directory)
  #[arg(long, global = true)]
  cwd: Option<PathBuf>,

  /// Log level for diagnostics on stderr (RUST_LOG takes precedence)
  #[arg(long, global = true, value_enum, default_value = "warn")]
  log_level: logging::LogLevel,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Workspace
  // ============================================================================
  /// List the packages in the workspace
  List {
    /// Read the workspace listing from a file instead of running yarn
    #[arg(long)]
    listing: Option<PathBuf>,
    /// Output format: text (default), json, names-only
    #[arg(long, default_value = "text")]
    format: String,
  },

  /// Resolve each package's direct workspace dependencies by name
  Deps {
    /// Read the workspace listing from a file instead of running yarn
    #[arg(long)]
    listing: Option<PathBuf>,
    /// Only list packages, skip dependency mapping
    #[arg(long, conflicts_with = "package")]
    no_transitive: bool,
    /// Show a single package
    #[arg(long)]
    package: Option<String>,
    /// With --package: show direct dependents instead of dependencies
    #[arg(long, requires = "package")]
    reverse: bool,
    /// Fail when a declared dependency location matches no package
    #[arg(long)]
    strict: bool,
    /// Output format: text (default), json
    #[arg(long, default_value = "text")]
    format: String,
  },

  /// List installed dependencies of each package via npm
  Npm {
    /// Read the workspace listing from a file instead of running yarn
    #[arg(long)]
    listing: Option<PathBuf>,
    /// Only list this package
    #[arg(long)]
    package: Option<String>,
    /// Output format: text (default), json
    #[arg(long, default_value = "text")]
    format: String,
  },

  // ============================================================================
  // Version control
  // ============================================================================
  /// List files changed according to git
  Changed {
    /// Git ref to diff the working tree against (default: resolve.default_since)
    #[arg(long, conflicts_with_all = ["staged", "head"])]
    since: Option<String>,
    /// Staged changes only
    #[arg(long, conflicts_with = "head")]
    staged: bool,
    /// Files touched by the current commit
    #[arg(long)]
    head: bool,
    /// Output format: text (default), json, names-only
    #[arg(long, default_value = "text")]
    format: String,
  },

  /// Print the git repository root
  Root,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  if let Err(e) = logging::init(cli.log_level) {
    eprintln!("Warning: {}", e);
  }

  if let Err(err) = run(cli) {
    handle_error(err);
  }
}

fn run(cli: Cli) -> core::error::WsResult<()> {
  let root = resolve_root(cli.cwd)?;

  // The only read of the ambient environment; everything downstream gets it explicitly
  let ctx = core::context::WorkspaceContext::build(&root, std::env::vars())?;

  match cli.command {
    Commands::List { listing, format } => commands::run_list(&ctx, listing, format),
    Commands::Deps {
      listing,
      no_transitive,
      package,
      reverse,
      strict,
      format,
    } => commands::run_deps(
      &ctx,
      commands::DepsOptions {
        listing,
        no_transitive,
        package,
        reverse,
        strict,
        format,
      },
    ),
    Commands::Npm {
      listing,
      package,
      format,
    } => commands::run_npm(&ctx, listing, package, format),
    Commands::Changed {
      since,
      staged,
      head,
      format,
    } => commands::run_changed(&ctx, since, staged, head, format),
    Commands::Root => commands::run_root(&ctx),
  }
}

/// Absolute directory to operate in
fn resolve_root(cwd: Option<PathBuf>) -> core::error::WsResult<PathBuf> {
  let current = std::env::current_dir().map_err(|e| WsError::message(format!("Failed to get current directory: {}", e)))?;

  let root = match cwd {
    Some(dir) if dir.is_absolute() => dir,
    Some(dir) => current.join(dir),
    None => current,
  };

  if !root.is_dir() {
    return Err(WsError::with_help(
      format!("Not a directory: {}", root.display()),
      "Pass an existing directory to --cwd.",
    ));
  }

  Ok(root)
}

fn handle_error(err: WsError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
