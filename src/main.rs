use appship::commands::{self, RunKind};
use appship::core::context::Toggles;
use appship::core::error::{ShipError, print_error};
use appship::logging;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Build, sign, notarize, package and publish macOS apps
#[derive(Parser)]
#[command(name = "appship")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Config file (default: appship.toml, .appship.toml or .config/appship.toml)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Log level when RUST_LOG is not set (error, warn, info, debug, trace)
  #[arg(long, global = true, default_value = "info")]
  log_level: String,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Validate configuration and credentials without building
  Check {
    /// Validate as if publishing were disabled
    #[arg(long)]
    skip_publish: bool,
    /// Validate as if notarization were disabled
    #[arg(long)]
    skip_notarize: bool,
  },

  /// Build, sign and package without publishing
  Build(RunFlags),

  /// Full release of the tagged HEAD commit
  Release {
    #[command(flatten)]
    flags: RunFlags,
    /// Build and package, but do not create the GitHub release or update the tap
    #[arg(long)]
    skip_publish: bool,
  },

  /// Release dry run with a -SNAPSHOT- version; never publishes
  Snapshot(RunFlags),

  /// Print release notes for the commits since the previous tag
  Changelog,
}

#[derive(Args)]
struct RunFlags {
  /// Remove the output directory first
  #[arg(long)]
  clean: bool,
  /// Skip notarization and stapling
  #[arg(long)]
  skip_notarize: bool,
}

impl RunFlags {
  fn toggles(&self, skip_publish: bool) -> Toggles {
    Toggles {
      skip_publish,
      skip_notarize: self.skip_notarize,
      clean: self.clean,
      snapshot: false,
    }
  }
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
  logging::init(&cli.log_level);

  let root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(1);
    }
  };
  let config = cli.config.as_deref();

  let result = match cli.command {
    Commands::Check {
      skip_publish,
      skip_notarize,
    } => commands::run_check(
      &root,
      config,
      Toggles {
        skip_publish,
        skip_notarize,
        ..Default::default()
      },
    ),
    Commands::Build(flags) => commands::run_pipeline(&root, config, RunKind::Build, flags.toggles(true)),
    Commands::Release { flags, skip_publish } => {
      commands::run_pipeline(&root, config, RunKind::Release, flags.toggles(skip_publish))
    }
    Commands::Snapshot(flags) => commands::run_pipeline(&root, config, RunKind::Snapshot, flags.toggles(true)),
    Commands::Changelog => commands::run_changelog(&root, config),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: ShipError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
