use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

use roboversion::config::{self, Config};
use roboversion::{ui, LocalIdentifier, LocalPolicy, ResolveOptions, StreamBranches};

#[derive(clap::Parser)]
#[command(
    name = "roboversion",
    version,
    about = "Compute a PEP440 version for a git ref from tags and prerelease branches"
)]
struct Args {
    #[arg(value_name = "REPOSITORY_PATH", help = "Path to Git repository")]
    repository_path: Option<PathBuf>,

    #[arg(long = "path", hide = true, conflicts_with = "repository_path")]
    deprecated_path: Option<PathBuf>,

    #[arg(
        long = "ref",
        default_value = "HEAD",
        help = "The Git ref of which to report the version"
    )]
    target_ref: String,

    #[arg(long, help = "The alpha release branch (if any)")]
    alpha: Option<String>,

    #[arg(long, help = "The beta release branch (if any)")]
    beta: Option<String>,

    #[arg(long, help = "The release candidate branch (if any)")]
    release: Option<String>,

    #[arg(long, help = "A post development version")]
    post: Option<u64>,

    #[arg(long, conflicts_with = "no_auto_local", help = "A local version tag")]
    local: Option<LocalIdentifier>,

    #[arg(
        long,
        help = "Suppress automatic local version insertion on development versions. \
                By default, this will be the short hash of the commit."
    )]
    no_auto_local: bool,

    #[arg(
        long = "no_auto_local",
        hide = true,
        conflicts_with_all = ["no_auto_local", "local"]
    )]
    deprecated_no_auto_local: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, ignore_case = true, help = "The logging level")]
    log_level: Option<LogLevel>,

    #[arg(
        long = "log_level",
        hide = true,
        value_enum,
        ignore_case = true,
        conflicts_with = "log_level"
    )]
    deprecated_log_level: Option<LogLevel>,
}

impl Args {
    fn repository_path(&self) -> PathBuf {
        self.repository_path
            .clone()
            .or_else(|| self.deprecated_path.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn log_level(&self) -> Option<LogLevel> {
        self.log_level.or(self.deprecated_log_level)
    }

    fn suppress_auto_local(&self) -> bool {
        self.no_auto_local || self.deprecated_no_auto_local
    }

    /// Deprecated spellings used on this command line
    fn deprecations(&self) -> Vec<&'static str> {
        let mut used = Vec::new();
        if self.deprecated_path.is_some() {
            used.push("The `--path` option is deprecated; use the positional `REPOSITORY_PATH`");
        }
        if self.deprecated_log_level.is_some() {
            used.push("`--log_level` is deprecated; use `--log-level` instead");
        }
        if self.deprecated_no_auto_local {
            used.push("`--no_auto_local` is deprecated; use `--no-auto-local` instead");
        }
        used
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.log_level());
    for deprecation in args.deprecations() {
        warn!("{}", deprecation);
    }

    let repository_path = args.repository_path();
    let config = match config::load_config(args.config.as_deref(), &repository_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let options = resolve_options(&args, &config);
    debug!(?options, "resolving version");

    match roboversion::get_version(&repository_path, &args.target_ref, &options) {
        Ok(version) => {
            println!("{}", version);
            Ok(())
        }
        Err(e) if e.is_history_failure() => {
            error!("A call to Git encountered an error");
            debug!(error = %e);
            ui::display_error(&e.to_string());
            ui::display_hint(
                "Is the specified path a Git repository? If so, does it contain any commits?",
            );
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

/// Merge command-line arguments over the configuration file
fn resolve_options(args: &Args, config: &Config) -> ResolveOptions {
    let configured = config.streams.to_stream_branches();
    let streams = StreamBranches {
        alpha: args.alpha.clone().or(configured.alpha),
        beta: args.beta.clone().or(configured.beta),
        candidate: args.release.clone().or(configured.candidate),
    };

    let local = match &args.local {
        Some(local) => LocalPolicy::Explicit(local.clone()),
        None if args.suppress_auto_local() || !config.behavior.auto_local => LocalPolicy::Suppressed,
        None => LocalPolicy::Auto,
    };

    ResolveOptions {
        streams,
        post: args.post,
        local,
    }
}

fn setup_logging(level: Option<LogLevel>) {
    let filter = match level {
        Some(level) => EnvFilter::new(format!("roboversion={}", level.as_filter())),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("roboversion=warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
