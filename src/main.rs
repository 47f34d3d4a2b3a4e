use clap::Parser;
use dpad::core::config::{self, CliOverrides, DpadConfig};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dpad", about = "Remote-control focus navigation in the terminal")]
struct Args {
    /// View shown at the bottom of the history stack
    #[arg(long)]
    root_view: Option<String>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,

    /// Don't focus the first tile automatically
    #[arg(long)]
    no_auto_focus: bool,

    /// Read settings from this file instead of ~/.dpad/config.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Logger first so config loading is recorded; the final level is
    // applied once the config is resolved
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("dpad.log") {
        let _ = WriteLogger::init(LevelFilter::Trace, log_config, log_file);
    }
    log::set_max_level(provisional_level(args.log_level.as_deref()));

    let loaded = match &args.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    };
    let file_config = loaded.unwrap_or_else(|e| {
        log::warn!("{}, falling back to defaults", e);
        DpadConfig::default()
    });

    let cli = CliOverrides {
        root_view: args.root_view,
        log_level: args.log_level,
        no_auto_focus: args.no_auto_focus,
    };
    let resolved = config::resolve(&file_config, &cli);
    log::set_max_level(resolved.log_level);

    log::info!(
        "dpad starting at '{}' (exit window {:?})",
        resolved.root_view,
        resolved.exit_window
    );

    dpad::tui::run(resolved)
}

/// Level used while the config file is being read: CLI, then env, then the
/// default.
fn provisional_level(cli: Option<&str>) -> LevelFilter {
    cli.map(str::to_string)
        .or_else(|| std::env::var("DPAD_LOG_LEVEL").ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(config::DEFAULT_LOG_LEVEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provisional_level_prefers_cli() {
        assert_eq!(provisional_level(Some("debug")), LevelFilter::Debug);
        assert_eq!(provisional_level(Some(" WARN ")), LevelFilter::Warn);
        assert_eq!(provisional_level(Some("off")), LevelFilter::Off);
    }
}
