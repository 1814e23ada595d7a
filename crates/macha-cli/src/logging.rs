use crate::error::{CliError, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing::Subscriber;
use tracing_subscriber::{
    Layer,
    filter::{LevelFilter, Targets},
    fmt::{self, format::FmtSpan},
    prelude::*,
    registry::LookupSpan,
};

/// Target prefix shared by the library (`macha`) and this binary (`macha_cli`).
const CRATE_TARGET: &str = "macha";

fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Our own events at `level`; dependencies never below WARN.
fn targets_for(level: LevelFilter) -> Targets {
    Targets::new()
        .with_target(CRATE_TARGET, level)
        .with_default(level.min(LevelFilter::WARN))
}

/// Plain-text layer for `--log-file`. It keeps at least INFO, so the
/// per-ligand summaries and tool outcomes land in the file even when the
/// console is quiet, and it records when each ligand span closes.
fn file_layer<S>(file: File, level: LevelFilter) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(targets_for(level.max(LevelFilter::INFO)))
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let level = level_for(verbosity, quiet);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact()
        .with_filter(targets_for(level));

    let log_file_layer = match log_file {
        Some(path) => Some(file_layer(File::create(&path).map_err(CliError::Io)?, level)),
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(log_file_layer)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::Once;
    use tracing::{Level, debug, error, info, info_span, trace, warn};

    static INIT: Once = Once::new();

    fn ensure_global_logger_is_set() {
        INIT.call_once(|| {
            setup_logging(3, false, None).expect("Failed to set up global logger for tests");
        });
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_for(0, false), LevelFilter::WARN);
        assert_eq!(level_for(1, false), LevelFilter::INFO);
        assert_eq!(level_for(2, false), LevelFilter::DEBUG);
        assert_eq!(level_for(7, false), LevelFilter::TRACE);
        assert_eq!(level_for(3, true), LevelFilter::OFF);
    }

    #[test]
    fn dependencies_are_capped_at_warn() {
        let targets = targets_for(LevelFilter::TRACE);
        assert!(targets.would_enable("macha::segments::classifier", &Level::TRACE));
        assert!(targets.would_enable("macha_cli::commands", &Level::DEBUG));
        assert!(!targets.would_enable("indicatif", &Level::INFO));
        assert!(targets.would_enable("indicatif", &Level::WARN));

        let quiet = targets_for(LevelFilter::OFF);
        assert!(!quiet.would_enable("macha::workflows", &Level::ERROR));
    }

    #[test]
    #[serial]
    fn initialization_and_macros_work() {
        ensure_global_logger_is_set();

        error!("This is an error");
        warn!("This is a warning");
        info!("This is info");
        debug!("This is debug");
        trace!("This is trace");
    }

    #[test]
    #[serial]
    fn file_layer_keeps_ligand_info_when_console_is_quiet() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("macha.log");

        let layer = file_layer(File::create(&log_path).unwrap(), LevelFilter::OFF);
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            let span = info_span!(target: "macha::workflows", "prepare_ligand", ligand = "lig1");
            span.in_scope(|| {
                info!(target: "macha::workflows", "Segments for lig1: PROA HETA");
                debug!(target: "macha::workflows", "Folder tree ready");
            });
            info!(target: "some_dependency", "connection pool resized");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Segments for lig1: PROA HETA"));
        assert!(content.contains("prepare_ligand"));
        assert!(content.contains("lig1"));
        assert!(content.contains("INFO"));
        assert!(content.contains("ThreadId"));
        assert!(!content.contains("Folder tree ready"));
        assert!(!content.contains("connection pool resized"));
    }

    #[test]
    #[serial]
    fn invalid_log_file_path_propagates_error() {
        let invalid_path = PathBuf::from("/");

        if cfg!(unix) && invalid_path.is_dir() {
            let result = setup_logging(0, false, Some(invalid_path));
            assert!(matches!(result, Err(CliError::Io(_))));
        }
    }
}
