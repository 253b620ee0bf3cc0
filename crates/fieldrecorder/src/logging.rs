//! Logging setup for fieldrecorder.
//!
//! Diagnostics go to stderr through `tracing`, leaving stdout for the grid
//! references and coordinates that callers pipe into other tools.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Info and above.
    #[default]
    Normal,
    /// Debug and above; shows every conversion.
    Verbose,
    /// Everything, including projection intermediates.
    Trace,
}

impl Verbosity {
    /// Derive a verbosity from `-q` and a count of `-v` flags.
    ///
    /// `quiet` wins over any number of `-v`.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// The most detailed level emitted at this verbosity.
    #[must_use]
    pub fn level(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter directive scoped to this crate, e.g. `fieldrecorder=debug`.
    #[must_use]
    pub fn directive(&self) -> String {
        format!("{}={}", env!("CARGO_CRATE_NAME"), self.level()).to_ascii_lowercase()
    }
}

/// Initialize the logging system.
///
/// `RUST_LOG`, when set, replaces the filter derived from `verbosity`.
/// Calling this more than once is harmless; later calls are ignored.
///
/// # Examples
///
/// ```no_run
/// use fieldrecorder::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::from_flags(false, 1));
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time(),
    );

    // Already initialised elsewhere (e.g. by another test).
    let _ = subscriber.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(Verbosity::from_flags(true, 3), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, 2), Verbosity::Trace);
        assert_eq!(Verbosity::from_flags(false, 9), Verbosity::Trace);
    }

    #[test]
    fn test_verbosity_to_level() {
        assert_eq!(Verbosity::Quiet.level(), Level::ERROR);
        assert_eq!(Verbosity::Normal.level(), Level::INFO);
        assert_eq!(Verbosity::Verbose.level(), Level::DEBUG);
        assert_eq!(Verbosity::Trace.level(), Level::TRACE);
    }

    #[test]
    fn test_directive() {
        assert_eq!(Verbosity::Verbose.directive(), "fieldrecorder=debug");
        assert_eq!(Verbosity::Quiet.directive(), "fieldrecorder=error");
    }

    #[test]
    fn test_verbosity_default() {
        assert_eq!(Verbosity::default(), Verbosity::Normal);
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging(Verbosity::Quiet);
        init_logging(Verbosity::Trace);
    }
}
