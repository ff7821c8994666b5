//! Internal logging facilities, not to be confused with _reporting_, which
//! records data about the running model.
//!
//! This module (re)exports the five logging macros: `error!`, `warn!`,
//! `info!`, `debug!` and `trace!` where `error!` represents the
//! highest-priority log messages and `trace!` the lowest. To emit a log
//! message, simply use one of these macros in your code:
//!
//! ```rust
//! use herdsim::info;
//!
//! pub fn do_a_thing() {
//!     info!("A thing is being done.");
//! }
//! ```
//!
//! Logging is _disabled_ by default. It can be controlled programmatically
//! with:
//!
//!  - `enable_logging()`: turns on all log messages
//!  - `disable_logging()`: turns off all log messages
//!  - `set_log_level(level: LevelFilter)`: enables only log messages with
//!    priority at least `level`
//!
//! The simulation binary wires the `--log-level` command line option to
//! `set_log_level`.

pub use log::{debug, error, info, trace, warn, LevelFilter};

use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::{Config, Handle};

use std::sync::{LazyLock, Mutex};

// Logging disabled.
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Off;

// Use an ISO 8601 timestamp format and color coded level tag
const DEFAULT_LOG_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%SZ)} {h({l})} {t} - {m}{n}";

/// A global instance of the logging configuration.
static LOG_CONFIGURATION: LazyLock<Mutex<LogConfiguration>> = LazyLock::new(Mutex::default);

/// Holds logging configuration so that it can persist across
/// reinitialization of the global logger. A `log4rs` logger cannot be
/// modified once built, so reconfiguration goes through the retained
/// [`Handle`], which swaps the installed logger for a newly built one.
struct LogConfiguration {
    /// A global filter level of `LevelFilter::Off` disables logging.
    global_log_level: LevelFilter,
    /// Handle to the installed `log4rs` logger, once one exists.
    root_handle: Option<Handle>,
}

impl Default for LogConfiguration {
    fn default() -> Self {
        LogConfiguration {
            global_log_level: DEFAULT_LOG_LEVEL,
            root_handle: None,
        }
    }
}

impl LogConfiguration {
    /// Sets the global logger to conform to this `LogConfiguration`.
    fn set_config(&mut self) {
        let encoder = Box::new(PatternEncoder::new(DEFAULT_LOG_PATTERN));
        let stdout = ConsoleAppender::builder().encoder(encoder).build();
        let config = Config::builder()
            .appender(Appender::builder().build("stdout", Box::new(stdout)));

        // The `Root` determines the global log level
        let root = Root::builder()
            .appender("stdout")
            .build(self.global_log_level);
        let new_config = match config.build(root) {
            Err(e) => {
                panic!("failed to build logging config: {e}");
            }
            Ok(config) => config,
        };

        match self.root_handle {
            Some(ref mut handle) => {
                // The global logger has already been initialized
                handle.set_config(new_config);
            }

            None => {
                // The global logger has not yet been initialized
                match log4rs::init_config(new_config) {
                    Ok(handle) => {
                        self.root_handle = Some(handle);
                    }
                    Err(e) => {
                        // Another logger won the race for the global slot.
                        eprintln!("failed to install logger: {e}");
                    }
                }
            }
        }
    }
}

/// Enables the logger with no global level filter / full logging. Equivalent to
/// `set_log_level(LevelFilter::Trace)`.
pub fn enable_logging() {
    set_log_level(LevelFilter::Trace);
}

/// Disables logging completely. Equivalent to `set_log_level(LevelFilter::Off)`.
pub fn disable_logging() {
    set_log_level(LevelFilter::Off);
}

/// Sets the global log level. A global filter level of `LevelFilter::Off`
/// disables logging.
pub fn set_log_level(level: LevelFilter) {
    let mut log_configuration = LOG_CONFIGURATION.lock().unwrap();
    log_configuration.global_log_level = level;
    log_configuration.set_config();
}
