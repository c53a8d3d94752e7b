use crate::config::ConfigError;
use log::{LevelFilter, info};
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

/// "debug", "info", "warn", "error", "off" or "none"
pub fn parse_level(loglevel: &str) -> Result<LevelFilter, ConfigError> {
    match loglevel.trim().to_lowercase().as_str() {
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        "off" | "none" => Ok(LevelFilter::Off),
        other => Err(ConfigError::InvalidLogLevel(other.to_string())),
    }
}

/// Installs the terminal logger. Returns whether this call installed it: a logger can be set
/// only once per process, later calls keep the first one.
pub fn init_logger(loglevel: &str) -> Result<bool, ConfigError> {
    let level = parse_level(loglevel)?;
    let logger_instance = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
    match logger_instance {
        Ok(()) => {
            info!("logger initialised at level {}", level);
            Ok(true)
        }
        Err(_) => Ok(false),
    }
}
