//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::clock::Capabilities;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "cycle-timer")]
#[command(about = "A work-session timer service with an isolated background clock")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Tick period in milliseconds; each tick adds one second of elapsed time
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Run the clock on the server runtime instead of a dedicated thread
    #[arg(long)]
    pub inline: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Host capabilities, with the isolated context masked by `--inline`
    pub fn capabilities(&self) -> Capabilities {
        if self.inline {
            Capabilities::inline_only()
        } else {
            Capabilities::detect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["cycle-timer"]).unwrap();
        assert_eq!(config.address(), "0.0.0.0:20554");
        assert_eq!(config.tick_period(), Duration::from_secs(1));
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.capabilities(), Capabilities::detect());
    }

    #[test]
    fn inline_flag_masks_isolation() {
        let config = Config::try_parse_from(["cycle-timer", "--inline", "--tick-ms", "250", "-v"]).unwrap();
        assert!(!config.capabilities().isolated_context);
        assert_eq!(config.tick_period(), Duration::from_millis(250));
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn zero_tick_period_is_rejected() {
        assert!(Config::try_parse_from(["cycle-timer", "--tick-ms", "0"]).is_err());
    }
}
