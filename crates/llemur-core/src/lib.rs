//! # llemur-core
//!
//! Shared configuration and logging for the llemur workspace.
//!
//! ## Modules
//!
//! - `config`: layered TOML configuration for every command
//! - `logging`: tracing subscriber bootstrap

pub mod config;
mod error;
pub mod logging;

pub use config::{
    expand_path, get_config_home, Config, LogConfig, PerfConfig, ReviewConfig, SummarizeConfig,
};
pub use error::{ConfigError, ConfigResult};
