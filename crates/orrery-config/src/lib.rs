//! Configuration for the orrery.
//!
//! Settings persist to disk as RON and can be overridden from the command line.
//! Every section is `#[serde(default)]`, so partial or older files still load.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, CameraConfig, Config, DebugConfig, InputConfig, SceneConfig, WindowConfig,
    default_config_dir,
};
pub use error::ConfigError;
