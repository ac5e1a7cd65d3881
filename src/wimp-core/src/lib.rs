pub mod catalog;
pub mod config;
pub mod logging;
pub mod models;
pub mod paths;
pub mod redact;
pub mod session;
pub mod settings;

pub use catalog::{ApiError, ApiResult, AuthFailure, CatalogService};
pub use config::{ApiConfig, Config, ConfigError, LogLevel, LoggingConfig, ValidationError};
pub use logging::{init_logging, LoggingError, LoggingGuard};
pub use paths::{AppDirs, DirsError};
pub use session::{Credentials, Quality, Session, Site};
pub use settings::{FileSettings, MemorySettings, SettingsError, SettingsStore};

pub const APP_NAME: &str = "wimp";
pub const APP_AUTHOR: &str = "WiMP";
pub const APP_QUALIFIER: &str = "io";
