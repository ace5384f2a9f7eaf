// ParamGroups - attribute-group catalog browser
//
// This is the library crate containing the request plumbing, catalog services
// and view state. The binary crate (main.rs) provides the console entry point.

pub mod config;
pub mod host;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod request;
pub mod services;
pub mod state;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use host::{HostDocument, InMemoryDocument};
pub use models::{AppConfig, RequestCode, ViewState};
pub use state::{ViewChange, ViewManager};
pub use ui::{Coordinator, RequestError};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
