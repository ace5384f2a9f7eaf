//! Data models for paramgroups.
//!
//! - [`RequestCode`]: the intent handed from the UI to the host-processing thread
//! - [`AttributeGroups`], [`ParsedCatalog`], [`SelectionResult`]: the catalog pipeline's data
//! - [`ViewState`]: what the front-end displays
//! - [`AppConfig`]: settings loaded from `ParamGroups Config.yaml`

pub mod catalog;
pub mod config;
pub mod request;
pub mod view_state;

pub use catalog::{
    AttributeGroups, AttributeId, CatalogEntry, Category, ParsedCatalog, SelectionResult,
};
pub use config::{AppConfig, CatalogSettings, DocumentSettings, LoggingSettings};
pub use request::{RequestCode, UnknownRequestCode};
pub use view_state::ViewState;
