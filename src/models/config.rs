use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Folder under the user's documents directory that receives the catalog files
pub const DEFAULT_CATALOG_FOLDER: &str = "Esperimenti_Revit";

/// Catalog file name
pub const DEFAULT_CATALOG_FILE: &str = "ParameterGroups.txt";

/// Secondary index file name
pub const DEFAULT_INDEX_FILE: &str = "ParameterGroups2.txt";

/// Application configuration from ParamGroups Config.yaml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub logging: LoggingSettings,

    #[serde(default)]
    pub document: DocumentSettings,
}

/// Where the catalog and its index are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Empty means `<documents>/Esperimenti_Revit`
    #[serde(default)]
    pub catalog_dir: String,

    #[serde(default = "default_catalog_file")]
    pub catalog_file: String,

    #[serde(default = "default_index_file")]
    pub index_file: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            catalog_dir: String::new(),
            catalog_file: default_catalog_file(),
            index_file: default_index_file(),
        }
    }
}

impl CatalogSettings {
    /// Resolve the catalog directory.
    ///
    /// Falls back to the current directory when the platform reports no
    /// documents folder (or it is not valid UTF-8).
    pub fn resolve_dir(&self) -> Utf8PathBuf {
        if !self.catalog_dir.is_empty() {
            return Utf8PathBuf::from(&self.catalog_dir);
        }

        dirs::document_dir()
            .and_then(|p| Utf8PathBuf::from_path_buf(p).ok())
            .map(|docs| docs.join(DEFAULT_CATALOG_FOLDER))
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_CATALOG_FOLDER))
    }

    pub fn catalog_path(&self) -> Utf8PathBuf {
        self.resolve_dir().join(&self.catalog_file)
    }

    pub fn index_path(&self) -> Utf8PathBuf {
        self.resolve_dir().join(&self.index_file)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default)]
    pub debug_mode: bool,

    #[serde(default)]
    pub console_output: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            debug_mode: false,
            console_output: false,
        }
    }
}

/// Host document the binary opens (YAML snapshot).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentSettings {
    #[serde(default)]
    pub path: String,
}

impl DocumentSettings {
    pub fn path(&self) -> Option<Utf8PathBuf> {
        (!self.path.is_empty()).then(|| Utf8PathBuf::from(&self.path))
    }
}

fn default_catalog_file() -> String {
    DEFAULT_CATALOG_FILE.to_string()
}

fn default_index_file() -> String {
    DEFAULT_INDEX_FILE.to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}
