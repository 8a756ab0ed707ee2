//! Generator configuration loading from YAML files
//!
//! A configuration file names the specification being generated, where its
//! artifacts go, which resource type catalog backs version resolution and
//! how the lint pass is tuned.

use crate::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration format version understood by this crate
pub const CONFIG_VERSION: u32 = 1;

/// Root structure of a generator configuration file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneratorConfig {
    /// Configuration format version
    pub version: u32,
    /// Specification identity
    pub specification: SpecificationInfo,
    /// Output location
    #[serde(default)]
    pub output: OutputConfig,
    /// Resource type catalog used for API version resolution
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Lint tuning
    #[serde(default)]
    pub lint: LintConfig,
}

/// Specification identity
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpecificationInfo {
    /// Specification name (e.g., "Storage")
    pub name: String,
    /// Provisioning package (e.g., "com.azure.provisioning.storage")
    pub package: String,
    /// Provider namespace (e.g., "Microsoft.Storage")
    pub provider: String,
    /// Default documentation attached to every generated property
    #[serde(default)]
    pub doc_comments: Option<String>,
}

/// Output location
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Root under which `sdk/<artifact>` is created
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
        }
    }
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Which catalog implementation to construct
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    /// No version lookup; resources stay unversioned
    #[default]
    None,
    /// Snapshot file
    Static,
    /// Live management endpoint
    Arm,
}

/// Resource type catalog settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub kind: CatalogKind,
    /// Snapshot file for the static catalog
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Management endpoint for the live catalog
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Subscription the live catalog queries providers through
    #[serde(default)]
    pub subscription_id: Option<String>,
    /// Environment variable holding the bearer token
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// API version of the providers endpoint
    #[serde(default = "default_providers_api_version")]
    pub api_version: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            kind: CatalogKind::None,
            path: None,
            endpoint: default_endpoint(),
            subscription_id: None,
            token_env: default_token_env(),
            api_version: default_providers_api_version(),
        }
    }
}

fn default_endpoint() -> String {
    "https://management.azure.com".to_string()
}

fn default_token_env() -> String {
    "AZURE_ACCESS_TOKEN".to_string()
}

fn default_providers_api_version() -> String {
    "2021-04-01".to_string()
}

/// Lint tuning
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LintConfig {
    /// Substrings that must not appear in generated model or property names
    #[serde(default = "default_disallowed_fragments")]
    pub disallowed_name_fragments: Vec<String>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            disallowed_name_fragments: default_disallowed_fragments(),
        }
    }
}

fn default_disallowed_fragments() -> Vec<String> {
    vec!["Inner".to_string()]
}

impl GeneratorConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        Self::from_yaml(&content).map_err(|e| match e {
            GeneratorError::Yaml(e) => GeneratorError::Config(format!(
                "Failed to parse config YAML from {:?}: {}",
                path, e
            )),
            other => other,
        })
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: GeneratorConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Minimal configuration for a specification, everything else defaulted
    pub fn new(name: &str, package: &str, provider: &str) -> Self {
        Self {
            version: CONFIG_VERSION,
            specification: SpecificationInfo {
                name: name.to_string(),
                package: package.to_string(),
                provider: provider.to_string(),
                doc_comments: None,
            },
            output: OutputConfig::default(),
            catalog: CatalogConfig::default(),
            lint: LintConfig::default(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.version != CONFIG_VERSION {
            return Err(GeneratorError::Config(format!(
                "Unsupported config version {} (expected {})",
                self.version, CONFIG_VERSION
            )));
        }
        if self.specification.package.trim().is_empty() {
            return Err(GeneratorError::Config(
                "specification.package must not be empty".to_string(),
            ));
        }
        match self.catalog.kind {
            CatalogKind::Static if self.catalog.path.is_none() => Err(GeneratorError::Config(
                "catalog.path is required for a static catalog".to_string(),
            )),
            CatalogKind::Arm if self.catalog.subscription_id.is_none() => {
                Err(GeneratorError::Config(
                    "catalog.subscription_id is required for the arm catalog".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }

    /// Artifact name derived from the package ("com.azure.provisioning.storage"
    /// becomes "azure-provisioning-storage")
    pub fn artifact_name(&self) -> String {
        artifact_name(&self.specification.package)
    }
}

/// Artifact name for a provisioning package
pub fn artifact_name(package: &str) -> String {
    package.replacen("com.", "", 1).replace('.', "-")
}
