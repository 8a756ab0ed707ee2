//! Provisionable resources

use crate::registry::ModelId;
use crate::type_model::TypeModel;

/// Constraints on the user-chosen name of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameRequirements {
    pub min_length: usize,
    pub max_length: usize,
    pub lower: bool,
    pub upper: bool,
    pub digits: bool,
    pub hyphen: bool,
    pub underscore: bool,
    pub period: bool,
    pub parens: bool,
}

impl NameRequirements {
    /// Whether a candidate name satisfies the length and character rules
    pub fn accepts(&self, name: &str) -> bool {
        let length = name.chars().count();
        if length < self.min_length || length > self.max_length {
            return false;
        }

        name.chars().all(|c| match c {
            'a'..='z' => self.lower,
            'A'..='Z' => self.upper,
            '0'..='9' => self.digits,
            '-' => self.hyphen,
            '_' => self.underscore,
            '.' => self.period,
            '(' | ')' => self.parens,
            _ => false,
        })
    }
}

/// A [`TypeModel`] provisioned as a standalone ARM resource
#[derive(Debug, Clone, Default)]
pub struct Resource {
    pub type_model: TypeModel,
    /// Type below the provider, e.g. `storageAccounts/blobServices`
    pub resource_type: Option<String>,
    /// Provider namespace, e.g. `Microsoft.Storage`
    pub provider_namespace: Option<String>,
    pub default_version: Option<String>,
    pub versions: Option<Vec<String>>,
    pub name_requirements: Option<NameRequirements>,
    /// Resource this one is nested under
    pub parent: Option<ModelId>,
    pub create_path: String,
    /// Create path is not rooted at a subscription or resource group
    pub scoped: bool,
}

impl Resource {
    pub fn new(create_path: impl Into<String>) -> Self {
        Self {
            create_path: create_path.into(),
            ..Self::default()
        }
    }

    /// Emitted class name, e.g. `StorageAccountInner` -> `StorageAccountResource`
    pub fn class_name(model_name: &str) -> String {
        format!("{}Resource", model_name.replace("Inner", ""))
    }

    /// `Microsoft.Storage/storageAccounts`
    pub fn full_type(&self) -> Option<String> {
        match (&self.provider_namespace, &self.resource_type) {
            (Some(namespace), Some(resource_type)) => {
                Some(format!("{}/{}", namespace, resource_type))
            },
            _ => None,
        }
    }

    /// Set available and default versions from a catalog listing
    ///
    /// Stable versions are preferred; when every version is a preview the
    /// full list is kept. The default is the last entry after sorting.
    pub fn apply_versions(&mut self, api_versions: &[String]) {
        let mut versions: Vec<String> = api_versions
            .iter()
            .filter(|v| !v.contains("preview"))
            .cloned()
            .collect();
        if versions.is_empty() {
            versions = api_versions.to_vec();
        }
        versions.sort();
        versions.dedup();

        self.default_version = versions.last().cloned();
        self.versions = Some(versions);
    }
}
