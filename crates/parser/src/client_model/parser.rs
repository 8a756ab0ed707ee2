//! Client model file parser

use super::types::ClientModelDocument;
use provisioning_generator_common::{ClientModel, GeneratorError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Serialization format of a client model document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Detect the format from a file extension, defaulting to JSON
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

/// Client model parser
///
/// Reads a client model document describing a management-plane service and
/// converts it into the `ClientModel` IR consumed by the generator.
pub struct ClientModelParser {
    /// Loaded document
    document: ClientModelDocument,
}

impl ClientModelParser {
    /// Load a client model from file path, detecting the format
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = ClientModelParser::from_file("storage.json")?;
    /// let model = parser.parse()?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Parse(format!(
                "Failed to read client model {}: {}",
                path.display(),
                e
            ))
        })?;

        debug!(path = %path.display(), "loaded client model document");
        Self::from_content(&content, DocumentFormat::detect(path))
    }

    /// Parse a client model from a string in the given format
    pub fn from_content(content: &str, format: DocumentFormat) -> Result<Self> {
        let document = match format {
            DocumentFormat::Json => serde_json::from_str(content).map_err(|e| {
                GeneratorError::Parse(format!("Failed to parse client model JSON: {}", e))
            })?,
            DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| {
                GeneratorError::Parse(format!("Failed to parse client model YAML: {}", e))
            })?,
        };

        Ok(Self { document })
    }

    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_content(json, DocumentFormat::Json)
    }

    /// Convert the document into the ClientModel IR
    pub fn parse(&self) -> Result<ClientModel> {
        super::converter::convert_document(&self.document)
    }

    /// Get reference to the underlying document
    pub fn document(&self) -> &ClientModelDocument {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_document() {
        let json = r#"{"provider": "Microsoft.Foo", "package": "com.foo"}"#;

        let parser = ClientModelParser::from_json(json).unwrap();
        assert_eq!(parser.document().provider, "Microsoft.Foo");

        let model = parser.parse().unwrap();
        assert!(model.resources.is_empty());
        assert!(model.models.is_empty());
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(
            DocumentFormat::detect(Path::new("model.yaml")),
            DocumentFormat::Yaml
        );
        assert_eq!(
            DocumentFormat::detect(Path::new("model.yml")),
            DocumentFormat::Yaml
        );
        assert_eq!(
            DocumentFormat::detect(Path::new("model.json")),
            DocumentFormat::Json
        );
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let result = ClientModelParser::from_json("{ not json");
        assert!(matches!(result, Err(GeneratorError::Parse(_))));
    }
}
