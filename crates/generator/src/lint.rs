//! Advisory checks over the analyzed type graph

use crate::model::ModelBase;
use crate::specification::Specification;
use std::fmt;
use tracing::warn;

/// One advisory finding; lint never fails a build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintWarning {
    /// Emitted name of the offending type
    pub model: String,
    pub message: String,
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.model, self.message)
    }
}

impl Specification {
    /// Check every generated model; external types are exempt
    pub fn lint(&self) -> Vec<LintWarning> {
        let mut warnings = Vec::new();

        for (_, model) in self.registry().registered() {
            if model.external || !model.is_generated() {
                continue;
            }
            self.lint_model(model, &mut warnings);
        }

        for warning in &warnings {
            warn!("{}", warning);
        }
        warnings
    }

    fn lint_model(&self, model: &ModelBase, warnings: &mut Vec<LintWarning>) {
        let type_name = model.type_name();
        let mut report = |message: String| {
            warnings.push(LintWarning {
                model: type_name.clone(),
                message,
            })
        };

        if let Some(resource) = model.as_resource() {
            let label = resource.full_type().unwrap_or_else(|| type_name.clone());
            if resource.scoped {
                report(format!(
                    "{} is a scoped resource; its namespace and versions were not resolved.",
                    label
                ));
            } else if resource.default_version.is_none() {
                report(format!("{} has no default resource version.", label));
            } else if resource.versions.as_ref().map_or(true, |v| v.is_empty()) {
                report(format!("{} has no resource versions.", label));
            }
        }

        if let Some(type_model) = model.type_model() {
            if let Some(discriminator) = &type_model.discriminator {
                if discriminator.value.is_none() {
                    report(format!(
                        "Discriminator {} has no value.",
                        discriminator.name
                    ));
                }
            }
        }

        for conflict in self
            .property_conflicts
            .iter()
            .filter(|c| c.model == type_name)
        {
            report(format!(
                "Property {} at {} ({}) was dropped in favour of {} ({}).",
                conflict.property,
                conflict.dropped_path,
                conflict.dropped_type,
                conflict.kept_path,
                conflict.kept_type
            ));
        }

        for fragment in &self.disallowed_fragments {
            if type_name.contains(fragment.as_str()) {
                report(format!("Type name contains disallowed '{}'.", fragment));
            }

            if let Some(type_model) = model.type_model() {
                for property in type_model.properties() {
                    if property.name.contains(fragment.as_str()) {
                        report(format!(
                            "Property {} contains disallowed '{}'.",
                            property.name, fragment
                        ));
                    }
                }
            }
        }
    }
}
