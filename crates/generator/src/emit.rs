//! Source emission for the analyzed type graph
//!
//! Every registered resource, simple model and enum becomes one Java file
//! under `<base_dir>/src/main/java/<package path>/`. A failure to render or
//! write one type is recorded in the [`GenerationReport`] and the remaining
//! types are still emitted.

use crate::model::{ModelBase, ModelKind};
use crate::naming;
use crate::property::Property;
use crate::registry::ModelId;
use crate::resource::NameRequirements;
use crate::specification::Specification;
use crate::templates;
use provisioning_generator_common::{artifact_name, GeneratorError, Result};
use serde::Serialize;
use std::error::Error as _;
use std::fs;
use std::path::PathBuf;
use tera::{Context, Tera};
use tracing::{debug, error, info};

/// Base class of generated simple models without a base type
const PROVISIONING_OBJECT: &str = "ProvisioningObject";

/// Files written by [`Specification::generate`] and per-type failures
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<EmitFailure>,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug)]
pub struct EmitFailure {
    /// Emitted name of the type that failed
    pub model: String,
    pub error: GeneratorError,
}

#[derive(Serialize)]
struct PropertyView {
    field_name: String,
    accessor_name: String,
    param_name: String,
    bicep_type: String,
    plain_type: String,
    wrapper: &'static str,
    definition: String,
    description: String,
    read_only: bool,
    hide_accessors: bool,
}

#[derive(Serialize)]
struct VersionView {
    identifier: String,
    value: String,
}

#[derive(Serialize)]
struct DiscriminatorView {
    name: String,
    value: Option<String>,
}

#[derive(Serialize)]
struct MemberView {
    name: String,
    value: String,
}

impl Specification {
    /// Emit every generated type
    ///
    /// Only a broken template set is fatal; per-type failures are collected.
    pub fn generate(&self) -> Result<GenerationReport> {
        let tera = templates::load_templates()?;
        let mut report = GenerationReport::default();

        for (id, model) in self.registry().registered() {
            if !model.is_generated() {
                continue;
            }

            match self.emit(&tera, id) {
                Ok(path) => {
                    info!("Wrote {}", path.display());
                    report.written.push(path);
                },
                Err(e) => {
                    error!("Failed to generate {}: {}", model.type_name(), e);
                    report.failures.push(EmitFailure {
                        model: model.type_name(),
                        error: e,
                    });
                },
            }
        }

        Ok(report)
    }

    /// Write `pom.xml` under the base directory unless one already exists
    ///
    /// Returns whether the manifest was written.
    pub fn generate_manifest(&self) -> Result<bool> {
        let path = self.base_dir().join("pom.xml");
        if path.exists() {
            info!("{} already exists, skipping", path.display());
            return Ok(false);
        }

        let tera = templates::load_templates()?;
        let mut context = Context::new();
        context.insert("artifact_name", &artifact_name(self.provisioning_package()));
        context.insert("name", self.name());
        context.insert("provider", self.provider_name());
        context.insert("package", self.provisioning_package());
        let rendered = render(&tera, "pom.xml", &context)?;

        fs::create_dir_all(self.base_dir())?;
        fs::write(&path, rendered)?;
        info!("Wrote {}", path.display());
        Ok(true)
    }

    /// Render the source of one generated type without writing it
    pub fn render_model(&self, id: ModelId) -> Result<String> {
        let tera = templates::load_templates()?;
        self.render_with(&tera, id)
    }

    /// Where the source of a generated type is written
    pub fn source_path(&self, model: &ModelBase) -> PathBuf {
        let mut path = self.base_dir().join("src").join("main").join("java");
        for segment in model.package.split('.').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.join(format!("{}.java", model.type_name()))
    }

    fn emit(&self, tera: &Tera, id: ModelId) -> Result<PathBuf> {
        let rendered = self.render_with(tera, id)?;
        let path = self.source_path(self.registry().model(id));

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, rendered)?;
        Ok(path)
    }

    fn render_with(&self, tera: &Tera, id: ModelId) -> Result<String> {
        let model = self.registry().model(id);
        debug!("Rendering {}", model.qualified_name());

        match &model.kind {
            ModelKind::Resource(_) => render(tera, "resource.java", &self.resource_context(model)?),
            ModelKind::Simple(_) => render(tera, "model.java", &self.model_context(model)?),
            ModelKind::Enum(enumeration) => {
                let members: Vec<MemberView> = enumeration
                    .members()?
                    .into_iter()
                    .map(|(name, value)| MemberView { name, value })
                    .collect();
                let mut context = self.base_context(model);
                context.insert("members", &members);
                render(tera, "enum.java", &context)
            },
            _ => Err(GeneratorError::Generation(format!(
                "{} is not a generated type",
                model.qualified_name()
            ))),
        }
    }

    fn base_context(&self, model: &ModelBase) -> Context {
        let mut context = Context::new();
        context.insert("package", &model.package);
        context.insert("class_name", &model.type_name());
        context.insert(
            "description",
            &model
                .description
                .clone()
                .unwrap_or_else(|| format!("{}.", model.type_name())),
        );
        context
    }

    fn resource_context(&self, model: &ModelBase) -> Result<Context> {
        let resource = model.as_resource().ok_or_else(|| {
            GeneratorError::Generation(format!("{} is not a resource", model.name))
        })?;

        let mut context = self.base_context(model);
        context.insert("imports", &self.imports(model));
        context.insert("properties", &self.property_views(model));
        context.insert(
            "resource_type",
            &resource.full_type().unwrap_or_default(),
        );

        let versions: Vec<VersionView> = resource
            .versions
            .iter()
            .flatten()
            .map(|v| VersionView {
                identifier: naming::version_identifier(v),
                value: v.clone(),
            })
            .collect();
        context.insert("versions", &versions);
        context.insert(
            "default_version",
            &resource
                .default_version
                .as_deref()
                .map(naming::version_identifier),
        );
        context.insert(
            "parent_class",
            &resource.parent.map(|p| self.registry().model(p).type_name()),
        );
        context.insert(
            "name_requirements",
            &resource.name_requirements.as_ref().map(NameRequirementsView::from),
        );

        Ok(context)
    }

    fn model_context(&self, model: &ModelBase) -> Result<Context> {
        let type_model = model.type_model().ok_or_else(|| {
            GeneratorError::Generation(format!("{} has no properties", model.name))
        })?;

        let mut context = self.base_context(model);
        context.insert("imports", &self.imports(model));
        context.insert("properties", &self.property_views(model));
        context.insert(
            "base_class",
            &type_model
                .base_type
                .map(|base| self.registry().type_reference(base))
                .unwrap_or_else(|| PROVISIONING_OBJECT.to_string()),
        );
        context.insert(
            "discriminator",
            &type_model.discriminator.as_ref().map(|d| DiscriminatorView {
                name: d.name.clone(),
                value: d.value.clone(),
            }),
        );

        Ok(context)
    }

    /// Wildcard imports: referenced namespaces minus our own and `java.lang`
    fn imports(&self, model: &ModelBase) -> Vec<String> {
        let Some(type_model) = model.type_model() else {
            return Vec::new();
        };

        let referenced = type_model
            .properties()
            .iter()
            .map(|p| p.ty)
            .chain(type_model.base_type);

        self.registry()
            .collect_namespaces(referenced)
            .into_iter()
            .filter(|ns| ns != &model.package && ns != "java.lang")
            .collect()
    }

    fn property_views(&self, model: &ModelBase) -> Vec<PropertyView> {
        let Some(type_model) = model.type_model() else {
            return Vec::new();
        };

        type_model
            .properties()
            .iter()
            .map(|p| self.property_view(p))
            .collect()
    }

    fn property_view(&self, property: &Property) -> PropertyView {
        let registry = self.registry();
        let wrapper = match registry.model(property.ty).kind {
            ModelKind::List(_) => "BicepList",
            ModelKind::Dictionary(_) => "BicepDictionary",
            _ => "BicepValue",
        };

        PropertyView {
            field_name: property.field_name(),
            accessor_name: property.accessor_name(),
            param_name: naming::to_camel_case(&property.name),
            bicep_type: property.bicep_type_reference(registry),
            plain_type: property.plain_type_reference(registry),
            wrapper,
            definition: property.bicep_definition(registry),
            description: property
                .description
                .clone()
                .or_else(|| self.doc_comments().map(str::to_string))
                .unwrap_or_else(|| format!("Gets or sets the {}.", property.name)),
            read_only: property.read_only,
            hide_accessors: property.hide_accessors,
        }
    }
}

#[derive(Serialize)]
struct NameRequirementsView {
    min_length: usize,
    max_length: usize,
    lower: bool,
    upper: bool,
    digits: bool,
    hyphen: bool,
    underscore: bool,
    period: bool,
    parens: bool,
}

impl From<&NameRequirements> for NameRequirementsView {
    fn from(r: &NameRequirements) -> Self {
        Self {
            min_length: r.min_length,
            max_length: r.max_length,
            lower: r.lower,
            upper: r.upper,
            digits: r.digits,
            hyphen: r.hyphen,
            underscore: r.underscore,
            period: r.period,
            parens: r.parens,
        }
    }
}

fn render(tera: &Tera, template: &str, context: &Context) -> Result<String> {
    tera.render(template, context).map_err(|e| {
        // Tera puts the useful part of the message in the source chain
        let mut message = e.to_string();
        let mut source = e.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        GeneratorError::Generation(format!("Template error: {}", message))
    })
}
