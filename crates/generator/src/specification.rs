//! Specification analysis: builds the provisioning type graph for one
//! client model
//!
//! One [`Specification`] owns one [`TypeRegistry`]. `analyze` turns every
//! creatable resource of a [`ClientModel`] into a [`Resource`], resolves the
//! types of their properties recursively and back-fills API versions from a
//! [`ResourceCatalog`]. Customization, lint and generation then operate on
//! the finished graph.

use crate::emit::GenerationReport;
use crate::lint::LintWarning;
use crate::model::ModelBase;
use crate::property::Property;
use crate::registry::{BackingRef, ModelId, TypeRegistry};
use crate::resource::{NameRequirements, Resource};
use crate::resource_id::{url_key, ResourceIdTemplate};
use crate::type_model::DiscriminatorValue;
use provisioning_generator_common::{
    artifact_name, ClientModel, GeneratorConfig, GeneratorError, ResourceCatalog, Result,
    SourceModel, SourceModelKind, SourceProperty, WireType,
};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Wire properties a resource inherits from the ARM envelope
const IDENTITY_PROPERTIES: [&str; 2] = ["id", "type"];

/// Recoverable findings of [`Specification::analyze`]
#[derive(Debug, Default)]
pub struct AnalysisReport {
    /// Namespaces whose catalog lookup failed; their resources stay unversioned
    pub version_failures: Vec<VersionLookupFailure>,
    /// Resources whose create path lives under another scope
    pub scoped_resources: Vec<String>,
    /// Resources whose create path could not be read as a resource id
    pub unresolved_resources: Vec<UnresolvedResource>,
    /// Differently typed properties dropped because their name was taken
    pub property_conflicts: Vec<PropertyConflict>,
}

impl AnalysisReport {
    pub fn is_clean(&self) -> bool {
        self.version_failures.is_empty()
            && self.scoped_resources.is_empty()
            && self.unresolved_resources.is_empty()
            && self.property_conflicts.is_empty()
    }
}

#[derive(Debug)]
pub struct VersionLookupFailure {
    pub namespace: String,
    pub error: GeneratorError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedResource {
    pub name: String,
    pub path: String,
}

/// Two properties of one model share a name but not a type; the first one
/// declared is kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyConflict {
    /// Emitted name of the owning model
    pub model: String,
    pub property: String,
    /// Dotted wire path and type of the property that was kept
    pub kept_path: String,
    pub kept_type: String,
    /// Dotted wire path and type of the property that was dropped
    pub dropped_path: String,
    pub dropped_type: String,
}

/// Everything one `build` run produced
#[derive(Debug, Default)]
pub struct BuildReport {
    pub analysis: AnalysisReport,
    pub lint: Vec<LintWarning>,
    /// Whether the manifest was written (false when it already existed)
    pub manifest_written: bool,
    pub generation: GenerationReport,
}

/// Hook run between analysis and lint to adjust the generated graph
pub trait SpecCustomizer {
    fn customize(&self, spec: &mut Specification) -> Result<()>;
}

impl<F> SpecCustomizer for F
where
    F: Fn(&mut Specification) -> Result<()>,
{
    fn customize(&self, spec: &mut Specification) -> Result<()> {
        self(spec)
    }
}

/// Leaves the analyzed graph untouched
pub struct NoCustomization;

impl SpecCustomizer for NoCustomization {
    fn customize(&self, _spec: &mut Specification) -> Result<()> {
        Ok(())
    }
}

/// Source models of a client model by qualified name
struct SourceIndex<'a> {
    models: HashMap<String, &'a SourceModel>,
}

impl<'a> SourceIndex<'a> {
    fn new(source: &'a ClientModel) -> Self {
        Self {
            models: source
                .models
                .iter()
                .map(|m| (m.qualified_name(), m))
                .collect(),
        }
    }

    fn get(&self, qualified_name: &str) -> Result<&'a SourceModel> {
        self.models
            .get(qualified_name)
            .copied()
            .ok_or_else(|| GeneratorError::UnknownModel(qualified_name.to_string()))
    }

    fn base_of(&self, model: &SourceModel) -> Option<&'a SourceModel> {
        match &model.kind {
            SourceModelKind::Object {
                base: Some(base), ..
            } => self.models.get(base).copied(),
            _ => None,
        }
    }
}

/// A provisioning library being generated from one client model
#[derive(Debug)]
pub struct Specification {
    name: String,
    provisioning_package: String,
    provider_name: String,
    base_dir: PathBuf,
    doc_comments: Option<String>,
    pub(crate) disallowed_fragments: Vec<String>,
    registry: TypeRegistry,
    resources: Vec<ModelId>,
    /// Generated models by source name
    model_names: HashMap<String, ModelId>,
    /// Resources by normalized create path
    url_paths: HashMap<String, ModelId>,
    pub(crate) property_conflicts: Vec<PropertyConflict>,
}

impl Specification {
    pub fn new(config: &GeneratorConfig) -> Self {
        let info = &config.specification;
        Self {
            name: info.name.clone(),
            provisioning_package: info.package.clone(),
            provider_name: info.provider.clone(),
            base_dir: config
                .output
                .base_dir
                .join("sdk")
                .join(artifact_name(&info.package)),
            doc_comments: info.doc_comments.clone(),
            disallowed_fragments: config.lint.disallowed_name_fragments.clone(),
            registry: TypeRegistry::new(),
            resources: Vec::new(),
            model_names: HashMap::new(),
            url_paths: HashMap::new(),
            property_conflicts: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn provisioning_package(&self) -> &str {
        &self.provisioning_package
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    /// `<output>/sdk/<artifact>`
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn doc_comments(&self) -> Option<&str> {
        self.doc_comments.as_deref()
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Analyzed resources in source order
    pub fn resources(&self) -> &[ModelId] {
        &self.resources
    }

    pub fn resource(&self, id: ModelId) -> Option<&Resource> {
        self.registry.model(id).as_resource()
    }

    /// Generated model (resource, simple model or enum) by source name
    pub fn model_id(&self, name: &str) -> Option<ModelId> {
        self.model_names.get(name).copied()
    }

    pub fn model(&self, name: &str) -> Option<&ModelBase> {
        self.model_id(name).map(|id| self.registry.model(id))
    }

    fn resource_package(&self) -> String {
        format!("{}.generated", self.provisioning_package)
    }

    fn models_package(&self) -> String {
        format!("{}.generated.models", self.provisioning_package)
    }

    /// Run analysis, customization, lint, manifest and generation
    pub fn build(
        &mut self,
        source: &ClientModel,
        catalog: &dyn ResourceCatalog,
    ) -> Result<BuildReport> {
        self.build_with(source, catalog, &NoCustomization)
    }

    pub fn build_with(
        &mut self,
        source: &ClientModel,
        catalog: &dyn ResourceCatalog,
        customizer: &dyn SpecCustomizer,
    ) -> Result<BuildReport> {
        let analysis = self.analyze(source, catalog)?;
        customizer.customize(self)?;
        let lint = self.lint();
        let manifest_written = self.generate_manifest()?;
        let generation = self.generate()?;

        Ok(BuildReport {
            analysis,
            lint,
            manifest_written,
            generation,
        })
    }

    /// Build the type graph for every creatable resource of `source`
    pub fn analyze(
        &mut self,
        source: &ClientModel,
        catalog: &dyn ResourceCatalog,
    ) -> Result<AnalysisReport> {
        if !self.resources.is_empty() {
            return Err(GeneratorError::Generation(format!(
                "Specification {} has already been analyzed",
                self.name
            )));
        }

        let index = SourceIndex::new(source);
        let mut report = AnalysisReport::default();

        let creatable = self.find_creatable_resources(source, &index)?;
        debug!(
            "{} of {} resources are creatable",
            creatable.len(),
            source.resources.len()
        );

        // Register every resource before resolving anything so that
        // properties referencing another resource's model find it
        for (model, path, description) in &creatable {
            let backing = BackingRef::Model(model.qualified_name());
            let resource = ModelBase::resource(
                &model.name,
                &self.resource_package(),
                backing,
                Resource::new(*path),
            )
            .with_description(description.clone().or_else(|| model.description.clone()));

            let id = self.registry.add(resource)?;
            self.name_model(&model.name, id)?;
            self.resources.push(id);

            let key = url_key(path);
            if let Some(&existing) = self.url_paths.get(&key) {
                warn!(
                    "{} and {} share the create path {}; children resolve to {}",
                    self.registry.model(existing).name,
                    model.name,
                    path,
                    self.registry.model(existing).name
                );
            } else {
                self.url_paths.insert(key, id);
            }
        }

        let ids = self.resources.clone();
        let mut parents: Vec<(ModelId, String)> = Vec::new();
        for (&id, (model, path, _)) in ids.iter().zip(&creatable) {
            if ResourceIdTemplate::is_scoped(path) {
                debug!("{} is a scoped resource: {}", model.name, path);
                self.resource_mut(id)?.scoped = true;
                report.scoped_resources.push(model.name.clone());
                continue;
            }

            let Some(template) = ResourceIdTemplate::parse(path) else {
                warn!("Cannot parse resource id template for {}: {}", model.name, path);
                report.unresolved_resources.push(UnresolvedResource {
                    name: model.name.clone(),
                    path: path.to_string(),
                });
                continue;
            };

            let resource = self.resource_mut(id)?;
            resource.provider_namespace = Some(template.namespace().to_string());
            resource.resource_type = Some(template.resource_type());
            if let Some(parent_path) = template.parent_path() {
                parents.push((id, parent_path));
            }
        }

        for (id, parent_path) in parents {
            match self.url_paths.get(&url_key(&parent_path)).copied() {
                Some(parent) if parent != id => self.resource_mut(id)?.parent = Some(parent),
                _ => debug!(
                    "No parent resource registered at {} for {}",
                    parent_path,
                    self.registry.model(id).name
                ),
            }
        }

        for (&id, (model, _, _)) in ids.iter().zip(&creatable) {
            let properties = self.resource_properties(&index, model, id)?;
            self.assign_properties(id, properties);
            self.resource_mut(id)?.type_model.discriminator = discriminator_of(model);
        }

        self.resolve_versions(catalog, &mut report);
        report.property_conflicts = self.property_conflicts.clone();

        info!(
            "Analyzed {}: {} resources, {} registered models",
            self.name,
            self.resources.len(),
            self.registry.registered().count()
        );

        Ok(report)
    }

    /// Resources with a create operation, with their source model
    fn find_creatable_resources<'a>(
        &self,
        source: &'a ClientModel,
        index: &SourceIndex<'a>,
    ) -> Result<Vec<(&'a SourceModel, &'a str, Option<String>)>> {
        let mut creatable: Vec<(&'a SourceModel, &'a str, Option<String>)> = Vec::new();
        for resource in &source.resources {
            let Some(create) = &resource.create else {
                debug!("Skipping {}: no create operation", resource.model);
                continue;
            };

            let model = index.get(&resource.model)?;
            if model.is_enum() {
                return Err(GeneratorError::Generation(format!(
                    "Resource {} is backed by an enum",
                    resource.model
                )));
            }

            // A model with several create operations is one resource
            if let Some((_, first, _)) = creatable
                .iter()
                .find(|(m, _, _)| m.qualified_name() == model.qualified_name())
            {
                warn!(
                    "{} has more than one create operation; keeping {} and ignoring {}",
                    resource.model, first, create.path
                );
                continue;
            }
            creatable.push((model, create.path.as_str(), resource.description.clone()));
        }

        let resource_models: BTreeSet<String> = creatable
            .iter()
            .map(|(model, _, _)| model.qualified_name())
            .collect();
        for (model, _, _) in &creatable {
            if let Some(base) = index.base_of(model) {
                if resource_models.contains(&base.qualified_name()) {
                    return Err(GeneratorError::Generation(format!(
                        "Unexpected derived resource {} of {}",
                        model.qualified_name(),
                        base.qualified_name()
                    )));
                }
            }
        }

        Ok(creatable)
    }

    fn name_model(&mut self, name: &str, id: ModelId) -> Result<()> {
        if let Some(existing) = self.model_names.insert(name.to_string(), id) {
            return Err(GeneratorError::Generation(format!(
                "Model name {} is used by both {} and {}",
                name,
                self.registry.model(existing).qualified_name(),
                self.registry.model(id).qualified_name()
            )));
        }
        Ok(())
    }

    fn resource_mut(&mut self, id: ModelId) -> Result<&mut Resource> {
        let model = self.registry.model_mut(id);
        let name = model.name.clone();
        model
            .as_resource_mut()
            .ok_or_else(|| GeneratorError::Generation(format!("{} is not a resource", name)))
    }

    /// Properties of a resource: its own wire properties, then those of its
    /// base chain, without the identity envelope
    fn resource_properties(
        &mut self,
        index: &SourceIndex<'_>,
        model: &SourceModel,
        owner: ModelId,
    ) -> Result<Vec<Property>> {
        let mut properties = Vec::new();
        let mut visited = vec![model.qualified_name()];
        let mut current = Some(model);

        while let Some(source) = current {
            properties.extend(self.resolve_properties(index, source, owner, true, &[], &mut visited)?);
            current = index.base_of(source);
            if let Some(base) = current {
                if visited.contains(&base.qualified_name()) {
                    break;
                }
                visited.push(base.qualified_name());
            }
        }

        Ok(properties)
    }

    /// Resolve the wire properties of one source model, inlining flattened
    /// ones under `prefix`
    fn resolve_properties(
        &mut self,
        index: &SourceIndex<'_>,
        source: &SourceModel,
        owner: ModelId,
        skip_identity: bool,
        prefix: &[String],
        flattening: &mut Vec<String>,
    ) -> Result<Vec<Property>> {
        let SourceModelKind::Object { properties, .. } = &source.kind else {
            return Ok(Vec::new());
        };

        let mut resolved = Vec::new();
        for wire in properties {
            if skip_identity && IDENTITY_PROPERTIES.contains(&wire.name.as_str()) {
                continue;
            }

            let mut path = prefix.to_vec();
            path.push(wire.serialized_name.clone());

            if wire.flatten {
                if let WireType::Model(target) = &wire.ty {
                    let target_model = index.get(target)?;
                    if !target_model.is_enum() {
                        if flattening.contains(target) {
                            return Err(GeneratorError::Generation(format!(
                                "Cyclic flattening of {} through {}.{}",
                                target, source.name, wire.name
                            )));
                        }
                        flattening.push(target.clone());
                        let inlined = self.resolve_properties(
                            index,
                            target_model,
                            owner,
                            false,
                            &path,
                            flattening,
                        )?;
                        flattening.pop();
                        resolved.extend(inlined);
                        continue;
                    }
                }
                warn!(
                    "{}.{} is marked flatten but is not an object model",
                    source.name, wire.name
                );
            }

            let ty = self.get_property_type(index, &wire.ty, owner)?;
            resolved.push(to_property(wire, ty, path));
        }

        Ok(resolved)
    }

    /// Resolve a wire type to a model in the registry, creating and
    /// registering it on first use
    fn get_property_type(
        &mut self,
        index: &SourceIndex<'_>,
        wire: &WireType,
        owner: ModelId,
    ) -> Result<ModelId> {
        match wire {
            WireType::Primitive(primitive) => {
                self.external_model(primitive.type_name(), primitive.package())
            },
            WireType::External { name, package } => self.external_model(name, package),
            WireType::List(element) => {
                let element = self.get_property_type(index, element, owner)?;
                Ok(self.registry.insert(ModelBase::list(element)))
            },
            WireType::Map(value) => {
                let value = self.get_property_type(index, value, owner)?;
                Ok(self.registry.insert(ModelBase::dictionary(value)))
            },
            WireType::Model(qualified_name) => {
                let backing = BackingRef::Model(qualified_name.clone());
                if let Some(id) = self.registry.get(&backing) {
                    return Ok(id);
                }

                let source = index.get(qualified_name)?;
                match &source.kind {
                    SourceModelKind::Enum { values } => self.enum_model(source, values),
                    SourceModelKind::Object { .. } => self.simple_model(index, source, owner),
                }
            },
            WireType::Unsupported(expression) => Err(GeneratorError::UnsupportedType(format!(
                "{} (reached from {})",
                expression,
                self.registry.model(owner).name
            ))),
        }
    }

    fn external_model(&mut self, name: &str, package: &str) -> Result<ModelId> {
        let model = ModelBase::external(name, package);
        if let Some(id) = model.backing.as_ref().and_then(|b| self.registry.get(b)) {
            return Ok(id);
        }
        self.registry.add(model)
    }

    fn enum_model(&mut self, source: &SourceModel, values: &[String]) -> Result<ModelId> {
        // Enums are emitted by name, so two sources with one name share a model
        if let Some(id) = self.model_id(&source.name) {
            if self.registry.model(id).as_enum().is_some() {
                return Ok(id);
            }
        }

        let model = ModelBase::enumeration(
            &source.name,
            &self.models_package(),
            BackingRef::Model(source.qualified_name()),
            values.to_vec(),
        )
        .with_description(source.description.clone());
        let id = self.registry.add(model)?;
        self.name_model(&source.name, id)?;
        debug!("Registered enum {}", source.name);
        Ok(id)
    }

    fn simple_model(
        &mut self,
        index: &SourceIndex<'_>,
        source: &SourceModel,
        owner: ModelId,
    ) -> Result<ModelId> {
        let qualified_name = source.qualified_name();
        let model = ModelBase::simple(
            &source.name,
            &self.models_package(),
            BackingRef::Model(qualified_name.clone()),
        )
        .with_description(source.description.clone());

        // Registered before its properties resolve so cycles end here
        let id = self.registry.add(model)?;
        self.name_model(&source.name, id)?;
        debug!("Registered model {}", source.name);

        let base_type = match &source.kind {
            SourceModelKind::Object {
                base: Some(base), ..
            } => Some(self.get_property_type(index, &WireType::Model(base.clone()), owner)?),
            _ => None,
        };

        let mut flattening = vec![qualified_name];
        let properties =
            self.resolve_properties(index, source, owner, false, &[], &mut flattening)?;

        self.assign_properties(id, properties);
        if let Some(type_model) = self.registry.model_mut(id).type_model_mut() {
            type_model.base_type = base_type;
            type_model.discriminator = discriminator_of(source);
        }

        Ok(id)
    }

    /// Set the properties of a composite model, recording every dropped
    /// property whose type differs from the one kept under its name
    fn assign_properties(&mut self, id: ModelId, properties: Vec<Property>) {
        let Some(type_model) = self.registry.model_mut(id).type_model_mut() else {
            return;
        };
        let dropped = type_model.set_properties(properties);

        let model = self.registry.model(id);
        let Some(type_model) = model.type_model() else {
            return;
        };
        for property in dropped {
            let Some(kept) = type_model.property(&property.name) else {
                continue;
            };
            let kept_type = self.registry.type_reference(kept.ty);
            let dropped_type = self.registry.type_reference(property.ty);
            if kept_type == dropped_type {
                debug!("Merged duplicate property {}.{}", model.name, property.name);
                continue;
            }

            let conflict = PropertyConflict {
                model: model.type_name(),
                property: property.name.clone(),
                kept_path: kept.path.join("."),
                kept_type,
                dropped_path: property.path.join("."),
                dropped_type,
            };
            warn!(
                "{}: property {} at {} ({}) dropped in favour of {} ({})",
                conflict.model,
                conflict.property,
                conflict.dropped_path,
                conflict.dropped_type,
                conflict.kept_path,
                conflict.kept_type
            );
            self.property_conflicts.push(conflict);
        }
    }

    /// Query the catalog once per provider namespace and apply versions
    fn resolve_versions(&mut self, catalog: &dyn ResourceCatalog, report: &mut AnalysisReport) {
        let namespaces: BTreeSet<String> = self
            .resources
            .iter()
            .filter_map(|&id| self.resource(id)?.provider_namespace.clone())
            .collect();

        for namespace in namespaces {
            let resource_types = match catalog.resource_types(&namespace) {
                Ok(resource_types) => resource_types,
                Err(error) => {
                    warn!("Failed to look up resource types of {}: {}", namespace, error);
                    report
                        .version_failures
                        .push(VersionLookupFailure { namespace, error });
                    continue;
                },
            };

            for &id in &self.resources {
                let Some(resource) = self.registry.model_mut(id).as_resource_mut() else {
                    continue;
                };
                if !resource
                    .provider_namespace
                    .as_deref()
                    .is_some_and(|ns| ns.eq_ignore_ascii_case(&namespace))
                {
                    continue;
                }

                let resource_type = resource.resource_type.clone().unwrap_or_default();
                if let Some(listing) = resource_types
                    .iter()
                    .find(|t| t.resource_type.eq_ignore_ascii_case(&resource_type))
                {
                    resource.apply_versions(&listing.api_versions);
                }
            }
        }
    }

    /// Apply `f` to a generated model
    pub fn customize_model<F>(&mut self, name: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut ModelBase),
    {
        let id = self.require_model(name)?;
        f(self.registry.model_mut(id));
        Ok(())
    }

    /// Apply `f` to one property of a generated model
    pub fn customize_property<F>(&mut self, model: &str, property: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut Property),
    {
        let id = self.require_model(model)?;
        let target = self
            .registry
            .model_mut(id)
            .type_model_mut()
            .and_then(|t| t.property_mut(property))
            .ok_or_else(|| {
                GeneratorError::Generation(format!(
                    "Failed to find {}.{} to customize",
                    model, property
                ))
            })?;
        f(target);
        Ok(())
    }

    pub fn remove_property(&mut self, model: &str, property: &str) -> Result<Property> {
        let id = self.require_model(model)?;
        self.registry
            .model_mut(id)
            .type_model_mut()
            .and_then(|t| t.remove_property(property))
            .ok_or_else(|| {
                GeneratorError::Generation(format!(
                    "Failed to find property {} on {} to remove",
                    property, model
                ))
            })
    }

    pub fn set_name_requirements(
        &mut self,
        resource: &str,
        requirements: NameRequirements,
    ) -> Result<()> {
        let id = self.require_model(resource)?;
        let target = self.resource_mut(id)?;
        target.name_requirements = Some(requirements);
        Ok(())
    }

    fn require_model(&self, name: &str) -> Result<ModelId> {
        self.model_id(name).ok_or_else(|| {
            GeneratorError::Generation(format!("Failed to find {} to customize", name))
        })
    }
}

fn to_property(wire: &SourceProperty, ty: ModelId, path: Vec<String>) -> Property {
    let mut property = Property::new(wire.name.clone(), ty)
        .with_path(path)
        .with_description(wire.description.clone());
    property.required = wire.required;
    property.read_only = wire.read_only;
    property.secure = wire.secure;
    property
}

fn discriminator_of(source: &SourceModel) -> Option<DiscriminatorValue> {
    match &source.kind {
        SourceModelKind::Object {
            discriminator: Some(d),
            ..
        } => Some(DiscriminatorValue {
            name: d.property.clone(),
            value: d.value.clone(),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelKind;
    use mockall::mock;
    use provisioning_generator_common::{
        CreateOperation, Discriminator, PrimitiveType, ResourceTypeVersions, SourceResource,
    };

    mock! {
        pub Catalog {}

        impl ResourceCatalog for Catalog {
            fn resource_types(&self, namespace: &str) -> Result<Vec<ResourceTypeVersions>>;
        }
    }

    const PKG: &str = "com.foo";

    fn config() -> GeneratorConfig {
        GeneratorConfig::new("Foo", "com.azure.provisioning.foo", "Microsoft.Foo")
    }

    fn object(name: &str, properties: Vec<SourceProperty>) -> SourceModel {
        SourceModel {
            name: name.to_string(),
            package: PKG.to_string(),
            description: None,
            kind: SourceModelKind::Object {
                properties,
                base: None,
                discriminator: None,
            },
        }
    }

    fn enumeration(name: &str, values: &[&str]) -> SourceModel {
        SourceModel {
            name: name.to_string(),
            package: PKG.to_string(),
            description: None,
            kind: SourceModelKind::Enum {
                values: values.iter().map(|v| v.to_string()).collect(),
            },
        }
    }

    fn prop(name: &str, ty: WireType) -> SourceProperty {
        SourceProperty {
            name: name.to_string(),
            serialized_name: name.to_string(),
            ty,
            required: false,
            read_only: false,
            secure: false,
            flatten: false,
            description: None,
        }
    }

    fn model_ref(name: &str) -> WireType {
        WireType::Model(format!("{}.{}", PKG, name))
    }

    fn string() -> WireType {
        WireType::Primitive(PrimitiveType::String)
    }

    fn resource(model: &str, path: &str) -> SourceResource {
        SourceResource {
            model: format!("{}.{}", PKG, model),
            create: Some(CreateOperation {
                path: path.to_string(),
            }),
            description: None,
        }
    }

    fn client(resources: Vec<SourceResource>, models: Vec<SourceModel>) -> ClientModel {
        ClientModel {
            provider: "Microsoft.Foo".to_string(),
            package: PKG.to_string(),
            resources,
            models,
        }
    }

    fn empty_catalog() -> MockCatalog {
        let mut catalog = MockCatalog::new();
        catalog.expect_resource_types().returning(|_| Ok(vec![]));
        catalog
    }

    #[test]
    fn test_mutually_recursive_models_resolve_once() {
        let source = client(
            vec![resource("Holder", "/providers/Microsoft.Foo/holders/{h}")],
            vec![
                object("Holder", vec![prop("a", model_ref("A"))]),
                object("A", vec![prop("b", model_ref("B"))]),
                object("B", vec![prop("a", model_ref("A"))]),
            ],
        );

        let mut spec = Specification::new(&config());
        spec.analyze(&source, &empty_catalog()).unwrap();

        let a = spec.model_id("A").unwrap();
        let b = spec.model_id("B").unwrap();
        let a_props = spec.registry().model(a).type_model().unwrap().properties();
        let b_props = spec.registry().model(b).type_model().unwrap().properties();
        assert_eq!(a_props.len(), 1);
        assert_eq!(a_props[0].ty, b);
        assert_eq!(b_props.len(), 1);
        assert_eq!(b_props[0].ty, a);

        let names: Vec<_> = spec
            .registry()
            .registered()
            .filter(|(_, m)| m.name == "A" || m.name == "B")
            .collect();
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_list_of_list_of_string() {
        let source = client(
            vec![resource("Holder", "/providers/Microsoft.Foo/holders/{h}")],
            vec![object(
                "Holder",
                vec![prop(
                    "matrix",
                    WireType::List(Box::new(WireType::List(Box::new(string())))),
                )],
            )],
        );

        let mut spec = Specification::new(&config());
        spec.analyze(&source, &empty_catalog()).unwrap();

        let holder = spec.model("Holder").unwrap();
        let matrix = holder.type_model().unwrap().property("matrix").unwrap().ty;
        let registry = spec.registry();
        let ModelKind::List(inner) = registry.model(matrix).kind else {
            panic!("expected list");
        };
        let ModelKind::List(element) = registry.model(inner).kind else {
            panic!("expected nested list");
        };
        assert!(registry.model(element).external);
        assert_eq!(registry.model(element).name, "String");
        assert_eq!(registry.type_reference(matrix), "List<List<String>>");
    }

    #[test]
    fn test_enum_shared_by_two_models_registers_once() {
        let source = client(
            vec![resource("Holder", "/providers/Microsoft.Foo/holders/{h}")],
            vec![
                object(
                    "Holder",
                    vec![prop("first", model_ref("First")), prop("second", model_ref("Second"))],
                ),
                object("First", vec![prop("tier", model_ref("Tier"))]),
                object("Second", vec![prop("tier", model_ref("Tier"))]),
                enumeration("Tier", &["Hot", "Cool"]),
            ],
        );

        let mut spec = Specification::new(&config());
        spec.analyze(&source, &empty_catalog()).unwrap();

        let enums: Vec<_> = spec
            .registry()
            .registered()
            .filter(|(_, m)| m.as_enum().is_some())
            .collect();
        assert_eq!(enums.len(), 1);
        assert_eq!(enums[0].1.package, "com.azure.provisioning.foo.generated.models");
    }

    #[test]
    fn test_resources_skip_identity_and_include_base() {
        let tracked = object(
            "TrackedResource",
            vec![prop("id", string()), prop("type", string()), prop("location", string())],
        );
        let mut vault = object("Vault", vec![prop("name", string())]);
        if let SourceModelKind::Object { base, .. } = &mut vault.kind {
            *base = Some(format!("{}.TrackedResource", PKG));
        }

        let source = client(
            vec![resource(
                "Vault",
                "/subscriptions/{s}/resourceGroups/{rg}/providers/Microsoft.Foo/vaults/{v}",
            )],
            vec![vault, tracked],
        );

        let mut spec = Specification::new(&config());
        spec.analyze(&source, &empty_catalog()).unwrap();

        let names: Vec<_> = spec
            .model("Vault")
            .unwrap()
            .type_model()
            .unwrap()
            .properties()
            .iter()
            .map(|p| p.name.clone())
            .collect();
        assert_eq!(names, vec!["name", "location"]);
    }

    #[test]
    fn test_flattened_properties_carry_prefixed_path() {
        let mut bag = prop("properties", model_ref("VaultProperties"));
        bag.flatten = true;
        let source = client(
            vec![resource("Vault", "/providers/Microsoft.Foo/vaults/{v}")],
            vec![
                object("Vault", vec![prop("location", string()), bag]),
                object("VaultProperties", vec![prop("tenantId", string())]),
            ],
        );

        let mut spec = Specification::new(&config());
        spec.analyze(&source, &empty_catalog()).unwrap();

        let vault = spec.model("Vault").unwrap().type_model().unwrap();
        let tenant = vault.property("tenantId").unwrap();
        assert_eq!(tenant.path, vec!["properties", "tenantId"]);
        assert!(vault.property("properties").is_none());
        assert!(spec.model("VaultProperties").is_none());
    }

    #[test]
    fn test_unsupported_wire_type_is_fatal() {
        let source = client(
            vec![resource("Holder", "/providers/Microsoft.Foo/holders/{h}")],
            vec![object(
                "Holder",
                vec![prop("odd", WireType::Unsupported("set<string>".to_string()))],
            )],
        );

        let mut spec = Specification::new(&config());
        let err = spec.analyze(&source, &empty_catalog()).unwrap_err();
        assert!(matches!(err, GeneratorError::UnsupportedType(_)));
    }

    #[test]
    fn test_unknown_model_reference_is_fatal() {
        let source = client(
            vec![resource("Holder", "/providers/Microsoft.Foo/holders/{h}")],
            vec![object("Holder", vec![prop("missing", model_ref("Missing"))])],
        );

        let mut spec = Specification::new(&config());
        let err = spec.analyze(&source, &empty_catalog()).unwrap_err();
        assert!(matches!(err, GeneratorError::UnknownModel(_)));
    }

    #[test]
    fn test_derived_resource_is_fatal() {
        let base = object("Parent", vec![]);
        let mut derived = object("Derived", vec![]);
        if let SourceModelKind::Object { base, .. } = &mut derived.kind {
            *base = Some(format!("{}.Parent", PKG));
        }
        let source = client(
            vec![
                resource("Parent", "/providers/Microsoft.Foo/parents/{p}"),
                resource("Derived", "/providers/Microsoft.Foo/deriveds/{d}"),
            ],
            vec![base, derived],
        );

        let mut spec = Specification::new(&config());
        assert!(spec.analyze(&source, &empty_catalog()).is_err());
    }

    #[test]
    fn test_versions_and_parent() {
        let source = client(
            vec![
                resource("Parent", "/providers/Microsoft.Foo/parents/{p}"),
                resource("Child", "/providers/Microsoft.Foo/parents/{parentName}/children/{c}"),
                resource("Orphan", "/providers/Microsoft.Foo/missing/{m}/orphans/{o}"),
            ],
            vec![object("Parent", vec![]), object("Child", vec![]), object("Orphan", vec![])],
        );

        let mut catalog = MockCatalog::new();
        catalog
            .expect_resource_types()
            .withf(|ns: &str| ns == "Microsoft.Foo")
            .times(1)
            .returning(|_| {
                Ok(vec![ResourceTypeVersions {
                    resource_type: "parents".to_string(),
                    api_versions: vec![
                        "2020-01-01-preview".to_string(),
                        "2019-01-01".to_string(),
                        "2021-01-01".to_string(),
                    ],
                }])
            });

        let mut spec = Specification::new(&config());
        let report = spec.analyze(&source, &catalog).unwrap();
        assert!(report.is_clean());

        let parent_id = spec.model_id("Parent").unwrap();
        let parent = spec.resource(parent_id).unwrap();
        assert_eq!(parent.default_version.as_deref(), Some("2021-01-01"));
        assert_eq!(
            parent.versions.as_deref(),
            Some(&["2019-01-01".to_string(), "2021-01-01".to_string()][..])
        );

        let child = spec.resource(spec.model_id("Child").unwrap()).unwrap();
        assert_eq!(child.parent, Some(parent_id));
        assert_eq!(child.resource_type.as_deref(), Some("parents/children"));
        assert!(child.versions.is_none());

        let orphan = spec.resource(spec.model_id("Orphan").unwrap()).unwrap();
        assert!(orphan.parent.is_none());
    }

    #[test]
    fn test_version_lookup_failure_is_recorded() {
        let source = client(
            vec![resource("Parent", "/providers/Microsoft.Foo/parents/{p}")],
            vec![object("Parent", vec![])],
        );

        let mut catalog = MockCatalog::new();
        catalog
            .expect_resource_types()
            .returning(|_| Err(GeneratorError::Catalog("unreachable".to_string())));

        let mut spec = Specification::new(&config());
        let report = spec.analyze(&source, &catalog).unwrap();
        assert_eq!(report.version_failures.len(), 1);
        assert_eq!(report.version_failures[0].namespace, "Microsoft.Foo");
        assert!(spec
            .resource(spec.model_id("Parent").unwrap())
            .unwrap()
            .default_version
            .is_none());
    }

    #[test]
    fn test_scoped_resources_are_reported() {
        let source = client(
            vec![resource(
                "Assignment",
                "/{scope}/providers/Microsoft.Authorization/roleAssignments/{name}",
            )],
            vec![object("Assignment", vec![])],
        );

        let mut catalog = MockCatalog::new();
        catalog.expect_resource_types().never();

        let mut spec = Specification::new(&config());
        let report = spec.analyze(&source, &catalog).unwrap();
        assert_eq!(report.scoped_resources, vec!["Assignment"]);

        let assignment = spec.resource(spec.model_id("Assignment").unwrap()).unwrap();
        assert!(assignment.scoped);
        assert!(assignment.provider_namespace.is_none());
    }

    #[test]
    fn test_resources_without_create_are_skipped() {
        let mut usage = resource("Usage", "");
        usage.create = None;
        let source = client(vec![usage], vec![object("Usage", vec![])]);

        let mut spec = Specification::new(&config());
        spec.analyze(&source, &empty_catalog()).unwrap();
        assert!(spec.resources().is_empty());
        assert!(spec.model("Usage").is_none());
    }

    #[test]
    fn test_discriminator_is_carried() {
        let mut fish = object("Fish", vec![prop("kind", string())]);
        if let SourceModelKind::Object { discriminator, .. } = &mut fish.kind {
            *discriminator = Some(Discriminator {
                property: "kind".to_string(),
                value: None,
            });
        }
        let source = client(
            vec![resource("Tank", "/providers/Microsoft.Foo/tanks/{t}")],
            vec![object("Tank", vec![prop("fish", model_ref("Fish"))]), fish],
        );

        let mut spec = Specification::new(&config());
        spec.analyze(&source, &empty_catalog()).unwrap();
        let discriminator = spec
            .model("Fish")
            .unwrap()
            .type_model()
            .unwrap()
            .discriminator
            .clone()
            .unwrap();
        assert_eq!(discriminator.name, "kind");
        assert!(discriminator.value.is_none());
    }

    #[test]
    fn test_customization_helpers() {
        let source = client(
            vec![resource("Vault", "/providers/Microsoft.Foo/vaults/{v}")],
            vec![object("Vault", vec![prop("name", string()), prop("legacy", string())])],
        );

        let mut spec = Specification::new(&config());
        spec.analyze(&source, &empty_catalog()).unwrap();

        spec.customize_property("Vault", "name", |p| p.required = true)
            .unwrap();
        spec.remove_property("Vault", "legacy").unwrap();
        spec.customize_model("Vault", |m| m.description = Some("A vault".to_string()))
            .unwrap();

        let vault = spec.model("Vault").unwrap();
        assert_eq!(vault.description.as_deref(), Some("A vault"));
        let properties = vault.type_model().unwrap().properties();
        assert_eq!(properties.len(), 1);
        assert!(properties[0].required);

        assert!(spec.remove_property("Vault", "legacy").is_err());
        assert!(spec.customize_model("Nope", |_| {}).is_err());
    }

    #[test]
    fn test_analyze_twice_fails() {
        let source = client(
            vec![resource("Vault", "/providers/Microsoft.Foo/vaults/{v}")],
            vec![object("Vault", vec![])],
        );

        let mut spec = Specification::new(&config());
        spec.analyze(&source, &empty_catalog()).unwrap();
        assert!(spec.analyze(&source, &empty_catalog()).is_err());
    }

    #[test]
    fn test_repeated_create_operations_collapse_into_one_resource() {
        let source = client(
            vec![
                resource("Vault", "/providers/Microsoft.Foo/vaults/{v}"),
                resource(
                    "Vault",
                    "/subscriptions/{s}/resourceGroups/{g}/providers/Microsoft.Foo/vaults/{v}",
                ),
            ],
            vec![object("Vault", vec![prop("location", string())])],
        );

        let mut spec = Specification::new(&config());
        let report = spec.analyze(&source, &empty_catalog()).unwrap();

        assert_eq!(spec.resources().len(), 1);
        let vault = spec.resource(spec.resources()[0]).unwrap();
        assert_eq!(vault.create_path, "/providers/Microsoft.Foo/vaults/{v}");
        assert!(report.unresolved_resources.is_empty());
    }

    #[test]
    fn test_flattened_name_collision_is_reported() {
        let mut bag = prop("properties", model_ref("VaultProperties"));
        bag.flatten = true;
        let source = client(
            vec![resource("Vault", "/providers/Microsoft.Foo/vaults/{v}")],
            vec![
                object("Vault", vec![prop("name", string()), bag]),
                object(
                    "VaultProperties",
                    vec![
                        prop("name", WireType::Primitive(PrimitiveType::Int32)),
                        prop("tenantId", string()),
                    ],
                ),
            ],
        );

        let mut spec = Specification::new(&config());
        let report = spec.analyze(&source, &empty_catalog()).unwrap();

        let vault = spec.model("Vault").unwrap().type_model().unwrap();
        assert_eq!(vault.properties().len(), 2);
        assert_eq!(vault.property("name").unwrap().path, vec!["name"]);

        assert!(!report.is_clean());
        assert_eq!(
            report.property_conflicts,
            vec![PropertyConflict {
                model: "VaultResource".to_string(),
                property: "name".to_string(),
                kept_path: "name".to_string(),
                kept_type: "String".to_string(),
                dropped_path: "properties.name".to_string(),
                dropped_type: "Integer".to_string(),
            }]
        );
    }

    #[test]
    fn test_same_typed_duplicates_merge_silently() {
        let mut bag = prop("properties", model_ref("VaultProperties"));
        bag.flatten = true;
        let source = client(
            vec![resource("Vault", "/providers/Microsoft.Foo/vaults/{v}")],
            vec![
                object("Vault", vec![prop("name", string()), bag]),
                object("VaultProperties", vec![prop("name", string())]),
            ],
        );

        let mut spec = Specification::new(&config());
        let report = spec.analyze(&source, &empty_catalog()).unwrap();
        assert!(report.property_conflicts.is_empty());
    }

    #[test]
    fn test_shared_create_path_keeps_first_parent() {
        let source = client(
            vec![
                resource("Primary", "/providers/Microsoft.Foo/parents/{p}"),
                resource("Secondary", "/providers/Microsoft.Foo/parents/{parentName}"),
                resource("Child", "/providers/Microsoft.Foo/parents/{p}/children/{c}"),
            ],
            vec![
                object("Primary", vec![]),
                object("Secondary", vec![]),
                object("Child", vec![]),
            ],
        );

        let mut spec = Specification::new(&config());
        spec.analyze(&source, &empty_catalog()).unwrap();

        let primary = spec.model_id("Primary").unwrap();
        let child = spec.resource(spec.model_id("Child").unwrap()).unwrap();
        assert_eq!(child.parent, Some(primary));
    }
}
