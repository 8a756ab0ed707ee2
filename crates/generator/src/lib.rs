//! Provisioning model generation
//!
//! This crate turns a parsed client model into declarative provisioning
//! sources: it builds a deduplicated type graph of resources and the models
//! they reference, resolves API versions through a resource type catalog,
//! lints the graph and renders one Java file per generated type plus a
//! `pom.xml` manifest.

mod emit;
mod lint;
mod model;
pub mod naming;
mod property;
mod registry;
mod resource;
mod resource_id;
mod specification;
mod templates;
mod type_model;

pub use emit::{EmitFailure, GenerationReport};
pub use lint::LintWarning;
pub use model::{EnumModel, ModelBase, ModelKind, COLLECTIONS_PACKAGE};
pub use property::Property;
pub use registry::{BackingRef, ModelId, TypeRegistry};
pub use resource::{NameRequirements, Resource};
pub use resource_id::{url_key, ResourceIdTemplate};
pub use specification::{
    AnalysisReport, BuildReport, NoCustomization, PropertyConflict, SpecCustomizer,
    Specification, UnresolvedResource, VersionLookupFailure,
};
pub use type_model::{DiscriminatorValue, TypeModel};

use provisioning_generator_common::{ClientModel, GeneratorConfig, ResourceCatalog, Result};

/// Analyze, lint and emit one client model (convenience function)
pub fn generate_specification(
    config: &GeneratorConfig,
    source: &ClientModel,
    catalog: &dyn ResourceCatalog,
) -> Result<BuildReport> {
    let mut spec = Specification::new(config);
    spec.build(source, catalog)
}
