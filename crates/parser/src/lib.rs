//! Client model parsing for the provisioning generator
//!
//! This crate reads client model documents and converts them into the
//! intermediate representation (`ClientModel`) the generator analyzes.
//!
//! ## Parsing Strategy
//!
//! Documents list resources (with the URL path of their create operation)
//! and the composite/enum models reachable from them. Model references may
//! use simple names; they are rewritten to qualified names here so the
//! generator can key its registry on a single identity.

pub mod client_model;
mod type_mapper;

pub use client_model::{ClientModelParser, DocumentFormat};
pub use type_mapper::TypeMapper;

use provisioning_generator_common::{ClientModel, Result};
use std::path::Path;

/// Parse a client model file
///
/// # Arguments
/// * `path` - JSON or YAML client model document
///
/// # Returns
/// * `ClientModel` - Intermediate representation of the service
pub fn parse_client_model<P: AsRef<Path>>(path: P) -> Result<ClientModel> {
    ClientModelParser::from_file(path)?.parse()
}
