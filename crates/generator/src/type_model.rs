//! Composite types: an ordered property set, base type and discriminator

use crate::property::Property;
use crate::registry::ModelId;

/// Discriminator of a polymorphic model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscriminatorValue {
    /// Wire name of the discriminator property
    pub name: String,
    pub value: Option<String>,
}

/// Shared part of simple models and resources
///
/// Properties keep insertion order and are unique by name.
#[derive(Debug, Clone, Default)]
pub struct TypeModel {
    properties: Vec<Property>,
    pub base_type: Option<ModelId>,
    pub discriminator: Option<DiscriminatorValue>,
}

impl TypeModel {
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn property_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.name == name)
    }

    /// Append a property; returns false and keeps the existing one when the
    /// name is already taken
    pub fn add_property(&mut self, property: Property) -> bool {
        if self.property(&property.name).is_some() {
            return false;
        }
        self.properties.push(property);
        true
    }

    /// Replace all properties, keeping the first occurrence of each name
    ///
    /// Returns the properties that lost to an earlier one of the same name.
    pub fn set_properties(
        &mut self,
        properties: impl IntoIterator<Item = Property>,
    ) -> Vec<Property> {
        self.properties.clear();
        let mut dropped = Vec::new();
        for property in properties {
            if self.property(&property.name).is_some() {
                dropped.push(property);
            } else {
                self.properties.push(property);
            }
        }
        dropped
    }

    pub fn remove_property(&mut self, name: &str) -> Option<Property> {
        let index = self.properties.iter().position(|p| p.name == name)?;
        Some(self.properties.remove(index))
    }
}
