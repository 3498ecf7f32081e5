//! Registry of named object types accumulated during one translation run

use crate::types::ObjectTypeDefinition;
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Mapping from type name (or resource token) to object type definition
///
/// Each name maps to exactly one definition; inserting an existing name
/// replaces the previous definition. Iteration is ordered by name so that
/// generated documents are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRegistry {
    types: BTreeMap<String, ObjectTypeDefinition>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a definition, returning the one it replaced
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        definition: ObjectTypeDefinition,
    ) -> Option<ObjectTypeDefinition> {
        self.types.insert(name.into(), definition)
    }

    pub fn get(&self, name: &str) -> Option<&ObjectTypeDefinition> {
        self.types.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ObjectTypeDefinition> {
        self.types.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<ObjectTypeDefinition> {
        self.types.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ObjectTypeDefinition> {
        self.types.iter()
    }

    pub fn as_map(&self) -> &BTreeMap<String, ObjectTypeDefinition> {
        &self.types
    }

    pub fn into_inner(self) -> BTreeMap<String, ObjectTypeDefinition> {
        self.types
    }
}

impl<'a> IntoIterator for &'a TypeRegistry {
    type Item = (&'a String, &'a ObjectTypeDefinition);
    type IntoIter = btree_map::Iter<'a, String, ObjectTypeDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.iter()
    }
}
