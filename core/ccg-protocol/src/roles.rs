use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::ids::SemanticRole;

/// Issues semantic role ids while a model is being built.
///
/// Id 0 is reserved for `SemanticRole::NONE`. Once every label is known the
/// registry is frozen into a `RoleTable`, which can no longer grow.
#[derive(Debug, Clone)]
pub struct RoleRegistry {
    names: Vec<String>,
    index: BTreeMap<String, SemanticRole>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        let mut index = BTreeMap::new();
        index.insert("NONE".to_string(), SemanticRole::NONE);
        Self {
            names: alloc::vec!["NONE".to_string()],
            index,
        }
    }

    /// Returns the id for `name`, allocating the next one if unseen.
    pub fn intern(&mut self, name: &str) -> SemanticRole {
        if let Some(role) = self.index.get(name) {
            return *role;
        }
        let role = SemanticRole(self.names.len() as u32);
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), role);
        role
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        // NONE is always present
        false
    }

    pub fn freeze(self) -> RoleTable {
        RoleTable {
            names: self.names,
            index: self.index,
        }
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of a frozen `RoleRegistry`.
#[derive(Debug, Clone)]
pub struct RoleTable {
    names: Vec<String>,
    index: BTreeMap<String, SemanticRole>,
}

impl RoleTable {
    pub fn get(&self, name: &str) -> Option<SemanticRole> {
        self.index.get(name).copied()
    }

    pub fn name(&self, role: SemanticRole) -> Option<&str> {
        self.names.get(role.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = (SemanticRole, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (SemanticRole(i as u32), name.as_str()))
    }
}
