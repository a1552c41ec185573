//! Name-keyed store of module descriptors for one resolution pass.

use std::collections::BTreeMap;

use crate::descriptor::ModuleDescriptor;
use crate::error::StoreError;

/// All module descriptors for one build pass, keyed by module name.
///
/// Loading validates name uniqueness; after that the store is a pure lookup
/// table and is never mutated. A changed descriptor set means loading a new
/// store and re-resolving from scratch.
#[derive(Debug, Clone)]
pub struct DescriptorStore {
    modules: BTreeMap<String, ModuleDescriptor>,
}

impl DescriptorStore {
    /// Loads a set of descriptors, failing if two share a name.
    pub fn load(
        descriptors: impl IntoIterator<Item = ModuleDescriptor>,
    ) -> Result<Self, StoreError> {
        let mut modules = BTreeMap::new();
        for desc in descriptors {
            let name = desc.name.clone();
            if modules.insert(name.clone(), desc).is_some() {
                return Err(StoreError::DuplicateModule { name });
            }
        }
        Ok(Self { modules })
    }

    /// Looks up a descriptor by module name.
    pub fn get(&self, name: &str) -> Result<&ModuleDescriptor, StoreError> {
        self.modules.get(name).ok_or_else(|| StoreError::ModuleNotFound {
            name: name.to_string(),
        })
    }

    /// Looks up a descriptor by module name, returning `None` on a miss.
    pub fn lookup(&self, name: &str) -> Option<&ModuleDescriptor> {
        self.modules.get(name)
    }

    /// Returns `true` if a descriptor with this name is loaded.
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Iterates over all descriptors in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.modules.values()
    }

    /// Iterates over all module names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// Returns the number of loaded descriptors.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns `true` if no descriptors are loaded.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_common::ContentHash;

    fn desc(name: &str) -> ModuleDescriptor {
        ModuleDescriptor::new(name, ContentHash::from_bytes(name.as_bytes()))
    }

    #[test]
    fn load_empty() {
        let store = DescriptorStore::load([]).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn load_and_get() {
        let store = DescriptorStore::load([desc("Core"), desc("Engine")]).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("Core").unwrap().name, "Core");
        assert!(store.contains("Engine"));
    }

    #[test]
    fn get_missing_errors() {
        let store = DescriptorStore::load([desc("Core")]).unwrap();
        let err = store.get("Missing").unwrap_err();
        assert!(matches!(err, StoreError::ModuleNotFound { ref name } if name == "Missing"));
        assert!(store.lookup("Missing").is_none());
    }

    #[test]
    fn duplicate_name_rejected() {
        let err = DescriptorStore::load([desc("Core"), desc("Core")]).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateModule { ref name } if name == "Core"));
    }

    #[test]
    fn iteration_is_name_ordered() {
        let store = DescriptorStore::load([desc("Zeta"), desc("Alpha"), desc("Mid")]).unwrap();
        let names: Vec<&str> = store.names().collect();
        assert_eq!(names, vec!["Alpha", "Mid", "Zeta"]);
        let iter_names: Vec<&str> = store.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(iter_names, names);
    }
}
