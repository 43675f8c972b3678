use crate::error::{MatrixError, Result};
use crate::types::SourceId;
use std::collections::{BTreeMap, HashMap};

/// Bidirectional mapping between source ids and their names
#[derive(Debug, Clone, Default)]
pub struct SourceCatalog {
    by_id: BTreeMap<SourceId, String>,
    by_name: HashMap<String, SourceId>,
}

impl SourceCatalog {
    /// Build a catalog, rejecting duplicate names
    pub fn new(sources: impl IntoIterator<Item = (SourceId, String)>) -> Result<Self> {
        let mut catalog = Self::default();
        for (id, name) in sources {
            if catalog.by_name.contains_key(&name) {
                return Err(MatrixError::DuplicateSourceName(name));
            }
            // A re-used id replaces its earlier name
            if let Some(old) = catalog.by_id.insert(id, name.clone()) {
                catalog.by_name.remove(&old);
            }
            catalog.by_name.insert(name, id);
        }
        Ok(catalog)
    }

    /// Name of the source with the given raw index
    pub fn name_of(&self, index: u8) -> Option<&str> {
        let id = SourceId::new(index).ok()?;
        self.by_id.get(&id).map(String::as_str)
    }

    /// Id of the source with the given name
    pub fn id_of(&self, name: &str) -> Option<SourceId> {
        self.by_name.get(name).copied()
    }

    /// Source names ordered by ascending source id
    pub fn names(&self) -> Vec<String> {
        self.by_id.values().cloned().collect()
    }

    /// Get the number of configured sources
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Check whether no sources are configured
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u8, name: &str) -> (SourceId, String) {
        (SourceId::new(id).unwrap(), name.to_string())
    }

    #[test]
    fn names_follow_source_id_order() {
        let catalog =
            SourceCatalog::new([entry(5, "Roku"), entry(1, "Cable"), entry(3, "Console")]).unwrap();

        assert_eq!(catalog.names(), vec!["Cable", "Console", "Roku"]);
        assert_eq!(catalog.names(), catalog.names());
    }

    #[test]
    fn lookups_go_both_ways() {
        let catalog = SourceCatalog::new([entry(2, "Blu-ray"), entry(4, "PC")]).unwrap();

        assert_eq!(catalog.id_of("PC"), Some(SourceId::new(4).unwrap()));
        assert_eq!(catalog.name_of(2), Some("Blu-ray"));
        assert_eq!(catalog.id_of("Tape"), None);
        assert_eq!(catalog.name_of(3), None);
        assert_eq!(catalog.name_of(0), None);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = SourceCatalog::new([entry(1, "TV"), entry(2, "TV")]).unwrap_err();
        assert!(matches!(err, MatrixError::DuplicateSourceName(name) if name == "TV"));
    }
}
