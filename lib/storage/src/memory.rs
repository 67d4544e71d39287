use morphmatch_core::{Archetype, ArchetypeCatalog, ArchetypeRecord, CatalogError, Gender};
use parking_lot::RwLock;

/// Catalog held in memory, in insertion order
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    records: RwLock<Vec<ArchetypeRecord>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<ArchetypeRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn from_archetypes<'a>(archetypes: impl IntoIterator<Item = &'a Archetype>) -> Self {
        Self::from_records(archetypes.into_iter().map(ArchetypeRecord::from).collect())
    }

    pub fn insert(&self, record: ArchetypeRecord) {
        self.records.write().push(record);
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl ArchetypeCatalog for InMemoryCatalog {
    fn fetch_archetypes(&self, gender: Gender) -> Result<Vec<ArchetypeRecord>, CatalogError> {
        Ok(self
            .records
            .read()
            .iter()
            .filter(|r| r.belongs_to(gender))
            .cloned()
            .collect())
    }
}
