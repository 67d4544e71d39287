use crate::archetype::{ArchetypeRecord, Gender};
use crate::error::CatalogError;

/// Read-only source of archetypes, owned by an external store
pub trait ArchetypeCatalog: Send + Sync {
    /// All rows for one gender, in catalog order
    fn fetch_archetypes(&self, gender: Gender) -> Result<Vec<ArchetypeRecord>, CatalogError>;

    /// Identifier of the catalog snapshot the rows come from, if known
    fn fingerprint(&self) -> Option<String> {
        None
    }
}

impl<T: ArchetypeCatalog + ?Sized> ArchetypeCatalog for std::sync::Arc<T> {
    fn fetch_archetypes(&self, gender: Gender) -> Result<Vec<ArchetypeRecord>, CatalogError> {
        (**self).fetch_archetypes(gender)
    }

    fn fingerprint(&self) -> Option<String> {
        (**self).fingerprint()
    }
}
