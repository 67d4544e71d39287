// JSON file catalog with reload support
use chrono::{DateTime, Utc};
use morphmatch_core::{ArchetypeCatalog, ArchetypeRecord, CatalogError, Gender};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Accepted catalog file layouts
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Bare(Vec<ArchetypeRecord>),
    Wrapped { archetypes: Vec<ArchetypeRecord> },
}

/// Catalog file description for API responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogDescription {
    pub path: String,
    pub records: usize,
    pub masculine: usize,
    pub feminine: usize,
    pub size: u64,
    pub checksum: String,
    pub loaded_at: DateTime<Utc>,
}

struct LoadedCatalog {
    records: Vec<ArchetypeRecord>,
    checksum: String,
    size: u64,
    loaded_at: DateTime<Utc>,
}

/// Parse catalog bytes: a JSON array of rows or `{ "archetypes": [...] }`
pub fn parse_catalog(bytes: &[u8]) -> Result<Vec<ArchetypeRecord>, CatalogError> {
    let file: CatalogFile = serde_json::from_slice(bytes)?;
    Ok(match file {
        CatalogFile::Bare(records) => records,
        CatalogFile::Wrapped { archetypes } => archetypes,
    })
}

/// Catalog loaded from a JSON file, swapped atomically on reload
pub struct JsonFileCatalog {
    path: PathBuf,
    state: RwLock<LoadedCatalog>,
}

impl JsonFileCatalog {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref().to_path_buf();
        let loaded = Self::load(&path)?;
        Ok(Self {
            path,
            state: RwLock::new(loaded),
        })
    }

    fn load(path: &Path) -> Result<LoadedCatalog, CatalogError> {
        let bytes = fs::read(path)?;
        let records = parse_catalog(&bytes)?;
        let checksum = format!("{:x}", Sha256::digest(&bytes));

        let without_gender = records.iter().filter(|r| r.gender().is_none()).count();
        if without_gender > 0 {
            tracing::warn!(
                path = %path.display(),
                rows = without_gender,
                "catalog rows without a recognizable gender will be skipped at match time"
            );
        }
        tracing::info!(
            path = %path.display(),
            records = records.len(),
            checksum = checksum.as_str(),
            "catalog loaded"
        );

        Ok(LoadedCatalog {
            records,
            checksum,
            size: bytes.len() as u64,
            loaded_at: Utc::now(),
        })
    }

    /// Re-read the file. On failure the previous snapshot stays in place.
    pub fn reload(&self) -> Result<CatalogDescription, CatalogError> {
        let loaded = Self::load(&self.path)?;
        *self.state.write() = loaded;
        Ok(self.describe())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.state.read().loaded_at
    }

    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().records.is_empty()
    }

    pub fn describe(&self) -> CatalogDescription {
        let state = self.state.read();
        let count = |g: Gender| state.records.iter().filter(|r| r.gender() == Some(g)).count();
        CatalogDescription {
            path: self.path.display().to_string(),
            records: state.records.len(),
            masculine: count(Gender::Masculine),
            feminine: count(Gender::Feminine),
            size: state.size,
            checksum: state.checksum.clone(),
            loaded_at: state.loaded_at,
        }
    }
}

impl ArchetypeCatalog for JsonFileCatalog {
    fn fetch_archetypes(&self, gender: Gender) -> Result<Vec<ArchetypeRecord>, CatalogError> {
        Ok(self
            .state
            .read()
            .records
            .iter()
            .filter(|r| r.belongs_to(gender))
            .cloned()
            .collect())
    }

    /// SHA-256 of the loaded file
    fn fingerprint(&self) -> Option<String> {
        Some(self.state.read().checksum.clone())
    }
}
