use morphmatch_core::{
    ArchetypeCatalog, Error, Gender, MatchObserver, Result, SemanticProfile, TracingObserver,
};
use morphmatch_similarity::{Matcher, SelectionResult};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(2);

/// Per-gender catalog summary
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogSummary {
    pub gender: Gender,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

/// Owns the catalog connection and runs matching requests against it
pub struct MatchService {
    catalog: Arc<dyn ArchetypeCatalog>,
    matcher: Matcher,
    fetch_timeout: Duration,
    observer: Arc<dyn MatchObserver>,
}

impl MatchService {
    pub fn new(catalog: Arc<dyn ArchetypeCatalog>, matcher: Matcher) -> Self {
        Self {
            catalog,
            matcher,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            observer: Arc::new(TracingObserver),
        }
    }

    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn MatchObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Fetch on the blocking pool under the fetch timeout.
    ///
    /// Timeouts and failed fetch tasks are [`Error::CatalogUnavailable`].
    async fn fetch(&self, gender: Gender) -> Result<Vec<morphmatch_core::ArchetypeRecord>> {
        let catalog = self.catalog.clone();
        let task = tokio::task::spawn_blocking(move || catalog.fetch_archetypes(gender));

        match tokio::time::timeout(self.fetch_timeout, task).await {
            Err(_) => Err(Error::CatalogUnavailable(format!(
                "catalog fetch timed out after {}ms",
                self.fetch_timeout.as_millis()
            ))),
            Ok(Err(join_err)) => Err(Error::CatalogUnavailable(format!(
                "catalog fetch task failed: {}",
                join_err
            ))),
            Ok(Ok(fetched)) => Ok(fetched?),
        }
    }

    pub async fn match_profile(
        &self,
        profile: &SemanticProfile,
        limit: Option<usize>,
    ) -> Result<SelectionResult> {
        let records = self.fetch(profile.sex.gender()).await?;
        self.matcher.rank_fetched(
            profile,
            records,
            limit,
            self.catalog.fingerprint(),
            self.observer.as_ref(),
        )
    }

    pub async fn catalog_summary(&self, gender: Gender) -> Result<CatalogSummary> {
        let records = self.fetch(gender).await?;
        Ok(CatalogSummary {
            gender,
            count: records.len(),
            fingerprint: self.catalog.fingerprint(),
        })
    }
}
