pub mod rest;
pub mod service;

pub use rest::RestApi;
pub use service::{CatalogSummary, MatchService, DEFAULT_FETCH_TIMEOUT};
