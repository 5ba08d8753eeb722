//! Shared query parameter types for API handlers.

use playora_core::catalog::CatalogQuery;
use serde::Deserialize;

/// Public catalog filter (`?category=&q=`).
///
/// Both parameters are optional; blank values and `category=all` mean no
/// filter.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    pub category: Option<String>,
    pub q: Option<String>,
}

impl CatalogParams {
    pub fn to_query(&self) -> CatalogQuery {
        CatalogQuery::new(self.category.as_deref(), self.q.as_deref())
    }
}
