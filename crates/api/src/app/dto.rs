//! Request/response DTOs and query-string helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use marketplace_auth::{RoleTier, User};
use marketplace_core::{PageRequest, UserId};
use marketplace_products::{Product, Rate};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RolePatchRequest {
    pub role: RoleTier,
}

/// Query parameters shared by list endpoints. Values stay strings so a bad
/// `page` falls back to the default instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    #[serde(rename = "perPage")]
    pub per_page: Option<String>,
    pub q: Option<String>,
    pub rates: Option<String>,
}

impl ListQuery {
    /// Resolve pagination. A `perPage` path segment wins over the query parameter.
    pub fn page_request(&self, path_per_page: Option<&str>) -> PageRequest {
        let per_page = path_per_page.or(self.per_page.as_deref()).and_then(parse_int);
        PageRequest::resolve(self.page.as_deref().and_then(parse_int), per_page)
    }

    pub fn wants_rates(&self) -> bool {
        matches!(self.rates.as_deref().map(str::trim), Some("1" | "true"))
    }
}

fn parse_int(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct Banner {
    pub name: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Quote {
    pub quote: &'static str,
    pub author: &'static str,
}

#[derive(Debug, Serialize)]
pub struct WhoAmI {
    pub id: UserId,
    pub name: String,
    pub role: RoleTier,
    pub scopes: Vec<String>,
    pub expires_at: DateTime<Utc>,
    pub request_id: Option<Uuid>,
}

/// A product together with its ratings.
#[derive(Debug, Serialize)]
pub struct ProductWithRates {
    #[serde(flatten)]
    pub product: Product,
    pub rates: Vec<Rate>,
    pub average_stars: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CollectedProduct {
    Plain(Product),
    WithRates(ProductWithRates),
}

#[derive(Debug, Serialize)]
pub struct Profile {
    #[serde(flatten)]
    pub user: User,
    pub products_count: usize,
    pub orders_count: usize,
}
