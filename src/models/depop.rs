// src/models/depop.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::types::Json;
use validator::Validate;

/// Represents the 'depop_users' table in the database.
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct DepopUser {
    /// Generated internal id ('dep_' + hex). Primary identity.
    pub user_id: String,

    /// Unique username within the Depop catalog. Ingestion resolves by this.
    pub username: String,

    pub bio: Option<String>,
    pub first_name: Option<String>,
    pub followers: i64,
    pub following: i64,
    pub initials: Option<String>,
    pub items_sold: i64,
    pub last_name: Option<String>,
    pub last_seen: Option<DateTime<Utc>>,
    pub avatar: Option<String>,
    pub reviews_rating: Option<f64>,
    pub reviews_total: i64,
    pub verified: bool,
    pub website: Option<String>,
}

/// Represents the 'depop_products' table in the database.
///
/// The two camelCase fields keep the upstream marketplace spelling on the
/// wire while the database columns stay snake_case.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DepopProduct {
    pub id: String,

    /// Owning user. Must reference an existing row in 'depop_users'.
    pub user_id: String,

    pub sold: bool,
    pub gender: Option<String>,
    pub category: Option<String>,
    pub size: Option<String>,
    pub state: Option<String>,
    pub brand: Option<String>,
    pub colors: Option<String>,
    pub price: Option<f64>,

    /// Ordered image URLs, stored as a JSON array in the database.
    pub images: Json<Vec<String>>,

    pub description: Option<String>,
    pub title: Option<String>,
    pub platform: String,
    pub address: Option<String>,

    #[serde(rename = "discountedPriceAmount")]
    pub discounted_price_amount: Option<f64>,

    #[serde(rename = "dateUpdated")]
    pub date_updated: Option<DateTime<Utc>>,
}

/// User plus its owned products, eagerly loaded.
#[derive(Debug, Serialize)]
pub struct DepopUserResponse {
    #[serde(flatten)]
    pub user: DepopUser,
    pub products: Vec<DepopProduct>,
}

/// Product plus its owner, eagerly loaded.
#[derive(Debug, Serialize)]
pub struct DepopProductResponse {
    #[serde(flatten)]
    pub product: DepopProduct,
    pub owner: Option<DepopUser>,
}

/// DTO for a simulated Depop scrape request.
///
/// `download_files` and `start_from_item` are legacy knobs: they are accepted
/// and logged but never acted on. The simulation stops at the catalog.
#[derive(Debug, Deserialize, Validate)]
pub struct ScrapeDepopRequest {
    #[validate(length(min = 1, message = "usernames cannot be empty"))]
    pub usernames: Vec<String>,

    #[serde(default)]
    pub download_files: bool,

    #[serde(default)]
    pub include_sold: bool,

    pub start_from_item: Option<String>,
}
