// src/models/vinted.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::types::Json;
use validator::Validate;

/// Represents the 'vinted_users' table in the database.
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct VintedUser {
    /// Marketplace user id. Primary identity, immutable once created.
    pub user_id: String,

    /// Unique username within the Vinted catalog.
    pub username: String,

    pub gender: Option<String>,
    pub given_item_count: i64,
    pub taken_item_count: i64,
    pub followers_count: i64,
    pub following_count: i64,
    pub positive_feedback_count: i64,
    pub negative_feedback_count: i64,
    pub feedback_reputation: Option<f64>,
    pub avatar: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_logged_on_ts: Option<DateTime<Utc>>,
    pub city_id: Option<String>,
    pub city: Option<String>,
    pub country_title: Option<String>,
    pub verification_email: bool,
    pub verification_facebook: bool,
    pub verification_google: bool,
    pub verification_phone: bool,
}

/// Represents the 'vinted_products' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct VintedProduct {
    pub id: String,

    /// Owning user. Must reference an existing row in 'vinted_users'.
    pub user_id: String,

    pub url: String,
    pub favourite: bool,
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
}

/// User plus its owned products, eagerly loaded.
#[derive(Debug, Serialize)]
pub struct VintedUserResponse {
    #[serde(flatten)]
    pub user: VintedUser,
    pub products: Vec<VintedProduct>,
}

/// Product plus its owner, eagerly loaded.
#[derive(Debug, Serialize)]
pub struct VintedProductResponse {
    #[serde(flatten)]
    pub product: VintedProduct,
    pub owner: Option<VintedUser>,
}

/// DTO for a simulated Vinted scrape request.
#[derive(Debug, Deserialize, Validate)]
pub struct ScrapeVintedRequest {
    #[validate(length(min = 1, message = "user_ids cannot be empty"))]
    pub user_ids: Vec<String>,

    /// Cap on synthesized image lists. Clamped into the image pool bounds.
    #[serde(default = "default_max_images")]
    pub max_images: i64,
}

const fn default_max_images() -> i64 {
    10
}
