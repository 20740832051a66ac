// src/handlers/vinted.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::vinted::ScrapeVintedRequest,
    services,
    store::vinted::{VintedProductFilter, VintedUserFilter},
    store,
};

/// Simulates a Vinted scraping task: resolves each requested user id and
/// stores one placeholder product per id. No real scraping happens.
pub async fn scrape_vinted(
    State(pool): State<SqlitePool>,
    Json(payload): Json<ScrapeVintedRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let records =
        services::vinted::simulate_vinted_scrape(&pool, &payload.user_ids, payload.max_images)
            .await?;

    Ok(Json(records))
}

/// Lists Vinted users, optionally filtered, each with its owned products.
pub async fn list_vinted_users(
    State(pool): State<SqlitePool>,
    Query(filter): Query<VintedUserFilter>,
) -> Result<impl IntoResponse, AppError> {
    let users = store::vinted::list_users(&pool, &filter).await?;
    Ok(Json(users))
}

/// Retrieves a single Vinted user by id.
pub async fn get_vinted_user(
    State(pool): State<SqlitePool>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = store::vinted::get_user_with_products(&pool, &user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Lists Vinted products, optionally filtered, each with its owner.
pub async fn list_vinted_products(
    State(pool): State<SqlitePool>,
    Query(filter): Query<VintedProductFilter>,
) -> Result<impl IntoResponse, AppError> {
    let products = store::vinted::list_products(&pool, &filter).await?;
    Ok(Json(products))
}
