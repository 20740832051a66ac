// src/handlers/depop.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::depop::ScrapeDepopRequest,
    services::{self, depop::DepopScrapeOptions},
    store::depop::{DepopProductFilter, DepopUserFilter},
    store,
};

/// Simulates a Depop scraping task: resolves each requested username and
/// stores one placeholder product per username.
pub async fn scrape_depop(
    State(pool): State<SqlitePool>,
    Json(payload): Json<ScrapeDepopRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let options = DepopScrapeOptions {
        download_files: payload.download_files,
        include_sold: payload.include_sold,
        start_from_item: payload.start_from_item.clone(),
    };

    let records =
        services::depop::simulate_depop_scrape(&pool, &payload.usernames, &options).await?;

    Ok(Json(records))
}

/// Lists Depop users, optionally filtered, each with its owned products.
pub async fn list_depop_users(
    State(pool): State<SqlitePool>,
    Query(filter): Query<DepopUserFilter>,
) -> Result<impl IntoResponse, AppError> {
    let users = store::depop::list_users(&pool, &filter).await?;
    Ok(Json(users))
}

/// Retrieves a single Depop user by id.
pub async fn get_depop_user(
    State(pool): State<SqlitePool>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = store::depop::get_user_with_products(&pool, &user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Lists Depop products, optionally filtered, each with its owner.
pub async fn list_depop_products(
    State(pool): State<SqlitePool>,
    Query(filter): Query<DepopProductFilter>,
) -> Result<impl IntoResponse, AppError> {
    let products = store::depop::list_products(&pool, &filter).await?;
    Ok(Json(products))
}
