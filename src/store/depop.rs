// src/store/depop.rs

use std::collections::HashMap;

use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor, SqlitePool};

use crate::error::AppError;
use crate::models::depop::{
    DepopProduct, DepopProductResponse, DepopUser, DepopUserResponse,
};

use super::classify_insert_error;

const USER_COLUMNS: &str = "user_id, username, bio, first_name, followers, following, \
     initials, items_sold, last_name, last_seen, avatar, reviews_rating, reviews_total, \
     verified, website";

const PRODUCT_COLUMNS: &str = "id, user_id, sold, gender, category, size, state, brand, \
     colors, price, images, description, title, platform, address, discounted_price_amount, \
     date_updated";

/// Optional predicates for listing Depop users. AND-combined; absent
/// predicates impose no restriction.
#[derive(Debug, Default, Deserialize)]
pub struct DepopUserFilter {
    /// Case-insensitive substring match on username.
    pub username: Option<String>,
    pub verified: Option<bool>,
    pub min_followers: Option<i64>,
}

/// Optional predicates for listing Depop products.
#[derive(Debug, Deserialize)]
pub struct DepopProductFilter {
    /// Case-insensitive substring match on the owner's username.
    pub username: Option<String>,
    pub brand: Option<String>,
    pub size: Option<String>,

    /// When false, sold listings are excluded. Defaults to true.
    #[serde(default = "default_include_sold")]
    pub include_sold: bool,
}

impl Default for DepopProductFilter {
    fn default() -> Self {
        Self {
            username: None,
            brand: None,
            size: None,
            include_sold: true,
        }
    }
}

const fn default_include_sold() -> bool {
    true
}

pub async fn any_user_exists(
    executor: impl SqliteExecutor<'_>,
) -> Result<bool, AppError> {
    let row: Option<String> =
        sqlx::query_scalar("SELECT user_id FROM depop_users LIMIT 1")
            .fetch_optional(executor)
            .await?;
    Ok(row.is_some())
}

pub async fn find_user_by_id(
    executor: impl SqliteExecutor<'_>,
    user_id: &str,
) -> Result<Option<DepopUser>, AppError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM depop_users WHERE user_id = ?");
    let user = sqlx::query_as::<_, DepopUser>(&sql)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;
    Ok(user)
}

/// Ingestion resolves Depop identities by username, not by primary key.
pub async fn find_user_by_username(
    executor: impl SqliteExecutor<'_>,
    username: &str,
) -> Result<Option<DepopUser>, AppError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM depop_users WHERE username = ?");
    let user = sqlx::query_as::<_, DepopUser>(&sql)
        .bind(username)
        .fetch_optional(executor)
        .await?;
    Ok(user)
}

pub async fn insert_user(
    executor: impl SqliteExecutor<'_>,
    user: &DepopUser,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO depop_users (
            user_id, username, bio, first_name, followers, following,
            initials, items_sold, last_name, last_seen, avatar,
            reviews_rating, reviews_total, verified, website
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.user_id)
    .bind(&user.username)
    .bind(&user.bio)
    .bind(&user.first_name)
    .bind(user.followers)
    .bind(user.following)
    .bind(&user.initials)
    .bind(user.items_sold)
    .bind(&user.last_name)
    .bind(user.last_seen)
    .bind(&user.avatar)
    .bind(user.reviews_rating)
    .bind(user.reviews_total)
    .bind(user.verified)
    .bind(&user.website)
    .execute(executor)
    .await
    .map_err(|e| classify_insert_error(e, "depop user"))?;

    Ok(())
}

pub async fn insert_product(
    executor: impl SqliteExecutor<'_>,
    product: &DepopProduct,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO depop_products (
            id, user_id, sold, gender, category, size, state, brand,
            colors, price, images, description, title, platform, address,
            discounted_price_amount, date_updated
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&product.id)
    .bind(&product.user_id)
    .bind(product.sold)
    .bind(&product.gender)
    .bind(&product.category)
    .bind(&product.size)
    .bind(&product.state)
    .bind(&product.brand)
    .bind(&product.colors)
    .bind(product.price)
    .bind(product.images.clone())
    .bind(&product.description)
    .bind(&product.title)
    .bind(&product.platform)
    .bind(&product.address)
    .bind(product.discounted_price_amount)
    .bind(product.date_updated)
    .execute(executor)
    .await
    .map_err(|e| classify_insert_error(e, "depop product"))?;

    Ok(())
}

/// Lists users matching the filter, each eagerly carrying its products.
pub async fn list_users(
    pool: &SqlitePool,
    filter: &DepopUserFilter,
) -> Result<Vec<DepopUserResponse>, AppError> {
    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {USER_COLUMNS} FROM depop_users WHERE 1 = 1"
    ));

    if let Some(username) = &filter.username {
        qb.push(" AND username LIKE ");
        qb.push_bind(format!("%{username}%"));
    }
    if let Some(verified) = filter.verified {
        qb.push(" AND verified = ");
        qb.push_bind(verified);
    }
    if let Some(min_followers) = filter.min_followers {
        qb.push(" AND followers >= ");
        qb.push_bind(min_followers);
    }

    let users: Vec<DepopUser> = qb.build_query_as().fetch_all(pool).await?;

    let user_ids: Vec<String> = users.iter().map(|u| u.user_id.clone()).collect();
    let mut products_by_owner = products_for_users(pool, &user_ids).await?;

    Ok(users
        .into_iter()
        .map(|user| DepopUserResponse {
            products: products_by_owner.remove(&user.user_id).unwrap_or_default(),
            user,
        })
        .collect())
}

pub async fn get_user_with_products(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Option<DepopUserResponse>, AppError> {
    let Some(user) = find_user_by_id(pool, user_id).await? else {
        return Ok(None);
    };

    let mut products_by_owner =
        products_for_users(pool, std::slice::from_ref(&user.user_id)).await?;

    Ok(Some(DepopUserResponse {
        products: products_by_owner.remove(&user.user_id).unwrap_or_default(),
        user,
    }))
}

/// Lists products matching the filter, each eagerly carrying its owner.
pub async fn list_products(
    pool: &SqlitePool,
    filter: &DepopProductFilter,
) -> Result<Vec<DepopProductResponse>, AppError> {
    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT p.{} FROM depop_products p",
        PRODUCT_COLUMNS.replace(", ", ", p.")
    ));

    if filter.username.is_some() {
        qb.push(" INNER JOIN depop_users u ON u.user_id = p.user_id");
    }
    qb.push(" WHERE 1 = 1");

    if let Some(username) = &filter.username {
        qb.push(" AND u.username LIKE ");
        qb.push_bind(format!("%{username}%"));
    }
    if let Some(brand) = &filter.brand {
        qb.push(" AND p.brand LIKE ");
        qb.push_bind(format!("%{brand}%"));
    }
    if let Some(size) = &filter.size {
        qb.push(" AND p.size = ");
        qb.push_bind(size.clone());
    }
    if !filter.include_sold {
        qb.push(" AND p.sold = FALSE");
    }

    let products: Vec<DepopProduct> = qb.build_query_as().fetch_all(pool).await?;

    let owners = owners_for_products(pool, &products).await?;

    Ok(products
        .into_iter()
        .map(|product| DepopProductResponse {
            owner: owners.get(&product.user_id).cloned(),
            product,
        })
        .collect())
}

async fn products_for_users(
    pool: &SqlitePool,
    user_ids: &[String],
) -> Result<HashMap<String, Vec<DepopProduct>>, AppError> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {PRODUCT_COLUMNS} FROM depop_products WHERE user_id IN ("
    ));
    let mut separated = qb.separated(",");
    for user_id in user_ids {
        separated.push_bind(user_id.clone());
    }
    separated.push_unseparated(")");

    let products: Vec<DepopProduct> = qb.build_query_as().fetch_all(pool).await?;

    let mut by_owner: HashMap<String, Vec<DepopProduct>> = HashMap::new();
    for product in products {
        by_owner
            .entry(product.user_id.clone())
            .or_default()
            .push(product);
    }
    Ok(by_owner)
}

async fn owners_for_products(
    pool: &SqlitePool,
    products: &[DepopProduct],
) -> Result<HashMap<String, DepopUser>, AppError> {
    let mut owner_ids: Vec<String> =
        products.iter().map(|p| p.user_id.clone()).collect();
    owner_ids.sort();
    owner_ids.dedup();

    if owner_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {USER_COLUMNS} FROM depop_users WHERE user_id IN ("
    ));
    let mut separated = qb.separated(",");
    for owner_id in &owner_ids {
        separated.push_bind(owner_id.clone());
    }
    separated.push_unseparated(")");

    let owners: Vec<DepopUser> = qb.build_query_as().fetch_all(pool).await?;

    Ok(owners
        .into_iter()
        .map(|owner| (owner.user_id.clone(), owner))
        .collect())
}
