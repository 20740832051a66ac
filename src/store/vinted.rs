// src/store/vinted.rs

use std::collections::HashMap;

use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor, SqlitePool};

use crate::error::AppError;
use crate::models::vinted::{
    VintedProduct, VintedProductResponse, VintedUser, VintedUserResponse,
};

use super::classify_insert_error;

const USER_COLUMNS: &str = "user_id, username, gender, given_item_count, taken_item_count, \
     followers_count, following_count, positive_feedback_count, negative_feedback_count, \
     feedback_reputation, avatar, created_at, last_logged_on_ts, city_id, city, country_title, \
     verification_email, verification_facebook, verification_google, verification_phone";

const PRODUCT_COLUMNS: &str = "id, user_id, url, favourite, gender, category, size, state, \
     brand, colors, price, images, description, title, platform";

/// Optional predicates for listing Vinted users. AND-combined; absent
/// predicates impose no restriction.
#[derive(Debug, Default, Deserialize)]
pub struct VintedUserFilter {
    /// Case-insensitive substring match on username.
    pub username: Option<String>,
    pub city: Option<String>,
    pub min_followers: Option<i64>,
}

/// Optional predicates for listing Vinted products.
#[derive(Debug, Default, Deserialize)]
pub struct VintedProductFilter {
    /// Case-insensitive substring match on the owner's username.
    pub username: Option<String>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

pub async fn any_user_exists(
    executor: impl SqliteExecutor<'_>,
) -> Result<bool, AppError> {
    let row: Option<String> =
        sqlx::query_scalar("SELECT user_id FROM vinted_users LIMIT 1")
            .fetch_optional(executor)
            .await?;
    Ok(row.is_some())
}

pub async fn find_user_by_id(
    executor: impl SqliteExecutor<'_>,
    user_id: &str,
) -> Result<Option<VintedUser>, AppError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM vinted_users WHERE user_id = ?");
    let user = sqlx::query_as::<_, VintedUser>(&sql)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;
    Ok(user)
}

pub async fn insert_user(
    executor: impl SqliteExecutor<'_>,
    user: &VintedUser,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO vinted_users (
            user_id, username, gender, given_item_count, taken_item_count,
            followers_count, following_count, positive_feedback_count,
            negative_feedback_count, feedback_reputation, avatar, created_at,
            last_logged_on_ts, city_id, city, country_title,
            verification_email, verification_facebook, verification_google,
            verification_phone
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.user_id)
    .bind(&user.username)
    .bind(&user.gender)
    .bind(user.given_item_count)
    .bind(user.taken_item_count)
    .bind(user.followers_count)
    .bind(user.following_count)
    .bind(user.positive_feedback_count)
    .bind(user.negative_feedback_count)
    .bind(user.feedback_reputation)
    .bind(&user.avatar)
    .bind(user.created_at)
    .bind(user.last_logged_on_ts)
    .bind(&user.city_id)
    .bind(&user.city)
    .bind(&user.country_title)
    .bind(user.verification_email)
    .bind(user.verification_facebook)
    .bind(user.verification_google)
    .bind(user.verification_phone)
    .execute(executor)
    .await
    .map_err(|e| classify_insert_error(e, "vinted user"))?;

    Ok(())
}

pub async fn insert_product(
    executor: impl SqliteExecutor<'_>,
    product: &VintedProduct,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO vinted_products (
            id, user_id, url, favourite, gender, category, size, state,
            brand, colors, price, images, description, title, platform
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&product.id)
    .bind(&product.user_id)
    .bind(&product.url)
    .bind(product.favourite)
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
    .execute(executor)
    .await
    .map_err(|e| classify_insert_error(e, "vinted product"))?;

    Ok(())
}

/// Lists users matching the filter, each eagerly carrying its products.
///
/// Two query shapes: one for the matching users, one batched IN (...) query
/// for all their products. Keeps the per-user traversal off the hot path.
pub async fn list_users(
    pool: &SqlitePool,
    filter: &VintedUserFilter,
) -> Result<Vec<VintedUserResponse>, AppError> {
    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {USER_COLUMNS} FROM vinted_users WHERE 1 = 1"
    ));

    if let Some(username) = &filter.username {
        // SQLite LIKE is case-insensitive for ASCII.
        qb.push(" AND username LIKE ");
        qb.push_bind(format!("%{username}%"));
    }
    if let Some(city) = &filter.city {
        qb.push(" AND city = ");
        qb.push_bind(city.clone());
    }
    if let Some(min_followers) = filter.min_followers {
        qb.push(" AND followers_count >= ");
        qb.push_bind(min_followers);
    }

    let users: Vec<VintedUser> = qb.build_query_as().fetch_all(pool).await?;

    let user_ids: Vec<String> = users.iter().map(|u| u.user_id.clone()).collect();
    let mut products_by_owner = products_for_users(pool, &user_ids).await?;

    Ok(users
        .into_iter()
        .map(|user| VintedUserResponse {
            products: products_by_owner.remove(&user.user_id).unwrap_or_default(),
            user,
        })
        .collect())
}

pub async fn get_user_with_products(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Option<VintedUserResponse>, AppError> {
    let Some(user) = find_user_by_id(pool, user_id).await? else {
        return Ok(None);
    };

    let mut products_by_owner =
        products_for_users(pool, std::slice::from_ref(&user.user_id)).await?;

    Ok(Some(VintedUserResponse {
        products: products_by_owner.remove(&user.user_id).unwrap_or_default(),
        user,
    }))
}

/// Lists products matching the filter, each eagerly carrying its owner.
/// The username predicate requires an inner join to the owning user.
pub async fn list_products(
    pool: &SqlitePool,
    filter: &VintedProductFilter,
) -> Result<Vec<VintedProductResponse>, AppError> {
    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT p.{} FROM vinted_products p",
        PRODUCT_COLUMNS.replace(", ", ", p.")
    ));

    if filter.username.is_some() {
        qb.push(" INNER JOIN vinted_users u ON u.user_id = p.user_id");
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
    if let Some(min_price) = filter.min_price {
        qb.push(" AND p.price >= ");
        qb.push_bind(min_price);
    }
    if let Some(max_price) = filter.max_price {
        qb.push(" AND p.price <= ");
        qb.push_bind(max_price);
    }

    let products: Vec<VintedProduct> = qb.build_query_as().fetch_all(pool).await?;

    let owners = owners_for_products(pool, &products).await?;

    Ok(products
        .into_iter()
        .map(|product| VintedProductResponse {
            owner: owners.get(&product.user_id).cloned(),
            product,
        })
        .collect())
}

async fn products_for_users(
    pool: &SqlitePool,
    user_ids: &[String],
) -> Result<HashMap<String, Vec<VintedProduct>>, AppError> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {PRODUCT_COLUMNS} FROM vinted_products WHERE user_id IN ("
    ));
    let mut separated = qb.separated(",");
    for user_id in user_ids {
        separated.push_bind(user_id.clone());
    }
    separated.push_unseparated(")");

    let products: Vec<VintedProduct> = qb.build_query_as().fetch_all(pool).await?;

    let mut by_owner: HashMap<String, Vec<VintedProduct>> = HashMap::new();
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
    products: &[VintedProduct],
) -> Result<HashMap<String, VintedUser>, AppError> {
    let mut owner_ids: Vec<String> =
        products.iter().map(|p| p.user_id.clone()).collect();
    owner_ids.sort();
    owner_ids.dedup();

    if owner_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {USER_COLUMNS} FROM vinted_users WHERE user_id IN ("
    ));
    let mut separated = qb.separated(",");
    for owner_id in &owner_ids {
        separated.push_bind(owner_id.clone());
    }
    separated.push_unseparated(")");

    let owners: Vec<VintedUser> = qb.build_query_as().fetch_all(pool).await?;

    Ok(owners
        .into_iter()
        .map(|owner| (owner.user_id.clone(), owner))
        .collect())
}
