// src/services/depop.rs

use chrono::{Duration, Utc};
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::AppError;
use crate::models::depop::{DepopProduct, DepopProductResponse, DepopUser};
use crate::store;

use super::hex_suffix;

const STUB_IMAGE: &str =
    "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?auto=format&fit=crop&w=600&q=80";

const STUB_BASE_PRICE: f64 = 48.0;
const STUB_PRICE_STEP: f64 = 5.0;

/// Inserts the baseline Depop catalog once per database lifetime.
/// No-op when any user row already exists.
pub async fn seed_depop_data(pool: &SqlitePool) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    if store::depop::any_user_exists(&mut *tx).await? {
        return Ok(());
    }

    for user in baseline_users() {
        store::depop::insert_user(&mut *tx, &user).await?;
    }
    for product in baseline_products() {
        store::depop::insert_product(&mut *tx, &product).await?;
    }

    tx.commit().await?;
    tracing::info!("Seeded baseline Depop catalog");
    Ok(())
}

/// Knobs accepted by the Depop ingestion simulation.
///
/// `download_files` and `start_from_item` are deliberately inert; they are
/// logged so their receipt stays observable.
#[derive(Debug, Default)]
pub struct DepopScrapeOptions {
    pub download_files: bool,
    pub include_sold: bool,
    pub start_from_item: Option<String>,
}

/// Stores placeholder products for the requested usernames.
pub async fn simulate_depop_scrape(
    pool: &SqlitePool,
    usernames: &[String],
    options: &DepopScrapeOptions,
) -> Result<Vec<DepopProductResponse>, AppError> {
    let mut tx = pool.begin().await?;
    let mut created = Vec::new();

    for (idx, username) in usernames.iter().enumerate() {
        if username.trim().is_empty() {
            continue;
        }

        let owner = resolve_user(&mut tx, username).await?;
        let product = synthesize_product(&owner.user_id, idx, options.include_sold);
        store::depop::insert_product(&mut *tx, &product).await?;

        created.push(DepopProductResponse {
            product,
            owner: Some(owner),
        });
    }

    tx.commit().await?;

    if let Some(item) = &options.start_from_item {
        tracing::info!(
            "start_from_item flag received ({}); no-op in educational stub",
            item
        );
    }
    if options.download_files {
        tracing::info!("download_files flag is informational only; no assets fetched in stub");
    }

    Ok(created)
}

/// Finds the user owning `username`, creating a minimal profile when the
/// username has never been seen. On Depop the external id is the username;
/// the primary key is generated here.
async fn resolve_user(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<DepopUser, AppError> {
    if let Some(user) = store::depop::find_user_by_username(&mut *conn, username).await? {
        return Ok(user);
    }

    let user = DepopUser {
        user_id: format!("dep_{}", hex_suffix(8)),
        username: username.to_string(),
        first_name: derive_first_name(username),
        followers: 0,
        items_sold: 0,
        verified: false,
        ..DepopUser::default()
    };
    store::depop::insert_user(&mut *conn, &user).await?;
    Ok(user)
}

fn derive_first_name(username: &str) -> Option<String> {
    username
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
}

fn synthesize_product(owner_id: &str, ordinal: usize, include_sold: bool) -> DepopProduct {
    DepopProduct {
        id: format!("dep_stub_{}", hex_suffix(8)),
        user_id: owner_id.to_string(),
        // With include_sold the listings alternate sold/unsold by ordinal
        // parity, starting sold; without it everything is unsold.
        sold: include_sold && ordinal % 2 == 0,
        gender: Some("unisex".to_string()),
        category: Some("Accessories".to_string()),
        size: Some("OS".to_string()),
        state: Some("Great".to_string()),
        brand: Some("Encore Demo".to_string()),
        colors: Some("Assorted".to_string()),
        price: Some(STUB_BASE_PRICE + ordinal as f64 * STUB_PRICE_STEP),
        images: Json(vec![STUB_IMAGE.to_string()]),
        description: Some("Educational placeholder listing.".to_string()),
        title: Some(format!("Demo drop {}", ordinal + 1)),
        platform: "depop".to_string(),
        address: Some("Remote".to_string()),
        discounted_price_amount: Some(0.0),
        date_updated: Some(Utc::now()),
    }
}

fn baseline_users() -> Vec<DepopUser> {
    vec![
        DepopUser {
            user_id: "dep_001".to_string(),
            username: "studioflux".to_string(),
            bio: Some("Curated streetwear and archival denim.".to_string()),
            first_name: Some("Mei".to_string()),
            last_name: Some("Chen".to_string()),
            followers: 3400,
            items_sold: 980,
            verified: true,
            reviews_rating: Some(4.95),
            ..DepopUser::default()
        },
        DepopUser {
            user_id: "dep_002".to_string(),
            username: "midnightmemo".to_string(),
            bio: Some("Minimalist silhouettes + handmade jewelry.".to_string()),
            first_name: Some("Luca".to_string()),
            followers: 1850,
            items_sold: 302,
            verified: false,
            reviews_rating: Some(4.7),
            ..DepopUser::default()
        },
    ]
}

fn baseline_products() -> Vec<DepopProduct> {
    vec![
        DepopProduct {
            id: "dep_prod_001".to_string(),
            user_id: "dep_001".to_string(),
            sold: false,
            gender: Some("unisex".to_string()),
            category: Some("Outerwear".to_string()),
            size: Some("L".to_string()),
            state: Some("Like new".to_string()),
            brand: Some("Arc'teryx".to_string()),
            colors: Some("Black".to_string()),
            price: Some(210.0),
            images: Json(vec![
                "https://images.unsplash.com/photo-1521579971123-1192931a1452?auto=format&fit=crop&w=600&q=80"
                    .to_string(),
            ]),
            description: Some("Veilance composite shell with zero flaws.".to_string()),
            title: Some("Veilance shell jacket".to_string()),
            platform: "depop".to_string(),
            address: Some("Brooklyn, NY".to_string()),
            discounted_price_amount: Some(0.0),
            date_updated: Some(Utc::now() - Duration::days(2)),
        },
        DepopProduct {
            id: "dep_prod_002".to_string(),
            user_id: "dep_002".to_string(),
            sold: true,
            gender: Some("women".to_string()),
            category: Some("Dresses".to_string()),
            size: Some("S".to_string()),
            state: Some("Great".to_string()),
            brand: Some("Reformation".to_string()),
            colors: Some("Emerald".to_string()),
            price: Some(120.0),
            images: Json(vec![
                "https://images.unsplash.com/photo-1483985988355-763728e1935b?auto=format&fit=crop&w=600&q=80"
                    .to_string(),
            ]),
            description: Some("Silk midi dress with open back.".to_string()),
            title: Some("Emerald silk midi".to_string()),
            platform: "depop".to_string(),
            address: Some("Austin, TX".to_string()),
            discounted_price_amount: Some(15.0),
            date_updated: Some(Utc::now() - Duration::days(5)),
        },
    ]
}
