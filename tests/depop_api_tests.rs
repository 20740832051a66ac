// tests/depop_api_tests.rs

use encore_api::{config::Config, routes, services, state::AppState};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

async fn spawn_app() -> (String, SqlitePool) {
    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    services::vinted::seed_vinted_data(&pool)
        .await
        .expect("Vinted seed failed");
    services::depop::seed_depop_data(&pool)
        .await
        .expect("Depop seed failed");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        rust_log: "error".to_string(),
    };

    let state = AppState {
        pool: pool.clone(),
        config,
    };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, pool)
}

async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn seed_is_idempotent() {
    let (_address, pool) = spawn_app().await;

    assert_eq!(count(&pool, "depop_users").await, 2);
    assert_eq!(count(&pool, "depop_products").await, 2);

    services::depop::seed_depop_data(&pool).await.unwrap();

    assert_eq!(count(&pool, "depop_users").await, 2);
    assert_eq!(count(&pool, "depop_products").await, 2);
}

#[tokio::test]
async fn repeat_scrape_resolves_to_the_same_user() {
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let first: Vec<serde_json::Value> = client
        .post(format!("{}/scrape/depop", address))
        .json(&serde_json::json!({ "usernames": ["alice"] }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let second: Vec<serde_json::Value> = client
        .post(format!("{}/scrape/depop", address))
        .json(&serde_json::json!({ "usernames": ["alice"] }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_eq!(first[0]["owner"]["username"], "alice");
    assert_eq!(
        first[0]["owner"]["user_id"],
        second[0]["owner"]["user_id"],
        "the second ingest must reuse the user created by the first"
    );

    // Two products, but only one new user.
    assert_eq!(count(&pool, "depop_users").await, 3);
    assert_eq!(count(&pool, "depop_products").await, 4);
}

#[tokio::test]
async fn created_users_get_generated_identity() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let records: Vec<serde_json::Value> = client
        .post(format!("{}/scrape/depop", address))
        .json(&serde_json::json!({ "usernames": ["alice"] }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let owner = &records[0]["owner"];
    assert!(owner["user_id"].as_str().unwrap().starts_with("dep_"));
    assert_eq!(owner["first_name"], "A");
    assert_eq!(owner["verified"], false);
    assert_eq!(owner["followers"], 0);
}

#[tokio::test]
async fn sold_flags_alternate_when_sold_listings_are_included() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let records: Vec<serde_json::Value> = client
        .post(format!("{}/scrape/depop", address))
        .json(&serde_json::json!({
            "usernames": ["a", "b", "c", "d"],
            "include_sold": true,
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let flags: Vec<bool> = records
        .iter()
        .map(|r| r["sold"].as_bool().unwrap())
        .collect();
    assert_eq!(flags, vec![true, false, true, false]);
}

#[tokio::test]
async fn everything_is_unsold_without_include_sold() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let records: Vec<serde_json::Value> = client
        .post(format!("{}/scrape/depop", address))
        .json(&serde_json::json!({ "usernames": ["a", "b", "c"] }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r["sold"] == false));

    assert_eq!(records[0]["price"], 48.0);
    assert_eq!(records[1]["price"], 53.0);
    assert_eq!(records[2]["price"], 58.0);
}

#[tokio::test]
async fn scrape_rejects_empty_username_list() {
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/scrape/depop", address))
        .json(&serde_json::json!({ "usernames": [] }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(count(&pool, "depop_products").await, 2);
}

#[tokio::test]
async fn legacy_flags_are_accepted_but_inert() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let records: Vec<serde_json::Value> = client
        .post(format!("{}/scrape/depop", address))
        .json(&serde_json::json!({
            "usernames": ["bob"],
            "download_files": true,
            "start_from_item": "item_42",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // The flags change nothing about the synthesized output.
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["sold"], false);
    assert_eq!(records[0]["brand"], "Encore Demo");
}

#[tokio::test]
async fn list_users_applies_optional_filters() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let users: Vec<serde_json::Value> = client
        .get(format!("{}/depop/users", address))
        .query(&[("verified", "true")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "studioflux");

    let users: Vec<serde_json::Value> = client
        .get(format!("{}/depop/users", address))
        .query(&[("min_followers", "2000")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "studioflux");

    let users: Vec<serde_json::Value> = client
        .get(format!("{}/depop/users", address))
        .query(&[("username", "MIDNIGHT")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "midnightmemo");
}

#[tokio::test]
async fn get_user_returns_404_when_absent() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/depop/users/dep_001", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let user: serde_json::Value = response.json().await.unwrap();
    assert_eq!(user["username"], "studioflux");
    assert_eq!(user["products"].as_array().unwrap().len(), 1);

    let response = client
        .get(format!("{}/depop/users/no_such_user", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn include_sold_filter_hides_sold_listings() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    // Synthesize a batch where half the listings are sold.
    client
        .post(format!("{}/scrape/depop", address))
        .json(&serde_json::json!({
            "usernames": ["a", "b", "c", "d"],
            "include_sold": true,
        }))
        .send()
        .await
        .unwrap();

    let all: Vec<serde_json::Value> = client
        .get(format!("{}/depop/products", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    // 2 seeded + 4 stubs; the default includes sold listings.
    assert_eq!(all.len(), 6);

    let unsold: Vec<serde_json::Value> = client
        .get(format!("{}/depop/products", address))
        .query(&[("include_sold", "false")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    // Drops the seeded sold listing and the two sold stubs.
    assert_eq!(unsold.len(), 3);
    assert!(unsold.iter().all(|p| p["sold"] == false));
}

#[tokio::test]
async fn product_filters_compose_brand_and_owner() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let products: Vec<serde_json::Value> = client
        .get(format!("{}/depop/products", address))
        .query(&[("brand", "arc")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["brand"], "Arc'teryx");

    let products: Vec<serde_json::Value> = client
        .get(format!("{}/depop/products", address))
        .query(&[("username", "studioflux")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["id"], "dep_prod_001");
    assert_eq!(products[0]["owner"]["username"], "studioflux");

    let products: Vec<serde_json::Value> = client
        .get(format!("{}/depop/products", address))
        .query(&[("size", "S")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["title"], "Emerald silk midi");
}

#[tokio::test]
async fn camel_case_marketplace_fields_survive_serialization() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let products: Vec<serde_json::Value> = client
        .get(format!("{}/depop/products", address))
        .query(&[("brand", "reformation")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["discountedPriceAmount"], 15.0);
    assert!(products[0]["dateUpdated"].is_string());
}
