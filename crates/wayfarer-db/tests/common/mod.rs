//! Shared setup for integration tests.

#![allow(dead_code)]

use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use wayfarer_config::AppConfig;
use wayfarer_core::ids::{CustomTourId, UserId};
use wayfarer_db::{DbConfig, DbManager};

/// Bootstrap the test environment, open a fresh in-memory database and
/// apply migrations.
pub async fn setup() -> Surreal<Any> {
    wayfarer_config::testing::bootstrap();
    let config = AppConfig::from_env().unwrap();
    let manager = DbManager::connect(&DbConfig::from(&config)).await.unwrap();
    let db = manager.client().clone();
    wayfarer_db::run_migrations(&db).await.unwrap();
    db
}

/// Insert a tour owned by the tour service.
pub async fn insert_tour(db: &Surreal<Any>, name: &str) -> CustomTourId {
    let id = CustomTourId::new();
    db.query("CREATE type::record('custom_tour', $id) SET name = $name")
        .bind(("id", id.to_string()))
        .bind(("name", name.to_string()))
        .await
        .unwrap()
        .check()
        .unwrap();
    id
}

/// Insert a user owned by the user service.
pub async fn insert_user(db: &Surreal<Any>, username: &str) -> UserId {
    let id = UserId::new();
    db.query("CREATE type::record('user', $id) SET username = $username")
        .bind(("id", id.to_string()))
        .bind(("username", username.to_string()))
        .await
        .unwrap()
        .check()
        .unwrap();
    id
}
