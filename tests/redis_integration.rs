//! Hash adapter integration tests.
//!
//! Verify the upsert-by-key contract against a live server: re-saving an
//! id never duplicates an entry, distinct ids each become one entry, and
//! high save volume stays key-indexed.
//!
//! These tests require a running Redis server. Set the environment
//! variable `TODO_STORE_TEST_REDIS_URL` to enable them:
//!
//! ```bash
//! export TODO_STORE_TEST_REDIS_URL="redis://localhost:6379"
//! cargo test --features redis --test redis_integration
//! ```

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic, clippy::print_stderr)]
#![cfg(feature = "redis")]

use std::env;
use std::time::Duration;
use todo_store::models::Todo;
use todo_store::storage::{IdStrategy, RedisTodoStorage, TodoMapping, TodoStorage};
use uuid::Uuid;

/// Environment variable for the Redis test connection URL.
const REDIS_URL_ENV: &str = "TODO_STORE_TEST_REDIS_URL";

/// Returns the Redis connection URL if available, or None to skip tests.
fn get_redis_url() -> Option<String> {
    env::var(REDIS_URL_ENV).ok()
}

/// Macro to skip tests when Redis is not available.
macro_rules! require_redis {
    () => {
        match get_redis_url() {
            Some(url) => url,
            None => {
                eprintln!(
                    "Skipping test: {} not set. Set this environment variable to run Redis tests.",
                    REDIS_URL_ENV
                );
                return;
            },
        }
    };
}

/// Builds a mapping with a namespace unique to this test run.
fn unique_mapping() -> TodoMapping {
    TodoMapping::new(
        format!("todo_{}", Uuid::new_v4().simple()),
        "id",
        "todo",
        IdStrategy::Provided,
    )
    .expect("valid mapping")
}

fn storage(url: &str, mapping: TodoMapping) -> RedisTodoStorage {
    RedisTodoStorage::new(url, mapping).expect("connect to Redis")
}

#[test]
fn test_save_and_get_todo() {
    let url = require_redis!();
    let storage = storage(&url, unique_mapping());

    let saved = storage
        .save(&Todo::new("TODO1", "A TODO"))
        .expect("save should succeed");
    assert_eq!(saved.id.as_deref(), Some("TODO1"));

    let found = storage
        .find_by_id(&"TODO1".to_string())
        .expect("lookup should succeed")
        .expect("record should exist");
    assert_eq!(found.text, "A TODO");

    storage.delete_all().expect("cleanup");
}

#[test]
fn test_distinct_ids_create_distinct_entries() {
    let url = require_redis!();
    let storage = storage(&url, unique_mapping());

    // Five saves over three distinct ids must leave exactly three entries.
    storage.save(&Todo::new("TODO1", "TODO VALUE 1")).unwrap();
    storage.save(&Todo::new("TODO2", "TODO VALUE 2")).unwrap();
    storage.save(&Todo::new("TODO2", "TODO VALUE 2")).unwrap();
    storage.save(&Todo::new("TODO3", "TODO VALUE 2")).unwrap();
    storage.save(&Todo::new("TODO3", "CHANGED TODO")).unwrap();

    let todos = storage.find_all().expect("list should succeed");
    assert_eq!(todos.len(), 3);

    storage.delete_all().expect("cleanup");
}

#[test]
fn test_resaving_same_id_overwrites_in_place() {
    let url = require_redis!();
    let storage = storage(&url, unique_mapping());

    storage.save(&Todo::new("TODO1", "TODO VALUE 1")).unwrap();
    storage.save(&Todo::new("TODO1", "TODO VALUE 2")).unwrap();
    storage.save(&Todo::new("TODO1", "TODO VALUE 2")).unwrap();
    storage.save(&Todo::new("TODO1", "TODO VALUE 2")).unwrap();
    storage.save(&Todo::new("TODO1", "CHANGED TODO")).unwrap();

    let todos = storage.find_all().expect("list should succeed");
    assert_eq!(todos.len(), 1, "repeated saves must not duplicate the entry");
    assert_eq!(todos[0].text, "CHANGED TODO");

    storage.delete_all().expect("cleanup");
}

#[test]
fn test_ten_thousand_distinct_ids() {
    let url = require_redis!();
    let storage = storage(&url, unique_mapping());

    for counter in 0..10_000 {
        storage
            .save(&Todo::new(format!("TODO{counter}"), "A TODO"))
            .expect("save should succeed");
    }

    let todos = storage.find_all().expect("list should succeed");
    assert_eq!(todos.len(), 10_000);

    // Every id is individually fetchable with the stored text.
    for counter in 0..10_000 {
        let found = storage
            .fetch(&format!("TODO{counter}"))
            .expect("record should exist");
        assert_eq!(found.text, "A TODO");
    }

    storage.delete_all().expect("cleanup");
}

#[test]
fn test_find_absent_id_is_none() {
    let url = require_redis!();
    let storage = storage(&url, unique_mapping());

    let found = storage
        .find_by_id(&"MISSING".to_string())
        .expect("a miss is not a failure");
    assert!(found.is_none());
}

#[test]
fn test_delete_nonexistent_is_noop() {
    let url = require_redis!();
    let storage = storage(&url, unique_mapping());

    storage
        .delete_by_id(&"MISSING".to_string())
        .expect("deleting an absent id is a no-op");
}

#[test]
fn test_delete_removes_entry() {
    let url = require_redis!();
    let storage = storage(&url, unique_mapping());

    storage.save(&Todo::new("TODO1", "A TODO")).unwrap();
    storage.delete_by_id(&"TODO1".to_string()).unwrap();

    assert!(storage.find_by_id(&"TODO1".to_string()).unwrap().is_none());
    assert_eq!(storage.count().unwrap(), 0);
}

#[test]
fn test_delete_all_clears_namespace() {
    let url = require_redis!();
    let storage = storage(&url, unique_mapping());

    for counter in 0..25 {
        storage
            .save(&Todo::new(format!("TODO{counter}"), "A TODO"))
            .unwrap();
    }

    storage.delete_all().expect("reset should succeed");
    assert!(storage.find_all().unwrap().is_empty());
}

#[test]
fn test_ttl_is_passed_through() {
    let url = require_redis!();
    let mapping = unique_mapping();
    let key = mapping.key_for("TODO1");
    let storage = storage(&url, mapping).with_ttl(Duration::from_secs(120));

    storage.save(&Todo::new("TODO1", "A TODO")).unwrap();

    // Observe the TTL through a raw connection; the contract itself owns
    // no expiry behavior.
    let client = redis::Client::open(url.as_str()).expect("raw client");
    let mut conn = client.get_connection().expect("raw connection");
    let ttl: i64 = redis::cmd("TTL").arg(&key).query(&mut conn).expect("TTL");
    assert!(ttl > 0 && ttl <= 120, "entry should carry the configured TTL, got {ttl}");

    storage.delete_all().expect("cleanup");
}
