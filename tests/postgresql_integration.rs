//! Relational adapter integration tests.
//!
//! Pin the surrogate-key contract against a live server: ids are assigned
//! once on insert, updates replace in place without growing the table, and
//! a deleted id fails strict fetches forever instead of being reused.
//!
//! These tests require a running PostgreSQL server. Set the environment
//! variable `TODO_STORE_TEST_POSTGRES_URL` to enable them:
//!
//! ```bash
//! export TODO_STORE_TEST_POSTGRES_URL="postgresql://postgres@localhost/todos_test"
//! cargo test --features postgres --test postgresql_integration
//! ```

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic, clippy::print_stderr)]
#![cfg(feature = "postgres")]

use std::env;
use todo_store::Error;
use todo_store::models::Todo;
use todo_store::storage::{IdStrategy, PostgresTodoStorage, TodoMapping, TodoStorage};
use uuid::Uuid;

/// Environment variable for the PostgreSQL test connection URL.
const POSTGRES_URL_ENV: &str = "TODO_STORE_TEST_POSTGRES_URL";

/// Returns the PostgreSQL connection URL if available, or None to skip tests.
fn get_postgres_url() -> Option<String> {
    env::var(POSTGRES_URL_ENV).ok()
}

/// Macro to skip tests when PostgreSQL is not available.
macro_rules! require_postgres {
    () => {
        match get_postgres_url() {
            Some(url) => url,
            None => {
                eprintln!(
                    "Skipping test: {} not set. Set this environment variable to run PostgreSQL tests.",
                    POSTGRES_URL_ENV
                );
                return;
            },
        }
    };
}

/// Builds a mapping with a table unique to this test run.
fn unique_mapping() -> TodoMapping {
    TodoMapping::new(
        format!("todo_{}", Uuid::new_v4().simple()),
        "id",
        "todo",
        IdStrategy::Generated,
    )
    .expect("valid mapping")
}

fn storage(url: &str) -> PostgresTodoStorage {
    PostgresTodoStorage::new(url, unique_mapping()).expect("connect to PostgreSQL")
}

#[test]
fn test_save_assigns_id() {
    let url = require_postgres!();
    let storage = storage(&url);

    let saved = storage
        .save(&Todo::unsaved("TODO 1"))
        .expect("save should succeed");
    assert!(saved.id.is_some(), "insert must populate the surrogate key");
    assert_eq!(saved.text, "TODO 1");
}

#[test]
fn test_get_saved_todo() {
    let url = require_postgres!();
    let storage = storage(&url);

    let saved = storage.save(&Todo::unsaved("TODO 1")).unwrap();
    let id = saved.id.expect("assigned id");

    let found = storage.fetch(&id).expect("record should exist");
    assert_eq!(found.id, Some(id));
    assert_eq!(found.text, "TODO 1");
}

#[test]
fn test_update_replaces_in_place() {
    let url = require_postgres!();
    let storage = storage(&url);

    let mut saved = storage.save(&Todo::unsaved("TODO 1")).unwrap();
    let id = saved.id.expect("assigned id");

    saved.text = "TODO 2".to_string();
    let updated = storage.save(&saved).expect("update should succeed");

    assert_eq!(updated.id, Some(id), "the id never changes");
    assert_eq!(updated.text, "TODO 2");
    assert_eq!(
        storage.count().unwrap(),
        1,
        "an update must not create a second row"
    );
}

#[test]
fn test_update_of_missing_row_fails() {
    let url = require_postgres!();
    let storage = storage(&url);

    let result = storage.save(&Todo::new(4_242_i64, "TODO 1"));
    assert!(matches!(result, Err(Error::NotFound { .. })));
}

#[test]
fn test_fetch_after_delete_fails() {
    let url = require_postgres!();
    let storage = storage(&url);

    let saved = storage.save(&Todo::unsaved("TODO 1")).unwrap();
    let id = saved.id.expect("assigned id");

    storage.delete_by_id(&id).expect("delete should succeed");

    // A plain lookup reports a normal miss; the strict fetch must fail.
    assert!(storage.find_by_id(&id).unwrap().is_none());
    let result = storage.fetch(&id);
    assert!(matches!(result, Err(Error::NotFound { .. })));
}

#[test]
fn test_deleted_id_is_never_reassigned() {
    let url = require_postgres!();
    let storage = storage(&url);

    let first = storage.save(&Todo::unsaved("TODO 1")).unwrap();
    let first_id = first.id.expect("assigned id");
    storage.delete_by_id(&first_id).unwrap();

    let second = storage.save(&Todo::unsaved("TODO 2")).unwrap();
    let second_id = second.id.expect("assigned id");

    assert!(
        second_id > first_id,
        "keys are monotonic; a deleted id must not come back"
    );
    assert!(matches!(
        storage.fetch(&first_id),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn test_delete_nonexistent_is_noop() {
    let url = require_postgres!();
    let storage = storage(&url);

    storage
        .delete_by_id(&9_999)
        .expect("deleting an absent id is a no-op");
}

#[test]
fn test_find_all_snapshots_live_rows() {
    let url = require_postgres!();
    let storage = storage(&url);

    let first = storage.save(&Todo::unsaved("TODO 1")).unwrap();
    storage.save(&Todo::unsaved("TODO 2")).unwrap();
    storage.save(&Todo::unsaved("TODO 3")).unwrap();

    let todos = storage.find_all().expect("list should succeed");
    assert_eq!(todos.len(), 3);
    assert!(todos.iter().any(|t| t.id == first.id));
}

#[test]
fn test_delete_all_clears_table() {
    let url = require_postgres!();
    let storage = storage(&url);

    storage.save(&Todo::unsaved("TODO 1")).unwrap();
    storage.save(&Todo::unsaved("TODO 2")).unwrap();

    storage.delete_all().expect("reset should succeed");
    assert!(storage.find_all().unwrap().is_empty());
}
