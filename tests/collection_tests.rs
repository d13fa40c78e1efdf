//! File-backed collection tests, including git commits of every change
mod common;

use admin_console::records::catalog::builtin_schema;
use admin_console::{
    Backend, Collection, ConsoleServerHandler, FieldChanges, FieldValue, IdStrategy, RecordFilter,
    RecordId, Storage,
};
use common::{extract_id_from_response, fields, file_config};
use git2::Repository;
use std::fs;
use tempfile::TempDir;

fn setup_test_repo() -> (TempDir, Repository) {
    let temp_dir = TempDir::new().unwrap();
    let repo = Repository::init(temp_dir.path()).unwrap();

    // Configure git user for the test repo
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();

    (temp_dir, repo)
}

fn head_message(repo: &Repository) -> String {
    let head = repo.head().unwrap().target().unwrap();
    repo.find_commit(head)
        .unwrap()
        .message()
        .unwrap()
        .to_string()
}

fn invoice(no: &str) -> Vec<String> {
    fields(&[
        &format!("invoice_no={}", no),
        "customer=Acme Traders",
        "amount=500",
        "status=Pending",
    ])
}

#[tokio::test]
async fn test_file_module_starts_empty_and_persists() {
    let temp_dir = TempDir::new().unwrap();

    {
        let handler = ConsoleServerHandler::new(file_config("billing", temp_dir.path()), false).unwrap();
        let list = handler
            .handle_list("billing".to_string(), None, Vec::new())
            .await
            .unwrap();
        assert!(list.contains("No billing entries found"));

        let result = handler
            .handle_create("billing".to_string(), invoice("INV-1"))
            .await
            .unwrap();
        assert_eq!(extract_id_from_response(&result), "1");
        handler
            .handle_create("billing".to_string(), invoice("INV-2"))
            .await
            .unwrap();
        handler
            .handle_delete("billing".to_string(), "1".to_string())
            .await
            .unwrap();
    }

    let content = fs::read_to_string(temp_dir.path().join("billing.toml")).unwrap();
    assert!(content.contains("INV-2"));
    assert!(!content.contains("INV-1\""));

    // A new handler sees what the previous one saved
    let handler = ConsoleServerHandler::new(file_config("billing", temp_dir.path()), false).unwrap();
    let view = handler
        .handle_view("billing".to_string(), "2".to_string())
        .await
        .unwrap();
    assert!(view.contains("INV-2"));
    assert!(view.contains("[Pending]"));

    // Max id is 2 after the delete, so the next record is 3
    let result = handler
        .handle_create("billing".to_string(), invoice("INV-3"))
        .await
        .unwrap();
    assert_eq!(extract_id_from_response(&result), "3");
}

#[tokio::test]
async fn test_git_sync_commits_every_change() {
    let (temp_dir, repo) = setup_test_repo();
    let handler = ConsoleServerHandler::new(file_config("billing", temp_dir.path()), true).unwrap();

    handler
        .handle_create("billing".to_string(), invoice("INV-1"))
        .await
        .unwrap();
    assert_eq!(head_message(&repo), "Create billing #1");

    handler
        .handle_update(
            "billing".to_string(),
            "1".to_string(),
            fields(&["status=Paid"]),
        )
        .await
        .unwrap();
    assert_eq!(head_message(&repo), "Update billing #1");

    handler
        .handle_delete("billing".to_string(), "1".to_string())
        .await
        .unwrap();
    assert_eq!(head_message(&repo), "Delete billing #1");

    // No origin remote: push on drop fails quietly
    drop(handler);
}

#[tokio::test]
async fn test_timestamp_ids_on_file_backend() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data").join("billing.toml");
    let schema = builtin_schema("billing").unwrap();
    let mut collection = Collection::new(
        schema.clone(),
        Backend::File(Storage::new(&path, false)),
        IdStrategy::Timestamp,
    )
    .unwrap();
    collection.ensure_loaded().await.unwrap();

    let changes = FieldChanges::new()
        .with("invoice_no", FieldValue::text("INV-1"))
        .with("customer", FieldValue::text("Acme"))
        .with("amount", FieldValue::Number(1.0))
        .with("status", FieldValue::text("Paid"));
    let first = collection.create(&changes).await.unwrap();
    let second = collection.create(&changes).await.unwrap();
    assert!(second.id > first.id);

    let mut reopened = Collection::new(
        schema,
        Backend::File(Storage::new(&path, false)),
        IdStrategy::Timestamp,
    )
    .unwrap();
    reopened.refresh().await.unwrap();
    assert_eq!(reopened.len(), 2);
    assert!(reopened.get(first.id).is_some());
    assert_eq!(
        reopened
            .list(&RecordFilter::new().search("inv-1"))
            .len(),
        2
    );
    assert!(reopened.get(RecordId(1)).is_none());
}
