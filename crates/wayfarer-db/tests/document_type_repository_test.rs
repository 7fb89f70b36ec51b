//! Integration tests for the DocumentType repository using in-memory
//! SurrealDB.

mod common;

use std::time::Duration;

use wayfarer_core::error::WayfarerError;
use wayfarer_core::ids::{DocumentTypeId, UserId};
use wayfarer_core::models::document_type::{CreateDocumentType, UpdateDocumentType};
use wayfarer_core::repository::{DocumentTypeFilter, DocumentTypeRepository, Pagination};
use wayfarer_db::repository::SurrealDocumentTypeRepository;

#[tokio::test]
async fn create_applies_defaults_and_round_trips() {
    let db = common::setup().await;
    let repo = SurrealDocumentTypeRepository::new(db);

    let created = repo.create(CreateDocumentType::new("Passport")).await.unwrap();

    assert_eq!(created.document_type_name, "Passport");
    assert!(!created.is_required);
    assert!(created.is_active);
    assert!(created.description.is_none());
    assert!(created.created_by.is_none());

    let fetched = repo.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn duplicate_name_is_a_uniqueness_violation() {
    let db = common::setup().await;
    let repo = SurrealDocumentTypeRepository::new(db);

    repo.create(CreateDocumentType::new("Passport")).await.unwrap();
    let err = repo
        .create(CreateDocumentType::new("Passport").required(true))
        .await
        .unwrap_err();

    match err {
        WayfarerError::AlreadyExists {
            entity,
            field,
            value,
        } => {
            assert_eq!(entity, "document_type");
            assert_eq!(field, "document_type_name");
            assert_eq!(value, "Passport");
        }
        other => panic!("expected AlreadyExists, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_creates_of_one_name_yield_a_single_winner() {
    const WRITERS: usize = 8;

    let db = common::setup().await;
    let repo = SurrealDocumentTypeRepository::new(db);

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..WRITERS {
        let repo = repo.clone();
        tasks.spawn(async move { repo.create(CreateDocumentType::new("Passport")).await });
    }

    let mut created = 0;
    let mut rejected = 0;
    while let Some(outcome) = tasks.join_next().await {
        match outcome.unwrap() {
            Ok(_) => created += 1,
            Err(WayfarerError::AlreadyExists { field, value, .. }) => {
                assert_eq!(field, "document_type_name");
                assert_eq!(value, "Passport");
                rejected += 1;
            }
            Err(other) => panic!("expected AlreadyExists, got {other:?}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(rejected, WRITERS - 1);
    let all = repo
        .list(DocumentTypeFilter::default(), Pagination::default())
        .await
        .unwrap();
    assert_eq!(all.total, 1);
}

#[tokio::test]
async fn names_are_case_sensitive() {
    let db = common::setup().await;
    let repo = SurrealDocumentTypeRepository::new(db);

    repo.create(CreateDocumentType::new("Visa")).await.unwrap();
    let lower = repo.create(CreateDocumentType::new("visa")).await.unwrap();

    assert_eq!(lower.document_type_name, "visa");
    assert_eq!(repo.get_by_name("visa").await.unwrap().id, lower.id);
}

#[tokio::test]
async fn blank_name_fails_validation() {
    let db = common::setup().await;
    let repo = SurrealDocumentTypeRepository::new(db);

    let err = repo.create(CreateDocumentType::new("")).await.unwrap_err();
    assert!(matches!(err, WayfarerError::Validation { ref field, .. } if field == "document_type_name"));
}

#[tokio::test]
async fn created_by_must_reference_an_existing_user() {
    let db = common::setup().await;
    let admin = common::insert_user(&db, "admin").await;
    let repo = SurrealDocumentTypeRepository::new(db);

    let created = repo
        .create(
            CreateDocumentType::new("Travel insurance")
                .with_description("Proof of cover for the whole trip")
                .required(true)
                .created_by(admin),
        )
        .await
        .unwrap();
    assert_eq!(created.created_by, Some(admin));
    assert!(created.is_required);

    let err = repo
        .create(CreateDocumentType::new("Vaccination record").created_by(UserId::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, WayfarerError::InvalidReference { ref entity, .. } if entity == "user"));
}

#[tokio::test]
async fn update_keeps_created_date_and_advances_updated_date() {
    let db = common::setup().await;
    let repo = SurrealDocumentTypeRepository::new(db);

    let created = repo.create(CreateDocumentType::new("Visa")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;

    let updated = repo
        .update(
            created.id,
            UpdateDocumentType {
                description: Some(Some("Entry visa for the destination".into())),
                is_required: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.document_type_name, "Visa"); // unchanged
    assert_eq!(updated.description.as_deref(), Some("Entry visa for the destination"));
    assert!(updated.is_required);
    assert_eq!(updated.created_date, created.created_date);
    assert!(updated.updated_date > created.updated_date);

    let cleared = repo
        .update(
            created.id,
            UpdateDocumentType {
                description: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(cleared.description.is_none());
}

#[tokio::test]
async fn empty_update_still_touches_updated_date() {
    let db = common::setup().await;
    let repo = SurrealDocumentTypeRepository::new(db);

    let created = repo.create(CreateDocumentType::new("Permit")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;

    let touched = repo
        .update(created.id, UpdateDocumentType::default())
        .await
        .unwrap();
    assert_eq!(touched.created_date, created.created_date);
    assert!(touched.updated_date > created.updated_date);
}

#[tokio::test]
async fn rename_to_existing_name_is_rejected() {
    let db = common::setup().await;
    let repo = SurrealDocumentTypeRepository::new(db);

    repo.create(CreateDocumentType::new("Passport")).await.unwrap();
    let visa = repo.create(CreateDocumentType::new("Visa")).await.unwrap();

    let err = repo
        .update(
            visa.id,
            UpdateDocumentType {
                document_type_name: Some("Passport".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, WayfarerError::AlreadyExists { ref value, .. } if value == "Passport"));

    // The failed rename left the record untouched.
    assert_eq!(repo.get_by_id(visa.id).await.unwrap().document_type_name, "Visa");
}

#[tokio::test]
async fn update_missing_record_is_not_found() {
    let db = common::setup().await;
    let repo = SurrealDocumentTypeRepository::new(db);

    let err = repo
        .update(
            DocumentTypeId::new(),
            UpdateDocumentType {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, WayfarerError::NotFound { .. }));
}

#[tokio::test]
async fn deactivate_is_a_soft_delete() {
    let db = common::setup().await;
    let repo = SurrealDocumentTypeRepository::new(db);

    let created = repo.create(CreateDocumentType::new("Visa")).await.unwrap();
    let deactivated = repo.deactivate(created.id).await.unwrap();
    assert!(!deactivated.is_active);

    let fetched = repo.get_by_id(created.id).await.unwrap();
    assert!(!fetched.is_active);
    assert_eq!(fetched.document_type_name, "Visa");
}

#[tokio::test]
async fn hard_delete_removes_the_record_and_frees_the_name() {
    let db = common::setup().await;
    let repo = SurrealDocumentTypeRepository::new(db);

    let created = repo.create(CreateDocumentType::new("Visa")).await.unwrap();
    repo.delete(created.id).await.unwrap();

    assert!(matches!(
        repo.get_by_id(created.id).await.unwrap_err(),
        WayfarerError::NotFound { .. }
    ));
    assert!(matches!(
        repo.delete(created.id).await.unwrap_err(),
        WayfarerError::NotFound { .. }
    ));

    repo.create(CreateDocumentType::new("Visa")).await.unwrap();
}

#[tokio::test]
async fn list_filters_and_paginates_by_name() {
    let db = common::setup().await;
    let repo = SurrealDocumentTypeRepository::new(db);

    for (name, required) in [("Visa", true), ("Passport", true), ("Insurance", false)] {
        repo.create(CreateDocumentType::new(name).required(required))
            .await
            .unwrap();
    }
    let retired = repo
        .create(CreateDocumentType::new("Yellow fever card"))
        .await
        .unwrap();
    repo.deactivate(retired.id).await.unwrap();

    let all = repo
        .list(DocumentTypeFilter::default(), Pagination::default())
        .await
        .unwrap();
    assert_eq!(all.total, 4);
    let names: Vec<_> = all.items.iter().map(|d| d.document_type_name.as_str()).collect();
    assert_eq!(names, ["Insurance", "Passport", "Visa", "Yellow fever card"]);

    let active = repo
        .list(DocumentTypeFilter::active(), Pagination::default())
        .await
        .unwrap();
    assert_eq!(active.total, 3);
    assert!(active.items.iter().all(|d| d.is_active));

    let required_page = repo
        .list(
            DocumentTypeFilter {
                is_active: Some(true),
                is_required: Some(true),
            },
            Pagination {
                offset: 1,
                limit: 1,
            },
        )
        .await
        .unwrap();
    assert_eq!(required_page.total, 2);
    assert_eq!(required_page.items.len(), 1);
    assert_eq!(required_page.items[0].document_type_name, "Visa");
}

#[tokio::test]
async fn get_by_unknown_name_is_not_found() {
    let db = common::setup().await;
    let repo = SurrealDocumentTypeRepository::new(db);

    let err = repo.get_by_name("Nonexistent").await.unwrap_err();
    assert!(matches!(err, WayfarerError::NotFound { .. }));
}
