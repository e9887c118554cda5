//! Catalog flows against a real Postgres
//!
//! Each test gets a fresh database from `#[sqlx::test]`. Needs `DATABASE_URL`
//! pointing at a server where the user may create databases; run with
//! `cargo test --test catalog_tests -- --ignored`.

use library_catalog_server::{
    config::{CatalogConfig, SeedConfig},
    models::{
        author::CreateAuthor,
        availability::CheckoutScope,
        book::{AddCopies, BookPatch, CreateBook},
        checkout::CheckoutRequest,
        event::{EventFailurePolicy, EventQuery, EventType, NewEvent},
        member::{CreateMember, Member},
    },
    repository::{bulk::BULK_INSERT_CHUNK_SIZE, events::EventsRepository, Repository},
    services::Services,
    AppError,
};
use sqlx::PgPool;

fn services(pool: PgPool, policy: EventFailurePolicy) -> Services {
    let catalog = CatalogConfig {
        checkout_scope: CheckoutScope::Active,
        event_failure_policy: policy,
    };
    let seed = SeedConfig {
        enabled: true,
        data_dir: format!("{}/seed_data", env!("CARGO_MANIFEST_DIR")),
    };
    Services::new(Repository::new(pool), &catalog, &seed)
}

fn new_book(isbn: &str, copies: u32) -> CreateBook {
    CreateBook {
        isbn: isbn.to_string(),
        title: "Dune".to_string(),
        description: "Desert planet".to_string(),
        image_url: String::new(),
        author_ids: Vec::new(),
        copies,
    }
}

async fn new_member(services: &Services, first_name: &str) -> Member {
    services
        .members
        .create(CreateMember {
            first_name: first_name.to_string(),
            last_name: "Member".to_string(),
            middle: String::new(),
            image_url: String::new(),
        })
        .await
        .unwrap()
}

async fn count(pool: &PgPool, sql: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(sql).fetch_one(pool).await.unwrap()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_book_lifecycle_with_checkout(pool: PgPool) {
    let services = services(pool.clone(), EventFailurePolicy::Abort);

    let book = services.books.create(new_book("978-1", 2)).await.unwrap();
    assert_eq!(book.isbn, "9781");
    assert_eq!(book.copies.len(), 2);

    let events = services.events.for_book("9781").await.unwrap();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.event_type == EventType::Create));

    let member = new_member(&services, "M1").await;

    services
        .checkouts
        .check_out(CheckoutRequest {
            copy_id: Some(book.copies[0].id),
            member_id: Some(member.id),
        })
        .await
        .unwrap();

    let counts = services.availability.for_book("9781", None).await.unwrap().unwrap();
    assert_eq!(counts.number_of_copies, 2);
    assert_eq!(counts.number_checked_out, 1);
    assert_eq!(counts.number_available, 1);

    let patched = services
        .books
        .patch(
            "9781",
            BookPatch {
                title: Some("Dune Messiah".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(patched.title, "Dune Messiah");

    let updates = services
        .events
        .list(&EventQuery {
            event_type: Some(EventType::Update),
        })
        .await
        .unwrap();
    assert_eq!(updates.len(), 2);
    assert!(updates.iter().all(|e| e.title == "Dune Messiah"));

    let after = services.availability.for_book("9781", None).await.unwrap().unwrap();
    assert_eq!(after.number_of_copies, 2);
    assert_eq!(after.number_checked_out, 1);
    assert_eq!(after.number_available, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_patch_unknown_isbn_changes_nothing(pool: PgPool) {
    let services = services(pool.clone(), EventFailurePolicy::Abort);

    let err = services
        .books
        .patch(
            "978-404",
            BookPatch {
                title: Some("Nothing".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM events").await, 0);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM books").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_blank_patch_writes_nothing(pool: PgPool) {
    let services = services(pool.clone(), EventFailurePolicy::Abort);
    services.books.create(new_book("978-9", 1)).await.unwrap();

    let blank = BookPatch {
        title: Some("   ".to_string()),
        ..Default::default()
    };
    let book = services.books.patch("978-9", blank).await.unwrap();
    assert_eq!(book.title, "Dune");
    assert_eq!(services.events.for_book("978-9").await.unwrap().len(), 1);

    let err = services.books.patch("978-404", BookPatch::default()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_recreate_over_soft_deleted_isbn(pool: PgPool) {
    let services = services(pool.clone(), EventFailurePolicy::Abort);

    services.books.create(new_book("978-2", 1)).await.unwrap();
    services.books.delete("978-2").await.unwrap();
    assert!(services.books.get("978-2").await.unwrap().is_none());

    let book = services.books.create(new_book("978-2", 3)).await.unwrap();
    assert_eq!(book.copies.len(), 3);

    assert_eq!(count(&pool, "SELECT COUNT(*) FROM books WHERE isbn = '9782'").await, 1);
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM books WHERE isbn = '9782' AND deleted_at IS NULL").await,
        1
    );
    // History of the purged row stays: 1 CREATE + 1 DELETE, then 3 CREATE
    assert_eq!(services.events.for_book("9782").await.unwrap().len(), 5);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_create_over_live_isbn_conflicts(pool: PgPool) {
    let services = services(pool, EventFailurePolicy::Abort);

    services.books.create(new_book("978-3", 1)).await.unwrap();
    let err = services.books.create(new_book("978-3", 1)).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let book = services
        .books
        .add_copies("978-3", AddCopies { count: 2 })
        .await
        .unwrap();
    assert_eq!(book.copies.len(), 3);
    assert_eq!(services.events.for_book("978-3").await.unwrap().len(), 3);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_event_failure_policy(pool: PgPool) {
    sqlx::query("DROP TABLE events").execute(&pool).await.unwrap();

    let aborting = services(pool.clone(), EventFailurePolicy::Abort);
    let err = aborting.books.create(new_book("978-4", 1)).await.unwrap_err();
    assert!(matches!(err, AppError::Database(_)));
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM books").await, 0);

    let logging = services(pool.clone(), EventFailurePolicy::Log);
    logging.books.create(new_book("978-4", 1)).await.unwrap();
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM books").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_seed_twice_is_idempotent(pool: PgPool) {
    let services = services(pool.clone(), EventFailurePolicy::Abort);

    let first = services.seed.seed().await.unwrap();
    assert!(first.empty_tables().is_empty());

    // Leftovers of normal use, soft-deleted rows included, are wiped
    services.books.create(new_book("978-5", 1)).await.unwrap();
    services.books.delete("978-5").await.unwrap();

    let second = services.seed.seed().await.unwrap();
    assert_eq!(first, second);

    // Copies created after a seed continue after the fixture ids
    let book = services.books.create(new_book("978-6", 1)).await.unwrap();
    assert_eq!(book.copies[0].id, first.copies + 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_concurrent_checkouts_of_one_copy(pool: PgPool) {
    let services = services(pool.clone(), EventFailurePolicy::Abort);
    let book = services.books.create(new_book("978-7", 10)).await.unwrap();
    let first = new_member(&services, "First").await;
    let second = new_member(&services, "Second").await;

    for copy in &book.copies {
        let (a, b) = tokio::join!(
            services.checkouts.check_out(CheckoutRequest {
                copy_id: Some(copy.id),
                member_id: Some(first.id),
            }),
            services.checkouts.check_out(CheckoutRequest {
                copy_id: Some(copy.id),
                member_id: Some(second.id),
            }),
        );
        let lent = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
        assert_eq!(lent, 1, "copy {} lent {} times", copy.id, lent);
        for result in [a, b] {
            if let Err(err) = result {
                assert!(matches!(err, AppError::Conflict(_)), "unexpected error: {:?}", err);
            }
        }
    }

    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM checkouts WHERE returned IS NULL").await,
        10
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_concurrent_authors_with_one_name(pool: PgPool) {
    let services = services(pool.clone(), EventFailurePolicy::Abort);
    let author = |round: usize| CreateAuthor {
        first_name: "Frank".to_string(),
        last_name: format!("Herbert {}", round),
        middle: String::new(),
    };

    for round in 0..10 {
        let (a, b) = tokio::join!(
            services.authors.create(author(round)),
            services.authors.create(author(round)),
        );
        let created = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
        assert_eq!(created, 1, "round {} created {} authors", round, created);
        for result in [a, b] {
            if let Err(err) = result {
                assert!(matches!(err, AppError::Conflict(_)), "unexpected error: {:?}", err);
            }
        }
    }

    assert_eq!(count(&pool, "SELECT COUNT(*) FROM authors").await, 10);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_bulk_insert_spans_several_statements(pool: PgPool) {
    let total = 2 * BULK_INSERT_CHUNK_SIZE + 1001;
    let events: Vec<NewEvent> = (0..total)
        .map(|i| NewEvent {
            isbn: "978-8".to_string(),
            copy_id: i as i64 + 1,
            event_type: EventType::Create,
            title: "Dune".to_string(),
            description: String::new(),
            image_url: String::new(),
        })
        .collect();

    let mut conn = pool.acquire().await.unwrap();
    let written = EventsRepository::insert_all(&mut conn, &events).await.unwrap();

    assert_eq!(written, total as u64);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM events").await, total as i64);
}
