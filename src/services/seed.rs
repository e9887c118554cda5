//! Development reset and seed
//!
//! Wipes the catalog and reloads it from the JSON fixtures in the configured
//! data directory. Two concurrent seeds race on the truncate; this endpoint
//! is meant for a single developer.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::BookAuthorLink,
        book::{normalize_isbn, BookCopy},
        event::{EventType, NewEvent},
        seed::{PlannedCheckout, SeedFixtures, SeedPlan, SeedReport},
    },
    repository::Repository,
};

/// Check-out times are drawn from this many hours in the past
const CHECKOUT_HOURS_AGO: std::ops::RangeInclusive<i64> = 24..=360;

#[derive(Clone)]
pub struct SeedService {
    repository: Repository,
    data_dir: PathBuf,
}

impl SeedService {
    pub fn new(repository: Repository, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            repository,
            data_dir: data_dir.into(),
        }
    }

    /// Replace the whole catalog with the fixture data
    pub async fn seed(&self) -> AppResult<SeedReport> {
        let fixtures = load_fixtures(&self.data_dir).await?;
        let plan = {
            let mut rng = rand::thread_rng();
            build_plan(&fixtures, Utc::now(), &mut rng)
        };

        self.repository.seed.reset_and_load(&plan).await?;
        let report = self.repository.seed.count_tables().await?;

        let empty = report.empty_tables();
        if !empty.is_empty() {
            tracing::error!(tables = ?empty, "Seed left tables empty");
            return Err(AppError::Internal("something went wrong seeding database".to_string()));
        }

        tracing::info!(
            books = report.books,
            copies = report.copies,
            checkouts = report.checkouts,
            events = report.events,
            "Database seeded"
        );
        Ok(report)
    }
}

/// Read the four fixture files from `dir`
pub async fn load_fixtures(dir: &Path) -> AppResult<SeedFixtures> {
    Ok(SeedFixtures {
        authors: read_fixture(dir, "authors.json").await?,
        books: read_fixture(dir, "books.json").await?,
        members: read_fixture(dir, "members.json").await?,
        checkouts: read_fixture(dir, "checkouts.json").await?,
    })
}

async fn read_fixture<T: DeserializeOwned>(dir: &Path, name: &str) -> AppResult<Vec<T>> {
    let path = dir.join(name);
    let raw = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| AppError::Internal(format!("cannot read {}: {}", path.display(), e)))?;
    serde_json::from_str(&raw)
        .map_err(|e| AppError::Internal(format!("cannot parse {}: {}", path.display(), e)))
}

/// Turn fixtures into insert-ready rows.
///
/// Copy ids run from 1 in fixture order. Rows that reference something the
/// fixtures do not define are dropped with a warning.
pub fn build_plan<R: Rng>(fixtures: &SeedFixtures, now: DateTime<Utc>, rng: &mut R) -> SeedPlan {
    let mut plan = SeedPlan::default();

    let mut author_ids = HashSet::new();
    let mut author_names = HashSet::new();
    for author in &fixtures.authors {
        let name = (author.first_name.clone(), author.middle.clone(), author.last_name.clone());
        if author_ids.contains(&author.id) {
            continue;
        }
        if !author_names.insert(name) {
            tracing::warn!(author_id = %author.id, "Seed author repeats another author's name");
            continue;
        }
        author_ids.insert(author.id);
        plan.authors.push(author.clone());
    }

    let mut member_ids = HashSet::new();
    for member in &fixtures.members {
        if member_ids.insert(member.id) {
            plan.members.push(member.clone());
        }
    }

    let mut isbns = HashSet::new();
    let mut next_copy_id = 1i64;
    for fixture in &fixtures.books {
        let isbn = match normalize_isbn(&fixture.isbn) {
            Ok(isbn) => isbn,
            Err(e) => {
                tracing::warn!(isbn = %fixture.isbn, "Skipping seed book: {}", e);
                continue;
            }
        };
        if !isbns.insert(isbn.clone()) {
            tracing::warn!(isbn = %isbn, "Skipping duplicate seed book");
            continue;
        }

        for _ in 0..fixture.copies {
            plan.copies.push(BookCopy {
                id: next_copy_id,
                isbn: isbn.clone(),
            });
            plan.events.push(NewEvent {
                isbn: isbn.clone(),
                copy_id: next_copy_id,
                event_type: EventType::Create,
                title: fixture.title.clone(),
                description: fixture.description.clone(),
                image_url: fixture.image_url.clone(),
            });
            next_copy_id += 1;
        }

        match fixture.author {
            Some(author_id) if author_ids.contains(&author_id) => {
                plan.author_links.push(BookAuthorLink {
                    book_isbn: isbn.clone(),
                    author_id,
                });
            }
            Some(author_id) => {
                tracing::warn!(isbn = %isbn, %author_id, "Seed book references unknown author");
            }
            None => {}
        }

        let mut book = fixture.clone();
        book.isbn = isbn;
        plan.books.push(book);
    }

    let copy_ids: HashSet<i64> = plan.copies.iter().map(|c| c.id).collect();
    let mut pairs: HashSet<(i64, Uuid)> = HashSet::new();
    let mut lent: HashSet<i64> = HashSet::new();
    for fixture in &fixtures.checkouts {
        let copy_id = fixture.book_id;
        if !copy_ids.contains(&copy_id) || !member_ids.contains(&fixture.member_id) {
            tracing::warn!(copy_id, member_id = %fixture.member_id, "Skipping seed checkout with unknown copy or member");
            continue;
        }
        if !pairs.insert((copy_id, fixture.member_id)) {
            continue;
        }

        let checked_out = now - Duration::hours(rng.gen_range(CHECKOUT_HOURS_AGO));
        let returned_at = now - Duration::hours(rng.gen_range(CHECKOUT_HOURS_AGO));
        let mut returned = (returned_at > checked_out).then_some(returned_at);

        // A copy is out to one member at a time
        if returned.is_none() && !lent.insert(copy_id) {
            returned = Some(now);
        }

        plan.checkouts.push(PlannedCheckout {
            copy_id,
            member_id: fixture.member_id,
            checked_out,
            returned,
        });
    }

    plan
}
