//! Repository layer for database operations
//!
//! Reads go through the pool held by each repository. Steps of a multi-step
//! mutation take the caller's `&mut PgConnection` so they share one
//! transaction.

pub mod authors;
pub mod books;
pub mod bulk;
pub mod checkouts;
pub mod events;
pub mod members;
pub mod seed;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub authors: authors::AuthorsRepository,
    pub members: members::MembersRepository,
    pub checkouts: checkouts::CheckoutsRepository,
    pub events: events::EventsRepository,
    pub seed: seed::SeedRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            authors: authors::AuthorsRepository::new(pool.clone()),
            members: members::MembersRepository::new(pool.clone()),
            checkouts: checkouts::CheckoutsRepository::new(pool.clone()),
            events: events::EventsRepository::new(pool.clone()),
            seed: seed::SeedRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round trip to the database
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
