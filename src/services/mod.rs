//! Business logic services

pub mod authors;
pub mod availability;
pub mod books;
pub mod checkouts;
pub mod events;
pub mod members;
pub mod seed;

use crate::{
    config::{CatalogConfig, SeedConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub authors: authors::AuthorsService,
    pub members: members::MembersService,
    pub checkouts: checkouts::CheckoutsService,
    pub events: events::EventsService,
    pub availability: availability::AvailabilityService,
    pub seed: seed::SeedService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, catalog: &CatalogConfig, seed: &SeedConfig) -> Self {
        Self {
            books: books::BooksService::new(repository.clone(), catalog.event_failure_policy),
            authors: authors::AuthorsService::new(repository.clone()),
            members: members::MembersService::new(repository.clone()),
            checkouts: checkouts::CheckoutsService::new(repository.clone()),
            events: events::EventsService::new(repository.clone()),
            availability: availability::AvailabilityService::new(
                repository.clone(),
                catalog.checkout_scope,
            ),
            seed: seed::SeedService::new(repository.clone(), &seed.data_dir),
            repository,
        }
    }

    /// Whether the database answers
    pub async fn database_ready(&self) -> bool {
        match self.repository.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Database readiness check failed: {}", e);
                false
            }
        }
    }
}
