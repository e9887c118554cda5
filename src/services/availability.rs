//! Copy availability aggregates

use std::collections::HashSet;

use crate::{
    error::AppResult,
    models::{
        availability::{BookAvailability, CheckoutScope},
        book::{normalize_isbn, Book},
        checkout::Checkout,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AvailabilityService {
    repository: Repository,
    default_scope: CheckoutScope,
}

impl AvailabilityService {
    pub fn new(repository: Repository, default_scope: CheckoutScope) -> Self {
        Self {
            repository,
            default_scope,
        }
    }

    /// Counts for every live book that has copies
    pub async fn all(&self, scope: Option<CheckoutScope>) -> AppResult<Vec<BookAvailability>> {
        let books = self.repository.books.list_live().await?;
        let checkouts = self.repository.checkouts.for_live_books().await?;
        Ok(compute_aggregates(&books, &checkouts, scope.unwrap_or(self.default_scope)))
    }

    /// Counts for one live book; `None` when it is missing or has no copies
    pub async fn for_book(
        &self,
        isbn: &str,
        scope: Option<CheckoutScope>,
    ) -> AppResult<Option<BookAvailability>> {
        let isbn = normalize_isbn(isbn)?;
        let Some(book) = self.repository.books.find_live(&isbn).await? else {
            return Ok(None);
        };
        let checkouts = self.repository.checkouts.for_book(&isbn).await?;

        let scope = scope.unwrap_or(self.default_scope);
        Ok(compute_aggregates(std::slice::from_ref(&book), &checkouts, scope).pop())
    }
}

/// Per-book copy counts. A copy is checked out when at least one checkout
/// within `scope` references it; books without copies are left out.
pub fn compute_aggregates(
    books: &[Book],
    checkouts: &[Checkout],
    scope: CheckoutScope,
) -> Vec<BookAvailability> {
    let checked_out: HashSet<i64> = checkouts
        .iter()
        .filter(|c| scope.includes(c))
        .map(|c| c.copy_id)
        .collect();

    books
        .iter()
        .filter(|book| !book.copies.is_empty())
        .map(|book| {
            let total = book.copies.len() as i64;
            let taken = book
                .copies
                .iter()
                .filter(|copy| checked_out.contains(&copy.id))
                .count() as i64;
            BookAvailability {
                isbn: book.isbn.clone(),
                title: book.title.clone(),
                number_of_copies: total,
                number_checked_out: taken,
                number_available: total - taken,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::BookCopy;
    use chrono::Utc;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn book(isbn: &str, copy_ids: &[i64]) -> Book {
        let now = Utc::now();
        Book {
            isbn: isbn.to_string(),
            title: format!("Title {}", isbn),
            description: String::new(),
            image_url: String::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
            authors: Vec::new(),
            copies: copy_ids
                .iter()
                .map(|id| BookCopy {
                    id: *id,
                    isbn: isbn.to_string(),
                })
                .collect(),
        }
    }

    fn checkout(copy_id: i64, returned: bool) -> Checkout {
        let now = Utc::now();
        Checkout {
            copy_id,
            member_id: Uuid::new_v4(),
            checked_out: now,
            returned: returned.then_some(now),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_two_copies_one_out() {
        let books = vec![book("9781", &[1, 2])];
        let checkouts = vec![checkout(1, false)];

        let result = compute_aggregates(&books, &checkouts, CheckoutScope::Active);
        assert_eq!(
            result,
            vec![BookAvailability {
                isbn: "9781".to_string(),
                title: "Title 9781".to_string(),
                number_of_copies: 2,
                number_checked_out: 1,
                number_available: 1,
            }]
        );
    }

    #[test]
    fn test_zero_copy_books_are_excluded() {
        let books = vec![book("1", &[]), book("2", &[5])];
        let result = compute_aggregates(&books, &[], CheckoutScope::Active);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].isbn, "2");
        assert_eq!(result[0].number_available, 1);
    }

    #[test]
    fn test_scope_decides_returned_checkouts() {
        let books = vec![book("9781", &[1, 2])];
        let checkouts = vec![checkout(1, true), checkout(2, false)];

        let active = compute_aggregates(&books, &checkouts, CheckoutScope::Active);
        assert_eq!(active[0].number_checked_out, 1);

        let all = compute_aggregates(&books, &checkouts, CheckoutScope::All);
        assert_eq!(all[0].number_checked_out, 2);
        assert_eq!(all[0].number_available, 0);
    }

    #[test]
    fn test_repeated_history_counts_copy_once() {
        let books = vec![book("9781", &[1])];
        let checkouts = vec![checkout(1, true), checkout(1, true), checkout(1, false)];

        let all = compute_aggregates(&books, &checkouts, CheckoutScope::All);
        assert_eq!(all[0].number_checked_out, 1);
        assert_eq!(all[0].number_available, 0);
    }

    #[test]
    fn test_order_follows_books() {
        let books = vec![book("b", &[2]), book("a", &[1])];
        let result = compute_aggregates(&books, &[], CheckoutScope::Active);
        let isbns: Vec<&str> = result.iter().map(|r| r.isbn.as_str()).collect();
        assert_eq!(isbns, vec!["b", "a"]);
    }

    /// Books with disjoint copy ids plus checkouts over a superset of those ids
    fn catalog() -> impl Strategy<Value = (Vec<Book>, Vec<Checkout>)> {
        prop::collection::vec(0usize..6, 0..8).prop_flat_map(|copy_counts| {
            let mut next_id = 1i64;
            let books: Vec<Book> = copy_counts
                .iter()
                .enumerate()
                .map(|(i, count)| {
                    let ids: Vec<i64> = (next_id..next_id + *count as i64).collect();
                    next_id += *count as i64;
                    book(&format!("isbn{}", i), &ids)
                })
                .collect();
            let max_id = next_id + 3;
            let checkouts = prop::collection::vec((1i64..max_id, any::<bool>()), 0..30)
                .prop_map(|pairs| pairs.into_iter().map(|(id, returned)| checkout(id, returned)).collect::<Vec<_>>());
            (Just(books), checkouts)
        })
    }

    proptest! {
        #[test]
        fn prop_counts_are_consistent((books, checkouts) in catalog(), all in any::<bool>()) {
            let scope = if all { CheckoutScope::All } else { CheckoutScope::Active };
            let result = compute_aggregates(&books, &checkouts, scope);

            let with_copies = books.iter().filter(|b| !b.copies.is_empty()).count();
            prop_assert_eq!(result.len(), with_copies);

            for row in &result {
                prop_assert!(row.number_of_copies > 0);
                prop_assert!(row.number_checked_out >= 0);
                prop_assert!(row.number_available >= 0);
                prop_assert_eq!(row.number_available + row.number_checked_out, row.number_of_copies);
            }
        }

        #[test]
        fn prop_all_scope_never_below_active((books, checkouts) in catalog()) {
            let active = compute_aggregates(&books, &checkouts, CheckoutScope::Active);
            let all = compute_aggregates(&books, &checkouts, CheckoutScope::All);
            for (a, b) in active.iter().zip(all.iter()) {
                prop_assert!(a.number_checked_out <= b.number_checked_out);
            }
        }
    }
}
