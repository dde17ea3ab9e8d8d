pub use in_memory_books_repository::InMemoryBookRepository;
pub use postgres_books_repository::{PostgresBooksRepository, PostgresBooksRepositoryConfig};

use chrono::{DateTime, Duration, Utc};

use crate::api::{Book, BookDetails, BookId};

mod in_memory_books_repository;
mod postgres_books_repository;

#[derive(thiserror::Error, Debug)]
pub enum BookRepositoryError {
    #[error("Book {0} not found")]
    NotFound(BookId),

    #[error("DatabaseFailure failure {0}")]
    DatabaseFailure(#[from] tokio_postgres::Error),

    #[error("Corrupted book row: {0}")]
    CorruptedRow(String),

    #[error("No book ids left")]
    IdsExhausted,
}

/// `updated_at` has to move forward on every update, even when the clock did not
pub(crate) fn next_update_timestamp(
    previous: DateTime<Utc>,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    now.max(previous + Duration::microseconds(1))
}

#[async_trait::async_trait]
pub trait BookRepository: Send + Sync {
    /// Stores a new book, assigning id and timestamps. Returns the stored row
    async fn add_book(&self, details: BookDetails) -> Result<Book, BookRepositoryError>;
    /// Overwrites all editable fields of the book and bumps `updated_at`
    async fn update_book(
        &self,
        book_id: BookId,
        details: BookDetails,
    ) -> Result<Book, BookRepositoryError>;
    /// Retrieves a single book
    async fn get_book(&self, book_id: BookId) -> Result<Book, BookRepositoryError>;
    /// Lists books ordered by shelf number and then id, optionally only the ones on a given shelf
    async fn list_books(
        &self,
        shelf_number: Option<&str>,
    ) -> Result<Vec<Book>, BookRepositoryError>;
    /// Removes the book permanently
    async fn delete_book(&self, book_id: BookId) -> Result<(), BookRepositoryError>;
}
