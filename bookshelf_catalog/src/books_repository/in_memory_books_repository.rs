use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI32, Ordering};

use chrono::{DateTime, SubsecRound, Utc};

use crate::api::{Book, BookDetails, BookId};
use crate::books_repository::{next_update_timestamp, BookRepository, BookRepositoryError};

pub struct InMemoryBookRepository {
    book_sequence_generator: AtomicI32,
    books: parking_lot::RwLock<BTreeMap<BookId, Book>>,
}

impl Default for InMemoryBookRepository {
    fn default() -> Self {
        Self {
            // Start at 1 like a SERIAL column would
            book_sequence_generator: AtomicI32::new(1),
            books: Default::default(),
        }
    }
}

// Same resolution as a Postgres TIMESTAMPTZ
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[async_trait::async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn add_book(&self, details: BookDetails) -> Result<Book, BookRepositoryError> {
        let id = self
            .book_sequence_generator
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |id| id.checked_add(1))
            .map_err(|_| BookRepositoryError::IdsExhausted)?;
        let created_at = now();
        let book = Book {
            id,
            title: details.title,
            author: details.author,
            description: details.description,
            status: details.status,
            shelf_number: details.shelf_number,
            created_at,
            updated_at: created_at,
        };
        self.books.write().insert(id, book.clone());
        Ok(book)
    }

    async fn update_book(
        &self,
        book_id: BookId,
        details: BookDetails,
    ) -> Result<Book, BookRepositoryError> {
        let mut locked_books = self.books.write();
        let book = locked_books
            .get_mut(&book_id)
            .ok_or(BookRepositoryError::NotFound(book_id))?;

        book.title = details.title;
        book.author = details.author;
        book.description = details.description;
        book.status = details.status;
        book.shelf_number = details.shelf_number;
        book.updated_at = next_update_timestamp(book.updated_at, now());

        Ok(book.clone())
    }

    async fn get_book(&self, book_id: BookId) -> Result<Book, BookRepositoryError> {
        self.books
            .read()
            .get(&book_id)
            .cloned()
            .ok_or(BookRepositoryError::NotFound(book_id))
    }

    async fn list_books(
        &self,
        shelf_number: Option<&str>,
    ) -> Result<Vec<Book>, BookRepositoryError> {
        let mut books: Vec<Book> = self
            .books
            .read()
            .values()
            .filter(|book| shelf_number.map_or(true, |shelf| book.shelf_number == shelf))
            .cloned()
            .collect();
        // Map is keyed by id, so a stable sort keeps ids ascending within a shelf
        books.sort_by(|a, b| a.shelf_number.cmp(&b.shelf_number));
        Ok(books)
    }

    async fn delete_book(&self, book_id: BookId) -> Result<(), BookRepositoryError> {
        self.books
            .write()
            .remove(&book_id)
            .map(|_| ())
            .ok_or(BookRepositoryError::NotFound(book_id))
    }
}
