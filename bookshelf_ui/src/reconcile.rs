//! Patching the locally held list after a successful mutation.
//! Failed mutations never reach these functions, so the previous list stays as it was.

use bookshelf_catalog::api::{Book, BookId};

/// Replaces the entry with the same id in place, or puts a new book at the top
pub fn apply_saved(mut books: Vec<Book>, saved: Book) -> Vec<Book> {
    match books.iter_mut().find(|book| book.id == saved.id) {
        Some(existing) => *existing = saved,
        None => books.insert(0, saved),
    }
    books
}

/// Drops the entry with the given id, if present
pub fn apply_deleted(mut books: Vec<Book>, book_id: BookId) -> Vec<Book> {
    books.retain(|book| book.id != book_id);
    books
}
