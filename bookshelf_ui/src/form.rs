use bookshelf_catalog::api::{Book, BookDetails, BookId, BookInput, BookStatus};
use bookshelf_catalog::validation::ValidationError;

/// Draft edited by the user before it is sent as a create or update request.
/// Optional text fields are plain strings here, empty means "not given".
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BookForm {
    book_id: Option<BookId>,
    pub title: String,
    pub author: String,
    pub description: String,
    pub status: BookStatus,
    pub shelf_number: String,
}

impl BookForm {
    /// Empty draft for a new book
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft pre-filled with the current values of an existing book
    pub fn from_book(book: &Book) -> Self {
        Self {
            book_id: Some(book.id),
            title: book.title.clone(),
            author: book.author.clone().unwrap_or_default(),
            description: book.description.clone().unwrap_or_default(),
            status: book.status,
            shelf_number: book.shelf_number.clone(),
        }
    }

    pub fn book_id(&self) -> Option<BookId> {
        self.book_id
    }

    /// Submitting routes to update instead of create
    pub fn is_edit_mode(&self) -> bool {
        self.book_id.is_some()
    }

    pub fn to_input(&self) -> BookInput {
        BookInput {
            title: self.title.clone(),
            author: Some(self.author.clone()),
            description: Some(self.description.clone()),
            status: Some(self.status.to_string()),
            shelf_number: self.shelf_number.clone(),
        }
    }

    /// Same rules the service applies, checked before anything is sent
    pub fn validate(&self) -> Result<BookDetails, ValidationError> {
        self.to_input().validate()
    }
}
