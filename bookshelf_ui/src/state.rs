use bookshelf_catalog::api::{Book, BookId};

use crate::form::BookForm;

/// Everything the catalog screen shows.
/// `books` is only a copy of the last successful listing, the service stays the source of truth.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CatalogState {
    pub books: Vec<Book>,
    pub filter_text: String,
    pub shelf_filter: Option<String>,
    pub editing: Option<BookForm>,
    pub pending_delete: Option<BookId>,
    pub is_loading: bool,
    pub is_saving: bool,
    pub error: Option<String>,
}

/// Case-insensitive containment over title, author and shelf number.
/// An empty filter matches everything
pub fn matches_filter(book: &Book, filter_text: &str) -> bool {
    let needle = filter_text.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [
        Some(book.title.as_str()),
        book.author.as_deref(),
        Some(book.shelf_number.as_str()),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&needle))
}

impl CatalogState {
    /// Books to render, in list order
    pub fn visible_books(&self) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|book| matches_filter(book, &self.filter_text))
            .collect()
    }

    pub fn book(&self, book_id: BookId) -> Option<&Book> {
        self.books.iter().find(|book| book.id == book_id)
    }
}

#[cfg(test)]
mod state_tests {
    use bookshelf_catalog::api::Book;

    use crate::reconcile::test_books::book;
    use crate::state::{matches_filter, CatalogState};

    #[test]
    fn filter_matches_title_author_and_shelf_ignoring_case() {
        let readable = Book {
            author: Some("Dustin Boswell".to_string()),
            ..book(1, "Readable Code", "A-1")
        };

        assert!(matches_filter(&readable, "code"));
        assert!(matches_filter(&readable, "BOSWELL"));
        assert!(matches_filter(&readable, "a-1"));
        assert!(matches_filter(&readable, ""));
        assert!(!matches_filter(&readable, "thinking"));
    }

    #[test]
    fn visible_books_applies_filter_text() {
        let state = CatalogState {
            books: vec![book(1, "Readable Code", "1"), book(2, "Design Thinking", "2")],
            filter_text: "code".to_string(),
            ..CatalogState::default()
        };

        let titles: Vec<_> = state.visible_books().iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Readable Code"]);
    }
}
