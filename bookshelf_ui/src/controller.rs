use std::mem;

use bookshelf_catalog::api::{Book, BookId, BookInput};

use crate::form::BookForm;
use crate::gateway::CatalogGateway;
use crate::reconcile::{apply_deleted, apply_saved};
use crate::state::CatalogState;

/// A listing that was sent and whose response has not been applied yet.
/// Only the most recently issued one is allowed to replace the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    sequence: u64,
    pub shelf_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveRequest {
    Create { input: BookInput },
    Update { book_id: BookId, input: BookInput },
}

/// Drives a [`CatalogState`] from user actions and service responses.
///
/// The async methods issue one request and apply its result. Front ends that
/// run requests concurrently can use the `begin_*`/`finish_*` pairs instead.
pub struct CatalogController<G> {
    gateway: G,
    state: CatalogState,
    list_sequence: u64,
}

impl<G: CatalogGateway> CatalogController<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            state: CatalogState::default(),
            list_sequence: 0,
        }
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// First load of the screen
    pub async fn mount(&mut self) {
        self.load_books().await
    }

    pub async fn load_books(&mut self) {
        let request = self.begin_list();
        let result = self
            .gateway
            .list_books(request.shelf_number.as_deref())
            .await;
        self.finish_list(request, result);
    }

    pub fn begin_list(&mut self) -> ListRequest {
        self.list_sequence += 1;
        self.state.is_loading = true;
        ListRequest {
            sequence: self.list_sequence,
            shelf_number: self.state.shelf_filter.clone(),
        }
    }

    /// Applies a listing response. Returns false when a newer listing was issued
    /// in the meantime and this response was dropped
    pub fn finish_list(&mut self, request: ListRequest, result: anyhow::Result<Vec<Book>>) -> bool {
        if request.sequence != self.list_sequence {
            tracing::debug!(
                sequence = request.sequence,
                latest = self.list_sequence,
                "Dropping stale book listing"
            );
            return false;
        }
        self.state.is_loading = false;
        match result {
            Ok(books) => {
                self.state.books = books;
                self.state.error = None;
            }
            Err(err) => {
                tracing::warn!("Failed to load books: {:#}", err);
                self.state.error = Some(format!("{:#}", err));
            }
        }
        true
    }

    /// Changing the shelf refetches, setting the same shelf again does nothing
    pub async fn set_shelf_filter(&mut self, shelf_number: Option<String>) {
        let shelf_number = shelf_number.filter(|shelf| !shelf.is_empty());
        if shelf_number == self.state.shelf_filter {
            return;
        }
        self.state.shelf_filter = shelf_number;
        self.load_books().await
    }

    /// Purely local, never touches the service
    pub fn set_filter_text(&mut self, filter_text: impl Into<String>) {
        self.state.filter_text = filter_text.into();
    }

    pub fn start_create(&mut self) {
        self.state.editing = Some(BookForm::new());
    }

    /// Opens the form for a book currently in the list
    pub fn start_edit(&mut self, book_id: BookId) -> bool {
        match self.state.book(book_id) {
            Some(book) => {
                self.state.editing = Some(BookForm::from_book(book));
                true
            }
            None => false,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut BookForm> {
        self.state.editing.as_mut()
    }

    /// Drops the draft, nothing is sent
    pub fn cancel_edit(&mut self) {
        self.state.editing = None;
    }

    pub async fn save(&mut self) -> bool {
        let Some(request) = self.begin_save() else {
            return false;
        };
        let result = match &request {
            SaveRequest::Create { input } => self.gateway.create_book(input).await,
            SaveRequest::Update { book_id, input } => {
                self.gateway.update_book(*book_id, input).await
            }
        };
        self.finish_save(result)
    }

    /// Returns the request to send, or None when there is nothing to send:
    /// no open form, a save already in flight, or a draft that fails validation
    pub fn begin_save(&mut self) -> Option<SaveRequest> {
        if self.state.is_saving {
            return None;
        }
        let form = self.state.editing.as_ref()?;
        if let Err(err) = form.validate() {
            self.state.error = Some(err.to_string());
            return None;
        }
        let input = form.to_input();
        let request = match form.book_id() {
            Some(book_id) => SaveRequest::Update { book_id, input },
            None => SaveRequest::Create { input },
        };
        self.state.is_saving = true;
        Some(request)
    }

    /// On failure the list and the open draft are kept so the user can retry
    pub fn finish_save(&mut self, result: anyhow::Result<Book>) -> bool {
        self.state.is_saving = false;
        match result {
            Ok(book) => {
                self.state.books = apply_saved(mem::take(&mut self.state.books), book);
                self.state.editing = None;
                self.state.error = None;
                true
            }
            Err(err) => {
                tracing::warn!("Failed to save book: {:#}", err);
                self.state.error = Some(format!("{:#}", err));
                false
            }
        }
    }

    /// First step of deleting: only marks the book, no request is sent
    pub fn request_delete(&mut self, book_id: BookId) -> bool {
        if self.state.book(book_id).is_none() {
            return false;
        }
        self.state.pending_delete = Some(book_id);
        true
    }

    pub fn cancel_delete(&mut self) {
        self.state.pending_delete = None;
    }

    /// Sends the delete for the book marked by `request_delete`
    pub async fn confirm_delete(&mut self) -> bool {
        let Some(book_id) = self.state.pending_delete.take() else {
            return false;
        };
        match self.gateway.delete_book(book_id).await {
            Ok(()) => {
                self.state.books = apply_deleted(mem::take(&mut self.state.books), book_id);
                if self
                    .state
                    .editing
                    .as_ref()
                    .is_some_and(|form| form.book_id() == Some(book_id))
                {
                    self.state.editing = None;
                }
                self.state.error = None;
                true
            }
            Err(err) => {
                tracing::warn!(book_id, "Failed to delete book: {:#}", err);
                self.state.error = Some(format!("{:#}", err));
                false
            }
        }
    }
}
