use bookshelf_catalog::api::{Book, BookId, BookInput};
use bookshelf_catalog::client::CatalogServiceClient;

/// The calls the catalog screen makes against the service
#[async_trait::async_trait]
pub trait CatalogGateway: Send + Sync {
    async fn list_books(&self, shelf_number: Option<&str>) -> anyhow::Result<Vec<Book>>;
    async fn create_book(&self, input: &BookInput) -> anyhow::Result<Book>;
    async fn update_book(&self, book_id: BookId, input: &BookInput) -> anyhow::Result<Book>;
    async fn delete_book(&self, book_id: BookId) -> anyhow::Result<()>;
}

#[async_trait::async_trait]
impl CatalogGateway for CatalogServiceClient {
    async fn list_books(&self, shelf_number: Option<&str>) -> anyhow::Result<Vec<Book>> {
        CatalogServiceClient::list_books(self, shelf_number).await
    }

    async fn create_book(&self, input: &BookInput) -> anyhow::Result<Book> {
        CatalogServiceClient::create_book(self, input).await
    }

    async fn update_book(&self, book_id: BookId, input: &BookInput) -> anyhow::Result<Book> {
        CatalogServiceClient::update_book(self, book_id, input).await
    }

    async fn delete_book(&self, book_id: BookId) -> anyhow::Result<()> {
        CatalogServiceClient::delete_book(self, book_id).await
    }
}
