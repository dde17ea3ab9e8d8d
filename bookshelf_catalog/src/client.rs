use anyhow::{bail, Context};
use reqwest::{Response, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;

use crate::api::{Book, BookId, BookInput, ErrorResponse};

pub struct CatalogServiceClient {
    url: String,
    client: ClientWithMiddleware,
}

/// Turns a failed response into an error carrying the server message,
/// falling back to the status line when the body is not an `ErrorResponse`
async fn error_from_response(action: &str, response: Response) -> anyhow::Error {
    let status = response.status();
    match response.json::<ErrorResponse>().await {
        Ok(error) => anyhow::anyhow!("Failed to {}: {}", action, error),
        Err(_) => anyhow::anyhow!("Failed to {}: {}", action, status),
    }
}

impl CatalogServiceClient {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let reqwest_client = reqwest::Client::builder()
            .build()
            .context("Failed to build reqwest client")?;
        let client = ClientBuilder::new(reqwest_client)
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            .build();

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Calls GET /api/books endpoint, optionally restricted to one shelf
    pub async fn list_books(&self, shelf_number: Option<&str>) -> anyhow::Result<Vec<Book>> {
        let mut request = self.client.get(format!("{}/api/books", self.url));
        if let Some(shelf_number) = shelf_number {
            request = request.query(&[("shelf_number", shelf_number)]);
        }
        let response = request.send().await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(error_from_response("list books", response).await)
        }
    }

    /// Calls GET /api/books/{book_id} endpoint
    /// Returns None if the book is not in the catalog
    pub async fn get_book(&self, book_id: BookId) -> anyhow::Result<Option<Book>> {
        let response = self
            .client
            .get(format!("{}/api/books/{}", self.url, book_id))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            Ok(None)
        } else if response.status().is_success() {
            Ok(Some(response.json().await?))
        } else {
            Err(error_from_response("get book", response).await)
        }
    }

    /// Calls POST /api/books endpoint, returns the stored book
    pub async fn create_book(&self, input: &BookInput) -> anyhow::Result<Book> {
        let response = self
            .client
            .post(format!("{}/api/books", self.url))
            .json(input)
            .send()
            .await?;

        if response.status() != StatusCode::CREATED {
            return Err(error_from_response("add book", response).await);
        }
        Ok(response.json().await?)
    }

    /// Calls PUT /api/books/{book_id} endpoint, returns the stored book
    pub async fn update_book(&self, book_id: BookId, input: &BookInput) -> anyhow::Result<Book> {
        let response = self
            .client
            .put(format!("{}/api/books/{}", self.url, book_id))
            .json(input)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response("update book", response).await);
        }
        Ok(response.json().await?)
    }

    /// Calls DELETE /api/books/{book_id} endpoint
    pub async fn delete_book(&self, book_id: BookId) -> anyhow::Result<()> {
        let response = self
            .client
            .delete(format!("{}/api/books/{}", self.url, book_id))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response("delete book", response).await);
        }
        Ok(())
    }

    /// Calls GET /health endpoint
    pub async fn health(&self) -> anyhow::Result<()> {
        let response = self
            .client
            .get(format!("{}/health", self.url))
            .send()
            .await?;
        if !response.status().is_success() {
            bail!("Catalog service unhealthy: {}", response.status());
        }
        Ok(())
    }
}
