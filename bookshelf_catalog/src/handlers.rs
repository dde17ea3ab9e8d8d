use std::sync::Arc;

use actix_web::http::header::LOCATION;
use actix_web::web::Data;
use actix_web::{Error, HttpResponse};
use paperclip::actix::{
    api_v2_operation,
    web::{self},
};

use crate::api::{BookId, BookInput, ErrorResponse, ListBooksQuery};
use crate::books_repository::{BookRepository, BookRepositoryError};

/// Maps a repository failure to a response.
/// Storage details only go to the log, the caller gets a fixed message
fn repository_error_response(operation: &str, err: BookRepositoryError) -> HttpResponse {
    match err {
        BookRepositoryError::NotFound(book_id) => HttpResponse::NotFound()
            .json(ErrorResponse::new(format!("Book {} not found", book_id))),
        err => {
            tracing::error!("{} failed {}", operation, err);
            HttpResponse::InternalServerError().json(ErrorResponse::new(format!(
                "Failed to {}",
                operation.to_lowercase()
            )))
        }
    }
}

#[api_v2_operation]
pub async fn health() -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().finish())
}

#[api_v2_operation]
pub async fn list_books(
    books_repository: Data<Arc<dyn BookRepository>>,
    query: web::Query<ListBooksQuery>,
) -> Result<HttpResponse, Error> {
    let shelf_number = query.into_inner().shelf_number;
    Ok(
        match books_repository.list_books(shelf_number.as_deref()).await {
            Ok(books) => HttpResponse::Ok().json(books),
            Err(err) => repository_error_response("List books", err),
        },
    )
}

#[api_v2_operation]
pub async fn add_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    input: web::Json<BookInput>,
) -> Result<HttpResponse, Error> {
    let details = match input.into_inner().validate() {
        Ok(details) => details,
        Err(err) => {
            tracing::info!("Rejected new book: {}", err);
            return Ok(HttpResponse::BadRequest().json(ErrorResponse::from(err)));
        }
    };

    Ok(match books_repository.add_book(details).await {
        Ok(book) => {
            tracing::info!(book_id = book.id, "Book added");
            HttpResponse::Created()
                .append_header((LOCATION, format!("/api/books/{}", book.id)))
                .json(book)
        }
        Err(err) => repository_error_response("Add book", err),
    })
}

#[api_v2_operation]
pub async fn get_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    book_id: web::Path<BookId>,
) -> Result<HttpResponse, Error> {
    Ok(
        match books_repository.get_book(book_id.into_inner()).await {
            Ok(book) => HttpResponse::Ok().json(book),
            Err(err) => repository_error_response("Get book", err),
        },
    )
}

#[api_v2_operation]
pub async fn update_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    book_id: web::Path<BookId>,
    input: web::Json<BookInput>,
) -> Result<HttpResponse, Error> {
    let book_id = book_id.into_inner();
    let details = match input.into_inner().validate() {
        Ok(details) => details,
        Err(err) => {
            tracing::info!(book_id, "Rejected book update: {}", err);
            return Ok(HttpResponse::BadRequest().json(ErrorResponse::from(err)));
        }
    };

    Ok(match books_repository.update_book(book_id, details).await {
        Ok(book) => {
            tracing::info!(book_id, "Book updated");
            HttpResponse::Ok().json(book)
        }
        Err(err) => repository_error_response("Update book", err),
    })
}

#[api_v2_operation]
pub async fn delete_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    book_id: web::Path<BookId>,
) -> Result<HttpResponse, Error> {
    let book_id = book_id.into_inner();
    Ok(match books_repository.delete_book(book_id).await {
        Ok(()) => {
            tracing::info!(book_id, "Book deleted");
            HttpResponse::NoContent().finish()
        }
        Err(err) => repository_error_response("Delete book", err),
    })
}

#[cfg(test)]
mod handler_tests {
    use std::sync::Arc;

    use actix_web::http::header::LOCATION;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use paperclip::actix::OpenApiExt;
    use serde_json::json;

    use crate::api::{Book, BookDetails, BookId, BookStatus, ErrorResponse};
    use crate::app_config::{config_app, json_config};
    use crate::books_repository::{
        BookRepository, BookRepositoryError, InMemoryBookRepository,
    };

    /// Repository that fails every call, to check what leaks to the caller
    struct BrokenRepository;

    #[async_trait::async_trait]
    impl BookRepository for BrokenRepository {
        async fn add_book(&self, _: BookDetails) -> Result<Book, BookRepositoryError> {
            Err(BookRepositoryError::CorruptedRow("secret driver text".to_string()))
        }
        async fn update_book(&self, _: BookId, _: BookDetails) -> Result<Book, BookRepositoryError> {
            Err(BookRepositoryError::CorruptedRow("secret driver text".to_string()))
        }
        async fn get_book(&self, _: BookId) -> Result<Book, BookRepositoryError> {
            Err(BookRepositoryError::CorruptedRow("secret driver text".to_string()))
        }
        async fn list_books(&self, _: Option<&str>) -> Result<Vec<Book>, BookRepositoryError> {
            Err(BookRepositoryError::CorruptedRow("secret driver text".to_string()))
        }
        async fn delete_book(&self, _: BookId) -> Result<(), BookRepositoryError> {
            Err(BookRepositoryError::CorruptedRow("secret driver text".to_string()))
        }
    }

    macro_rules! init_app {
        ($repository:expr) => {{
            let repository: Arc<dyn BookRepository> = $repository;
            test::init_service(
                App::new()
                    .wrap_api()
                    .app_data(web::Data::new(repository))
                    .app_data(json_config())
                    .configure(config_app)
                    .build(),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn test_create_then_get() {
        let repository: Arc<dyn BookRepository> = Arc::new(InMemoryBookRepository::default());
        let app = init_app!(repository);

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/books")
                .set_json(json!({"title": "Readable Code", "shelf_number": "1"}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let location = response
            .headers()
            .get(LOCATION)
            .expect("No location header")
            .to_str()
            .unwrap()
            .to_string();
        let created: Book = test::read_body_json(response).await;
        assert_eq!(location, format!("/api/books/{}", created.id));
        assert_eq!(created.status, BookStatus::Available);
        assert_eq!(created.created_at, created.updated_at);

        let response = test::call_service(&app, test::TestRequest::get().uri(&location).to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let fetched: Book = test::read_body_json(response).await;
        assert_eq!(fetched, created);
    }

    #[actix_web::test]
    async fn test_invalid_create_lists_fields_and_writes_nothing() {
        let repository: Arc<dyn BookRepository> = Arc::new(InMemoryBookRepository::default());
        let app = init_app!(repository.clone());

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/books")
                .set_json(json!({"title": "", "shelf_number": "", "status": "lost"}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(response).await;
        let fields: Vec<_> = body.fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "shelf_number", "status"]);

        assert_eq!(repository.list_books(None).await.unwrap(), vec![]);
    }

    #[actix_web::test]
    async fn test_malformed_json_is_bad_request() {
        let app = init_app!(Arc::new(InMemoryBookRepository::default()));

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/books")
                .insert_header(("content-type", "application/json"))
                .set_payload("{not json")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(response).await;
        assert!(body.error.starts_with("Invalid request body"));
    }

    #[actix_web::test]
    async fn test_update_validation_and_not_found() {
        let repository: Arc<dyn BookRepository> = Arc::new(InMemoryBookRepository::default());
        let app = init_app!(repository.clone());
        let book = repository
            .add_book(BookDetails {
                title: "Readable Code".to_string(),
                author: None,
                description: None,
                status: BookStatus::Available,
                shelf_number: "1".to_string(),
            })
            .await
            .unwrap();

        let response = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/books/{}", book.id))
                .set_json(json!({"title": "", "shelf_number": "1"}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(repository.get_book(book.id).await.unwrap(), book);

        let response = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/books/9999")
                .set_json(json!({"title": "x", "shelf_number": "1"}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/books/{}", book.id))
                .set_json(json!({"title": "Readable Code", "shelf_number": "1", "status": "on_loan"}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated: Book = test::read_body_json(response).await;
        assert_eq!(updated.status, BookStatus::OnLoan);
        assert_eq!(updated.created_at, book.created_at);
        assert!(updated.updated_at > book.updated_at);
    }

    #[actix_web::test]
    async fn test_list_filters_by_shelf_and_delete() {
        let repository: Arc<dyn BookRepository> = Arc::new(InMemoryBookRepository::default());
        let app = init_app!(repository.clone());
        for (title, shelf) in [("Readable Code", "1"), ("Design Thinking", "2")] {
            let response = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri("/api/books")
                    .set_json(json!({"title": title, "shelf_number": shelf}))
                    .to_request(),
            )
            .await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/books?shelf_number=2").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let books: Vec<Book> = test::read_body_json(response).await;
        assert_eq!(books.len(), 1);
        assert!(books.iter().all(|b| b.shelf_number == "2"));

        let response = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/books/{}", books[0].id))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/books/{}", books[0].id))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response =
            test::call_service(&app, test::TestRequest::get().uri("/api/books").to_request()).await;
        let books: Vec<Book> = test::read_body_json(response).await;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Readable Code");
    }

    #[actix_web::test]
    async fn test_storage_failure_does_not_leak_details() {
        let app = init_app!(Arc::new(BrokenRepository));

        let response =
            test::call_service(&app, test::TestRequest::get().uri("/api/books").to_request()).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorResponse = test::read_body_json(response).await;
        assert_eq!(body, ErrorResponse::new("Failed to list books"));

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/books")
                .set_json(json!({"title": "Readable Code", "shelf_number": "1"}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = test::read_body(response).await;
        assert!(!String::from_utf8_lossy(&body).contains("secret"));
    }
}
