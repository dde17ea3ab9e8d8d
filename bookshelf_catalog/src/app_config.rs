use actix_web::error::InternalError;
use actix_web::{HttpResponse, web::JsonConfig};
use paperclip::actix::web;

use crate::api::ErrorResponse;
use crate::handlers;

pub fn config_app(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(handlers::health)))
        .service(
            web::scope("/api")
                .service(
                    web::resource("/books")
                        .route(web::get().to(handlers::list_books))
                        .route(web::post().to(handlers::add_book)),
                )
                .service(
                    web::resource("/books/{book_id}")
                        .route(web::get().to(handlers::get_book))
                        .route(web::put().to(handlers::update_book))
                        .route(web::delete().to(handlers::delete_book)),
                ),
        );
}

/// Bodies that are not valid JSON get the same error shape as failed validation
pub fn json_config() -> JsonConfig {
    JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest()
            .json(ErrorResponse::new(format!("Invalid request body: {}", err)));
        InternalError::from_response(err, response).into()
    })
}
