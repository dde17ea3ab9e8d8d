use crate::api::{BookDetails, BookInput, BookStatus, ErrorResponse, FieldError};

#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
#[error("Invalid book data: {}", joined_messages(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl From<ValidationError> for ErrorResponse {
    fn from(err: ValidationError) -> Self {
        ErrorResponse {
            error: "Invalid book data".to_string(),
            fields: err.fields,
        }
    }
}

fn joined_messages(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| f.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl BookInput {
    /// Checks the request before it goes anywhere near storage.
    /// Every failing field is reported, not only the first one.
    pub fn validate(self) -> Result<BookDetails, ValidationError> {
        let mut fields = vec![];

        if self.title.trim().is_empty() {
            fields.push(FieldError {
                field: "title".to_string(),
                message: "title is required".to_string(),
            });
        }
        if self.shelf_number.trim().is_empty() {
            fields.push(FieldError {
                field: "shelf_number".to_string(),
                message: "shelf_number is required".to_string(),
            });
        }

        let status = match non_blank(self.status) {
            None => BookStatus::default(),
            Some(raw) => match raw.parse::<BookStatus>() {
                Ok(status) => status,
                Err(err) => {
                    fields.push(FieldError {
                        field: "status".to_string(),
                        message: err.to_string(),
                    });
                    BookStatus::default()
                }
            },
        };

        if !fields.is_empty() {
            return Err(ValidationError { fields });
        }

        Ok(BookDetails {
            title: self.title.trim().to_string(),
            author: non_blank(self.author),
            description: non_blank(self.description),
            status,
            shelf_number: self.shelf_number.trim().to_string(),
        })
    }
}
