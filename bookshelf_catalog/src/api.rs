use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

pub type BookId = i32;

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash, Apiv2Schema)]
#[serde(rename_all = "snake_case")]
/// Loan state of a book
pub enum BookStatus {
    #[default]
    Available,
    OnLoan,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "available",
            BookStatus::OnLoan => "on_loan",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown book status '{0}', expected 'available' or 'on_loan'")]
pub struct UnknownBookStatus(pub String);

impl FromStr for BookStatus {
    type Err = UnknownBookStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(BookStatus::Available),
            "on_loan" => Ok(BookStatus::OnLoan),
            other => Err(UnknownBookStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
/// A single catalog row: one physical book, where it lives and whether it is lent out
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub status: BookStatus,
    pub shelf_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
/// Body of create and update requests.
/// Fields are deliberately loose here, `validate` decides what is acceptable
#[serde(default)]
pub struct BookInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub shelf_number: String,
}

#[derive(Debug, Clone, Eq, PartialEq)]
/// Editable fields of a book that already passed validation
pub struct BookDetails {
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub status: BookStatus,
    pub shelf_number: String,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
pub struct ListBooksQuery {
    /// Exact, case-sensitive shelf number to restrict the listing to
    #[serde(default, alias = "shelf")]
    pub shelf_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
/// Body returned with every 4xx/5xx response
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: vec![],
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error)?;
        for (i, field) in self.fields.iter().enumerate() {
            f.write_str(if i == 0 { ": " } else { ", " })?;
            f.write_str(&field.message)?;
        }
        Ok(())
    }
}
