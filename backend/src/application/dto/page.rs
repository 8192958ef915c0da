use crate::domain::{aggregates::Page, base::Entity, value_objects::PageFields, DomainError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of a create or update request.
///
/// Every field is optional at the wire level so that a missing field can be
/// reported as a validation failure instead of a decoding failure. Unknown
/// fields are rejected outright.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PageFieldsInput {
    pub page_name: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PageFieldsInput {
    pub fn new(
        page_name: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        PageFieldsInput {
            page_name: Some(page_name.into()),
            title: Some(title.into()),
            content: Some(content.into()),
        }
    }

    /// Names of the fields that are absent or blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        let mut missing = Vec::new();
        if blank(&self.page_name) {
            missing.push("pageName");
        }
        if blank(&self.title) {
            missing.push("title");
        }
        if blank(&self.content) {
            missing.push("content");
        }
        missing
    }

    /// Validate into domain fields
    pub fn into_fields(self) -> Result<PageFields, DomainError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(DomainError::InvalidValue(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }
        PageFields::new(
            self.page_name.unwrap_or_default(),
            self.title.unwrap_or_default(),
            self.content.unwrap_or_default(),
        )
    }
}

/// Wire representation of a stored page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub page_name: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Page> for PageDocument {
    fn from(page: &Page) -> Self {
        PageDocument {
            id: page.id().to_string(),
            page_name: page.page_name().to_string(),
            title: page.title().to_string(),
            content: page.content().to_string(),
            created_at: page.created_at(),
            updated_at: page.updated_at(),
        }
    }
}

impl From<Page> for PageDocument {
    fn from(page: Page) -> Self {
        PageDocument::from(&page)
    }
}

/// `GET /page`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageListResponse {
    pub pages: Vec<PageDocument>,
}

/// `GET /page/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageEnvelope {
    pub page: PageDocument,
}

/// `POST /page` and `PUT /page/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMessageResponse {
    pub message: String,
    pub page: PageDocument,
}

/// `DELETE /page/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// A CSV data row that was dropped during import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRow {
    pub line: u64,
    pub reason: String,
}

/// `POST /uploadcsv`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub message: String,
    pub imported_count: usize,
    pub pages: Vec<PageDocument>,
    pub rejected_rows: Vec<RejectedRow>,
}
