/// Value objects for the domain layer
use super::base::{DomainError, DomainResult, ValueObject};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a Page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageId(Uuid);

impl PageId {
    /// Generate a fresh identifier. Random v4 ids are never handed out twice.
    pub fn generate() -> Self {
        PageId(Uuid::new_v4())
    }

    /// Parse an identifier received from a client or read back from the store
    pub fn parse(id: &str) -> DomainResult<Self> {
        let id = id.trim();
        if id.is_empty() {
            return Err(DomainError::InvalidValue("PageId cannot be empty".to_string()));
        }
        Uuid::parse_str(id)
            .map(PageId)
            .map_err(|_| DomainError::InvalidValue(format!("Malformed PageId: {}", id)))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl ValueObject for PageId {}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

fn require_text(field: &str, value: String) -> DomainResult<String> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidValue(format!("{} cannot be empty", field)));
    }
    Ok(value)
}

/// The page name, used as a grouping/category key. Not unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageName(String);

impl PageName {
    pub fn new(name: impl Into<String>) -> DomainResult<Self> {
        require_text("Page Name", name.into()).map(PageName)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Alphabetical index key: the first character, upper-cased
    pub fn index_key(&self) -> char {
        // require_text guarantees at least one non-whitespace char
        let first = self.0.chars().next().unwrap_or(' ');
        first.to_uppercase().next().unwrap_or(first)
    }
}

impl ValueObject for PageName {}

impl fmt::Display for PageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The page title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTitle(String);

impl PageTitle {
    pub fn new(title: impl Into<String>) -> DomainResult<Self> {
        require_text("Title", title.into()).map(PageTitle)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for PageTitle {}

impl fmt::Display for PageTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rich-text page body, kept verbatim as markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichText(String);

impl RichText {
    pub fn new(markup: impl Into<String>) -> DomainResult<Self> {
        require_text("Content", markup.into()).map(RichText)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for RichText {}

impl fmt::Display for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three mutable fields of a page, validated together.
///
/// Create and update both take a full `PageFields`; there is no partial update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFields {
    pub page_name: PageName,
    pub title: PageTitle,
    pub content: RichText,
}

impl PageFields {
    pub fn new(
        page_name: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> DomainResult<Self> {
        Ok(PageFields {
            page_name: PageName::new(page_name)?,
            title: PageTitle::new(title)?,
            content: RichText::new(content)?,
        })
    }
}

impl ValueObject for PageFields {}
