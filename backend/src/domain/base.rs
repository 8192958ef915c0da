/// Base DDD abstractions for the domain layer
use std::fmt::Debug;

/// Trait for value objects - immutable objects defined by their attributes
/// Value objects are equal if all their attributes are equal
pub trait ValueObject: Clone + PartialEq + Eq + Debug {}

/// Trait for entities - objects with identity that can change over time
/// Entities are equal if their IDs are equal, regardless of other attributes
pub trait Entity: Debug {
    type Id: ValueObject;

    fn id(&self) -> &Self::Id;
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-specific errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid value provided
    InvalidValue(String),
    /// Entity not found
    NotFound(String),
    /// The backing store failed
    Storage(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::InvalidValue(msg) => write!(f, "Invalid value: {}", msg),
            DomainError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DomainError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::Page;
    use crate::domain::value_objects::PageFields;
    use chrono::Utc;

    #[test]
    fn test_identity_survives_revision() {
        let fields = PageFields::new("Home", "Welcome", "<p>Hi</p>").unwrap();
        let mut page = Page::create(fields, Utc::now());
        let before = *page.id();

        page.revise(PageFields::new("Home", "Renamed", "<p>Yo</p>").unwrap(), Utc::now());
        assert_eq!(page.id(), &before);
    }

    #[test]
    fn test_page_fields_report_the_blank_field() {
        let fields: DomainResult<PageFields> = PageFields::new("Home", "Welcome", "<p>Hi</p>");
        assert!(fields.is_ok());

        let blank_title = PageFields::new("Home", "   ", "<p>Hi</p>");
        assert_eq!(
            blank_title,
            Err(DomainError::InvalidValue("Title cannot be empty".to_string()))
        );
    }

    #[test]
    fn test_domain_error_display() {
        assert_eq!(
            DomainError::InvalidValue("Page Name cannot be empty".to_string()).to_string(),
            "Invalid value: Page Name cannot be empty"
        );
        assert_eq!(
            DomainError::NotFound("page 42".to_string()).to_string(),
            "Not found: page 42"
        );
        assert_eq!(
            DomainError::Storage("disk full".to_string()).to_string(),
            "Storage error: disk full"
        );
    }
}
