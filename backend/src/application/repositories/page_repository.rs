use crate::domain::{aggregates::Page, value_objects::PageId, DomainResult};

/// Repository trait for managing Page aggregates.
///
/// This trait defines the contract for persisting and retrieving Page aggregates
/// from a data store. Implementations can be backed by different storage mechanisms
/// (in-memory, database, etc.).
pub trait PageRepository {
    /// Saves a page to the repository.
    ///
    /// If a page with the same ID already exists, its mutable fields and update
    /// timestamp are replaced; its creation time and position in the natural
    /// ordering are kept. Otherwise a new page is appended.
    fn save(&mut self, page: &Page) -> DomainResult<()>;

    /// Inserts a batch of new pages.
    ///
    /// The batch is all-or-nothing: if any page fails to insert, none of them
    /// are persisted.
    fn insert_many(&mut self, pages: &[Page]) -> DomainResult<()>;

    /// Finds a page by its unique identifier.
    ///
    /// Returns `Ok(Some(page))` if found, `Ok(None)` if not found,
    /// or an error if the operation fails.
    fn find_by_id(&self, id: &PageId) -> DomainResult<Option<Page>>;

    /// Finds the first page (in insertion order) with the given page name.
    fn find_by_name(&self, page_name: &str) -> DomainResult<Option<Page>>;

    /// Returns all pages in the repository, in insertion order.
    fn find_all(&self) -> DomainResult<Vec<Page>>;

    /// Deletes a page by its unique identifier.
    ///
    /// Returns `Ok(true)` if the page was deleted, `Ok(false)` if the page
    /// was not found, or an error if the operation fails.
    fn delete(&mut self, id: &PageId) -> DomainResult<bool>;
}
