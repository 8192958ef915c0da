/// Page service: CRUD over the page store
use crate::application::dto::PageFieldsInput;
use crate::application::repositories::PageRepository;
use crate::domain::aggregates::Page;
use crate::domain::base::{DomainError, Entity};
use crate::domain::value_objects::{PageFields, PageId};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Message returned for any create/update with a missing or blank field
pub const REQUIRED_FIELDS_MESSAGE: &str = "Page Name, Title, and Content are required";

#[derive(Error, Debug)]
pub enum PageServiceError {
    #[error("{message}")]
    Validation {
        message: String,
        missing: Vec<&'static str>,
    },

    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Repository error: {0}")]
    Repository(DomainError),
}

impl From<DomainError> for PageServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidValue(message) => PageServiceError::Validation {
                message,
                missing: Vec::new(),
            },
            DomainError::NotFound(what) => PageServiceError::NotFound(what),
            other => PageServiceError::Repository(other),
        }
    }
}

pub type PageServiceResult<T> = Result<T, PageServiceError>;

/// Service exposing create/read/update/delete over a page repository.
///
/// Cloning is cheap; clones share the same repository. Every call goes
/// straight to the store, there is no caching.
pub struct PageService<R: PageRepository> {
    repository: Arc<Mutex<R>>,
}

impl<R: PageRepository> Clone for PageService<R> {
    fn clone(&self) -> Self {
        PageService {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: PageRepository + Send> PageService<R> {
    pub fn new(repository: R) -> Self {
        Self::from_shared(Arc::new(Mutex::new(repository)))
    }

    /// Build a service over a repository shared with other services
    pub fn from_shared(repository: Arc<Mutex<R>>) -> Self {
        PageService { repository }
    }

    pub fn shared_repository(&self) -> Arc<Mutex<R>> {
        Arc::clone(&self.repository)
    }

    /// Create and persist a new page
    pub async fn create(&self, input: PageFieldsInput) -> PageServiceResult<Page> {
        let fields = validate(input)?;
        let page = Page::create(fields, Utc::now());

        self.repository.lock().await.save(&page)?;
        tracing::info!(page_id = %page.id(), page_name = %page.page_name(), "page created");
        Ok(page)
    }

    /// Every stored page, in insertion order
    pub async fn get_all(&self) -> PageServiceResult<Vec<Page>> {
        let pages = self.repository.lock().await.find_all()?;
        tracing::debug!(count = pages.len(), "listed pages");
        Ok(pages)
    }

    /// The first page (in insertion order) carrying this page name
    pub async fn get_by_name(&self, page_name: &str) -> PageServiceResult<Page> {
        self.repository
            .lock()
            .await
            .find_by_name(page_name)?
            .ok_or_else(|| PageServiceError::NotFound(format!("no page named {:?}", page_name)))
    }

    pub async fn get_by_id(&self, id: &str) -> PageServiceResult<Page> {
        let page_id = parse_id(id)?;
        self.repository
            .lock()
            .await
            .find_by_id(&page_id)?
            .ok_or_else(|| not_found(&page_id))
    }

    /// Replace the three mutable fields of an existing page.
    ///
    /// Fields are validated before the store is touched.
    pub async fn update(&self, id: &str, input: PageFieldsInput) -> PageServiceResult<Page> {
        let fields = validate(input)?;
        let page_id = parse_id(id)?;

        let mut repository = self.repository.lock().await;
        let mut page = repository
            .find_by_id(&page_id)?
            .ok_or_else(|| not_found(&page_id))?;

        page.revise(fields, Utc::now());
        repository.save(&page)?;
        tracing::info!(page_id = %page_id, "page updated");
        Ok(page)
    }

    /// Permanently remove a page
    pub async fn delete(&self, id: &str) -> PageServiceResult<()> {
        let page_id = parse_id(id)?;
        if !self.repository.lock().await.delete(&page_id)? {
            return Err(not_found(&page_id));
        }
        tracing::info!(page_id = %page_id, "page deleted");
        Ok(())
    }
}

fn validate(input: PageFieldsInput) -> PageServiceResult<PageFields> {
    let missing = input.missing_fields();
    if !missing.is_empty() {
        tracing::debug!(?missing, "rejected page fields");
        return Err(PageServiceError::Validation {
            message: REQUIRED_FIELDS_MESSAGE.to_string(),
            missing,
        });
    }
    Ok(input.into_fields()?)
}

// Malformed ids can never match a stored page
fn parse_id(id: &str) -> PageServiceResult<PageId> {
    PageId::parse(id).map_err(|_| PageServiceError::NotFound(format!("page {}", id)))
}

fn not_found(id: &PageId) -> PageServiceError {
    PageServiceError::NotFound(format!("page {}", id))
}
