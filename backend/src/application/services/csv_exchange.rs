/// CSV exchange service for bulk page import and export
use crate::application::dto::RejectedRow;
use crate::application::repositories::PageRepository;
use crate::domain::aggregates::Page;
use crate::domain::base::DomainError;
use crate::domain::value_objects::PageFields;
use crate::infrastructure::csv_codec::{parse_page_rows, write_pages_csv, CsvCodecError, CsvPageRow};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Error, Debug)]
pub enum CsvExchangeError {
    #[error("Error parsing CSV file: {message}")]
    Parse { line: Option<u64>, message: String },

    #[error("No valid data found in CSV")]
    EmptyImport { rejected_rows: Vec<RejectedRow> },

    #[error("No pages available to download")]
    NoData,

    #[error("Repository error: {0}")]
    Repository(#[from] DomainError),

    #[error("Failed to write CSV: {0}")]
    Write(String),
}

impl From<CsvCodecError> for CsvExchangeError {
    fn from(err: CsvCodecError) -> Self {
        match err {
            CsvCodecError::Malformed { line, message } => CsvExchangeError::Parse { line, message },
            CsvCodecError::Write(message) => CsvExchangeError::Write(message),
        }
    }
}

pub type CsvExchangeResult<T> = Result<T, CsvExchangeError>;

/// Outcome of a successful CSV import
#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub imported_count: usize,
    pub pages: Vec<Page>,
    pub rejected_rows: Vec<RejectedRow>,
    pub duration_ms: u64,
}

impl ImportSummary {
    pub fn has_rejections(&self) -> bool {
        !self.rejected_rows.is_empty()
    }
}

/// Service for moving pages in and out of the store as CSV
pub struct CsvExchange<R: PageRepository> {
    repository: Arc<Mutex<R>>,
}

impl<R: PageRepository> Clone for CsvExchange<R> {
    fn clone(&self) -> Self {
        CsvExchange {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: PageRepository + Send> CsvExchange<R> {
    pub fn new(repository: Arc<Mutex<R>>) -> Self {
        CsvExchange { repository }
    }

    /// Import pages from CSV text with a `pageName,title,content` header.
    ///
    /// Rows missing any of the three fields are dropped and reported in
    /// `rejected_rows`. The surviving rows are inserted as one all-or-nothing
    /// batch.
    pub async fn import_csv(&self, raw: &str) -> CsvExchangeResult<ImportSummary> {
        let start_time = Instant::now();

        let rows = parse_page_rows(raw).map_err(|e| {
            tracing::warn!("CSV parsing failed: {}", e);
            CsvExchangeError::from(e)
        })?;
        let total_rows = rows.len();

        let now = Utc::now();
        let mut pages = Vec::with_capacity(total_rows);
        let mut rejected_rows = Vec::new();
        for row in rows {
            match validate_row(&row) {
                Ok(fields) => pages.push(Page::create(fields, now)),
                Err(reason) => {
                    tracing::debug!(line = row.line, %reason, "dropping CSV row");
                    rejected_rows.push(RejectedRow {
                        line: row.line,
                        reason,
                    });
                }
            }
        }

        if pages.is_empty() {
            return Err(CsvExchangeError::EmptyImport { rejected_rows });
        }

        self.repository.lock().await.insert_many(&pages).map_err(|e| {
            tracing::error!("Failed to insert CSV batch of {} pages: {}", pages.len(), e);
            CsvExchangeError::from(e)
        })?;

        let duration_ms = start_time.elapsed().as_millis() as u64;
        tracing::info!(
            imported = pages.len(),
            rejected = rejected_rows.len(),
            total_rows,
            duration_ms,
            "CSV import completed"
        );

        Ok(ImportSummary {
            imported_count: pages.len(),
            pages,
            rejected_rows,
            duration_ms,
        })
    }

    /// Export every stored page, in insertion order
    pub async fn export_all(&self) -> CsvExchangeResult<String> {
        let pages = self.repository.lock().await.find_all()?;
        export_csv(&pages)
    }
}

/// Serialize pages to CSV with markup flattened to plain text.
///
/// Fails with `NoData` for an empty slice without touching any store.
pub fn export_csv(pages: &[Page]) -> CsvExchangeResult<String> {
    if pages.is_empty() {
        return Err(CsvExchangeError::NoData);
    }
    Ok(write_pages_csv(pages)?)
}

fn validate_row(row: &CsvPageRow) -> Result<PageFields, String> {
    let trimmed = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or_default().to_string();
    let (page_name, title, content) = (
        trimmed(&row.page_name),
        trimmed(&row.title),
        trimmed(&row.content),
    );

    let missing: Vec<&str> = [("pageName", &page_name), ("title", &title), ("content", &content)]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();
    if !missing.is_empty() {
        return Err(format!("missing {}", missing.join(", ")));
    }

    PageFields::new(page_name, title, content).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::SqlitePageRepository;

    fn exchange() -> CsvExchange<SqlitePageRepository> {
        let repo = SqlitePageRepository::new_in_memory().unwrap();
        CsvExchange::new(Arc::new(Mutex::new(repo)))
    }

    #[tokio::test]
    async fn test_import_drops_rows_with_missing_fields() {
        let exchange = exchange();
        let summary = exchange
            .import_csv("pageName,title,content\nHome,Welcome,<p>Hi</p>\n,MissingName,X")
            .await
            .unwrap();

        assert_eq!(summary.imported_count, 1);
        assert_eq!(summary.pages[0].page_name().as_str(), "Home");
        assert_eq!(summary.pages[0].content().as_str(), "<p>Hi</p>");
        assert_eq!(
            summary.rejected_rows,
            vec![RejectedRow {
                line: 3,
                reason: "missing pageName".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_import_trims_fields() {
        let exchange = exchange();
        let summary = exchange
            .import_csv("pageName,title,content\n  Home , Welcome ,  <p>Hi</p>  \nA,   ,C")
            .await
            .unwrap();

        assert_eq!(summary.imported_count, 1);
        assert_eq!(summary.pages[0].page_name().as_str(), "Home");
        assert_eq!(summary.pages[0].title().as_str(), "Welcome");
        assert_eq!(summary.pages[0].content().as_str(), "<p>Hi</p>");
        assert_eq!(summary.rejected_rows[0].reason, "missing title");
    }

    #[tokio::test]
    async fn test_header_only_is_empty_import() {
        let exchange = exchange();
        let result = exchange.import_csv("pageName,title,content\n").await;
        assert!(matches!(result, Err(CsvExchangeError::EmptyImport { .. })));
    }

    #[tokio::test]
    async fn test_malformed_csv_persists_nothing() {
        let exchange = exchange();
        let result = exchange
            .import_csv("pageName,title,content\nA,T,C\nB,T")
            .await;

        assert!(matches!(result, Err(CsvExchangeError::Parse { .. })));
        assert!(matches!(exchange.export_all().await, Err(CsvExchangeError::NoData)));
    }

    #[tokio::test]
    async fn test_bad_quoting_persists_nothing() {
        let exchange = exchange();
        let unterminated = exchange
            .import_csv("pageName,title,content\nA,B,\"C\nD,E,F\nG,H,I\n")
            .await;
        assert!(matches!(
            unterminated,
            Err(CsvExchangeError::Parse { line: Some(2), .. })
        ));

        let trailing = exchange
            .import_csv("pageName,title,content\nA,B,\"C\"junk\n")
            .await;
        assert!(matches!(trailing, Err(CsvExchangeError::Parse { .. })));

        assert!(matches!(exchange.export_all().await, Err(CsvExchangeError::NoData)));
    }

    #[tokio::test]
    async fn test_export_all_after_import() {
        let exchange = exchange();
        exchange
            .import_csv("pageName,title,content\nA,T,<b>x</b>\nB,\"Q \"\"u\"\"\",<p>y</p>")
            .await
            .unwrap();

        let csv = exchange.export_all().await.unwrap();
        assert_eq!(
            csv,
            "Page Name,Title,Content\n\"A\",\"T\",\"x\"\n\"B\",\"Q \"\"u\"\"\",\"y\""
        );
    }

    #[test]
    fn test_export_empty_is_no_data() {
        assert!(matches!(export_csv(&[]), Err(CsvExchangeError::NoData)));
    }

    #[test]
    fn test_import_summary_rejections() {
        let summary = ImportSummary {
            imported_count: 1,
            pages: vec![],
            rejected_rows: vec![RejectedRow {
                line: 2,
                reason: "missing content".to_string(),
            }],
            duration_ms: 3,
        };
        assert!(summary.has_rejections());
    }
}
