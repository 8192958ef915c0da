use crate::application::repositories::PageRepository;
use crate::domain::aggregates::Page;
use crate::domain::base::{DomainError, Entity};
use crate::domain::value_objects::{PageFields, PageId};
use crate::domain::DomainResult;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};

const PAGE_COLUMNS: &str = "id, page_name, title, content, created_at, updated_at";

/// SQLite-based implementation of the PageRepository trait
pub struct SqlitePageRepository {
    conn: Connection,
}

impl SqlitePageRepository {
    /// Create a new SQLite repository with the given connection
    pub fn new(conn: Connection) -> SqliteResult<Self> {
        super::schema::initialize_database(&conn)?;
        Ok(SqlitePageRepository { conn })
    }

    /// Create a new in-memory SQLite repository (useful for testing)
    pub fn new_in_memory() -> SqliteResult<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    /// Create a new file-based SQLite repository
    pub fn new_with_path(path: impl AsRef<std::path::Path>) -> SqliteResult<Self> {
        Self::new(Connection::open(path)?)
    }

    fn insert_batch(&mut self, pages: &[Page]) -> SqliteResult<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO pages (id, page_name, title, content, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for page in pages {
                stmt.execute(params![
                    page.id().to_string(),
                    page.page_name().as_str(),
                    page.title().as_str(),
                    page.content().as_str(),
                    format_timestamp(page.created_at()),
                    format_timestamp(page.updated_at()),
                ])?;
            }
        }
        // Dropping the transaction without commit rolls the whole batch back
        tx.commit()
    }

    fn upsert(&self, page: &Page) -> SqliteResult<()> {
        self.conn.execute(
            "INSERT INTO pages (id, page_name, title, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                page_name = excluded.page_name,
                title = excluded.title,
                content = excluded.content,
                updated_at = excluded.updated_at",
            params![
                page.id().to_string(),
                page.page_name().as_str(),
                page.title().as_str(),
                page.content().as_str(),
                format_timestamp(page.created_at()),
                format_timestamp(page.updated_at()),
            ],
        )?;
        Ok(())
    }

    fn query_one(&self, filter: &str, value: &str) -> SqliteResult<Option<Page>> {
        let sql = format!(
            "SELECT {} FROM pages WHERE {} = ?1 ORDER BY seq LIMIT 1",
            PAGE_COLUMNS, filter
        );
        self.conn
            .query_row(&sql, params![value], page_from_row)
            .optional()
    }

    fn query_all(&self) -> SqliteResult<Vec<Page>> {
        let sql = format!("SELECT {} FROM pages ORDER BY seq", PAGE_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let pages = stmt
            .query_map([], page_from_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(pages)
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> SqliteResult<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn page_from_row(row: &Row<'_>) -> SqliteResult<Page> {
    let id_str: String = row.get(0)?;
    let id = PageId::parse(&id_str).map_err(|e| conversion_error(0, e))?;

    let fields = PageFields::new(
        row.get::<_, String>(1)?,
        row.get::<_, String>(2)?,
        row.get::<_, String>(3)?,
    )
    .map_err(|e| conversion_error(1, e))?;

    Ok(Page::restore(
        id,
        fields,
        parse_timestamp(row, 4)?,
        parse_timestamp(row, 5)?,
    ))
}

fn storage_error(e: rusqlite::Error) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

impl PageRepository for SqlitePageRepository {
    fn save(&mut self, page: &Page) -> DomainResult<()> {
        self.upsert(page).map_err(storage_error)
    }

    fn insert_many(&mut self, pages: &[Page]) -> DomainResult<()> {
        self.insert_batch(pages).map_err(storage_error)
    }

    fn find_by_id(&self, id: &PageId) -> DomainResult<Option<Page>> {
        self.query_one("id", &id.to_string()).map_err(storage_error)
    }

    fn find_by_name(&self, page_name: &str) -> DomainResult<Option<Page>> {
        self.query_one("page_name", page_name).map_err(storage_error)
    }

    fn find_all(&self) -> DomainResult<Vec<Page>> {
        self.query_all().map_err(storage_error)
    }

    fn delete(&mut self, id: &PageId) -> DomainResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM pages WHERE id = ?1", params![id.to_string()])
            .map_err(storage_error)?;

        Ok(rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn create_test_page(name: &str) -> Page {
        let fields = PageFields::new(name, "Test Page", "<p>Hello <b>world</b></p>").unwrap();
        Page::create(fields, Utc::now())
    }

    #[test]
    fn test_save_and_find_by_id() {
        let mut repo = SqlitePageRepository::new_in_memory().unwrap();
        let page = create_test_page("Home");

        repo.save(&page).unwrap();

        let loaded_page = repo.find_by_id(page.id()).unwrap().unwrap();
        assert_eq!(loaded_page, page);
    }

    #[test]
    fn test_find_by_id_not_found() {
        let repo = SqlitePageRepository::new_in_memory().unwrap();
        let result = repo.find_by_id(&PageId::generate()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_find_by_name_returns_first_inserted() {
        let mut repo = SqlitePageRepository::new_in_memory().unwrap();
        let first = create_test_page("Docs");
        let second = create_test_page("Docs");

        repo.save(&first).unwrap();
        repo.save(&second).unwrap();

        let loaded_page = repo.find_by_name("Docs").unwrap().unwrap();
        assert_eq!(loaded_page.id(), first.id());
    }

    #[test]
    fn test_find_by_name_is_case_sensitive() {
        let mut repo = SqlitePageRepository::new_in_memory().unwrap();
        repo.save(&create_test_page("Docs")).unwrap();

        assert!(repo.find_by_name("docs").unwrap().is_none());
        assert!(repo.find_by_name("nonexistent").unwrap().is_none());
    }

    #[test]
    fn test_find_all_in_insertion_order() {
        let mut repo = SqlitePageRepository::new_in_memory().unwrap();
        let pages: Vec<Page> = ["zeta", "alpha", "mid"]
            .iter()
            .map(|name| create_test_page(name))
            .collect();

        for page in &pages {
            repo.save(page).unwrap();
        }

        let names: Vec<String> = repo
            .find_all()
            .unwrap()
            .iter()
            .map(|p| p.page_name().to_string())
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_update_page_keeps_position_and_created_at() {
        let mut repo = SqlitePageRepository::new_in_memory().unwrap();
        let mut page = create_test_page("first");
        let other = create_test_page("second");

        repo.save(&page).unwrap();
        repo.save(&other).unwrap();

        let later = page.created_at() + Duration::seconds(10);
        page.revise(
            PageFields::new("renamed", "Updated Title", "<p>new</p>").unwrap(),
            later,
        );
        repo.save(&page).unwrap();

        let loaded_page = repo.find_by_id(page.id()).unwrap().unwrap();
        assert_eq!(loaded_page.title().as_str(), "Updated Title");
        assert_eq!(loaded_page.updated_at(), later);
        assert_eq!(loaded_page.created_at(), page.created_at());

        let all = repo.find_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id(), page.id());
    }

    #[test]
    fn test_insert_many() {
        let mut repo = SqlitePageRepository::new_in_memory().unwrap();
        let pages = vec![create_test_page("a"), create_test_page("b")];

        repo.insert_many(&pages).unwrap();

        assert_eq!(repo.find_all().unwrap(), pages);
    }

    #[test]
    fn test_insert_many_is_all_or_nothing() {
        let mut repo = SqlitePageRepository::new_in_memory().unwrap();
        let existing = create_test_page("existing");
        repo.save(&existing).unwrap();

        // The duplicate id makes the second insert fail
        let batch = vec![create_test_page("new"), existing.clone()];
        let result = repo.insert_many(&batch);

        assert!(matches!(result, Err(DomainError::Storage(_))));
        assert_eq!(repo.find_all().unwrap(), vec![existing]);
    }

    #[test]
    fn test_delete() {
        let mut repo = SqlitePageRepository::new_in_memory().unwrap();
        let page = create_test_page("Home");

        repo.save(&page).unwrap();

        let deleted = repo.delete(page.id()).unwrap();
        assert!(deleted);

        let result = repo.find_by_id(page.id()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_delete_nonexistent() {
        let mut repo = SqlitePageRepository::new_in_memory().unwrap();

        let deleted = repo.delete(&PageId::generate()).unwrap();
        assert!(!deleted);
    }

    #[test]
    fn test_file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pages.db");
        let page = create_test_page("Durable");

        {
            let mut repo = SqlitePageRepository::new_with_path(&path).unwrap();
            repo.save(&page).unwrap();
        }

        let repo = SqlitePageRepository::new_with_path(&path).unwrap();
        assert_eq!(repo.find_by_id(page.id()).unwrap(), Some(page));
    }
}
