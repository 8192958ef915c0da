mod schema;
mod sqlite_page_repository;

pub use schema::initialize_database;
pub use sqlite_page_repository::SqlitePageRepository;
