pub mod csv_exchange;
pub mod page_service;

pub use csv_exchange::{export_csv, CsvExchange, CsvExchangeError, CsvExchangeResult, ImportSummary};
pub use page_service::{PageService, PageServiceError, PageServiceResult, REQUIRED_FIELDS_MESSAGE};
