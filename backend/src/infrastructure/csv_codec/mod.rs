mod page_csv;

pub use page_csv::{parse_page_rows, write_pages_csv, CsvCodecError, CsvPageRow, EXPORT_HEADER};
