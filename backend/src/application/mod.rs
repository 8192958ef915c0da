pub mod dto;
pub mod repositories;
pub mod services;
pub mod use_cases;

// Re-export key types to avoid naming conflicts
pub use dto::{
    ImportResponse, MessageResponse, PageDocument, PageEnvelope, PageFieldsInput,
    PageListResponse, PageMessageResponse, RejectedRow,
};
pub use repositories::PageRepository;
pub use services::{
    export_csv, CsvExchange, CsvExchangeError, CsvExchangeResult, ImportSummary, PageService,
    PageServiceError, PageServiceResult,
};
pub use use_cases::{
    AlphabeticalIndex, EditorEvent, EditorSession, EditorState, Notice, NoticeLevel, PageConsole,
    PageView,
};
