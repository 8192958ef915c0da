pub mod page;

pub use page::{
    ImportResponse, MessageResponse, PageDocument, PageEnvelope, PageFieldsInput,
    PageListResponse, PageMessageResponse, RejectedRow,
};
