/// Domain aggregates
use super::base::Entity;
use super::value_objects::{PageFields, PageId, PageName, PageTitle, RichText};
use chrono::{DateTime, Utc};

/// A Page is the aggregate root of the content store: a named, titled
/// rich-text document. Pages are flat and independent of each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    id: PageId,
    fields: PageFields,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Page {
    /// Create a brand new page with a freshly generated id
    pub fn create(fields: PageFields, now: DateTime<Utc>) -> Self {
        Page {
            id: PageId::generate(),
            fields,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a page from stored state
    pub fn restore(
        id: PageId,
        fields: PageFields,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Page {
            id,
            fields,
            created_at,
            updated_at,
        }
    }

    pub fn page_name(&self) -> &PageName {
        &self.fields.page_name
    }

    pub fn title(&self) -> &PageTitle {
        &self.fields.title
    }

    pub fn content(&self) -> &RichText {
        &self.fields.content
    }

    pub fn fields(&self) -> &PageFields {
        &self.fields
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace all three mutable fields. The id and creation time never change.
    pub fn revise(&mut self, fields: PageFields, now: DateTime<Utc>) {
        self.fields = fields;
        // Clock skew must not move updated_at before created_at
        self.updated_at = now.max(self.created_at);
    }
}

impl Entity for Page {
    type Id = PageId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
