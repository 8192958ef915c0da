use super::alphabetical_index::{group_by_page_name, AlphabeticalIndex};
use super::editor_session::{EditorEvent, EditorSession};
use crate::application::dto::PageFieldsInput;
use crate::application::repositories::PageRepository;
use crate::application::services::{
    export_csv, CsvExchange, CsvExchangeError, PageService, PageServiceResult,
};
use crate::domain::{aggregates::Page, base::Entity, value_objects::PageId};
use crate::infrastructure::markup::strip_markup;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// A non-blocking notification for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub text: Option<String>,
}

impl Notice {
    pub fn success(title: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Success,
            title: title.into(),
            text: None,
        }
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Warning,
            title: title.into(),
            text: None,
        }
    }

    pub fn error(title: impl Into<String>, text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            title: title.into(),
            text: Some(text.into()),
        }
    }
}

/// A page rendered for reading: title plus plain-text body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub title: String,
    pub text: String,
}

#[derive(Debug)]
struct Selection {
    page: Page,
    editor: EditorSession,
    editing: bool,
}

/// Client-side orchestration of the page management screen.
///
/// Holds the full page list fetched from the service. The list is refetched
/// on mount, after create and after import; update and delete patch it in
/// place.
pub struct PageConsole<R: PageRepository> {
    service: PageService<R>,
    exchange: CsvExchange<R>,
    pages: Vec<Page>,
    create_editor: Option<EditorSession>,
    selection: Option<Selection>,
}

impl<R: PageRepository + Send> PageConsole<R> {
    pub fn new(service: PageService<R>, exchange: CsvExchange<R>) -> Self {
        PageConsole {
            service,
            exchange,
            pages: Vec::new(),
            create_editor: None,
            selection: None,
        }
    }

    /// Initial fetch when the screen is shown
    pub async fn mount(&mut self) -> PageServiceResult<()> {
        self.refresh().await
    }

    pub async fn refresh(&mut self) -> PageServiceResult<()> {
        match self.service.get_all().await {
            Ok(pages) => {
                self.pages = pages;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error fetching pages: {}", e);
                Err(e)
            }
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn alphabetical_index(&self) -> AlphabeticalIndex {
        AlphabeticalIndex::build(&self.pages)
    }

    pub fn grouped_by_name(&self) -> Vec<(String, Vec<Page>)> {
        group_by_page_name(&self.pages)
    }

    /// Open the "add page" form with a fresh editor
    pub fn open_create(&mut self) -> &mut EditorSession {
        if let Some(mut stale) = self.create_editor.take() {
            stale.apply(EditorEvent::Close);
        }
        let mut editor = EditorSession::new("");
        editor.apply(EditorEvent::Open);
        self.create_editor.insert(editor)
    }

    pub fn create_editor(&mut self) -> Option<&mut EditorSession> {
        self.create_editor.as_mut()
    }

    pub fn close_create(&mut self) {
        if let Some(mut editor) = self.create_editor.take() {
            editor.apply(EditorEvent::Close);
        }
    }

    /// Submit the add form using the create editor's current markup
    pub async fn save_new(
        &mut self,
        page_name: impl Into<String>,
        title: impl Into<String>,
    ) -> PageServiceResult<Notice> {
        let content = self
            .create_editor
            .as_ref()
            .map(|editor| editor.content().to_string())
            .unwrap_or_default();

        if let Err(e) = self
            .service
            .create(PageFieldsInput::new(page_name, title, content))
            .await
        {
            tracing::error!("Error saving page: {}", e);
            return Err(e);
        }

        self.close_create();
        self.refresh().await?;
        Ok(Notice::success("Page uploaded successfully"))
    }

    /// Open the view/edit modal for a page in the local list
    pub fn select(&mut self, id: &PageId) -> bool {
        self.cancel();
        let Some(page) = self.pages.iter().find(|p| p.id() == id).cloned() else {
            return false;
        };

        let mut editor = EditorSession::new("");
        editor.apply(EditorEvent::Open);
        editor.apply(EditorEvent::Load(page.content().to_string()));
        self.selection = Some(Selection {
            page,
            editor,
            editing: false,
        });
        true
    }

    pub fn selected(&self) -> Option<&Page> {
        self.selection.as_ref().map(|s| &s.page)
    }

    pub fn selected_editor(&mut self) -> Option<&mut EditorSession> {
        self.selection.as_mut().map(|s| &mut s.editor)
    }

    pub fn begin_edit(&mut self) {
        if let Some(selection) = self.selection.as_mut() {
            selection.editing = true;
        }
    }

    pub fn is_editing(&self) -> bool {
        self.selection.as_ref().map_or(false, |s| s.editing)
    }

    /// Close the view/edit modal, discarding unsaved edits
    pub fn cancel(&mut self) {
        if let Some(mut selection) = self.selection.take() {
            selection.editor.apply(EditorEvent::Close);
        }
    }

    /// Save the selected page with the view editor's current markup
    pub async fn update_selected(
        &mut self,
        page_name: impl Into<String>,
        title: impl Into<String>,
    ) -> PageServiceResult<Option<Notice>> {
        let Some(selection) = self.selection.as_ref() else {
            return Ok(None);
        };
        let id = selection.page.id().to_string();
        let input = PageFieldsInput::new(page_name, title, selection.editor.content());

        let updated = match self.service.update(&id, input).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!("Error updating page: {}", e);
                return Err(e);
            }
        };

        for page in self.pages.iter_mut().filter(|p| p.id() == updated.id()) {
            *page = updated.clone();
        }
        self.cancel();
        Ok(Some(Notice::success("Page updated successfully")))
    }

    pub async fn delete_selected(&mut self) -> PageServiceResult<Option<Notice>> {
        let Some(selection) = self.selection.as_ref() else {
            return Ok(None);
        };
        let id = *selection.page.id();

        if let Err(e) = self.service.delete(&id.to_string()).await {
            tracing::error!("Error deleting page: {}", e);
            return Err(e);
        }

        self.pages.retain(|p| p.id() != &id);
        self.cancel();
        Ok(Some(Notice::success("Page deleted successfully")))
    }

    /// Upload CSV text; the outcome is always reported as a notice
    pub async fn import_csv(&mut self, raw: &str) -> Notice {
        match self.exchange.import_csv(raw).await {
            Ok(summary) => {
                if let Err(e) = self.refresh().await {
                    tracing::warn!("Imported {} pages but refresh failed: {}", summary.imported_count, e);
                }
                let mut notice = Notice::success(format!(
                    "Total {} pages uploaded successfully!",
                    summary.imported_count
                ));
                if summary.has_rejections() {
                    notice.text = Some(format!(
                        "{} rows skipped for missing fields",
                        summary.rejected_rows.len()
                    ));
                }
                notice
            }
            Err(CsvExchangeError::Repository(e)) => {
                tracing::error!("Upload Error: {}", e);
                Notice::error("Upload Error", "Something went wrong. Please try again.")
            }
            Err(e) => Notice::error("Failed to upload CSV data", e.to_string()),
        }
    }

    /// CSV download of the local list, or a warning when it is empty
    pub fn download_csv(&self) -> Result<String, Notice> {
        match export_csv(&self.pages) {
            Ok(csv) => Ok(csv),
            Err(CsvExchangeError::NoData) => Err(Notice::warning("No pages available to download")),
            Err(e) => {
                tracing::error!("CSV export failed: {}", e);
                Err(Notice::error("Download Error", e.to_string()))
            }
        }
    }

    /// Read one page by name, content flattened to plain text
    pub async fn view_by_name(&self, page_name: &str) -> PageServiceResult<PageView> {
        let page = self.service.get_by_name(page_name).await?;
        Ok(PageView {
            title: page.title().to_string(),
            text: strip_markup(page.content().as_str()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::editor_session::EditorState;
    use crate::infrastructure::persistence::SqlitePageRepository;

    fn console() -> PageConsole<SqlitePageRepository> {
        let service = PageService::new(SqlitePageRepository::new_in_memory().unwrap());
        let exchange = CsvExchange::new(service.shared_repository());
        PageConsole::new(service, exchange)
    }

    async fn add(console: &mut PageConsole<SqlitePageRepository>, name: &str, markup: &str) {
        let editor = console.open_create();
        editor.apply(EditorEvent::WidgetReady);
        editor.apply(EditorEvent::ContentChanged(markup.to_string()));
        console.save_new(name, "Title").await.unwrap();
    }

    #[tokio::test]
    async fn test_save_new_uses_editor_content_and_refreshes() {
        let mut console = console();
        console.mount().await.unwrap();
        assert!(console.pages().is_empty());

        let editor = console.open_create();
        editor.apply(EditorEvent::WidgetReady);
        editor.apply(EditorEvent::ContentChanged("<p>Hi</p>".to_string()));
        let notice = console.save_new("Home", "Welcome").await.unwrap();

        assert_eq!(notice, Notice::success("Page uploaded successfully"));
        assert_eq!(console.pages().len(), 1);
        assert_eq!(console.pages()[0].content().as_str(), "<p>Hi</p>");
        assert!(console.create_editor().is_none());
    }

    #[tokio::test]
    async fn test_save_new_without_content_fails_and_keeps_form() {
        let mut console = console();
        console.open_create();

        assert!(console.save_new("Home", "Welcome").await.is_err());
        assert!(console.create_editor().is_some());
        assert!(console.pages().is_empty());
    }

    #[tokio::test]
    async fn test_update_selected_patches_list() {
        let mut console = console();
        add(&mut console, "Home", "<p>v1</p>").await;
        let id = *console.pages()[0].id();

        assert!(console.select(&id));
        console.begin_edit();
        let editor = console.selected_editor().unwrap();
        assert_eq!(editor.content(), "<p>v1</p>");
        editor.apply(EditorEvent::WidgetReady);
        editor.apply(EditorEvent::ContentChanged("<p>v2</p>".to_string()));

        let notice = console.update_selected("Home", "New title").await.unwrap();
        assert_eq!(notice, Some(Notice::success("Page updated successfully")));
        assert_eq!(console.pages()[0].title().as_str(), "New title");
        assert_eq!(console.pages()[0].content().as_str(), "<p>v2</p>");
        assert!(console.selected().is_none());
    }

    #[tokio::test]
    async fn test_delete_selected_removes_from_list() {
        let mut console = console();
        add(&mut console, "Home", "<p>x</p>").await;
        add(&mut console, "About", "<p>y</p>").await;
        let id = *console.pages()[0].id();

        console.select(&id);
        console.delete_selected().await.unwrap();

        assert_eq!(console.pages().len(), 1);
        assert_eq!(console.pages()[0].page_name().as_str(), "About");
    }

    #[tokio::test]
    async fn test_update_without_selection_is_noop() {
        let mut console = console();
        assert_eq!(console.update_selected("a", "b").await.unwrap(), None);
        assert_eq!(console.delete_selected().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cancel_destroys_view_editor() {
        let mut console = console();
        add(&mut console, "Home", "<p>x</p>").await;
        let id = *console.pages()[0].id();

        console.select(&id);
        assert_eq!(console.selected_editor().unwrap().state(), EditorState::Initializing);
        console.cancel();
        assert!(console.selected_editor().is_none());
        assert!(!console.is_editing());
    }

    #[tokio::test]
    async fn test_import_and_download() {
        let mut console = console();
        assert_eq!(
            console.download_csv(),
            Err(Notice::warning("No pages available to download"))
        );

        let notice = console
            .import_csv("pageName,title,content\nbanana,T,<b>x</b>\nApple,T,<i>y</i>")
            .await;
        assert_eq!(notice, Notice::success("Total 2 pages uploaded successfully!"));

        let csv = console.download_csv().unwrap();
        assert_eq!(
            csv,
            "Page Name,Title,Content\n\"banana\",\"T\",\"x\"\n\"Apple\",\"T\",\"y\""
        );
        assert_eq!(console.alphabetical_index().keys(), vec!['A', 'B']);
    }

    #[tokio::test]
    async fn test_failed_import_is_error_notice() {
        let mut console = console();
        let notice = console.import_csv("pageName,title,content\n").await;
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.title, "Failed to upload CSV data");
        assert_eq!(notice.text.as_deref(), Some("No valid data found in CSV"));
    }

    #[tokio::test]
    async fn test_view_by_name_renders_plain_text() {
        let mut console = console();
        add(&mut console, "Home", "<p>Fish &amp; <b>Chips</b></p>").await;

        let view = console.view_by_name("Home").await.unwrap();
        assert_eq!(view.title, "Title");
        assert_eq!(view.text, "Fish & Chips");
    }
}
