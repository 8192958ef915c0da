pub mod alphabetical_index;
pub mod editor_session;
pub mod page_console;

pub use alphabetical_index::{compare_page_names, group_by_page_name, AlphabeticalIndex, ITEMS_PER_PAGE};
pub use editor_session::{EditorEvent, EditorSession, EditorState};
pub use page_console::{Notice, NoticeLevel, PageConsole, PageView};
