mod plain_text;

pub use plain_text::{strip_markup, MarkupStripper};
