/// Lifecycle of one rich-text editor widget instance
///
/// The widget itself is an external collaborator; this only tracks which
/// state it is in and the markup it last reported.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// Created but not yet opened
    Closed,
    /// Opened, waiting for the widget to attach
    Initializing,
    /// Widget attached and emitting change events
    Ready,
    /// Torn down; terminal
    Destroyed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// The modal hosting the editor opened
    Open,
    /// The widget finished attaching to its container
    WidgetReady,
    /// Page data arrived and should seed the editor
    Load(String),
    /// The widget emitted a change carrying its current markup
    ContentChanged(String),
    /// The hosting modal closed
    Close,
}

#[derive(Debug, Clone)]
pub struct EditorSession {
    state: EditorState,
    content: String,
}

impl EditorSession {
    pub fn new(initial_markup: impl Into<String>) -> Self {
        EditorSession {
            state: EditorState::Closed,
            content: initial_markup.into(),
        }
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    /// Markup the form will submit
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_live(&self) -> bool {
        matches!(self.state, EditorState::Initializing | EditorState::Ready)
    }

    /// Apply an event and return the resulting state.
    ///
    /// Events that do not apply in the current state leave it untouched, so
    /// repeating any event is harmless.
    pub fn apply(&mut self, event: EditorEvent) -> EditorState {
        use EditorEvent::*;
        use EditorState::*;

        self.state = match (self.state, event) {
            (Destroyed, _) => Destroyed,
            (_, Close) => Destroyed,
            (Closed, Open) => Initializing,
            (Initializing, WidgetReady) => Ready,
            (Initializing | Ready, Load(markup)) => {
                self.content = markup;
                self.state
            }
            (Ready, ContentChanged(markup)) => {
                self.content = markup;
                Ready
            }
            (state, _) => state,
        };
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_lifecycle() {
        let mut session = EditorSession::new("<p>draft</p>");
        assert_eq!(session.state(), EditorState::Closed);

        assert_eq!(session.apply(EditorEvent::Open), EditorState::Initializing);
        assert_eq!(session.apply(EditorEvent::WidgetReady), EditorState::Ready);
        session.apply(EditorEvent::ContentChanged("<p>edited</p>".to_string()));
        assert_eq!(session.content(), "<p>edited</p>");

        assert_eq!(session.apply(EditorEvent::Close), EditorState::Destroyed);
        assert!(!session.is_live());
    }

    #[test]
    fn test_transitions_are_idempotent() {
        let mut session = EditorSession::new("");
        session.apply(EditorEvent::Open);
        assert_eq!(session.apply(EditorEvent::Open), EditorState::Initializing);

        session.apply(EditorEvent::WidgetReady);
        assert_eq!(session.apply(EditorEvent::WidgetReady), EditorState::Ready);
        assert_eq!(session.apply(EditorEvent::Open), EditorState::Ready);

        session.apply(EditorEvent::Close);
        assert_eq!(session.apply(EditorEvent::Close), EditorState::Destroyed);
    }

    #[test]
    fn test_destroyed_is_terminal() {
        let mut session = EditorSession::new("<p>x</p>");
        session.apply(EditorEvent::Close);

        assert_eq!(session.apply(EditorEvent::Open), EditorState::Destroyed);
        session.apply(EditorEvent::Load("<p>late</p>".to_string()));
        assert_eq!(session.content(), "<p>x</p>");
    }

    #[test]
    fn test_changes_ignored_until_ready() {
        let mut session = EditorSession::new("<p>seed</p>");
        session.apply(EditorEvent::ContentChanged("<p>early</p>".to_string()));
        assert_eq!(session.content(), "<p>seed</p>");

        session.apply(EditorEvent::Open);
        session.apply(EditorEvent::ContentChanged("<p>early</p>".to_string()));
        assert_eq!(session.content(), "<p>seed</p>");
    }

    #[test]
    fn test_load_seeds_content_while_live() {
        let mut session = EditorSession::new("");
        session.apply(EditorEvent::Load("<p>ignored</p>".to_string()));
        assert_eq!(session.content(), "");

        session.apply(EditorEvent::Open);
        session.apply(EditorEvent::Load("<p>page</p>".to_string()));
        assert_eq!(session.state(), EditorState::Initializing);
        assert_eq!(session.content(), "<p>page</p>");
    }
}
