use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use papier_engine::{
    Document, DocumentChanges, DocumentId, DocumentStore, HeadingLevel, NewDocument,
    StoreError, Transformation,
};
use ratatui::widgets::ListState;

use crate::editor::Editor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    List,
    Edit,
    NewTitle(String),
    ConfirmDelete(DocumentId),
}

pub struct App<S: DocumentStore> {
    store: S,
    owner_id: String,
    pub documents: Vec<Document>,
    pub list_state: ListState,
    pub mode: Mode,
    pub editor: Option<Editor>,
    pub show_preview: bool,
    pub status: Option<String>,
    /// First visible editor line
    pub scroll: u16,
    pub should_quit: bool,
}

impl<S: DocumentStore> App<S> {
    pub fn new(store: S, owner_id: String) -> Result<Self, StoreError> {
        let mut app = Self {
            store,
            owner_id,
            documents: Vec::new(),
            list_state: ListState::default(),
            mode: Mode::List,
            editor: None,
            show_preview: true,
            status: None,
            scroll: 0,
            should_quit: false,
        };
        app.reload()?;
        Ok(app)
    }

    /// Re-read the document list, keeping the selection in range
    pub fn reload(&mut self) -> Result<(), StoreError> {
        self.documents = self.store.list()?;
        let selected = match self.list_state.selected() {
            _ if self.documents.is_empty() => None,
            Some(i) => Some(i.min(self.documents.len() - 1)),
            None => Some(0),
        };
        self.list_state.select(selected);
        Ok(())
    }

    pub fn selected_document(&self) -> Option<&Document> {
        self.list_state
            .selected()
            .and_then(|i| self.documents.get(i))
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.mode.clone() {
            Mode::List => self.handle_list_key(key),
            Mode::Edit => self.handle_edit_key(key),
            Mode::NewTitle(title) => self.handle_title_key(key, title),
            Mode::ConfirmDelete(id) => self.handle_confirm_delete_key(key, id),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.next_document(),
            KeyCode::Up | KeyCode::Char('k') => self.previous_document(),
            KeyCode::Enter => self.open_selected(),
            KeyCode::Char('n') => {
                self.status = None;
                self.mode = Mode::NewTitle(String::new());
            }
            KeyCode::Char('d') => {
                if let Some((id, title)) = self
                    .selected_document()
                    .map(|doc| (doc.id, doc.title.clone()))
                {
                    self.status = Some(format!("Delete '{title}'? (y/n)"));
                    self.mode = Mode::ConfirmDelete(id);
                }
            }
            KeyCode::Char('r') => {
                let result = self.reload();
                self.report(result, "Reloaded");
            }
            _ => {}
        }
    }

    fn handle_title_key(&mut self, key: KeyEvent, mut title: String) {
        match key.code {
            KeyCode::Esc => self.mode = Mode::List,
            KeyCode::Enter => self.create_document(title),
            KeyCode::Backspace => {
                title.pop();
                self.mode = Mode::NewTitle(title);
            }
            KeyCode::Char(ch) => {
                title.push(ch);
                self.mode = Mode::NewTitle(title);
            }
            _ => {}
        }
    }

    fn handle_confirm_delete_key(&mut self, key: KeyEvent, id: DocumentId) {
        self.mode = Mode::List;
        if key.code != KeyCode::Char('y') {
            self.status = Some("Delete cancelled".to_string());
            return;
        }
        let result = self.store.delete(id).and_then(|()| self.reload());
        self.report(result, "Deleted");
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        let Some(editor) = self.editor.as_mut() else {
            self.mode = Mode::List;
            return;
        };
        let extend = key.modifiers.contains(KeyModifiers::SHIFT);

        if key.modifiers.contains(KeyModifiers::ALT) {
            if let KeyCode::Char(ch) = key.code
                && let Some(transformation) = toolbar_shortcut(ch)
            {
                if let Err(e) = editor.apply(transformation) {
                    self.status = Some(format!("Formatting failed: {e}"));
                }
            }
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('s') {
                self.save();
            }
            return;
        }

        match key.code {
            KeyCode::Esc => {
                if self.save() {
                    self.editor = None;
                    self.scroll = 0;
                    self.mode = Mode::List;
                }
            }
            KeyCode::Tab => self.show_preview = !self.show_preview,
            KeyCode::Enter => editor.insert_char('\n'),
            KeyCode::Backspace => editor.backspace(),
            KeyCode::Delete => editor.delete(),
            KeyCode::Left => editor.move_left(extend),
            KeyCode::Right => editor.move_right(extend),
            KeyCode::Up => editor.move_up(extend),
            KeyCode::Down => editor.move_down(extend),
            KeyCode::Home => editor.move_home(extend),
            KeyCode::End => editor.move_end(extend),
            KeyCode::Char(ch) => editor.insert_char(ch),
            _ => {}
        }
    }

    fn next_document(&mut self) {
        if self.documents.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1) % self.documents.len(),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn previous_document(&mut self) {
        if self.documents.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => self.documents.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    fn open_selected(&mut self) {
        let Some(id) = self.selected_document().map(|doc| doc.id) else {
            return;
        };
        // Fetch fresh so edits start from what is stored
        match self.store.get(id) {
            Ok(doc) => self.open_editor(&doc),
            Err(e) => self.status = Some(format!("Error: {e}")),
        }
    }

    fn open_editor(&mut self, doc: &Document) {
        self.editor = Some(Editor::open(doc));
        self.scroll = 0;
        self.status = None;
        self.mode = Mode::Edit;
    }

    fn create_document(&mut self, title: String) {
        let new = NewDocument::new(title, self.owner_id.clone());
        match self.store.create(new) {
            Ok(doc) => {
                let result = self.reload();
                if let Some(i) = self.documents.iter().position(|d| d.id == doc.id) {
                    self.list_state.select(Some(i));
                }
                self.open_editor(&doc);
                self.report(result, "Created");
            }
            Err(e) => {
                // Stay in title entry so the user can fix it
                self.status = Some(format!("Error: {e}"));
            }
        }
    }

    /// Persist editor content if it changed. Returns false if saving failed.
    fn save(&mut self) -> bool {
        let Some(editor) = self.editor.as_mut() else {
            return true;
        };
        if !editor.is_dirty() {
            return true;
        }

        let changes = DocumentChanges::content(editor.text());
        match self.store.update(editor.document_id(), changes) {
            Ok(_) => {
                editor.mark_clean();
                let result = self.reload();
                self.report(result, "Saved");
                true
            }
            Err(e) => {
                self.status = Some(format!("Save failed: {e}"));
                false
            }
        }
    }

    fn report(&mut self, result: Result<(), StoreError>, success: &str) {
        self.status = Some(match result {
            Ok(()) => success.to_string(),
            Err(e) => format!("Error: {e}"),
        });
    }
}

/// Alt+key toolbar bindings
pub fn toolbar_shortcut(ch: char) -> Option<Transformation> {
    match ch {
        'b' => Some(Transformation::Bold),
        'i' => Some(Transformation::Italic),
        'l' => Some(Transformation::ListToggle),
        'k' => Some(Transformation::Link),
        'c' => Some(Transformation::Code),
        '1'..='6' => ch
            .to_digit(10)
            .and_then(|d| HeadingLevel::new(d as u8))
            .map(Transformation::Heading),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use papier_engine::MemoryStore;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn alt(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::ALT)
    }

    fn type_str(app: &mut App<MemoryStore>, s: &str) {
        for ch in s.chars() {
            app.handle_key(key(KeyCode::Char(ch)));
        }
    }

    fn empty_app() -> App<MemoryStore> {
        App::new(MemoryStore::new(), "user123".to_string()).unwrap()
    }

    #[test]
    fn test_create_edit_save_flow() {
        let mut app = empty_app();

        app.handle_key(key(KeyCode::Char('n')));
        type_str(&mut app, "Notes");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Edit);
        assert_eq!(app.documents.len(), 1);

        type_str(&mut app, "milk");
        app.handle_key(alt('l'));
        app.handle_key(key(KeyCode::Esc));

        assert_eq!(app.mode, Mode::List);
        assert_eq!(app.documents[0].content, "- milk");
        assert_eq!(app.documents[0].owner_id, "user123");
        assert_eq!(app.status.as_deref(), Some("Saved"));
    }

    #[test]
    fn test_empty_title_is_rejected() {
        let mut app = empty_app();

        app.handle_key(key(KeyCode::Char('n')));
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.mode, Mode::NewTitle(String::new()));
        assert!(app.status.as_deref().unwrap().contains("Title is required"));
        assert!(app.documents.is_empty());
    }

    #[test]
    fn test_toolbar_on_selection() {
        let mut app = empty_app();
        app.handle_key(key(KeyCode::Char('n')));
        type_str(&mut app, "Doc");
        app.handle_key(key(KeyCode::Enter));

        type_str(&mut app, "loud");
        app.handle_key(KeyEvent::new(KeyCode::Home, KeyModifiers::SHIFT));
        app.handle_key(alt('b'));

        let editor = app.editor.as_ref().unwrap();
        assert_eq!(editor.text(), "**loud**");
        assert_eq!(editor.selection(), 8..8);
        assert!(editor.is_dirty());
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut store = MemoryStore::new();
        store.create(NewDocument::new("Keep", "user123")).unwrap();
        let mut app = App::new(store, "user123".to_string()).unwrap();

        app.handle_key(key(KeyCode::Char('d')));
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.documents.len(), 1);

        app.handle_key(key(KeyCode::Char('d')));
        app.handle_key(key(KeyCode::Char('y')));
        assert!(app.documents.is_empty());
        assert_eq!(app.list_state.selected(), None);
    }

    #[test]
    fn test_list_navigation_wraps() {
        let mut store = MemoryStore::new();
        for title in ["a", "b", "c"] {
            store.create(NewDocument::new(title, "user123")).unwrap();
        }
        let mut app = App::new(store, "user123".to_string()).unwrap();

        assert_eq!(app.list_state.selected(), Some(0));
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.list_state.selected(), Some(2));
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn test_toolbar_shortcuts() {
        assert_eq!(toolbar_shortcut('b'), Some(Transformation::Bold));
        assert_eq!(
            toolbar_shortcut('3'),
            Some(Transformation::Heading(HeadingLevel::new(3).unwrap()))
        );
        assert_eq!(toolbar_shortcut('7'), None);
        assert_eq!(toolbar_shortcut('z'), None);
    }
}
