use crate::store::ConversationStore;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

pub const PLACEHOLDER: &str = "Type a message...";

/// Result returned when the user interacts with the composer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerResult {
    /// Enter was pressed; the draft should be submitted
    Submit,
    /// The draft or cursor changed
    Edited,
    None,
}

/// Cursor over the store's draft. The draft text itself lives in the store;
/// the composer only tracks where edits land, counted in characters.
#[derive(Debug, Clone, Default)]
pub struct ConversationComposer {
    cursor: usize,
}

impl ConversationComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Place the cursor after the last character of `draft`
    pub fn move_to_end(&mut self, draft: &str) {
        self.cursor = draft.chars().count();
    }

    /// Handle key input, editing the draft in `store`
    pub fn handle_key(&mut self, key: KeyEvent, store: &mut ConversationStore) -> ComposerResult {
        if key.kind != KeyEventKind::Press {
            return ComposerResult::None;
        }

        let mut chars: Vec<char> = store.draft().chars().collect();
        self.cursor = self.cursor.min(chars.len());

        match key.code {
            KeyCode::Enter if !key.modifiers.contains(KeyModifiers::SHIFT) => {
                return ComposerResult::Submit;
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                chars.insert(self.cursor, c);
                self.cursor += 1;
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                chars.remove(self.cursor);
            }
            KeyCode::Delete if self.cursor < chars.len() => {
                chars.remove(self.cursor);
            }
            KeyCode::Left if self.cursor > 0 => {
                self.cursor -= 1;
                return ComposerResult::Edited;
            }
            KeyCode::Right if self.cursor < chars.len() => {
                self.cursor += 1;
                return ComposerResult::Edited;
            }
            KeyCode::Home => {
                self.cursor = 0;
                return ComposerResult::Edited;
            }
            KeyCode::End => {
                self.cursor = chars.len();
                return ComposerResult::Edited;
            }
            _ => return ComposerResult::None,
        }

        store.set_draft(chars.into_iter().collect::<String>());
        ComposerResult::Edited
    }

    /// Insert pasted text at the cursor. Line breaks become spaces since the
    /// composer is a single line.
    pub fn paste(&mut self, text: &str, store: &mut ConversationStore) {
        let mut chars: Vec<char> = store.draft().chars().collect();
        self.cursor = self.cursor.min(chars.len());
        let pasted: Vec<char> = text
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        let inserted = pasted.len();
        chars.splice(self.cursor..self.cursor, pasted);
        self.cursor += inserted;
        store.set_draft(chars.into_iter().collect::<String>());
    }
}

/// Composer input box
pub struct ComposerView<'a> {
    draft: &'a str,
    cursor: usize,
    has_focus: bool,
}

impl<'a> ComposerView<'a> {
    pub fn new(draft: &'a str, composer: &ConversationComposer, has_focus: bool) -> Self {
        Self {
            draft,
            cursor: composer.cursor(),
            has_focus,
        }
    }
}

impl Widget for ComposerView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("✏️ Message · Enter send · Ctrl+E emoji · Ctrl+C quit")
            .style(if self.has_focus {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Gray)
            });

        let inner_area = block.inner(area);
        block.render(area, buf);

        if self.draft.is_empty() {
            let placeholder_line = Line::from(Span::styled(
                PLACEHOLDER,
                Style::default().fg(Color::DarkGray),
            ));
            buf.set_line(inner_area.x, inner_area.y, &placeholder_line, inner_area.width);
            return;
        }

        let mut content: Vec<char> = self.draft.chars().collect();
        if self.has_focus {
            content.insert(self.cursor.min(content.len()), '▌');
        }

        // keep the cursor in view on long drafts
        let width = inner_area.width as usize;
        let cursor = self.cursor.min(content.len());
        let start = (cursor + 1).saturating_sub(width);
        let visible: String = content.iter().skip(start).collect();

        let line = Line::from(Span::raw(visible));
        buf.set_line(inner_area.x, inner_area.y, &line, inner_area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(composer: &mut ConversationComposer, store: &mut ConversationStore, text: &str) {
        for c in text.chars() {
            composer.handle_key(press(KeyCode::Char(c)), store);
        }
    }

    #[test]
    fn typing_updates_store_draft() {
        let mut store = ConversationStore::new();
        let mut composer = ConversationComposer::new();
        type_text(&mut composer, &mut store, "hi there");
        assert_eq!(store.draft(), "hi there");
        assert_eq!(composer.cursor(), 8);
    }

    #[test]
    fn edits_land_at_cursor_on_multibyte_text() {
        let mut store = ConversationStore::new();
        store.set_draft("a😀c");
        let mut composer = ConversationComposer::new();
        composer.move_to_end(store.draft());

        composer.handle_key(press(KeyCode::Left), &mut store);
        composer.handle_key(press(KeyCode::Backspace), &mut store);
        assert_eq!(store.draft(), "ac");

        composer.handle_key(press(KeyCode::Char('b')), &mut store);
        assert_eq!(store.draft(), "abc");

        composer.handle_key(press(KeyCode::Home), &mut store);
        composer.handle_key(press(KeyCode::Delete), &mut store);
        assert_eq!(store.draft(), "bc");
    }

    #[test]
    fn enter_requests_submit_without_editing() {
        let mut store = ConversationStore::new();
        store.set_draft("hello");
        let mut composer = ConversationComposer::new();
        assert_eq!(
            composer.handle_key(press(KeyCode::Enter), &mut store),
            ComposerResult::Submit
        );
        assert_eq!(store.draft(), "hello");

        let shift_enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT);
        assert_eq!(
            composer.handle_key(shift_enter, &mut store),
            ComposerResult::None
        );
    }

    #[test]
    fn control_chords_are_not_typed() {
        let mut store = ConversationStore::new();
        let mut composer = ConversationComposer::new();
        let ctrl_e = KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL);
        assert_eq!(composer.handle_key(ctrl_e, &mut store), ComposerResult::None);
        assert_eq!(store.draft(), "");

        let shifted = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        composer.handle_key(shifted, &mut store);
        assert_eq!(store.draft(), "A");
    }

    #[test]
    fn paste_flattens_newlines() {
        let mut store = ConversationStore::new();
        let mut composer = ConversationComposer::new();
        type_text(&mut composer, &mut store, "[]");
        composer.handle_key(press(KeyCode::Left), &mut store);
        composer.paste("a\nb", &mut store);
        assert_eq!(store.draft(), "[a b]");
        assert_eq!(composer.cursor(), 4);
    }

    #[test]
    fn cursor_clamps_after_external_change() {
        let mut store = ConversationStore::new();
        let mut composer = ConversationComposer::new();
        type_text(&mut composer, &mut store, "hello");
        store.set_draft("");
        type_text(&mut composer, &mut store, "x");
        assert_eq!(store.draft(), "x");
        assert_eq!(composer.cursor(), 1);
    }

    #[test]
    fn empty_draft_shows_placeholder() {
        let area = Rect::new(0, 0, 60, 3);
        let mut buf = Buffer::empty(area);
        ComposerView::new("", &ConversationComposer::new(), true).render(area, &mut buf);

        let row: String = (0..area.width).map(|x| buf.get(x, 1).symbol().to_string()).collect();
        assert!(row.contains(PLACEHOLDER));
    }
}
