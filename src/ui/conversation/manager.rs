use crate::dispatcher::Dispatcher;
use crate::emoji::EmojiPicker;
use crate::llm::CompletionEndpoint;
use crate::ui::conversation::{
    ComposerResult, ComposerView, ConversationComposer, ConversationHistory, EmojiPickerView,
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Lines moved per PageUp/PageDown
const SCROLL_STEP: usize = 5;

/// Actions that can be requested by the conversation manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationAction {
    None,
    Exit,
}

/// Wires keyboard input to the store and dispatcher and lays out the widgets
pub struct ConversationManager<E> {
    dispatcher: Dispatcher<E>,
    composer: ConversationComposer,
    picker: EmojiPicker,
    scroll: usize,
}

impl<E: CompletionEndpoint> ConversationManager<E> {
    pub fn new(dispatcher: Dispatcher<E>, picker_columns: usize) -> Self {
        Self {
            dispatcher,
            composer: ConversationComposer::new(),
            picker: EmojiPicker::new(picker_columns),
            scroll: 0,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher<E> {
        &self.dispatcher
    }

    /// Handle key input
    pub fn handle_key(&mut self, key: KeyEvent) -> ConversationAction {
        if key.kind != KeyEventKind::Press {
            return ConversationAction::None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => return ConversationAction::Exit,
            KeyCode::Char('e') if ctrl => {
                self.dispatcher.store().lock().toggle_picker();
                return ConversationAction::None;
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_add(SCROLL_STEP);
                return ConversationAction::None;
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_sub(SCROLL_STEP);
                return ConversationAction::None;
            }
            _ => {}
        }

        // the picker claims navigation keys only; typing and Enter stay with the composer
        let picker_open = self.dispatcher.store().lock().picker_visible();
        if picker_open && self.handle_picker_key(key) {
            return ConversationAction::None;
        }

        let result = {
            let mut store = self.dispatcher.store().lock();
            self.composer.handle_key(key, &mut store)
        };

        if result == ComposerResult::Submit && self.dispatcher.submit_draft().is_some() {
            debug!("draft submitted");
            self.composer = ConversationComposer::new();
            self.scroll = 0;
        }

        ConversationAction::None
    }

    /// Insert pasted text into the draft
    pub fn handle_paste(&mut self, text: &str) {
        let mut store = self.dispatcher.store().lock();
        self.composer.paste(text, &mut store);
    }

    /// Returns whether the picker consumed the key
    fn handle_picker_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => self.dispatcher.store().lock().close_picker(),
            KeyCode::Left => self.picker.left(),
            KeyCode::Right => self.picker.right(),
            KeyCode::Up => self.picker.up(),
            KeyCode::Down => self.picker.down(),
            KeyCode::Tab => {
                let mut store = self.dispatcher.store().lock();
                store.append_emoji(self.picker.selected());
                self.composer.move_to_end(store.draft());
            }
            _ => return false,
        }
        true
    }

    /// Render the conversation UI components
    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),    // History
                Constraint::Length(1), // Activity
                Constraint::Length(3), // Composer
            ])
            .split(area);

        let store = self.dispatcher.store().lock();
        ConversationHistory::new(store.messages())
            .scroll(self.scroll)
            .render(chunks[0], buf);

        self.render_activity(chunks[1], buf);

        let picker_open = store.picker_visible();
        ComposerView::new(store.draft(), &self.composer, true).render(chunks[2], buf);

        if picker_open {
            let view = EmojiPickerView::new(&self.picker);
            let (width, height) = view.size();
            let height = height.min(chunks[0].height);
            let popup = Rect {
                x: chunks[2].x,
                y: chunks[2].y.saturating_sub(height),
                width: width.min(chunks[2].width),
                height,
            };
            view.render(popup, buf);
        }
    }

    fn render_activity(&self, area: Rect, buf: &mut Buffer) {
        let pending = self.dispatcher.pending();
        if pending == 0 {
            return;
        }

        let dots = match (SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis()
            / 300)
            % 4
        {
            0 => ".",
            1 => "..",
            2 => "...",
            _ => "   ",
        };

        let label = if pending == 1 {
            "waiting for a reply".to_string()
        } else {
            format!("waiting for {pending} replies")
        };

        let indicator = Line::from(vec![
            Span::styled("🤖 ", Style::default().fg(Color::Green)),
            Span::styled(label, Style::default().fg(Color::Green)),
            Span::styled(dots, Style::default().fg(Color::Yellow)),
        ]);
        buf.set_line(area.x, area.y, &indicator, area.width);
    }
}
