//! Conversation history display component

use crate::message::{ChatRole, Message};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget},
};

/// Scrollable list of messages, newest at the bottom
pub struct ConversationHistory<'a> {
    messages: &'a [Message],
    /// Lines scrolled up from the bottom
    scroll: usize,
}

impl<'a> ConversationHistory<'a> {
    pub fn new(messages: &'a [Message]) -> Self {
        Self { messages, scroll: 0 }
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    /// All display lines for the history at the given width
    pub fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let mut all_lines = Vec::new();
        for message in self.messages {
            all_lines.extend(render_message(message, width));
            all_lines.push(Line::from(""));
        }
        all_lines
    }
}

impl Widget for ConversationHistory<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("💬 Conversation");

        let inner_area = block.inner(area);
        block.render(area, buf);

        if self.messages.is_empty() {
            let welcome_lines = [
                Line::from(Span::styled(
                    "Waiting for the world builder...",
                    Style::default().fg(Color::Green),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Describe a location below and press Enter.",
                    Style::default().fg(Color::Gray),
                )),
            ];

            for (i, line) in welcome_lines.iter().enumerate() {
                if i < inner_area.height as usize {
                    buf.set_line(inner_area.x, inner_area.y + i as u16, line, inner_area.width);
                }
            }
            return;
        }

        let all_lines = self.lines(inner_area.width.saturating_sub(1));
        let height = inner_area.height as usize;
        let total = all_lines.len();
        let max_scroll = total.saturating_sub(height);
        let scroll = self.scroll.min(max_scroll);
        let start = max_scroll - scroll;

        for (i, line) in all_lines.iter().skip(start).take(height).enumerate() {
            buf.set_line(inner_area.x, inner_area.y + i as u16, line, inner_area.width);
        }

        if total > height {
            let mut state = ScrollbarState::new(max_scroll).position(start);
            Scrollbar::default()
                .orientation(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"))
                .render(area, buf, &mut state);
        }
    }
}

/// Render a single message into lines
fn render_message(message: &Message, width: u16) -> Vec<Line<'static>> {
    let (icon, label) = match message.role {
        ChatRole::User => ("👤", "you"),
        ChatRole::System => ("🤖", "world builder"),
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("{icon} {label} "),
            role_style(message.role).add_modifier(Modifier::BOLD),
        ),
        Span::styled("─".repeat(12), Style::default().fg(Color::DarkGray)),
    ])];

    for content_line in wrap_text(&message.display_text(), width.saturating_sub(2) as usize) {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(content_line, role_style(message.role)),
        ]));
    }

    lines
}

fn role_style(role: ChatRole) -> Style {
    match role {
        ChatRole::User => Style::default().fg(Color::Cyan),
        ChatRole::System => Style::default().fg(Color::Yellow),
    }
}

/// Wrap text to `width` columns, keeping explicit line breaks
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return text.lines().map(str::to_string).collect();
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let indent: String = paragraph.chars().take_while(|c| *c == ' ').collect();
        let mut current_line = indent.clone();
        let mut current_len = indent.chars().count();

        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            let has_words = current_len > indent.chars().count();
            if has_words && current_len + 1 + word_len > width {
                lines.push(std::mem::replace(&mut current_line, indent.clone()));
                current_len = indent.chars().count();
            }
            if current_len > indent.chars().count() {
                current_line.push(' ');
                current_len += 1;
            }
            current_line.push_str(word);
            current_len += word_len;
        }

        lines.push(current_line);
    }

    lines
}
