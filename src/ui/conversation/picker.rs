use crate::emoji::{EmojiPicker, all_symbols};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

/// Columns each emoji cell occupies
const CELL_WIDTH: u16 = 4;

/// Emoji grid drawn above the composer
pub struct EmojiPickerView<'a> {
    picker: &'a EmojiPicker,
}

impl<'a> EmojiPickerView<'a> {
    pub fn new(picker: &'a EmojiPicker) -> Self {
        Self { picker }
    }

    /// Size of the popup including borders
    pub fn size(&self) -> (u16, u16) {
        let columns = u16::try_from(self.picker.columns()).unwrap_or(u16::MAX);
        let rows = u16::try_from(self.picker.len().div_ceil(self.picker.columns())).unwrap_or(u16::MAX);
        (
            columns.saturating_mul(CELL_WIDTH).saturating_add(2),
            rows.saturating_add(2),
        )
    }
}

impl Widget for EmojiPickerView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let title = format!(
            "Emoji · {} · Tab insert · Esc close",
            self.picker.selected_category().unwrap_or("")
        );
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(Style::default().fg(Color::Blue));
        let inner = block.inner(area);
        block.render(area, buf);

        let columns = self.picker.columns();
        let selected = self.picker.selected_index();
        let symbols: Vec<&str> = all_symbols().collect();

        // keep the selected row visible when the popup is clipped
        let visible_rows = inner.height as usize;
        let selected_row = selected / columns;
        let first_row = (selected_row + 1).saturating_sub(visible_rows);

        for (row, chunk) in symbols.chunks(columns).enumerate().skip(first_row).take(visible_rows) {
            let spans: Vec<Span> = chunk
                .iter()
                .enumerate()
                .map(|(column, symbol)| {
                    let index = row * columns + column;
                    let style = if index == selected {
                        Style::default()
                            .bg(Color::Cyan)
                            .fg(Color::Black)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    Span::styled(format!(" {symbol} "), style)
                })
                .collect();

            let y = inner.y + (row - first_row) as u16;
            buf.set_line(inner.x, y, &Line::from(spans), inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emoji::MAX_COLUMNS;

    #[test]
    fn size_fits_whole_catalogue() {
        let picker = EmojiPicker::new(8);
        let (width, height) = EmojiPickerView::new(&picker).size();
        assert_eq!(width, 8 * CELL_WIDTH + 2);
        assert_eq!(height as usize, picker.len().div_ceil(8) + 2);
    }

    #[test]
    fn widest_grid_size_does_not_overflow() {
        let picker = EmojiPicker::new(usize::MAX);
        let (width, height) = EmojiPickerView::new(&picker).size();
        assert_eq!(width, MAX_COLUMNS as u16 * CELL_WIDTH + 2);
        assert_eq!(height, 2 + picker.len().div_ceil(MAX_COLUMNS) as u16);

        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        EmojiPickerView::new(&picker).render(area, &mut buf);
    }

    #[test]
    fn title_names_selected_category() {
        let mut picker = EmojiPicker::new(8);
        picker.left();
        let area = Rect::new(0, 0, 60, 5);
        let mut buf = Buffer::empty(area);
        EmojiPickerView::new(&picker).render(area, &mut buf);

        let top: String = (0..area.width).map(|x| buf.get(x, 0).symbol().to_string()).collect();
        assert!(top.contains("Symbols"));
    }
}
