//! Emoji catalogue and picker selection state

use once_cell::sync::Lazy;

/// A named group of emoji shown together in the picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmojiCategory {
    pub name: &'static str,
    pub symbols: &'static [&'static str],
}

pub const CATEGORIES: &[EmojiCategory] = &[
    EmojiCategory {
        name: "Smileys",
        symbols: &[
            "😀", "😃", "😄", "😁", "😆", "😅", "😂", "🙂", "😉", "😊", "😍", "😎", "🤔", "😐",
            "😴", "😮", "😢", "😭", "😡", "🤯",
        ],
    },
    EmojiCategory {
        name: "Gestures",
        symbols: &["👍", "👎", "👏", "🙌", "🙏", "👋", "✌️", "🤞", "💪", "👀"],
    },
    EmojiCategory {
        name: "Nature",
        symbols: &[
            "🌲", "🌳", "🌴", "🌵", "🌿", "🍄", "🌸", "🌊", "⛰️", "🏔️", "🌋", "🏝️", "🌙", "☀️",
            "⛅", "❄️",
        ],
    },
    EmojiCategory {
        name: "Places",
        symbols: &["🏠", "🏰", "🏯", "⛪", "🏛️", "🗼", "🌉", "🛤️", "🏕️", "⛺", "🗺️", "🧭"],
    },
    EmojiCategory {
        name: "Objects",
        symbols: &[
            "🪑", "🛏️", "🚪", "🪟", "🕯️", "💡", "🔥", "⚔️", "🛡️", "🏹", "🗝️", "💎", "📦", "🪨",
            "🪵",
        ],
    },
    EmojiCategory {
        name: "Symbols",
        symbols: &["❤️", "⭐", "✨", "✅", "❌", "❓", "❗", "💯"],
    },
];

static ALL_SYMBOLS: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    CATEGORIES
        .iter()
        .flat_map(|category| category.symbols.iter().map(move |symbol| (*symbol, category.name)))
        .collect()
});

/// Every symbol in catalogue order
pub fn all_symbols() -> impl Iterator<Item = &'static str> {
    ALL_SYMBOLS.iter().map(|(symbol, _)| *symbol)
}

/// Widest grid the picker lays out
pub const MAX_COLUMNS: usize = 64;

/// Cursor over the catalogue laid out as a grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiPicker {
    selected: usize,
    columns: usize,
}

impl EmojiPicker {
    pub fn new(columns: usize) -> Self {
        Self {
            selected: 0,
            columns: columns.clamp(1, MAX_COLUMNS),
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn len(&self) -> usize {
        ALL_SYMBOLS.len()
    }

    pub fn is_empty(&self) -> bool {
        ALL_SYMBOLS.is_empty()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Symbol under the cursor
    pub fn selected(&self) -> Option<&'static str> {
        ALL_SYMBOLS.get(self.selected).map(|(symbol, _)| *symbol)
    }

    /// Category of the symbol under the cursor
    pub fn selected_category(&self) -> Option<&'static str> {
        ALL_SYMBOLS.get(self.selected).map(|(_, category)| *category)
    }

    /// Move horizontally, wrapping around the ends of the catalogue
    pub fn move_by(&mut self, delta: isize) {
        let len = self.len() as isize;
        if len == 0 {
            return;
        }
        self.selected = (self.selected as isize + delta).rem_euclid(len) as usize;
    }

    pub fn left(&mut self) {
        self.move_by(-1);
    }

    pub fn right(&mut self) {
        self.move_by(1);
    }

    /// Move one row up, staying put on the first row
    pub fn up(&mut self) {
        if self.selected >= self.columns {
            self.selected -= self.columns;
        }
    }

    /// Move one row down, staying put on the last row
    pub fn down(&mut self) {
        if self.selected + self.columns < self.len() {
            self.selected += self.columns;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_is_flattened_in_order() {
        let symbols: Vec<_> = all_symbols().collect();
        let expected: usize = CATEGORIES.iter().map(|c| c.symbols.len()).sum();
        assert_eq!(symbols.len(), expected);
        assert_eq!(symbols[0], "😀");
        assert!(symbols.iter().all(|symbol| !symbol.is_empty()));
    }

    #[test]
    fn horizontal_moves_wrap() {
        let mut picker = EmojiPicker::new(8);
        picker.left();
        assert_eq!(picker.selected_index(), picker.len() - 1);
        picker.right();
        assert_eq!(picker.selected_index(), 0);
        assert_eq!(picker.selected(), Some("😀"));
        assert_eq!(picker.selected_category(), Some("Smileys"));
    }

    #[test]
    fn vertical_moves_stay_on_grid() {
        let mut picker = EmojiPicker::new(8);
        picker.up();
        assert_eq!(picker.selected_index(), 0);

        picker.down();
        assert_eq!(picker.selected_index(), 8);

        for _ in 0..picker.len() {
            picker.down();
        }
        assert!(picker.selected_index() + picker.columns() >= picker.len());
        assert!(picker.selected().is_some());
    }

    #[test]
    fn zero_columns_clamps_to_one() {
        let mut picker = EmojiPicker::new(0);
        picker.down();
        assert_eq!(picker.columns(), 1);
        assert_eq!(picker.selected_index(), 1);
    }

    #[test]
    fn oversized_columns_clamp_to_max() {
        let mut picker = EmojiPicker::new(usize::MAX);
        assert_eq!(picker.columns(), MAX_COLUMNS);
        picker.down();
        assert_eq!(picker.selected_index(), MAX_COLUMNS);
    }
}
