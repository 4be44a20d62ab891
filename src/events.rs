use crate::store::StoreEvent;

/// Events driving the terminal loop
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Key press event
    Key(crossterm::event::KeyEvent),

    /// Paste event
    Paste(String),

    /// Terminal resize
    Resize(u16, u16),

    /// The conversation store changed and the screen is stale
    Redraw(StoreEvent),

    /// Periodic tick for the activity indicator
    Tick,
}
