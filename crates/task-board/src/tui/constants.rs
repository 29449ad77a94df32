//! Shared constants for the TUI to keep layout and timing in sync.

/// Interval in milliseconds between UI ticks/redraws.
pub const TUI_TICK_RATE_MS: u64 = 200;
/// Time-to-live in seconds for transient status messages.
pub const UI_MESSAGE_TTL_SECS: u64 = 5;
/// Height of the search/filter bar including borders.
pub const FILTER_BAR_HEIGHT: u16 = 3;
/// Height of the key help and status rows including borders.
pub const FOOTER_HEIGHT: u16 = 3;
/// Height of a single card including borders.
pub const CARD_HEIGHT: u16 = 5;
/// Marker drawn in front of the title of the card being dragged.
pub const DRAG_MARKER: &str = "✥ ";
/// Placeholder shown in a column without cards.
pub const EMPTY_COLUMN_TEXT: &str = "No tasks";
