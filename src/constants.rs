//! Application-wide constants for tuning and layout
//!
//! Centralizes magic numbers to make them discoverable.

/// How long the "Copied!" confirmation stays visible after copying, in seconds.
pub const COPY_CONFIRM_SECS: u64 = 2;

/// Status/error line display duration in seconds before auto-dismiss.
pub const STATUS_TTL_SECS: u64 = 5;

/// Input poll timeout while a draft is in flight (keeps the spinner moving).
pub const POLL_PENDING_MS: u64 = 50;

/// Input poll timeout when idle.
pub const POLL_IDLE_MS: u64 = 150;

/// Spinner animation frame duration in milliseconds.
pub const SPINNER_FRAME_MS: u128 = 80;

/// Capacity of the drafting actor's command and event channels.
pub const DRAFT_CHANNEL_CAPACITY: usize = 8;

// === Layout ===

/// Minimum height of the bullet-point editor, borders included.
pub const INPUT_MIN_HEIGHT: u16 = 6;

/// Minimum height of the drafted email panel, borders included.
pub const OUTPUT_MIN_HEIGHT: u16 = 6;

/// Height of the error panel, borders included.
pub const ERROR_PANEL_HEIGHT: u16 = 3;

/// Horizontal content padding in characters.
pub const CONTENT_PADDING_H: u16 = 1;
