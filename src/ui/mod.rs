//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the *core* data structures and turns them into cells on
//! the terminal.  No file I/O happens here.

pub mod actions;
pub mod carousel;
pub mod history;
pub mod layout;
pub mod popup;
pub mod smooth_scroll;
pub mod theme;
