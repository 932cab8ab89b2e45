//! Status board: terminal and plain-text renderings of per-slot probe status

pub mod board;
mod plain;
mod terminal;

pub use board::{StatusBoard, StatusLine, DONE_MARKER, RUNNING_MESSAGE};
pub use plain::PlainBoard;
pub use terminal::{render_line, TerminalBoard};
