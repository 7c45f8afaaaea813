// ABOUTME: TUI widget sub-modules for the chat log, home list, and status bar.
// ABOUTME: Each widget is a pure rendering function over plain state.

pub mod chat;
pub mod home;
pub mod status;
