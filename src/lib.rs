pub mod commands;
pub mod llm;
pub mod palette;
pub mod study;
pub mod tui;
pub mod utils;
