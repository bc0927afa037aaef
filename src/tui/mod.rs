pub mod markdown;
pub mod theme;
pub mod viewer;

pub use markdown::render_markdown;
pub use theme::Theme;
pub use viewer::run_viewer;
