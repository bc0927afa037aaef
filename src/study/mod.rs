pub mod format;
pub mod prompt;
pub mod request;

pub use format::{StudyCard, format_study_set, parse_study_cards, render_cards};
pub use prompt::{SYSTEM_PROMPT, build_prompt};
pub use request::{INPUT_REQUIRED_MESSAGE, Language, Level, StudySetRequest};
