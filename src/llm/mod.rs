pub mod client;
pub mod error;
pub mod generate;
pub mod response;
pub mod secrets;

pub use client::{ensure_client, test_configured_api_key};
pub use error::GenerationError;
pub use generate::{
    CompletionBackend, GenerationOutcome, OpenAiBackend, StudySet, StudySetForm,
    generate_study_set,
};
pub use secrets::{clear_api_key, load_dotenv, store_api_key};
