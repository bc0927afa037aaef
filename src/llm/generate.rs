use std::future::Future;

use async_openai::{Client, config::OpenAIConfig};

use super::error::GenerationError;
use super::response::request_single_text_response;
use crate::study::{
    Language, Level, StudyCard, StudySetRequest, SYSTEM_PROMPT, build_prompt, format_study_set,
    parse_study_cards,
};

/// The completion endpoint, seen from the generator.
pub trait CompletionBackend {
    fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> impl Future<Output = Result<String, GenerationError>>;
}

pub struct OpenAiBackend {
    client: Client<OpenAIConfig>,
}

impl OpenAiBackend {
    pub fn new(client: Client<OpenAIConfig>) -> Self {
        Self { client }
    }
}

impl CompletionBackend for OpenAiBackend {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, GenerationError> {
        request_single_text_response(&self.client, system_prompt, user_prompt).await
    }
}

/// Form values as entered, before trimming or validation.
#[derive(Clone, Debug)]
pub struct StudySetForm {
    pub role: String,
    pub level: Level,
    pub topic: String,
    pub question_count: u8,
    pub language: Language,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudySet {
    pub raw: String,
    pub cards: Vec<StudyCard>,
}

impl StudySet {
    pub fn from_reply(raw: String) -> Self {
        let cards = parse_study_cards(&raw);
        Self { raw, cards }
    }

    pub fn to_markdown(&self) -> String {
        format_study_set(&self.raw)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationOutcome {
    Ready(StudySet),
    /// Validation or API failure, already phrased for the user.
    Message(String),
}

impl GenerationOutcome {
    pub fn to_markdown(&self) -> String {
        match self {
            GenerationOutcome::Ready(study_set) => study_set.to_markdown(),
            GenerationOutcome::Message(message) => message.clone(),
        }
    }
}

pub async fn generate_study_set<B: CompletionBackend>(
    backend: &B,
    form: &StudySetForm,
) -> GenerationOutcome {
    let request = match StudySetRequest::new(
        &form.role,
        form.level,
        &form.topic,
        form.question_count,
        form.language,
    ) {
        Ok(request) => request,
        Err(err) => return GenerationOutcome::Message(err.to_string()),
    };

    let prompt = build_prompt(&request);
    tracing::info!(
        level = %request.level(),
        language = %request.language(),
        questions = request.question_count(),
        "requesting study set"
    );

    match backend.complete(SYSTEM_PROMPT, &prompt).await {
        Ok(raw) => {
            let study_set = StudySet::from_reply(raw);
            tracing::debug!(
                reply_len = study_set.raw.len(),
                cards = study_set.cards.len(),
                "formatted study set"
            );
            GenerationOutcome::Ready(study_set)
        }
        Err(err) => {
            tracing::warn!(error = ?err, "study set generation failed");
            GenerationOutcome::Message(err.user_message())
        }
    }
}
