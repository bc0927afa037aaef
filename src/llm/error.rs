use async_openai::error::OpenAIError;
use thiserror::Error;

const QUOTA_CODES: [&str; 2] = ["insufficient_quota", "rate_limit_exceeded"];
const AUTH_CODES: [&str; 4] = [
    "invalid_api_key",
    "authentication_error",
    "invalid_organization",
    "invalid_issuer",
];

/// Failures of the completion call that are reported back to the user as a
/// fixed message. Every generation ends in either a study set or one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("quota exceeded")]
    QuotaExceeded,
    #[error("authentication failed")]
    AuthenticationFailure,
    #[error("could not reach the API")]
    ConnectivityFailure,
    #[error("request rejected: {0}")]
    RequestRejected(String),
}

impl GenerationError {
    pub fn user_message(&self) -> String {
        match self {
            GenerationError::QuotaExceeded => {
                "API quota exceeded (429). Check billing/quota.".to_string()
            }
            GenerationError::AuthenticationFailure => {
                "Invalid API key. Check OPENAI_API_KEY.".to_string()
            }
            GenerationError::ConnectivityFailure => "Network error. Try again.".to_string(),
            GenerationError::RequestRejected(detail) => format!("Request error: {detail}"),
        }
    }

    fn from_api_error(code: Option<&str>, kind: Option<&str>, message: &str) -> Self {
        let matches_any = |codes: &[&str]| {
            [code, kind]
                .into_iter()
                .flatten()
                .any(|value| codes.contains(&value))
        };

        if matches_any(&QUOTA_CODES) {
            GenerationError::QuotaExceeded
        } else if matches_any(&AUTH_CODES) || message.contains("Incorrect API key") {
            GenerationError::AuthenticationFailure
        } else {
            GenerationError::RequestRejected(message.to_string())
        }
    }

    fn from_status(status: Option<u16>, is_transport: bool, detail: String) -> Self {
        match status {
            Some(429) => GenerationError::QuotaExceeded,
            Some(401) => GenerationError::AuthenticationFailure,
            _ if is_transport => GenerationError::ConnectivityFailure,
            _ => GenerationError::RequestRejected(detail),
        }
    }
}

impl From<OpenAIError> for GenerationError {
    fn from(err: OpenAIError) -> Self {
        match err {
            OpenAIError::ApiError(api) => GenerationError::from_api_error(
                api.code.as_deref(),
                api.r#type.as_deref(),
                &api.message,
            ),
            OpenAIError::Reqwest(err) => GenerationError::from_status(
                err.status().map(|status| status.as_u16()),
                err.is_connect() || err.is_timeout() || err.is_request(),
                err.to_string(),
            ),
            other => GenerationError::RequestRejected(other.to_string()),
        }
    }
}
