use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_openai::{Client, config::OpenAIConfig};
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};

use super::secrets::{API_KEY_ENV, ApiKey, ApiKeySource, resolve_api_key};

fn missing_key_error() -> anyhow::Error {
    anyhow!(
        "Missing {}. Put it in your .env file or run `studyset llm --set <KEY>`.",
        API_KEY_ENV
    )
}

fn require_api_key() -> Result<ApiKey> {
    resolve_api_key()?.ok_or_else(missing_key_error)
}

/// Builds the API client, failing when no credential is configured.
pub fn ensure_client() -> Result<Client<OpenAIConfig>> {
    let api_key = require_api_key()?;
    tracing::debug!(source = api_key.source.description(), "using OpenAI API key");
    Ok(initialize_client(&api_key.key))
}

pub async fn test_configured_api_key() -> Result<ApiKeySource> {
    let api_key = require_api_key()?;
    let client = initialize_client(&api_key.key);
    healthcheck_client(&client).await?;
    Ok(api_key.source)
}

fn initialize_client(api_key: &str) -> Client<OpenAIConfig> {
    build_client(OpenAIConfig::new().with_api_key(api_key))
}

/// A client that gives up after the first failed attempt. Rate limits and
/// server errors surface to the user instead of being retried.
pub(crate) fn build_client(config: OpenAIConfig) -> Client<OpenAIConfig> {
    Client::with_config(config).with_backoff(single_attempt())
}

fn single_attempt() -> ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

async fn healthcheck_client(client: &Client<OpenAIConfig>) -> Result<()> {
    client
        .models()
        .list()
        .await
        .context("Failed to validate API key with OpenAI")?;
    Ok(())
}
