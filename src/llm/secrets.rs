use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::utils::{get_data_dir, strip_controls_and_escapes, trim_line};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

const AUTH_FILE_NAME: &str = "auth.json";
const OPENAI_PROVIDER: &str = "openai";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySource {
    Environment,
    AuthFile,
}

impl ApiKeySource {
    pub fn description(&self) -> &'static str {
        match self {
            ApiKeySource::Environment => "environment",
            ApiKeySource::AuthFile => "local auth file",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey {
    pub key: String,
    pub source: ApiKeySource,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct AuthFile {
    #[serde(flatten)]
    providers: HashMap<String, ProviderAuth>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProviderAuth {
    key: String,
}

/// Loads `.env` from the working directory. Variables that are already set
/// in the process environment are left untouched.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env file"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(error = %err, "ignoring unreadable .env file"),
    }
}

/// Environment first, then the local auth file.
pub fn resolve_api_key() -> Result<Option<ApiKey>> {
    let from_env = env::var(API_KEY_ENV).ok();
    lookup_api_key(from_env.as_deref(), &auth_file_path()?)
}

pub fn store_api_key(api_key: &str) -> Result<()> {
    store_api_key_at(&auth_file_path()?, api_key)
}

pub fn clear_api_key() -> Result<bool> {
    clear_api_key_at(&auth_file_path()?)
}

fn lookup_api_key(from_env: Option<&str>, auth_path: &Path) -> Result<Option<ApiKey>> {
    if let Some(key) = from_env.and_then(trim_line) {
        return Ok(Some(ApiKey {
            key: key.to_string(),
            source: ApiKeySource::Environment,
        }));
    }

    let Some(auth) = read_auth_file(auth_path)? else {
        return Ok(None);
    };

    Ok(auth
        .providers
        .get(OPENAI_PROVIDER)
        .and_then(|entry| trim_line(&entry.key))
        .map(|key| ApiKey {
            key: key.to_string(),
            source: ApiKeySource::AuthFile,
        }))
}

fn store_api_key_at(auth_path: &Path, api_key: &str) -> Result<()> {
    let cleaned = strip_controls_and_escapes(api_key);
    let trimmed = trim_line(&cleaned).with_context(|| "Cannot store an empty API key")?;

    let mut auth = read_auth_file(auth_path)?.unwrap_or_default();
    auth.providers.insert(
        OPENAI_PROVIDER.to_string(),
        ProviderAuth {
            key: trimmed.to_string(),
        },
    );

    write_auth_file(auth_path, &auth)
}

fn clear_api_key_at(auth_path: &Path) -> Result<bool> {
    let Some(mut auth) = read_auth_file(auth_path)? else {
        return Ok(false);
    };

    if auth.providers.remove(OPENAI_PROVIDER).is_none() {
        return Ok(false);
    }

    if auth.providers.is_empty() {
        fs::remove_file(auth_path).with_context(|| {
            format!(
                "Failed to remove empty auth file at {}",
                auth_path.display()
            )
        })?;
        return Ok(true);
    }

    write_auth_file(auth_path, &auth)?;
    Ok(true)
}

fn auth_file_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join(AUTH_FILE_NAME))
}

fn read_auth_file(path: &Path) -> Result<Option<AuthFile>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(parse_auth_contents(&contents, path)?)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => {
            Err(err).with_context(|| format!("Failed to read auth file at {}", path.display()))
        }
    }
}

fn write_auth_file(path: &Path, value: &AuthFile) -> Result<()> {
    let contents = format!("{}\n", serde_json::to_string_pretty(value)?);
    fs::write(path, contents)
        .with_context(|| format!("Failed to write auth file at {}", path.display()))?;
    Ok(())
}

fn parse_auth_contents(contents: &str, path: &Path) -> Result<AuthFile> {
    if contents.trim().is_empty() {
        return Ok(AuthFile::default());
    }

    serde_json::from_str(contents)
        .with_context(|| format!("Failed to parse auth file at {}", path.display()))
}
