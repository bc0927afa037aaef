use async_openai::{
    Client,
    config::OpenAIConfig,
    types::responses::{
        CreateResponseArgs, InputMessage, InputRole, OutputItem, OutputMessageContent,
    },
};

use super::error::GenerationError;

pub const STUDY_SET_MODEL: &str = "gpt-4.1-mini";
pub const TEMPERATURE: f32 = 0.4;
// cost control
pub const MAX_OUTPUT_TOKENS: u32 = 650;

/// Sends one system + user exchange and returns the first non-empty text
/// output, trimmed. A reply without text yields an empty string.
pub async fn request_single_text_response(
    client: &Client<OpenAIConfig>,
    system_prompt: &str,
    user_prompt: &str,
) -> Result<String, GenerationError> {
    let request = CreateResponseArgs::default()
        .model(STUDY_SET_MODEL)
        .temperature(TEMPERATURE)
        .max_output_tokens(MAX_OUTPUT_TOKENS)
        .input(vec![
            InputMessage {
                role: InputRole::System,
                content: vec![system_prompt.into()],
                status: None,
            },
            InputMessage {
                role: InputRole::User,
                content: vec![user_prompt.into()],
                status: None,
            },
        ])
        .build()?;

    let response = client.responses().create(request).await?;

    for item in response.output {
        if let OutputItem::Message(message) = item {
            for content in message.content {
                if let OutputMessageContent::OutputText(text) = content {
                    let trimmed = text.text.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    return Ok(trimmed.to_string());
                }
            }
        }
    }

    tracing::debug!("model returned no text output");
    Ok(String::new())
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::{SocketAddr, TcpListener, TcpStream};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::llm::client::build_client;

    const RATE_LIMITED_BODY: &str = r#"{"error":{"message":"Rate limit reached","type":"requests","param":null,"code":"rate_limit_exceeded"}}"#;

    fn drain_request(stream: &mut TcpStream) -> std::io::Result<()> {
        let mut reader = BufReader::new(stream.try_clone()?);
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 || line == "\r\n" {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
        }
        let mut body = vec![0; content_length];
        reader.read_exact(&mut body)
    }

    /// Answers every request with a 429 and counts how many arrived.
    fn rate_limited_server() -> (SocketAddr, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                counter.fetch_add(1, Ordering::SeqCst);
                if drain_request(&mut stream).is_err() {
                    continue;
                }
                let reply = format!(
                    "HTTP/1.1 429 Too Many Requests\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    RATE_LIMITED_BODY.len(),
                    RATE_LIMITED_BODY
                );
                let _ = stream.write_all(reply.as_bytes());
            }
        });

        (addr, hits)
    }

    #[test]
    fn rate_limit_is_reported_after_a_single_attempt() {
        let (addr, hits) = rate_limited_server();
        let client = build_client(
            OpenAIConfig::new()
                .with_api_key("sk-test")
                .with_api_base(format!("http://{addr}/v1")),
        );

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let result = runtime.block_on(async {
            tokio::time::timeout(
                Duration::from_secs(5),
                request_single_text_response(&client, "system", "user"),
            )
            .await
        });

        let result = result.expect("request should not be retried until timeout");
        assert!(matches!(result, Err(GenerationError::QuotaExceeded)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
