//! OpenAI-compatible chat completions client
//!
//! Endpoint: POST {base_url}/chat/completions, non-streaming.
//! Works against hosted OpenAI and against Ollama's `/v1` surface.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CACHE_CONTROL};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GenerationConfig;
use crate::errors::{ReportError, Result};
use crate::generation::{GenerationRequest, Generator, StageRole};

/// Chat completions client configured for one model
#[derive(Debug, Clone)]
pub struct ChatCompletionClient {
    client: Client,
    config: GenerationConfig,
    api_key: Option<String>,
}

impl ChatCompletionClient {
    /// Create client with an explicit API key (`None` for keyless local servers)
    pub fn new(config: GenerationConfig, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ReportError::HttpError)?;

        Ok(Self {
            client,
            config,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    /// Create client reading the API key from `config.api_key_env`
    pub fn from_env(config: GenerationConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).ok();
        Self::new(config, api_key)
    }

    fn api_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn build_request(&self, request: &GenerationRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.role.system_message().to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.prompt.clone(),
                },
            ],
            temperature: self.config.temperature,
            stream: false,
        }
    }

    fn transport_error(&self, stage: StageRole, err: reqwest::Error) -> ReportError {
        if err.is_timeout() {
            ReportError::GenerationTimeout {
                stage,
                timeout_secs: self.config.timeout_secs,
            }
        } else {
            ReportError::GenerationServiceError {
                stage,
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl Generator for ChatCompletionClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        let stage = request.role;
        let body = self.build_request(&request);

        debug!(%stage, model = %self.config.model, prompt_chars = request.prompt.len(), "Sending generation request");

        let mut http = self.client.post(self.api_url()).json(&body);
        if let Some(key) = &self.api_key {
            http = http.header(AUTHORIZATION, format!("Bearer {}", key));
        }
        if self.config.disable_cache {
            http = http.header(CACHE_CONTROL, "no-store");
        }

        let response = http
            .send()
            .await
            .map_err(|e| self.transport_error(stage, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ReportError::GenerationServiceError {
                stage,
                message: format!("HTTP {}: {}", status, error_text),
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| self.transport_error(stage, e))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ReportError::GenerationServiceError {
                stage,
                message: "Response contained no completion".to_string(),
            })
    }
}

/// Chat completions request body
#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use serde_json::json;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    fn local_config(base_url: String, timeout_secs: u64) -> GenerationConfig {
        GenerationConfig {
            base_url,
            model: "test-model".to_string(),
            temperature: 0.7,
            timeout_secs,
            disable_cache: true,
            api_key_env: "REPORTBUDDY_TEST_KEY".to_string(),
        }
    }

    /// Read one HTTP request (headers + Content-Length body)
    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let lower = line.to_ascii_lowercase();
                        lower
                            .strip_prefix("content-length:")
                            .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Serve one canned response and hand back the raw request
    async fn serve_once(status: &'static str, body: String) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.flush().await.unwrap();
            request
        });
        (format!("http://{}", addr), handle)
    }

    #[test]
    fn test_request_body_shape() {
        let client = ChatCompletionClient::new(local_config("http://x/v1/".to_string(), 5), None).unwrap();
        let body = client.build_request(&GenerationRequest::new(StageRole::Writer, "Write it"));
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(client.api_url(), "http://x/v1/chat/completions");
        assert_eq!(value["model"], json!("test-model"));
        assert_eq!(value["stream"], json!(false));
        assert_eq!(value["messages"][0]["role"], json!("system"));
        assert_eq!(value["messages"][0]["content"], json!(StageRole::Writer.system_message()));
        assert_eq!(value["messages"][1], json!({"role": "user", "content": "Write it"}));
        assert_eq!(value["messages"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_blank_api_key_is_dropped() {
        let client = ChatCompletionClient::new(local_config("http://x".to_string(), 5), Some("  ".to_string())).unwrap();
        assert!(client.api_key.is_none());
    }

    #[tokio::test]
    async fn test_successful_completion() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "Revenue grew 12%."}}]}).to_string();
        let (base_url, server) = serve_once("200 OK", body).await;

        let client = ChatCompletionClient::new(local_config(base_url, 5), Some("sk-test".to_string())).unwrap();
        let text = client
            .generate(GenerationRequest::new(StageRole::Analyst, "Analyze"))
            .await
            .unwrap();
        assert_eq!(text, "Revenue grew 12%.");

        let request = server.await.unwrap().to_ascii_lowercase();
        assert!(request.starts_with("post /chat/completions"));
        assert!(request.contains("authorization: bearer sk-test"));
        assert!(request.contains("cache-control: no-store"));
    }

    #[tokio::test]
    async fn test_http_error_is_service_error() {
        let (base_url, _server) = serve_once("500 Internal Server Error", "{\"error\":\"overloaded\"}".to_string()).await;

        let client = ChatCompletionClient::new(local_config(base_url, 5), None).unwrap();
        let err = client
            .generate(GenerationRequest::new(StageRole::Writer, "Write"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::GenerationServiceError);
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("writer"));
    }

    #[tokio::test]
    async fn test_empty_choices_is_service_error() {
        let (base_url, _server) = serve_once("200 OK", "{\"choices\":[]}".to_string()).await;

        let client = ChatCompletionClient::new(local_config(base_url, 5), None).unwrap();
        let err = client
            .generate(GenerationRequest::new(StageRole::Analyst, "Analyze"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GenerationServiceError);
    }

    #[tokio::test]
    async fn test_slow_service_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let _ = read_request(&mut stream).await;
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let client = ChatCompletionClient::new(local_config(format!("http://{}", addr), 1), None).unwrap();
        let err = client
            .generate(GenerationRequest::new(StageRole::Analyst, "Analyze"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::GenerationTimeout);
        assert!(err.to_string().contains("analyst"));
    }
}
