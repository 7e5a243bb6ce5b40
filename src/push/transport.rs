use crate::config::UpstreamConfig;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UpstreamData {
    pub media_command: String,
}

/// Wire form of an upstream command.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UpstreamMessage {
    pub to: String,
    pub message_id: String,
    pub time_to_live: u32,
    pub data: UpstreamData,
}

#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn send(&self, message: &UpstreamMessage) -> AppResult<()>;
}

pub struct HttpPushTransport {
    http: reqwest::Client,
    endpoint: String,
    server_key: Option<String>,
}

impl HttpPushTransport {
    pub fn new(config: &UpstreamConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent("MediaGateway/0.1.0")
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            server_key: config.server_key.clone(),
        })
    }

    fn headers(&self) -> AppResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(key) = &self.server_key {
            let auth_value = format!("key={}", key);
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth_value).map_err(|e| AppError::Config(e.to_string()))?,
            );
        }

        Ok(headers)
    }

    async fn check_response(&self, response: reqwest::Response) -> AppResult<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            Err(AppError::Push {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl PushTransport for HttpPushTransport {
    async fn send(&self, message: &UpstreamMessage) -> AppResult<()> {
        let headers = self.headers()?;
        let response = self
            .http
            .post(&self.endpoint)
            .headers(headers)
            .json(message)
            .send()
            .await?;
        self.check_response(response).await
    }
}
