use std::time::Duration;

use tabmark_core::{convert_text, RenderOptions};
use tabmark_logging::{tabmark_debug, tabmark_warn};

use crate::wire::{ConvertRequest, ConvertResponse};
use crate::{ConvertError, FailureKind};

/// Turns pasted `url | title` text into Markdown.
#[async_trait::async_trait]
pub trait Converter: Send + Sync {
    async fn convert(&self, text: &str) -> Result<String, ConvertError>;
}

/// Renders in-process with fixed options.
#[derive(Debug, Clone, Default)]
pub struct LocalConverter {
    options: RenderOptions,
}

impl LocalConverter {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Synchronous form used by the HTTP handler and one-shot commands.
    pub fn convert_now(&self, text: &str) -> String {
        let conversion = convert_text(text, &self.options);
        for line in &conversion.rejected {
            tabmark_warn!(
                "Skipping line {} ({}): {:?}",
                line.line_number,
                line.reason,
                line.text
            );
        }
        conversion.markdown
    }
}

#[async_trait::async_trait]
impl Converter for LocalConverter {
    async fn convert(&self, text: &str) -> Result<String, ConvertError> {
        Ok(self.convert_now(text))
    }
}

#[derive(Debug, Clone)]
pub struct RemoteSettings {
    /// Full url of the `/convert` endpoint.
    pub endpoint: String,
    /// `None` waits for as long as the server takes.
    pub request_timeout: Option<Duration>,
}

impl RemoteSettings {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            request_timeout: None,
        }
    }
}

/// Posts `{"text": ...}` to a `/convert` endpoint and reads back
/// `{"markdownText": ...}`. One attempt per call, no retries.
#[derive(Debug, Clone)]
pub struct RemoteConverter {
    endpoint: reqwest::Url,
    client: reqwest::Client,
}

impl RemoteConverter {
    pub fn new(settings: RemoteSettings) -> Result<Self, ConvertError> {
        let endpoint = reqwest::Url::parse(&settings.endpoint)
            .map_err(|err| ConvertError::new(FailureKind::InvalidEndpoint, err.to_string()))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ConvertError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

#[async_trait::async_trait]
impl Converter for RemoteConverter {
    async fn convert(&self, text: &str) -> Result<String, ConvertError> {
        let request = ConvertRequest {
            text: text.to_string(),
        };
        tabmark_debug!(
            "POST {} text_len={}",
            self.endpoint,
            request.text.len()
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConvertError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body: ConvertResponse = response
            .json()
            .await
            .map_err(|err| ConvertError::new(FailureKind::InvalidResponse, err.to_string()))?;
        Ok(body.markdown_text)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ConvertError {
    if err.is_timeout() {
        return ConvertError::new(FailureKind::Timeout, err.to_string());
    }
    ConvertError::new(FailureKind::Network, err.to_string())
}
