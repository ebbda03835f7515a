use serde::{Deserialize, Serialize};

/// Body of `POST /convert`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertRequest {
    pub text: String,
}

/// Reply to `POST /convert`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertResponse {
    #[serde(rename = "markdownText")]
    pub markdown_text: String,
}
