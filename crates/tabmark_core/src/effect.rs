use crate::{ExportFormat, RequestId, TriageBucket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send `text` to the remote converter and report back with `request_id`.
    RequestConversion { request_id: RequestId, text: String },
    /// Persist the given Markdown.
    SaveOutput { markdown: String },
    /// Hand an export to the user.
    PresentExport {
        bucket: TriageBucket,
        format: ExportFormat,
        text: String,
    },
}
