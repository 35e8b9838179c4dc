use crate::attachments::Attachment;

/// Per-request context handed to tool execution.
///
/// Carries the attachments of the most recent user turn that has any, plus
/// the request's textual content for the scanner. Built once per HTTP
/// request and moved into that request's session. Tools must never read
/// request data from process-wide state, or concurrent requests would
/// observe each other's attachments.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    attachments: Vec<Attachment>,
    text: String,
}

impl RequestContext {
    pub fn new(attachments: Vec<Attachment>, text: impl Into<String>) -> Self {
        Self {
            attachments,
            text: text.into(),
        }
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn attachment(&self, index: usize) -> Option<&Attachment> {
        self.attachments.get(index)
    }

    /// Text the scanner runs over. This is the message text of the request,
    /// not the attachment bytes; see `pii` module docs for the limitation.
    pub fn text(&self) -> &str {
        &self.text
    }
}
