use crate::context::RequestContext;
use crate::pii::scan_text;
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use sift_llm::Tool;

pub const PII_TOOL_NAME: &str = "detect_pii";

/// Executes tool calls requested by the model during a session.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Run one tool call; the returned string is fed back to the model as
    /// the tool result. Domain failures (bad index, no attachments) come
    /// back as structured result payloads, not as `Err`: the session loop
    /// must stay alive so the model can react to them.
    async fn execute(&self, tool_name: &str, arguments: &str) -> Result<String>;

    /// Tool definitions to advertise in the chat request
    fn definitions(&self) -> Vec<Tool>;
}

#[derive(Debug, Deserialize)]
struct DetectPiiArgs {
    #[serde(rename = "attachmentIndex")]
    attachment_index: i64,
}

/// The PII-detection tool, scoped to one request.
///
/// Resolves the target attachment by index from the request context and
/// scans the request's text content. Owning the context per instance is
/// what keeps concurrent requests isolated from each other.
pub struct PiiDetectionTool {
    ctx: RequestContext,
}

impl PiiDetectionTool {
    pub fn new(ctx: RequestContext) -> Self {
        Self { ctx }
    }

    fn run(&self, arguments: &str) -> serde_json::Value {
        let args: DetectPiiArgs = match serde_json::from_str(arguments) {
            Ok(args) => args,
            Err(e) => {
                return json!({
                    "error": format!("PII detection failed: invalid arguments: {}", e),
                });
            }
        };

        if self.ctx.attachments().is_empty() {
            return json!({
                "error": "No attachments found on the current message",
            });
        }

        let index = match usize::try_from(args.attachment_index) {
            Ok(index) => index,
            Err(_) => {
                return json!({
                    "error": format!(
                        "Attachment index {} is invalid; indexes start at 0",
                        args.attachment_index
                    ),
                });
            }
        };

        let Some(attachment) = self.ctx.attachment(index) else {
            return json!({
                "error": format!(
                    "Attachment index {} is out of range; {} attachment(s) available",
                    index,
                    self.ctx.attachments().len()
                ),
            });
        };

        let report = scan_text(self.ctx.text());

        let summary = if report.has_pii {
            format!(
                "Found {} PII categor{} in {}: {}",
                report.detected.categories().len(),
                if report.detected.categories().len() == 1 { "y" } else { "ies" },
                attachment.pathname,
                report.detected.categories().join(", ")
            )
        } else {
            format!("No PII detected in {}", attachment.pathname)
        };

        json!({
            "fileName": attachment.pathname,
            "fileType": attachment.content_type,
            "hasPII": report.has_pii,
            "detectedPII": report.detected,
            "summary": summary,
        })
    }
}

#[async_trait]
impl ToolExecutor for PiiDetectionTool {
    async fn execute(&self, tool_name: &str, arguments: &str) -> Result<String> {
        if tool_name != PII_TOOL_NAME {
            anyhow::bail!("Unknown tool: {}", tool_name);
        }

        tracing::debug!(arguments, "Running PII detection tool");

        let result = self.run(arguments);
        Ok(result.to_string())
    }

    fn definitions(&self) -> Vec<Tool> {
        vec![Tool::function(
            PII_TOOL_NAME,
            "Analyzes a file attachment for Personal Identifiable Information (PII)",
            json!({
                "type": "object",
                "properties": {
                    "attachmentIndex": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "The index of the attachment in the user's message to analyze (0-based, starting from 0)",
                    },
                },
                "required": ["attachmentIndex"],
            }),
        )]
    }
}
