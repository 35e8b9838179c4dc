use serde::{Deserialize, Serialize};

/// Uploaded file reference attached to a chat turn.
///
/// `url` is a fetchable resource reference (in practice a data URL produced
/// by the uploading client), `pathname` the display name, `content_type`
/// the declared MIME type. Attachments are owned by their message and have
/// no lifecycle of their own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    pub url: String,
    pub pathname: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
}

impl Attachment {
    pub fn new(
        url: impl Into<String>,
        pathname: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            pathname: pathname.into(),
            content_type: content_type.into(),
        }
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type == "application/pdf"
    }
}

/// Result of screening a turn's attachments against the upload allow-list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenedAttachments {
    pub accepted: Vec<Attachment>,
    pub rejected: Vec<Attachment>,
}

impl ScreenedAttachments {
    /// Display names of the rejected files, for reporting back to the caller
    pub fn rejected_names(&self) -> Vec<String> {
        self.rejected.iter().map(|a| a.pathname.clone()).collect()
    }
}

/// Partition attachments by declared MIME type: `image/*` and
/// `application/pdf` are accepted, everything else is rejected. Rejected
/// files never block the valid subset. No file content is inspected here;
/// classification is by declaration only.
pub fn screen_attachments(attachments: &[Attachment]) -> ScreenedAttachments {
    let mut screened = ScreenedAttachments::default();

    for attachment in attachments {
        if attachment.is_image() || attachment.is_pdf() {
            screened.accepted.push(attachment.clone());
        } else {
            screened.rejected.push(attachment.clone());
        }
    }

    screened
}
