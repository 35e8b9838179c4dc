use crate::attachments::Attachment;
use sift_llm::Message;

/// Conditionally prepend the PII-analysis system message.
///
/// Pure function of its inputs: when the incoming turn carries attachments,
/// exactly one synthetic system message is prepended that steers the model
/// to call the `detect_pii` tool per attachment, read every page of
/// multi-page documents, and answer in a fixed enumerated format. Without
/// attachments the sequence is returned unmodified.
pub fn augment_messages(messages: Vec<Message>, attachments: &[Attachment]) -> Vec<Message> {
    if attachments.is_empty() {
        return messages;
    }

    let has_pdf = attachments.iter().any(|a| a.is_pdf());

    let mut augmented = Vec::with_capacity(messages.len() + 1);
    augmented.push(Message::system(pii_system_prompt(has_pdf)));
    augmented.extend(messages);
    augmented
}

fn pii_system_prompt(has_pdf: bool) -> String {
    let pdf_section = if has_pdf {
        "\nCRITICAL FOR PDF FILES:\n\
         - PDFs contain multiple pages - you MUST scroll through and examine EVERY single page\n\
         - Do NOT stop at the first page - continue through the entire document\n\
         - Pay special attention to headers, footers, and content throughout ALL pages\n\
         - Many PDFs have PII scattered across different pages (contact info on page 1, additional details on subsequent pages)\n"
    } else {
        ""
    };

    format!(
        "The user has uploaded file attachments. When asked to analyze files for PII:\n\
         \n\
         1. FIRST use the detect_pii tool once per attachment, starting with attachment index 0\n\
         2. THEN examine ALL uploaded files thoroughly for personally identifiable information\n\
         {pdf_section}\n\
         3. Look carefully for names, email addresses, phone numbers, addresses, SSNs, and other PII\n\
         4. Be thorough and strict - names and contact info in resumes/CVs ARE considered PII\n\
         5. ALWAYS use this EXACT format for your response:\n\
         \n\
         ## PII DETECTED:\n\
         \n\
         1. [Value]\n\
         Type: [type]\n\
         Location: [specific location like \"page 1 header\" or \"page 2 middle section\" etc.]\n\
         \n\
         2. [Value]\n\
         Type: [type]\n\
         Location: [specific location like \"page 1 header\" or \"page 2 middle section\" etc.]\n\
         \n\
         CRITICAL: For multi-page documents, specify which page each PII was found on. Examine ALL pages thoroughly!"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn() -> Vec<Message> {
        vec![Message::human("Check this file for PII")]
    }

    #[test]
    fn test_no_attachments_passes_through() {
        let messages = turn();
        let augmented = augment_messages(messages.clone(), &[]);
        assert_eq!(augmented, messages);
    }

    #[test]
    fn test_attachments_prepend_single_system_message() {
        let attachments = vec![Attachment::new("u", "cv.pdf", "application/pdf")];
        let augmented = augment_messages(turn(), &attachments);

        assert_eq!(augmented.len(), 2);
        assert_eq!(augmented[0].role(), "system");
        match &augmented[0] {
            Message::System { content } => {
                let text = content.as_text().unwrap();
                assert!(!text.is_empty());
                assert!(text.contains("detect_pii"));
            }
            other => panic!("Expected system message, got {:?}", other),
        }
        assert_eq!(augmented[1].role(), "user");
    }

    #[test]
    fn test_pdf_attachment_adds_multipage_passage() {
        let pdf = vec![Attachment::new("u", "cv.pdf", "application/pdf")];
        let image = vec![Attachment::new("u", "scan.png", "image/png")];

        let with_pdf = augment_messages(turn(), &pdf);
        let with_image = augment_messages(turn(), &image);

        let pdf_text = match &with_pdf[0] {
            Message::System { content } => content.as_text().unwrap(),
            _ => unreachable!(),
        };
        let image_text = match &with_image[0] {
            Message::System { content } => content.as_text().unwrap(),
            _ => unreachable!(),
        };

        assert!(pdf_text.contains("EVERY single page"));
        assert!(!image_text.contains("EVERY single page"));
    }
}
