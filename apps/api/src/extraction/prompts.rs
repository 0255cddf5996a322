// Prompt templates for the record extraction calls.

use crate::extraction::models::DocumentKind;

pub const EXTRACTION_PROMPT_TEMPLATE: &str = "\
The following block of text was extracted from a PDF. \
Return a JSON array of objects with exactly these fields extracted from the block: {fields}. \
Copy each unit code exactly as written in the document (for example: 001). \
Use null for a field that is not present. \
Ignore all other information.

{label}:
{document_text}
";

/// Builds the extraction prompt for one document.
/// The document text is embedded verbatim, without escaping.
pub fn build_prompt(kind: DocumentKind, document_text: &str) -> String {
    // `document_text` is substituted last so placeholders inside it stay untouched.
    EXTRACTION_PROMPT_TEMPLATE
        .replace("{fields}", &kind.fields().join(", "))
        .replace("{label}", kind.label())
        .replace("{document_text}", document_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contacts_prompt_lists_contact_fields() {
        let prompt = build_prompt(DocumentKind::Contacts, "Unit 001 ana@example.com");
        assert!(prompt.contains("fields extracted from the block: unit, email, phone."));
        assert!(prompt.contains("JSON array"));
        assert!(prompt.contains("Ignore all other information"));
    }

    #[test]
    fn test_delinquency_prompt_lists_delinquency_fields() {
        let prompt = build_prompt(DocumentKind::Delinquency, "001 Ana Souza");
        assert!(prompt.contains("fields extracted from the block: unit, name."));
        assert!(!prompt.contains("email"));
    }

    #[test]
    fn test_document_text_is_appended_verbatim() {
        let text = "Unit 001\n\u{fffd} noise {fields} \"quoted\"";
        let prompt = build_prompt(DocumentKind::Contacts, text);
        assert!(prompt.ends_with(&format!("Contacts:\n{text}\n")));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(
            build_prompt(DocumentKind::Delinquency, "same"),
            build_prompt(DocumentKind::Delinquency, "same")
        );
    }
}
