/// Strips the fenced wrapper the model tends to put around JSON output.
///
/// Only one wrapper is removed, and only when it sits at the very start
/// (```` ```json ```` plus a line break) or the very end (a line break plus
/// ```` ``` ````) of the reply. Anything else passes through unchanged.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    prefix: String,
    suffix: String,
}

impl Sanitizer {
    /// `fence_language` is the tag after the opening backticks, normally `json`.
    pub fn new(fence_language: &str) -> Self {
        Self {
            prefix: format!("```{fence_language}\n"),
            suffix: "\n```".to_string(),
        }
    }

    pub fn sanitize<'a>(&self, reply: &'a str) -> &'a str {
        let text = reply.strip_prefix(self.prefix.as_str()).unwrap_or(reply);
        text.strip_suffix(self.suffix.as_str()).unwrap_or(text)
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new("json")
    }
}
