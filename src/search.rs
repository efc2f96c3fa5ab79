//! Search input buffer and query validation.

use crate::error::ValidationError;

/// Trim a raw query and reject it when nothing is left.
pub fn validate_query(raw: &str) -> Result<&str, ValidationError> {
    let q = raw.trim();
    if q.is_empty() {
        return Err(ValidationError::EmptyQuery);
    }
    Ok(q)
}

/// Text typed into the search field plus its inline error. Every edit revalidates, so the
/// message follows the field from the first keystroke.
#[derive(Clone, Debug, Default)]
pub struct SearchInput {
    pub text: String,
    pub error: Option<ValidationError>,
}

impl SearchInput {
    pub fn push(&mut self, c: char) {
        self.text.push(c);
        self.revalidate();
    }

    pub fn pop(&mut self) {
        self.text.pop();
        self.revalidate();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.error = None;
    }

    /// Validate for submission, remembering the error for display.
    pub fn submit(&mut self) -> Result<String, ValidationError> {
        match validate_query(&self.text) {
            Ok(q) => {
                self.error = None;
                Ok(q.to_string())
            }
            Err(e) => {
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    fn revalidate(&mut self) {
        self.error = validate_query(&self.text).err();
    }
}
