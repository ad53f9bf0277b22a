use crate::error::AppError;

/// Collects per-field validation failures and reports them as one
/// `"{msg}: {field}"` list joined with `", "`.
#[derive(Debug, Default)]
pub struct FieldErrors {
    messages: Vec<String>,
}

impl FieldErrors {
    pub fn check(&mut self, ok: bool, field: &str, msg: &str) {
        if !ok {
            self.messages.push(format!("{msg}: {field}"));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.messages.join(", ")))
        }
    }
}
