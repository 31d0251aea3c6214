//! Error types for the forms core.
//!
//! # Design
//! Three layers, innermost first:
//! - `ApiError` is what `FormsClient::parse_*` returns. `NotFound` gets its
//!   own variant; every other unexpected status lands in `Http` with the raw
//!   status and body for debugging.
//! - `ValidationError` and `DraftError` never involve the network.
//! - `FormError` is what a form component operation fails with. Components
//!   turn it into a fixed, human-readable line via `user_message`, so nothing
//!   past the component boundary has to understand transport details.

use crate::http::TransportError;

/// Errors returned by `FormsClient` build and parse methods.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// No response was received at all.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Client-side submission gate failures. Display text is shown inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Name is required.")]
    MissingName,
    #[error("Description is required.")]
    MissingDescription,
    #[error("At least one feature is required.")]
    NoFeatures,
    #[error("At least one question is required.")]
    NoQuestions,
    #[error("Requirement name is required.")]
    BlankRequirementName,
}

/// In-memory edits that cannot be applied: a position with no element, or
/// a list whose identifier sequence has run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("no item at index {index} (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("identifier sequence exhausted")]
    IdsExhausted,
}

/// Failure of a single user-initiated form operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error("resource not found")]
    NotFound,

    /// Network or server failure, including undecodable responses.
    #[error(transparent)]
    Transport(ApiError),
}

impl From<ApiError> for FormError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotFound => FormError::NotFound,
            other => FormError::Transport(other),
        }
    }
}

impl FormError {
    /// The line shown to the user when `operation` fails with this error.
    ///
    /// Validation and draft errors speak for themselves; `NotFound` and
    /// transport failures collapse into the operation's fixed message.
    pub fn user_message(&self, operation: &Operation) -> String {
        match self {
            FormError::Validation(err) => err.to_string(),
            FormError::Draft(err) => err.to_string(),
            FormError::NotFound | FormError::Transport(_) => operation.failure_message(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, FormError::Validation(_))
    }
}

/// User-initiated operations that reach the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    CreateBusinessSpec,
    LoadRequirements,
    AddRequirement,
    ToggleRequirement(String),
    FetchTest,
    SaveTest,
}

impl Operation {
    pub fn failure_message(&self) -> String {
        match self {
            Operation::CreateBusinessSpec => "Failed to create the business specification.".to_string(),
            Operation::LoadRequirements => "Failed to load requirements.".to_string(),
            Operation::AddRequirement => "Failed to add requirement.".to_string(),
            Operation::ToggleRequirement(id) => {
                format!("Failed to toggle requirement completion for {id}.")
            }
            Operation::FetchTest => "Failed to fetch test details.".to_string(),
            Operation::SaveTest => "Failed to save test details.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_api_error_maps_to_not_found() {
        assert_eq!(FormError::from(ApiError::NotFound), FormError::NotFound);
    }

    #[test]
    fn http_error_maps_to_transport() {
        let err = FormError::from(ApiError::Http {
            status: 500,
            body: "boom".to_string(),
        });
        assert!(matches!(err, FormError::Transport(ApiError::Http { status: 500, .. })));
    }

    #[test]
    fn not_found_and_transport_share_the_operation_message() {
        let op = Operation::FetchTest;
        let transport = FormError::from(ApiError::Transport(TransportError("refused".into())));
        assert_eq!(FormError::NotFound.user_message(&op), "Failed to fetch test details.");
        assert_eq!(transport.user_message(&op), "Failed to fetch test details.");
    }

    #[test]
    fn validation_message_is_its_own_text() {
        let err = FormError::from(ValidationError::MissingName);
        assert!(err.is_validation());
        assert_eq!(err.user_message(&Operation::CreateBusinessSpec), "Name is required.");
    }

    #[test]
    fn toggle_message_names_the_requirement() {
        let op = Operation::ToggleRequirement("7".to_string());
        assert_eq!(op.failure_message(), "Failed to toggle requirement completion for 7.");
    }
}
