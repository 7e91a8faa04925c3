//! Trait definitions for external interactions
//!
//! The completion service is the only external collaborator of the
//! enrichment pipeline. Implementations live in `quill-llm`.

use std::fmt::Display;

/// Retry classification a provider error may expose
///
/// Providers that know the cause of a failure (an HTTP status, an error
/// code) report it here so callers do not have to guess from the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureClass {
    /// Upstream is temporarily unable to serve; retrying may succeed
    Transient,

    /// Retrying cannot succeed (bad credentials, unknown model, ...)
    Permanent,

    /// The provider does not know; callers fall back to inspecting the message
    #[default]
    Unknown,
}

/// An error that can describe its own retry classification
pub trait ClassifiedError: Display {
    /// Classification of this failure
    fn class(&self) -> FailureClass {
        FailureClass::Unknown
    }
}

/// Trait for text-completion providers
///
/// A synchronous `text in, text out` contract. Implemented by the
/// infrastructure layer (quill-llm).
pub trait CompletionProvider {
    /// Error type for completion operations
    type Error: ClassifiedError;

    /// Complete a single rendered prompt
    fn complete(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Name of the model or backend, for diagnostics
    fn model_name(&self) -> &str {
        "llm"
    }
}

impl<P: CompletionProvider + ?Sized> CompletionProvider for &P {
    type Error = P::Error;

    fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        (**self).complete(prompt)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[derive(Debug)]
    struct EchoError;

    impl Display for EchoError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("echo failed")
        }
    }

    impl ClassifiedError for EchoError {}

    impl CompletionProvider for Echo {
        type Error = EchoError;

        fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
            Ok(prompt.to_string())
        }
    }

    #[test]
    fn test_default_classification_is_unknown() {
        assert_eq!(EchoError.class(), FailureClass::Unknown);
    }

    #[test]
    fn test_reference_forwards() {
        let provider = Echo;
        let by_ref = &provider;
        assert_eq!(by_ref.complete("hi").unwrap(), "hi");
        assert_eq!(by_ref.model_name(), "llm");
    }
}
