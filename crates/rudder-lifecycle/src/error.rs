//! Error type for status parsing.

use thiserror::Error;

/// A status label outside a kind's vocabulary.
///
/// The control plane can report labels this crate has never seen (newer
/// cluster versions, third-party controllers). Those are surfaced as an
/// explicit error instead of being silently classified as not running and
/// not done, so callers can tell "state not determined" apart from a real
/// answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {kind} status: `{status}`")]
pub struct UnrecognizedStatus {
    /// The entity kind whose vocabulary was consulted.
    pub kind: &'static str,
    /// The label that failed to parse.
    pub status: String,
}

impl UnrecognizedStatus {
    pub(crate) fn new(kind: &'static str, status: &str) -> Self {
        Self {
            kind,
            status: status.to_owned(),
        }
    }
}
