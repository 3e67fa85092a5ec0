use thiserror::Error;

use crate::resolver::ResolveFailure;

/// Failures that prevent a [`Verifier`](super::Verifier) from being built.
///
/// Checks themselves never fail this way: every problem during a check ends
/// up in the [`Outcome`](super::Outcome).
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error(transparent)]
    Resolver(#[from] ResolveFailure),
}
