//! Utility macros used internally by the content crate.

/// Returns early with an error if a condition is not met.
///
/// Works like `assert!`, but returns `Err($error)` instead of panicking, so
/// builder validation reads as a list of preconditions.
///
/// # Example
///
/// ```ignore
/// ensure!(self.payload.is_some(), ContentError::MissingPayload);
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
