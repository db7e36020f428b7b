//! Fault containment for operations that must always return a value.

use std::any::Any;
use std::panic::{UnwindSafe, catch_unwind};
use thiserror::Error;

/// An unexpected failure caught at the boundary of a public operation.
#[derive(Debug, Clone, Error)]
#[error("{operation} failed: {message}")]
pub struct AnalysisFault {
    /// Name of the operation whose body failed.
    pub operation: &'static str,
    /// Human-readable description of the failure.
    pub message: String,
}

/// Run `body`, converting a panic into an [`AnalysisFault`].
///
/// Callers turn the fault into their own fallback result, so nothing escapes the public
/// operation boundary.
pub fn contain<T, F>(operation: &'static str, body: F) -> Result<T, AnalysisFault>
where
    F: FnOnce() -> T + UnwindSafe,
{
    catch_unwind(body).map_err(|payload| {
        let fault = AnalysisFault {
            operation,
            message: panic_message(payload.as_ref()),
        };
        tracing::error!(operation, message = %fault.message, "Contained analysis fault");
        fault
    })
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown failure".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successful_bodies_pass_through() {
        assert_eq!(contain("double", || 21 * 2).expect("value"), 42);
    }

    #[test]
    fn panics_become_faults_with_their_message() {
        let fault = contain("explode", || -> usize { panic!("boom") }).expect_err("fault");
        assert_eq!(fault.operation, "explode");
        assert_eq!(fault.message, "boom");
        assert_eq!(fault.to_string(), "explode failed: boom");
    }

    #[test]
    fn formatted_panics_keep_their_text() {
        let fault = contain("index", || -> usize { panic!("index {} out of range", 7) })
            .expect_err("fault");
        assert_eq!(fault.message, "index 7 out of range");
    }
}
