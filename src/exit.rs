// src/exit.rs
//! Standardized process exit codes for `linkeval`.
//!
//! Provides a stable contract for scripts and automation.

use std::process::Termination;

use crate::error::LinkError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum LinkevalExit {
    /// Operation completed successfully.
    Success = 0,
    /// Generic error (I/O, score store, relay).
    Error = 1,
    /// Arguments or identifiers failed validation.
    InvalidInput = 2,
    /// A verification (relay probe, dataset presence) came back negative.
    CheckFailed = 3,
}

impl LinkevalExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Maps a failed command to its exit code.
    ///
    /// Validation failures anywhere in the error chain map to `InvalidInput`;
    /// everything else is a generic `Error`.
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        let invalid = err.chain().any(|cause| {
            matches!(
                cause.downcast_ref::<LinkError>(),
                Some(
                    LinkError::InvalidParameter(_)
                        | LinkError::UnknownIdentifier { .. }
                        | LinkError::UnsupportedPolicy(_)
                )
            )
        });
        if invalid {
            Self::InvalidInput
        } else {
            Self::Error
        }
    }
}

impl Termination for LinkevalExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}
