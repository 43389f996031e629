//! Exit codes for noderecctl.
//!
//! Values above 64 follow the sysexits convention so shell wrappers can
//! tell the failure classes apart.

use noderec_common::NoderecError;

/// Exit code for success, including no-op appends
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors (configuration, unexpected IO)
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when the series has no padded samples
pub const EXIT_NO_PADDING: i32 = 3;

/// Exit code for malformed tabular or report content
pub const EXIT_DATA_ERROR: i32 = 65;

/// Exit code when discovery or required auxiliary data fails
pub const EXIT_NO_INPUT: i32 = 66;

/// Exit code when coordinate resolution is exhausted
pub const EXIT_UNRESOLVED: i32 = 69;

/// Exit code when a ledger write fails
pub const EXIT_WRITE_FAILED: i32 = 74;

/// Map a workflow error to its exit code.
pub fn exit_code_for(err: &NoderecError) -> i32 {
    match err {
        NoderecError::NotFound { .. }
        | NoderecError::InvalidFile(_)
        | NoderecError::NavigationUnavailable(_) => EXIT_NO_INPUT,
        NoderecError::Parse { .. } => EXIT_DATA_ERROR,
        NoderecError::Unresolved(_) => EXIT_UNRESOLVED,
        NoderecError::Io(_) => EXIT_GENERAL_ERROR,
    }
}
