use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! inconsistent_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Inconsistent {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Inconsistent {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every error is fatal for the analysis run that produced it: the passes in this crate assume
/// well-formed SSA input and deterministic bookkeeping, so a failure indicates either a bug in
/// the upstream IR builder or a bug in this crate's own state tracking. Nothing is retryable.
///
/// # Error Categories
///
/// ## Input Errors
/// - [`Error::Malformed`] - The input IR violates a structural precondition
///
/// ## Analysis Errors
/// - [`Error::Inconsistent`] - Internal bookkeeping disagrees with itself
/// - [`Error::GraphError`] - Graph construction or query error
///
/// # Examples
///
/// ```rust,ignore
/// use unssa::{destruct, Error};
///
/// match destruct(&mut function) {
///     Ok(remap) => println!("coalesced {} variables", remap.len()),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("malformed input: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The input IR is damaged and cannot be processed.
    ///
    /// Raised when a structural precondition on the input does not hold: a phi argument that is
    /// not a direct variable reference, a duplicate target within a parallel copy, or leftover
    /// destruction artifacts from a prior run. The error includes the source location where the
    /// violation was detected for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Internal bookkeeping reached a state it claims is impossible.
    ///
    /// Raised when incrementally maintained state disagrees with a from-scratch recomputation
    /// (def/use verification), when a dominance relationship assumed by the interference test
    /// does not hold, or when sequentialization bookkeeping contradicts itself. Always a bug,
    /// never a recoverable condition.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of the inconsistency
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Inconsistent - {file}:{line}: {message}")]
    Inconsistent {
        /// The message to be printed for the Inconsistent error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Generic error for miscellaneous failures.
    ///
    /// Used for errors that don't fit into other categories or for
    /// wrapping external failures with additional context.
    #[error("{0}")]
    Error(String),

    /// Graph construction or query error.
    ///
    /// Errors related to the underlying directed graph: adding an edge with an endpoint that
    /// does not exist, or computing dominance over a graph with an invalid entry node.
    #[error("{0}")]
    GraphError(String),
}

#[cfg(test)]
mod tests {
    use crate::Error;

    #[test]
    fn test_malformed_error_macro() {
        let err = malformed_error!("bad phi");
        match err {
            Error::Malformed { message, file, .. } => {
                assert_eq!(message, "bad phi");
                assert!(file.ends_with("error.rs"));
            }
            _ => panic!("expected Malformed"),
        }
    }

    #[test]
    fn test_malformed_error_macro_format() {
        let err = malformed_error!("bad phi in block {}", 3);
        assert!(err.to_string().contains("bad phi in block 3"));
    }

    #[test]
    fn test_inconsistent_error_macro() {
        let err = inconsistent_error!("def/use mismatch for {}", "v3");
        match err {
            Error::Inconsistent { message, .. } => {
                assert_eq!(message, "def/use mismatch for v3");
            }
            _ => panic!("expected Inconsistent"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = Error::GraphError("node n5 does not exist".to_string());
        assert_eq!(err.to_string(), "node n5 does not exist");
    }
}
