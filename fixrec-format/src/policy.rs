use std::fmt;

use crate::report::ErrorKind;

/// How the reader continues after a failed record.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ErrorPolicy {
    /// Stop on the first failure.
    Strict,
    /// Log and discard the offending record, continuing the scan.
    SkipInvalid,
    /// Log every failure; records that only failed validation are retained
    /// in the result for inspection.
    CollectErrors,
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        ErrorPolicy::SkipInvalid
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPolicy::Strict => write!(f, "strict"),
            ErrorPolicy::SkipInvalid => write!(f, "skip"),
            ErrorPolicy::CollectErrors => write!(f, "collect"),
        }
    }
}

/// What to do with the record that produced an error.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Action {
    /// Fail the whole read.
    Abort,
    /// Discard the record and continue.
    Drop,
    /// Keep the record alongside its error entry and continue.
    Retain,
}

impl Action {
    /// The single decision point mapping a policy and an error kind to a
    /// continuation.
    pub fn for_error(policy: ErrorPolicy, kind: ErrorKind) -> Action {
        match policy {
            ErrorPolicy::Strict => Action::Abort,
            ErrorPolicy::SkipInvalid => Action::Drop,
            ErrorPolicy::CollectErrors => match kind {
                ErrorKind::Validation => Action::Retain,
                ErrorKind::Unpack | ErrorKind::Incomplete | ErrorKind::Unexpected => Action::Drop,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [ErrorKind; 4] = [
        ErrorKind::Unpack,
        ErrorKind::Validation,
        ErrorKind::Incomplete,
        ErrorKind::Unexpected,
    ];

    #[test]
    fn strict_always_aborts() {
        for kind in ALL_KINDS {
            assert_eq!(Action::for_error(ErrorPolicy::Strict, kind), Action::Abort);
        }
    }

    #[test]
    fn skip_always_drops() {
        for kind in ALL_KINDS {
            assert_eq!(Action::for_error(ErrorPolicy::SkipInvalid, kind), Action::Drop);
        }
    }

    #[test]
    fn collect_retains_only_validation_failures() {
        for kind in ALL_KINDS {
            let action = Action::for_error(ErrorPolicy::CollectErrors, kind);
            if kind == ErrorKind::Validation {
                assert_eq!(action, Action::Retain);
            } else {
                assert_eq!(action, Action::Drop);
            }
        }
    }
}
