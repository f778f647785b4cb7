//! Process exit statuses for script outcomes.
//!
//! The numeric values follow the BSD `sysexits` convention so shell
//! callers can distinguish failure classes without parsing output.

use std::fmt;

/// Outcome class of a script run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// The script ran to completion.
    Ok,
    /// The engine was misused by the host (double init, use after free).
    Usage,
    /// The source failed to lex or parse.
    Compile,
    /// The script raised a runtime error.
    Runtime,
    /// A file could not be read.
    Io,
}

impl ExitStatus {
    /// The `sysexits`-style process exit code.
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Ok => 0,
            ExitStatus::Usage => 64,
            ExitStatus::Compile => 65,
            ExitStatus::Runtime => 70,
            ExitStatus::Io => 74,
        }
    }

    pub fn is_ok(self) -> bool {
        self == ExitStatus::Ok
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExitStatus::Ok => "ok",
            ExitStatus::Usage => "usage error",
            ExitStatus::Compile => "compile error",
            ExitStatus::Runtime => "runtime error",
            ExitStatus::Io => "io error",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_sysexits() {
        assert_eq!(ExitStatus::Ok.code(), 0);
        assert_eq!(ExitStatus::Usage.code(), 64);
        assert_eq!(ExitStatus::Compile.code(), 65);
        assert_eq!(ExitStatus::Runtime.code(), 70);
        assert_eq!(ExitStatus::Io.code(), 74);
    }

    #[test]
    fn only_ok_is_ok() {
        assert!(ExitStatus::Ok.is_ok());
        assert!(!ExitStatus::Compile.is_ok());
    }
}
