//! Error codes for all engine diagnostics.
//!
//! Each code is a unique identifier (e.g. `E1001`) whose first digit names
//! the phase that raised it. Codes appear in rendered output so failures are
//! searchable.

use std::fmt;

/// Error codes for all engine diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E0xxx: lexer errors
/// - E1xxx: parser errors
/// - E6xxx: runtime errors
/// - E9xxx: host boundary errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer (E0xxx)
    /// Unterminated string literal
    E0001,
    /// Invalid character in source
    E0002,
    /// Invalid escape sequence
    E0003,
    /// Unterminated block comment
    E0004,

    // Parser (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Unclosed delimiter
    E1003,
    /// Expected identifier
    E1004,
    /// Invalid assignment target
    E1005,
    /// Too many parameters or arguments
    E1006,

    // Runtime (E6xxx)
    /// Undefined variable
    E6001,
    /// Type error in operator or call
    E6002,
    /// Division or modulo by zero
    E6003,
    /// Wrong number of arguments
    E6004,
    /// Call stack depth exceeded
    E6005,
    /// Index out of bounds or missing key
    E6006,

    // Host boundary (E9xxx)
    /// Engine used before init or after free
    E9001,
    /// Script file could not be read
    E9002,
}

impl ErrorCode {
    /// The code as it appears in output, e.g. `"E1001"`.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E6003 => "E6003",
            ErrorCode::E6004 => "E6004",
            ErrorCode::E6005 => "E6005",
            ErrorCode::E6006 => "E6006",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// True for codes raised before evaluation starts.
    pub fn is_compile_phase(self) -> bool {
        matches!(
            self,
            ErrorCode::E0001
                | ErrorCode::E0002
                | ErrorCode::E0003
                | ErrorCode::E0004
                | ErrorCode::E1001
                | ErrorCode::E1002
                | ErrorCode::E1003
                | ErrorCode::E1004
                | ErrorCode::E1005
                | ErrorCode::E1006
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_as_str() {
        assert_eq!(ErrorCode::E1002.to_string(), "E1002");
        assert_eq!(ErrorCode::E9001.as_str(), "E9001");
    }

    #[test]
    fn phase_split() {
        assert!(ErrorCode::E0001.is_compile_phase());
        assert!(ErrorCode::E1001.is_compile_phase());
        assert!(!ErrorCode::E6001.is_compile_phase());
        assert!(!ErrorCode::E9002.is_compile_phase());
    }
}
