//! Custom exit codes for the pim CLI
//!
//! This module defines specific exit codes for different error conditions
//! to make scripting and automation easier.

/// Custom exit codes for pim
///
/// These codes follow the BSD sysexits.h conventions where possible:
/// - 0: Success
/// - 64-78: Standard exit codes from sysexits.h
/// - 100+: Custom application-specific codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum PimExitCode {
    /// Success (0) - Command completed successfully
    Success = exitcode::OK,

    /// Command line usage error (64) - User input error
    UsageError = exitcode::USAGE,

    /// Data format error (65) - Output could not be produced
    DataError = exitcode::DATAERR,

    /// Addressee unknown (67) - Remote resource not found
    NotFound = exitcode::NOUSER,

    /// Internal software error (70) - Unexpected application error
    SoftwareError = exitcode::SOFTWARE,

    /// Temporary failure (75) - Rate limited, try again later
    TempFail = exitcode::TEMPFAIL,

    /// Permission denied (77) - Authenticated but not allowed
    NoPermission = exitcode::NOPERM,

    /// Configuration error (78) - Application configuration issue
    ConfigError = exitcode::CONFIG,

    /// Authentication error (100) - Credentials or token issues
    AuthError = 100,

    /// Network error (101) - Server could not be reached
    NetworkError = 101,

    /// API error (102) - Remote API rejected the request
    ApiError = 102,
}

impl PimExitCode {
    /// Convert to numeric exit code
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

impl From<PimExitCode> for i32 {
    fn from(code: PimExitCode) -> Self {
        code.code()
    }
}
