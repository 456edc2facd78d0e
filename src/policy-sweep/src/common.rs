// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::{error, fmt, result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoPoliciesEnabled,
    OnlyOnePolicyEnabled,
    EmptySettings,
    DuplicateLongName,
    MissingOnSetting,
    NonFiniteSetting,
    BadSetting,
    BadCatalog,
    BadConfig,
    Io,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            NoPoliciesEnabled => "no_policies_enabled",
            OnlyOnePolicyEnabled => "only_one_policy_enabled",
            EmptySettings => "empty_settings",
            DuplicateLongName => "duplicate_long_name",
            MissingOnSetting => "missing_on_setting",
            NonFiniteSetting => "non_finite_setting",
            BadSetting => "bad_setting",
            BadCatalog => "bad_catalog",
            BadConfig => "bad_config",
            Io => "io",
        };

        write!(f, "{name}")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fewer enabled policies than the generation mode requires.
    InsufficientPolicies,
    /// The catalog contents are malformed.
    Data,
    Config,
    Io,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub code: ErrorCode,
    pub details: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, code: ErrorCode, details: Option<String>) -> Self {
        Error {
            kind,
            code,
            details,
        }
    }

    /// Errors caused by the catalog contents are written into the output
    /// script, since many users only ever look at that file.  Config and
    /// I/O failures are not: the output path may be the thing that is broken.
    pub fn is_reported_in_script(&self) -> bool {
        matches!(self.kind, ErrorKind::InsufficientPolicies | ErrorKind::Data)
    }

    /// The human-readable explanation written in place of a script.
    pub fn message(&self) -> String {
        let message = match self.kind {
            ErrorKind::InsufficientPolicies => {
                let details = self.details.as_deref().unwrap_or("");
                match self.code {
                    ErrorCode::OnlyOnePolicyEnabled => format!(
                        "Error: Only one policy was enabled in the policy catalog.  {details}"
                    ),
                    _ => format!(
                        "Error: No policies were enabled in the policy catalog.  {details}"
                    ),
                }
            }
            _ => match self.details {
                Some(ref details) => format!("Error: {details}"),
                None => format!("Error: {}", self.code),
            },
        };
        message.trim_end().to_owned()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::InsufficientPolicies => "InsufficientPolicies",
            ErrorKind::Data => "DataError",
            ErrorKind::Config => "ConfigError",
            ErrorKind::Io => "IoError",
        };
        match self.details {
            Some(ref details) => write!(f, "{}{{{}: {}}}", kind, self.code, details),
            None => write!(f, "{}{{{}}}", kind, self.code),
        }
    }
}

impl error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::new(ErrorKind::Io, ErrorCode::Io, Some(err.to_string()))
    }
}

pub type Result<T> = result::Result<T, Error>;

#[macro_export]
macro_rules! data_err(
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(
            ErrorKind::Data,
            ErrorCode::$code,
            Some($str),
        ))
    }}
);

#[macro_export]
macro_rules! config_err(
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(
            ErrorKind::Config,
            ErrorCode::$code,
            Some($str),
        ))
    }}
);

#[macro_export]
macro_rules! insufficient_policies_err(
    ($code:tt, $minimum:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(
            ErrorKind::InsufficientPolicies,
            ErrorCode::$code,
            Some(format!(
                "Before running the script, you must enable at least {}.",
                $minimum
            )),
        ))
    }}
);

#[test]
fn test_insufficient_policies_message() {
    let err: Result<()> = insufficient_policies_err!(NoPoliciesEnabled, "two policies");
    let err = err.unwrap_err();
    assert!(err.is_reported_in_script());
    assert_eq!(
        "Error: No policies were enabled in the policy catalog.  Before running the script, you must enable at least two policies.",
        err.message()
    );

    let err: Result<()> = insufficient_policies_err!(OnlyOnePolicyEnabled, "two policies");
    assert_eq!(
        "Error: Only one policy was enabled in the policy catalog.  Before running the script, you must enable at least two policies.",
        err.unwrap_err().message()
    );

    let err: Result<()> = insufficient_policies_err!(NoPoliciesEnabled, "one policy");
    assert_eq!(
        "Error: No policies were enabled in the policy catalog.  Before running the script, you must enable at least one policy.",
        err.unwrap_err().message()
    );
}

#[test]
fn test_error_display() {
    let err: Result<()> = data_err!(EmptySettings, "policy 'Feebate' has no settings".to_owned());
    let err = err.unwrap_err();
    assert_eq!(
        "DataError{empty_settings: policy 'Feebate' has no settings}",
        format!("{err}")
    );
    assert_eq!("Error: policy 'Feebate' has no settings", err.message());
    assert!(err.is_reported_in_script());

    let err: Error = std::io::Error::other("disk full").into();
    assert_eq!(ErrorKind::Io, err.kind);
    assert!(!err.is_reported_in_script());
}
