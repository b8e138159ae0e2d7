//! Error types for perfcompare

use crate::catalog::Repository;
use std::fmt;
use thiserror::Error;

/// Result type alias for perfcompare operations
pub type Result<T> = std::result::Result<T, Error>;

/// Query parameters of a comparison, as they appear in the URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    BaseRev,
    BaseRepo,
    NewRev,
    NewRepo,
    Framework,
}

impl Param {
    /// Name of the parameter in the query string
    pub fn as_str(&self) -> &'static str {
        match self {
            Param::BaseRev => "baseRev",
            Param::BaseRepo => "baseRepo",
            Param::NewRev => "newRev",
            Param::NewRepo => "newRepo",
            Param::Framework => "framework",
        }
    }

    /// Whether the parameter may appear several times in one query
    pub fn is_repeatable(&self) -> bool {
        matches!(self, Param::NewRev | Param::NewRepo)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for perfcompare
#[derive(Error, Debug)]
pub enum Error {
    #[error("The parameter {0} is missing.")]
    MissingParameter(Param),

    #[error("There should be as many \"{left}\" parameters as there are \"{right}\" parameters.")]
    ParameterCountMismatch { left: Param, right: Param },

    #[error("{}", unknown_value_message(.param, .value))]
    UnknownEnumValue { param: Param, value: String },

    #[error("The parameter {param} should be a number, but it is \"{value}\".")]
    NotANumber { param: Param, value: String },

    #[error("Error when requesting treeherder: {message}")]
    Remote { status: u16, message: String },

    #[error("No fake comparison results for commit {0}.")]
    FixtureNotFound(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Template error: {0}")]
    TemplateError(#[from] minijinja::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// True for errors raised while checking query parameters, before any I/O
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::MissingParameter(_)
                | Error::ParameterCountMismatch { .. }
                | Error::UnknownEnumValue { .. }
                | Error::NotANumber { .. }
        )
    }
}

// Repositories list the allowed values; frameworks are only numeric ids and
// get the shorter wording.
fn unknown_value_message(param: &Param, value: &str) -> String {
    match param {
        Param::Framework => format!("The parameter {} isn't a valid value: \"{}\".", param, value),
        _ => {
            let lead = if param.is_repeatable() {
                "Every parameter"
            } else {
                "The parameter"
            };
            let allowed: Vec<&str> = Repository::ALL.iter().map(|r| r.as_str()).collect();
            format!(
                "{} {} \"{}\" should be one of {}.",
                lead,
                param,
                value,
                allowed.join(", ")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameter_message() {
        let err = Error::MissingParameter(Param::BaseRev);
        assert_eq!(err.to_string(), "The parameter baseRev is missing.");
    }

    #[test]
    fn test_unknown_repository_message_singular_and_plural() {
        let base = Error::UnknownEnumValue {
            param: Param::BaseRepo,
            value: "UNKNOWN".to_string(),
        };
        assert_eq!(
            base.to_string(),
            "The parameter baseRepo \"UNKNOWN\" should be one of mozilla-central, try, mozilla-beta, mozilla-release, autoland, fenix."
        );

        let new = Error::UnknownEnumValue {
            param: Param::NewRepo,
            value: "UNKNOWN".to_string(),
        };
        assert!(new.to_string().starts_with("Every parameter newRepo \"UNKNOWN\""));
    }

    #[test]
    fn test_unknown_framework_message() {
        let err = Error::UnknownEnumValue {
            param: Param::Framework,
            value: "25".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "The parameter framework isn't a valid value: \"25\"."
        );
    }

    #[test]
    fn test_remote_message() {
        let err = Error::Remote {
            status: 500,
            message: "(500) Internal Server Error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Error when requesting treeherder: (500) Internal Server Error"
        );
        assert!(!err.is_validation());
    }
}
