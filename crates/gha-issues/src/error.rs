use std::string::FromUtf8Error;

use gha_core::{ActionsError, ErrorKind};

#[derive(Debug, thiserror::Error)]
pub enum IssuesError {
    #[error(transparent)]
    Core(#[from] ActionsError),
    #[error("unknown placeholder used in comment template: {key}")]
    UnknownPlaceholder { key: String },
    #[error("malformed placeholder in comment template at byte {position}")]
    MalformedTemplate { position: usize },
    #[error("current workflow was not triggered by an issue or pull request")]
    NotIssueContext,
    #[error("current workflow was not triggered by a pull request")]
    NotPullRequestContext,
    #[error("gh command failed to start ({command}): {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("gh command returned non-zero exit ({command}) status={status:?}")]
    CommandFailed {
        command: String,
        status: Option<i32>,
        stdout: String,
        stderr: String,
    },
    #[error("gh command output was not valid UTF-8 ({command}, {stream}): {source}")]
    NonUtf8Output {
        command: String,
        stream: &'static str,
        #[source]
        source: FromUtf8Error,
    },
    #[error("unable to decode gh api response ({command}): {source}")]
    Decode {
        command: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("gh api contract violation: {message}")]
    ContractViolation { message: String },
}

impl IssuesError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IssuesError::Core(inner) => inner.kind(),
            IssuesError::UnknownPlaceholder { .. } | IssuesError::MalformedTemplate { .. } => {
                ErrorKind::Template
            }
            IssuesError::NotIssueContext | IssuesError::NotPullRequestContext => {
                ErrorKind::Context
            }
            IssuesError::Io { .. }
            | IssuesError::CommandFailed { .. }
            | IssuesError::NonUtf8Output { .. }
            | IssuesError::Decode { .. }
            | IssuesError::ContractViolation { .. } => ErrorKind::Client,
        }
    }

    /// True when `gh` reported that the requested resource does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            IssuesError::CommandFailed { stdout, stderr, .. } => {
                let combined = format!("{stdout}\n{stderr}").to_ascii_lowercase();
                combined.contains("http 404") || combined.contains("not found")
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IssuesError;
    use gha_core::{ActionsError, ErrorKind};
    use std::error::Error;

    #[test]
    fn core_errors_keep_their_kind_and_message() {
        let err: IssuesError = ActionsError::MissingEnv {
            name: "GITHUB_TOKEN".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.to_string(), "$GITHUB_TOKEN not defined");
    }

    #[test]
    fn template_and_context_variants_are_classified() {
        let err = IssuesError::UnknownPlaceholder {
            key: "foobar".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Template);
        assert!(err.to_string().contains("foobar"));

        assert_eq!(IssuesError::NotIssueContext.kind(), ErrorKind::Context);
        assert_eq!(IssuesError::NotPullRequestContext.kind(), ErrorKind::Context);
    }

    #[test]
    fn io_variant_includes_command_and_source() {
        let err = IssuesError::Io {
            command: "gh api repos/org/repo/issues/1".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing binary"),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("gh command failed to start (gh api repos/org/repo/issues/1)"));
        assert!(rendered.contains("missing binary"));
        assert!(err.source().is_some());
        assert_eq!(err.kind(), ErrorKind::Client);
    }

    #[test]
    fn not_found_is_detected_from_gh_output() {
        let missing = IssuesError::CommandFailed {
            command: "gh api repos/org/repo/pulls/9".to_string(),
            status: Some(1),
            stdout: "{\"message\":\"Not Found\"}".to_string(),
            stderr: "gh: Not Found (HTTP 404)".to_string(),
        };
        assert!(missing.is_not_found());

        let auth = IssuesError::CommandFailed {
            command: "gh api repos/org/repo/pulls/9".to_string(),
            status: Some(1),
            stdout: String::new(),
            stderr: "gh: Bad credentials (HTTP 401)".to_string(),
        };
        assert!(!auth.is_not_found());
        assert!(!IssuesError::NotIssueContext.is_not_found());
    }
}
