use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Coarse failure category shared by every crate in the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Parse,
    Validation,
    Template,
    Context,
    Client,
}

#[derive(Debug, thiserror::Error)]
pub enum ActionsError {
    #[error("${name} not defined")]
    MissingEnv { name: String },
    #[error("failed to read event data at {path}: {source}")]
    EventRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse event data at {path}: {source}")]
    EventParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown event name encountered: {event}")]
    UnknownEvent { event: String },
    #[error("unknown type of '{event}' event encountered: {activity}")]
    UnknownActivity { event: String, activity: String },
    #[error("event data has no field at {path}")]
    MissingField { path: String },
    #[error("event data field at {path} is not {expected}")]
    FieldType {
        path: String,
        expected: &'static str,
    },
}

impl ActionsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ActionsError::MissingEnv { .. } | ActionsError::EventRead { .. } => {
                ErrorKind::Configuration
            }
            ActionsError::EventParse { .. } => ErrorKind::Parse,
            ActionsError::UnknownEvent { .. }
            | ActionsError::UnknownActivity { .. }
            | ActionsError::MissingField { .. }
            | ActionsError::FieldType { .. } => ErrorKind::Validation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ActionsError, ErrorKind};
    use std::error::Error;
    use std::path::PathBuf;

    #[test]
    fn missing_env_names_the_variable() {
        let err = ActionsError::MissingEnv {
            name: "GITHUB_EVENT_PATH".to_string(),
        };
        assert_eq!(err.to_string(), "$GITHUB_EVENT_PATH not defined");
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn read_and_parse_failures_keep_path_and_source() {
        let read = ActionsError::EventRead {
            path: PathBuf::from("/tmp/event.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(read.to_string().contains("/tmp/event.json"));
        assert!(read.source().is_some());
        assert_eq!(read.kind(), ErrorKind::Configuration);

        let json_err = serde_json::from_str::<serde_json::Value>("{").expect_err("bad json");
        let parse = ActionsError::EventParse {
            path: PathBuf::from("/tmp/event.json"),
            source: json_err,
        };
        assert!(parse.source().is_some());
        assert_eq!(parse.kind(), ErrorKind::Parse);
    }

    #[test]
    fn validation_variants_map_to_validation_kind() {
        let errs = [
            ActionsError::UnknownEvent {
                event: "nope".to_string(),
            },
            ActionsError::UnknownActivity {
                event: "issues".to_string(),
                activity: "created".to_string(),
            },
            ActionsError::MissingField {
                path: "action".to_string(),
            },
            ActionsError::FieldType {
                path: "issue.number".to_string(),
                expected: "an unsigned integer",
            },
        ];
        for err in errs {
            assert_eq!(err.kind(), ErrorKind::Validation, "{err}");
        }
    }

    #[test]
    fn unknown_activity_mentions_event_and_activity() {
        let err = ActionsError::UnknownActivity {
            event: "issue_comment".to_string(),
            activity: "opened".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unknown type of 'issue_comment' event encountered: opened"
        );
    }
}
