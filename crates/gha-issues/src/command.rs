use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::IssuesError;

const ACCEPT_HEADER: &str = "Accept: application/vnd.github+json";

/// The `gh api` calls this crate is allowed to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    Issue { repo: String, number: u64 },
    IssueComments { repo: String, number: u64 },
    PullRequest { repo: String, number: u64 },
    ReviewComments { repo: String, number: u64 },
    CombinedStatus { repo: String, sha: String },
    CreateIssueComment { repo: String, number: u64, body: String },
}

impl ApiRequest {
    pub fn endpoint(&self) -> String {
        match self {
            ApiRequest::Issue { repo, number } => format!("repos/{repo}/issues/{number}"),
            ApiRequest::IssueComments { repo, number }
            | ApiRequest::CreateIssueComment { repo, number, .. } => {
                format!("repos/{repo}/issues/{number}/comments")
            }
            ApiRequest::PullRequest { repo, number } => format!("repos/{repo}/pulls/{number}"),
            ApiRequest::ReviewComments { repo, number } => {
                format!("repos/{repo}/pulls/{number}/comments")
            }
            ApiRequest::CombinedStatus { repo, sha } => {
                format!("repos/{repo}/commits/{sha}/status")
            }
        }
    }

    /// List endpoints are fetched with `--paginate --slurp`, which yields an
    /// array of pages.
    pub fn is_paginated(&self) -> bool {
        matches!(
            self,
            ApiRequest::IssueComments { .. } | ApiRequest::ReviewComments { .. }
        )
    }

    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["api".into(), "-H".into(), ACCEPT_HEADER.into()];
        if self.is_paginated() {
            args.push("--paginate".into());
            args.push("--slurp".into());
        }
        if let ApiRequest::CreateIssueComment { body, .. } = self {
            args.push("-X".into());
            args.push("POST".into());
            args.push("-f".into());
            args.push(format!("body={body}").into());
        }
        args.push(self.endpoint().into());
        args
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhOutput {
    pub stdout: String,
    pub stderr: String,
}

#[derive(Clone, PartialEq, Eq)]
pub struct GhCli {
    pub binary: PathBuf,
    token: Option<String>,
}

impl fmt::Debug for GhCli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GhCli")
            .field("binary", &self.binary)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl Default for GhCli {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("gh"),
            token: None,
        }
    }
}

impl GhCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            token: None,
        }
    }

    /// Token handed to `gh` as `GH_TOKEN`; never rendered into commands.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn run(&self, request: &ApiRequest) -> Result<GhOutput, IssuesError> {
        validate_contract(request)?;

        let args = request.args();
        let mut command = Command::new(&self.binary);
        command.args(&args);
        if let Some(token) = &self.token {
            command.env("GH_TOKEN", token);
        }

        let rendered = render_command(&self.binary, &args);
        debug!(command = %rendered, "running gh");
        let output = command.output().map_err(|source| IssuesError::Io {
            command: rendered.clone(),
            source,
        })?;

        let stdout =
            String::from_utf8(output.stdout).map_err(|source| IssuesError::NonUtf8Output {
                command: rendered.clone(),
                stream: "stdout",
                source,
            })?;
        let stderr =
            String::from_utf8(output.stderr).map_err(|source| IssuesError::NonUtf8Output {
                command: rendered.clone(),
                stream: "stderr",
                source,
            })?;

        if !output.status.success() {
            return Err(IssuesError::CommandFailed {
                command: rendered,
                status: output.status.code(),
                stdout,
                stderr,
            });
        }

        Ok(GhOutput { stdout, stderr })
    }

    pub fn fetch<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, IssuesError> {
        let output = self.run(request)?;
        decode(request, &output.stdout)
    }

    /// Fetches every page of a list endpoint.
    pub fn fetch_all<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<Vec<T>, IssuesError> {
        if !request.is_paginated() {
            return Err(IssuesError::ContractViolation {
                message: format!("{} is not a list endpoint", request.endpoint()),
            });
        }
        let output = self.run(request)?;
        let pages: Vec<Vec<T>> = decode(request, &output.stdout)?;
        Ok(pages.into_iter().flatten().collect())
    }
}

fn decode<T: DeserializeOwned>(request: &ApiRequest, stdout: &str) -> Result<T, IssuesError> {
    serde_json::from_str(stdout).map_err(|source| IssuesError::Decode {
        command: format!("gh api {}", request.endpoint()),
        source,
    })
}

fn validate_contract(request: &ApiRequest) -> Result<(), IssuesError> {
    let (repo, problem) = match request {
        ApiRequest::Issue { repo, number }
        | ApiRequest::IssueComments { repo, number }
        | ApiRequest::PullRequest { repo, number }
        | ApiRequest::ReviewComments { repo, number } => {
            (repo, (*number == 0).then_some("issue number must be positive"))
        }
        ApiRequest::CreateIssueComment { repo, number, body } => {
            let problem = if *number == 0 {
                Some("issue number must be positive")
            } else if body.trim().is_empty() {
                Some("comment body must not be empty")
            } else {
                None
            };
            (repo, problem)
        }
        ApiRequest::CombinedStatus { repo, sha } => {
            let valid_sha = !sha.is_empty() && sha.chars().all(|c| c.is_ascii_hexdigit());
            (repo, (!valid_sha).then_some("commit sha must be hexadecimal"))
        }
    };

    if !looks_like_repo_name(repo) {
        return Err(IssuesError::ContractViolation {
            message: format!("repository must be owner/name, got {repo:?}"),
        });
    }
    if let Some(problem) = problem {
        return Err(IssuesError::ContractViolation {
            message: format!("{problem}: {}", request.endpoint()),
        });
    }
    Ok(())
}

fn looks_like_repo_name(repo: &str) -> bool {
    let Some((owner, name)) = repo.split_once('/') else {
        return false;
    };
    let valid_part = |part: &str| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    };
    valid_part(owner) && valid_part(name)
}

fn render_command(binary: &Path, args: &[OsString]) -> String {
    let mut rendered = binary.to_string_lossy().into_owned();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(&arg.to_string_lossy());
    }
    rendered
}
