use gha_core::{github_token, EnvSource};

use crate::command::{ApiRequest, GhCli};
use crate::error::IssuesError;
use crate::types::{CombinedStatus, Issue, IssueComment, IssueRef, PullRequest, ReviewComment};

/// Issue/pull-request API used by [`crate::IssueQueries`].
pub trait IssueTracker {
    fn issue(&self, target: &IssueRef) -> Result<Issue, IssuesError>;
    fn issue_comments(&self, target: &IssueRef) -> Result<Vec<IssueComment>, IssuesError>;
    fn pull_request(&self, target: &IssueRef) -> Result<PullRequest, IssuesError>;
    fn review_comments(&self, target: &IssueRef) -> Result<Vec<ReviewComment>, IssuesError>;
    fn combined_status(&self, repo: &str, sha: &str) -> Result<CombinedStatus, IssuesError>;
    fn create_comment(&self, target: &IssueRef, body: &str) -> Result<IssueComment, IssuesError>;
}

impl<T: IssueTracker + ?Sized> IssueTracker for &T {
    fn issue(&self, target: &IssueRef) -> Result<Issue, IssuesError> {
        (**self).issue(target)
    }

    fn issue_comments(&self, target: &IssueRef) -> Result<Vec<IssueComment>, IssuesError> {
        (**self).issue_comments(target)
    }

    fn pull_request(&self, target: &IssueRef) -> Result<PullRequest, IssuesError> {
        (**self).pull_request(target)
    }

    fn review_comments(&self, target: &IssueRef) -> Result<Vec<ReviewComment>, IssuesError> {
        (**self).review_comments(target)
    }

    fn combined_status(&self, repo: &str, sha: &str) -> Result<CombinedStatus, IssuesError> {
        (**self).combined_status(repo, sha)
    }

    fn create_comment(&self, target: &IssueRef, body: &str) -> Result<IssueComment, IssuesError> {
        (**self).create_comment(target, body)
    }
}

/// [`IssueTracker`] backed by the `gh` CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhClient {
    pub cli: GhCli,
}

impl GhClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            cli: GhCli::default().with_token(token),
        }
    }

    pub fn with_cli(cli: GhCli) -> Self {
        Self { cli }
    }

    /// Authenticates with `$GITHUB_TOKEN`.
    pub fn from_env<E: EnvSource + ?Sized>(env: &E) -> Result<Self, IssuesError> {
        Ok(Self::new(github_token(env)?))
    }
}

impl IssueTracker for GhClient {
    fn issue(&self, target: &IssueRef) -> Result<Issue, IssuesError> {
        self.cli.fetch(&ApiRequest::Issue {
            repo: target.repo.clone(),
            number: target.number,
        })
    }

    fn issue_comments(&self, target: &IssueRef) -> Result<Vec<IssueComment>, IssuesError> {
        self.cli.fetch_all(&ApiRequest::IssueComments {
            repo: target.repo.clone(),
            number: target.number,
        })
    }

    fn pull_request(&self, target: &IssueRef) -> Result<PullRequest, IssuesError> {
        self.cli.fetch(&ApiRequest::PullRequest {
            repo: target.repo.clone(),
            number: target.number,
        })
    }

    fn review_comments(&self, target: &IssueRef) -> Result<Vec<ReviewComment>, IssuesError> {
        self.cli.fetch_all(&ApiRequest::ReviewComments {
            repo: target.repo.clone(),
            number: target.number,
        })
    }

    fn combined_status(&self, repo: &str, sha: &str) -> Result<CombinedStatus, IssuesError> {
        self.cli.fetch(&ApiRequest::CombinedStatus {
            repo: repo.to_string(),
            sha: sha.to_string(),
        })
    }

    fn create_comment(&self, target: &IssueRef, body: &str) -> Result<IssueComment, IssuesError> {
        self.cli.fetch(&ApiRequest::CreateIssueComment {
            repo: target.repo.clone(),
            number: target.number,
            body: body.to_string(),
        })
    }
}
