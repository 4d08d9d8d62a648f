use gha_core::{ActionsError, EnvSource, EventContext, EventPayload};
use tracing::{debug, info};

use crate::client::{GhClient, IssueTracker};
use crate::error::IssuesError;
use crate::template::{render_template, TemplateValues};
use crate::types::{CommitState, IssueComment, IssueRef, Milestone};

/// Queries about the issue or pull request that triggered the current
/// workflow.
#[derive(Debug)]
pub struct IssueQueries<'a, E, T> {
    context: &'a EventContext<E>,
    tracker: T,
}

impl<'a, E: EnvSource> IssueQueries<'a, E, GhClient> {
    /// Uses the `gh` CLI authenticated with `$GITHUB_TOKEN`.
    pub fn from_env(context: &'a EventContext<E>) -> Result<Self, IssuesError> {
        let tracker = GhClient::from_env(context.env())?;
        Ok(Self::new(context, tracker))
    }
}

impl<'a, E: EnvSource, T: IssueTracker> IssueQueries<'a, E, T> {
    pub fn new(context: &'a EventContext<E>, tracker: T) -> Self {
        Self { context, tracker }
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    pub fn issue_or_pr_context(&self) -> Result<bool, IssuesError> {
        Ok(self.context.event_data()?.contains_key("issue"))
    }

    pub fn pr_context(&self) -> Result<bool, IssuesError> {
        Ok(self
            .context
            .event_data()?
            .contains_path(&["issue", "pull_request"]))
    }

    /// Bodies of all comments on the triggering issue or pull request.
    pub fn issue_comments(&self) -> Result<Vec<String>, IssuesError> {
        let target = self.issue_target()?;
        let comments = self.tracker.issue_comments(&target)?;
        Ok(comments.into_iter().map(|c| c.body).collect())
    }

    /// Bodies of all review comments on the triggering pull request.
    pub fn pr_review_comments(&self) -> Result<Vec<String>, IssuesError> {
        let target = self.pr_target()?;
        let comments = self.tracker.review_comments(&target)?;
        Ok(comments.into_iter().map(|c| c.body).collect())
    }

    /// Combined status of the head commit of the triggering pull request.
    pub fn pr_status(&self) -> Result<CommitState, IssuesError> {
        let target = self.pr_target()?;
        let pr = self.tracker.pull_request(&target)?;
        let status = self.tracker.combined_status(&target.repo, &pr.head.sha)?;
        Ok(status.state)
    }

    /// Sorted label names, read from the event data.
    pub fn label_names(&self) -> Result<Vec<String>, IssuesError> {
        let payload = self.context.event_data()?;
        if !payload.contains_key("issue") {
            return Err(IssuesError::NotIssueContext);
        }

        let mut names = payload
            .array_at(&["issue", "labels"])?
            .iter()
            .enumerate()
            .map(|(idx, label)| {
                label
                    .get("name")
                    .and_then(|name| name.as_str())
                    .map(str::to_string)
                    .ok_or_else(|| ActionsError::FieldType {
                        path: format!("issue.labels[{idx}].name"),
                        expected: "a string",
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        names.sort();
        Ok(names)
    }

    /// Milestone of the triggering issue as the API reports it now. Falls back
    /// to the event data when the issue is gone, as after `issues.deleted`.
    pub fn milestone(&self) -> Result<Option<Milestone>, IssuesError> {
        let payload = self.context.event_data()?;
        let target = issue_ref(&payload)?;
        match self.tracker.issue(&target) {
            Ok(issue) => Ok(issue.milestone),
            Err(err) if err.is_not_found() => {
                debug!(repo = %target.repo, number = target.number, "issue not found, using event milestone");
                milestone_from_payload(&payload)
            }
            Err(err) => Err(err),
        }
    }

    /// Fills `template` from the event data and posts it on the triggering
    /// issue or pull request.
    pub fn post_comment(&self, template: &str) -> Result<IssueComment, IssuesError> {
        let payload = self.context.event_data()?;
        let body = render_template(template, &TemplateValues::from_payload(&payload))?;
        let target = issue_ref(&payload)?;
        let comment = self.tracker.create_comment(&target, &body)?;
        info!(repo = %target.repo, number = target.number, comment_id = comment.id, "posted comment");
        Ok(comment)
    }

    fn issue_target(&self) -> Result<IssueRef, IssuesError> {
        let payload = self.context.event_data()?;
        issue_ref(&payload)
    }

    fn pr_target(&self) -> Result<IssueRef, IssuesError> {
        let payload = self.context.event_data()?;
        if !payload.contains_path(&["issue", "pull_request"]) {
            return Err(IssuesError::NotPullRequestContext);
        }
        issue_ref(&payload)
    }
}

fn milestone_from_payload(payload: &EventPayload) -> Result<Option<Milestone>, IssuesError> {
    let Some(value) = payload.get("issue").and_then(|issue| issue.get("milestone")) else {
        return Ok(None);
    };
    serde_json::from_value(value.clone()).map_err(|_| {
        ActionsError::FieldType {
            path: "issue.milestone".to_string(),
            expected: "a milestone object",
        }
        .into()
    })
}

fn issue_ref(payload: &EventPayload) -> Result<IssueRef, IssuesError> {
    if !payload.contains_key("issue") {
        return Err(IssuesError::NotIssueContext);
    }
    Ok(IssueRef {
        repo: payload.str_at(&["repository", "full_name"])?.to_string(),
        number: payload.u64_at(&["issue", "number"])?,
    })
}
