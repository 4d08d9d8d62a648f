//! Access to the environment a workflow step runs in.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ActionsError;

// Variables set by the Actions runner for every step.
pub const GITHUB_ACTOR: &str = "GITHUB_ACTOR";
pub const GITHUB_ACTION: &str = "GITHUB_ACTION";
pub const GITHUB_ACTIONS: &str = "GITHUB_ACTIONS";
pub const GITHUB_EVENT_NAME: &str = "GITHUB_EVENT_NAME";
pub const GITHUB_EVENT_PATH: &str = "GITHUB_EVENT_PATH";
pub const GITHUB_BASE_REF: &str = "GITHUB_BASE_REF";
pub const GITHUB_HEAD_REF: &str = "GITHUB_HEAD_REF";
pub const GITHUB_REF: &str = "GITHUB_REF";
pub const GITHUB_REPOSITORY: &str = "GITHUB_REPOSITORY";
pub const GITHUB_SHA: &str = "GITHUB_SHA";
pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const GITHUB_WORKFLOW: &str = "GITHUB_WORKFLOW";
pub const GITHUB_WORKSPACE: &str = "GITHUB_WORKSPACE";

/// Source of environment variables.
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// In-memory environment snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.vars.remove(name)
    }
}

impl EnvSource for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

impl<E: EnvSource + ?Sized> EnvSource for &E {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

pub fn required_var<E: EnvSource + ?Sized>(env: &E, name: &str) -> Result<String, ActionsError> {
    env.var(name).ok_or_else(|| ActionsError::MissingEnv {
        name: name.to_string(),
    })
}

pub fn github_token<E: EnvSource + ?Sized>(env: &E) -> Result<String, ActionsError> {
    required_var(env, GITHUB_TOKEN)
}

/// Snapshot of the standard variables describing the current workflow run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubContext {
    pub actor: String,
    pub action: String,
    pub event_name: String,
    pub event_path: String,
    pub repository: String,
    pub sha: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub workflow: String,
    pub workspace: String,
    /// Only set for pull request events.
    #[serde(default)]
    pub base_ref: Option<String>,
    #[serde(default)]
    pub head_ref: Option<String>,
}

impl GithubContext {
    pub fn from_env<E: EnvSource + ?Sized>(env: &E) -> Result<Self, ActionsError> {
        Ok(Self {
            actor: required_var(env, GITHUB_ACTOR)?,
            action: required_var(env, GITHUB_ACTION)?,
            event_name: required_var(env, GITHUB_EVENT_NAME)?,
            event_path: required_var(env, GITHUB_EVENT_PATH)?,
            repository: required_var(env, GITHUB_REPOSITORY)?,
            sha: required_var(env, GITHUB_SHA)?,
            git_ref: required_var(env, GITHUB_REF)?,
            workflow: required_var(env, GITHUB_WORKFLOW)?,
            workspace: required_var(env, GITHUB_WORKSPACE)?,
            base_ref: non_empty(env.var(GITHUB_BASE_REF)),
            head_ref: non_empty(env.var(GITHUB_HEAD_REF)),
        })
    }

    /// Splits `owner/name` from `GITHUB_REPOSITORY`.
    pub fn repository_parts(&self) -> Option<(&str, &str)> {
        let (owner, name) = self.repository.split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some((owner, name))
    }
}

pub fn running_in_actions<E: EnvSource + ?Sized>(env: &E) -> bool {
    env.var(GITHUB_ACTIONS).as_deref() == Some("true")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn full_env() -> MapEnv {
        MapEnv::new()
            .with(GITHUB_ACTOR, "alice")
            .with(GITHUB_ACTION, "run1")
            .with(GITHUB_EVENT_NAME, "pull_request")
            .with(GITHUB_EVENT_PATH, "/github/workflow/event.json")
            .with(GITHUB_REPOSITORY, "org/repo")
            .with(GITHUB_SHA, "0123abcd")
            .with(GITHUB_REF, "refs/pull/7/merge")
            .with(GITHUB_WORKFLOW, "CI")
            .with(GITHUB_WORKSPACE, "/github/workspace")
            .with(GITHUB_BASE_REF, "main")
            .with(GITHUB_HEAD_REF, "")
    }

    #[test]
    fn required_var_reports_missing_variable() {
        let env = MapEnv::new();
        let err = required_var(&env, "TEST123").expect_err("unset variable");
        assert!(matches!(err, ActionsError::MissingEnv { ref name } if name == "TEST123"));
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let env = env.with("TEST123", "test123");
        assert_eq!(required_var(&env, "TEST123").expect("set variable"), "test123");
    }

    #[test]
    fn github_token_reads_token_variable() {
        let mut env = MapEnv::new();
        assert!(github_token(&env).is_err());

        env.set(GITHUB_TOKEN, "thisisjustatest");
        assert_eq!(github_token(&env).expect("token"), "thisisjustatest");
    }

    #[test]
    fn context_captures_standard_variables() {
        let ctx = GithubContext::from_env(&full_env()).expect("context");
        assert_eq!(ctx.actor, "alice");
        assert_eq!(ctx.git_ref, "refs/pull/7/merge");
        assert_eq!(ctx.base_ref.as_deref(), Some("main"));
        assert_eq!(ctx.head_ref, None);
        assert_eq!(ctx.repository_parts(), Some(("org", "repo")));
    }

    #[test]
    fn context_requires_core_variables() {
        let mut env = full_env();
        env.remove(GITHUB_SHA);
        let err = GithubContext::from_env(&env).expect_err("missing sha");
        assert!(matches!(err, ActionsError::MissingEnv { ref name } if name == GITHUB_SHA));
    }

    #[test]
    fn context_serializes_ref_field_name() {
        let ctx = GithubContext::from_env(&full_env()).expect("context");
        let json = serde_json::to_value(&ctx).expect("serialize");
        assert_eq!(json["ref"], "refs/pull/7/merge");
    }

    #[test]
    fn repository_parts_rejects_malformed_names() {
        let mut ctx = GithubContext::from_env(&full_env()).expect("context");
        ctx.repository = "no-slash".to_string();
        assert_eq!(ctx.repository_parts(), None);
        ctx.repository = "a/b/c".to_string();
        assert_eq!(ctx.repository_parts(), None);
    }

    #[test]
    fn running_in_actions_checks_flag_value() {
        assert!(!running_in_actions(&MapEnv::new()));
        assert!(running_in_actions(&MapEnv::new().with(GITHUB_ACTIONS, "true")));
        assert!(!running_in_actions(&MapEnv::new().with(GITHUB_ACTIONS, "1")));
    }

    #[test]
    fn borrowed_sources_delegate() {
        let env = MapEnv::new().with("X", "1");
        let borrowed: &MapEnv = &env;
        assert_eq!(EnvSource::var(&borrowed, "X").as_deref(), Some("1"));
    }
}
