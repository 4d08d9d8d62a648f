//! Events that can trigger a workflow and the activity types each one reports.

use crate::error::ActionsError;

pub mod event {
    pub const CHECK_RUN: &str = "check_run";
    pub const CHECK_SUITE: &str = "check_suite";
    pub const CREATE: &str = "create";
    pub const DELETE: &str = "delete";
    pub const DEPLOYMENT: &str = "deployment";
    pub const DEPLOYMENT_STATUS: &str = "deployment_status";
    pub const FORK: &str = "fork";
    pub const GOLLUM: &str = "gollum";
    pub const ISSUE_COMMENT: &str = "issue_comment";
    pub const ISSUES: &str = "issues";
    pub const LABEL: &str = "label";
    pub const MEMBER: &str = "member";
    pub const MILESTONE: &str = "milestone";
    pub const PAGE_BUILD: &str = "page_build";
    pub const PROJECT: &str = "project";
    pub const PROJECT_CARD: &str = "project_card";
    pub const PROJECT_COLUMN: &str = "project_column";
    pub const PUBLIC: &str = "public";
    pub const PULL_REQUEST: &str = "pull_request";
    pub const PULL_REQUEST_REVIEW: &str = "pull_request_review";
    pub const PULL_REQUEST_REVIEW_COMMENT: &str = "pull_request_review_comment";
    pub const PUSH: &str = "push";
    pub const RELEASE: &str = "release";
    pub const REPOSITORY_DISPATCH: &str = "repository_dispatch";
    pub const SCHEDULE: &str = "schedule";
    pub const STATUS: &str = "status";
    pub const WATCH: &str = "watch";
}

pub mod activity {
    pub const ADDED: &str = "added";
    pub const ASSIGNED: &str = "assigned";
    pub const CLOSED: &str = "closed";
    pub const COMPLETED: &str = "completed";
    pub const CONVERTED: &str = "converted";
    pub const CREATED: &str = "created";
    pub const DELETED: &str = "deleted";
    pub const DEMILESTONED: &str = "demilestoned";
    pub const DISMISSED: &str = "dismissed";
    pub const EDITED: &str = "edited";
    pub const LABELED: &str = "labeled";
    pub const LOCKED: &str = "locked";
    pub const MILESTONED: &str = "milestoned";
    pub const MOVED: &str = "moved";
    pub const OPENED: &str = "opened";
    pub const PINNED: &str = "pinned";
    pub const PRERELEASED: &str = "prereleased";
    pub const PUBLISHED: &str = "published";
    pub const READY_FOR_REVIEW: &str = "ready_for_review";
    pub const REOPENED: &str = "reopened";
    pub const REREQUESTED: &str = "rerequested";
    pub const REQUESTED: &str = "requested";
    pub const REQUESTED_ACTION: &str = "requested_action";
    pub const REVIEW_REQUEST_REMOVED: &str = "review_request_removed";
    pub const REVIEW_REQUESTED: &str = "review_requested";
    pub const STARTED: &str = "started";
    pub const SUBMITTED: &str = "submitted";
    pub const SYNCHRONIZE: &str = "synchronize";
    pub const TRANSFERRED: &str = "transferred";
    pub const UNASSIGNED: &str = "unassigned";
    pub const UPDATED: &str = "updated";
    pub const UNLABELED: &str = "unlabeled";
    pub const UNLOCKED: &str = "unlocked";
    pub const UNPINNED: &str = "unpinned";
    pub const UNPUBLISHED: &str = "unpublished";
}

use activity::*;
use event::*;

/// Every known event name with its allowed activity types. An empty slice
/// marks an event that carries no activity type.
pub const EVENT_TRIGGERS: &[(&str, &[&str])] = &[
    // webhook events
    (
        CHECK_RUN,
        &[CREATED, COMPLETED, REREQUESTED, REQUESTED_ACTION],
    ),
    (CHECK_SUITE, &[COMPLETED, REREQUESTED, REQUESTED]),
    (CREATE, &[]),
    (DELETE, &[]),
    (DEPLOYMENT, &[]),
    (DEPLOYMENT_STATUS, &[]),
    (FORK, &[]),
    (GOLLUM, &[]),
    (ISSUE_COMMENT, &[CREATED, DELETED, EDITED]),
    (
        ISSUES,
        &[
            ASSIGNED,
            CLOSED,
            DELETED,
            DEMILESTONED,
            EDITED,
            LABELED,
            LOCKED,
            MILESTONED,
            OPENED,
            PINNED,
            REOPENED,
            TRANSFERRED,
            UNASSIGNED,
            UNLABELED,
            UNLOCKED,
            UNPINNED,
        ],
    ),
    (LABEL, &[CREATED, DELETED, EDITED]),
    (MEMBER, &[ADDED, DELETED, EDITED]),
    (MILESTONE, &[CLOSED, CREATED, DELETED, EDITED, OPENED]),
    (PAGE_BUILD, &[]),
    (
        PROJECT,
        &[CLOSED, CREATED, DELETED, EDITED, REOPENED, UPDATED],
    ),
    (PROJECT_CARD, &[CONVERTED, CREATED, DELETED, EDITED, MOVED]),
    (PROJECT_COLUMN, &[CREATED, DELETED, MOVED, UPDATED]),
    (PUBLIC, &[]),
    (
        PULL_REQUEST,
        &[
            ASSIGNED,
            CLOSED,
            EDITED,
            LABELED,
            LOCKED,
            OPENED,
            READY_FOR_REVIEW,
            REOPENED,
            REVIEW_REQUEST_REMOVED,
            REVIEW_REQUESTED,
            SYNCHRONIZE,
            UNASSIGNED,
            UNLABELED,
            UNLOCKED,
        ],
    ),
    (PULL_REQUEST_REVIEW, &[DISMISSED, EDITED, SUBMITTED]),
    (PULL_REQUEST_REVIEW_COMMENT, &[CREATED, DELETED, EDITED]),
    (PUSH, &[]),
    (
        RELEASE,
        &[CREATED, DELETED, EDITED, PRERELEASED, PUBLISHED, UNPUBLISHED],
    ),
    (STATUS, &[]),
    (WATCH, &[STARTED]),
    // scheduled events
    (SCHEDULE, &[]),
    // external events
    (REPOSITORY_DISPATCH, &[]),
];

pub fn activity_types(event_name: &str) -> Option<&'static [&'static str]> {
    EVENT_TRIGGERS
        .iter()
        .find(|(name, _)| *name == event_name)
        .map(|(_, activities)| *activities)
}

pub fn is_known_event(event_name: &str) -> bool {
    activity_types(event_name).is_some()
}

pub fn verify_event_name(event_name: &str) -> Result<(), ActionsError> {
    if is_known_event(event_name) {
        return Ok(());
    }
    Err(ActionsError::UnknownEvent {
        event: event_name.to_string(),
    })
}

/// Checks `activity_type` against the allowed set of `event_name`, which must
/// itself be a known event.
pub fn verify_activity_type(event_name: &str, activity_type: &str) -> Result<(), ActionsError> {
    let allowed = activity_types(event_name).ok_or_else(|| ActionsError::UnknownEvent {
        event: event_name.to_string(),
    })?;
    if allowed.contains(&activity_type) {
        return Ok(());
    }
    Err(ActionsError::UnknownActivity {
        event: event_name.to_string(),
        activity: activity_type.to_string(),
    })
}
