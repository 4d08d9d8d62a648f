use tracing::debug;

use crate::env::{required_var, EnvSource, GITHUB_EVENT_NAME};
use crate::error::ActionsError;
use crate::loader::EventContext;
use crate::table::{activity_types, verify_activity_type, verify_event_name};

impl<E: EnvSource> EventContext<E> {
    /// Name of the event that triggered the current workflow.
    pub fn event_name(&self) -> Result<String, ActionsError> {
        let event_name = required_var(self.env(), GITHUB_EVENT_NAME)?;
        verify_event_name(&event_name)?;
        Ok(event_name)
    }

    /// Activity type (`action` field) of the triggering event.
    ///
    /// Always fails for events without activity types, such as `push`.
    pub fn activity_type(&self) -> Result<String, ActionsError> {
        let event_name = self.event_name()?;
        let payload = self.event_data()?;
        let activity_type = payload.action()?;
        verify_activity_type(&event_name, activity_type)?;
        Ok(activity_type.to_string())
    }

    /// `event_name.activity_type` of the triggering event.
    pub fn event_trigger(&self) -> Result<String, ActionsError> {
        let event_name = self.event_name()?;
        let activity_type = self.activity_type()?;
        let trigger = format!("{event_name}.{activity_type}");
        debug!(%trigger, "resolved event trigger");
        Ok(trigger)
    }

    /// Whether the current workflow was triggered by `event_name` and, when
    /// given, `activity_type`. Unknown names or types are errors, not `false`.
    pub fn triggered_by(
        &self,
        event_name: &str,
        activity_type: Option<&str>,
    ) -> Result<bool, ActionsError> {
        verify_event_name(event_name)?;

        match activity_type {
            None => {
                let current = self.event_name()?;
                if activity_types(&current).is_some_and(|allowed| allowed.is_empty()) {
                    return Ok(current == event_name);
                }
                Ok(self.event_trigger()?.starts_with(&format!("{event_name}.")))
            }
            Some(activity_type) => {
                verify_activity_type(event_name, activity_type)?;
                Ok(self.event_trigger()? == format!("{event_name}.{activity_type}"))
            }
        }
    }
}
