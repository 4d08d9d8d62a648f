//! `%(name)s` comment templates filled from event data.

use std::collections::BTreeMap;

use gha_core::EventPayload;

use crate::error::IssuesError;

pub const COMMENT_BODY: &str = "comment_body";
pub const SENDER_LOGIN: &str = "sender_login";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateValues {
    values: BTreeMap<String, String>,
}

impl TemplateValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// `comment_body` and `sender_login`, each only when the event carries it.
    pub fn from_payload(payload: &EventPayload) -> Self {
        let mut values = Self::new();
        if let Ok(body) = payload.str_at(&["comment", "body"]) {
            values.insert(COMMENT_BODY, body);
        }
        if let Ok(login) = payload.str_at(&["sender", "login"]) {
            values.insert(SENDER_LOGIN, login);
        }
        values
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// Replaces every `%(name)s` with its value and `%%` with `%`. Any other `%`
/// is copied as-is.
pub fn render_template(template: &str, values: &TemplateValues) -> Result<String, IssuesError> {
    let mut out = String::with_capacity(template.len());
    let mut idx = 0;

    while let Some(offset) = template[idx..].find('%') {
        let start = idx + offset;
        out.push_str(&template[idx..start]);
        let after = &template[start + 1..];

        if after.starts_with('%') {
            out.push('%');
            idx = start + 2;
            continue;
        }

        let Some(placeholder) = after.strip_prefix('(') else {
            out.push('%');
            idx = start + 1;
            continue;
        };

        let close = placeholder
            .find(')')
            .ok_or(IssuesError::MalformedTemplate { position: start })?;
        if !placeholder[close + 1..].starts_with('s') {
            return Err(IssuesError::MalformedTemplate { position: start });
        }
        let key = &placeholder[..close];
        let value = values
            .get(key)
            .ok_or_else(|| IssuesError::UnknownPlaceholder {
                key: key.to_string(),
            })?;
        out.push_str(value);
        // `%` `(` key `)` `s`
        idx = start + close + 4;
    }

    out.push_str(&template[idx..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{render_template, TemplateValues, COMMENT_BODY, SENDER_LOGIN};
    use crate::error::IssuesError;
    use gha_core::{ErrorKind, EventPayload};

    fn values() -> TemplateValues {
        TemplateValues::from_payload(&EventPayload::new(json!({
            "comment": {"body": "testing, 1, 2, 3"},
            "sender": {"login": "alice"},
        })))
    }

    #[test]
    fn fills_named_placeholders() {
        let rendered = render_template(
            "Reply to '%(comment_body)s' from @%(sender_login)s",
            &values(),
        )
        .expect("render");
        assert_eq!(rendered, "Reply to 'testing, 1, 2, 3' from @alice");
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(
            render_template("this is just a test", &values()).expect("render"),
            "this is just a test"
        );
        assert_eq!(render_template("", &values()).expect("render"), "");
    }

    #[test]
    fn percent_escapes_and_stray_percents() {
        assert_eq!(
            render_template("100%% done by %(sender_login)s", &values()).expect("render"),
            "100% done by alice"
        );
        assert_eq!(render_template("50% off", &values()).expect("render"), "50% off");
        assert_eq!(render_template("trailing %", &values()).expect("render"), "trailing %");
    }

    #[test]
    fn unknown_placeholder_names_the_key() {
        for (template, missing) in [
            ("What if we use an %(unknown_template_value)s?", "unknown_template_value"),
            ("replying to @%(sender_login)s: %(foobar)s", "foobar"),
        ] {
            let err = render_template(template, &values()).expect_err("unknown key");
            assert!(matches!(err, IssuesError::UnknownPlaceholder { ref key } if key == missing));
            assert_eq!(err.kind(), ErrorKind::Template);
        }
    }

    #[test]
    fn malformed_placeholders_are_rejected() {
        let err = render_template("hi %(sender_login", &values()).expect_err("unterminated");
        assert!(matches!(err, IssuesError::MalformedTemplate { position: 3 }));

        let err = render_template("hi %(sender_login)d", &values()).expect_err("not %s");
        assert!(matches!(err, IssuesError::MalformedTemplate { .. }));
    }

    #[test]
    fn values_only_include_present_fields() {
        let values = TemplateValues::from_payload(&EventPayload::new(json!({
            "sender": {"login": "bob"},
        })));
        assert_eq!(values.get(SENDER_LOGIN), Some("bob"));
        assert_eq!(values.get(COMMENT_BODY), None);
        assert_eq!(values.keys().collect::<Vec<_>>(), vec![SENDER_LOGIN]);

        let err = render_template("%(comment_body)s", &values).expect_err("no comment");
        assert!(matches!(err, IssuesError::UnknownPlaceholder { .. }));
    }

    #[test]
    fn multibyte_text_around_placeholders() {
        let mut values = TemplateValues::new();
        values.insert("name", "Zoë");
        assert_eq!(
            render_template("héllo %(name)s — ✓", &values).expect("render"),
            "héllo Zoë — ✓"
        );
    }
}
