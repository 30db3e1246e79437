//! Diagnostic messages for model and settings checks.
//!
//! Model definitions are validated by `ModelMeta::check` in `fireo-db`, which
//! reports problems as [`CheckMessage`]s. Settings are checked by
//! [`check_settings`].
//!
//! ## Examples
//!
//! ```
//! use fireo_core::checks::{check_settings, has_errors, CheckLevel};
//! use fireo_core::settings::Settings;
//!
//! let messages = check_settings(&Settings::default());
//! assert!(messages.iter().all(|m| m.level == CheckLevel::Warning));
//! assert!(!has_errors(&messages));
//! ```

use crate::settings::Settings;

/// Severity level for a check message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckLevel {
    /// A potential problem.
    Warning,
    /// A definite problem that should be fixed.
    Error,
}

impl std::fmt::Display for CheckLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// A diagnostic message produced by a check.
///
/// Each message has a severity level, a human-readable message, an optional hint,
/// the object that the issue relates to, and an optional identifier.
#[derive(Debug, Clone)]
pub struct CheckMessage {
    /// The severity level.
    pub level: CheckLevel,
    /// The human-readable message describing the issue.
    pub msg: String,
    /// An optional hint on how to fix the issue.
    pub hint: Option<String>,
    /// The object (model field, setting, etc.) that has the issue.
    pub obj: Option<String>,
    /// A unique identifier for this check message (e.g. "fields.E001").
    pub id: Option<String>,
}

impl CheckMessage {
    /// Creates a new `CheckMessage` with the given level and details.
    pub fn new(
        level: CheckLevel,
        msg: impl Into<String>,
        hint: Option<&str>,
        obj: Option<&str>,
        id: Option<&str>,
    ) -> Self {
        Self {
            level,
            msg: msg.into(),
            hint: hint.map(String::from),
            obj: obj.map(String::from),
            id: id.map(String::from),
        }
    }

    /// Creates a warning-level message.
    pub fn warning(msg: impl Into<String>, hint: Option<&str>, obj: Option<&str>, id: Option<&str>) -> Self {
        Self::new(CheckLevel::Warning, msg, hint, obj, id)
    }

    /// Creates an error-level message.
    pub fn error(msg: impl Into<String>, hint: Option<&str>, obj: Option<&str>, id: Option<&str>) -> Self {
        Self::new(CheckLevel::Error, msg, hint, obj, id)
    }

    /// Returns `true` if this is an error or higher severity.
    pub fn is_error(&self) -> bool {
        self.level >= CheckLevel::Error
    }
}

impl std::fmt::Display for CheckMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref id) = self.id {
            write!(f, "({id}) ")?;
        }
        write!(f, "{}: {}", self.level, self.msg)?;
        if let Some(ref hint) = self.hint {
            write!(f, "\n\tHINT: {hint}")?;
        }
        if let Some(ref obj) = self.obj {
            write!(f, "\n\tObject: {obj}")?;
        }
        Ok(())
    }
}

/// Returns `true` if any message is error-level or worse.
pub fn has_errors(messages: &[CheckMessage]) -> bool {
    messages.iter().any(CheckMessage::is_error)
}

/// Checks the connection settings.
///
/// Without an emulator host a project id is needed to reach a real database.
pub fn check_settings(settings: &Settings) -> Vec<CheckMessage> {
    let mut messages = Vec::new();

    if settings.database.project_id.is_empty() && !settings.database.uses_emulator() {
        messages.push(CheckMessage::warning(
            "No project id is configured and no emulator host is set.",
            Some("Set database.project_id or FIRESTORE_EMULATOR_HOST."),
            Some("settings.database.project_id"),
            Some("settings.W001"),
        ));
    }

    if settings.default_fetch_limit == 0 {
        messages.push(CheckMessage::warning(
            "default_fetch_limit is 0; unbounded fetches will return nothing.",
            None,
            Some("settings.default_fetch_limit"),
            Some("settings.W002"),
        ));
    }

    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_level_ordering() {
        assert!(CheckLevel::Warning < CheckLevel::Error);
        assert_eq!(CheckLevel::Warning.to_string(), "WARNING");
    }

    #[test]
    fn test_check_message_display() {
        let msg = CheckMessage::error(
            "Duplicate storage key \"subs\".",
            Some("Give each field a distinct column_name."),
            Some("User.subjects"),
            Some("fields.E001"),
        );
        let rendered = msg.to_string();
        assert!(rendered.starts_with("(fields.E001) ERROR: Duplicate storage key"));
        assert!(rendered.contains("HINT: Give each field"));
        assert!(rendered.contains("Object: User.subjects"));
    }

    #[test]
    fn test_has_errors() {
        let warn = CheckMessage::warning("w", None, None, None);
        let err = CheckMessage::error("e", None, None, None);
        assert!(!has_errors(&[warn.clone()]));
        assert!(has_errors(&[warn, err]));
        assert!(!has_errors(&[]));
    }

    #[test]
    fn test_check_settings_missing_project() {
        let messages = check_settings(&Settings::default());
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id.as_deref(), Some("settings.W001"));
    }

    #[test]
    fn test_check_settings_emulator_is_enough() {
        let mut settings = Settings::default();
        settings.database.emulator_host = Some("localhost:8080".into());
        assert!(check_settings(&settings).is_empty());
    }

    #[test]
    fn test_check_settings_zero_fetch_limit() {
        let mut settings = Settings::default();
        settings.database.project_id = "p".into();
        settings.default_fetch_limit = 0;
        let messages = check_settings(&settings);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id.as_deref(), Some("settings.W002"));
    }
}
