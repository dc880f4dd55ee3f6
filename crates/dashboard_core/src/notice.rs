use crate::resource::Failure;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
}

/// Outcome message shown at the top of a page until dismissed or replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub tone: Tone,
    pub text: String,
}

impl Banner {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Error,
            text: text.into(),
        }
    }

    pub fn failed(action: &str, failure: &Failure) -> Self {
        Self::error(format!("{action} failed: {failure}"))
    }
}

/// Destructive actions that need an explicit yes before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    ResetSettings,
    ClearDomains,
    DeleteJob(String),
    ClearStuckSession,
    ClearLogs,
}

impl ConfirmAction {
    pub fn prompt(&self) -> String {
        match self {
            ConfirmAction::ResetSettings => {
                "Reset all settings to their defaults? Current values will be lost.".to_string()
            }
            ConfirmAction::ClearDomains => "Delete every uploaded domain?".to_string(),
            ConfirmAction::DeleteJob(id) => format!("Delete scheduled job '{id}'?"),
            ConfirmAction::ClearStuckSession => {
                "Purge the task queue and resynchronise the parsing state?".to_string()
            }
            ConfirmAction::ClearLogs => "Delete all log entries on the server?".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirm {
    pub action: ConfirmAction,
    pub prompt: String,
}

impl PendingConfirm {
    pub fn new(action: ConfirmAction) -> Self {
        let prompt = action.prompt();
        Self { action, prompt }
    }
}
