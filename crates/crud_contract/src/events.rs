//! Window-level custom events exchanged between admin pages and the surrounding shell.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Event fired after the UI language switches.
pub const LANGUAGE_CHANGED_EVENT: &str = "languageChanged";
/// Event asking the shell to open a quick-create modal.
pub const QUICK_ACTION_OPEN_MODAL_EVENT: &str = "quickAction:openModal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Quick-create modal targets.
pub enum QuickActionKey {
    /// New case.
    Cases,
    /// New client.
    Clients,
    /// New task.
    Tasks,
    /// New hearing.
    Hearings,
}

impl QuickActionKey {
    /// Every key, in menu order.
    pub const ALL: [Self; 4] = [Self::Cases, Self::Clients, Self::Tasks, Self::Hearings];

    /// Event-detail token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Cases => "cases",
            Self::Clients => "clients",
            Self::Tasks => "tasks",
            Self::Hearings => "hearings",
        }
    }

    /// Parses an event-detail token.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.token() == raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Typed view of the custom events the CRUD layer reacts to or emits.
pub enum GlobalEvent {
    /// The UI language changed.
    LanguageChanged {
        /// New locale code, when the emitter supplied one.
        locale: Option<String>,
    },
    /// Open a quick-create modal.
    QuickActionOpenModal {
        /// Target modal.
        key: QuickActionKey,
    },
}

impl GlobalEvent {
    /// DOM event name.
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::LanguageChanged { .. } => LANGUAGE_CHANGED_EVENT,
            Self::QuickActionOpenModal { .. } => QUICK_ACTION_OPEN_MODAL_EVENT,
        }
    }

    /// `CustomEvent.detail` payload.
    pub fn detail(&self) -> Value {
        match self {
            Self::LanguageChanged { locale } => json!({ "locale": locale }),
            Self::QuickActionOpenModal { key } => json!({ "key": key.token() }),
        }
    }

    /// Rebuilds an event from its DOM name and detail; unknown names or keys yield `None`.
    pub fn from_parts(name: &str, detail: &Value) -> Option<Self> {
        match name {
            LANGUAGE_CHANGED_EVENT => Some(Self::LanguageChanged {
                locale: detail
                    .get("locale")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }),
            QUICK_ACTION_OPEN_MODAL_EVENT => detail
                .get("key")
                .and_then(Value::as_str)
                .and_then(QuickActionKey::parse)
                .map(|key| Self::QuickActionOpenModal { key }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn quick_action_event_round_trips_through_dom_parts() {
        let event = GlobalEvent::QuickActionOpenModal {
            key: QuickActionKey::Hearings,
        };
        assert_eq!(event.event_name(), "quickAction:openModal");
        assert_eq!(
            GlobalEvent::from_parts(event.event_name(), &event.detail()),
            Some(event)
        );
    }

    #[test]
    fn unknown_quick_action_key_is_ignored() {
        assert_eq!(
            GlobalEvent::from_parts(QUICK_ACTION_OPEN_MODAL_EVENT, &json!({ "key": "invoices" })),
            None
        );
        assert_eq!(
            GlobalEvent::from_parts(LANGUAGE_CHANGED_EVENT, &Value::Null),
            Some(GlobalEvent::LanguageChanged { locale: None })
        );
    }
}
