use serde::{Deserialize, Serialize};

/// Phase-boundary events emitted by the timer engine.
///
/// The engine only produces these; delivering them as user-visible alerts
/// is the job of [`crate::notify::NotificationDispatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    /// A new round's work phase began.
    WorkStarted { round: i64 },
    /// The work phase of `round` ended and its rest began.
    RestStarted { round: i64 },
    /// The final rest ended; the engine has been reset.
    SessionCompleted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(TimerEvent::RestStarted { round: 3 }).unwrap();
        assert_eq!(json["type"], "rest_started");
        assert_eq!(json["round"], 3);

        let json = serde_json::to_string(&TimerEvent::SessionCompleted).unwrap();
        assert_eq!(json, r#"{"type":"session_completed"}"#);
    }
}
