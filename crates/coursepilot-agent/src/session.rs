//! Session manager — bounded per-session conversation memory.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Tracks recent user/assistant exchanges per session. Each session
/// keeps at most `max_history` exchanges; older ones fall off the
/// front. Everything lives in memory, sessions die with the process.
pub struct SessionManager {
    sessions: Mutex<HashMap<String, VecDeque<(String, String)>>>,
    counter: AtomicU64,
    max_history: usize,
}

impl SessionManager {
    pub fn new(max_history: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            counter: AtomicU64::new(0),
            max_history,
        }
    }

    /// Mint a fresh session id ("session_1", "session_2", ...).
    pub fn create_session(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("session_{n}")
    }

    /// Record one completed exchange. Unknown session ids start a new
    /// entry, so ids survive a gateway restart without erroring.
    pub fn add_exchange(&self, session_id: &str, user: &str, assistant: &str) {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        let history = sessions.entry(session_id.to_string()).or_default();
        history.push_back((user.to_string(), assistant.to_string()));
        while history.len() > self.max_history {
            history.pop_front();
        }
    }

    /// Formatted history for prompt injection, oldest first. `None`
    /// when the session is unknown or has no exchanges yet.
    pub fn history(&self, session_id: &str) -> Option<String> {
        let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        let history = sessions.get(session_id)?;
        if history.is_empty() {
            return None;
        }
        let lines: Vec<String> = history
            .iter()
            .map(|(user, assistant)| format!("User: {user}\nAssistant: {assistant}"))
            .collect();
        Some(lines.join("\n"))
    }

    pub fn clear_session(&self, session_id: &str) {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.remove(session_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_session_ids_are_sequential() {
        let manager = SessionManager::new(2);
        assert_eq!(manager.create_session(), "session_1");
        assert_eq!(manager.create_session(), "session_2");
    }

    #[test]
    fn test_history_formats_exchanges_oldest_first() {
        let manager = SessionManager::new(2);
        manager.add_exchange("s", "What is MCP?", "A protocol.");
        manager.add_exchange("s", "Who made it?", "Anthropic.");

        let history = manager.history("s").unwrap();
        assert_eq!(
            history,
            "User: What is MCP?\nAssistant: A protocol.\nUser: Who made it?\nAssistant: Anthropic."
        );
    }

    #[test]
    fn test_history_is_capped_fifo() {
        let manager = SessionManager::new(2);
        manager.add_exchange("s", "q1", "a1");
        manager.add_exchange("s", "q2", "a2");
        manager.add_exchange("s", "q3", "a3");

        let history = manager.history("s").unwrap();
        assert!(!history.contains("q1"));
        assert!(history.contains("q2"));
        assert!(history.contains("q3"));
    }

    #[test]
    fn test_unknown_session_has_no_history() {
        let manager = SessionManager::new(2);
        assert!(manager.history("nope").is_none());
    }

    #[test]
    fn test_add_exchange_accepts_unknown_id() {
        let manager = SessionManager::new(2);
        manager.add_exchange("external_id", "q", "a");
        assert!(manager.history("external_id").is_some());
    }

    #[test]
    fn test_clear_session() {
        let manager = SessionManager::new(2);
        manager.add_exchange("s", "q", "a");
        manager.clear_session("s");
        assert!(manager.history("s").is_none());
    }
}
