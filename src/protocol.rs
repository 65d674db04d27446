//! Messages exchanged between the controller and pages
//!
//! Serialized as JSON objects tagged by `action`, e.g.
//! `{"action":"copyLinkTextByUrl","linkUrl":"https://ex.com/x"}`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a browser tab, and with it the one page loaded in it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TabId(pub u32);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab {}", self.0)
    }
}

/// Controller → page instructions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Message {
    /// Resolve the anchor for this URL and copy its text
    #[serde(rename_all = "camelCase")]
    CopyLinkTextByUrl { link_url: String },
    /// Toggle this page between armed and idle
    TriggerCopyModeOnce,
    /// Set copy mode absolutely (controller-owned mode only)
    ToggleCopyMode { state: bool },
}

/// Page → controller traffic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PageReport {
    /// Query the controller's mode flag (controller-owned mode only)
    GetCopyMode,
    /// The page left copy mode on its own after a one-shot copy
    CopyModeChanged { state: bool },
}

impl Message {
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let msg = Message::CopyLinkTextByUrl {
            link_url: "https://ex.com/x".into(),
        };
        assert_eq!(
            msg.to_json().unwrap(),
            r#"{"action":"copyLinkTextByUrl","linkUrl":"https://ex.com/x"}"#
        );
        assert_eq!(
            Message::TriggerCopyModeOnce.to_json().unwrap(),
            r#"{"action":"triggerCopyModeOnce"}"#
        );
        assert_eq!(
            serde_json::to_string(&PageReport::GetCopyMode).unwrap(),
            r#"{"action":"getCopyMode"}"#
        );
    }

    #[test]
    fn test_parse_host_message() {
        let msg = Message::from_json(r#"{"action":"toggleCopyMode","state":true}"#).unwrap();
        assert_eq!(msg, Message::ToggleCopyMode { state: true });
        assert!(Message::from_json(r#"{"action":"selfDestruct"}"#).is_err());
    }
}
