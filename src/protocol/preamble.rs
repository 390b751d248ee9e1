//! Call preamble parsing.
//!
//! Before any command exchange the server sends a block of `key: value`
//! lines describing the call, closed by a blank line:
//!
//! ```text
//! agi_request: handler
//! agi_channel: SIP/100-00000001
//! agi_uniqueid: 1700000000.42
//! <blank>
//! ```
//!
//! Parsing is best-effort. Lines that do not look like attributes are kept
//! verbatim in [`Preamble::raw_lines`] and never raise an error.
//!
//! # Example
//!
//! ```
//! use agi_session::protocol::Preamble;
//!
//! let mut preamble = Preamble::new();
//! assert!(preamble.push_line("agi_channel: SIP/100-1"));
//! assert!(!preamble.push_line(""));
//!
//! assert_eq!(preamble.channel_id(), "SIP/100-1");
//! assert_eq!(preamble.raw_lines().len(), 1);
//! ```

use serde::Serialize;

/// Attribute key carrying the channel name.
pub const CHANNEL_KEY: &str = "agi_channel";

/// Attribute key carrying the call's unique identifier.
pub const UNIQUE_ID_KEY: &str = "agi_uniqueid";

const CHANNEL_PREFIX: &str = "agi_channel:";
const UNIQUE_ID_PREFIX: &str = "agi_uniqueid:";

/// The preamble block received at the start of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Preamble {
    /// Lines in arrival order, untrimmed, terminator excluded.
    raw_lines: Vec<String>,
    /// Value of the last `agi_channel:` line, or empty.
    channel_id: String,
    /// Value of the last `agi_uniqueid:` line, or empty.
    unique_id: String,
}

impl Preamble {
    /// Create an empty preamble.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line (line ending already removed).
    ///
    /// Returns `false` when the line is the blank terminator, in which case
    /// nothing is recorded and the caller should stop reading.
    pub fn push_line(&mut self, line: &str) -> bool {
        if is_terminator(line) {
            return false;
        }

        if line.starts_with(CHANNEL_PREFIX) {
            if let Some(value) = value_after_colon(line) {
                self.channel_id = value.to_string();
            }
        }
        if line.starts_with(UNIQUE_ID_PREFIX) {
            if let Some(value) = value_after_colon(line) {
                self.unique_id = value.to_string();
            }
        }

        self.raw_lines.push(line.to_string());
        true
    }

    /// Raw lines in arrival order.
    #[inline]
    pub fn raw_lines(&self) -> &[String] {
        &self.raw_lines
    }

    /// Channel name, empty if the server never sent one.
    #[inline]
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// Call unique ID, empty if the server never sent one.
    #[inline]
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Number of lines received.
    #[inline]
    pub fn len(&self) -> usize {
        self.raw_lines.len()
    }

    /// Check if no lines were received.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw_lines.is_empty()
    }

    /// Look up any attribute by key (e.g. `agi_callerid`).
    ///
    /// The last matching line wins and the value is trimmed. Lines without
    /// a colon never match.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.raw_lines.iter().rev().find_map(|line| {
            let (name, value) = line.split_once(':')?;
            (name == key).then(|| value.trim())
        })
    }

    /// Render the raw lines as a JSON array for the audit log.
    pub fn raw_lines_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(&self.raw_lines)?)
    }
}

/// A line that is empty after trimming closes the preamble.
#[inline]
pub fn is_terminator(line: &str) -> bool {
    line.trim().is_empty()
}

/// Substring after the first colon, trimmed. `None` if there is no colon.
fn value_after_colon(line: &str) -> Option<&str> {
    line.split_once(':').map(|(_, value)| value.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(lines: &[&str]) -> Preamble {
        let mut preamble = Preamble::new();
        for line in lines {
            if !preamble.push_line(line) {
                break;
            }
        }
        preamble
    }

    #[test]
    fn test_terminator_excluded_and_order_kept() {
        let preamble = parse(&["agi_request: x", "agi_channel: SIP/1", "   ", "after"]);
        assert_eq!(preamble.raw_lines(), &["agi_request: x", "agi_channel: SIP/1"]);
    }

    #[test]
    fn test_channel_value_trimmed() {
        let preamble = parse(&["agi_channel:   ABC-123  "]);
        assert_eq!(preamble.channel_id(), "ABC-123");
    }

    #[test]
    fn test_missing_attributes_are_empty() {
        let preamble = parse(&["agi_request: x"]);
        assert_eq!(preamble.channel_id(), "");
        assert_eq!(preamble.unique_id(), "");
    }

    #[test]
    fn test_last_occurrence_wins() {
        let preamble = parse(&["agi_uniqueid: 1", "agi_uniqueid: 2"]);
        assert_eq!(preamble.unique_id(), "2");
    }

    #[test]
    fn test_value_keeps_later_colons() {
        let preamble = parse(&["agi_channel: IAX2/peer:4569-1"]);
        assert_eq!(preamble.channel_id(), "IAX2/peer:4569-1");
    }

    #[test]
    fn test_raw_lines_are_untrimmed() {
        let preamble = parse(&["  agi_channel: x  "]);
        assert_eq!(preamble.raw_lines(), &["  agi_channel: x  "]);
        // Leading whitespace means the prefix does not match.
        assert_eq!(preamble.channel_id(), "");
    }

    #[test]
    fn test_malformed_lines_are_kept() {
        let preamble = parse(&["garbage without colon", "agi_channel"]);
        assert_eq!(preamble.len(), 2);
        assert_eq!(preamble.channel_id(), "");
    }

    #[test]
    fn test_prefix_must_include_colon() {
        let preamble = parse(&["agi_channelx: nope"]);
        assert_eq!(preamble.channel_id(), "");
    }

    #[test]
    fn test_attribute_lookup() {
        let preamble = parse(&[
            "agi_callerid: 100",
            "agi_language: en",
            "agi_callerid: 200",
            "no colon",
        ]);
        assert_eq!(preamble.attribute("agi_callerid"), Some("200"));
        assert_eq!(preamble.attribute("agi_language"), Some("en"));
        assert_eq!(preamble.attribute("agi_dnid"), None);
        assert_eq!(preamble.attribute("no colon"), None);
    }

    #[test]
    fn test_raw_lines_json() {
        let preamble = parse(&["agi_channel: SIP/1", "say \"hi\""]);
        assert_eq!(
            preamble.raw_lines_json().unwrap(),
            r#"["agi_channel: SIP/1","say \"hi\""]"#
        );
    }

    #[test]
    fn test_empty_preamble() {
        let preamble = parse(&[""]);
        assert!(preamble.is_empty());
        assert_eq!(preamble.raw_lines_json().unwrap(), "[]");
    }
}
