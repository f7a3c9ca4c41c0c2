//! Decoded code records.

use std::fmt;

use chrono::{DateTime, Local};

/// One decoded payload, created exactly once per newly-seen payload per run.
///
/// Immutable after creation; owned by the visible record list until
/// explicitly cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedCode {
    /// Decoded payload text (non-empty)
    pub content: String,
    /// Wall-clock instant of detection
    pub timestamp: DateTime<Local>,
}

impl DetectedCode {
    /// Create a record stamped with the current time.
    pub fn new(content: String) -> Self {
        debug_assert!(!content.is_empty());
        Self {
            content,
            timestamp: Local::now(),
        }
    }
}

impl fmt::Display for DetectedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format("%H:%M:%S"), self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stamps_current_time() {
        let before = Local::now();
        let record = DetectedCode::new("HELLO".to_string());
        let after = Local::now();
        assert!(record.timestamp >= before);
        assert!(record.timestamp <= after);
    }

    #[test]
    fn test_display_includes_content() {
        let record = DetectedCode::new("https://example.com".to_string());
        let rendered = format!("{}", record);
        assert!(rendered.ends_with("https://example.com"));
        assert!(rendered.starts_with('['));
    }
}
