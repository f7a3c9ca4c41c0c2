//! Session state and user actions.

use std::sync::{Mutex, PoisonError};

use crate::clipboard::{Clipboard, ClipboardError};
use crate::dedup::DedupRegistry;
use crate::record::DetectedCode;

/// State of one running capture session: the duplicate registry and the
/// visible record list.
///
/// The registry is shared with the capture thread; the record list is
/// appended from the presentation context as published batches arrive.
/// All state is in-memory and lost on exit.
#[derive(Debug, Default)]
pub struct ScanSession {
    registry: DedupRegistry,
    records: Mutex<Vec<DetectedCode>>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The duplicate registry consulted by the capture loop.
    pub fn registry(&self) -> &DedupRegistry {
        &self.registry
    }

    /// Append a published batch of records to the visible list.
    pub fn append(&self, records: &[DetectedCode]) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(records);
    }

    /// Snapshot of the visible record list, in arrival order.
    pub fn records(&self) -> Vec<DetectedCode> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of visible records.
    pub fn record_count(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Clear the visible record list and the duplicate registry.
    ///
    /// The list is emptied first: a payload decoded concurrently still hits
    /// the populated registry and is rejected, so no stale record can land
    /// after the clear. Once the registry is emptied, previously-seen
    /// payloads are treated as new again.
    pub fn clear_all(&self) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.registry.clear();
    }

    /// Copy the content of the record at `index` to the clipboard.
    ///
    /// Returns `Ok(false)` if the index no longer exists (e.g. the list was
    /// cleared since the selection was made).
    pub fn copy_record(
        &self,
        index: usize,
        clipboard: &mut dyn Clipboard,
    ) -> Result<bool, ClipboardError> {
        let content = {
            let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
            match records.get(index) {
                Some(record) => record.content.clone(),
                None => return Ok(false),
            }
        };
        clipboard.set_text(&content)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeClipboard {
        text: Option<String>,
    }

    impl Clipboard for FakeClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            self.text = Some(text.to_string());
            Ok(())
        }
    }

    fn record(content: &str) -> DetectedCode {
        DetectedCode::new(content.to_string())
    }

    #[test]
    fn test_append_preserves_order() {
        let session = ScanSession::new();
        session.append(&[record("a"), record("b")]);
        session.append(&[record("c")]);
        let contents: Vec<String> = session
            .records()
            .into_iter()
            .map(|r| r.content)
            .collect();
        assert_eq!(contents, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_clear_all_empties_list_and_registry() {
        let session = ScanSession::new();
        for payload in ["a", "b", "c"] {
            assert!(session.registry().try_add(payload));
        }
        session.append(&[record("a"), record("b"), record("c")]);
        assert_eq!(session.record_count(), 3);

        session.clear_all();

        assert_eq!(session.record_count(), 0);
        // Previously-seen payloads are new again
        assert!(session.registry().try_add("a"));
    }

    #[test]
    fn test_copy_record() {
        let session = ScanSession::new();
        session.append(&[record("HELLO")]);

        let mut clipboard = FakeClipboard::default();
        assert!(session.copy_record(0, &mut clipboard).unwrap());
        assert_eq!(clipboard.text.as_deref(), Some("HELLO"));
    }

    #[test]
    fn test_copy_record_missing_index() {
        let session = ScanSession::new();
        let mut clipboard = FakeClipboard::default();
        assert!(!session.copy_record(3, &mut clipboard).unwrap());
        assert!(clipboard.text.is_none());
    }
}
