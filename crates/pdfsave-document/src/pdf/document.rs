// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rendered document lifecycle — Idle -> Opening -> Writing -> Closed.
//
// A `RenderedDocument` owns the serialized PDF bytes for exactly one export.
// Closing is idempotent and also happens on drop, so a document can never be
// left open on an early return.

use std::io::Write;
use std::ops::{Deref, DerefMut};

use pdfsave_core::{DocumentState, LOG_TARGET};
use tracing::{debug, warn};

/// A finalized single-page PDF plus its write lifecycle.
#[derive(Debug)]
pub struct RenderedDocument {
    bytes: Vec<u8>,
    state: DocumentState,
    /// Every state entered, in order, starting with `Idle`.
    history: Vec<DocumentState>,
}

impl RenderedDocument {
    /// Wrap already-serialized PDF bytes. The document starts `Idle`.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            state: DocumentState::Idle,
            history: vec![DocumentState::Idle],
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn state(&self) -> DocumentState {
        self.state
    }

    pub fn history(&self) -> &[DocumentState] {
        &self.history
    }

    pub fn is_closed(&self) -> bool {
        self.state == DocumentState::Closed
    }

    /// Mark that a writer is acquiring its target.
    pub fn begin_opening(&mut self) {
        self.transition(DocumentState::Opening);
    }

    /// Stream the full document into `sink` and flush it.
    ///
    /// Fails without touching the sink if the document is already closed.
    pub fn write_to<W: Write + ?Sized>(&mut self, sink: &mut W) -> std::io::Result<()> {
        if self.is_closed() {
            return Err(std::io::Error::other("document already closed"));
        }
        self.transition(DocumentState::Writing);
        sink.write_all(&self.bytes)?;
        sink.flush()?;
        debug!(target: LOG_TARGET, bytes = self.bytes.len(), "document bytes written");
        Ok(())
    }

    /// Release the document. Safe to call more than once.
    pub fn close(&mut self) {
        if self.is_closed() {
            return;
        }
        self.transition(DocumentState::Closed);
        debug!(target: LOG_TARGET, "PDF document closed");
    }

    /// Borrow the document behind a guard that closes it when dropped.
    pub fn close_on_drop(&mut self) -> CloseGuard<'_> {
        CloseGuard { document: self }
    }

    fn transition(&mut self, next: DocumentState) {
        if self.is_closed() {
            warn!(target: LOG_TARGET, ?next, "ignoring transition on closed document");
            return;
        }
        if self.state != next {
            self.state = next;
            self.history.push(next);
        }
    }
}

impl Drop for RenderedDocument {
    fn drop(&mut self) {
        self.close();
    }
}

/// Scoped acquisition of a [`RenderedDocument`]: whatever path the holder
/// takes out of its scope, the document ends `Closed`.
pub struct CloseGuard<'a> {
    document: &'a mut RenderedDocument,
}

impl Deref for CloseGuard<'_> {
    type Target = RenderedDocument;

    fn deref(&self) -> &RenderedDocument {
        self.document
    }
}

impl DerefMut for CloseGuard<'_> {
    fn deref_mut(&mut self) -> &mut RenderedDocument {
        self.document
    }
}

impl Drop for CloseGuard<'_> {
    fn drop(&mut self) {
        self.document.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("broken pipe"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn full_lifecycle_history() {
        let mut doc = RenderedDocument::from_bytes(b"%PDF-1.3 test".to_vec());
        let mut sink = Vec::new();
        {
            let mut guard = doc.close_on_drop();
            guard.begin_opening();
            guard.write_to(&mut sink).unwrap();
        }

        assert_eq!(sink, b"%PDF-1.3 test");
        assert_eq!(
            doc.history(),
            &[
                DocumentState::Idle,
                DocumentState::Opening,
                DocumentState::Writing,
                DocumentState::Closed,
            ]
        );
    }

    #[test]
    fn guard_closes_on_write_error() {
        let mut doc = RenderedDocument::from_bytes(vec![1, 2, 3]);
        let result = {
            let mut guard = doc.close_on_drop();
            guard.begin_opening();
            guard.write_to(&mut FailingSink)
        };

        assert!(result.is_err());
        assert!(doc.is_closed());
    }

    #[test]
    fn guard_closes_before_writing() {
        let mut doc = RenderedDocument::from_bytes(vec![1]);
        {
            let mut guard = doc.close_on_drop();
            guard.begin_opening();
        }
        assert_eq!(doc.state(), DocumentState::Closed);
        assert!(!doc.history().contains(&DocumentState::Writing));
    }

    #[test]
    fn close_is_idempotent_and_final() {
        let mut doc = RenderedDocument::from_bytes(vec![1]);
        doc.close();
        doc.close();
        doc.begin_opening();

        assert_eq!(doc.history(), &[DocumentState::Idle, DocumentState::Closed]);
        assert!(doc.write_to(&mut Vec::new()).is_err());
    }
}
