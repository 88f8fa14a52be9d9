//! In-memory serial links for tests.
//!
//! `MockSerialLink` serves lines pushed by the test, one per `poll_line`
//! call.  `MockSerialOpener` hands out a fresh link per `open` and keeps every
//! link it created so tests can inspect or feed them afterwards.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::application::device::ConnectionError;
use crate::application::serial_ingest::{SerialLink, SerialOpener};

/// A scripted serial link.
#[derive(Debug)]
pub struct MockSerialLink {
    name: String,
    lines: Mutex<VecDeque<String>>,
    closed: AtomicBool,
    polls: AtomicUsize,
    /// When `true`, `poll_line` fails with an I/O error.
    pub fail_reads: AtomicBool,
}

impl MockSerialLink {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            lines: Mutex::new(VecDeque::new()),
            closed: AtomicBool::new(false),
            polls: AtomicUsize::new(0),
            fail_reads: AtomicBool::new(false),
        }
    }

    /// Queues `line` as if it had arrived with a trailing newline.
    pub fn push_line(&self, line: &str) {
        self.lines.lock().push_back(line.to_string());
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of `poll_line` calls so far.
    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    /// Lines not consumed yet.
    pub fn pending(&self) -> usize {
        self.lines.lock().len()
    }
}

impl SerialLink for MockSerialLink {
    fn port_name(&self) -> &str {
        &self.name
    }

    fn poll_line(&self) -> io::Result<Option<String>> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "mock read failure"));
        }
        Ok(self.lines.lock().pop_front())
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Opens [`MockSerialLink`]s.
#[derive(Debug, Default)]
pub struct MockSerialOpener {
    opened: Mutex<Vec<Arc<MockSerialLink>>>,
    script: Mutex<Vec<String>>,
    /// When `true`, `open` fails with `ConnectionError::Open`.
    pub refuse: AtomicBool,
}

impl MockSerialOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines every newly opened link starts with.
    pub fn with_script(lines: &[&str]) -> Self {
        let opener = Self::default();
        *opener.script.lock() = lines.iter().map(|l| l.to_string()).collect();
        opener
    }

    /// Every link opened so far, oldest first.
    pub fn opened(&self) -> Vec<Arc<MockSerialLink>> {
        self.opened.lock().clone()
    }

    /// The most recently opened link.
    pub fn last(&self) -> Option<Arc<MockSerialLink>> {
        self.opened.lock().last().cloned()
    }
}

impl SerialOpener for MockSerialOpener {
    fn open(&self, port: &str, _baud_rate: u32) -> Result<Arc<dyn SerialLink>, ConnectionError> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(ConnectionError::Open {
                device: port.to_string(),
                reason: "mock refused".to_string(),
            });
        }
        let link = Arc::new(MockSerialLink::new(port));
        for line in self.script.lock().iter() {
            link.push_line(line);
        }
        self.opened.lock().push(Arc::clone(&link));
        Ok(link)
    }
}
