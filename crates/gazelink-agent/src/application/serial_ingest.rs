//! Serial ingestion channel.
//!
//! Owns the single active serial connection and the background thread that
//! reads from it.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──connect()──► Connecting ──ok──► Reading ──disconnect()/connect()──► Idle
//!                         │
//!                         └──err──► Idle  ("Failed to connect: …")
//! ```
//!
//! The reader thread runs only while the link it was started with is still
//! the one in the [`DeviceSlot`].  `disconnect` empties the slot and a new
//! `connect` replaces it, so both stop the old reader within one poll
//! interval.

use std::io;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use gazelink_core::{CommandActions, CommandParser};
use tracing::{debug, info};

use super::device::{ConnectionError, DeviceSlot};
use super::status::StatusSink;

/// Default sleep between two polls of the serial link.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// An open serial connection.
///
/// Implementations buffer incoming bytes and hand out complete lines only.
pub trait SerialLink: Send + Sync {
    /// The OS name of the port, e.g. `COM8` or `/dev/ttyACM0`.
    fn port_name(&self) -> &str;

    /// Returns the next complete line without its terminator, or `None` when
    /// no full line is buffered yet.  Never blocks for longer than the
    /// link's read timeout.
    fn poll_line(&self) -> io::Result<Option<String>>;

    /// Releases the OS handle.  Calling it twice is harmless.
    fn close(&self);
}

/// Opens serial links by port name.
pub trait SerialOpener: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ConnectionError::Open`] if the OS refuses the port.
    fn open(&self, port: &str, baud_rate: u32) -> Result<Arc<dyn SerialLink>, ConnectionError>;
}

/// The serial ingestion use case.
pub struct SerialIngest {
    opener: Arc<dyn SerialOpener>,
    parser: Arc<CommandParser>,
    actions: Arc<dyn CommandActions>,
    status: StatusSink,
    current: Arc<DeviceSlot<dyn SerialLink>>,
    poll_interval: Duration,
}

impl SerialIngest {
    /// Creates an idle channel that uses the default command registry.
    pub fn new(
        opener: Arc<dyn SerialOpener>,
        actions: Arc<dyn CommandActions>,
        status: StatusSink,
    ) -> Self {
        Self {
            opener,
            parser: Arc::new(CommandParser::new()),
            actions,
            status,
            current: Arc::new(DeviceSlot::new()),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Uses `parser` for every line instead of the default registry.
    pub fn with_parser(mut self, parser: CommandParser) -> Self {
        self.parser = Arc::new(parser);
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Connects to `port` and starts the reader thread.
    ///
    /// Any existing connection is closed first, even if the new open fails.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] if the port cannot be opened or the reader
    /// thread cannot be spawned.  The channel is idle afterwards.
    pub fn connect(&self, port: &str, baud_rate: u32) -> Result<JoinHandle<()>, ConnectionError> {
        self.disconnect();

        let link = match self.opener.open(port, baud_rate) {
            Ok(link) => link,
            Err(e) => {
                self.status.error(format!("Failed to connect: {e}"));
                return Err(e);
            }
        };

        // A concurrent connect may have installed its link since our
        // disconnect; close it so at most one link stays open.
        if let Some(previous) = self.current.replace(Arc::clone(&link)) {
            previous.close();
            self.status
                .info(format!("Disconnected from {}", previous.port_name()));
        }
        self.status.info(format!("Connected to {}", link.port_name()));

        let reader = Reader {
            link: Arc::clone(&link),
            slot: Arc::clone(&self.current),
            parser: Arc::clone(&self.parser),
            actions: Arc::clone(&self.actions),
            status: self.status.clone(),
            poll_interval: self.poll_interval,
        };
        std::thread::Builder::new()
            .name("serial-ingest".to_string())
            .spawn(move || reader.run())
            .map_err(|source| {
                if let Some(link) = self.current.take() {
                    link.close();
                }
                let e = ConnectionError::Spawn {
                    device: port.to_string(),
                    source,
                };
                self.status.error(format!("Failed to connect: {e}"));
                e
            })
    }

    /// Closes the current connection, if any.
    ///
    /// Returns `true` if a connection was closed.  With nothing connected
    /// this does nothing and publishes nothing.
    pub fn disconnect(&self) -> bool {
        let Some(link) = self.current.take() else {
            return false;
        };
        link.close();
        self.status
            .info(format!("Disconnected from {}", link.port_name()));
        true
    }

    pub fn is_connected(&self) -> bool {
        !self.current.is_empty()
    }

    /// Name of the currently connected port.
    pub fn current_port(&self) -> Option<String> {
        self.current
            .current()
            .map(|link| link.port_name().to_string())
    }
}

// ── Reader thread ─────────────────────────────────────────────────────────────

struct Reader {
    link: Arc<dyn SerialLink>,
    slot: Arc<DeviceSlot<dyn SerialLink>>,
    parser: Arc<CommandParser>,
    actions: Arc<dyn CommandActions>,
    status: StatusSink,
    poll_interval: Duration,
}

impl Reader {
    fn run(self) {
        let port = self.link.port_name().to_string();
        info!(port = %port, "serial reader started");

        while self.slot.is_current(&self.link) {
            loop {
                match self.link.poll_line() {
                    Ok(Some(line)) => self.handle_line(&port, line.trim_end()),
                    Ok(None) => break,
                    Err(e) => {
                        debug!(port = %port, "serial read failed: {e}");
                        break;
                    }
                }
                if !self.slot.is_current(&self.link) {
                    break;
                }
            }
            std::thread::sleep(self.poll_interval);
        }

        info!(port = %port, "serial reader stopped");
    }

    fn handle_line(&self, port: &str, line: &str) {
        self.status
            .info(format!("Received data from {port}: {line}"));
        match self.parser.parse(line, self.actions.as_ref()) {
            Ok(outcome) => self.status.info(outcome.to_string()),
            Err(e) => self.status.error(format!(
                "ERROR: error parsing above line, invalid data, error is: {e}"
            )),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
