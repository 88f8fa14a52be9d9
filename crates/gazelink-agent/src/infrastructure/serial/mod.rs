//! Serial ports via the `serialport` crate.
//!
//! [`SerialPortOpener`] opens a port with a short read timeout and wraps it in
//! a [`SerialPortLink`], which keeps a byte buffer and hands out complete
//! newline-terminated lines only.  Bytes that are not valid UTF-8 are replaced
//! rather than rejected, so a noisy link never stalls the reader.

use std::io::{self, Read};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serialport::SerialPort;
use tracing::{debug, warn};

use crate::application::device::ConnectionError;
use crate::application::serial_ingest::{SerialLink, SerialOpener};

pub mod mock;

/// Read timeout applied to every opened port.
pub const READ_TIMEOUT: Duration = Duration::from_millis(50);

/// Lists the names of the serial ports the OS reports.
///
/// Enumeration failures are logged and reported as "no ports".
pub fn list_ports() -> Vec<String> {
    match serialport::available_ports() {
        Ok(ports) => ports.into_iter().map(|p| p.port_name).collect(),
        Err(e) => {
            warn!("serial port enumeration failed: {e}");
            Vec::new()
        }
    }
}

/// Opens OS serial ports.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialPortOpener;

impl SerialOpener for SerialPortOpener {
    fn open(&self, port: &str, baud_rate: u32) -> Result<Arc<dyn SerialLink>, ConnectionError> {
        let handle = serialport::new(port, baud_rate)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|e| ConnectionError::Open {
                device: port.to_string(),
                reason: e.to_string(),
            })?;
        debug!(port, baud_rate, "serial port opened");
        Ok(Arc::new(SerialPortLink::new(port, handle)))
    }
}

struct LinkState {
    port: Option<Box<dyn SerialPort>>,
    pending: Vec<u8>,
}

/// An open OS serial port.
pub struct SerialPortLink {
    name: String,
    state: Mutex<LinkState>,
}

impl SerialPortLink {
    fn new(name: &str, port: Box<dyn SerialPort>) -> Self {
        Self {
            name: name.to_string(),
            state: Mutex::new(LinkState {
                port: Some(port),
                pending: Vec::new(),
            }),
        }
    }
}

impl SerialLink for SerialPortLink {
    fn port_name(&self) -> &str {
        &self.name
    }

    fn poll_line(&self) -> io::Result<Option<String>> {
        let mut state = self.state.lock();
        if let Some(line) = take_line(&mut state.pending) {
            return Ok(Some(line));
        }

        let LinkState { port, pending } = &mut *state;
        let port = port
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "port closed"))?;
        let available = port.bytes_to_read().map_err(io::Error::from)? as usize;
        if available == 0 {
            return Ok(None);
        }

        let mut chunk = vec![0u8; available];
        match port.read(&mut chunk) {
            Ok(n) => pending.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {}
            Err(e) => return Err(e),
        }
        Ok(take_line(pending))
    }

    fn close(&self) {
        let mut state = self.state.lock();
        if state.port.take().is_some() {
            debug!(port = %self.name, "serial port closed");
        }
        state.pending.clear();
    }
}

/// Removes and returns the first complete line in `buffer`.
///
/// The terminator (`\n`, optionally preceded by `\r`) is stripped.
fn take_line(buffer: &mut Vec<u8>) -> Option<String> {
    let end = buffer.iter().position(|&b| b == b'\n')?;
    let mut line: Vec<u8> = buffer.drain(..=end).collect();
    line.pop();
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    Some(String::from_utf8_lossy(&line).into_owned())
}
