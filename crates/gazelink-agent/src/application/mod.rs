//! Application layer use cases for the agent.
//!
//! # What lives here?
//!
//! - **`actuate_pointer`** – The [`PointerActuator`]: validates every target
//!   against the live screen size and forwards it to a `PointerDriver`
//!   implementation injected at construction time.  Also hosts the
//!   cancellable random-movement loop.
//!
//! - **`command_actions`** – Connects the core command protocol to the
//!   actuator and the calibration indicator.
//!
//! - **`device`** – [`DeviceSlot`], the "current device" cell whose
//!   replacement is the only way an ingestion loop is cancelled.
//!
//! - **`serial_ingest`** / **`video_ingest`** – The two ingestion channels.
//!
//! - **`status`** – The thread-safe FIFO that both channels report to.
//!
//! **Dependency rule**: nothing in this layer imports `crate::infrastructure`;
//! OS-facing code reaches it only through the traits defined here.
//!
//! [`PointerActuator`]: actuate_pointer::PointerActuator
//! [`DeviceSlot`]: device::DeviceSlot

pub mod actuate_pointer;
pub mod command_actions;
pub mod device;
pub mod serial_ingest;
pub mod status;
pub mod video_ingest;
