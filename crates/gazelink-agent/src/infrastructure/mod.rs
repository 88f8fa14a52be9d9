//! Infrastructure layer for the agent.
//!
//! Contains the OS-facing adapters behind the application-layer traits.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `gazelink_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`pointer`** – `PointerDriver` implementations.  The native driver is
//!   selected at compile time with `#[cfg(target_os)]`; a headless
//!   `VirtualPointer` and a recording `MockPointerDriver` are always built.
//!
//! - **`serial`** – `SerialOpener`/`SerialLink` over the `serialport` crate,
//!   plus port enumeration and in-memory mocks.
//!
//! - **`video`** – `VideoOpener`/`VideoSource` over `nokhwa` (feature
//!   `camera`), a headless frame sink and scripted mocks.
//!
//! - **`vision`** – the OpenCV ArUco `MarkerDetector` (feature `opencv`).
//!
//! - **`calibration`** – the calibration indicator used by the CLI.
//!
//! - **`storage`** – TOML configuration at the platform config path.

pub mod calibration;
pub mod pointer;
pub mod serial;
pub mod storage;
pub mod video;
pub mod vision;
