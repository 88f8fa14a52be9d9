//! Domain types with no I/O.
//!
//! - **`target`** – Pointer targets, screen bounds, and the speed tiers that
//!   distinguish machine-driven moves from interactive ones.

pub mod target;
