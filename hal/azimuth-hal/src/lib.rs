//! Azimuth Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the sensor node
//! plumbing is written against, so the line assembly and fusion logic can be
//! exercised on the host with mock peripherals.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (azimuth-firmware)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  azimuth-drivers (UartLineSource, ...)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  azimuth-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ azimuth-hal-  │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartRx`] - Non-blocking serial receive
//!
//! [`uart::UartAllocator`] keeps two sensor nodes off the same peripheral.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod uart;

// Re-export key traits at crate root for convenience
pub use uart::{UartAllocator, UartConfig, UartError, UartRx};
