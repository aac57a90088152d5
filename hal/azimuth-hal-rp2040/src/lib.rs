//! RP2040-specific HAL for the bearing display firmware
//!
//! This crate provides RP2040-specific implementations of the shared
//! `azimuth-hal` traits:
//!
//! - UART peripheral identification, allocation over `azimuth_hal::UartAllocator`
//! - `UartConfig` to embassy-rp configuration conversion
//! - Buffered UART receiver implementing `azimuth_hal::UartRx`

#![no_std]

pub mod uart;

pub use azimuth_hal::UartError;
pub use uart::{to_embassy_config, RpUartRx, UartAllocator, UartId};
