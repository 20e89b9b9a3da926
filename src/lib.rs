//! Audio acquisition firmware for an ATmega128 spectrum analyser board.
//!
//! The engine in [`analyser`] is written against `embedded-hal` traits so it
//! runs unchanged on the board and under host tests. Register-level drivers
//! live in `hal` and are only built for AVR targets.

#![cfg_attr(not(test), no_std)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

pub mod analyser;
pub mod config;
pub mod drivers;
pub mod error;
#[cfg(target_arch = "avr")]
pub mod hal;

pub use analyser::{Analyser, Mode};
pub use error::{Error, Result};
