#![doc = include_str!("../../README.md")]
//! ## Feature flags
#![doc = document_features::document_features!()]
#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod config;
pub mod driver;
pub mod key_buffer;
pub mod keymap;
pub mod keypad;
pub mod light;
pub mod matrix;

pub use crate::config::KeypadConfig;
pub use crate::driver::soft_uart::SoftUartTx;
pub use crate::keymap::{DEFAULT_KEYMAP, Keymap};
pub use crate::keypad::Keypad;
pub use crate::light::LedBank;
pub use crate::matrix::Matrix;
