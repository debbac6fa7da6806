//! Logging shim
//!
//! Routes `trace!`..`error!` to `defmt` on target and compiles them away on
//! host builds, so the link core can log without caring where it runs.

#![allow(unused_macros)]

#[cfg(feature = "embedded")]
macro_rules! trace { ($($arg:tt)*) => { ::defmt::trace!($($arg)*) }; }
#[cfg(feature = "embedded")]
macro_rules! debug { ($($arg:tt)*) => { ::defmt::debug!($($arg)*) }; }
#[cfg(feature = "embedded")]
macro_rules! info { ($($arg:tt)*) => { ::defmt::info!($($arg)*) }; }
#[cfg(feature = "embedded")]
macro_rules! warn { ($($arg:tt)*) => { ::defmt::warn!($($arg)*) }; }
#[cfg(feature = "embedded")]
macro_rules! error { ($($arg:tt)*) => { ::defmt::error!($($arg)*) }; }

#[cfg(not(feature = "embedded"))]
macro_rules! trace { ($($arg:tt)*) => { let _ = ($($arg)*,); }; }
#[cfg(not(feature = "embedded"))]
macro_rules! debug { ($($arg:tt)*) => { let _ = ($($arg)*,); }; }
#[cfg(not(feature = "embedded"))]
macro_rules! info { ($($arg:tt)*) => { let _ = ($($arg)*,); }; }
#[cfg(not(feature = "embedded"))]
macro_rules! warn { ($($arg:tt)*) => { let _ = ($($arg)*,); }; }
#[cfg(not(feature = "embedded"))]
macro_rules! error { ($($arg:tt)*) => { let _ = ($($arg)*,); }; }
