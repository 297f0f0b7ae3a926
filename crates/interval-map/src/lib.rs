//! Compressed interval maps: total maps over an ordered key space, stored as
//! the minimal set of points where the value changes

#![deny(
    clippy::disallowed_methods,
    clippy::suspicious,
    clippy::style,
    clippy::clone_on_ref_ptr,
    missing_debug_implementations,
    missing_copy_implementations
)]
#![warn(clippy::pedantic, missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(missing_docs)] // TODO: document the iterator and script types

pub mod interval;
pub mod map;
pub mod script;

pub use interval::Interval;
pub use map::CompressedIntervalMap;
