//! Representation of the KEFEX data types used by variable lists and project files.

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub use data_type::*;

pub mod bits;

mod data_type;
