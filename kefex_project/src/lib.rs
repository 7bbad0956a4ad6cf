//! Loaders for the legacy on-disk project formats: checksummed `.def`/`.ram`
//! text files, `.rec` comment files and compressed `.dat` value files.

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub use dat_loader::*;
pub use def_loader::*;
pub use error::*;
pub use ini_safe::*;
pub use rec_loader::*;

pub mod codec;

mod dat_loader;
mod def_loader;
mod error;
mod ini_safe;
mod rec_loader;
