//! The main import API: translate a legacy RAMView project into a Datapool.
//!
//! The entry point is [import_ramview_project], which loads the `.def`
//! project, its `.ram` list files, and the optional `.dat` default values
//! and `.rec` comments, and translates the matching lists into a [Datapool].
//! Every compatibility compromise made along the way is recorded in an
//! [ImportReport] that is returned even on success.

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub use datapool::*;
pub use error::*;
pub use import::*;
pub use kefex_data_type::KefexType;
pub use kefex_project::{DatLoadOutcome, LoadedProject, ProjectError, ProjectOptions};
pub use kefex_variables::{
    AccessRight, ListKind, TypedVariable, VariableList, VariableListCollection,
};

mod datapool;
mod error;
mod import;
