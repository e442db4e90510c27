//! Command implementations.
//!
//! - [`convert`] - render documents and print block descriptor JSON
//! - [`check`] - render documents and report diagnostics
//!
//! Each command exposes an `execute` function taking its parsed arguments
//! and the optional `--config` path.

pub mod check;
pub mod convert;
pub(crate) mod inputs;

pub use check::execute as check_execute;
pub use convert::execute as convert_execute;
