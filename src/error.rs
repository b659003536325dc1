//! Error types and result aliases for phpfold.
//!
//! - [`Result<T>`]: Type alias for `anyhow::Result<T>` used by the I/O, config
//!   and CLI layers. The scanner itself cannot fail.

use anyhow::Result as AnyhowResult;

pub type Result<T> = AnyhowResult<T>;
