//! # railpath
//!
//! Railway-oriented effect paths for Rust.
//!
//! ## Overview
//!
//! A *path* wraps a result container and keeps a computation on one of two
//! rails: the success channel, or an alternate channel whose payload
//! depends on the variant. Each step either continues on the success rail
//! or passes the alternate through untouched.
//!
//! - **Paths**: `MaybePath`, `EitherPath`, `TryPath`, `ValidationPath` and
//!   the deferred `TaskPath`, built through the `Path` factory
//! - **Capabilities**: `Mappable`, `Chainable`, `Combinable`, `Recoverable`,
//!   `Accumulating`
//! - **Containers**: `Try` (captured errors and panics) and `Validated`
//!   (accumulated errors), next to `Option` and `Result`
//! - **Optics**: `Lens`, `Prism` and `Affine`, usable from any path through
//!   `focus` and `focus_optional`
//! - **Deferred effects**: `Task`, structured parallelism with `Par`,
//!   timeouts, retries and resource brackets on a tokio runtime
//!
//! ## Feature Flags
//!
//! - `task` (default): `Task`, `TaskPath`, `Par`, `RetryPolicy` and the runtime
//! - `serde`: serialization of `Validated`, `MaybePath`, `EitherPath` and
//!   `ValidationPath`
//! - `full`: enable all features
//!
//! ## Example
//!
//! ```rust
//! use railpath::prelude::*;
//! use railpath::lens;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Order { id: u32, total: u64 }
//!
//! fn lookup(id: u32) -> EitherPath<String, Order> {
//!     if id == 7 {
//!         Path::right(Order { id, total: 1250 })
//!     } else {
//!         Path::left(format!("order {id} not found"))
//!     }
//! }
//!
//! let total = lookup(7)
//!     .focus(&lens!(Order, total))
//!     .map(|cents| cents / 100);
//! assert_eq!(total.run(), Ok(12));
//!
//! let missing = lookup(8).focus(&lens!(Order, total)).recover(|_| 0);
//! assert_eq!(missing.run(), Ok(0));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports the paths, their capability traits, the containers, the
/// optics and the effect types.
///
/// # Usage
///
/// ```rust
/// use railpath::prelude::*;
///
/// assert_eq!(Path::just(2).map(|x| x * 3).run(), Some(6));
/// ```
pub mod prelude {
    pub use crate::control::*;
    pub use crate::effect::*;
    pub use crate::optics::*;
    pub use crate::path::*;
    pub use crate::typeclass::*;
}

pub mod control;
pub mod effect;
pub mod optics;
pub mod path;
pub mod typeclass;
