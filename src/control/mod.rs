//! Result containers beyond `Option` and `Result`.
//!
//! The path family wraps five containers. Two come from the standard
//! library (`Option<A>`, `Result<A, E>`), the deferred one lives in
//! [`crate::effect`], and the remaining two are defined here:
//!
//! - [`Try`]: success or a captured [`Failure`](crate::effect::Failure),
//!   including panics
//! - [`Validated`]: success or accumulated errors
//!
//! # Examples
//!
//! ```rust
//! use railpath::control::{Try, Validated};
//!
//! let parsed = Try::of(|| "12".parse::<u8>()).map(|n| n + 1);
//! assert_eq!(parsed.ok(), Some(13));
//!
//! let checked: Validated<Vec<&str>, u8> = Validated::invalid(vec!["too small"]);
//! assert_eq!(checked.error(), Some(&vec!["too small"]));
//! ```

mod attempt;
mod validated;

pub use attempt::Try;
pub use validated::Validated;
