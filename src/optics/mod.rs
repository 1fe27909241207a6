//! Optics: composable accessors for immutable data.
//!
//! Three optics are enough to navigate from a path's success value into
//! nested data:
//!
//! ```text
//! Lens    total focus          get / set
//! Prism   one enum case        preview / review
//! Affine  zero-or-one focus    get_option / set
//!
//! Lens + Prism   = Affine
//! Affine + Lens  = Affine
//! Affine + Prism = Affine
//! ```
//!
//! Every path's `focus` accepts a [`Lens`]; `focus_optional` accepts an
//! [`Affine`].
//!
//! # Examples
//!
//! ```
//! use railpath::optics::{Affine, Lens};
//! use railpath::{lens, prism};
//!
//! #[derive(Clone, PartialEq, Debug)]
//! enum Plan { Free, Paid(Billing) }
//!
//! #[derive(Clone, PartialEq, Debug)]
//! struct Billing { seats: u32 }
//!
//! #[derive(Clone, PartialEq, Debug)]
//! struct Team { name: String, plan: Plan }
//!
//! let seats = lens!(Team, plan)
//!     .compose_prism(prism!(Plan, Paid))
//!     .compose_lens(lens!(Billing, seats));
//!
//! let paid = Team { name: "core".into(), plan: Plan::Paid(Billing { seats: 4 }) };
//! let free = Team { name: "side".into(), plan: Plan::Free };
//!
//! assert_eq!(seats.get_option(&paid), Some(&4));
//! assert_eq!(seats.get_option(&free), None);
//! assert_eq!(seats.set(paid, 8).plan, Plan::Paid(Billing { seats: 8 }));
//! ```

mod affine;
mod lens;
mod prism;

pub use affine::{
    Affine, AffinePrism, ComposedAffine, FunctionAffine, LensAsAffine, LensPrismAffine,
};
pub use lens::{ComposedLens, FunctionLens, Lens};
pub use prism::{ComposedPrism, FunctionPrism, Prism};
