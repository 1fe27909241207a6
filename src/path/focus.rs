//! Navigating into a path's success value with optics.
//!
//! `focus` projects the success value through a [`Lens`], cloning the
//! focused field. `focus_optional` projects through an [`Affine`] and turns
//! an absent focus into the path's alternate channel, built from an explicit
//! argument:
//!
//! | Path | absent focus becomes |
//! |---|---|
//! | `MaybePath` | nothing |
//! | `EitherPath` | the supplied `E` |
//! | `TryPath` | the supplied `Failure` |
//! | `ValidationPath` | the supplied `E` |
//! | `TaskPath` | the supplied `Failure`, raised when the task runs |
//!
//! Optics are never consulted on the alternate channel. The pure paths
//! borrow their optic; `TaskPath` takes it by value because it is moved
//! into the deferred stage.
//!
//! # Examples
//!
//! ```rust
//! use railpath::lens;
//! use railpath::optics::FunctionAffine;
//! use railpath::path::Path;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct User { name: String, email: Option<String> }
//!
//! let name = lens!(User, name);
//! let email = FunctionAffine::new(
//!     |user: &User| user.email.as_ref(),
//!     |user: User, email: String| User { email: Some(email), ..user },
//! );
//!
//! let user = User { name: "ada".into(), email: None };
//!
//! let named = Path::right::<String, _>(user.clone()).focus(&name);
//! assert_eq!(named.run(), Ok("ada".to_string()));
//!
//! let mailed = Path::right::<String, _>(user).focus_optional(&email, "no email".to_string());
//! assert_eq!(mailed.run(), Err("no email".to_string()));
//! ```

use super::capability::{Chainable, Mappable};
use super::either::EitherPath;
use super::maybe::MaybePath;
use super::try_path::TryPath;
use super::validation::ValidationPath;
use crate::control::{Try, Validated};
use crate::effect::Failure;
use crate::optics::{Affine, Lens};

impl<A> MaybePath<A> {
    /// Projects the value through `lens`.
    pub fn focus<B, L>(self, lens: L) -> MaybePath<B>
    where
        L: Lens<A, B>,
        B: Clone,
    {
        self.map(|value| lens.get(&value).clone())
    }

    /// Projects the value through `affine`; an absent focus becomes nothing.
    pub fn focus_optional<B, O>(self, affine: O, if_absent: ()) -> MaybePath<B>
    where
        O: Affine<A, B>,
        B: Clone,
    {
        self.focus_optional_with(affine, || if_absent)
    }

    /// Like [`MaybePath::focus_optional`], with a lazily built absent value.
    pub fn focus_optional_with<B, O, F>(self, affine: O, make_absent: F) -> MaybePath<B>
    where
        O: Affine<A, B>,
        B: Clone,
        F: FnOnce(),
    {
        self.via(|value| match affine.get_option(&value) {
            Some(focused) => MaybePath::new(Some(focused.clone())),
            None => {
                make_absent();
                MaybePath::new(None)
            }
        })
    }
}

impl<E, A> EitherPath<E, A> {
    /// Projects the value through `lens`.
    pub fn focus<B, L>(self, lens: L) -> EitherPath<E, B>
    where
        L: Lens<A, B>,
        B: Clone,
    {
        self.map(|value| lens.get(&value).clone())
    }

    /// Projects the value through `affine`; an absent focus becomes `if_absent`.
    pub fn focus_optional<B, O>(self, affine: O, if_absent: E) -> EitherPath<E, B>
    where
        O: Affine<A, B>,
        B: Clone,
    {
        self.focus_optional_with(affine, || if_absent)
    }

    /// Like [`EitherPath::focus_optional`], with a lazily built error.
    pub fn focus_optional_with<B, O, F>(self, affine: O, make_absent: F) -> EitherPath<E, B>
    where
        O: Affine<A, B>,
        B: Clone,
        F: FnOnce() -> E,
    {
        self.via(|value| {
            EitherPath::new(affine.get_option(&value).cloned().ok_or_else(make_absent))
        })
    }
}

impl<A> TryPath<A> {
    /// Projects the value through `lens`.
    pub fn focus<B, L>(self, lens: L) -> TryPath<B>
    where
        L: Lens<A, B>,
        B: Clone,
    {
        self.map(|value| lens.get(&value).clone())
    }

    /// Projects the value through `affine`; an absent focus becomes `if_absent`.
    pub fn focus_optional<B, O>(self, affine: O, if_absent: Failure) -> TryPath<B>
    where
        O: Affine<A, B>,
        B: Clone,
    {
        self.focus_optional_with(affine, || if_absent)
    }

    /// Like [`TryPath::focus_optional`], with a lazily built failure.
    pub fn focus_optional_with<B, O, F>(self, affine: O, make_absent: F) -> TryPath<B>
    where
        O: Affine<A, B>,
        B: Clone,
        F: FnOnce() -> Failure,
    {
        self.via(|value| {
            TryPath::new(match affine.get_option(&value) {
                Some(focused) => Try::success(focused.clone()),
                None => Try::failure(make_absent()),
            })
        })
    }
}

impl<E, A> ValidationPath<E, A> {
    /// Projects the value through `lens`.
    pub fn focus<B, L>(self, lens: L) -> ValidationPath<E, B>
    where
        L: Lens<A, B>,
        B: Clone,
    {
        self.map(|value| lens.get(&value).clone())
    }

    /// Projects the value through `affine`; an absent focus becomes `if_absent`.
    ///
    /// `if_absent` is the whole accumulation, usually a singleton such as
    /// `vec![error]`.
    pub fn focus_optional<B, O>(self, affine: O, if_absent: E) -> ValidationPath<E, B>
    where
        O: Affine<A, B>,
        B: Clone,
    {
        self.focus_optional_with(affine, || if_absent)
    }

    /// Like [`ValidationPath::focus_optional`], with lazily built errors.
    pub fn focus_optional_with<B, O, F>(self, affine: O, make_absent: F) -> ValidationPath<E, B>
    where
        O: Affine<A, B>,
        B: Clone,
        F: FnOnce() -> E,
    {
        self.via(|value| {
            ValidationPath::new(match affine.get_option(&value) {
                Some(focused) => Validated::valid(focused.clone()),
                None => Validated::invalid(make_absent()),
            })
        })
    }
}

#[cfg(feature = "task")]
mod deferred {
    use super::super::task::TaskPath;
    use crate::effect::{Failure, Task};
    use crate::optics::{Affine, Lens};

    impl<A: Send + 'static> TaskPath<A> {
        /// Projects the value through `lens` when the task runs.
        #[must_use]
        pub fn focus<B, L>(self, lens: L) -> TaskPath<B>
        where
            L: Lens<A, B> + Send + 'static,
            B: Clone + Send + 'static,
        {
            self.map(move |value| lens.get(&value).clone())
        }

        /// Projects the value through `affine`; an absent focus fails the
        /// task with `if_absent` when it runs.
        #[must_use]
        pub fn focus_optional<B, O>(self, affine: O, if_absent: Failure) -> TaskPath<B>
        where
            O: Affine<A, B> + Send + 'static,
            B: Clone + Send + 'static,
        {
            self.focus_optional_with(affine, move || if_absent)
        }

        /// Like [`TaskPath::focus_optional`], with a lazily built failure.
        #[must_use]
        pub fn focus_optional_with<B, O, F>(self, affine: O, make_absent: F) -> TaskPath<B>
        where
            O: Affine<A, B> + Send + 'static,
            B: Clone + Send + 'static,
            F: FnOnce() -> Failure + Send + 'static,
        {
            self.via(move |value| {
                TaskPath::new(match affine.get_option(&value) {
                    Some(focused) => Task::pure(focused.clone()),
                    None => Task::fail(make_absent()),
                })
            })
        }
    }
}
