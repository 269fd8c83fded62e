// Copyright 2025 Cameron Swords
// SPDX-License-Identifier: Apache-2.0

//! A pretty-printing engine in the Wadler/Oppen tradition.
//!
//! Build a [`Doc`] tree with the constructors on [`Doc`] (or the combinators
//! in [`combinators`]), then render it with [`print`] or [`to_string`]. The
//! engine makes line-break decisions in a single pass, in constant time per
//! node, by caching each composite node's width at construction time instead
//! of re-measuring its subtree on every render.
//!
//! ```rust
//! use doclayout::{to_string, Doc, Eol};
//!
//! let doc = Doc::group_auto(
//!     Doc::string("foo")
//!         .concat(Doc::breakable_space())
//!         .concat(Doc::string("bar")),
//! );
//! assert_eq!(to_string(Eol::Lf, 80, &doc), "foo bar");
//! assert_eq!(to_string(Eol::Lf, 5, &doc), "foo\nbar");
//! ```

mod combinators;
mod doc;
mod engine;
mod width;

mod tests;

pub use doc::{Doc, GroupKind};
pub use engine::{print, to_string, Eol};
pub use width::Width;

/// Types that know how to build their own [`Doc`].
///
/// A thin ergonomic layer over the constructors: implement `to_doc` once for
/// an AST node and get a default `render` for free.
pub trait ToDoc {
    fn to_doc(&self) -> Doc;

    fn render(&self, eol: Eol, line_width: usize) -> String {
        to_string(eol, line_width, &self.to_doc())
    }
}
