// Copyright 2025 Cameron Swords
// SPDX-License-Identifier: Apache-2.0

//! Convenience combinators built on top of the core IR (spec §4.1 bracketing
//! helpers, `concatMap`).

use crate::doc::Doc;

impl Doc {
    /// A literal comma (`,`).
    pub fn comma() -> Doc {
        Doc::comma_leaf()
    }

    /// `comma ++ breakable_space`.
    pub fn comma_breakable_space() -> Doc {
        Doc::comma().concat(Doc::breakable_space())
    }

    /// `if_broken(string(","), empty)`, a comma that appears only when the
    /// enclosing group is broken.
    pub fn trailing_comma() -> Doc {
        Doc::if_broken(Doc::string(","), Doc::empty())
    }

    /// Wrap `doc` in `before`/`after`, inside `wrap`'s layout scope.
    ///
    /// The bracketing helpers below (`parens`, `braces`, ...) all go through
    /// this with `wrap = Doc::group_auto`; `*_with` variants are provided for
    /// callers who need a different group kind or a `print_width` override.
    fn bracket_with(
        before: Doc,
        doc: Doc,
        after: Doc,
        wrap: impl FnOnce(Doc) -> Doc,
    ) -> Doc {
        wrap(before.concat(doc).concat(after))
    }

    /// Surround `doc` with `(` and `)`, in a default [`Doc::group_auto`] scope.
    pub fn parens(doc: Doc) -> Doc {
        Doc::parens_with(Doc::group_auto, doc)
    }

    /// [`Doc::parens`] with a caller-supplied wrapping function instead of
    /// the default `group_auto`.
    pub fn parens_with(wrap: impl FnOnce(Doc) -> Doc, doc: Doc) -> Doc {
        Doc::bracket_with(Doc::string("("), doc, Doc::string(")"), wrap)
    }

    /// Surround `doc` with `{` and `}`, in a default [`Doc::group_auto`] scope.
    pub fn braces(doc: Doc) -> Doc {
        Doc::braces_with(Doc::group_auto, doc)
    }

    pub fn braces_with(wrap: impl FnOnce(Doc) -> Doc, doc: Doc) -> Doc {
        Doc::bracket_with(Doc::string("{"), doc, Doc::string("}"), wrap)
    }

    /// Surround `doc` with `[` and `]`, in a default [`Doc::group_auto`] scope.
    pub fn list_brackets(doc: Doc) -> Doc {
        Doc::list_brackets_with(Doc::group_auto, doc)
    }

    pub fn list_brackets_with(wrap: impl FnOnce(Doc) -> Doc, doc: Doc) -> Doc {
        Doc::bracket_with(Doc::string("["), doc, Doc::string("]"), wrap)
    }

    /// Alias of [`Doc::list_brackets`] for array-shaped call sites.
    pub fn array_brackets(doc: Doc) -> Doc {
        Doc::list_brackets(doc)
    }

    pub fn array_brackets_with(wrap: impl FnOnce(Doc) -> Doc, doc: Doc) -> Doc {
        Doc::list_brackets_with(wrap, doc)
    }

    /// Surround `doc` with `<` and `>`, in a default [`Doc::group_auto`] scope.
    pub fn angle_brackets(doc: Doc) -> Doc {
        Doc::angle_brackets_with(Doc::group_auto, doc)
    }

    pub fn angle_brackets_with(wrap: impl FnOnce(Doc) -> Doc, doc: Doc) -> Doc {
        Doc::bracket_with(Doc::string("<"), doc, Doc::string(">"), wrap)
    }

    /// Surround `doc` with `"` characters (no escaping is performed; callers
    /// escape their own content before calling this, same as `string`).
    pub fn double_quotes(doc: Doc) -> Doc {
        Doc::string("\"").concat(doc).concat(Doc::string("\""))
    }

    /// Compose a document over a non-empty slice with distinct first/middle/
    /// last treatment:
    ///
    /// - the first element emits `lead(first)`,
    /// - each adjacent pair `(a, b)` emits `f(false, a) ++ sep(a, b)`,
    /// - the last element emits `f(true, last) ++ trail(last)`.
    ///
    /// Empty input yields [`Doc::empty`]. Grounded on the same slice-indexed
    /// recursive shape as the teacher crate's `Doc::fill_core`.
    pub fn concat_map<T>(
        items: &[T],
        sep: impl Fn(&T, &T) -> Doc,
        lead: impl Fn(&T) -> Doc,
        trail: impl Fn(&T) -> Doc,
        f: impl Fn(bool, &T) -> Doc,
    ) -> Doc {
        match items {
            [] => Doc::empty(),
            _ => {
                let rest = concat_map_rec(items, 0, &sep, &trail, &f);
                lead(&items[0]).concat(rest)
            }
        }
    }
}

fn concat_map_rec<T>(
    items: &[T],
    idx: usize,
    sep: &impl Fn(&T, &T) -> Doc,
    trail: &impl Fn(&T) -> Doc,
    f: &impl Fn(bool, &T) -> Doc,
) -> Doc {
    match &items[idx..] {
        [] => unreachable!("concat_map_rec invariant violated: entered with an empty slice"),
        [only] => f(true, only).concat(trail(only)),
        [a, b, ..] => f(false, a)
            .concat(sep(a, b))
            .concat(concat_map_rec(items, idx + 1, sep, trail, f)),
    }
}
