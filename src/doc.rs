// Copyright 2025 Cameron Swords
// SPDX-License-Identifier: Apache-2.0

use std::rc::Rc;

use once_cell::unsync::Lazy;
use unicode_width::UnicodeWidthStr;

use crate::width::Width;

/// How a [`Doc::group`] chooses whether to take its break hints as breaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupKind {
    /// Break the whole group if its flat form does not fit; otherwise render
    /// the whole group flat.
    Auto,
    /// Take break hints one at a time, breaking a hint only if it (plus the
    /// next node's *flat* width) would overflow the line.
    FitGroups,
    /// Like `FitGroups`, but compares against the next node's *breaking*
    /// width instead of its flat width.
    FitAll,
}

/// An immutable, `Rc`-shared pretty-printing document.
///
/// Documents are built bottom-up by the constructors on this type and never
/// mutated afterward; every composite node precomputes the [`Width`]s the
/// layout engine needs so that concatenation and group fit-checks are O(1).
pub struct Doc(pub(crate) Rc<DocInner>);

impl Clone for Doc {
    fn clone(&self) -> Self {
        Doc(Rc::clone(&self.0))
    }
}

pub(crate) enum DocInner {
    Empty,
    GroupBreaker,
    String {
        value: String,
        width: Width,
    },
    Blank {
        count: usize,
    },
    BreakHint {
        doc: Doc,
        flat_width: Width,
    },
    Hardline {
        phantom: bool,
    },
    IfBroken {
        flat: Doc,
        breaking: Doc,
        flat_width: Width,
        breaking_width: Width,
    },
    Indent {
        count: usize,
        doc: Doc,
        has_group_breaker: bool,
        flat_width: Width,
        breaking_width: Width,
    },
    Group {
        kind: GroupKind,
        doc: Doc,
        flat_width: Width,
        breaking_width: Width,
    },
    Concat {
        left: Doc,
        right: Doc,
        has_group_breaker: bool,
        flat_width: Width,
        breaking_width: Width,
    },
}

impl DocInner {
    fn into_doc(self) -> Doc {
        Doc(Rc::new(self))
    }
}

// -----------------------------------------------------------------------
// Width / group-breaker accessors
//
// These read the cached fields a node's constructor already computed; they
// never walk a subtree at render time.
// -----------------------------------------------------------------------

pub(crate) fn flat_width(doc: &Doc) -> Width {
    match &*doc.0 {
        DocInner::Empty => Width::WithoutBreak(0),
        DocInner::GroupBreaker => Width::WithoutBreak(0),
        DocInner::String { width, .. } => *width,
        DocInner::Blank { count } => Width::WithoutBreak(*count),
        DocInner::BreakHint { flat_width, .. } => *flat_width,
        DocInner::Hardline { phantom } => {
            if *phantom {
                Width::WithoutBreak(0)
            } else {
                Width::WithBreak(0)
            }
        }
        DocInner::IfBroken { flat_width, .. } => *flat_width,
        DocInner::Indent { flat_width, .. } => *flat_width,
        DocInner::Group { flat_width, .. } => *flat_width,
        DocInner::Concat { flat_width, .. } => *flat_width,
    }
}

pub(crate) fn breaking_width(doc: &Doc) -> Width {
    match &*doc.0 {
        DocInner::Empty => Width::WithoutBreak(0),
        DocInner::GroupBreaker => Width::WithoutBreak(0),
        DocInner::String { width, .. } => *width,
        DocInner::Blank { count } => Width::WithoutBreak(*count),
        // A BreakHint's breaking width is always a zero-width break: if the
        // hint is taken, nothing to its right extends this node's width.
        DocInner::BreakHint { .. } => Width::WithBreak(0),
        DocInner::Hardline { phantom } => {
            if *phantom {
                Width::WithoutBreak(0)
            } else {
                Width::WithBreak(0)
            }
        }
        DocInner::IfBroken { breaking_width, .. } => *breaking_width,
        DocInner::Indent { breaking_width, .. } => *breaking_width,
        DocInner::Group { breaking_width, .. } => *breaking_width,
        DocInner::Concat { breaking_width, .. } => *breaking_width,
    }
}

/// True iff `doc`'s subtree contains a [`Doc::group_breaker`] not enclosed by
/// any nested [`Doc::group`]. Only `Concat` and `Indent` propagate this flag
/// from their children; a `Group` always reads as `false` from the outside,
/// since it absorbs any breaker within itself (spec §3.3 invariant 3).
pub(crate) fn has_group_breaker(doc: &Doc) -> bool {
    match &*doc.0 {
        DocInner::GroupBreaker => true,
        DocInner::Concat {
            has_group_breaker, ..
        } => *has_group_breaker,
        DocInner::Indent {
            has_group_breaker, ..
        } => *has_group_breaker,
        _ => false,
    }
}

// -----------------------------------------------------------------------
// Interned leaves
// -----------------------------------------------------------------------

thread_local! {
    static EMPTY_INNER: Lazy<Rc<DocInner>> = Lazy::new(|| Rc::new(DocInner::Empty));
    static GROUP_BREAKER_INNER: Lazy<Rc<DocInner>> = Lazy::new(|| Rc::new(DocInner::GroupBreaker));
    static HARDLINE_INNER: Lazy<Rc<DocInner>> =
        Lazy::new(|| Rc::new(DocInner::Hardline { phantom: false }));
    static PHANTOM_HARDLINE_INNER: Lazy<Rc<DocInner>> =
        Lazy::new(|| Rc::new(DocInner::Hardline { phantom: true }));
    static SPACE_INNER: Lazy<Doc> = Lazy::new(|| Doc::blank(1));
    static BREAK_INNER: Lazy<Doc> = Lazy::new(|| Doc::break_hint(Doc::empty()));
    static BREAKABLE_SPACE_INNER: Lazy<Doc> = Lazy::new(|| Doc::break_hint(Doc::blank(1)));
    static COMMA_INNER: Lazy<Doc> = Lazy::new(|| Doc::string(","));
}

impl Doc {
    // -------------------------------------------------------------------
    // Core constructors (spec §4.1 / §6.4)
    // -------------------------------------------------------------------

    /// No output, zero width.
    pub fn empty() -> Doc {
        EMPTY_INNER.with(|lazy| Doc(Rc::clone(&lazy)))
    }

    /// Emit `s` literally. Width is the unicode-aware column count of `s`,
    /// not its byte length or `char` count.
    pub fn string<S: AsRef<str> + Into<String>>(s: S) -> Doc {
        let width = Width::WithoutBreak(s.as_ref().width());
        DocInner::String {
            value: s.into(),
            width,
        }
        .into_doc()
    }

    /// Emit `count` literal spaces.
    pub fn blank(count: usize) -> Doc {
        DocInner::Blank { count }.into_doc()
    }

    /// A single literal space (`blank(1)`).
    pub fn space() -> Doc {
        SPACE_INNER.with(|lazy| lazy.clone())
    }

    /// A candidate break location: emits `doc` when the enclosing group does
    /// not take the break, or a line break (with indentation) when it does.
    pub fn break_hint(doc: Doc) -> Doc {
        let flat_width = flat_width(&doc);
        DocInner::BreakHint { doc, flat_width }.into_doc()
    }

    /// A break hint that falls back to nothing when not broken
    /// (`break_hint(empty())`).
    pub fn break_() -> Doc {
        BREAK_INNER.with(|lazy| lazy.clone())
    }

    /// A break hint that falls back to a single space when not broken
    /// (`break_hint(blank(1))`).
    pub fn breakable_space() -> Doc {
        BREAKABLE_SPACE_INNER.with(|lazy| lazy.clone())
    }

    /// Always emits a newline. Width-wise this is `WithBreak(0)`, which makes
    /// further concatenation past it idempotent (spec §3.3 invariant 2).
    pub fn hardline() -> Doc {
        HARDLINE_INNER.with(|lazy| Doc(Rc::clone(&lazy)))
    }

    /// Like [`Doc::hardline`], but contributes zero width for fit purposes
    /// instead of terminating the enclosing width computation.
    pub fn phantom_hardline() -> Doc {
        PHANTOM_HARDLINE_INNER.with(|lazy| Doc(Rc::clone(&lazy)))
    }

    /// A marker that, wherever it appears inside a group (not nested inside
    /// a further group), forces that group into Breaking mode.
    pub fn group_breaker() -> Doc {
        GROUP_BREAKER_INNER.with(|lazy| Doc(Rc::clone(&lazy)))
    }

    /// Emit `breaking` if the enclosing group's scope is currently broken,
    /// otherwise `flat`.
    pub fn if_broken(breaking: Doc, flat: Doc) -> Doc {
        let flat_width = flat_width(&flat);
        let breaking_width = breaking_width(&breaking);
        DocInner::IfBroken {
            flat,
            breaking,
            flat_width,
            breaking_width,
        }
        .into_doc()
    }

    /// Increase the pending indentation by `count` columns for any newline
    /// emitted while rendering `doc` (spec §4.2's `Indent` rendering rule).
    pub fn indent(count: usize, doc: Doc) -> Doc {
        let has_group_breaker = has_group_breaker(&doc);
        let flat_width = flat_width(&doc);
        let breaking_width = breaking_width(&doc);
        DocInner::Indent {
            count,
            doc,
            has_group_breaker,
            flat_width,
            breaking_width,
        }
        .into_doc()
    }

    /// [`Doc::indent`] with the conventional two-column default.
    pub fn indent_default(doc: Doc) -> Doc {
        Doc::indent(2, doc)
    }

    /// A layout scope with its own break mode.
    ///
    /// If `print_width` is supplied, both cached widths become
    /// `WithoutBreak(print_width)`, overriding the natural measurement.
    /// This matters when `doc` contains hardlines, which would otherwise
    /// terminate the measured width early.
    pub fn group(print_width: Option<usize>, kind: GroupKind, doc: Doc) -> Doc {
        let (flat_width, breaking_width) = match print_width {
            Some(w) => (Width::WithoutBreak(w), Width::WithoutBreak(w)),
            None => (flat_width(&doc), breaking_width(&doc)),
        };
        DocInner::Group {
            kind,
            doc,
            flat_width,
            breaking_width,
        }
        .into_doc()
    }

    /// [`Doc::group`] with no `print_width` override and [`GroupKind::Auto`].
    pub fn group_auto(doc: Doc) -> Doc {
        Doc::group(None, GroupKind::Auto, doc)
    }

    /// Sequential composition of `self` then `other`.
    pub fn concat(self, other: Doc) -> Doc {
        let has_group_breaker = has_group_breaker(&self) || has_group_breaker(&other);
        let breaking_width = breaking_width(&self).add(breaking_width(&other));
        // When either side certainly forces a break, Flat is irrelevant for
        // this node, so flatWidth collapses to breakingWidth (spec §3.3).
        let flat_width = if has_group_breaker {
            breaking_width
        } else {
            flat_width(&self).add(flat_width(&other))
        };
        DocInner::Concat {
            left: self,
            right: other,
            has_group_breaker,
            flat_width,
            breaking_width,
        }
        .into_doc()
    }

    // -------------------------------------------------------------------
    // Constant leaves used by the combinator layer
    // -------------------------------------------------------------------

    pub(crate) fn comma_leaf() -> Doc {
        COMMA_INNER.with(|lazy| lazy.clone())
    }
}

impl std::ops::Add for Doc {
    type Output = Doc;

    /// Infix spelling of [`Doc::concat`].
    fn add(self, other: Doc) -> Doc {
        self.concat(other)
    }
}
