// Copyright 2025 Cameron Swords
// SPDX-License-Identifier: Apache-2.0

//! The layout engine: a single-pass traversal that turns a [`Doc`] into
//! text, making line-break decisions as it goes.
//!
//! The traversal is an explicit work stack of [`Cmd`]s rather than a
//! recursive call, following the same shape as the teacher crate's own
//! `Doc::best`/`fits` cons-list walk (and the `g-plane-tiny_pretty` printer
//! in the reference pack): this gives the "one-node lookahead" that Fit
//! modes need by simply peeking the next stack entry, with no extra tree
//! walk and no boxed continuation.

use std::cell::RefCell;
use std::rc::Rc;

use crate::doc::{breaking_width, flat_width, has_group_breaker, Doc, DocInner, GroupKind};
use crate::width::Width;

/// End-of-line style, applied uniformly to every emitted newline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eol {
    Lf,
    Crlf,
}

impl Eol {
    fn as_str(self) -> &'static str {
        match self {
            Eol::Lf => "\n",
            Eol::Crlf => "\r\n",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Flat,
    Breaking,
    FitFlat,
    FitBreaking,
}

/// A group's mutable layout scope (spec §4.2 "Group scope").
struct GroupScope {
    mode: Mode,
    global_indent: usize,
    local_indent: usize,
    broken: bool,
}

type Scope = Rc<RefCell<GroupScope>>;

enum Cmd {
    Node { scope: Scope, doc: Doc },
    /// Restores a parent `Indent`'s saved indentation once its subtree has
    /// been fully processed (spec §4.2: "save ... ; render doc; restore
    /// both saved values").
    RestoreIndent {
        scope: Scope,
        saved_global: usize,
        saved_local: usize,
    },
}

/// Render `doc` by calling `write` for each output chunk, in order.
///
/// Returns after `doc` is fully traversed. A panic from `write` unwinds the
/// traversal cleanly; no partial state is kept beyond what `write` already
/// received.
pub fn print<W: FnMut(&str)>(mut write: W, eol: Eol, line_width: usize, doc: &Doc) {
    // Outside of any explicit `Group`, break hints render their flat
    // fallback and `IfBroken` reads as unbroken. Rendering a bare `Doc` is
    // equivalent to rendering it inside a `group` that happened to fit,
    // both render Flat. `Hardline` ignores scope mode entirely, so top-level
    // hard breaks are unaffected by this.
    let root = Rc::new(RefCell::new(GroupScope {
        mode: Mode::Flat,
        global_indent: 0,
        local_indent: 0,
        broken: false,
    }));

    let mut stack: Vec<Cmd> = vec![Cmd::Node {
        scope: root,
        doc: doc.clone(),
    }];
    let mut column: usize = 0;
    // At most one pending indentation string, flushed lazily so blank-only
    // lines stay truly empty (spec §4.2 "writeQueue").
    let mut pending_indent: Option<usize> = None;

    macro_rules! flush {
        () => {
            if let Some(n) = pending_indent.take() {
                if n > 0 {
                    write(&" ".repeat(n));
                }
            }
        };
    }

    macro_rules! take_break {
        ($scope:expr) => {{
            let mut s = $scope.borrow_mut();
            s.broken = true;
            s.global_indent += s.local_indent;
            s.local_indent = 0;
            write(eol.as_str());
            column = s.global_indent;
            pending_indent = Some(s.global_indent);
        }};
    }

    while let Some(cmd) = stack.pop() {
        match cmd {
            Cmd::RestoreIndent {
                scope,
                saved_global,
                saved_local,
            } => {
                let mut s = scope.borrow_mut();
                s.global_indent = saved_global;
                s.local_indent = saved_local;
            }
            Cmd::Node { scope, doc } => match &*doc.0 {
                DocInner::Empty | DocInner::GroupBreaker => {}
                DocInner::String { value, width } => {
                    flush!();
                    write(value);
                    column += width.value();
                }
                DocInner::Blank { count } => {
                    flush!();
                    if *count > 0 {
                        write(&" ".repeat(*count));
                    }
                    column += count;
                }
                DocInner::Concat { left, right, .. } => {
                    stack.push(Cmd::Node {
                        scope: scope.clone(),
                        doc: right.clone(),
                    });
                    stack.push(Cmd::Node {
                        scope: scope.clone(),
                        doc: left.clone(),
                    });
                }
                DocInner::Indent { count, doc, .. } => {
                    let (saved_global, saved_local) = {
                        let mut s = scope.borrow_mut();
                        let saved = (s.global_indent, s.local_indent);
                        s.local_indent += count;
                        saved
                    };
                    stack.push(Cmd::RestoreIndent {
                        scope: scope.clone(),
                        saved_global,
                        saved_local,
                    });
                    stack.push(Cmd::Node {
                        scope: scope.clone(),
                        doc: doc.clone(),
                    });
                }
                DocInner::Hardline { .. } => {
                    take_break!(scope);
                }
                DocInner::IfBroken { flat, breaking, .. } => {
                    let broken = scope.borrow().broken;
                    let next = if broken { breaking } else { flat };
                    stack.push(Cmd::Node {
                        scope,
                        doc: next.clone(),
                    });
                }
                DocInner::BreakHint { doc: fallback, flat_width } => {
                    let mode = scope.borrow().mode;
                    match mode {
                        Mode::Flat => stack.push(Cmd::Node {
                            scope,
                            doc: fallback.clone(),
                        }),
                        Mode::Breaking => take_break!(scope),
                        Mode::FitFlat | Mode::FitBreaking => {
                            let next_width = peek_next_width(&stack, mode == Mode::FitBreaking);
                            let overflow =
                                column + flat_width.value() + next_width.value() > line_width;
                            if overflow {
                                take_break!(scope);
                            } else {
                                stack.push(Cmd::Node {
                                    scope,
                                    doc: fallback.clone(),
                                });
                            }
                        }
                    }
                }
                DocInner::Group {
                    kind,
                    doc: inner,
                    flat_width,
                    ..
                } => {
                    let breaker_inside = has_group_breaker(inner);
                    let mode = if breaker_inside {
                        Mode::Breaking
                    } else {
                        match kind {
                            GroupKind::Auto => {
                                if column + flat_width.value() > line_width {
                                    Mode::Breaking
                                } else {
                                    Mode::Flat
                                }
                            }
                            GroupKind::FitGroups => Mode::FitFlat,
                            GroupKind::FitAll => Mode::FitBreaking,
                        }
                    };
                    let global_indent = scope.borrow().global_indent;
                    let new_scope = Rc::new(RefCell::new(GroupScope {
                        mode,
                        global_indent,
                        local_indent: 0,
                        broken: breaker_inside,
                    }));
                    stack.push(Cmd::Node {
                        scope: new_scope,
                        doc: inner.clone(),
                    });
                }
            },
        }
    }
}

/// Peek the width of the next node that would be rendered after the current
/// position, without popping anything off `stack`. Used by Fit-mode break
/// hints for their one-node lookahead (spec §4.2 "the continuation trick").
fn peek_next_width(stack: &[Cmd], use_breaking: bool) -> Width {
    for cmd in stack.iter().rev() {
        if let Cmd::Node { doc, .. } = cmd {
            return if use_breaking {
                breaking_width(doc)
            } else {
                flat_width(doc)
            };
        }
    }
    Width::WithoutBreak(0)
}

/// Render `doc` to a freshly allocated `String`.
pub fn to_string(eol: Eol, line_width: usize, doc: &Doc) -> String {
    let mut out = String::new();
    print(|chunk| out.push_str(chunk), eol, line_width, doc);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{Doc, GroupKind};

    fn render(width: usize, doc: &Doc) -> String {
        to_string(Eol::Lf, width, doc)
    }

    // ---- S1 / S2: flat fit vs forced break ---------------------------

    #[test]
    fn s1_flat_fit() {
        let doc = Doc::group_auto(
            Doc::string("foo")
                .concat(Doc::breakable_space())
                .concat(Doc::string("bar")),
        );
        assert_eq!(render(80, &doc), "foo bar");
    }

    #[test]
    fn s2_forced_break() {
        let doc = Doc::group_auto(
            Doc::string("foo")
                .concat(Doc::breakable_space())
                .concat(Doc::string("bar")),
        );
        assert_eq!(render(5, &doc), "foo\nbar");
    }

    // ---- S3 / S4: indent activates only on break ----------------------

    #[test]
    fn s3_indent_activates_on_break() {
        let doc = Doc::group_auto(Doc::indent(
            2,
            Doc::string("foo")
                .concat(Doc::breakable_space())
                .concat(Doc::string("bar")),
        ));
        assert_eq!(render(5, &doc), "foo\n  bar");
    }

    #[test]
    fn s4_indent_inert_when_flat() {
        let doc = Doc::group_auto(Doc::indent(
            2,
            Doc::string("foo")
                .concat(Doc::breakable_space())
                .concat(Doc::string("bar")),
        ));
        assert_eq!(render(80, &doc), "foo bar");
    }

    // ---- S5: trailing comma in broken list -----------------------------

    #[test]
    fn s5_trailing_comma_broken_list() {
        let inner = Doc::string("a")
            .concat(Doc::comma_leaf())
            .concat(Doc::breakable_space())
            .concat(Doc::string("b"))
            .concat(Doc::if_broken(Doc::comma_leaf(), Doc::empty()));
        let doc = Doc::group_auto(
            Doc::string("[").concat(inner.clone()).concat(Doc::string("]")),
        );
        assert_eq!(render(3, &doc), "[a,\nb,]");

        let doc = Doc::group_auto(Doc::string("[").concat(inner).concat(Doc::string("]")));
        assert_eq!(render(80, &doc), "[a, b]");
    }

    // ---- S6: FitGroups keeps as many subgroups flat as possible --------

    #[test]
    fn s6_fit_groups_packs_subgroups() {
        let doc = Doc::group(
            None,
            GroupKind::FitGroups,
            Doc::group_auto(Doc::string("aaaa"))
                .concat(Doc::breakable_space())
                .concat(Doc::group_auto(Doc::string("bbbb")))
                .concat(Doc::breakable_space())
                .concat(Doc::group_auto(Doc::string("cccc"))),
        );
        assert_eq!(render(9, &doc), "aaaa bbbb\ncccc");
    }

    // ---- S7: GroupBreaker forces breaking mode -------------------------

    #[test]
    fn s7_group_breaker_forces_break() {
        let doc = Doc::group_auto(
            Doc::group_breaker()
                .concat(Doc::string("a"))
                .concat(Doc::breakable_space())
                .concat(Doc::string("b")),
        );
        assert_eq!(render(80, &doc), "a\nb");
    }

    // ---- S8: IfBroken in FitGroups sees pre-break state ----------------

    #[test]
    fn s8_if_broken_in_fit_groups_renders_flat_before_first_break() {
        let doc = Doc::group(
            None,
            GroupKind::FitGroups,
            Doc::if_broken(Doc::string("X"), Doc::string("Y"))
                .concat(Doc::string("aaaa"))
                .concat(Doc::breakable_space())
                .concat(Doc::string("bbbb")),
        );
        assert_eq!(render(5, &doc), "Yaaaa\nbbbb");
    }

    #[test]
    fn print_width_override_still_renders_hardline_as_newline() {
        let doc = Doc::group(
            Some(3),
            GroupKind::Auto,
            Doc::string("x").concat(Doc::hardline()).concat(Doc::string("y")),
        );
        let out = render(3, &doc);
        assert!(out.contains('\n'), "expected a real newline in {:?}", out);
        assert_eq!(out, "x\ny");
    }

    // ---- Universal properties (spec §8) --------------------------------

    #[test]
    fn prop_empty_neutrality() {
        let d = Doc::string("x").concat(Doc::breakable_space()).concat(Doc::string("y"));
        let lhs = render(80, &Doc::empty().concat(d.clone()));
        let rhs = render(80, &d.clone().concat(Doc::empty()));
        let base = render(80, &d);
        assert_eq!(lhs, base);
        assert_eq!(rhs, base);
    }

    #[test]
    fn prop_concat_associativity() {
        let a = Doc::string("a");
        let b = Doc::string("b");
        let c = Doc::string("c");
        let lhs = a.clone().concat(b.clone().concat(c.clone()));
        let rhs = a.concat(b).concat(c);
        assert_eq!(render(80, &lhs), render(80, &rhs));
    }

    #[test]
    fn prop_flat_fits_implies_no_breaks() {
        let d = Doc::string("foo")
            .concat(Doc::breakable_space())
            .concat(Doc::string("bar"));
        let doc = Doc::group_auto(d);
        let out = render(80, &doc);
        assert!(!out.contains('\n'));
    }

    #[test]
    fn prop_idempotence_under_extra_grouping() {
        let d = Doc::string("foo")
            .concat(Doc::breakable_space())
            .concat(Doc::string("bar"));
        let grouped = Doc::group_auto(d.clone());
        assert_eq!(
            render(usize::MAX / 2, &grouped),
            render(usize::MAX / 2, &d)
        );
    }

    #[test]
    fn prop_group_breaker_forces_all_break_hints_in_group() {
        let d = Doc::group_breaker()
            .concat(Doc::string("a"))
            .concat(Doc::breakable_space())
            .concat(Doc::string("b"))
            .concat(Doc::breakable_space())
            .concat(Doc::string("c"));
        let doc = Doc::group_auto(d);
        assert_eq!(render(80, &doc), "a\nb\nc");
    }

    #[test]
    fn prop_no_trailing_whitespace() {
        let d = Doc::group_auto(
            Doc::string("foo")
                .concat(Doc::breakable_space())
                .concat(Doc::string("bar")),
        );
        let out = render(5, &d);
        for line in out.split('\n') {
            assert!(!line.ends_with(' '), "line {:?} has trailing whitespace", line);
        }
    }

    #[test]
    fn prop_if_broken_consistency_in_auto_group() {
        // Two `IfBroken`s in the same Auto group must both see the same
        // `broken` value once a break is taken anywhere in the scope.
        let d = Doc::string("foo")
            .concat(Doc::breakable_space())
            .concat(Doc::if_broken(Doc::string("[broken]"), Doc::string("[flat]")))
            .concat(Doc::breakable_space())
            .concat(Doc::if_broken(Doc::string("[broken]"), Doc::string("[flat]")));
        let doc = Doc::group_auto(d);
        let out = render(5, &doc);
        let broken_count = out.matches("[broken]").count();
        assert_eq!(broken_count, 2);
    }
}
