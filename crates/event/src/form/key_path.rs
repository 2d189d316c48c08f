//! Bracket-notation key parsing and insertion.
//!
//! HTML forms encode nested field names in flat strings: the key
//! `files[id_cards][jpg][]` means "append to the sequence at
//! `files.id_cards.jpg`". This module parses such keys into a path of
//! segments and applies them against a [`FormMap`] tree, creating
//! intermediate containers as needed.
//!
//! Malformed bracket syntax is not an error: the whole original key is kept
//! verbatim as a flat entry, so a broken field name degrades to best-effort
//! capture instead of losing the value.

use crate::form::{FormMap, FormValue};
use tracing::trace;

/// One step of a parsed bracket-notation key.
#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    /// A named mapping key.
    Key(&'a str),
    /// The `[]` append marker: next free index of a sequence.
    Append,
}

/// Inserts `value` into `root` under the bracket-notation `key`.
///
/// `insert(&mut root, "a[b][c]", v)` yields `root.a.b.c == v`, and repeated
/// `insert(&mut root, "a[]", ..)` calls extend the sequence at `a`. The final
/// position always receives `value`, replacing whatever was there. Keys with
/// broken bracket syntax (`a[b`, `a[[b]`) are stored verbatim as flat keys.
pub fn insert<T>(root: &mut FormMap<T>, key: &str, value: T) {
    if !key.contains('[') {
        root.set(key, FormValue::Leaf(value));
        return;
    }

    match parse_key(key) {
        Some((root_key, path)) => apply(root.slot(root_key), &path, value),
        None => {
            trace!(key, "malformed bracket key, storing verbatim");
            root.set(key, FormValue::Leaf(value));
        }
    }
}

/// Splits a bracket-notation key into its root key and trailing segments.
///
/// Returns `None` when the key is malformed: a `[[` produced an empty
/// fragment, or a fragment does not end with `]`.
fn parse_key(key: &str) -> Option<(&str, Vec<Segment<'_>>)> {
    let mut fragments = key.split('[');
    // the fragment before the first '[' is the root key and carries no ']'
    let root_key = fragments.next().unwrap_or("");

    let mut path = Vec::new();
    for fragment in fragments {
        // only the last char is stripped: "a[b]c]" keeps the inner bracket
        let name = fragment.strip_suffix(']')?;
        if name.is_empty() {
            path.push(Segment::Append);
        } else {
            path.push(Segment::Key(name));
        }
    }

    Some((root_key, path))
}

/// Walks `slot` along `path` and stores `value` at the final position.
///
/// Each step coerces the current slot to the container kind the segment
/// requires, replacing a value of the wrong kind (last write wins).
fn apply<T>(slot: &mut FormValue<T>, path: &[Segment<'_>], value: T) {
    let Some((segment, rest)) = path.split_first() else {
        *slot = FormValue::Leaf(value);
        return;
    };

    match segment {
        Segment::Key(key) => {
            if !matches!(slot, FormValue::Map(_)) {
                *slot = FormValue::Map(FormMap::new());
            }
            if let FormValue::Map(map) = slot {
                apply(map.slot(key), rest, value);
            }
        }
        Segment::Append => {
            if !matches!(slot, FormValue::List(_)) {
                *slot = FormValue::List(Vec::new());
            }
            if let FormValue::List(list) = slot {
                // append markers always claim a fresh slot
                list.push(FormValue::Map(FormMap::new()));
                if let Some(last) = list.last_mut() {
                    apply(last, rest, value);
                }
            }
        }
    }
}
