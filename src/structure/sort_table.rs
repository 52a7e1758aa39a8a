//! Domain tables for sorts.
//!
//! A [`SortTable`] is the interpretation of a single sort: the concrete
//! set of domain elements that belong to it. Built-in numeric/string
//! sorts carry genuinely infinite tables; everything else is either a
//! finite enumeration or a union of tables with a finite blacklist.

use std::collections::BTreeSet;

use crate::element::DomainElementRef;

/// How many elements a table has, distinguishing "known infinite" from
/// "not tracked because one of its parts is infinite" — the latter
/// matters because a union of an infinite table with a finite blacklist
/// is still infinite, but we cannot report its exact cardinality without
/// enumerating the (infinite) base table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableSize {
    Finite(usize),
    Infinite,
    Unknown,
}

#[derive(Clone, Debug)]
pub enum SortTable {
    Empty,
    Enumerated(BTreeSet<DomainElementRef>),
    IntRange { lo: i64, hi: i64 },
    Naturals,
    Integers,
    Reals,
    Chars,
    Strings,
    /// The union of several tables minus an explicit finite blacklist,
    /// e.g. "every integer except {0, 1}" over `Integers`.
    Union {
        parts: Vec<SortTable>,
        blacklist: BTreeSet<DomainElementRef>,
    },
}

impl SortTable {
    /// The actual element set of a table built entirely from concrete
    /// enumerations (no `IntRange`/built-in infinite part, which need an
    /// [`crate::element::ElementFactory`] to materialize). Used by
    /// [`Self::size`] and [`Self::iter_finite`] to dedup overlapping
    /// `Union` parts correctly rather than double-counting shared
    /// elements.
    fn concrete_elements(&self) -> Option<BTreeSet<DomainElementRef>> {
        match self {
            SortTable::Empty => Some(BTreeSet::new()),
            SortTable::Enumerated(set) => Some(set.clone()),
            SortTable::Union { parts, blacklist } => {
                let mut out = BTreeSet::new();
                for part in parts {
                    out.extend(part.concrete_elements()?);
                }
                for b in blacklist {
                    out.remove(b);
                }
                Some(out)
            }
            _ => None,
        }
    }

    pub fn size(&self) -> TableSize {
        match self {
            SortTable::Empty => TableSize::Finite(0),
            SortTable::Enumerated(set) => TableSize::Finite(set.len()),
            SortTable::IntRange { lo, hi } => TableSize::Finite((hi - lo + 1).max(0) as usize),
            SortTable::Naturals | SortTable::Integers | SortTable::Reals | SortTable::Strings => {
                TableSize::Infinite
            }
            SortTable::Chars => TableSize::Finite(1 << 16),
            SortTable::Union { parts, blacklist } => {
                if let Some(elems) = self.concrete_elements() {
                    return TableSize::Finite(elems.len());
                }
                if parts.iter().any(|p| matches!(p.size(), TableSize::Infinite)) {
                    TableSize::Unknown
                } else {
                    // At least one part (e.g. `IntRange`/`Chars`) cannot be
                    // materialized without a factory, so overlap with other
                    // parts cannot be detected here; this may overcount.
                    let total: usize = parts
                        .iter()
                        .map(|p| match p.size() {
                            TableSize::Finite(n) => n,
                            _ => 0,
                        })
                        .sum();
                    TableSize::Finite(total.saturating_sub(blacklist.len()))
                }
            }
        }
    }

    pub fn is_finite(&self) -> bool {
        matches!(self.size(), TableSize::Finite(_))
    }

    pub fn contains(&self, elem: &DomainElementRef) -> bool {
        match self {
            SortTable::Empty => false,
            SortTable::Enumerated(set) => set.contains(elem),
            SortTable::IntRange { lo, hi } => elem.as_int().is_some_and(|n| n >= *lo && n <= *hi),
            SortTable::Naturals => elem.as_int().is_some_and(|n| n >= 0),
            SortTable::Integers => elem.as_int().is_some(),
            SortTable::Reals => elem.as_real().is_some(),
            SortTable::Chars => elem.as_str().is_some_and(|s| s.chars().count() == 1),
            SortTable::Strings => elem.as_str().is_some(),
            SortTable::Union { parts, blacklist } => {
                !blacklist.contains(elem) && parts.iter().any(|p| p.contains(elem))
            }
        }
    }

    /// Enumerates the table's elements; `None` for any table whose size
    /// is not [`TableSize::Finite`] (iterating an infinite numeric or
    /// string sort is never meaningful on its own). `IntRange` needs a
    /// factory to materialize its elements since a bare range stores no
    /// [`DomainElementRef`]s of its own.
    pub fn iter_finite(&self, factory: &crate::element::ElementFactory) -> Option<Vec<DomainElementRef>> {
        match self {
            SortTable::Empty => Some(Vec::new()),
            SortTable::Enumerated(set) => Some(set.iter().cloned().collect()),
            SortTable::IntRange { lo, hi } => Some((*lo..=*hi).map(|n| factory.create_int(n)).collect()),
            SortTable::Chars => None,
            SortTable::Naturals | SortTable::Integers | SortTable::Reals | SortTable::Strings => None,
            SortTable::Union { parts, blacklist } => {
                if parts.iter().any(|p| !matches!(p.size(), TableSize::Finite(_))) {
                    return None;
                }
                // A `BTreeSet` both dedups elements shared by overlapping
                // parts and yields them in the table's canonical order.
                let mut out: BTreeSet<DomainElementRef> = BTreeSet::new();
                for part in parts {
                    out.extend(part.iter_finite(factory)?.into_iter().filter(|e| !blacklist.contains(e)));
                }
                Some(out.into_iter().collect())
            }
        }
    }
}
