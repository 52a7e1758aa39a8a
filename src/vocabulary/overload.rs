//! The global predicate/function arenas and overload resolution.
//!
//! Concrete symbols are shared across vocabularies exactly like sorts
//! (Design Notes §9), so they live in one arena here rather than inside
//! `Vocabulary`. A `Vocabulary` only stores, per unqualified name, an
//! [`Overload`] naming which arena entries it sees.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;

use crate::error::Error;
use crate::ids::{FunctionId, PredicateId, SortId, VocabularyId};
use crate::vocabulary::sort::SortLattice;
use crate::vocabulary::symbol::{FunctionSymbol, Overload, OverloadKind, PredicateSymbol, SymbolType};

#[derive(Default)]
pub struct SymbolArena {
    predicates: Vec<PredicateSymbol>,
    predicate_vocs: Vec<HashSet<VocabularyId>>,
    functions: Vec<FunctionSymbol>,
    function_vocs: Vec<HashSet<VocabularyId>>,
}

impl SymbolArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_predicate(&mut self, symbol: PredicateSymbol) -> PredicateId {
        self.predicates.push(symbol);
        self.predicate_vocs.push(HashSet::new());
        PredicateId(self.predicates.len() - 1)
    }

    pub fn add_function(&mut self, symbol: FunctionSymbol) -> FunctionId {
        self.functions.push(symbol);
        self.function_vocs.push(HashSet::new());
        FunctionId(self.functions.len() - 1)
    }

    pub fn predicate(&self, id: PredicateId) -> &PredicateSymbol {
        &self.predicates[id.0]
    }

    pub fn function(&self, id: FunctionId) -> &FunctionSymbol {
        &self.functions[id.0]
    }

    pub fn mark_predicate_in_vocabulary(&mut self, id: PredicateId, voc: VocabularyId) {
        self.predicate_vocs[id.0].insert(voc);
    }

    pub fn mark_function_in_vocabulary(&mut self, id: FunctionId, voc: VocabularyId) {
        self.function_vocs[id.0].insert(voc);
    }

    pub fn unmark_predicate_in_vocabulary(&mut self, id: PredicateId, voc: VocabularyId) -> bool {
        let set = &mut self.predicate_vocs[id.0];
        set.remove(&voc);
        set.is_empty()
    }

    pub fn unmark_function_in_vocabulary(&mut self, id: FunctionId, voc: VocabularyId) -> bool {
        let set = &mut self.function_vocs[id.0];
        set.remove(&voc);
        set.is_empty()
    }
}

/// `resolve(symbol, sorts)` for predicate overloads: the unique variant
/// whose sort vector equals `sorts` exactly, creating a `Comparison`
/// variant lazily if `sorts` is `[A, A]`.
pub fn resolve_predicate(
    overload: &mut Overload<PredicateId>,
    arena: &mut SymbolArena,
    sorts: &[SortId],
) -> Option<PredicateId> {
    match &mut overload.kind {
        OverloadKind::Enumerated(ids) => ids
            .iter()
            .copied()
            .find(|&id| arena.predicate(id).sorts == sorts),
        OverloadKind::Comparison { cache } => {
            let &[a, b] = sorts else { return None };
            if a != b {
                return None;
            }
            Some(*cache.entry(a).or_insert_with(|| {
                arena.add_predicate(PredicateSymbol {
                    name: overload.name.clone(),
                    sorts: vec![a, a],
                    infix: true,
                    parent: None,
                    symbol_type: SymbolType::None,
                })
            }))
        }
        _ => None,
    }
}

/// `resolve(symbol, sorts)` for function overloads: exact match for
/// enumerated variants; for `Numeric`, the int variant iff every sort is
/// an int-subsort, else the real variant; for `Order`, the variant
/// specialized at the sort named in `sorts`, created lazily.
pub fn resolve_function(
    overload: &mut Overload<FunctionId>,
    arena: &mut SymbolArena,
    lattice: &SortLattice,
    sorts: &[SortId],
) -> Option<FunctionId> {
    match &mut overload.kind {
        OverloadKind::Enumerated(ids) => ids
            .iter()
            .copied()
            .find(|&id| arena.function(id).sorts == sorts),
        OverloadKind::Numeric { int, real } => {
            let int_sort = SortLattice::builtin_int();
            if sorts.iter().all(|&s| lattice.is_subsort(s, int_sort, None)) {
                Some(*int)
            } else {
                Some(*real)
            }
        }
        OverloadKind::Order { cache } => {
            let sort = sorts.first().copied()?;
            Some(*cache.entry(sort).or_insert_with(|| {
                arena.add_function(FunctionSymbol {
                    name: overload.name.clone(),
                    sorts: vec![sort, sort],
                    infix: false,
                    parent: None,
                    symbol_type: SymbolType::None,
                    partial: false,
                })
            }))
        }
        _ => None,
    }
}

/// Does `a` dominate `b`, i.e. is `a` at least as specific as `b` at every
/// position (`a[i] == b[i]` or `a[i]` a subsort of `b[i]`)? Used to prefer
/// the narrowest of several overload variants that are all merely
/// *compatible* with a hint, the same "minimal candidate" idea
/// [`SortLattice::resolve`] uses for a single pair of sorts, generalized
/// to a whole sort vector.
fn pointwise_subsort(
    a: &[SortId],
    b: &[SortId],
    lattice: &SortLattice,
    voc: Option<&std::collections::BTreeSet<SortId>>,
) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| x == y || lattice.is_subsort(x, y, voc))
}

/// Among several overload variants compatible with a hint, picks the one
/// that dominates every other (is at least as specific everywhere).
/// Returns `None` when no single variant dominates all the rest, i.e. the
/// candidates are genuinely incomparable.
fn most_specific<Id: Copy>(
    candidates: &[Id],
    sorts_of: impl Fn(Id) -> Vec<SortId>,
    lattice: &SortLattice,
    voc: Option<&std::collections::BTreeSet<SortId>>,
) -> Option<Id> {
    let mut winner = None;
    for &c in candidates {
        let c_sorts = sorts_of(c);
        let dominates_all = candidates
            .iter()
            .all(|&d| pointwise_subsort(&c_sorts, &sorts_of(d), lattice, voc));
        if dominates_all {
            if winner.is_some() {
                return None;
            }
            winner = Some(c);
        }
    }
    winner
}

/// `disambiguate(symbol, sorts, voc)` for predicate overloads: each
/// `sorts[i]` may be `None` (unknown); a supplied sort only needs to
/// *resolve* (have a nearest common ancestor) with the overload's i-th
/// sort rather than match exactly. Several compatible variants are
/// resolved to the most specific one rather than treated as ambiguous.
pub fn disambiguate_predicate(
    overload: &mut Overload<PredicateId>,
    arena: &mut SymbolArena,
    lattice: &SortLattice,
    voc: Option<&std::collections::BTreeSet<SortId>>,
    sorts: &[Option<SortId>],
) -> Result<Option<PredicateId>, Error> {
    match &overload.kind {
        OverloadKind::Enumerated(ids) => {
            let mut candidates = Vec::new();
            for &id in ids {
                let candidate_sorts = &arena.predicate(id).sorts;
                if candidate_sorts.len() != sorts.len() {
                    continue;
                }
                let matches = candidate_sorts.iter().zip(sorts.iter()).all(|(&cs, s)| match s {
                    None => true,
                    Some(s) => lattice.resolve(*s, cs, voc).unwrap_or(None).is_some(),
                });
                if matches {
                    candidates.push(id);
                }
            }
            match candidates.len() {
                0 => Ok(None),
                1 => Ok(Some(candidates[0])),
                _ => most_specific(&candidates, |id| arena.predicate(id).sorts.clone(), lattice, voc)
                    .map(Some)
                    .ok_or_else(|| Error::OverloadedPred {
                        name: overload.name.clone(),
                    }),
            }
        }
        OverloadKind::Comparison { .. } => {
            let known: Vec<SortId> = sorts.iter().filter_map(|s| *s).collect();
            if known.is_empty() {
                // No sort information at all to disambiguate against.
                return Err(Error::NoPredSort {
                    name: overload.name.clone(),
                });
            }
            let common = known
                .into_iter()
                .map(Ok)
                .reduce(|a, b| {
                    let a = a?;
                    let b = b?;
                    lattice
                        .resolve(a, b, voc)
                        .and_then(|r| r.ok_or(Error::OverloadedSort { name: overload.name.clone() }))
                })
                .expect("checked non-empty above")?;
            if sorts.iter().any(Option::is_none) && lattice.ancestors(common, voc).len() <= 1 {
                // An unsupplied sort was filled in purely from the resolved
                // common sort; that is only meaningful if `common` actually
                // sits in some subsort hierarchy within `voc` — a sort with
                // no proper ancestors there gives no real basis to narrow
                // the missing argument's sort.
                return Err(Error::NoPredSort {
                    name: overload.name.clone(),
                });
            }
            Ok(resolve_predicate(overload, arena, &[common, common]))
        }
        _ => Ok(None),
    }
}

/// `disambiguate(symbol, sorts, voc)` for function overloads.
pub fn disambiguate_function(
    overload: &mut Overload<FunctionId>,
    arena: &mut SymbolArena,
    lattice: &SortLattice,
    voc: Option<&std::collections::BTreeSet<SortId>>,
    sorts: &[Option<SortId>],
) -> Result<Option<FunctionId>, Error> {
    match &overload.kind {
        OverloadKind::Enumerated(ids) => {
            let mut candidates = Vec::new();
            for &id in ids {
                let candidate_sorts = &arena.function(id).sorts;
                if candidate_sorts.len() != sorts.len() {
                    continue;
                }
                let matches = candidate_sorts.iter().zip(sorts.iter()).all(|(&cs, s)| match s {
                    None => true,
                    Some(s) => lattice.resolve(*s, cs, voc).unwrap_or(None).is_some(),
                });
                if matches {
                    candidates.push(id);
                }
            }
            match candidates.len() {
                0 => Ok(None),
                1 => Ok(Some(candidates[0])),
                _ => most_specific(&candidates, |id| arena.function(id).sorts.clone(), lattice, voc)
                    .map(Some)
                    .ok_or_else(|| Error::OverloadedFunc {
                        name: overload.name.clone(),
                    }),
            }
        }
        OverloadKind::Numeric { .. } => {
            let int_sort = SortLattice::builtin_int();
            let known_non_int_count = sorts
                .iter()
                .filter(|s| matches!(s, Some(s) if !lattice.is_subsort(*s, int_sort, voc)))
                .count();
            let none_count = sorts.iter().filter(|s| s.is_none()).count();
            if known_non_int_count > 0 {
                Ok(resolve_function(
                    overload,
                    arena,
                    lattice,
                    &sorts.iter().map(|s| s.unwrap_or(SortLattice::builtin_real())).collect_vec(),
                ))
            } else if none_count <= 1 {
                Ok(resolve_function(
                    overload,
                    arena,
                    lattice,
                    &sorts.iter().map(|s| s.unwrap_or(int_sort)).collect_vec(),
                ))
            } else {
                Err(Error::OverloadedFunc {
                    name: overload.name.clone(),
                })
            }
        }
        OverloadKind::Order { .. } => {
            let known: Vec<SortId> = sorts.iter().filter_map(|s| *s).collect();
            let unique_sort = known
                .into_iter()
                .dedup()
                .exactly_one()
                .map_err(|_| Error::OverloadedFunc {
                    name: overload.name.clone(),
                })?;
            Ok(resolve_function(overload, arena, lattice, &[unique_sort, unique_sort]))
        }
        _ => Ok(None),
    }
}
