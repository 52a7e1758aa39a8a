//! The sort DAG.
//!
//! Sorts live in one global arena (`SortLattice`) so that the same
//! `SortId` is shared across every vocabulary that declares it, per
//! Design Notes §9. Parent/child edges are stored twice over: once as
//! plain `BTreeSet<SortId>` adjacency (cheap, deterministic iteration)
//! and once in a `petgraph::graph::DiGraph` used for ancestor/descendant
//! closures and cycle detection.

use std::collections::{BTreeSet, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use petgraph::Direction;

use crate::error::Error;
use crate::ids::{SortId, VocabularyId};

/// Which built-in sort-table generator a sort carries, if any. The actual
/// [`crate::structure::sort_table::SortTable`] is built lazily by L3 code
/// that matches on this tag — L1 does not depend on L3.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuiltinSort {
    Nat,
    Int,
    Real,
    Char,
    String,
}

struct SortData {
    name: String,
    builtin: Option<BuiltinSort>,
    parents: BTreeSet<SortId>,
    children: BTreeSet<SortId>,
    vocabularies: HashSet<VocabularyId>,
}

/// The process-wide sort DAG. `ancestors`/`descendants`/`resolve` are all
/// defined here rather than per-vocabulary; a vocabulary only carries the
/// *subset* of sort ids it declares (see
/// `vocabulary::vocabulary::Vocabulary::sorts`).
pub struct SortLattice {
    sorts: Vec<SortData>,
    graph: DiGraph<(), ()>,
}

fn node(id: SortId) -> NodeIndex {
    NodeIndex::new(id.0)
}

fn sort_id(ix: NodeIndex) -> SortId {
    SortId(ix.index())
}

impl Default for SortLattice {
    fn default() -> Self {
        Self::new()
    }
}

impl SortLattice {
    pub fn new() -> Self {
        let mut lattice = Self {
            sorts: Vec::new(),
            graph: DiGraph::new(),
        };
        lattice.install_builtins();
        lattice
    }

    fn install_builtins(&mut self) {
        let real = self.add_sort_with_builtin("real", Some(BuiltinSort::Real));
        let int = self.add_sort_with_builtin("int", Some(BuiltinSort::Int));
        let nat = self.add_sort_with_builtin("nat", Some(BuiltinSort::Nat));
        let string = self.add_sort_with_builtin("string", Some(BuiltinSort::String));
        let char_ = self.add_sort_with_builtin("char", Some(BuiltinSort::Char));
        self.add_parent(int, real).unwrap();
        self.add_parent(nat, int).unwrap();
        self.add_parent(char_, string).unwrap();
    }

    /// Built-in ids, stable because [`SortLattice::new`] installs them
    /// first and in this order.
    pub fn builtin_real() -> SortId {
        SortId(0)
    }
    pub fn builtin_int() -> SortId {
        SortId(1)
    }
    pub fn builtin_nat() -> SortId {
        SortId(2)
    }
    pub fn builtin_string() -> SortId {
        SortId(3)
    }
    pub fn builtin_char() -> SortId {
        SortId(4)
    }

    fn add_sort_with_builtin(&mut self, name: &str, builtin: Option<BuiltinSort>) -> SortId {
        let ix = self.graph.add_node(());
        self.sorts.push(SortData {
            name: name.to_string(),
            builtin,
            parents: BTreeSet::new(),
            children: BTreeSet::new(),
            vocabularies: HashSet::new(),
        });
        debug_assert_eq!(ix.index(), self.sorts.len() - 1);
        sort_id(ix)
    }

    pub fn add_sort(&mut self, name: &str) -> SortId {
        self.add_sort_with_builtin(name, None)
    }

    pub fn name(&self, id: SortId) -> &str {
        &self.sorts[id.0].name
    }

    pub fn builtin(&self, id: SortId) -> Option<BuiltinSort> {
        self.sorts[id.0].builtin
    }

    pub fn mark_in_vocabulary(&mut self, id: SortId, voc: VocabularyId) {
        self.sorts[id.0].vocabularies.insert(voc);
    }

    /// Returns `true` if the sort has no remaining vocabulary membership
    ///. The
    /// caller is responsible for actually dropping the entry; a global
    /// arena with stable indices cannot physically deallocate a slot
    /// without invalidating every other index, so "self-destruct" here
    /// means the slot is reported as collectible, not removed in place.
    pub fn unmark_in_vocabulary(&mut self, id: SortId, voc: VocabularyId) -> bool {
        let data = &mut self.sorts[id.0];
        data.vocabularies.remove(&voc);
        data.vocabularies.is_empty()
    }

    pub fn vocabularies_of(&self, id: SortId) -> &HashSet<VocabularyId> {
        &self.sorts[id.0].vocabularies
    }

    /// Reflexive transitive closure along `direction` (`Outgoing` =
    /// ancestors, `Incoming` = descendants). `petgraph::visit::Dfs`
    /// always walks outgoing edges, so descendants are computed with a
    /// manual stack over `neighbors_directed(Incoming)` instead.
    fn closure(&self, start: SortId, direction: Direction) -> BTreeSet<SortId> {
        match direction {
            Direction::Outgoing => {
                let mut dfs = Dfs::new(&self.graph, node(start));
                let mut out = BTreeSet::new();
                while let Some(n) = dfs.next() {
                    out.insert(sort_id(n));
                }
                out
            }
            Direction::Incoming => {
                let mut seen = BTreeSet::new();
                seen.insert(start);
                let mut stack = vec![start];
                while let Some(s) = stack.pop() {
                    for n in self.graph.neighbors_directed(node(s), Direction::Incoming) {
                        let id = sort_id(n);
                        if seen.insert(id) {
                            stack.push(id);
                        }
                    }
                }
                seen
            }
        }
    }

    /// Transitive closure of "is a parent of", including `s` itself,
    /// optionally intersected with a vocabulary's sort set.
    pub fn ancestors(&self, s: SortId, voc: Option<&BTreeSet<SortId>>) -> BTreeSet<SortId> {
        let all = self.closure(s, Direction::Outgoing);
        match voc {
            Some(v) => all.intersection(v).copied().collect(),
            None => all,
        }
    }

    /// Transitive closure of "is a child of", including `s` itself,
    /// optionally intersected with a vocabulary's sort set.
    pub fn descendants(&self, s: SortId, voc: Option<&BTreeSet<SortId>>) -> BTreeSet<SortId> {
        let all = self.closure(s, Direction::Incoming);
        match voc {
            Some(v) => all.intersection(v).copied().collect(),
            None => all,
        }
    }

    fn direct_children(&self, s: SortId) -> BTreeSet<SortId> {
        self.sorts[s.0].children.clone()
    }

    /// Adds `p` as a parent of `s`.
    ///
    /// Fails [`Error::CyclicHierarchy`] if `s` is already an ancestor of
    /// `p` (adding the edge would close a cycle). Fails
    /// [`Error::NotSubSort`] if `s` already has a child `c` with another
    /// parent whose ancestry does not already include `p` — i.e. `p`
    /// must already be implied by `c`'s other lineage before `s` may
    /// adopt it, which keeps diamond inheritance coherent. A child whose
    /// *only* parent is `s` has nothing to violate and is skipped.
    pub fn add_parent(&mut self, s: SortId, p: SortId) -> Result<(), Error> {
        if s == p {
            return Ok(());
        }
        if self.ancestors(p, None).contains(&s) {
            return Err(Error::CyclicHierarchy {
                child: self.name(s).to_string(),
                parent: self.name(p).to_string(),
            });
        }
        for c in self.direct_children(s) {
            let other_parents: Vec<SortId> =
                self.sorts[c.0].parents.iter().copied().filter(|&q| q != s).collect();
            if other_parents.is_empty() {
                continue;
            }
            let reachable_without_s: BTreeSet<SortId> = other_parents
                .into_iter()
                .flat_map(|q| self.ancestors(q, None))
                .collect();
            if !reachable_without_s.contains(&p) {
                return Err(Error::NotSubSort {
                    child: self.name(c).to_string(),
                    parent: self.name(p).to_string(),
                });
            }
        }

        self.graph.add_edge(node(s), node(p), ());
        self.sorts[s.0].parents.insert(p);
        self.sorts[p.0].children.insert(s);
        Ok(())
    }

    /// `is_subsort(a, b)` holds iff `b` is the unique nearest common
    /// ancestor of `a` and `b`, i.e. `a` already descends from `b`.
    pub fn is_subsort(&self, a: SortId, b: SortId, voc: Option<&BTreeSet<SortId>>) -> bool {
        self.resolve(a, b, voc) == Ok(Some(b))
    }

    /// The unique nearest common ancestor of `a` and `b` within `voc`, if
    /// one exists: intersect the (reflexive) ancestor sets, then repeatedly remove
    /// any element that is a proper ancestor of another element of the
    /// set, leaving only the minimal elements; the result must be a
    /// singleton or there is no unique resolution.
    ///
    /// Returns `Ok(None)` when the intersection is empty (no common
    /// ancestor at all) and `Err(Error::OverloadedSort)` when more than
    /// one minimal candidate remains.
    pub fn resolve(
        &self,
        a: SortId,
        b: SortId,
        voc: Option<&BTreeSet<SortId>>,
    ) -> Result<Option<SortId>, Error> {
        let anc_a = self.ancestors(a, voc);
        let anc_b = self.ancestors(b, voc);
        let mut candidates: BTreeSet<SortId> = anc_a.intersection(&anc_b).copied().collect();
        if candidates.is_empty() {
            return Ok(None);
        }
        // Remove non-minimal elements: if y is itself a (proper) ancestor
        // of some other candidate x, then y is further away than x and
        // cannot be the nearest common ancestor, so drop y.
        let snapshot: Vec<SortId> = candidates.iter().copied().collect();
        for &x in &snapshot {
            for &y in &snapshot {
                if x != y && self.ancestors(x, voc).contains(&y) {
                    candidates.remove(&y);
                }
            }
        }
        let mut iter = candidates.into_iter();
        let first = iter.next();
        match (first, iter.next()) {
            (Some(only), None) => Ok(Some(only)),
            (Some(_), Some(_)) => Err(Error::OverloadedSort {
                name: format!("{}/{}", self.name(a), self.name(b)),
            }),
            (None, _) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lattice_orders_numerics() {
        let lattice = SortLattice::new();
        assert!(lattice.is_subsort(SortLattice::builtin_nat(), SortLattice::builtin_int(), None));
        assert!(lattice.is_subsort(SortLattice::builtin_int(), SortLattice::builtin_real(), None));
        assert!(lattice.is_subsort(SortLattice::builtin_nat(), SortLattice::builtin_real(), None));
        assert!(!lattice.is_subsort(SortLattice::builtin_real(), SortLattice::builtin_int(), None));
    }

    #[test]
    fn ancestors_and_descendants_agree() {
        let lattice = SortLattice::new();
        let nat = SortLattice::builtin_nat();
        let int = SortLattice::builtin_int();
        assert!(lattice.ancestors(nat, None).contains(&int));
        assert!(lattice.descendants(int, None).contains(&nat));
    }

    #[test]
    fn cyclic_hierarchy_is_rejected() {
        let mut lattice = SortLattice::new();
        let a = lattice.add_sort("a");
        let b = lattice.add_sort("b");
        lattice.add_parent(a, b).unwrap();
        let err = lattice.add_parent(b, a).unwrap_err();
        assert!(matches!(err, Error::CyclicHierarchy { .. }));
    }

    #[test]
    fn resolve_finds_unique_nearest_common_ancestor() {
        let mut lattice = SortLattice::new();
        let a = lattice.add_sort("A");
        let b = lattice.add_sort("B");
        let c = lattice.add_sort("C");
        lattice.add_parent(a, c).unwrap();
        lattice.add_parent(b, c).unwrap();
        assert_eq!(lattice.resolve(a, b, None), Ok(Some(c)));
        assert_eq!(lattice.resolve(a, a, None), Ok(Some(a)));
    }

    #[test]
    fn resolve_with_no_common_ancestor_is_none() {
        let mut lattice = SortLattice::new();
        let a = lattice.add_sort("A");
        let b = lattice.add_sort("B");
        assert_eq!(lattice.resolve(a, b, None), Ok(None));
    }

    #[test]
    fn vocabulary_membership_emptying_is_reported() {
        let mut lattice = SortLattice::new();
        let a = lattice.add_sort("A");
        let v1 = VocabularyId(0);
        let v2 = VocabularyId(1);
        lattice.mark_in_vocabulary(a, v1);
        lattice.mark_in_vocabulary(a, v2);
        assert!(!lattice.unmark_in_vocabulary(a, v1));
        assert!(lattice.unmark_in_vocabulary(a, v2));
    }
}
