//! Small helpers shared by sort derivation, the Insert builder and
//! formatting: subsort checks and fresh-variable-name/id generation,
//! over the arbitrary user-declared sort lattice
//! ([`crate::vocabulary::sort::SortLattice`]) and [`VarId`]s.

use std::collections::BTreeSet;

use crate::ids::{SortId, VarId};
use crate::vocabulary::sort::SortLattice;

/// `v1` is a subsort of (or equal to) `v2` in `lattice`.
pub fn subsort(lattice: &SortLattice, v1: SortId, v2: SortId) -> bool {
    lattice.is_subsort(v1, v2, None)
}

/// The smallest `VarId` not already present in `used`: increments from
/// zero until a free id is found.
pub fn fresh_var_id(used: &BTreeSet<VarId>) -> VarId {
    let mut candidate = VarId(0);
    while used.contains(&candidate) {
        candidate = VarId(candidate.0 + 1);
    }
    candidate
}

/// Chooses `arity` display names for variables, all disjoint from
/// `taken`, by suffixing `variant` with an increasing counter — used by
/// formatting to print machine-generated variables (e.g. the fresh
/// variables [`crate::syntax::rule::Rule::normalize_head`] introduces)
/// under human-readable names.
pub fn choose_fresh_variable_names(taken: &BTreeSet<String>, variant: &str, arity: usize) -> Vec<String> {
    let mut fresh = Vec::with_capacity(arity);
    let mut all_taken = taken.clone();
    let mut next = if all_taken.contains(variant) { 1 } else { 0 };
    while fresh.len() < arity {
        let candidate = if next == 0 {
            variant.to_string()
        } else {
            format!("{variant}{next}")
        };
        next += 1;
        if !all_taken.contains(&candidate) {
            all_taken.insert(candidate.clone());
            fresh.push(candidate);
        }
    }
    fresh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subsort_respects_the_builtin_numeric_tower() {
        let lattice = SortLattice::new();
        assert!(subsort(&lattice, SortLattice::builtin_nat(), SortLattice::builtin_int()));
        assert!(!subsort(&lattice, SortLattice::builtin_real(), SortLattice::builtin_int()));
    }

    #[test]
    fn fresh_var_id_skips_every_used_id() {
        let used: BTreeSet<VarId> = [VarId(0), VarId(1)].into_iter().collect();
        assert_eq!(fresh_var_id(&used), VarId(2));
    }

    #[test]
    fn choose_fresh_variable_names_avoids_collisions_and_the_bare_variant() {
        let mut taken = BTreeSet::new();
        taken.insert("x".to_string());
        taken.insert("x1".to_string());
        let names = choose_fresh_variable_names(&taken, "x", 2);
        assert_eq!(names, vec!["x2".to_string(), "x3".to_string()]);
    }
}
