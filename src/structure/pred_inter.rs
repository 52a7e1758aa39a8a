//! Four-valued predicate interpretations.
//!
//! A predicate's interpretation is split into a certainly-true table
//! (`ct`) and a certainly-false table (`cf`); the possibly-true/possibly-
//! false views are their complements within a given universe rather than
//! stored separately, so the invariants `ct ⊆ pt`, `cf ⊆ pf`, `pt = ¬cf`,
//! `pf = ¬ct` hold by construction instead of needing to be checked.
//!
//! `ct`/`cf` are themselves [`Table`]s rather than bare tuple sets, so a
//! structurally-derived relation (the built-in `=`/`<`/`>` comparisons
//! restricted to a sort, say) can back a `PredInter` without ever being
//! enumerated.

use std::collections::HashSet;

use crate::element::DomainElementRef;
use crate::structure::table::{Table, Tuple};

/// Which of the four views a single table supplied to
/// [`PredInter::from_single`] represents. Since that constructor always
/// yields a two-valued interpretation (`ct == pt`, `cf == pf`), `Ct`/`Pt`
/// and `Cf`/`Pf` are interchangeable — the distinction only documents
/// which polarity the caller had on hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterpretsAs {
    Ct,
    Cf,
    Pt,
    Pf,
}

#[derive(Clone, Debug)]
pub struct PredInter {
    ct: Table,
    cf: Table,
}

impl Default for PredInter {
    fn default() -> Self {
        PredInter {
            ct: Table::Enumerated(HashSet::new()),
            cf: Table::Enumerated(HashSet::new()),
        }
    }
}

impl PredInter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a two-valued interpretation from a single table: two of the
    /// four views are `t`, the other two its complement, depending only
    /// on which polarity `interprets_as` names.
    pub fn from_single(table: Table, interprets_as: InterpretsAs) -> Self {
        match interprets_as {
            InterpretsAs::Ct | InterpretsAs::Pt => PredInter {
                cf: Table::Inverse(Box::new(table.clone())),
                ct: table,
            },
            InterpretsAs::Cf | InterpretsAs::Pf => PredInter {
                ct: Table::Inverse(Box::new(table.clone())),
                cf: table,
            },
        }
    }

    /// Builds a (possibly four-valued) interpretation from two tables:
    /// `ctpf` serves as `ct` when `ct_bound`, else as `pf` (so `ct` is its
    /// complement); `cfpt` serves as `cf` when `cf_bound`, else as `pt`
    /// (so `cf` is its complement). The two tables are independent, so an
    /// inconsistent tuple (`ct_bound` and `cf_bound` both true and the
    /// tuple present in both) is representable.
    pub fn from_bounds(ctpf: Table, cfpt: Table, ct_bound: bool, cf_bound: bool) -> Self {
        let ct = if ct_bound { ctpf } else { Table::Inverse(Box::new(ctpf)) };
        let cf = if cf_bound { cfpt } else { Table::Inverse(Box::new(cfpt)) };
        PredInter { ct, cf }
    }

    pub fn ct_table(&self) -> Table {
        self.ct.clone()
    }

    pub fn cf_table(&self) -> Table {
        self.cf.clone()
    }

    /// The certainly-true tuples, when `ct` is still the default
    /// enumerated shape every predicate starts in — always the case for
    /// a function's graph, which is only ever populated through
    /// [`Self::make_true`]/[`Self::make_false`]. Returns `None` for a
    /// table built via [`Self::from_single`]/[`Self::from_bounds`].
    pub fn ct_tuples(&self) -> Option<Vec<Tuple>> {
        match &self.ct {
            Table::Enumerated(set) => Some(set.iter().cloned().collect()),
            _ => None,
        }
    }

    /// `pt = ¬cf`: true unless the tuple is certainly false.
    pub fn is_possibly_true(&self, tuple: &[DomainElementRef]) -> bool {
        !self.cf.contains(tuple)
    }

    /// `pf = ¬ct`: true unless the tuple is certainly true.
    pub fn is_possibly_false(&self, tuple: &[DomainElementRef]) -> bool {
        !self.ct.contains(tuple)
    }

    pub fn is_true(&self, tuple: &[DomainElementRef]) -> bool {
        self.ct.contains(tuple)
    }

    pub fn is_false(&self, tuple: &[DomainElementRef]) -> bool {
        self.cf.contains(tuple)
    }

    pub fn is_unknown(&self, tuple: &[DomainElementRef]) -> bool {
        !self.is_true(tuple) && !self.is_false(tuple)
    }

    /// Both certainly true and certainly false: a genuine inconsistency.
    pub fn is_inconsistent(&self, tuple: &[DomainElementRef]) -> bool {
        self.is_true(tuple) && self.is_false(tuple)
    }

    fn assert_into(table: &mut Table, tuple: Tuple) {
        match table {
            Table::Enumerated(set) => {
                set.insert(tuple);
            }
            _ => panic!("cannot assert a tuple directly into a derived predicate table"),
        }
    }

    pub fn make_true(&mut self, tuple: Tuple) {
        Self::assert_into(&mut self.ct, tuple);
    }

    pub fn make_false(&mut self, tuple: Tuple) {
        Self::assert_into(&mut self.cf, tuple);
    }

    /// Retracts any certain value for `tuple`, leaving it unknown.
    pub fn make_unknown(&mut self, tuple: &[DomainElementRef]) {
        if let Table::Enumerated(set) = &mut self.ct {
            set.retain(|t| t.as_slice() != tuple);
        }
        if let Table::Enumerated(set) = &mut self.cf {
            set.retain(|t| t.as_slice() != tuple);
        }
    }

    /// Two-valued iff every tuple in `universe` is exactly one of
    /// certainly-true or certainly-false — neither unknown (in neither
    /// table) nor inconsistent (in both). A length identity alone cannot
    /// tell the two apart: `ct.len() + cf.len() == universe.len()` holds
    /// just as well when one tuple is inconsistent and another unknown,
    /// so this checks each tuple directly instead.
    pub fn approx_two_valued(&self, universe: &[Tuple]) -> bool {
        universe.iter().all(|t| self.is_true(t) != self.is_false(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementFactory;
    use crate::structure::sort_table::SortTable;
    use crate::syntax::formula::CompOp;

    #[test]
    fn certain_tables_are_mutually_exclusive_by_default() {
        let factory = ElementFactory::new(0, 8);
        let mut inter = PredInter::new();
        let tuple = vec![factory.create_int(1)];
        assert!(inter.is_unknown(&tuple));
        inter.make_true(tuple.clone());
        assert!(inter.is_true(&tuple));
        assert!(!inter.is_false(&tuple));
        assert!(!inter.is_inconsistent(&tuple));
    }

    #[test]
    fn marking_both_true_and_false_is_inconsistent() {
        let factory = ElementFactory::new(0, 8);
        let mut inter = PredInter::new();
        let tuple = vec![factory.create_int(1)];
        inter.make_true(tuple.clone());
        inter.make_false(tuple.clone());
        assert!(inter.is_inconsistent(&tuple));
    }

    #[test]
    fn make_unknown_retracts_a_certain_value() {
        let factory = ElementFactory::new(0, 8);
        let mut inter = PredInter::new();
        let tuple = vec![factory.create_int(1)];
        inter.make_true(tuple.clone());
        inter.make_unknown(&tuple);
        assert!(inter.is_unknown(&tuple));
    }

    #[test]
    fn from_single_ct_yields_a_two_valued_interpretation() {
        let factory = ElementFactory::new(0, 8);
        let mut ones = HashSet::new();
        ones.insert(vec![factory.create_int(1)]);
        let inter = PredInter::from_single(Table::Enumerated(ones), InterpretsAs::Ct);
        assert!(inter.is_true(&[factory.create_int(1)]));
        assert!(inter.is_false(&[factory.create_int(2)]));
        assert!(!inter.is_unknown(&[factory.create_int(2)]));
    }

    #[test]
    fn from_single_cf_complements_the_other_way() {
        let factory = ElementFactory::new(0, 8);
        let mut ones = HashSet::new();
        ones.insert(vec![factory.create_int(1)]);
        let inter = PredInter::from_single(Table::Enumerated(ones), InterpretsAs::Pf);
        assert!(inter.is_true(&[factory.create_int(1)]));
        assert!(inter.is_false(&[factory.create_int(2)]));
    }

    #[test]
    fn from_bounds_unbound_ct_is_complement_of_pf() {
        let factory = ElementFactory::new(0, 8);
        let domain = SortTable::Integers;
        let cfpt = Table::Comparison(CompOp::Eq, domain.clone());
        let ctpf = Table::Comparison(CompOp::Eq, domain);
        // ct unbound (derived from pf), cf bound directly to cfpt.
        let inter = PredInter::from_bounds(ctpf, cfpt, false, true);
        assert!(inter.is_false(&[factory.create_int(1), factory.create_int(1)]));
        assert!(inter.is_true(&[factory.create_int(1), factory.create_int(2)]));
    }
}
