//! A structure: an interpretation of one vocabulary.

use std::collections::HashMap;

use crate::element::ElementFactory;
use crate::error::Error;
use crate::ids::{FunctionId, PredicateId, SortId, VocabularyId};
use crate::structure::func_inter::FuncInter;
use crate::structure::pred_inter::{InterpretsAs, PredInter};
use crate::structure::sort_table::SortTable;
use crate::structure::table::{builtin_comparison_op, Table};
use crate::structure::universe::cartesian_product;
use crate::vocabulary::overload::SymbolArena;
use crate::vocabulary::symbol::SymbolType;
use crate::vocabulary::Vocabulary;

pub struct Structure {
    vocabulary: VocabularyId,
    sorts: HashMap<SortId, SortTable>,
    predicates: HashMap<PredicateId, PredInter>,
    functions: HashMap<FunctionId, FuncInter>,
}

impl Structure {
    pub fn new(vocabulary: VocabularyId) -> Self {
        Structure {
            vocabulary,
            sorts: HashMap::new(),
            predicates: HashMap::new(),
            functions: HashMap::new(),
        }
    }

    pub fn vocabulary(&self) -> VocabularyId {
        self.vocabulary
    }

    pub fn set_universe(&mut self, sort: SortId, table: SortTable) {
        self.sorts.insert(sort, table);
    }

    pub fn universe_of(&self, sort: SortId) -> Option<&SortTable> {
        self.sorts.get(&sort)
    }

    pub fn predicate(&self, id: PredicateId) -> Option<&PredInter> {
        self.predicates.get(&id)
    }

    /// The interpretation table of a symbol declared via
    /// [`crate::vocabulary::Vocabulary::declare_projection`] (a
    /// `P<ct>`/`P<cf>`/`P<pt>`/`P<pf>` view of another predicate),
    /// derived from that predicate's `PredInter` rather than one stored
    /// for the projection symbol itself. `None` if `id` does not name
    /// such a symbol, or its parent has no interpretation yet.
    pub fn projection_table(&self, arena: &SymbolArena, id: PredicateId) -> Option<Table> {
        let symbol = arena.predicate(id);
        let parent = symbol.parent?;
        let parent_inter = self.predicates.get(&parent)?;
        Some(match symbol.symbol_type {
            SymbolType::Ct => parent_inter.ct_table(),
            SymbolType::Cf => parent_inter.cf_table(),
            SymbolType::Pt => Table::Inverse(Box::new(parent_inter.cf_table())),
            SymbolType::Pf => Table::Inverse(Box::new(parent_inter.ct_table())),
            SymbolType::None => return None,
        })
    }

    pub fn predicate_mut(&mut self, id: PredicateId) -> &mut PredInter {
        self.predicates.entry(id).or_default()
    }

    pub fn function(&self, id: FunctionId) -> Option<&FuncInter> {
        self.functions.get(&id)
    }

    pub fn function_mut(&mut self, id: FunctionId) -> &mut FuncInter {
        self.functions.entry(id).or_default()
    }

    /// Closed-world completion: for every
    /// predicate in `voc` whose input sorts are all finite, any tuple in
    /// the full input universe that is not certainly true becomes
    /// certainly false. Predicates with an infinite input sort are left
    /// untouched — there is no finite universe to close against.
    ///
    /// A concrete variant of a built-in comparison (`=`, `<`, `>`) is
    /// special-cased: rather than enumerate its tuples, it gets a
    /// structurally-evaluated [`Table::Comparison`] over its sort's
    /// table, via [`PredInter::from_single`] — enumerating it the way
    /// every other predicate is closed here would make every pair not
    /// already asserted true count as certainly false, which is correct
    /// for `=` but wrong for `<`/`>`.
    pub fn autocomplete(&mut self, voc: &Vocabulary, arena: &SymbolArena, factory: &ElementFactory) {
        let mut universes: HashMap<PredicateId, Vec<Vec<crate::element::DomainElementRef>>> = HashMap::new();
        let mut comparisons: HashMap<PredicateId, PredInter> = HashMap::new();
        for overload in collect_predicate_overloads(voc) {
            for id in overload {
                let symbol = arena.predicate(id);
                if let Some(op) = builtin_comparison_op(&symbol.name) {
                    if let [a, b] = symbol.sorts.as_slice() {
                        if a == b {
                            if let Some(domain) = self.sorts.get(a) {
                                comparisons.insert(
                                    id,
                                    PredInter::from_single(
                                        Table::Comparison(op, domain.clone()),
                                        InterpretsAs::Ct,
                                    ),
                                );
                            }
                            continue;
                        }
                    }
                }
                let sort_tables: Option<Vec<&SortTable>> =
                    symbol.sorts.iter().map(|s| self.sorts.get(s)).collect();
                let Some(sort_tables) = sort_tables else { continue };
                if let Some(universe) = cartesian_product(&sort_tables, factory) {
                    universes.insert(id, universe);
                }
            }
        }
        for (id, inter) in comparisons {
            self.predicates.insert(id, inter);
        }
        for (id, universe) in universes {
            let inter = self.predicate_mut(id);
            for tuple in universe {
                if inter.is_unknown(&tuple) {
                    inter.make_false(tuple);
                }
            }
        }
    }

    /// Runs `function_check` on every function interpretation currently
    /// present, reporting every failure rather than stopping at the
    /// first.
    pub fn check_functions(&self, arena: &SymbolArena, factory: &ElementFactory) -> Vec<Error> {
        let mut errors = Vec::new();
        for (&id, inter) in &self.functions {
            let symbol = arena.function(id);
            let inputs = if symbol.partial {
                None
            } else {
                let sort_tables: Option<Vec<&SortTable>> =
                    symbol.input_sorts().iter().map(|s| self.sorts.get(s)).collect();
                sort_tables.and_then(|tables| cartesian_product(&tables, factory))
            };
            if let Err(e) = inter.function_check(&symbol.qualified_name(), inputs.as_deref()) {
                errors.push(e);
            }
        }
        errors
    }
}

fn collect_predicate_overloads(voc: &Vocabulary) -> Vec<Vec<PredicateId>> {
    // `Vocabulary` does not expose a direct iterator over every overload
    // (only per-name lookup), so this walks the small set of names a
    // caller is expected to have declared via the `Insert` API and is
    // kept here rather than on `Vocabulary` itself, since only structure
    // completion needs it.
    voc.all_predicate_overloads()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorSink;
    use crate::vocabulary::overload::SymbolArena;
    use crate::vocabulary::sort::SortLattice;

    #[test]
    fn autocomplete_closes_world_for_finite_sorts() {
        let mut lattice = SortLattice::new();
        let mut arena = SymbolArena::new();
        let mut sink = ErrorSink::new();
        let mut voc = Vocabulary::new(VocabularyId(0), "V");
        let thing = voc.declare_sort(&mut lattice, &mut sink, "thing").unwrap();
        let p = voc
            .declare_predicate(&mut arena, &mut sink, "p", vec![thing], false)
            .unwrap();

        let factory = ElementFactory::new(0, 8);
        let mut structure = Structure::new(VocabularyId(0));
        let mut universe = std::collections::BTreeSet::new();
        universe.insert(factory.create_int(1));
        universe.insert(factory.create_int(2));
        structure.set_universe(thing, SortTable::Enumerated(universe));
        structure.predicate_mut(p).make_true(vec![factory.create_int(1)]);

        structure.autocomplete(&voc, &arena, &factory);
        let inter = structure.predicate(p).unwrap();
        assert!(inter.is_true(&[factory.create_int(1)]));
        assert!(inter.is_false(&[factory.create_int(2)]));
    }

    #[test]
    fn projection_table_reads_the_parent_predicates_ct_view() {
        let mut lattice = SortLattice::new();
        let mut arena = SymbolArena::new();
        let mut sink = ErrorSink::new();
        let mut voc = Vocabulary::new(VocabularyId(0), "V");
        let thing = voc.declare_sort(&mut lattice, &mut sink, "thing").unwrap();
        let p = voc
            .declare_predicate(&mut arena, &mut sink, "p", vec![thing], false)
            .unwrap();
        let p_ct = voc.declare_projection(&mut arena, &mut sink, p, SymbolType::Ct).unwrap();

        let factory = ElementFactory::new(0, 8);
        let mut structure = Structure::new(VocabularyId(0));
        structure.predicate_mut(p).make_true(vec![factory.create_int(1)]);

        let table = structure.projection_table(&arena, p_ct).unwrap();
        assert!(table.contains(&[factory.create_int(1)]));
        assert!(!table.contains(&[factory.create_int(2)]));
    }
}
