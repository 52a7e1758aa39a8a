//! L1 — vocabularies: named collections of sorts, predicate symbols and
//! function symbols.
//!
//! Sorts and concrete symbols live in global arenas ([`sort::SortLattice`],
//! [`overload::SymbolArena`]) and are shared between every vocabulary that
//! references them, per Design Notes §9. A [`Vocabulary`] itself is just a
//! local view: three name tables plus the subset of global ids it has
//! pulled in, without the shared-pointer bookkeeping a reference-counted
//! ownership model would otherwise require.

pub mod overload;
pub mod sort;
pub mod standard;
pub mod symbol;

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::error::{Error, ErrorSink};
use crate::ids::{FunctionId, PredicateId, SortId, VocabularyId};
use overload::{
    disambiguate_function, disambiguate_predicate, resolve_function, resolve_predicate, SymbolArena,
};
use sort::SortLattice;
use symbol::{FunctionSymbol, Overload, OverloadKind, PredicateSymbol, SymbolType};

/// What a name currently refers to inside a vocabulary's three (disjoint)
/// namespaces.
enum Slot {
    Sort(SortId),
    Predicate(Overload<PredicateId>),
    Function(Overload<FunctionId>),
}

/// A named collection of sorts, predicates and functions. Declaring a name
/// that is already a predicate or function overload of the same kind
/// merges into it; declaring a name already used in a different namespace
/// is a [`Error::MultiDecl`].
pub struct Vocabulary {
    id: VocabularyId,
    name: String,
    sorts: IndexMap<String, SortId>,
    sort_set: BTreeSet<SortId>,
    predicates: IndexMap<String, Overload<PredicateId>>,
    functions: IndexMap<String, Overload<FunctionId>>,
}

impl Vocabulary {
    pub fn new(id: VocabularyId, name: &str) -> Self {
        Vocabulary {
            id,
            name: name.to_string(),
            sorts: IndexMap::new(),
            sort_set: BTreeSet::new(),
            predicates: IndexMap::new(),
            functions: IndexMap::new(),
        }
    }

    pub fn id(&self) -> VocabularyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sort_set(&self) -> &BTreeSet<SortId> {
        &self.sort_set
    }

    fn occupied_by(&self, name: &str) -> Option<Slot> {
        if let Some(&id) = self.sorts.get(name) {
            return Some(Slot::Sort(id));
        }
        if let Some(o) = self.predicates.get(name) {
            return Some(Slot::Predicate(o.clone()));
        }
        if let Some(o) = self.functions.get(name) {
            return Some(Slot::Function(o.clone()));
        }
        None
    }

    /// Declares a brand-new sort and pulls it into this vocabulary.
    pub fn declare_sort(&mut self, lattice: &mut SortLattice, sink: &mut ErrorSink, name: &str) -> Option<SortId> {
        if self.occupied_by(name).is_some() {
            return sink.report(Error::MultiDecl { name: name.to_string() });
        }
        let id = lattice.add_sort(name);
        self.import_sort(lattice, id, name);
        Some(id)
    }

    /// Pulls an already-existing sort (a builtin, or one declared in
    /// another vocabulary) into this vocabulary under `name`.
    pub fn import_sort(&mut self, lattice: &mut SortLattice, id: SortId, name: &str) {
        lattice.mark_in_vocabulary(id, self.id);
        self.sorts.insert(name.to_string(), id);
        self.sort_set.insert(id);
    }

    pub fn lookup_sort(&self, name: &str) -> Option<SortId> {
        self.sorts.get(name).copied()
    }

    /// Declares a new concrete predicate symbol `name(sorts)`, merging
    /// into an existing `Enumerated` overload of the same name if one
    /// exists.
    pub fn declare_predicate(
        &mut self,
        arena: &mut SymbolArena,
        sink: &mut ErrorSink,
        name: &str,
        sorts: Vec<SortId>,
        infix: bool,
    ) -> Option<PredicateId> {
        match self.occupied_by(name) {
            None => {
                let id = arena.add_predicate(PredicateSymbol {
                    name: name.to_string(),
                    sorts,
                    infix,
                    parent: None,
                    symbol_type: SymbolType::None,
                });
                arena.mark_predicate_in_vocabulary(id, self.id);
                self.predicates
                    .insert(name.to_string(), Overload::enumerated(name, id));
                Some(id)
            }
            Some(Slot::Predicate(_)) => {
                let id = arena.add_predicate(PredicateSymbol {
                    name: name.to_string(),
                    sorts,
                    infix,
                    parent: None,
                    symbol_type: SymbolType::None,
                });
                arena.mark_predicate_in_vocabulary(id, self.id);
                let overload = self.predicates.get_mut(name).expect("checked above");
                if let Err(e) = overload.push_enumerated(id) {
                    return sink.report(e);
                }
                Some(id)
            }
            Some(_) => sink.report(Error::MultiDecl { name: name.to_string() }),
        }
    }

    /// Declares `base<ct>`/`base<cf>`/`base<pt>`/`base<pf>`: a concrete
    /// predicate symbol naming one four-valued view of an already-declared
    /// predicate, carrying `base`'s sort vector and `parent: Some(base)`.
    /// [`crate::structure::structure::Structure::projection_table`] derives
    /// its interpretation from `base`'s `PredInter` rather than one stored
    /// directly for the projection symbol itself.
    pub fn declare_projection(
        &mut self,
        arena: &mut SymbolArena,
        sink: &mut ErrorSink,
        base: PredicateId,
        kind: SymbolType,
    ) -> Option<PredicateId> {
        let tag = match kind {
            SymbolType::Ct => "ct",
            SymbolType::Cf => "cf",
            SymbolType::Pt => "pt",
            SymbolType::Pf => "pf",
            SymbolType::None => panic!("declare_projection requires a Ct/Cf/Pt/Pf symbol_type"),
        };
        let base_symbol = arena.predicate(base);
        let name = format!("{}<{}>", base_symbol.name, tag);
        let sorts = base_symbol.sorts.clone();
        match self.occupied_by(&name) {
            None => {
                let id = arena.add_predicate(PredicateSymbol {
                    name: name.clone(),
                    sorts,
                    infix: false,
                    parent: Some(base),
                    symbol_type: kind,
                });
                arena.mark_predicate_in_vocabulary(id, self.id);
                self.predicates.insert(name.clone(), Overload::enumerated(&name, id));
                Some(id)
            }
            Some(_) => sink.report(Error::MultiDecl { name }),
        }
    }

    /// Declares a new concrete function symbol `name(sorts) : output`,
    /// merging into an existing `Enumerated` overload of the same name.
    /// `partial` marks the function as legitimately not total: `false`
    /// (the common case) means [`crate::structure::func_inter::FuncInter::function_check`]
    /// reports `NotTotal` for any input tuple missing an output.
    pub fn declare_function(
        &mut self,
        arena: &mut SymbolArena,
        sink: &mut ErrorSink,
        name: &str,
        sorts: Vec<SortId>,
        infix: bool,
        partial: bool,
    ) -> Option<FunctionId> {
        match self.occupied_by(name) {
            None => {
                let id = arena.add_function(FunctionSymbol {
                    name: name.to_string(),
                    sorts,
                    infix,
                    parent: None,
                    symbol_type: SymbolType::None,
                    partial,
                });
                arena.mark_function_in_vocabulary(id, self.id);
                self.functions
                    .insert(name.to_string(), Overload::enumerated(name, id));
                Some(id)
            }
            Some(Slot::Function(_)) => {
                let id = arena.add_function(FunctionSymbol {
                    name: name.to_string(),
                    sorts,
                    infix,
                    parent: None,
                    symbol_type: SymbolType::None,
                    partial,
                });
                arena.mark_function_in_vocabulary(id, self.id);
                let overload = self.functions.get_mut(name).expect("checked above");
                if let Err(e) = overload.push_enumerated(id) {
                    return sink.report(e);
                }
                Some(id)
            }
            Some(_) => sink.report(Error::MultiDecl { name: name.to_string() }),
        }
    }

    /// Registers one of the four built-in overload shapes directly
    /// (comparisons, numeric operators, order operators), bypassing the
    /// merge-on-redeclaration path since these are installed once by the
    /// standard vocabulary.
    pub fn install_predicate_overload(&mut self, name: &str, kind: OverloadKind<PredicateId>) {
        self.predicates.insert(
            name.to_string(),
            Overload { name: name.to_string(), kind },
        );
    }

    pub fn install_function_overload(&mut self, name: &str, kind: OverloadKind<FunctionId>) {
        self.functions.insert(
            name.to_string(),
            Overload { name: name.to_string(), kind },
        );
    }

    pub fn predicate_overload(&self, name: &str) -> Option<&Overload<PredicateId>> {
        self.predicates.get(name)
    }

    /// Every concrete predicate variant currently declared in this
    /// vocabulary, grouped by the overload that names them.
    pub fn all_predicate_overloads(&self) -> Vec<Vec<PredicateId>> {
        self.predicates.values().map(|o| o.kind.variants()).collect()
    }

    /// Every concrete function variant currently declared in this
    /// vocabulary, grouped by the overload that names them.
    pub fn all_function_overloads(&self) -> Vec<Vec<FunctionId>> {
        self.functions.values().map(|o| o.kind.variants()).collect()
    }

    pub fn function_overload(&self, name: &str) -> Option<&Overload<FunctionId>> {
        self.functions.get(name)
    }

    /// `resolve(name, sorts)`: the unique concrete predicate whose sort
    /// vector matches exactly.
    pub fn resolve_predicate(
        &mut self,
        arena: &mut SymbolArena,
        name: &str,
        sorts: &[SortId],
    ) -> Option<PredicateId> {
        let overload = self.predicates.get_mut(name)?;
        resolve_predicate(overload, arena, sorts)
    }

    pub fn resolve_function(
        &mut self,
        arena: &mut SymbolArena,
        lattice: &SortLattice,
        name: &str,
        sorts: &[SortId],
    ) -> Option<FunctionId> {
        let overload = self.functions.get_mut(name)?;
        resolve_function(overload, arena, lattice, sorts)
    }

    /// `disambiguate(name, sorts)`: the unique concrete predicate
    /// compatible with the (possibly partially unknown) sort vector.
    pub fn disambiguate_predicate(
        &mut self,
        arena: &mut SymbolArena,
        lattice: &SortLattice,
        name: &str,
        sorts: &[Option<SortId>],
    ) -> Result<Option<PredicateId>, Error> {
        let Some(overload) = self.predicates.get_mut(name) else {
            return Ok(None);
        };
        disambiguate_predicate(overload, arena, lattice, Some(&self.sort_set), sorts)
    }

    pub fn disambiguate_function(
        &mut self,
        arena: &mut SymbolArena,
        lattice: &SortLattice,
        name: &str,
        sorts: &[Option<SortId>],
    ) -> Result<Option<FunctionId>, Error> {
        let Some(overload) = self.functions.get_mut(name) else {
            return Ok(None);
        };
        disambiguate_function(overload, arena, lattice, Some(&self.sort_set), sorts)
    }

    /// Unmarks every sort and symbol this vocabulary references. The
    /// caller (the vocabulary registry owning the arenas) is responsible
    /// for dropping any arena entry this empties out, since `Vocabulary`
    /// does not itself own the arenas.
    pub fn release(self, lattice: &mut SortLattice, arena: &mut SymbolArena) {
        for &id in &self.sort_set {
            lattice.unmark_in_vocabulary(id, self.id);
        }
        for overload in self.predicates.values() {
            for id in overload.kind.variants() {
                arena.unmark_predicate_in_vocabulary(id, self.id);
            }
        }
        for overload in self.functions.values() {
            for id in overload.kind.variants() {
                arena.unmark_function_in_vocabulary(id, self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaring_same_predicate_name_twice_merges_overloads() {
        let mut lattice = SortLattice::new();
        let mut arena = SymbolArena::new();
        let mut sink = ErrorSink::new();
        let mut voc = Vocabulary::new(VocabularyId(0), "V");
        voc.import_sort(&mut lattice, SortLattice::builtin_int(), "int");

        let int = SortLattice::builtin_int();
        let p1 = voc
            .declare_predicate(&mut arena, &mut sink, "p", vec![int], false)
            .unwrap();
        let p2 = voc
            .declare_predicate(&mut arena, &mut sink, "p", vec![int, int], false)
            .unwrap();
        assert!(sink.is_empty());
        assert_ne!(p1, p2);

        let overload = voc.predicate_overload("p").unwrap();
        assert_eq!(overload.kind.variants().len(), 2);
    }

    #[test]
    fn declaring_a_name_already_used_as_a_sort_is_multidecl() {
        let mut lattice = SortLattice::new();
        let mut arena = SymbolArena::new();
        let mut sink = ErrorSink::new();
        let mut voc = Vocabulary::new(VocabularyId(0), "V");
        voc.declare_sort(&mut lattice, &mut sink, "Thing").unwrap();

        let result = voc.declare_predicate(&mut arena, &mut sink, "Thing", vec![], false);
        assert!(result.is_none());
        assert_eq!(sink.count(), 1);
        assert!(matches!(sink.errors()[0], Error::MultiDecl { .. }));
    }

    #[test]
    fn release_unmarks_sorts_and_symbols() {
        let mut lattice = SortLattice::new();
        let mut arena = SymbolArena::new();
        let mut sink = ErrorSink::new();
        let mut voc = Vocabulary::new(VocabularyId(0), "V");
        let sort = voc.declare_sort(&mut lattice, &mut sink, "Thing").unwrap();
        voc.declare_predicate(&mut arena, &mut sink, "p", vec![sort], false);

        voc.release(&mut lattice, &mut arena);
        assert!(lattice.vocabularies_of(sort).is_empty());
    }
}
