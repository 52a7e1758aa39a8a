//! The built-in vocabulary every user vocabulary implicitly extends: the
//! five built-in sorts plus the overloaded comparison, numeric and order
//! operators over them.

use std::collections::HashMap;

use crate::ids::VocabularyId;
use crate::vocabulary::overload::SymbolArena;
use crate::vocabulary::sort::SortLattice;
use crate::vocabulary::symbol::{FunctionSymbol, OverloadKind, SymbolType};
use crate::vocabulary::Vocabulary;

/// The reserved id of the standard vocabulary; every other vocabulary is
/// built as a copy of (or, eventually in `engine::Engine`, an implicit
/// extension of) this one.
pub const STANDARD_VOCABULARY_ID: VocabularyId = VocabularyId(0);

fn numeric_function(name: &str, arity: usize, arena: &mut SymbolArena) -> OverloadKind<crate::ids::FunctionId> {
    let int = SortLattice::builtin_int();
    let real = SortLattice::builtin_real();
    let int_id = arena.add_function(FunctionSymbol {
        name: name.to_string(),
        sorts: vec![int; arity + 1],
        infix: arity == 2,
        parent: None,
        symbol_type: SymbolType::None,
        partial: false,
    });
    let real_id = arena.add_function(FunctionSymbol {
        name: name.to_string(),
        sorts: vec![real; arity + 1],
        infix: arity == 2,
        parent: None,
        symbol_type: SymbolType::None,
        partial: false,
    });
    OverloadKind::Numeric { int: int_id, real: real_id }
}

/// Builds the standard vocabulary: the five built-in sorts (already
/// present in any fresh [`SortLattice`]) plus `=`, `<`, `>`, the numeric
/// operators and the order operators.
pub fn build(lattice: &mut SortLattice, arena: &mut SymbolArena) -> Vocabulary {
    let mut voc = Vocabulary::new(STANDARD_VOCABULARY_ID, "std");
    for (id, name) in [
        (SortLattice::builtin_real(), "real"),
        (SortLattice::builtin_int(), "int"),
        (SortLattice::builtin_nat(), "nat"),
        (SortLattice::builtin_string(), "string"),
        (SortLattice::builtin_char(), "char"),
    ] {
        voc.import_sort(lattice, id, name);
    }

    for name in ["=", "<", ">"] {
        voc.install_predicate_overload(
            name,
            OverloadKind::Comparison { cache: HashMap::new() },
        );
    }

    // Unary minus is left out: it shares the "-" spelling with binary
    // minus, and `OverloadKind::Numeric` tracks one variant per base sort
    // rather than per arity, so the two cannot occupy the same name slot.
    // See DESIGN.md.
    for (name, arity) in [("+", 2), ("-", 2), ("*", 2), ("/", 2), ("abs", 1)] {
        let kind = numeric_function(name, arity, arena);
        voc.install_function_overload(name, kind);
    }

    for name in ["MIN", "MAX", "SUCC", "PRED"] {
        voc.install_function_overload(name, OverloadKind::Order { cache: HashMap::new() });
    }

    voc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_vocabulary_carries_the_builtin_sorts_and_operators() {
        let mut lattice = SortLattice::new();
        let mut arena = SymbolArena::new();
        let voc = build(&mut lattice, &mut arena);

        assert_eq!(voc.lookup_sort("int"), Some(SortLattice::builtin_int()));
        assert!(voc.predicate_overload("=").is_some());
        assert!(voc.function_overload("+").is_some());
        assert!(voc.function_overload("MIN").is_some());
    }
}
