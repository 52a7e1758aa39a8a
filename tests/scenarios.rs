//! End-to-end scenarios exercising the public API across layers: a
//! declaration through [`idp_kernel::insert::Insert`], sort derivation,
//! and the resulting structure/table semantics.

use std::collections::BTreeSet;

use idp_kernel::element::ElementFactory;
use idp_kernel::engine::EngineState;
use idp_kernel::error::Error;
use idp_kernel::ids::VarId;
use idp_kernel::insert::Insert;
use idp_kernel::structure::sort_table::{SortTable, TableSize};
use idp_kernel::syntax::formula::Formula;
use idp_kernel::syntax::term::Term;

/// S1: an untyped variable occurring as the argument of `P/1[int]` is
/// derived to have sort `int`.
#[test]
fn untyped_variable_in_a_predicate_atom_derives_the_predicates_sort() {
    let mut engine = EngineState::new();
    let mut insert = Insert::new(&mut engine);
    let voc = insert.open_vocabulary("V");
    insert.open_theory("T", voc);
    let int = insert.sort_in_scope("int").unwrap();
    insert.import_sort("int", int).unwrap();
    let p = insert.declare_predicate("p", vec![int], false).unwrap();

    let v = VarId(0);
    let mut var_sorts = vec![None];
    let body = Formula::pred(true, p, vec![Term::Var(v)]);
    insert.add_sentence(&[v], &mut var_sorts, body).unwrap();
    assert!(insert.errors().is_empty(), "errors: {:?}", insert.errors());
    assert_eq!(var_sorts[0], Some(int));
}

/// S2: an overloaded `P/1` with one variant over a subsort and one over
/// its supersort disambiguates to the subsort variant when given an
/// argument of that subsort, and has no match at all against an
/// unrelated sort outside the hierarchy.
#[test]
fn overloaded_predicate_disambiguates_to_the_most_specific_variant() {
    let mut engine = EngineState::new();
    let mut insert = Insert::new(&mut engine);
    insert.open_vocabulary("V");
    let animal = insert.declare_sort("Animal").unwrap();
    let dog = insert.declare_sort("Dog").unwrap();
    let plant = insert.declare_sort("Plant").unwrap();
    insert.declare_subsort(dog, animal).unwrap();
    let p_dog = insert.declare_predicate("p", vec![dog], false).unwrap();
    let p_animal = insert.declare_predicate("p", vec![animal], false).unwrap();
    assert_ne!(p_dog, p_animal);

    let resolved = insert.predicate_in_scope("p", &[Some(dog)]).unwrap();
    assert_eq!(resolved, Some(p_dog));

    let unmatched = insert.predicate_in_scope("p", &[Some(plant)]).unwrap();
    assert_eq!(unmatched, None);
}

/// S3: the standard `+` overload picks the int variant when both
/// arguments are int, and the real variant as soon as one argument is
/// real.
#[test]
fn numeric_overload_widens_to_real_only_when_a_real_argument_is_present() {
    let mut engine = EngineState::new();
    let mut insert = Insert::new(&mut engine);
    insert.open_vocabulary("V");
    let int = insert.sort_in_scope("int").unwrap();
    let real = insert.sort_in_scope("real").unwrap();

    let plus_int = insert.function_in_scope("+", &[Some(int), Some(int)]).unwrap().unwrap();
    let plus_mixed = insert.function_in_scope("+", &[Some(int), Some(real)]).unwrap().unwrap();
    assert_ne!(plus_int, plus_mixed);

    assert_eq!(engine.arena.function(plus_int).sorts, vec![int, int, int]);
    assert_eq!(engine.arena.function(plus_mixed).sorts, vec![real, real, real]);
}

/// S4: a predicate's ct/cf tables drive `is_true`/`is_false`/`is_unknown`
/// and `approx_two_valued` exactly per their certain/possible definitions.
#[test]
fn predicate_interpretation_tracks_certain_and_unknown_tuples() {
    let mut engine = EngineState::new();
    let mut insert = Insert::new(&mut engine);
    let voc = insert.open_vocabulary("V");
    let a_sort = insert.declare_sort("A").unwrap();
    let p = insert.declare_predicate("p", vec![a_sort], false).unwrap();
    drop(insert);

    let structure_id = engine.new_structure(voc);

    let factory = &engine.factory;
    let a = factory.create_str("a", true);
    let b = factory.create_str("b", true);
    let c = factory.create_str("c", true);
    let universe: BTreeSet<_> = [a.clone(), b.clone(), c.clone()].into_iter().collect();

    let structure = engine.structure_mut(structure_id);
    structure.set_universe(a_sort, SortTable::Enumerated(universe));
    structure.predicate_mut(p).make_true(vec![a.clone()]);
    structure.predicate_mut(p).make_false(vec![c.clone()]);

    let inter = engine.structure(structure_id).predicate(p).unwrap();
    assert!(inter.is_true(&[a.clone()]));
    assert!(!inter.is_false(&[a.clone()]));
    assert!(inter.is_false(&[c.clone()]));
    assert!(inter.is_unknown(&[b.clone()]));

    let full_universe = vec![vec![a.clone()], vec![b.clone()], vec![c.clone()]];
    assert!(!inter.approx_two_valued(&full_universe));
}

/// S5: a total unary function `F/1[A:A]` missing an output for one
/// element of its finite input sort fails `function_check` with
/// `NotTotal`.
#[test]
fn partial_function_over_a_finite_sort_fails_the_totality_check() {
    let mut engine = EngineState::new();
    let mut insert = Insert::new(&mut engine);
    let voc = insert.open_vocabulary("V");
    let a_sort = insert.declare_sort("A").unwrap();
    let f = insert.declare_function("f", vec![a_sort, a_sort], false, false).unwrap();
    drop(insert);

    let structure_id = engine.new_structure(voc);

    let factory = &engine.factory;
    let a = factory.create_str("a", true);
    let b = factory.create_str("b", true);
    let c = factory.create_str("c", true);
    let universe: BTreeSet<_> = [a.clone(), b.clone(), c.clone()].into_iter().collect();

    let structure = engine.structure_mut(structure_id);
    structure.set_universe(a_sort, SortTable::Enumerated(universe));
    structure.function_mut(f).set(vec![a.clone()], a.clone());
    structure.function_mut(f).set(vec![b.clone()], b.clone());

    let errors = engine.structure(structure_id).check_functions(&engine.arena, &engine.factory);
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], Error::NotTotal { .. }));
}

/// S5b: the same gap, but `f` is declared `partial`, passes `function_check`
/// without a `NotTotal` error.
#[test]
fn partial_function_over_a_finite_sort_allows_a_gap() {
    let mut engine = EngineState::new();
    let mut insert = Insert::new(&mut engine);
    let voc = insert.open_vocabulary("V");
    let a_sort = insert.declare_sort("A").unwrap();
    let f = insert.declare_function("f", vec![a_sort, a_sort], false, true).unwrap();
    drop(insert);

    let structure_id = engine.new_structure(voc);

    let factory = &engine.factory;
    let a = factory.create_str("a", true);
    let b = factory.create_str("b", true);
    let c = factory.create_str("c", true);
    let universe: BTreeSet<_> = [a.clone(), b.clone(), c.clone()].into_iter().collect();

    let structure = engine.structure_mut(structure_id);
    structure.set_universe(a_sort, SortTable::Enumerated(universe));
    structure.function_mut(f).set(vec![a.clone()], a.clone());
    structure.function_mut(f).set(vec![b.clone()], b.clone());

    let errors = engine.structure(structure_id).check_functions(&engine.arena, &engine.factory);
    assert!(errors.is_empty());
}

/// S6: a union sort `A = B ∪ C` with `B = {1,2}` and `C = {2,3}` reports
/// size 3 (not 4) and iterates `{1,2,3}` with the shared element `2`
/// appearing exactly once.
#[test]
fn union_sort_deduplicates_elements_shared_by_its_parts() {
    let factory = ElementFactory::new(0, 8);
    let b: BTreeSet<_> = [1, 2].into_iter().map(|n| factory.create_int(n)).collect();
    let c: BTreeSet<_> = [2, 3].into_iter().map(|n| factory.create_int(n)).collect();
    let union = SortTable::Union {
        parts: vec![SortTable::Enumerated(b), SortTable::Enumerated(c)],
        blacklist: BTreeSet::new(),
    };

    assert_eq!(union.size(), TableSize::Finite(3));
    let elems = union.iter_finite(&factory).unwrap();
    let values: Vec<i64> = elems.iter().map(|e| e.as_int().unwrap()).collect();
    assert_eq!(values, vec![1, 2, 3]);
}
