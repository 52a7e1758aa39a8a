//! Sort derivation and checking.
//!
//! Runs a fixpoint over a rule's (or sentence's) free and quantified
//! variables: every occurrence of a variable as an argument to a known
//! symbol narrows that variable's candidate sort set, and every
//! overloaded symbol occurrence is re-tried against the narrowed
//! candidates until either a unique concrete variant is found or no
//! further narrowing happens. `Overloaded` names left unresolved, or
//! variables left with zero or more than one candidate, are reported
//! through an [`ErrorSink`] rather than aborting early, so a single pass
//! surfaces every problem in a rule instead of just the first one.

use std::collections::{BTreeSet, HashMap};

use crate::error::{Error, ErrorSink};
use crate::ids::{SortId, VarId};
use crate::syntax::formula::{Formula, FormulaKind, PredRef};
use crate::syntax::term::{FuncRef, SetExpr, Term};
use crate::vocabulary::overload::SymbolArena;
use crate::vocabulary::sort::SortLattice;
use crate::vocabulary::Vocabulary;

const MAX_ITERATIONS: usize = 64;

struct Context<'a> {
    lattice: &'a SortLattice,
    arena: &'a mut SymbolArena,
    voc: &'a mut Vocabulary,
    candidates: HashMap<VarId, BTreeSet<SortId>>,
    changed: bool,
}

/// Runs sort derivation over a rule/sentence's variables and body,
/// mutating `body` in place to resolve every overloaded symbol and
/// filling `var_sorts[i]` with the derived sort of `vars[i]`.
///
/// Returns `Ok(())` if every variable and symbol occurrence was resolved
/// to a unique answer; otherwise every failure is reported on `sink` and
/// `Err(())` is returned once the fixpoint stalls.
pub fn derive(
    vars: &[VarId],
    var_sorts: &mut [Option<SortId>],
    body: &mut Formula,
    voc: &mut Vocabulary,
    lattice: &SortLattice,
    arena: &mut SymbolArena,
    sink: &mut ErrorSink,
) -> Result<(), ()> {
    let mut candidates = HashMap::new();
    for (v, declared) in vars.iter().zip(var_sorts.iter()) {
        let set = match declared {
            Some(s) => BTreeSet::from([*s]),
            None => voc.sort_set().clone(),
        };
        candidates.insert(*v, set);
    }

    let mut ctx = Context {
        lattice,
        arena,
        voc,
        candidates,
        changed: true,
    };

    let mut iterations = 0;
    while ctx.changed && iterations < MAX_ITERATIONS {
        ctx.changed = false;
        narrow_formula(&mut ctx, body, sink);
        iterations += 1;
    }

    let mut ok = true;
    for (i, v) in vars.iter().enumerate() {
        let set = ctx.candidates.get(v).cloned().unwrap_or_default();
        match finalize(&set, lattice) {
            Some(sort) => var_sorts[i] = Some(sort),
            None => {
                ok = false;
                sink.report::<()>(Error::NoVarSort {
                    name: format!("{v:?}"),
                });
            }
        }
    }

    if contains_unresolved(body) {
        ok = false;
    }

    if ok {
        Ok(())
    } else {
        Err(())
    }
}

/// Picks a single sort out of a variable's remaining candidates: the
/// unique element, or (when several remain) the unique one that is an
/// ancestor of every other candidate — i.e. the most general sort that
/// still covers every observed use.
fn finalize(candidates: &BTreeSet<SortId>, lattice: &SortLattice) -> Option<SortId> {
    if candidates.is_empty() {
        return None;
    }
    if candidates.len() == 1 {
        return candidates.iter().next().copied();
    }
    let snapshot: Vec<SortId> = candidates.iter().copied().collect();
    snapshot
        .iter()
        .copied()
        .find(|&maybe_top| snapshot.iter().all(|&other| lattice.is_subsort(other, maybe_top, None)))
}

fn term_sort_hint(term: &Term, candidates: &HashMap<VarId, BTreeSet<SortId>>) -> Option<SortId> {
    match term {
        Term::Var(v) => {
            let set = candidates.get(v)?;
            (set.len() == 1).then(|| *set.iter().next().unwrap())
        }
        Term::Domain(_, sort) => *sort,
        Term::Func(FuncRef::Resolved(_), _) => None,
        Term::Func(FuncRef::Overloaded(_), _) => None,
        Term::Agg(_, _) => None,
    }
}

fn narrow_var(ctx: &mut Context<'_>, v: VarId, expected: SortId) {
    let Some(set) = ctx.candidates.get(&v) else { return };
    let allowed = ctx.lattice.descendants(expected, Some(ctx.voc.sort_set()));
    let narrowed: BTreeSet<SortId> = set.intersection(&allowed).copied().collect();
    if &narrowed != set {
        ctx.changed = true;
        ctx.candidates.insert(v, narrowed);
    }
}

fn narrow_term(ctx: &mut Context<'_>, term: &mut Term, expected: Option<SortId>, sink: &mut ErrorSink) {
    match term {
        Term::Var(v) => {
            if let Some(s) = expected {
                narrow_var(ctx, *v, s);
            }
        }
        Term::Domain(_, sort @ None) => {
            if let Some(s) = expected {
                *sort = Some(s);
                ctx.changed = true;
            }
        }
        Term::Domain(_, Some(_)) => {}
        Term::Func(func_ref, args) => {
            let hints: Vec<Option<SortId>> = args.iter().map(|a| term_sort_hint(a, &ctx.candidates)).collect();
            if let FuncRef::Overloaded(name) = func_ref {
                match ctx.voc.disambiguate_function(ctx.arena, ctx.lattice, name, &hints) {
                    Ok(Some(id)) => {
                        *func_ref = FuncRef::Resolved(id);
                        ctx.changed = true;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        sink.report::<()>(e);
                    }
                }
            }
            let input_sorts: Option<Vec<SortId>> = match func_ref {
                FuncRef::Resolved(id) => Some(ctx.arena.function(*id).input_sorts().to_vec()),
                FuncRef::Overloaded(_) => None,
            };
            for (i, arg) in args.iter_mut().enumerate() {
                let expected_arg = input_sorts.as_ref().and_then(|s| s.get(i).copied());
                narrow_term(ctx, arg, expected_arg, sink);
            }
        }
        Term::Agg(_, set) => narrow_set_expr(ctx, set, sink),
    }
}

fn narrow_set_expr(ctx: &mut Context<'_>, set: &mut SetExpr, sink: &mut ErrorSink) {
    match set {
        SetExpr::Enum(terms) => {
            for t in terms {
                narrow_term(ctx, t, None, sink);
            }
        }
        SetExpr::Quant { condition, term, .. } => {
            narrow_formula(ctx, condition, sink);
            narrow_term(ctx, term, None, sink);
        }
    }
}

fn narrow_formula(ctx: &mut Context<'_>, formula: &mut Formula, sink: &mut ErrorSink) {
    match &mut formula.kind {
        FormulaKind::Pred(pred_ref, args) => {
            let hints: Vec<Option<SortId>> = args.iter().map(|a| term_sort_hint(a, &ctx.candidates)).collect();
            if let PredRef::Overloaded(name) = pred_ref {
                match ctx.voc.disambiguate_predicate(ctx.arena, ctx.lattice, name, &hints) {
                    Ok(Some(id)) => {
                        *pred_ref = PredRef::Resolved(id);
                        ctx.changed = true;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        sink.report::<()>(e);
                    }
                }
            }
            let input_sorts: Option<Vec<SortId>> = match pred_ref {
                PredRef::Resolved(id) => Some(ctx.arena.predicate(*id).sorts.clone()),
                PredRef::Overloaded(_) => None,
            };
            for (i, arg) in args.iter_mut().enumerate() {
                let expected = input_sorts.as_ref().and_then(|s| s.get(i).copied());
                narrow_term(ctx, arg, expected, sink);
            }
        }
        FormulaKind::Equiv(l, r) => {
            narrow_formula(ctx, l, sink);
            narrow_formula(ctx, r, sink);
        }
        FormulaKind::Bool(_, parts) => {
            for p in parts {
                narrow_formula(ctx, p, sink);
            }
        }
        FormulaKind::Quant(_, _, _, body) => narrow_formula(ctx, body, sink),
        FormulaKind::EqChain(_, terms) => {
            // Each adjacent pair must share a common sort; if one side has
            // a known singleton hint, it becomes the expected sort for
            // the other.
            let hints: Vec<Option<SortId>> = terms.iter().map(|t| term_sort_hint(t, &ctx.candidates)).collect();
            let n = terms.len();
            for i in 0..n {
                let expected = (0..n)
                    .filter(|&j| j != i)
                    .find_map(|j| hints[j]);
                narrow_term(ctx, &mut terms[i], expected, sink);
            }
        }
    }
}

fn term_has_unresolved(term: &Term) -> bool {
    match term {
        Term::Var(_) | Term::Domain(..) => false,
        Term::Func(FuncRef::Overloaded(_), _) => true,
        Term::Func(FuncRef::Resolved(_), args) => args.iter().any(term_has_unresolved),
        Term::Agg(_, set) => match set.as_ref() {
            SetExpr::Enum(terms) => terms.iter().any(term_has_unresolved),
            SetExpr::Quant { condition, term, .. } => {
                formula_has_unresolved(condition) || term_has_unresolved(term)
            }
        },
    }
}

fn formula_has_unresolved(formula: &Formula) -> bool {
    match &formula.kind {
        FormulaKind::Pred(PredRef::Overloaded(_), _) => true,
        FormulaKind::Pred(PredRef::Resolved(_), args) => args.iter().any(term_has_unresolved),
        FormulaKind::Equiv(l, r) => formula_has_unresolved(l) || formula_has_unresolved(r),
        FormulaKind::Bool(_, parts) => parts.iter().any(formula_has_unresolved),
        FormulaKind::Quant(_, _, _, body) => formula_has_unresolved(body),
        FormulaKind::EqChain(_, terms) => terms.iter().any(term_has_unresolved),
    }
}

fn contains_unresolved(formula: &Formula) -> bool {
    formula_has_unresolved(formula)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::DomainElementRef;
    use crate::syntax::formula::{BoolOp, CompOp};
    use crate::vocabulary::overload::SymbolArena;

    fn setup() -> (SortLattice, SymbolArena, Vocabulary) {
        let mut lattice = SortLattice::new();
        let mut arena = SymbolArena::new();
        let voc = crate::vocabulary::standard::build(&mut lattice, &mut arena);
        (lattice, arena, voc)
    }

    fn int_element() -> DomainElementRef {
        crate::element::ElementFactory::new(-4, 4).create_int(1)
    }

    #[test]
    fn variable_compared_to_an_int_domain_element_is_narrowed_to_int() {
        let (lattice, mut arena, mut voc) = setup();
        let v = VarId(0);
        let mut sorts = vec![None];
        let mut body = Formula {
            sign: true,
            kind: FormulaKind::EqChain(
                CompOp::Eq,
                vec![Term::Var(v), Term::Domain(int_element(), Some(SortLattice::builtin_int()))],
            ),
        };
        let mut sink = ErrorSink::new();
        let result = derive(&[v], &mut sorts, &mut body, &mut voc, &lattice, &mut arena, &mut sink);
        assert!(result.is_ok(), "errors: {:?}", sink.errors());
        assert_eq!(sorts[0], Some(SortLattice::builtin_int()));
    }

    #[test]
    fn predicate_argument_narrows_variable_to_declared_sort() {
        let (mut lattice, mut arena, mut voc) = setup();
        let mut sink = ErrorSink::new();
        let thing = voc.declare_sort(&mut lattice, &mut sink, "thing").unwrap();
        let p = voc
            .declare_predicate(&mut arena, &mut sink, "p", vec![thing], false)
            .unwrap();

        let v = VarId(1);
        let mut sorts = vec![None];
        let mut body = Formula {
            sign: true,
            kind: FormulaKind::Pred(PredRef::Resolved(p), vec![Term::Var(v)]),
        };
        let result = derive(&[v], &mut sorts, &mut body, &mut voc, &lattice, &mut arena, &mut sink);
        assert!(result.is_ok(), "errors: {:?}", sink.errors());
        assert_eq!(sorts[0], Some(thing));
    }

    #[test]
    fn unconstrained_variable_is_reported_as_having_no_sort() {
        let (lattice, mut arena, mut voc) = setup();
        let v = VarId(2);
        let mut sorts = vec![None];
        let mut body = Formula {
            sign: true,
            kind: FormulaKind::Bool(BoolOp::And, vec![]),
        };
        let mut sink = ErrorSink::new();
        let result = derive(&[v], &mut sorts, &mut body, &mut voc, &lattice, &mut arena, &mut sink);
        assert!(result.is_err());
        assert!(matches!(sink.errors()[0], Error::NoVarSort { .. }));
    }
}
