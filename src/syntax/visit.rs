//! Read-only traversal and in-place rewriting over terms and formulas:
//! one trait per direction rather than a single trait that tries to do
//! both, since a read-only visit and a tree rewrite need different
//! signatures (`&self` vs `self -> Self`) to stay zero-cost.

use crate::syntax::formula::{Formula, FormulaKind};
use crate::syntax::rule::{Definition, Rule};
use crate::syntax::term::{SetExpr, Term};
use crate::syntax::theory::Theory;

/// Read-only, post-order traversal. Override individual `visit_*` hooks;
/// the default implementations just recurse, matching the
/// leave-everything-as-is default a caller normally wants.
pub trait Visitor {
    fn visit_term(&mut self, term: &Term) {
        walk_term(self, term);
    }

    fn visit_set_expr(&mut self, set: &SetExpr) {
        walk_set_expr(self, set);
    }

    fn visit_formula(&mut self, formula: &Formula) {
        walk_formula(self, formula);
    }

    fn visit_rule(&mut self, rule: &Rule) {
        walk_rule(self, rule);
    }

    fn visit_definition(&mut self, definition: &Definition) {
        walk_definition(self, definition);
    }

    fn visit_theory(&mut self, theory: &Theory) {
        walk_theory(self, theory);
    }
}

pub fn walk_term<V: Visitor + ?Sized>(v: &mut V, term: &Term) {
    match term {
        Term::Var(_) | Term::Domain(..) => {}
        Term::Func(_, args) => args.iter().for_each(|a| v.visit_term(a)),
        Term::Agg(_, set) => v.visit_set_expr(set),
    }
}

pub fn walk_set_expr<V: Visitor + ?Sized>(v: &mut V, set: &SetExpr) {
    match set {
        SetExpr::Enum(terms) => terms.iter().for_each(|t| v.visit_term(t)),
        SetExpr::Quant { condition, term, .. } => {
            v.visit_formula(condition);
            v.visit_term(term);
        }
    }
}

pub fn walk_formula<V: Visitor + ?Sized>(v: &mut V, formula: &Formula) {
    match &formula.kind {
        FormulaKind::Pred(_, args) => args.iter().for_each(|a| v.visit_term(a)),
        FormulaKind::Equiv(l, r) => {
            v.visit_formula(l);
            v.visit_formula(r);
        }
        FormulaKind::Bool(_, parts) => parts.iter().for_each(|p| v.visit_formula(p)),
        FormulaKind::Quant(_, _, _, body) => v.visit_formula(body),
        FormulaKind::EqChain(_, terms) => terms.iter().for_each(|t| v.visit_term(t)),
    }
}

pub fn walk_rule<V: Visitor + ?Sized>(v: &mut V, rule: &Rule) {
    rule.head_args.iter().for_each(|a| v.visit_term(a));
    v.visit_formula(&rule.body);
}

pub fn walk_definition<V: Visitor + ?Sized>(v: &mut V, definition: &Definition) {
    definition.rules.iter().for_each(|r| v.visit_rule(r));
}

pub fn walk_theory<V: Visitor + ?Sized>(v: &mut V, theory: &Theory) {
    theory.sentences.iter().for_each(|f| v.visit_formula(f));
    theory.definitions.iter().for_each(|d| v.visit_definition(d));
}

/// Post-order, owned rewriting, applying `f` to every `Term` and `g` to
/// every `Formula` bottom-up — the formula analogue of
/// `convenience::apply::Apply`.
pub trait TraversingMutator: Sized {
    fn map_term(self, f: &mut impl FnMut(Term) -> Term) -> Self;
}

impl TraversingMutator for Term {
    fn map_term(self, f: &mut impl FnMut(Term) -> Term) -> Self {
        let rebuilt = match self {
            Term::Var(v) => Term::Var(v),
            Term::Domain(e, s) => Term::Domain(e, s),
            Term::Func(func, args) => {
                Term::Func(func, args.into_iter().map(|a| a.map_term(f)).collect())
            }
            Term::Agg(op, set) => Term::Agg(op, Box::new(set.map_term(f))),
        };
        f(rebuilt)
    }
}

impl TraversingMutator for SetExpr {
    fn map_term(self, f: &mut impl FnMut(Term) -> Term) -> Self {
        match self {
            SetExpr::Enum(terms) => SetExpr::Enum(terms.into_iter().map(|t| t.map_term(f)).collect()),
            SetExpr::Quant {
                vars,
                var_sorts,
                condition,
                term,
            } => SetExpr::Quant {
                vars,
                var_sorts,
                condition: Box::new(condition.map_term(f)),
                term: Box::new(term.map_term(f)),
            },
        }
    }
}

impl TraversingMutator for Formula {
    fn map_term(self, f: &mut impl FnMut(Term) -> Term) -> Self {
        let kind = match self.kind {
            FormulaKind::Pred(p, args) => {
                FormulaKind::Pred(p, args.into_iter().map(|a| a.map_term(f)).collect())
            }
            FormulaKind::Equiv(l, r) => {
                FormulaKind::Equiv(Box::new(l.map_term(f)), Box::new(r.map_term(f)))
            }
            FormulaKind::Bool(op, parts) => {
                FormulaKind::Bool(op, parts.into_iter().map(|p| p.map_term(f)).collect())
            }
            FormulaKind::Quant(op, vars, sorts, body) => {
                FormulaKind::Quant(op, vars, sorts, Box::new(body.map_term(f)))
            }
            FormulaKind::EqChain(op, terms) => {
                FormulaKind::EqChain(op, terms.into_iter().map(|t| t.map_term(f)).collect())
            }
        };
        Formula { sign: self.sign, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::VarId;

    struct VarCounter(usize);
    impl Visitor for VarCounter {
        fn visit_term(&mut self, term: &Term) {
            if let Term::Var(_) = term {
                self.0 += 1;
            }
            walk_term(self, term);
        }
    }

    #[test]
    fn visitor_counts_every_variable_occurrence() {
        let formula = Formula {
            sign: true,
            kind: FormulaKind::Bool(
                crate::syntax::formula::BoolOp::And,
                vec![
                    Formula {
                        sign: true,
                        kind: FormulaKind::EqChain(
                            crate::syntax::formula::CompOp::Eq,
                            vec![Term::Var(VarId(0)), Term::Var(VarId(1))],
                        ),
                    },
                    Formula {
                        sign: true,
                        kind: FormulaKind::EqChain(
                            crate::syntax::formula::CompOp::Lt,
                            vec![Term::Var(VarId(0)), Term::Var(VarId(2))],
                        ),
                    },
                ],
            ),
        };
        let mut counter = VarCounter(0);
        counter.visit_formula(&formula);
        assert_eq!(counter.0, 4);
    }

    #[test]
    fn map_term_rewrites_every_variable_bottom_up() {
        let term = Term::Func(
            crate::syntax::term::FuncRef::Resolved(crate::ids::FunctionId(0)),
            vec![Term::Var(VarId(0)), Term::Var(VarId(1))],
        );
        let rewritten = term.map_term(&mut |t| match t {
            Term::Var(VarId(n)) => Term::Var(VarId(n + 10)),
            other => other,
        });
        if let Term::Func(_, args) = rewritten {
            assert!(matches!(args[0], Term::Var(VarId(10))));
            assert!(matches!(args[1], Term::Var(VarId(11))));
        } else {
            panic!("expected Func");
        }
    }
}
