//! Inductive definition rules.

use std::collections::BTreeSet;

use crate::ids::{PredicateId, SortId, VarId};
use crate::syntax::formula::{BoolOp, CompOp, Formula, FormulaKind, PredRef, QuantOp};
use crate::syntax::term::Term;

/// `head(args) <- body`, universally quantified over `vars`.
///
/// `args` may contain arbitrary terms, not just variables — a rule
/// `p(f(x)) <- phi` is accepted as surface syntax and rewritten into
/// `p(y) <- y = f(x) & phi` over a fresh variable `y` the first time
/// [`Rule::normalize_head`] runs ("rule-head rewriting
/// via fresh quantified variables").
#[derive(Clone, Debug)]
pub struct Rule {
    pub vars: Vec<VarId>,
    pub var_sorts: Vec<Option<SortId>>,
    pub head_pred: PredicateId,
    pub head_args: Vec<Term>,
    pub body: Formula,
}

impl Rule {
    /// Rewrites every non-variable head argument into a fresh
    /// existentially-bound-at-the-rule-level variable, conjoining an
    /// equality onto the body. `fresh` yields variable ids that are
    /// guaranteed not to collide with any in-scope variable.
    pub fn normalize_head(&mut self, mut fresh: impl FnMut() -> VarId) {
        let mut extra_conjuncts = Vec::new();
        for arg in &mut self.head_args {
            if matches!(arg, Term::Var(_)) {
                continue;
            }
            let replaced = std::mem::replace(arg, Term::Var(VarId(usize::MAX)));
            let v = fresh();
            *arg = Term::Var(v);
            self.vars.push(v);
            self.var_sorts.push(None);
            extra_conjuncts.push(Formula {
                sign: true,
                kind: FormulaKind::EqChain(CompOp::Eq, vec![Term::Var(v), replaced]),
            });
        }
        if !extra_conjuncts.is_empty() {
            let old_body = std::mem::replace(
                &mut self.body,
                Formula {
                    sign: true,
                    kind: FormulaKind::Bool(BoolOp::And, vec![]),
                },
            );
            extra_conjuncts.push(old_body);
            self.body = Formula {
                sign: true,
                kind: FormulaKind::Bool(BoolOp::And, extra_conjuncts),
            };
        }
    }

    /// The rule read as a sentence `! vars: head_as_atom <=> body`, used
    /// by sort derivation (which treats rule heads and bodies uniformly)
    /// and by formatting.
    pub fn as_equivalence(&self) -> Formula {
        let head = Formula {
            sign: true,
            kind: FormulaKind::Pred(PredRef::Resolved(self.head_pred), self.head_args.clone()),
        };
        let body = Formula {
            sign: true,
            kind: FormulaKind::Equiv(Box::new(head), Box::new(self.body.clone())),
        };
        Formula {
            sign: true,
            kind: FormulaKind::Quant(QuantOp::Forall, self.vars.clone(), self.var_sorts.clone(), Box::new(body)),
        }
    }
}

/// A group of rules sharing one induction, possibly over several
/// mutually-recursive predicates.
#[derive(Clone, Debug, Default)]
pub struct Definition {
    pub rules: Vec<Rule>,
}

impl Definition {
    pub fn defined_symbols(&self) -> BTreeSet<PredicateId> {
        self.rules.iter().map(|r| r.head_pred).collect()
    }

    /// Every rule defining the same predicate must agree on its arity;
    /// checked independently here, ahead of sort derivation, since it
    /// does not depend on any sort information.
    pub fn check_uniform_arity(&self) -> Result<(), crate::error::Error> {
        use std::collections::HashMap;
        let mut arities: HashMap<PredicateId, usize> = HashMap::new();
        for rule in &self.rules {
            let arity = rule.head_args.len();
            match arities.entry(rule.head_pred) {
                std::collections::hash_map::Entry::Vacant(e) => {
                    e.insert(arity);
                }
                std::collections::hash_map::Entry::Occupied(e) => {
                    if *e.get() != arity {
                        return Err(crate::error::Error::IncompatibleArity {
                            name: format!("{:?}", rule.head_pred),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
