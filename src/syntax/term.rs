//! Terms and set expressions.

use crate::element::DomainElementRef;
use crate::ids::{FunctionId, SortId, VarId};
use crate::syntax::formula::Formula;

/// A function occurrence before overload resolution is either already
/// concrete, or still names an unqualified, possibly-overloaded symbol
/// that sort derivation (§4.4) must resolve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FuncRef {
    Resolved(FunctionId),
    Overloaded(String),
}

/// The five aggregate operators a comprehension term can reduce with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggOp {
    Card,
    Sum,
    Prod,
    Min,
    Max,
}

/// A first-order term. `Domain` carries an optional asserted sort —
/// `None` until sort derivation (§4.4) fills it in, at which point it is
/// always `Some`.
#[derive(Clone, Debug)]
pub enum Term {
    Var(VarId),
    Domain(DomainElementRef, Option<SortId>),
    Func(FuncRef, Vec<Term>),
    Agg(AggOp, Box<SetExpr>),
}

impl Term {
    pub fn free_vars(&self, out: &mut Vec<VarId>) {
        match self {
            Term::Var(v) => out.push(*v),
            Term::Domain(..) => {}
            Term::Func(_, args) => args.iter().for_each(|a| a.free_vars(out)),
            Term::Agg(_, set) => set.free_vars(out),
        }
    }
}

/// A set expression: either an explicit enumeration of terms, or a
/// quantified comprehension `{ vars : condition : term }`.
#[derive(Clone, Debug)]
pub enum SetExpr {
    Enum(Vec<Term>),
    Quant {
        vars: Vec<VarId>,
        var_sorts: Vec<Option<SortId>>,
        condition: Box<Formula>,
        term: Box<Term>,
    },
}

impl SetExpr {
    /// Free variables, excluding those a `Quant` binds itself.
    pub fn free_vars(&self, out: &mut Vec<VarId>) {
        match self {
            SetExpr::Enum(terms) => terms.iter().for_each(|t| t.free_vars(out)),
            SetExpr::Quant {
                vars,
                condition,
                term,
                ..
            } => {
                let mut inner = Vec::new();
                condition.free_vars(&mut inner);
                term.free_vars(&mut inner);
                inner.retain(|v| !vars.contains(v));
                out.extend(inner);
            }
        }
    }
}
