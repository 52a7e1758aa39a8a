//! First-order formulas.
//!
//! Every formula carries an explicit `sign` rather than a dedicated `Not`
//! node: negation flips the sign bit, so double negation can never build
//! up as tree depth.

use crate::ids::{PredicateId, VarId};
use crate::syntax::term::Term;

/// A predicate occurrence before overload resolution (see
/// [`crate::syntax::term::FuncRef`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PredRef {
    Resolved(PredicateId),
    Overloaded(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuantOp {
    Forall,
    Exists,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompOp {
    Eq,
    Neq,
    Lt,
    Leq,
    Gt,
    Geq,
}

impl CompOp {
    pub fn negate(self) -> CompOp {
        match self {
            CompOp::Eq => CompOp::Neq,
            CompOp::Neq => CompOp::Eq,
            CompOp::Lt => CompOp::Geq,
            CompOp::Leq => CompOp::Gt,
            CompOp::Gt => CompOp::Leq,
            CompOp::Geq => CompOp::Lt,
        }
    }
}

#[derive(Clone, Debug)]
pub enum FormulaKind {
    Pred(PredRef, Vec<Term>),
    Equiv(Box<Formula>, Box<Formula>),
    Bool(BoolOp, Vec<Formula>),
    Quant(QuantOp, Vec<VarId>, Vec<Option<crate::ids::SortId>>, Box<Formula>),
    /// A chain `t0 op t1 op t2 ...`, e.g. `a < b < c` as a single node
    /// rather than a conjunction of pairwise comparisons, matching
    /// "EqChain".
    EqChain(CompOp, Vec<Term>),
}

#[derive(Clone, Debug)]
pub struct Formula {
    pub sign: bool,
    pub kind: FormulaKind,
}

impl Formula {
    pub fn pred(sign: bool, id: PredicateId, args: Vec<Term>) -> Formula {
        Formula {
            sign,
            kind: FormulaKind::Pred(PredRef::Resolved(id), args),
        }
    }

    pub fn bool(sign: bool, op: BoolOp, parts: Vec<Formula>) -> Formula {
        Formula {
            sign,
            kind: FormulaKind::Bool(op, parts),
        }
    }

    pub fn quant(
        sign: bool,
        op: QuantOp,
        vars: Vec<VarId>,
        var_sorts: Vec<Option<crate::ids::SortId>>,
        body: Formula,
    ) -> Formula {
        Formula {
            sign,
            kind: FormulaKind::Quant(op, vars, var_sorts, Box::new(body)),
        }
    }

    pub fn negated(mut self) -> Formula {
        self.sign = !self.sign;
        self
    }

    pub fn free_vars(&self, out: &mut Vec<VarId>) {
        match &self.kind {
            FormulaKind::Pred(_, args) => args.iter().for_each(|a| a.free_vars(out)),
            FormulaKind::Equiv(l, r) => {
                l.free_vars(out);
                r.free_vars(out);
            }
            FormulaKind::Bool(_, parts) => parts.iter().for_each(|p| p.free_vars(out)),
            FormulaKind::Quant(_, vars, _, body) => {
                let mut inner = Vec::new();
                body.free_vars(&mut inner);
                inner.retain(|v| !vars.contains(v));
                out.extend(inner);
            }
            FormulaKind::EqChain(_, terms) => terms.iter().for_each(|t| t.free_vars(out)),
        }
    }
}
