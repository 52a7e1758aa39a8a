//! Predicate and function symbols, and the overload wrappers that group
//! their variants.

use std::collections::HashMap;

use crate::error::Error;
use crate::ids::{FunctionId, PredicateId, SortId};

/// One of the four projection tags a derived symbol (certainly-true,
/// certainly-false, possibly-true, possibly-false) can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolType {
    None,
    Ct,
    Cf,
    Pt,
    Pf,
}

/// A concrete (non-overloaded) predicate symbol `name/k`.
#[derive(Clone, Debug)]
pub struct PredicateSymbol {
    pub name: String,
    pub sorts: Vec<SortId>,
    pub infix: bool,
    pub parent: Option<PredicateId>,
    pub symbol_type: SymbolType,
}

impl PredicateSymbol {
    pub fn arity(&self) -> usize {
        self.sorts.len()
    }

    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.name, self.arity())
    }
}

/// A concrete (non-overloaded) function symbol `name/k`, whose sort
/// vector has `k + 1` entries (the last is the output sort).
#[derive(Clone, Debug)]
pub struct FunctionSymbol {
    pub name: String,
    pub sorts: Vec<SortId>,
    pub infix: bool,
    pub parent: Option<FunctionId>,
    pub symbol_type: SymbolType,
    /// A partial function is never checked for totality: a missing output
    /// for some input tuple is a legitimate gap, not an error. Defaults to
    /// `false` (total) at every declaration site unless set otherwise.
    pub partial: bool,
}

impl FunctionSymbol {
    pub fn arity(&self) -> usize {
        self.sorts.len() - 1
    }

    pub fn input_sorts(&self) -> &[SortId] {
        &self.sorts[..self.sorts.len() - 1]
    }

    pub fn output_sort(&self) -> SortId {
        *self.sorts.last().expect("function sort vector is never empty")
    }

    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.name, self.arity())
    }
}

/// The four overload-wrapper shapes a name can resolve to. A resolved concrete
/// symbol is never itself a wrapper — wrappers exist only at the
/// unqualified-name level inside a [`super::vocabulary::Vocabulary`].
#[derive(Clone, Debug)]
pub enum OverloadKind<Id: Copy + Eq + std::hash::Hash> {
    /// An explicit, finite set of variants, e.g. user-declared overloads.
    Enumerated(Vec<Id>),
    /// Built-in `=/2`, `</2`, `>/2`: one concrete variant `P[A,A]` per
    /// sort `A`, created and cached on first use.
    Comparison { cache: HashMap<SortId, Id> },
    /// Built-in `+`, `-`, `*`, `/`, `abs`, unary minus: exactly two
    /// variants, over `int` and `real`.
    Numeric { int: Id, real: Id },
    /// Built-in `MIN`, `MAX`, `SUCC`, `PRED`: one concrete variant per
    /// sort, created and cached on first use.
    Order { cache: HashMap<SortId, Id> },
}

impl<Id: Copy + Eq + std::hash::Hash> OverloadKind<Id> {
    pub fn variants(&self) -> Vec<Id> {
        match self {
            OverloadKind::Enumerated(ids) => ids.clone(),
            OverloadKind::Comparison { cache } | OverloadKind::Order { cache } => {
                cache.values().copied().collect()
            }
            OverloadKind::Numeric { int, real } => vec![*int, *real],
        }
    }
}

/// An overload wrapper: a set of concrete symbols sharing an unqualified
/// name.
#[derive(Clone, Debug)]
pub struct Overload<Id: Copy + Eq + std::hash::Hash> {
    pub name: String,
    pub kind: OverloadKind<Id>,
}

impl<Id: Copy + Eq + std::hash::Hash> Overload<Id> {
    pub fn enumerated(name: &str, first: Id) -> Self {
        Overload {
            name: name.to_string(),
            kind: OverloadKind::Enumerated(vec![first]),
        }
    }

    pub fn push_enumerated(&mut self, id: Id) -> Result<(), Error> {
        match &mut self.kind {
            OverloadKind::Enumerated(ids) => {
                if !ids.contains(&id) {
                    ids.push(id);
                }
                Ok(())
            }
            _ => Err(Error::MultiDecl {
                name: self.name.clone(),
            }),
        }
    }
}
