//! Internal relation tables backing predicate and function
//! interpretations.
//!
//! These are lower-level than [`super::sort_table::SortTable`]: a
//! `Table` holds tuples of a fixed arity rather than single elements, and
//! is reused both for predicates (tuples) and functions (tuples extended
//! with the output value).

use std::collections::HashSet;

use crate::element::DomainElementRef;
use crate::syntax::formula::CompOp;

pub type Tuple = Vec<DomainElementRef>;

#[derive(Clone, Debug)]
pub enum Table {
    Enumerated(HashSet<Tuple>),
    /// A unary predicate whose extension is exactly a sort's table,
    /// e.g. the built-in `int/1` predicate shadowing the `int` sort.
    SortDerivedUnary(super::sort_table::SortTable),
    /// One of the built-in infinite comparison relations (`=`, `<`, `>`)
    /// restricted to a pair of sort tables, evaluated structurally rather
    /// than enumerated.
    Comparison(CompOp, super::sort_table::SortTable),
    Union(Vec<Table>),
    Inverse(Box<Table>),
}

/// The [`CompOp`] a built-in comparison predicate's name evaluates as, if
/// `name` is one of `=`, `<`, `>` (the three comparison operators the
/// standard vocabulary installs).
pub fn builtin_comparison_op(name: &str) -> Option<CompOp> {
    match name {
        "=" => Some(CompOp::Eq),
        "<" => Some(CompOp::Lt),
        ">" => Some(CompOp::Gt),
        _ => None,
    }
}

impl Table {
    pub fn contains(&self, tuple: &[DomainElementRef]) -> bool {
        match self {
            Table::Enumerated(set) => set.contains(tuple),
            Table::SortDerivedUnary(table) => {
                matches!(tuple, [single] if table.contains(single))
            }
            Table::Comparison(op, domain) => match tuple {
                [a, b] if domain.contains(a) && domain.contains(b) => match op {
                    CompOp::Eq => a == b,
                    CompOp::Neq => a != b,
                    CompOp::Lt => a < b,
                    CompOp::Leq => a <= b,
                    CompOp::Gt => a > b,
                    CompOp::Geq => a >= b,
                },
                _ => false,
            },
            Table::Union(parts) => parts.iter().any(|p| p.contains(tuple)),
            Table::Inverse(inner) => !inner.contains(tuple),
        }
    }

    /// Finite enumeration, when the table is known to be finite; used by
    /// autocompletion and by function-checking.
    pub fn iter_finite(&self, factory: &crate::element::ElementFactory) -> Option<Vec<Tuple>> {
        match self {
            Table::Enumerated(set) => Some(set.iter().cloned().collect()),
            Table::SortDerivedUnary(table) => table
                .iter_finite(factory)
                .map(|elems| elems.into_iter().map(|e| vec![e]).collect()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementFactory;
    use crate::structure::sort_table::SortTable;

    #[test]
    fn comparison_table_matches_structurally() {
        let factory = ElementFactory::new(0, 8);
        let table = Table::Comparison(CompOp::Lt, SortTable::Integers);
        assert!(table.contains(&[factory.create_int(1), factory.create_int(2)]));
        assert!(!table.contains(&[factory.create_int(2), factory.create_int(1)]));
    }

    #[test]
    fn inverse_table_complements_membership() {
        let factory = ElementFactory::new(0, 8);
        let mut set = HashSet::new();
        set.insert(vec![factory.create_int(1)]);
        let table = Table::Inverse(Box::new(Table::Enumerated(set)));
        assert!(!table.contains(&[factory.create_int(1)]));
        assert!(table.contains(&[factory.create_int(2)]));
    }
}
