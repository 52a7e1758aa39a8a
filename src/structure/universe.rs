//! Cartesian products of sort tables, used to enumerate a predicate or
//! function's full tuple universe for autocompletion and function
//! checking.

use crate::element::DomainElementRef;
use crate::structure::sort_table::SortTable;
use crate::structure::table::Tuple;

/// `None` if any of `sorts` is not finite — the universe would be
/// infinite and cannot be enumerated.
pub fn cartesian_product(
    sorts: &[&SortTable],
    factory: &crate::element::ElementFactory,
) -> Option<Vec<Tuple>> {
    let mut factors: Vec<Vec<DomainElementRef>> = Vec::with_capacity(sorts.len());
    for sort in sorts {
        factors.push(sort.iter_finite(factory)?);
    }
    let mut product = vec![Vec::new()];
    for factor in factors {
        let mut next = Vec::with_capacity(product.len() * factor.len());
        for prefix in &product {
            for elem in &factor {
                let mut tuple = prefix.clone();
                tuple.push(elem.clone());
                next.push(tuple);
            }
        }
        product = next;
    }
    Some(product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn product_of_two_finite_sorts_has_the_expected_size() {
        let mut a = BTreeSet::new();
        let factory = crate::element::ElementFactory::new(0, 8);
        a.insert(factory.create_int(1));
        a.insert(factory.create_int(2));
        let sort_a = SortTable::Enumerated(a);
        let sort_b = SortTable::IntRange { lo: 0, hi: 2 };
        let product = cartesian_product(&[&sort_a, &sort_b], &factory).unwrap();
        assert_eq!(product.len(), 2 * 3);
    }

    #[test]
    fn product_with_an_infinite_factor_is_none() {
        let sort_a = SortTable::Integers;
        let factory = crate::element::ElementFactory::new(0, 8);
        assert!(cartesian_product(&[&sort_a], &factory).is_none());
    }
}
