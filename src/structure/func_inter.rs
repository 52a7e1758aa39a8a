//! Function interpretations and the function-check.
//!
//! A [`FuncInter`] wraps a [`PredInter`] over the function's graph
//! (input tuple + output value), the same representation the original
//! source uses internally ("a function is a special kind of relation").
//! `function_check` re-derives functionality (at most one output per
//! input) and, when every input sort is finite, totality (every input
//! has an output) from that graph.

use std::collections::HashMap;

use crate::error::Error;
use crate::structure::pred_inter::PredInter;
use crate::structure::table::Tuple;

#[derive(Clone, Debug, Default)]
pub struct FuncInter {
    graph: PredInter,
}

impl FuncInter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> &PredInter {
        &self.graph
    }

    pub fn set(&mut self, input: Tuple, output: crate::element::DomainElementRef) {
        let mut tuple = input;
        tuple.push(output);
        self.graph.make_true(tuple);
    }

    pub fn exclude(&mut self, input: Tuple, output: crate::element::DomainElementRef) {
        let mut tuple = input;
        tuple.push(output);
        self.graph.make_false(tuple);
    }

    /// The certain output for `input`, if there is exactly one.
    pub fn value_of(&self, input: &[crate::element::DomainElementRef]) -> Option<crate::element::DomainElementRef> {
        self.graph
            .ct_tuples()
            .expect("a function's graph is always built via set/exclude, hence always enumerated")
            .into_iter()
            .find(|t| t[..t.len() - 1] == *input)
            .map(|t| t[t.len() - 1].clone())
    }

    /// Checks functionality (no input tuple has more than one certain
    /// output) unconditionally, and totality (every input tuple in
    /// `inputs` has at least one certain output) when `inputs` is
    /// supplied — the caller passes `None` when the input universe is
    /// infinite, since totality is then undecidable by enumeration.
    pub fn function_check(&self, name: &str, inputs: Option<&[Tuple]>) -> Result<(), Error> {
        let ct = self
            .graph
            .ct_tuples()
            .expect("a function's graph is always built via set/exclude, hence always enumerated");
        let mut by_input: HashMap<Vec<crate::element::DomainElementRef>, usize> = HashMap::new();
        for t in &ct {
            let input = t[..t.len() - 1].to_vec();
            *by_input.entry(input).or_insert(0) += 1;
        }
        if by_input.values().any(|&count| count > 1) {
            return Err(Error::NotAFunction { name: name.to_string() });
        }
        if let Some(inputs) = inputs {
            if inputs.iter().any(|input| !by_input.contains_key(input.as_slice())) {
                return Err(Error::NotTotal { name: name.to_string() });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementFactory;

    #[test]
    fn two_outputs_for_the_same_input_is_not_a_function() {
        let factory = ElementFactory::new(0, 8);
        let mut f = FuncInter::new();
        f.set(vec![factory.create_int(1)], factory.create_int(10));
        f.set(vec![factory.create_int(1)], factory.create_int(11));
        let err = f.function_check("f", None).unwrap_err();
        assert!(matches!(err, Error::NotAFunction { .. }));
    }

    #[test]
    fn missing_input_is_not_total() {
        let factory = ElementFactory::new(0, 8);
        let mut f = FuncInter::new();
        f.set(vec![factory.create_int(1)], factory.create_int(10));
        let inputs = vec![vec![factory.create_int(1)], vec![factory.create_int(2)]];
        let err = f.function_check("f", Some(&inputs)).unwrap_err();
        assert!(matches!(err, Error::NotTotal { .. }));
    }

    #[test]
    fn a_proper_total_function_passes_the_check() {
        let factory = ElementFactory::new(0, 8);
        let mut f = FuncInter::new();
        f.set(vec![factory.create_int(1)], factory.create_int(10));
        f.set(vec![factory.create_int(2)], factory.create_int(20));
        let inputs = vec![vec![factory.create_int(1)], vec![factory.create_int(2)]];
        assert!(f.function_check("f", Some(&inputs)).is_ok());
    }
}
