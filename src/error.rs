//! The closed error taxonomy.
//!
//! Propagation follows a three-tier discipline: Insert-builder failures
//! are reported to an [`ErrorSink`] and swallowed (the builder returns
//! `None`); traversal failures accumulate on [`crate::engine::EngineState`];
//! genuinely invalid client use panics instead of returning an `Error`.

use thiserror::Error;

/// One variant per error kind, grouped by doc comment into categories
/// rather than sub-enums, keeping the `Error::` namespace flat.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    // --- Structural (sort lattice) ---
    #[error("sort '{child}' cannot take '{parent}' as a parent: it would close a cycle")]
    CyclicHierarchy { child: String, parent: String },
    #[error("sort '{child}' has a declared child that is not a descendant of '{parent}'")]
    NotSubSort { child: String, parent: String },

    // --- Declaration ---
    #[error("'{name}' is already declared in this scope")]
    MultiDecl { name: String },
    #[error("sort '{name}' is not declared")]
    UndeclaredSort { name: String },
    #[error("predicate '{name}' is not declared")]
    UndeclaredPred { name: String },
    #[error("function '{name}' is not declared")]
    UndeclaredFunc { name: String },
    #[error("symbol '{name}' is not declared")]
    UndeclaredSymb { name: String },
    #[error("vocabulary '{name}' is not declared")]
    UndeclaredVoc { name: String },
    #[error("structure '{name}' is not declared")]
    UndeclaredStruct { name: String },
    #[error("theory '{name}' is not declared")]
    UndeclaredTheory { name: String },
    #[error("namespace '{name}' is not declared")]
    UndeclaredSpace { name: String },
    #[error("option '{name}' is not declared")]
    UndeclaredOption { name: String },

    // --- Resolution ---
    #[error("'{name}' resolves to more than one incomparable sort")]
    OverloadedSort { name: String },
    #[error("'{name}' resolves to more than one incomparable predicate")]
    OverloadedPred { name: String },
    #[error("'{name}' resolves to more than one incomparable function")]
    OverloadedFunc { name: String },
    #[error("command '{name}' is ambiguous")]
    AmbigCommand { name: String },
    #[error("'{name}' could be either a predicate or a function symbol")]
    PredOrFuncSymbol { name: String },

    // --- Sort derivation ---
    #[error("variable '{name}' has no candidate sort")]
    NoVarSort { name: String },
    #[error("predicate occurrence of '{name}' could not be disambiguated")]
    NoPredSort { name: String },
    #[error("function occurrence of '{name}' could not be disambiguated")]
    NoFuncSort { name: String },
    #[error("domain term has no sort")]
    NoDomSort,
    #[error("expected sort '{expected}' but found '{found}'")]
    WrongSort { expected: String, found: String },

    // --- Structure ---
    #[error("expected {expected} arguments, found {found}")]
    WrongArity { expected: usize, found: usize },
    #[error("'{name}' is used with incompatible arities")]
    IncompatibleArity { name: String },
    #[error("expected a UTF-8 string, found '{found}'")]
    ExpectedUtf { found: String },
    #[error("symbol '{name}' is not part of vocabulary '{voc}'")]
    SymbolNotInVocabulary { name: String, voc: String },
    #[error("tuple containing '{element}' is not in the sort of predicate '{pred}'")]
    PredElementNotInSort { element: String, pred: String },
    #[error("tuple containing '{element}' is not in the sort of function '{func}'")]
    FuncElementNotInSort { element: String, func: String },
    #[error("interpretation of '{name}' is not functional")]
    NotAFunction { name: String },
    #[error("interpretation of '{name}' is not total")]
    NotTotal { name: String },
    #[error("sort '{name}' has a three-valued interpretation where a two-valued one is required")]
    ThreeValSort { name: String },
    #[error("'{name}' has more than one interpretation")]
    MultiInterpretation { name: String },

    // --- I/O and command line ---
    #[error("file '{path}' does not exist")]
    UnexistingFile { path: String },
    #[error("unknown option '{name}'")]
    UnknownOption { name: String },
    #[error("'{value}' is not a valid value for option '{name}'")]
    WrongValue { name: String, value: String },
    #[error("'{path}' is included cyclically")]
    CyclicInclude { path: String },
}

/// Accumulates [`Error`]s raised by Insert-builder methods instead of
/// propagating them. The parser (out of scope here) is the intended
/// consumer: it keeps calling builder methods even after one fails, then
/// inspects the sink once a batch is done.
#[derive(Debug, Default, Clone)]
pub struct ErrorSink {
    errors: Vec<Error>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error and return `None`, so builder methods can write
    /// `return sink.report(...)`.
    pub fn report<T>(&mut self, error: Error) -> Option<T> {
        self.errors.push(error);
        None
    }

    pub fn count(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn take(&mut self) -> Vec<Error> {
        std::mem::take(&mut self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_swallows_and_counts() {
        let mut sink = ErrorSink::new();
        let result: Option<()> = sink.report(Error::UndeclaredSort {
            name: "foo".into(),
        });
        assert_eq!(result, None);
        assert_eq!(sink.count(), 1);
        assert!(!sink.is_empty());
    }
}
