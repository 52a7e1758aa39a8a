//! The `Insert`-style builder API: for every
//! AST-producing operation a factory that consults the current scope,
//! validates sorts and registers the new object, returning `None` (and
//! recording an [`Error`] on the sink) instead of propagating a `Result`,
//! so a caller driving a grammar can keep going after one bad declaration
//! rather than aborting the whole parse.

use either::Either;

use crate::engine::EngineState;
use crate::error::{Error, ErrorSink};
use crate::ids::{FunctionId, PredicateId, SortId, StructureId, TheoryId, VocabularyId, VarId};
use crate::namespace::UsingEntry;
use crate::syntax::formula::Formula;
use crate::syntax::rule::{Definition, Rule};

/// Holds the "currently open" vocabulary/theory/structure — the Insert
/// equivalent of a parser's `%type` stack frame — plus the error sink every
/// factory method reports into. One `Insert` is built per parse; `engine`
/// outlives it.
pub struct Insert<'e> {
    engine: &'e mut EngineState,
    sink: ErrorSink,
    current_vocabulary: Option<VocabularyId>,
    current_theory: Option<TheoryId>,
    current_structure: Option<StructureId>,
}

impl<'e> Insert<'e> {
    pub fn new(engine: &'e mut EngineState) -> Self {
        Insert {
            engine,
            sink: ErrorSink::new(),
            current_vocabulary: None,
            current_theory: None,
            current_structure: None,
        }
    }

    pub fn errors(&self) -> &[Error] {
        self.sink.errors()
    }

    pub fn take_errors(&mut self) -> Vec<Error> {
        self.sink.take()
    }

    pub fn engine(&self) -> &EngineState {
        self.engine
    }

    // --- open/close block plumbing ---

    /// `using vocabulary V`: imports `V`'s sorts/predicates/functions into
    /// the current lookup scope until the enclosing block closes.
    pub fn use_vocabulary(&mut self, id: VocabularyId) {
        self.engine.namespaces.import_scope(UsingEntry::Vocabulary(id));
    }

    pub fn open_vocabulary(&mut self, name: &str) -> VocabularyId {
        let id = self.engine.new_vocabulary(name);
        self.engine.namespaces.declare_vocabulary(&mut self.sink, name, id);
        self.engine.namespaces.open_block(&mut self.sink, None);
        self.current_vocabulary = Some(id);
        id
    }

    pub fn close_vocabulary(&mut self) {
        self.engine.namespaces.close_block();
        self.current_vocabulary = None;
    }

    pub fn open_theory(&mut self, name: &str, vocabulary: VocabularyId) -> TheoryId {
        let id = self.engine.new_theory(vocabulary);
        self.engine.namespaces.declare_theory(&mut self.sink, name, id);
        self.engine.namespaces.open_block(&mut self.sink, None);
        self.current_theory = Some(id);
        id
    }

    pub fn close_theory(&mut self) {
        self.engine.namespaces.close_block();
        self.current_theory = None;
    }

    pub fn open_structure(&mut self, name: &str, vocabulary: VocabularyId) -> StructureId {
        let id = self.engine.new_structure(vocabulary);
        self.engine.namespaces.declare_structure(&mut self.sink, name, id);
        self.engine.namespaces.open_block(&mut self.sink, None);
        self.current_structure = Some(id);
        id
    }

    pub fn close_structure(&mut self) {
        self.engine.namespaces.close_block();
        self.current_structure = None;
    }

    // --- declarations, scoped to the currently open vocabulary ---

    fn current_vocabulary_id(&mut self) -> Option<VocabularyId> {
        match self.current_vocabulary {
            Some(id) => Some(id),
            None => {
                self.sink
                    .report::<()>(Error::UndeclaredVoc { name: "<no open vocabulary>".to_string() });
                None
            }
        }
    }

    pub fn declare_sort(&mut self, name: &str) -> Option<SortId> {
        let voc = self.current_vocabulary_id()?;
        let (vocabulary, lattice, _arena) = self.engine.vocabulary_env_mut(voc);
        vocabulary.declare_sort(lattice, &mut self.sink, name)
    }

    /// Pulls a sort declared elsewhere (typically a standard-vocabulary
    /// builtin such as `int`) into the currently open vocabulary, e.g.
    /// for a declaration like `P(x[int])` that uses a builtin sort
    /// without redeclaring it.
    pub fn import_sort(&mut self, name: &str, id: SortId) -> Option<()> {
        let voc = self.current_vocabulary_id()?;
        let (vocabulary, lattice, _arena) = self.engine.vocabulary_env_mut(voc);
        vocabulary.import_sort(lattice, id, name);
        Some(())
    }

    /// Declares `child` as a subsort of `parent` (`CyclicHierarchy` /
    /// `NotSubSort` on failure).
    pub fn declare_subsort(&mut self, child: SortId, parent: SortId) -> Option<()> {
        match self.engine.lattice.add_parent(child, parent) {
            Ok(()) => Some(()),
            Err(e) => self.sink.report(e),
        }
    }

    pub fn declare_predicate(&mut self, name: &str, sorts: Vec<SortId>, infix: bool) -> Option<PredicateId> {
        let voc = self.current_vocabulary_id()?;
        let (vocabulary, _lattice, arena) = self.engine.vocabulary_env_mut(voc);
        vocabulary.declare_predicate(arena, &mut self.sink, name, sorts, infix)
    }

    pub fn declare_function(
        &mut self,
        name: &str,
        sorts: Vec<SortId>,
        infix: bool,
        partial: bool,
    ) -> Option<FunctionId> {
        let voc = self.current_vocabulary_id()?;
        let (vocabulary, _lattice, arena) = self.engine.vocabulary_env_mut(voc);
        vocabulary.declare_function(arena, &mut self.sink, name, sorts, infix, partial)
    }

    // --- scope lookup: current vocabulary first, then the standard one ---

    pub fn sort_in_scope(&mut self, name: &str) -> Option<SortId> {
        if let Some(voc) = self.current_vocabulary {
            if let Some(id) = self.engine.vocabulary(voc).lookup_sort(name) {
                return Some(id);
            }
        }
        self.engine.standard_vocabulary.lookup_sort(name)
    }

    pub fn predicate_in_scope(&mut self, name: &str, sorts: &[Option<SortId>]) -> Result<Option<PredicateId>, Error> {
        if let Some(voc) = self.current_vocabulary {
            let (vocabulary, lattice, arena) = self.engine.vocabulary_env_mut(voc);
            let found = vocabulary.disambiguate_predicate(arena, lattice, name, sorts)?;
            if found.is_some() {
                return Ok(found);
            }
        }
        self.engine
            .standard_vocabulary
            .disambiguate_predicate(&mut self.engine.arena, &self.engine.lattice, name, sorts)
    }

    pub fn function_in_scope(&mut self, name: &str, sorts: &[Option<SortId>]) -> Result<Option<FunctionId>, Error> {
        if let Some(voc) = self.current_vocabulary {
            let (vocabulary, lattice, arena) = self.engine.vocabulary_env_mut(voc);
            let found = vocabulary.disambiguate_function(arena, lattice, name, sorts)?;
            if found.is_some() {
                return Ok(found);
            }
        }
        self.engine
            .standard_vocabulary
            .disambiguate_function(&mut self.engine.arena, &self.engine.lattice, name, sorts)
    }

    /// Resolves a bare name that could name either a predicate or a
    /// function symbol.
    /// Fails if both kinds resolve, or if neither does.
    pub fn symbol_in_scope(
        &mut self,
        name: &str,
        sorts: &[Option<SortId>],
    ) -> Result<Either<PredicateId, FunctionId>, Error> {
        let pred = self.predicate_in_scope(name, sorts)?;
        let func = self.function_in_scope(name, sorts)?;
        match (pred, func) {
            (Some(p), None) => Ok(Either::Left(p)),
            (None, Some(f)) => Ok(Either::Right(f)),
            (None, None) => Err(Error::UndeclaredSymb { name: name.to_string() }),
            (Some(_), Some(_)) => Err(Error::PredOrFuncSymbol { name: name.to_string() }),
        }
    }

    // --- theory content ---

    /// Runs sort derivation over `body` (free variables `vars`/`var_sorts`)
    /// before adding it as a sentence of the currently open theory.
    pub fn add_sentence(&mut self, vars: &[VarId], var_sorts: &mut [Option<SortId>], mut body: Formula) -> Option<()> {
        let voc = self.current_vocabulary?;
        let theory = self.current_theory?;
        {
            let (vocabulary, lattice, arena) = self.engine.vocabulary_env_mut(voc);
            crate::syntax::sort_derivation::derive(vars, var_sorts, &mut body, vocabulary, lattice, arena, &mut self.sink)
                .ok()?;
        }
        self.engine.theory_mut(theory).add_sentence(body);
        Some(())
    }

    pub fn add_definition(&mut self, definition: Definition) -> Option<()> {
        if let Err(e) = definition.check_uniform_arity() {
            return self.sink.report(e);
        }
        let theory = self.current_theory?;
        self.engine.theory_mut(theory).add_definition(definition);
        Some(())
    }

    pub fn make_rule(
        &mut self,
        vars: Vec<VarId>,
        var_sorts: Vec<Option<SortId>>,
        head_pred: PredicateId,
        head_args: Vec<crate::syntax::term::Term>,
        body: Formula,
        mut fresh: impl FnMut() -> VarId,
    ) -> Rule {
        let mut rule = Rule { vars, var_sorts, head_pred, head_args, body };
        rule.normalize_head(&mut fresh);
        rule
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::formula::FormulaKind;

    #[test]
    fn opening_a_vocabulary_then_declaring_a_sort_registers_it_in_scope() {
        let mut engine = EngineState::new();
        let mut insert = Insert::new(&mut engine);
        insert.open_vocabulary("V");
        let thing = insert.declare_sort("thing").unwrap();
        assert_eq!(insert.sort_in_scope("thing"), Some(thing));
        assert!(insert.errors().is_empty());
    }

    #[test]
    fn declaring_a_sort_with_no_open_vocabulary_is_an_error() {
        let mut engine = EngineState::new();
        let mut insert = Insert::new(&mut engine);
        let result = insert.declare_sort("thing");
        assert!(result.is_none());
        assert_eq!(insert.errors().len(), 1);
    }

    #[test]
    fn symbol_in_scope_picks_the_predicate_when_only_a_predicate_matches() {
        let mut engine = EngineState::new();
        let mut insert = Insert::new(&mut engine);
        insert.open_vocabulary("V");
        let thing = insert.declare_sort("thing").unwrap();
        let p = insert.declare_predicate("p", vec![thing], false).unwrap();
        let resolved = insert.symbol_in_scope("p", &[Some(thing)]).unwrap();
        assert_eq!(resolved, Either::Left(p));
    }

    #[test]
    fn sort_in_scope_falls_back_to_the_standard_vocabulary() {
        let mut engine = EngineState::new();
        let mut insert = Insert::new(&mut engine);
        insert.open_vocabulary("V");
        assert!(insert.sort_in_scope("int").is_some());
    }

    #[test]
    fn importing_a_builtin_sort_adds_it_to_the_vocabularys_own_scope() {
        let mut engine = EngineState::new();
        let mut insert = Insert::new(&mut engine);
        let voc = insert.open_vocabulary("V");
        let int = insert.sort_in_scope("int").unwrap();
        assert!(!insert.engine().vocabulary(voc).sort_set().contains(&int));
        insert.import_sort("int", int).unwrap();
        assert!(insert.engine().vocabulary(voc).sort_set().contains(&int));
    }

    #[test]
    fn adding_a_sentence_to_a_closed_theory_is_a_no_op_none() {
        let mut engine = EngineState::new();
        let mut insert = Insert::new(&mut engine);
        insert.open_vocabulary("V");
        let formula = Formula {
            sign: true,
            kind: FormulaKind::Bool(crate::syntax::formula::BoolOp::And, vec![]),
        };
        let result = insert.add_sentence(&[], &mut [], formula);
        assert!(result.is_none());
    }
}
