//! The process-wide context: the domain-element factory, the
//! sort lattice and symbol arena, the standard vocabulary, the namespace
//! tree, the option bag and the cancellation flag, all owned explicitly by
//! one [`EngineState`] value rather than an ambient global singleton.
//! A single-process embedder is expected to keep exactly one `EngineState`
//! alive; dropping it tears down everything transitively.

use std::collections::HashMap;

use crate::element::ElementFactory;
use crate::error::Error;
use crate::ids::{StructureId, TheoryId, VocabularyId};
use crate::namespace::NamespaceRegistry;
use crate::structure::Structure;
use crate::syntax::theory::Theory;
use crate::vocabulary::overload::SymbolArena;
use crate::vocabulary::sort::SortLattice;
use crate::vocabulary::standard::{self, STANDARD_VOCABULARY_ID};
use crate::vocabulary::Vocabulary;

/// One configuration value, tagged by the three value kinds an option can
/// hold (boolean flags, integer limits, string-valued choices).
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

/// A mutable configuration bag, seeded with defaults and looked up by
/// name; setting an undeclared name or the wrong value kind is reported
/// rather than panicking, since option values usually come from
/// untrusted user input.
#[derive(Debug, Clone)]
pub struct Options {
    values: HashMap<String, OptionValue>,
}

impl Options {
    /// The defaults every fresh options bag starts from — a representative
    /// subset of the full option set (verbosity/timeout knobs and
    /// solver-backend options are out of scope here).
    pub fn defaults() -> Self {
        let mut values = HashMap::new();
        values.insert("showwarnings".to_string(), OptionValue::Bool(true));
        values.insert("autocomplete".to_string(), OptionValue::Bool(true));
        values.insert("longnames".to_string(), OptionValue::Bool(false));
        values.insert("nrmodels".to_string(), OptionValue::Int(1));
        values.insert("language".to_string(), OptionValue::Str("idp".to_string()));
        Options { values }
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.values.get(name)? {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.values.get(name)? {
            OptionValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            OptionValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Sets `name` to `value`, failing `UndeclaredOption` for an unknown
    /// name and `WrongValue` when `value`'s kind does not match the
    /// option's declared kind.
    pub fn set(&mut self, name: &str, value: OptionValue) -> Result<(), Error> {
        let Some(current) = self.values.get(name) else {
            return Err(Error::UndeclaredOption { name: name.to_string() });
        };
        let same_kind = matches!(
            (current, &value),
            (OptionValue::Bool(_), OptionValue::Bool(_))
                | (OptionValue::Int(_), OptionValue::Int(_))
                | (OptionValue::Str(_), OptionValue::Str(_))
        );
        if !same_kind {
            let found = match value {
                OptionValue::Bool(b) => b.to_string(),
                OptionValue::Int(n) => n.to_string(),
                OptionValue::Str(s) => s,
            };
            return Err(Error::WrongValue { name: name.to_string(), value: found });
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Everything a single embedding process needs one of, owned explicitly
/// rather than reached through a global singleton. `EngineState::new` is
/// the whole of its setup; there is no separate teardown step, since
/// ownership (not a global pointer) is what makes every reference into it
/// invalid once it drops.
pub struct EngineState {
    pub factory: ElementFactory,
    pub lattice: SortLattice,
    pub arena: SymbolArena,
    pub standard_vocabulary: Vocabulary,
    pub namespaces: NamespaceRegistry,
    /// User-declared vocabularies, indexed so that `VocabularyId(i)` for
    /// `i >= 1` is `vocabularies[i - 1]` — id 0 is reserved for
    /// [`Self::standard_vocabulary`].
    pub(crate) vocabularies: Vec<Vocabulary>,
    structures: Vec<Structure>,
    theories: Vec<Theory>,
    options: Options,
    options_stack: Vec<Options>,
    terminate_requested: bool,
    errors: Vec<Error>,
}

impl EngineState {
    pub fn new() -> Self {
        let mut lattice = SortLattice::new();
        let mut arena = SymbolArena::new();
        let standard_vocabulary = standard::build(&mut lattice, &mut arena);
        EngineState {
            factory: ElementFactory::new(-(1 << 20), 1 << 20),
            lattice,
            arena,
            standard_vocabulary,
            namespaces: NamespaceRegistry::new(),
            vocabularies: Vec::new(),
            structures: Vec::new(),
            theories: Vec::new(),
            options: Options::defaults(),
            options_stack: Vec::new(),
            terminate_requested: false,
            errors: Vec::new(),
        }
    }

    pub fn standard_vocabulary_id(&self) -> VocabularyId {
        STANDARD_VOCABULARY_ID
    }

    /// Allocates a fresh vocabulary, registers it and returns its id.
    pub fn new_vocabulary(&mut self, name: &str) -> VocabularyId {
        let id = VocabularyId(self.vocabularies.len() + 1);
        self.vocabularies.push(Vocabulary::new(id, name));
        id
    }

    pub fn vocabulary(&self, id: VocabularyId) -> &Vocabulary {
        if id == STANDARD_VOCABULARY_ID {
            &self.standard_vocabulary
        } else {
            &self.vocabularies[id.0 - 1]
        }
    }

    pub fn vocabulary_mut(&mut self, id: VocabularyId) -> &mut Vocabulary {
        if id == STANDARD_VOCABULARY_ID {
            &mut self.standard_vocabulary
        } else {
            &mut self.vocabularies[id.0 - 1]
        }
    }

    /// Splits off disjoint mutable borrows of the vocabulary named by `id`,
    /// the sort lattice and the symbol arena at once — the three pieces a
    /// declaration or a disambiguation needs simultaneously, which a
    /// single `&mut self` accessor cannot hand out piecemeal once it
    /// crosses a function boundary.
    pub(crate) fn vocabulary_env_mut(&mut self, id: VocabularyId) -> (&mut Vocabulary, &mut SortLattice, &mut SymbolArena) {
        let vocabulary = if id == STANDARD_VOCABULARY_ID {
            &mut self.standard_vocabulary
        } else {
            &mut self.vocabularies[id.0 - 1]
        };
        (vocabulary, &mut self.lattice, &mut self.arena)
    }

    pub fn new_theory(&mut self, vocabulary: VocabularyId) -> TheoryId {
        let id = TheoryId(self.theories.len());
        self.theories.push(Theory::new(vocabulary));
        id
    }

    pub fn theory(&self, id: TheoryId) -> &Theory {
        &self.theories[id.0]
    }

    pub fn theory_mut(&mut self, id: TheoryId) -> &mut Theory {
        &mut self.theories[id.0]
    }

    pub fn new_structure(&mut self, vocabulary: VocabularyId) -> StructureId {
        let id = StructureId(self.structures.len());
        self.structures.push(Structure::new(vocabulary));
        id
    }

    pub fn structure(&self, id: StructureId) -> &Structure {
        &self.structures[id.0]
    }

    pub fn structure_mut(&mut self, id: StructureId) -> &mut Structure {
        &mut self.structures[id.0]
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// Scoped option acquisition: installs `new_options`,
    /// returning a guard that restores the previous bag when dropped —
    /// on every exit path, including an early return from a `?` inside the
    /// scope, which is the guarantee the original's manual save/restore
    /// pairing could not make across exceptions.
    pub fn push_options(&mut self, new_options: Options) -> OptionsGuard<'_> {
        self.options_stack.push(std::mem::replace(&mut self.options, new_options));
        OptionsGuard { engine: self }
    }

    fn pop_options(&mut self) {
        self.options = self
            .options_stack
            .pop()
            .expect("pop_options called without a matching push_options");
    }

    pub fn request_terminate(&mut self) {
        self.terminate_requested = true;
    }

    pub fn terminate_requested(&self) -> bool {
        self.terminate_requested
    }

    /// Aggregates errors raised during a traversal.
    pub fn record_errors(&mut self, errors: impl IntoIterator<Item = Error>) {
        self.errors.extend(errors);
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn take_errors(&mut self) -> Vec<Error> {
        std::mem::take(&mut self.errors)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII handle returned by [`EngineState::push_options`]. Dropping it
/// restores the options bag that was active before the scope started.
pub struct OptionsGuard<'a> {
    engine: &'a mut EngineState,
}

impl OptionsGuard<'_> {
    pub fn engine(&self) -> &EngineState {
        self.engine
    }

    pub fn engine_mut(&mut self) -> &mut EngineState {
        self.engine
    }
}

impl Drop for OptionsGuard<'_> {
    fn drop(&mut self) {
        self.engine.pop_options();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_engine_carries_the_standard_vocabulary_and_default_options() {
        let engine = EngineState::new();
        assert!(engine.options().get_bool("autocomplete").unwrap());
        assert_eq!(engine.standard_vocabulary.name(), "std");
    }

    #[test]
    fn setting_an_option_to_the_wrong_kind_is_rejected() {
        let mut engine = EngineState::new();
        let result = engine
            .options_mut()
            .set("autocomplete", OptionValue::Int(1));
        assert!(matches!(result, Err(Error::WrongValue { .. })));
    }

    #[test]
    fn push_options_restores_the_previous_bag_on_drop() {
        let mut engine = EngineState::new();
        {
            let mut scoped = Options::defaults();
            scoped.set("autocomplete", OptionValue::Bool(false)).unwrap();
            let mut guard = engine.push_options(scoped);
            assert!(!guard.engine().options().get_bool("autocomplete").unwrap());
            guard.engine_mut().options_mut().set("longnames", OptionValue::Bool(true)).unwrap();
        }
        assert!(engine.options().get_bool("autocomplete").unwrap());
        assert!(!engine.options().get_bool("longnames").unwrap());
    }

    #[test]
    fn terminate_flag_is_advisory_and_sticky() {
        let mut engine = EngineState::new();
        assert!(!engine.terminate_requested());
        engine.request_terminate();
        assert!(engine.terminate_requested());
    }
}
