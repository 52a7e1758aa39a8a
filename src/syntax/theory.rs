//! A theory: a vocabulary's sentences and definitions.

use crate::ids::VocabularyId;
use crate::syntax::formula::Formula;
use crate::syntax::rule::Definition;

#[derive(Clone, Debug, Default)]
pub struct Theory {
    pub vocabulary: Option<VocabularyId>,
    pub sentences: Vec<Formula>,
    pub definitions: Vec<Definition>,
}

impl Theory {
    pub fn new(vocabulary: VocabularyId) -> Self {
        Theory {
            vocabulary: Some(vocabulary),
            sentences: Vec::new(),
            definitions: Vec::new(),
        }
    }

    pub fn add_sentence(&mut self, formula: Formula) {
        self.sentences.push(formula);
    }

    pub fn add_definition(&mut self, definition: Definition) {
        self.definitions.push(definition);
    }
}
