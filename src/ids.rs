//! Stable arena indices.
//!
//! Sorts, symbols and variables refer to each other, and a naive Rust
//! translation of the mutually-referential C++ object graph would need
//! `Rc<RefCell<_>>` cycles. Instead every cross-reference is a small
//! `Copy` index into an arena (see `vocabulary::sort::SortLattice`,
//! `vocabulary::symbol::SymbolTable`), per Design Notes §9.

use derive_more::{Display, From};

#[derive(Clone, Copy, Debug, Display, From, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortId(pub usize);

#[derive(Clone, Copy, Debug, Display, From, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PredicateId(pub usize);

#[derive(Clone, Copy, Debug, Display, From, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FunctionId(pub usize);

#[derive(Clone, Copy, Debug, Display, From, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VocabularyId(pub usize);

#[derive(Clone, Copy, Debug, Display, From, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub usize);

#[derive(Clone, Copy, Debug, Display, From, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TheoryId(pub usize);

#[derive(Clone, Copy, Debug, Display, From, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StructureId(pub usize);

#[derive(Clone, Copy, Debug, Display, From, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NamespaceId(pub usize);
