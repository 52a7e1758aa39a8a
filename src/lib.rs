//! A typed first-order logic core with inductive definitions, aggregates
//! and partial four-valued structures, layered as:
//!
//! - L0 [`element`] — the hash-consed domain-element factory.
//! - L1 [`vocabulary`] — sorts (with their lattice), predicate/function
//!   symbols, overload sets, the standard vocabulary.
//! - L2 [`syntax`] — terms, formulas, rules, theories, the visitor traits
//!   and sort derivation.
//! - L3 [`structure`] — four-valued interpretations of a vocabulary.
//! - glue [`namespace`], [`engine`], [`insert`] — scoped registries, the
//!   process-wide context and the Insert-style builder API a parser drives.
//!
//! [`convenience`] and [`formatting`] are cross-cutting: small shared
//! helpers, and a read-only pretty-printer over the L2 AST.

pub mod convenience;
pub mod element;
pub mod engine;
pub mod error;
pub mod formatting;
pub mod ids;
pub mod insert;
pub mod namespace;
pub mod structure;
pub mod syntax;
pub mod vocabulary;
