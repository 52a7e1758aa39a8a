//! Scoped registries and name resolution.
//!
//! A [`Namespace`] is a tree node holding four name tables (subspaces,
//! vocabularies, structures, theories), without mutual `Rc`/`shared_ptr`
//! ownership between parent and child. The [`NamespaceRegistry`] owns
//! the whole tree plus the using-stack that `open_block`/`close_block`
//! push and pop, and performs every scoped lookup.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::error::{Error, ErrorSink};
use crate::ids::{NamespaceId, StructureId, TheoryId, VocabularyId};

/// One node of the namespace tree. Four disjoint name tables — a name may
/// be a subspace in one table and a vocabulary in another without
/// collision, unlike a [`crate::vocabulary::Vocabulary`]'s three
/// namespaces which *do* collide.
#[derive(Debug)]
pub struct Namespace {
    id: NamespaceId,
    name: String,
    parent: Option<NamespaceId>,
    subspaces: IndexMap<String, NamespaceId>,
    vocabularies: IndexMap<String, VocabularyId>,
    structures: IndexMap<String, StructureId>,
    theories: IndexMap<String, TheoryId>,
}

impl Namespace {
    fn new(id: NamespaceId, name: &str, parent: Option<NamespaceId>) -> Self {
        Namespace {
            id,
            name: name.to_string(),
            parent,
            subspaces: IndexMap::new(),
            vocabularies: IndexMap::new(),
            structures: IndexMap::new(),
            theories: IndexMap::new(),
        }
    }

    pub fn id(&self) -> NamespaceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NamespaceId> {
        self.parent
    }
}

/// A scope pushed onto the using-stack by an `import`: either
/// a whole namespace (its subspaces/vocabularies/structures/theories become
/// visible unqualified) or a single vocabulary (its sorts/predicates/
/// functions become visible unqualified — consulted by
/// [`crate::vocabulary::Vocabulary`] lookups, not by this registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsingEntry {
    Namespace(NamespaceId),
    Vocabulary(VocabularyId),
}

/// Bookkeeping for one `open_block()`: whether it pushed a fresh child
/// namespace (so `close_block` must pop it) and how many using-stack
/// entries were imported inside it (so `close_block` drops exactly that
/// many).
struct BlockMark {
    pushed_namespace: bool,
    imports: usize,
}

/// Owns the whole namespace tree, the stack of currently open namespace
/// blocks (innermost = where new declarations land) and the using-stack of
/// imported scopes consulted (in addition to the open-block stack) during
/// unqualified name lookup.
pub struct NamespaceRegistry {
    namespaces: Vec<Namespace>,
    namespace_stack: Vec<NamespaceId>,
    using_stack: Vec<UsingEntry>,
    blocks: Vec<BlockMark>,
}

pub const ROOT_NAMESPACE_ID: NamespaceId = NamespaceId(0);

impl NamespaceRegistry {
    pub fn new() -> Self {
        let root = Namespace::new(ROOT_NAMESPACE_ID, "", None);
        NamespaceRegistry {
            namespaces: vec![root],
            namespace_stack: vec![ROOT_NAMESPACE_ID],
            using_stack: Vec::new(),
            blocks: Vec::new(),
        }
    }

    pub fn get(&self, id: NamespaceId) -> &Namespace {
        &self.namespaces[id.0]
    }

    /// The innermost namespace currently open — where a declaration lands.
    pub fn current(&self) -> NamespaceId {
        *self.namespace_stack.last().expect("root namespace is never popped")
    }

    /// Opens a new block. `name: Some(_)` creates (or, if it already
    /// exists, descends into) a child namespace of the current one and
    /// makes it current; `name: None` opens a transparent block (e.g. a
    /// `using`-only block) that does not itself become a new namespace.
    /// Returns the namespace that is current once the block is open.
    pub fn open_block(&mut self, sink: &mut ErrorSink, name: Option<&str>) -> NamespaceId {
        let pushed_namespace = match name {
            Some(name) => {
                let parent = self.current();
                let child = match self.namespaces[parent.0].subspaces.get(name) {
                    Some(&id) => id,
                    None => {
                        let id = NamespaceId(self.namespaces.len());
                        self.namespaces.push(Namespace::new(id, name, Some(parent)));
                        self.namespaces[parent.0]
                            .subspaces
                            .insert(name.to_string(), id);
                        id
                    }
                };
                self.namespace_stack.push(child);
                true
            }
            None => false,
        };
        self.blocks.push(BlockMark {
            pushed_namespace,
            imports: 0,
        });
        let _ = sink;
        self.current()
    }

    /// Closes the innermost open block: drops every using-stack entry
    /// imported inside it and, if the block introduced a namespace, pops
    /// it back off the namespace stack.
    pub fn close_block(&mut self) {
        let mark = self
            .blocks
            .pop()
            .expect("close_block called without a matching open_block");
        let new_len = self.using_stack.len() - mark.imports;
        self.using_stack.truncate(new_len);
        if mark.pushed_namespace {
            self.namespace_stack.pop();
        }
    }

    /// `import namespace/vocabulary`: pushes `entry` onto the using-stack
    /// inside the current block, so unqualified lookups also search it
    /// until the block closes.
    pub fn import_scope(&mut self, entry: UsingEntry) {
        self.using_stack.push(entry);
        if let Some(mark) = self.blocks.last_mut() {
            mark.imports += 1;
        }
    }

    fn declare<T: Copy>(
        &mut self,
        sink: &mut ErrorSink,
        table: impl Fn(&Namespace) -> &IndexMap<String, T>,
        table_mut: impl Fn(&mut Namespace) -> &mut IndexMap<String, T>,
        name: &str,
        id: T,
    ) -> Option<T> {
        let current = self.current();
        if table(&self.namespaces[current.0]).contains_key(name) {
            return sink.report(Error::MultiDecl { name: name.to_string() });
        }
        table_mut(&mut self.namespaces[current.0]).insert(name.to_string(), id);
        Some(id)
    }

    pub fn declare_vocabulary(&mut self, sink: &mut ErrorSink, name: &str, id: VocabularyId) -> Option<VocabularyId> {
        self.declare(sink, |ns| &ns.vocabularies, |ns| &mut ns.vocabularies, name, id)
    }

    pub fn declare_structure(&mut self, sink: &mut ErrorSink, name: &str, id: StructureId) -> Option<StructureId> {
        self.declare(sink, |ns| &ns.structures, |ns| &mut ns.structures, name, id)
    }

    pub fn declare_theory(&mut self, sink: &mut ErrorSink, name: &str, id: TheoryId) -> Option<TheoryId> {
        self.declare(sink, |ns| &ns.theories, |ns| &mut ns.theories, name, id)
    }

    /// Every namespace currently "in scope": the open-block stack
    /// (innermost first) plus any namespace pushed by an `import`.
    fn scopes(&self) -> Vec<NamespaceId> {
        let mut scopes: Vec<NamespaceId> = self.namespace_stack.iter().rev().copied().collect();
        for entry in self.using_stack.iter().rev() {
            if let UsingEntry::Namespace(id) = entry {
                scopes.push(*id);
            }
        }
        scopes
    }

    /// Unqualified lookup of `name` across every in-scope namespace,
    /// reporting [`Error::MultiDecl`] if two distinct ids are found.
    fn lookup<T: Copy + std::fmt::Debug>(
        &self,
        table: impl Fn(&Namespace) -> &IndexMap<String, T>,
        name: &str,
    ) -> Result<Option<T>, Error> {
        let mut result = None;
        let mut distinct: BTreeSet<String> = BTreeSet::new();
        for scope in self.scopes() {
            if let Some(&id) = table(&self.namespaces[scope.0]).get(name) {
                result = Some(id);
                distinct.insert(format!("{id:?}"));
            }
        }
        if distinct.len() > 1 {
            return Err(Error::MultiDecl { name: name.to_string() });
        }
        Ok(result)
    }

    pub fn resolve_namespace(&self, name: &str) -> Result<Option<NamespaceId>, Error> {
        self.lookup(|ns| &ns.subspaces, name)
    }

    pub fn resolve_vocabulary(&self, name: &str) -> Result<Option<VocabularyId>, Error> {
        self.lookup(|ns| &ns.vocabularies, name)
    }

    pub fn resolve_structure(&self, name: &str) -> Result<Option<StructureId>, Error> {
        self.lookup(|ns| &ns.structures, name)
    }

    pub fn resolve_theory(&self, name: &str) -> Result<Option<TheoryId>, Error> {
        self.lookup(|ns| &ns.theories, name)
    }

    /// Multi-segment name resolution: `path[0]` resolves unqualified in
    /// the current scope, then each following segment descends one
    /// subspace at a time.
    pub fn resolve_path(&self, path: &[&str]) -> Result<Option<NamespaceId>, Error> {
        let Some((first, rest)) = path.split_first() else {
            return Ok(Some(self.current()));
        };
        let Some(mut current) = self.resolve_namespace(first)? else {
            return Ok(None);
        };
        for segment in rest {
            match self.namespaces[current.0].subspaces.get(*segment) {
                Some(&id) => current = id,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// Resolves a (possibly multi-segment) vocabulary name: every segment
    /// but the last descends through subspaces; the last segment is
    /// looked up in the resulting namespace's vocabulary table (or, for a
    /// single-segment name, in the full in-scope lookup of
    /// [`Self::resolve_vocabulary`]).
    pub fn resolve_vocabulary_path(&self, path: &[&str]) -> Result<Option<VocabularyId>, Error> {
        let Some((last, prefix)) = path.split_last() else {
            return Ok(None);
        };
        if prefix.is_empty() {
            return self.resolve_vocabulary(last);
        }
        let Some(ns) = self.resolve_path(prefix)? else {
            return Ok(None);
        };
        Ok(self.namespaces[ns.0].vocabularies.get(*last).copied())
    }
}

impl Default for NamespaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaring_a_vocabulary_twice_in_the_same_block_is_multidecl() {
        let mut reg = NamespaceRegistry::new();
        let mut sink = ErrorSink::new();
        reg.declare_vocabulary(&mut sink, "V", VocabularyId(0)).unwrap();
        let second = reg.declare_vocabulary(&mut sink, "V", VocabularyId(1));
        assert!(second.is_none());
        assert_eq!(sink.count(), 1);
    }

    #[test]
    fn open_block_with_a_name_creates_a_nested_namespace_and_close_block_restores_scope() {
        let mut reg = NamespaceRegistry::new();
        let mut sink = ErrorSink::new();
        let root = reg.current();
        let inner = reg.open_block(&mut sink, Some("inner"));
        assert_ne!(root, inner);
        reg.declare_vocabulary(&mut sink, "V", VocabularyId(0)).unwrap();
        reg.close_block();
        assert_eq!(reg.current(), root);
        // V was declared inside "inner", not visible unqualified from root.
        assert_eq!(reg.resolve_vocabulary("V").unwrap(), None);
    }

    #[test]
    fn import_makes_a_namespaces_vocabularies_visible_until_the_block_closes() {
        let mut reg = NamespaceRegistry::new();
        let mut sink = ErrorSink::new();
        let inner = reg.open_block(&mut sink, Some("inner"));
        reg.declare_vocabulary(&mut sink, "V", VocabularyId(7)).unwrap();
        reg.close_block();

        reg.open_block(&mut sink, None);
        reg.import_scope(UsingEntry::Namespace(inner));
        assert_eq!(reg.resolve_vocabulary("V").unwrap(), Some(VocabularyId(7)));
        reg.close_block();
        assert_eq!(reg.resolve_vocabulary("V").unwrap(), None);
    }

    #[test]
    fn multi_segment_path_descends_through_subspaces() {
        let mut reg = NamespaceRegistry::new();
        let mut sink = ErrorSink::new();
        reg.open_block(&mut sink, Some("A"));
        let b = reg.open_block(&mut sink, Some("B"));
        reg.declare_vocabulary(&mut sink, "V", VocabularyId(3)).unwrap();
        reg.close_block();
        reg.close_block();

        assert_eq!(reg.resolve_path(&["A", "B"]).unwrap(), Some(b));
        assert_eq!(
            reg.resolve_vocabulary_path(&["A", "B", "V"]).unwrap(),
            Some(VocabularyId(3))
        );
    }
}
