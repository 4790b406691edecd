//! Where produced facts go.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::core::Span;
use crate::facts::payload::{FactPayload, FactRef, XRefTarget};

/// Output surface of the indexer.
///
/// `intern_fact` is idempotent: interning an identical payload again must
/// return the previously issued handle.
pub trait FactSink {
    fn intern_fact(&mut self, payload: FactPayload) -> FactRef;

    /// Records a cross-reference from a source range to a (possibly
    /// wrapped) target.
    fn record_xref(&mut self, range: Span, target: XRefTarget);

    /// Links two declaration facts describing the same entity. Duplicate
    /// pairs are dropped.
    fn record_same_as(&mut self, decl: FactRef, same_as: FactRef);
}

/// Fact store backed by insertion-ordered maps, for tests and batch
/// consumers.
#[derive(Debug, Default)]
pub struct MemoryGraph {
    facts: IndexMap<FactPayload, ()>,
    xrefs: Vec<(Span, XRefTarget)>,
    same_as: Vec<(FactRef, FactRef)>,
    seen_links: FxHashSet<(FactRef, FactRef)>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// The payload behind a handle, `None` for a handle this graph never
    /// issued.
    pub fn fact(&self, fact: FactRef) -> Option<&FactPayload> {
        self.facts.get_index(fact.index()).map(|(payload, _)| payload)
    }

    /// Looks a payload up without interning it.
    pub fn find(&self, payload: &FactPayload) -> Option<FactRef> {
        self.facts.get_index_of(payload).map(|i| FactRef(i as u32))
    }

    pub fn facts(&self) -> impl Iterator<Item = (FactRef, &FactPayload)> {
        self.facts
            .keys()
            .enumerate()
            .map(|(i, p)| (FactRef(i as u32), p))
    }

    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }

    pub fn xrefs(&self) -> &[(Span, XRefTarget)] {
        &self.xrefs
    }

    pub fn same_as(&self) -> &[(FactRef, FactRef)] {
        &self.same_as
    }
}

impl FactSink for MemoryGraph {
    fn intern_fact(&mut self, payload: FactPayload) -> FactRef {
        let (index, _) = self.facts.insert_full(payload, ());
        FactRef(index as u32)
    }

    fn record_xref(&mut self, range: Span, target: XRefTarget) {
        self.xrefs.push((range, target));
    }

    fn record_same_as(&mut self, decl: FactRef, same_as: FactRef) {
        if self.seen_links.insert((decl, same_as)) {
            self.same_as.push((decl, same_as));
        }
    }
}
