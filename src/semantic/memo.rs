//! Per-declaration fact memoization.
//!
//! Fact producers are partial (a declaration can legitimately yield no
//! fact) and mutually recursive, so each memo distinguishes three states
//! per key: absent, in progress, and done. Requesting a key that is in
//! progress is a cycle and surfaces as [`IndexError::MemoCycle`]. A
//! computation that produced nothing is erased rather than cached, so a
//! later attempt from a different path may retry.

use rustc_hash::FxHashMap;

use crate::ast::DeclId;
use crate::semantic::error::{IndexError, IndexResult};

#[derive(Debug)]
pub struct FactMemo<V> {
    tag: &'static str,
    // `None` marks a computation in progress.
    entries: FxHashMap<DeclId, Option<V>>,
}

pub enum Memoized<V> {
    Hit(V),
    /// Key is now marked in progress; the caller must call
    /// [`FactMemo::complete`] with the outcome.
    Miss,
}

impl<V: Clone> FactMemo<V> {
    pub fn new(tag: &'static str) -> Self {
        FactMemo {
            tag,
            entries: FxHashMap::default(),
        }
    }

    pub fn lookup(&mut self, key: DeclId) -> IndexResult<Memoized<V>> {
        match self.entries.get(&key) {
            Some(Some(value)) => Ok(Memoized::Hit(value.clone())),
            Some(None) => Err(IndexError::MemoCycle {
                tag: self.tag,
                decl: key,
            }),
            None => {
                self.entries.insert(key, None);
                Ok(Memoized::Miss)
            }
        }
    }

    /// Resolves a pending key. `Some` is cached; `None` removes the key.
    pub fn complete(&mut self, key: DeclId, value: Option<V>) -> Option<V> {
        match value {
            Some(value) => {
                self.entries.insert(key, Some(value.clone()));
                Some(value)
            }
            None => {
                self.entries.remove(&key);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caches_completed_values() {
        let mut memo: FactMemo<u32> = FactMemo::new("test");
        assert!(matches!(memo.lookup(DeclId(1)), Ok(Memoized::Miss)));
        assert_eq!(memo.complete(DeclId(1), Some(7)), Some(7));
        assert!(matches!(memo.lookup(DeclId(1)), Ok(Memoized::Hit(7))));
    }

    #[test]
    fn erases_empty_outcomes() {
        let mut memo: FactMemo<u32> = FactMemo::new("test");
        assert!(matches!(memo.lookup(DeclId(1)), Ok(Memoized::Miss)));
        assert_eq!(memo.complete(DeclId(1), None), None);
        // A later attempt is a fresh miss, not a cached absence.
        assert!(matches!(memo.lookup(DeclId(1)), Ok(Memoized::Miss)));
    }

    #[test]
    fn reentrant_lookup_is_a_cycle() {
        let mut memo: FactMemo<u32> = FactMemo::new("test");
        assert!(matches!(memo.lookup(DeclId(1)), Ok(Memoized::Miss)));
        assert!(matches!(
            memo.lookup(DeclId(1)),
            Err(IndexError::MemoCycle {
                tag: "test",
                decl: DeclId(1)
            })
        ));
    }
}
