use crate::upstream::{BlockingStatus, DomainRule};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

/// In-memory view of the appliance shared by the API handlers.
///
/// The rule index is only ever replaced wholesale by a list fetch, and read
/// to resolve the short id the browser holds back to a full pattern.
#[derive(Debug, Clone, Default)]
pub struct ProxyStore {
    // Ordered by id so "first N" matches the key order the browser sees.
    rules: Arc<RwLock<BTreeMap<i64, DomainRule>>>,
    blocking: Arc<RwLock<BlockingStatus>>,
}

impl ProxyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in a freshly fetched rule set. Later duplicates of an id win.
    pub fn replace_rules(&self, rules: Vec<DomainRule>) {
        let index: BTreeMap<i64, DomainRule> = rules.into_iter().map(|r| (r.id, r)).collect();
        let mut guard = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        *guard = index;
    }

    pub fn rule(&self, id: i64) -> Option<DomainRule> {
        let guard = self.rules.read().unwrap_or_else(PoisonError::into_inner);
        guard.get(&id).cloned()
    }

    /// The `n` lowest-id rules of the current index.
    pub fn first_rules(&self, n: usize) -> BTreeMap<i64, DomainRule> {
        let guard = self.rules.read().unwrap_or_else(PoisonError::into_inner);
        guard
            .iter()
            .take(n)
            .map(|(id, rule)| (*id, rule.clone()))
            .collect()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn blocking_status(&self) -> BlockingStatus {
        *self.blocking.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_blocking_status(&self, status: BlockingStatus) {
        let mut guard = self.blocking.write().unwrap_or_else(PoisonError::into_inner);
        *guard = status;
    }
}
