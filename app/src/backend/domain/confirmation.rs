//! Two-step confirmation for destructive ledger actions.
//!
//! Deleting a transaction or clearing the ledger is first requested, which
//! only records the intent, and then either confirmed (the mutation runs) or
//! cancelled (nothing changes). Either way the flow returns to idle.

use shared::PendingAction;
use tracing::info;

use super::ledger_service::LedgerStore;

#[derive(Debug, Clone, Default)]
pub struct ConfirmationFlow {
    pending: PendingAction,
}

impl ConfirmationFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &PendingAction {
        &self.pending
    }

    pub fn is_idle(&self) -> bool {
        self.pending == PendingAction::None
    }

    /// Ask to delete one transaction. Replaces any earlier pending request.
    pub fn request_delete(&mut self, id: impl Into<String>) -> &PendingAction {
        self.pending = PendingAction::Delete(id.into());
        &self.pending
    }

    /// Ask to clear the whole ledger. Replaces any earlier pending request.
    pub fn request_clear(&mut self) -> &PendingAction {
        self.pending = PendingAction::ClearAll;
        &self.pending
    }

    /// Drop the pending request without touching the ledger
    pub fn cancel(&mut self) -> PendingAction {
        let cancelled = std::mem::take(&mut self.pending);
        if cancelled != PendingAction::None {
            info!("Cancelled pending action {:?}", cancelled);
        }
        cancelled
    }

    /// Apply the pending request to the ledger and return what was applied.
    /// Confirming while idle does nothing.
    pub fn confirm(&mut self, store: &mut LedgerStore) -> PendingAction {
        let action = std::mem::take(&mut self.pending);
        match &action {
            PendingAction::None => {}
            PendingAction::Delete(id) => {
                store.remove(id);
            }
            PendingAction::ClearAll => {
                store.clear();
            }
        }
        action
    }

    /// Prompt the UI shows while a request waits for confirmation
    pub fn prompt(&self) -> Option<String> {
        match &self.pending {
            PendingAction::None => None,
            PendingAction::Delete(_) => Some("确定要删除这条记录吗？".to_string()),
            PendingAction::ClearAll => Some("确定要清空所有记录吗？此操作无法撤销。".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::{LedgerRepository, MemoryStorage};
    use shared::Transaction;
    use std::sync::Arc;

    fn store_with_two() -> LedgerStore {
        let mut store = LedgerStore::load(LedgerRepository::new(Arc::new(MemoryStorage::new())));
        for id in ["a", "b"] {
            store.add(Transaction {
                id: id.to_string(),
                country: None,
                customer_name: "客户".to_string(),
                item_name: "商品".to_string(),
                quantity: 1,
                cost_foreign: 100.0,
                exchange_rate: 0.2,
                selling_exchange_rate: None,
                price_sold: 30.0,
                date: "2024-05-01".to_string(),
            });
        }
        store
    }

    #[test]
    fn test_cancel_leaves_ledger_untouched() {
        let mut store = store_with_two();
        let mut flow = ConfirmationFlow::new();

        flow.request_delete("a");
        assert!(!flow.is_idle());
        assert!(flow.prompt().is_some());

        assert_eq!(flow.cancel(), PendingAction::Delete("a".to_string()));
        assert!(flow.is_idle());
        assert_eq!(flow.confirm(&mut store), PendingAction::None);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_confirm_delete() {
        let mut store = store_with_two();
        let mut flow = ConfirmationFlow::new();

        flow.request_delete("b");
        assert_eq!(flow.confirm(&mut store), PendingAction::Delete("b".to_string()));
        assert!(flow.is_idle());
        assert!(store.get("b").is_none());
        assert!(store.get("a").is_some());
    }

    #[test]
    fn test_confirm_clear() {
        let mut store = store_with_two();
        let mut flow = ConfirmationFlow::new();

        flow.request_clear();
        assert_eq!(flow.confirm(&mut store), PendingAction::ClearAll);
        assert!(store.is_empty());
    }

    #[test]
    fn test_new_request_replaces_pending() {
        let mut store = store_with_two();
        let mut flow = ConfirmationFlow::new();

        flow.request_clear();
        flow.request_delete("a");
        flow.confirm(&mut store);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_confirm_missing_id_is_noop() {
        let mut store = store_with_two();
        let mut flow = ConfirmationFlow::new();

        flow.request_delete("zzz");
        flow.confirm(&mut store);
        assert_eq!(store.len(), 2);
        assert!(flow.is_idle());
    }
}
