// ── Generic reactive entity store ──
//
// Newest-first collection + selection + loading flag for one entity
// type, held inside a `watch` channel. Mutations go through
// `send_modify`/`send_if_modified`, so every observable change is pushed
// to subscribers and reads are cheap snapshot clones.
//
// Concurrency model is cooperative last-write-wins: mutations apply in
// completion order and an earlier conflicting write is silently
// replaced. There is no locking beyond the channel's own mutation
// exclusivity.

use std::sync::Arc;

use tokio::sync::watch;
use uuid::Uuid;

/// Entities a store can hold: anything with a stable id.
pub trait Keyed {
    fn key(&self) -> Uuid;
}

/// Point-in-time state of one [`EntityStore`].
#[derive(Debug, Clone)]
pub struct StoreState<T> {
    /// Newest-first; `replace_all` trusts the service's ordering and
    /// `upsert` prepends.
    pub items: Vec<Arc<T>>,
    pub selected: Option<Arc<T>>,
    /// UI hint only; carries no meaning for the data.
    pub loading: bool,
}

impl<T> Default for StoreState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            loading: false,
        }
    }
}

/// Reactive store for a single entity type.
pub struct EntityStore<T: Keyed + Clone + Send + Sync + 'static> {
    state: watch::Sender<StoreState<T>>,
}

impl<T: Keyed + Clone + Send + Sync + 'static> EntityStore<T> {
    pub fn new() -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self { state }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Replace the whole collection — used after a full reload.
    ///
    /// The selection survives only if its id is still present, and is
    /// re-pointed at the fresh row so stale field values can't linger.
    pub fn replace_all(&self, items: Vec<T>) {
        self.state.send_modify(|state| {
            state.items = items.into_iter().map(Arc::new).collect();
            state.selected = state
                .selected
                .take()
                .and_then(|old| state.items.iter().find(|i| i.key() == old.key()).cloned());
        });
    }

    /// Insert or update a single entity.
    ///
    /// An existing id is replaced in place (keeping its position); a new
    /// id is prepended, so the freshest entity is always at index 0.
    pub fn upsert(&self, item: T) {
        self.state.send_modify(|state| {
            let item = Arc::new(item);
            if let Some(slot) = state.items.iter_mut().find(|i| i.key() == item.key()) {
                *slot = Arc::clone(&item);
            } else {
                state.items.insert(0, Arc::clone(&item));
            }
            if state.selected.as_ref().is_some_and(|s| s.key() == item.key()) {
                state.selected = Some(item);
            }
        });
    }

    /// Shallow-merge a partial update onto the item with the given id.
    ///
    /// Strict no-op when no item matches: nothing changes and
    /// subscribers are not woken. Returns whether a row matched.
    pub fn patch(&self, id: Uuid, apply: impl FnOnce(&mut T)) -> bool {
        self.state.send_if_modified(|state| {
            let Some(slot) = state.items.iter_mut().find(|i| i.key() == id) else {
                return false;
            };
            apply(Arc::make_mut(slot));
            let patched = Arc::clone(slot);
            if state.selected.as_ref().is_some_and(|s| s.key() == id) {
                state.selected = Some(patched);
            }
            true
        })
    }

    /// Remove the item with the given id. No-op when absent.
    pub fn remove(&self, id: Uuid) -> Option<Arc<T>> {
        let mut removed = None;
        self.state.send_if_modified(|state| {
            let Some(pos) = state.items.iter().position(|i| i.key() == id) else {
                return false;
            };
            removed = Some(state.items.remove(pos));
            if state.selected.as_ref().is_some_and(|s| s.key() == id) {
                state.selected = None;
            }
            true
        });
        removed
    }

    /// Set or clear the selected entity.
    pub fn set_selected(&self, item: Option<T>) {
        self.state.send_modify(|state| {
            state.selected = item.map(Arc::new);
        });
    }

    /// Flip the loading hint. Data is untouched.
    pub fn set_loading(&self, loading: bool) {
        self.state.send_if_modified(|state| {
            if state.loading == loading {
                return false;
            }
            state.loading = loading;
            true
        });
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Current state (cheap clone of `Arc`ed contents).
    pub fn snapshot(&self) -> StoreState<T> {
        self.state.borrow().clone()
    }

    pub fn items(&self) -> Vec<Arc<T>> {
        self.state.borrow().items.clone()
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<T>> {
        self.state.borrow().items.iter().find(|i| i.key() == id).cloned()
    }

    pub fn selected(&self) -> Option<Arc<T>> {
        self.state.borrow().selected.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn len(&self) -> usize {
        self.state.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().items.is_empty()
    }

    /// Subscribe to state changes via a `watch::Receiver`.
    pub fn subscribe(&self) -> watch::Receiver<StoreState<T>> {
        self.state.subscribe()
    }
}

impl<T: Keyed + Clone + Send + Sync + 'static> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: Uuid,
        label: String,
    }

    impl Keyed for Item {
        fn key(&self) -> Uuid {
            self.id
        }
    }

    fn item(label: &str) -> Item {
        Item {
            id: Uuid::new_v4(),
            label: label.into(),
        }
    }

    #[test]
    fn upsert_prepends_new_items() {
        let store = EntityStore::new();
        store.upsert(item("first"));
        let second = item("second");
        store.upsert(second.clone());

        let items = store.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, second.id, "newest item must sit at index 0");
    }

    #[test]
    fn upsert_replaces_existing_id_in_place() {
        let store = EntityStore::new();
        let a = item("a");
        store.upsert(a.clone());
        store.upsert(item("b"));

        // Same id again: no duplicate, position kept
        store.upsert(Item {
            id: a.id,
            label: "a2".into(),
        });

        let items = store.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].id, a.id);
        assert_eq!(items[1].label, "a2");
    }

    #[test]
    fn patch_is_a_strict_noop_for_unknown_id() {
        let store = EntityStore::new();
        store.upsert(item("only"));
        let before = store.items();

        let mut rx = store.subscribe();
        rx.borrow_and_update();

        let matched = store.patch(Uuid::new_v4(), |i| i.label = "changed".into());

        assert!(!matched);
        assert!(!rx.has_changed().unwrap(), "no-op patch must not wake subscribers");
        let after = store.items();
        assert_eq!(before.len(), after.len());
        assert_eq!(before[0].label, after[0].label);
    }

    #[test]
    fn patch_merges_onto_matching_item() {
        let store = EntityStore::new();
        let target = item("old");
        store.upsert(target.clone());

        let matched = store.patch(target.id, |i| i.label = "new".into());

        assert!(matched);
        assert_eq!(store.get(target.id).unwrap().label, "new");
    }

    #[test]
    fn patch_refreshes_selection_pointing_at_same_id() {
        let store = EntityStore::new();
        let target = item("old");
        store.upsert(target.clone());
        store.set_selected(Some(target.clone()));

        store.patch(target.id, |i| i.label = "new".into());

        assert_eq!(store.selected().unwrap().label, "new");
    }

    #[test]
    fn replace_all_discards_previous_items() {
        let store = EntityStore::new();
        store.upsert(item("stale-1"));
        store.upsert(item("stale-2"));

        let fresh = vec![item("fresh")];
        store.replace_all(fresh.clone());

        let items = store.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "fresh");
    }

    #[test]
    fn replace_all_repoints_surviving_selection() {
        let store = EntityStore::new();
        let keep = item("v1");
        store.upsert(keep.clone());
        store.set_selected(Some(keep.clone()));

        store.replace_all(vec![Item {
            id: keep.id,
            label: "v2".into(),
        }]);

        assert_eq!(store.selected().unwrap().label, "v2");
    }

    #[test]
    fn replace_all_clears_dead_selection() {
        let store = EntityStore::new();
        let gone = item("gone");
        store.upsert(gone.clone());
        store.set_selected(Some(gone));

        store.replace_all(vec![item("other")]);

        assert!(store.selected().is_none());
    }

    #[test]
    fn set_loading_leaves_data_untouched() {
        let store = EntityStore::new();
        store.upsert(item("kept"));

        store.set_loading(true);

        assert!(store.is_loading());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_clears_matching_selection() {
        let store = EntityStore::new();
        let target = item("bye");
        store.upsert(target.clone());
        store.set_selected(Some(target.clone()));

        let removed = store.remove(target.id);

        assert_eq!(removed.unwrap().id, target.id);
        assert!(store.selected().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn subscribers_see_mutations() {
        let store = EntityStore::new();
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        store.upsert(item("x"));

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().items.len(), 1);
    }
}
