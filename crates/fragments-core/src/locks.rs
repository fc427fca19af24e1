use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use fragments_types::{FragmentId, OwnerId};
use tokio::sync::OwnedMutexGuard;

type Key = (OwnerId, FragmentId);

/// Registry of per-fragment async locks.
///
/// Entries are held weakly; a key's lock lives only while someone holds or
/// awaits it. Dead entries are swept once the map grows past `sweep_at`.
#[derive(Debug)]
pub(crate) struct KeyLocks {
    inner: Mutex<Registry>,
}

#[derive(Debug)]
struct Registry {
    locks: HashMap<Key, Weak<tokio::sync::Mutex<()>>>,
    sweep_at: usize,
}

const INITIAL_SWEEP_AT: usize = 64;

impl Default for KeyLocks {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Registry {
                locks: HashMap::new(),
                sweep_at: INITIAL_SWEEP_AT,
            }),
        }
    }
}

impl KeyLocks {
    /// Wait for exclusive access to one fragment key.
    pub(crate) async fn lock(&self, owner: &OwnerId, id: &FragmentId) -> OwnedMutexGuard<()> {
        let mutex = {
            // The registry is never left half-updated, so a poisoned guard is
            // still usable.
            let mut registry = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            registry.handle(owner, id)
        };
        mutex.lock_owned().await
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .locks
            .len()
    }
}

impl Registry {
    fn handle(&mut self, owner: &OwnerId, id: &FragmentId) -> Arc<tokio::sync::Mutex<()>> {
        let key = (owner.clone(), id.clone());
        if let Some(existing) = self.locks.get(&key).and_then(Weak::upgrade) {
            return existing;
        }
        if self.locks.len() >= self.sweep_at {
            self.locks.retain(|_, lock| lock.strong_count() > 0);
            self.sweep_at = (self.locks.len() * 2).max(INITIAL_SWEEP_AT);
        }
        let fresh = Arc::new(tokio::sync::Mutex::new(()));
        self.locks.insert(key, Arc::downgrade(&fresh));
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn key(n: usize) -> (OwnerId, FragmentId) {
        (
            OwnerId::new("u").unwrap(),
            FragmentId::parse(format!("f{n}")).unwrap(),
        )
    }

    #[tokio::test]
    async fn same_key_is_exclusive() {
        let locks = Arc::new(KeyLocks::default());
        let (owner, id) = key(0);
        let guard = locks.lock(&owner, &id).await;

        let contender = {
            let locks = Arc::clone(&locks);
            let (owner, id) = (owner.clone(), id.clone());
            tokio::spawn(async move {
                let _guard = locks.lock(&owner, &id).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn different_keys_do_not_block() {
        let locks = KeyLocks::default();
        let (owner, a) = key(1);
        let (_, b) = key(2);
        let _a = locks.lock(&owner, &a).await;
        let _b = locks.lock(&owner, &b).await;
    }

    #[tokio::test]
    async fn released_locks_are_swept() {
        let locks = KeyLocks::default();
        for n in 0..(INITIAL_SWEEP_AT * 3) {
            let (owner, id) = key(n);
            drop(locks.lock(&owner, &id).await);
        }
        assert!(locks.tracked() <= INITIAL_SWEEP_AT + 1);
    }
}
