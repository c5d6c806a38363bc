use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Keyed coalescing of bursty updates.
///
/// Scheduling a key that is already pending replaces its value and pushes its
/// deadline out. The caller supplies the clock on every call.
#[derive(Debug, Clone)]
pub struct Debouncer<K: Ord + Clone, V> {
    window: Duration,
    pending: BTreeMap<K, (Instant, V)>,
}

impl<K: Ord + Clone, V> Debouncer<K, V> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: BTreeMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn schedule(&mut self, key: K, value: V, now: Instant) {
        self.pending.insert(key, (now + self.window, value));
    }

    /// Drop a pending update, returning its value
    pub fn cancel(&mut self, key: &K) -> Option<V> {
        self.pending.remove(key).map(|(_, value)| value)
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest deadline among pending keys
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|(deadline, _)| *deadline).min()
    }

    /// Remove and return every entry whose deadline has passed, in key order
    pub fn drain_due(&mut self, now: Instant) -> Vec<(K, V)> {
        let due: Vec<K> = self
            .pending
            .iter()
            .filter(|(_, (deadline, _))| *deadline <= now)
            .map(|(key, _)| key.clone())
            .collect();
        due.into_iter()
            .filter_map(|key| {
                let (_, value) = self.pending.remove(&key)?;
                Some((key, value))
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const WINDOW: Duration = Duration::from_millis(50);

    #[test]
    fn test_nothing_due_before_window() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.schedule("a", 1, start);

        assert!(debouncer.drain_due(start + Duration::from_millis(49)).is_empty());
        assert_eq!(debouncer.drain_due(start + WINDOW), vec![("a", 1)]);
        assert!(debouncer.is_empty());
    }

    #[test]
    fn test_reschedule_replaces_value_and_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.schedule("a", 1, start);
        debouncer.schedule("a", 2, start + Duration::from_millis(30));

        assert!(debouncer.drain_due(start + WINDOW).is_empty());
        assert_eq!(
            debouncer.drain_due(start + Duration::from_millis(80)),
            vec![("a", 2)]
        );
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.schedule("a", 1, start);
        debouncer.schedule("b", 2, start);

        assert_eq!(debouncer.cancel(&"a"), Some(1));
        assert!(!debouncer.is_pending(&"a"));
        assert_eq!(debouncer.drain_due(start + WINDOW), vec![("b", 2)]);
    }

    #[test]
    fn test_next_deadline_is_earliest() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        assert_eq!(debouncer.next_deadline(), None);

        debouncer.schedule("late", 1, start + Duration::from_millis(10));
        debouncer.schedule("early", 2, start);
        assert_eq!(debouncer.next_deadline(), Some(start + WINDOW));
    }
}
