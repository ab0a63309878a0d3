//! Deterministic timer queue
//!
//! Delayed work (the celebration hold and fade) is queued here instead of
//! being handed straight to `setTimeout`. The host only has to call
//! `Flow::tick` at or after `next_deadline()`; tests drive time by hand.

/// Handle for a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
struct Scheduled<T> {
    id: TaskId,
    due_ms: f64,
    task: T,
}

/// Queue of tasks keyed by due time (ms). Ties run in scheduling order.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    pending: Vec<Scheduled<T>>,
    next_id: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 1,
        }
    }

    /// Queue `task` to run at `due_ms`
    pub fn schedule(&mut self, due_ms: f64, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled { id, due_ms, task });
        id
    }

    /// Drop a pending task. Returns false if it already ran or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.id != id);
        self.pending.len() != before
    }

    /// Drop every pending task, returning how many were dropped
    pub fn cancel_all(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }

    /// Earliest due time among pending tasks
    pub fn next_deadline(&self) -> Option<f64> {
        self.pending.iter().map(|s| s.due_ms).reduce(f64::min)
    }

    /// Remove and return the earliest task due at or before `now_ms`,
    /// together with its due time
    pub fn pop_due(&mut self, now_ms: f64) -> Option<(f64, T)> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due_ms <= now_ms)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.id.cmp(&b.id)))
            .map(|(i, _)| i)?;
        let s = self.pending.remove(idx);
        Some((s.due_ms, s.task))
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.pending.iter().any(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_due_in_time_order() {
        let mut s = Scheduler::new();
        s.schedule(300.0, "c");
        s.schedule(100.0, "a");
        s.schedule(200.0, "b");

        assert_eq!(s.next_deadline(), Some(100.0));
        assert_eq!(s.pop_due(50.0), None);
        assert_eq!(s.pop_due(250.0), Some((100.0, "a")));
        assert_eq!(s.pop_due(250.0), Some((200.0, "b")));
        assert_eq!(s.pop_due(250.0), None);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_ties_run_in_schedule_order() {
        let mut s = Scheduler::new();
        s.schedule(100.0, 1);
        s.schedule(100.0, 2);
        s.schedule(100.0, 3);
        let order: Vec<_> = std::iter::from_fn(|| s.pop_due(100.0).map(|(_, t)| t)).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_cancel() {
        let mut s = Scheduler::new();
        let a = s.schedule(100.0, "a");
        let b = s.schedule(200.0, "b");
        assert!(s.cancel(a));
        assert!(!s.cancel(a));
        assert!(!s.is_pending(a));
        assert!(s.is_pending(b));
        assert_eq!(s.next_deadline(), Some(200.0));
        assert_eq!(s.cancel_all(), 1);
        assert!(s.is_empty());
        assert_eq!(s.next_deadline(), None);
    }
}
