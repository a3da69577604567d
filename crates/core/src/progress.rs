//! Progress reporting toward the caller's UI.

/// Percentage sink handed in by the caller.
///
/// Long operations report after each page or batch. The reported string
/// is monotonically non-decreasing and capped at `"100%"` no matter how
/// the underlying counters move (retries, uneven batch sizes); nothing
/// is persisted.
pub struct Progress {
    sink: Box<dyn FnMut(&str)>,
    last: u8,
}

impl Progress {
    pub fn new(sink: impl FnMut(&str) + 'static) -> Self {
        Self { sink: Box::new(sink), last: 0 }
    }

    /// A sink that discards every report.
    pub fn ignore() -> Self {
        Self::new(|_| {})
    }

    /// Report `done` of `total` units. No-op when `total` is zero or the
    /// resulting percentage would move backwards.
    pub fn update(&mut self, done: usize, total: usize) {
        if total == 0 {
            return;
        }
        let pct = ((done.min(total) * 100) / total) as u8;
        if pct < self.last {
            return;
        }
        self.last = pct;
        (self.sink)(&format!("{pct}%"));
    }

    /// Report completion.
    pub fn finish(&mut self) {
        self.update(1, 1);
    }
}
