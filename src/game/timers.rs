use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerKind {
    Tick,
    ReverseCountdown,
    ActivateBlocker,
    ExpireBlocker,
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    kind: TimerKind,
    due: u64,
    period: Option<u64>,
    seq: u64,
}

/// Deferred timers on a virtual millisecond clock. At most one timer per
/// kind; scheduling a kind again replaces the earlier one.
#[derive(Debug, Default)]
pub struct Timers {
    entries: Vec<Timer>,
    next_seq: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_once(&mut self, kind: TimerKind, due: u64) {
        self.insert(kind, due, None);
    }

    pub fn schedule_every(&mut self, kind: TimerKind, first_due: u64, period: u64) {
        self.insert(kind, first_due, Some(period.max(1)));
    }

    fn insert(&mut self, kind: TimerKind, due: u64, period: Option<u64>) {
        self.cancel(kind);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Timer {
            kind,
            due,
            period,
            seq,
        });
    }

    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        let before = self.entries.len();
        self.entries.retain(|timer| timer.kind != kind);
        self.entries.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    pub fn next_due(&self) -> Option<u64> {
        self.entries.iter().map(|timer| timer.due).min()
    }

    /// Removes the earliest timer due at or before `now` and returns its kind
    /// and deadline. Repeating timers are re-armed one period later.
    pub fn pop_due(&mut self, now: u64) -> Option<(TimerKind, u64)> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= now)
            .min_by_key(|(_, timer)| (timer.due, timer.seq))
            .map(|(index, _)| index)?;

        let timer = self.entries[index];
        match timer.period {
            Some(period) => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.entries[index].due = timer.due + period;
                self.entries[index].seq = seq;
            }
            None => {
                self.entries.swap_remove(index);
            }
        }
        Some((timer.kind, timer.due))
    }
}

#[cfg(test)]
impl Timers {
    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.entries.iter().any(|timer| timer.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
