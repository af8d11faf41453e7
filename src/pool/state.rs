/// What a worker does after a session completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    Continue,
    Done,
}

/// Session accounting shared by every worker of a pool.
///
/// A worker keeps going while `completed < target - active`, evaluated after
/// its own completion has been booked. Sessions already in flight count
/// against the target, so the number of sessions actually finished may fall
/// short of `target` by up to the number of workers, and never exceeds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPoolState {
    active: u64,
    completed: u64,
    target: u64,
}

impl WorkerPoolState {
    /// State right after `workers` workers each started their first session.
    #[must_use]
    pub const fn started(workers: u64, target: u64) -> Self {
        Self {
            active: workers,
            completed: 0,
            target,
        }
    }

    /// Books one finished session and decides whether its worker goes on.
    pub const fn complete_session(&mut self) -> NextStep {
        self.active = self.active.saturating_sub(1);
        self.completed = self.completed.saturating_add(1);
        if self.completed < self.target.saturating_sub(self.active) {
            self.active = self.active.saturating_add(1);
            NextStep::Continue
        } else {
            NextStep::Done
        }
    }

    #[must_use]
    pub const fn active(&self) -> u64 {
        self.active
    }

    #[must_use]
    pub const fn completed(&self) -> u64 {
        self.completed
    }

    #[must_use]
    pub const fn target(&self) -> u64 {
        self.target
    }
}
