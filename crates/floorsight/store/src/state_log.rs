//! Bounded machine-state history per entity
//!
//! State transitions feed the availability factor of OEE: occupancy
//! is the fraction of logged time spent in `Run`. The log uses the
//! same discipline as the sample rings: timestamp-ordered, bounded,
//! oldest entry dropped at capacity.

use std::collections::VecDeque;

use floorsight_types::MachineState;

/// One logged state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateEntry {
    pub timestamp_ms: u64,
    pub state: MachineState,
}

/// Bounded, timestamp-ordered machine-state history.
#[derive(Debug, Clone)]
pub struct StateLog {
    entries: VecDeque<StateEntry>,
    capacity: usize,
}

impl StateLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
        }
    }

    /// Append a transition; stale timestamps are rejected with the
    /// newest accepted timestamp, mirroring the sample rings.
    pub fn push(&mut self, timestamp_ms: u64, state: MachineState) -> Result<(), u64> {
        if let Some(newest) = self.entries.back() {
            if timestamp_ms < newest.timestamp_ms {
                return Err(newest.timestamp_ms);
            }
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(StateEntry {
            timestamp_ms,
            state,
        });
        Ok(())
    }

    /// Current state, if any transition was logged.
    pub fn current(&self) -> Option<MachineState> {
        self.entries.back().map(|e| e.state)
    }

    /// Full history copy, oldest first.
    pub fn entries(&self) -> Vec<StateEntry> {
        self.entries.iter().copied().collect()
    }

    /// Fraction of logged wall time spent in `Run`, in [0, 1].
    ///
    /// Each entry's state is held until the next transition; the last
    /// entry contributes no duration. `None` until two transitions
    /// exist, since a single entry spans no time.
    pub fn run_occupancy(&self) -> Option<f64> {
        if self.entries.len() < 2 {
            return None;
        }
        let mut total = 0u64;
        let mut running = 0u64;
        for pair in self.entries.iter().zip(self.entries.iter().skip(1)) {
            let (current, next) = pair;
            let held = next.timestamp_ms.saturating_sub(current.timestamp_ms);
            total += held;
            if current.state == MachineState::Run {
                running += held;
            }
        }
        if total == 0 {
            return None;
        }
        Some(running as f64 / total as f64)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupancy_needs_two_entries() {
        let mut log = StateLog::new(8);
        assert_eq!(log.run_occupancy(), None);
        log.push(0, MachineState::Run).unwrap();
        assert_eq!(log.run_occupancy(), None);
    }

    #[test]
    fn occupancy_counts_run_time() {
        let mut log = StateLog::new(8);
        log.push(0, MachineState::Run).unwrap();
        log.push(600, MachineState::Idle).unwrap();
        log.push(1000, MachineState::Run).unwrap();
        // Run held 0..600 out of 0..1000 logged.
        let occ = log.run_occupancy().unwrap();
        assert!((occ - 0.6).abs() < 1e-9);
    }

    #[test]
    fn stale_transition_rejected() {
        let mut log = StateLog::new(8);
        log.push(100, MachineState::Run).unwrap();
        assert_eq!(log.push(50, MachineState::Alarm), Err(100));
        assert_eq!(log.current(), Some(MachineState::Run));
    }

    #[test]
    fn capacity_drops_oldest() {
        let mut log = StateLog::new(2);
        log.push(0, MachineState::Run).unwrap();
        log.push(10, MachineState::Idle).unwrap();
        log.push(20, MachineState::Alarm).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].state, MachineState::Idle);
        assert_eq!(log.current(), Some(MachineState::Alarm));
    }
}
