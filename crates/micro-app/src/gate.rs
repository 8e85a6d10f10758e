//! The mount gate: an application mounts once all load signals arrived.

use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter};

/// Completion notices that together allow an application to mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCountMacro)]
#[strum(serialize_all = "lowercase")]
pub enum LoadSignal {
    /// The HTML was parsed and its sources extracted.
    Parsed,
    /// Every stylesheet was fetched and injected.
    Stylesheets,
    /// Every script's text is known.
    Scripts,
}

/// Counts distinct [`LoadSignal`]s and fires exactly once when all of them
/// have been received.
#[derive(Debug, Clone, Default)]
pub struct MountGate {
    received: Vec<LoadSignal>,
    fired: bool,
}

/// Result of delivering a signal to a [`MountGate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// This signal completed the set; mount now.
    Ready,
    /// Still waiting for other signals.
    Waiting,
    /// The signal was already received, or the gate already fired.
    Ignored,
}

impl MountGate {
    /// Number of signals needed to fire.
    pub const EXPECTED: usize = LoadSignal::COUNT;

    /// Create a gate that has received nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `signal`.
    pub fn signal(&mut self, signal: LoadSignal) -> GateOutcome {
        if self.fired || self.received.contains(&signal) {
            return GateOutcome::Ignored;
        }
        self.received.push(signal);
        if self.received.len() == Self::EXPECTED {
            self.fired = true;
            GateOutcome::Ready
        } else {
            GateOutcome::Waiting
        }
    }

    /// Number of distinct signals received so far.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.received.len()
    }

    /// Signals not yet received, in declaration order.
    #[must_use]
    pub fn missing(&self) -> Vec<LoadSignal> {
        LoadSignal::iter()
            .filter(|s| !self.received.contains(s))
            .collect()
    }

    /// Whether the gate has fired.
    #[must_use]
    pub const fn has_fired(&self) -> bool {
        self.fired
    }

    /// Forget every received signal so a new load can start.
    pub fn reset(&mut self) {
        self.received.clear();
        self.fired = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_all_signals_in_any_order() {
        let mut gate = MountGate::new();
        assert_eq!(gate.signal(LoadSignal::Scripts), GateOutcome::Waiting);
        assert_eq!(gate.signal(LoadSignal::Parsed), GateOutcome::Waiting);
        assert_eq!(gate.missing(), [LoadSignal::Stylesheets]);
        assert_eq!(gate.signal(LoadSignal::Stylesheets), GateOutcome::Ready);
        assert!(gate.has_fired());
        assert_eq!(gate.signal(LoadSignal::Parsed), GateOutcome::Ignored);
    }

    #[test]
    fn duplicate_signal_is_not_counted() {
        let mut gate = MountGate::new();
        let _ = gate.signal(LoadSignal::Parsed);
        assert_eq!(gate.signal(LoadSignal::Parsed), GateOutcome::Ignored);
        assert_eq!(gate.load_count(), 1);
        assert_eq!(MountGate::EXPECTED, 3);
    }

    #[test]
    fn reset_rearms_the_gate() {
        let mut gate = MountGate::new();
        for signal in LoadSignal::iter() {
            let _ = gate.signal(signal);
        }
        gate.reset();
        assert_eq!(gate.load_count(), 0);
        assert!(!gate.has_fired());
    }
}
