//! Round state derived from the live scene
//!
//! Counts are never adjusted incrementally: after every population change
//! they are replaced by the sizes of the freshly rebuilt collider lists.
//! The first end condition met is latched for the rest of the session.

use crate::events::GameEvent;

/// Live population of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    /// Bunnies still in play
    pub agents: usize,
    /// Carrots not yet deposited
    pub items: usize,
}

/// How the round stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundOutcome {
    /// Still running
    #[default]
    InProgress,
    /// Every bunny was stopped
    Won,
    /// Every carrot was stolen
    Lost,
}

/// Counters and end-of-round latch
#[derive(Debug, Clone, Default)]
pub struct Session {
    initial: Counts,
    counts: Counts,
    eliminated: usize,
    deposited: usize,
    outcome: RoundOutcome,
}

impl Session {
    /// Start a round with the given population
    pub fn new(initial: Counts) -> Self {
        Self {
            initial,
            counts: initial,
            ..Default::default()
        }
    }

    /// Population at round start
    pub fn initial(&self) -> Counts {
        self.initial
    }

    /// Current population
    pub fn counts(&self) -> Counts {
        self.counts
    }

    /// Bunnies removed by the car so far
    pub fn eliminated(&self) -> usize {
        self.eliminated
    }

    /// Carrots delivered to holes so far
    pub fn deposited(&self) -> usize {
        self.deposited
    }

    /// Current outcome
    pub fn outcome(&self) -> RoundOutcome {
        self.outcome
    }

    /// Whether an end condition has been met
    pub fn is_over(&self) -> bool {
        self.outcome != RoundOutcome::InProgress
    }

    /// Tally a resolved interaction
    pub fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Eliminated { .. } => self.eliminated += 1,
            GameEvent::Deposited { .. } => self.deposited += 1,
            _ => {}
        }
    }

    /// Replace the counts and evaluate the end conditions
    ///
    /// Returns the signals to publish: the new counts when they changed and
    /// the outcome when this call ended the round.
    pub fn update_counts(&mut self, counts: Counts) -> Vec<GameEvent> {
        let mut signals = Vec::new();
        if counts != self.counts {
            self.counts = counts;
            log::info!("{} bunnies, {} carrots left", counts.agents, counts.items);
            signals.push(GameEvent::CountsChanged(counts));
        }
        if let Some(outcome) = self.evaluate() {
            signals.push(GameEvent::RoundEnded(outcome));
        }
        signals
    }

    fn evaluate(&mut self) -> Option<RoundOutcome> {
        if self.is_over() {
            return None;
        }
        let outcome = if self.counts.items == 0 {
            RoundOutcome::Lost
        } else if self.counts.agents == 0 {
            RoundOutcome::Won
        } else {
            return None;
        };
        log::info!("Round over: {outcome:?}");
        self.outcome = outcome;
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(agents: usize, items: usize) -> Counts {
        Counts { agents, items }
    }

    #[test]
    fn test_unchanged_counts_emit_nothing() {
        let mut session = Session::new(counts(3, 2));
        assert!(session.update_counts(counts(3, 2)).is_empty());
        assert_eq!(session.outcome(), RoundOutcome::InProgress);
    }

    #[test]
    fn test_last_bunny_wins() {
        let mut session = Session::new(counts(1, 2));
        let signals = session.update_counts(counts(0, 2));
        assert_eq!(
            signals,
            vec![GameEvent::CountsChanged(counts(0, 2)), GameEvent::RoundEnded(RoundOutcome::Won)]
        );
        assert!(session.is_over());
    }

    #[test]
    fn test_last_carrot_loses() {
        let mut session = Session::new(counts(4, 1));
        session.update_counts(counts(4, 0));
        assert_eq!(session.outcome(), RoundOutcome::Lost);
    }

    #[test]
    fn test_outcome_is_latched() {
        let mut session = Session::new(counts(2, 1));
        session.update_counts(counts(2, 0));
        let later = session.update_counts(counts(0, 0));
        assert_eq!(later, vec![GameEvent::CountsChanged(counts(0, 0))]);
        assert_eq!(session.outcome(), RoundOutcome::Lost);
    }

    #[test]
    fn test_record_tallies_removals() {
        use hop_engine::scene::NodeId;

        let mut session = Session::new(counts(2, 2));
        let id = NodeId::default();
        session.record(&GameEvent::Deposited { agent: id, item: id, target: id });
        session.record(&GameEvent::Eliminated { hazard: id, agent: id, dropped: None });
        session.record(&GameEvent::PickedUp { agent: id, item: id });
        assert_eq!((session.deposited(), session.eliminated()), (1, 1));
    }
}
