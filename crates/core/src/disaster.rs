//! Edge-triggered detector for the wipers-and-headlamps condition.
//!
//! Heavy rain at night (or in a storm) shows up on the bus as both the
//! windshield wipers and the headlamps switched on. The detector raises once
//! when that combination begins and stays quiet until one of the two flags
//! drops again.

/// Where the detector currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisasterState {
    /// Condition inactive: a flag is off or not yet reported.
    #[default]
    Idle,
    /// Condition active and raised, delivery not yet acknowledged.
    Pending,
    /// Condition active and the report went out.
    Notified,
}

/// Signal returned by [`DisasterDetector::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// A report is owed. Call [`DisasterDetector::acknowledge`] once it is sent.
    Raised,
}

#[derive(Debug, Clone, Default)]
pub struct DisasterDetector {
    state: DisasterState,
}

impl DisasterDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DisasterState {
        self.state
    }

    /// Feed the latest flag values. Unknown flags count as off.
    pub fn evaluate(&mut self, wipers: Option<bool>, headlamps: Option<bool>) -> Option<Edge> {
        let active = wipers == Some(true) && headlamps == Some(true);
        match (active, self.state) {
            (false, _) => {
                self.state = DisasterState::Idle;
                None
            }
            (true, DisasterState::Notified) => None,
            (true, DisasterState::Idle | DisasterState::Pending) => {
                self.state = DisasterState::Pending;
                Some(Edge::Raised)
            }
        }
    }

    /// Mark the pending report as delivered.
    pub fn acknowledge(&mut self) {
        if self.state == DisasterState::Pending {
            self.state = DisasterState::Notified;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raise_and_ack(d: &mut DisasterDetector) -> bool {
        let raised = d.evaluate(Some(true), Some(true)).is_some();
        if raised {
            d.acknowledge();
        }
        raised
    }

    #[test]
    fn unknown_flags_stay_idle() {
        let mut d = DisasterDetector::new();
        assert_eq!(d.evaluate(None, Some(true)), None);
        assert_eq!(d.evaluate(Some(true), None), None);
        assert_eq!(d.state(), DisasterState::Idle);
    }

    #[test]
    fn raises_once_while_condition_holds() {
        let mut d = DisasterDetector::new();
        assert!(raise_and_ack(&mut d));
        assert_eq!(d.state(), DisasterState::Notified);
        assert!(!raise_and_ack(&mut d));
        assert!(!raise_and_ack(&mut d));
    }

    #[test]
    fn either_flag_dropping_resets() {
        let mut d = DisasterDetector::new();
        assert!(raise_and_ack(&mut d));

        assert_eq!(d.evaluate(Some(false), Some(true)), None);
        assert_eq!(d.state(), DisasterState::Idle);
        assert!(raise_and_ack(&mut d));

        assert_eq!(d.evaluate(Some(true), Some(false)), None);
        assert!(raise_and_ack(&mut d));
    }

    #[test]
    fn unacknowledged_raise_repeats() {
        let mut d = DisasterDetector::new();
        assert_eq!(d.evaluate(Some(true), Some(true)), Some(Edge::Raised));
        assert_eq!(d.state(), DisasterState::Pending);
        assert_eq!(d.evaluate(Some(true), Some(true)), Some(Edge::Raised));
        d.acknowledge();
        assert_eq!(d.evaluate(Some(true), Some(true)), None);
    }

    #[test]
    fn pending_clears_when_condition_ends() {
        let mut d = DisasterDetector::new();
        d.evaluate(Some(true), Some(true));
        d.evaluate(Some(false), Some(true));
        d.acknowledge();
        assert_eq!(d.state(), DisasterState::Idle);
    }
}
