//! Threshold-with-hysteresis state machine.
//!
//! Evaluated once per agent per tick, after the agent's new scores are
//! known.  `score` is the larger of the two new scores; `previous` the
//! larger of the two pre-tick scores.
//!
//! | From          | To            | When                                                   |
//! |---------------|---------------|--------------------------------------------------------|
//! | Healthy       | AtRisk        | `score ≥ at_risk`                                      |
//! | AtRisk        | Symptomatic   | `score ≥ symptomatic`, or `sustained_ticks` consecutive ticks at `≥ at_risk` |
//! | AtRisk        | Healthy       | `score < recovered` (ends any treatment course)        |
//! | Symptomatic   | Recovering    | seeking treatment and `score < previous`               |
//! | Recovering    | Healthy       | `score < recovered` (ends the treatment course)        |
//! | Recovering    | Symptomatic / AtRisk | `score > previous` and the relapse roll succeeds |
//!
//! At most one transition happens per tick.

use mh_core::{MentalState, Thresholds};

/// Outcome of one state-machine evaluation.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Transition {
    pub state:          MentalState,
    /// Consecutive AtRisk ticks at or above the at-risk threshold, counting
    /// this one.
    pub ticks_above:    u32,
    /// The agent returned to Healthy and leaves treatment.
    pub ends_treatment: bool,
}

impl Transition {
    fn to(state: MentalState, ticks_above: u32) -> Self {
        Self { state, ticks_above, ends_treatment: false }
    }
}

/// Next state for an agent currently in `state`.
///
/// `relapse_roll` is a uniform draw in `[0, 1)`; it is only consulted for
/// Recovering agents whose score rose.
pub fn next_state(
    thr:          &Thresholds,
    state:        MentalState,
    score:        f64,
    previous:     f64,
    ticks_above:  u32,
    seeking:      bool,
    relapse_roll: f64,
) -> Transition {
    let above = score >= thr.at_risk;
    match state {
        MentalState::Healthy => {
            if above {
                Transition::to(MentalState::AtRisk, 1)
            } else {
                Transition::to(MentalState::Healthy, 0)
            }
        }

        MentalState::AtRisk => {
            let run = if above { ticks_above + 1 } else { 0 };
            if score >= thr.symptomatic || run >= thr.sustained_ticks {
                Transition::to(MentalState::Symptomatic, 0)
            } else if score < thr.recovered {
                Transition { state: MentalState::Healthy, ticks_above: 0, ends_treatment: true }
            } else {
                Transition::to(MentalState::AtRisk, run)
            }
        }

        MentalState::Symptomatic => {
            if seeking && score < previous {
                Transition::to(MentalState::Recovering, 0)
            } else {
                Transition::to(MentalState::Symptomatic, 0)
            }
        }

        MentalState::Recovering => {
            if score < thr.recovered {
                Transition { state: MentalState::Healthy, ticks_above: 0, ends_treatment: true }
            } else if score > previous && relapse_roll < thr.relapse_probability {
                if score >= thr.symptomatic {
                    Transition::to(MentalState::Symptomatic, 0)
                } else {
                    Transition::to(MentalState::AtRisk, if above { 1 } else { 0 })
                }
            } else {
                Transition::to(MentalState::Recovering, 0)
            }
        }
    }
}
