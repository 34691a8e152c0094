//! The four-valued mental-health state.

use std::fmt;

/// Categorical mental-health state of an agent.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MentalState {
    #[default]
    Healthy,
    AtRisk,
    Symptomatic,
    Recovering,
}

impl MentalState {
    /// All states in index order.
    pub const ALL: [MentalState; 4] = [
        MentalState::Healthy,
        MentalState::AtRisk,
        MentalState::Symptomatic,
        MentalState::Recovering,
    ];

    /// Dense index in `0..4`, matching [`MentalState::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// `AtRisk` or `Symptomatic`.  `Recovering` agents are still counted as
    /// cases until they reach `Healthy`.
    #[inline]
    pub fn is_at_risk_or_worse(self) -> bool {
        !matches!(self, MentalState::Healthy)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MentalState::Healthy     => "healthy",
            MentalState::AtRisk      => "at_risk",
            MentalState::Symptomatic => "symptomatic",
            MentalState::Recovering  => "recovering",
        }
    }
}

impl fmt::Display for MentalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
