//! `InterventionManager` — the active programme configuration and its
//! per-tick effects.

use log::info;

use mh_agent::Population;
use mh_core::{InterventionConfig, MentalState, MhResult, RngStream};
use mh_network::SocialNetwork;
use mh_transmission::InterventionEffects;

use crate::Enrolment;

/// Holds the active [`InterventionConfig`] and the resulting programme
/// membership.
///
/// [`effects`](Self::effects) is a pure function of the manager and the
/// pre-tick population; the only mutation is [`update`](Self::update),
/// which the simulation calls between ticks.
#[derive(Clone, Debug)]
pub struct InterventionManager {
    config:    InterventionConfig,
    enrolment: Enrolment,
    enrolled:  Vec<bool>,
}

impl InterventionManager {
    /// Validate `config` and enrol the peer-support participants.
    pub fn new(config: InterventionConfig, network: &SocialNetwork, stream: RngStream) -> MhResult<Self> {
        config.validate()?;
        let enrolment = Enrolment::new(network, stream);
        let enrolled = enrolment.members(config.peer_support_coverage, config.peer_support_targeting);
        let manager = Self { config, enrolment, enrolled };
        manager.log_enrolment();
        Ok(manager)
    }

    #[inline]
    pub fn config(&self) -> &InterventionConfig {
        &self.config
    }

    /// Peer-support membership flags, indexed by `AgentId`.
    #[inline]
    pub fn enrolled(&self) -> &[bool] {
        &self.enrolled
    }

    pub fn enrolled_count(&self) -> usize {
        self.enrolled.iter().filter(|&&e| e).count()
    }

    /// Replace the active configuration.  On error the previous
    /// configuration stays in force.
    pub fn update(&mut self, config: InterventionConfig) -> MhResult<()> {
        config.validate()?;
        if config.peer_support_coverage != self.config.peer_support_coverage
            || config.peer_support_targeting != self.config.peer_support_targeting
        {
            self.enrolled = self
                .enrolment
                .members(config.peer_support_coverage, config.peer_support_targeting);
        }
        self.config = config;
        self.log_enrolment();
        Ok(())
    }

    /// Per-agent adjustments for the tick following `population.tick()`.
    ///
    /// - **Treatment access**: Symptomatic agents start seeking with
    ///   `treatment_access_rate × treatment_access_boost` (capped at 1).
    /// - **Digital outreach**: AtRisk and Symptomatic agents additionally
    ///   start with `outreach_rate_per_hour × daily hours` (capped at 1).
    ///   The two channels combine as independent chances.
    /// - **Peer support**: enrolled agents keep `1 − peer_support_protection`
    ///   of their incoming peer influence.
    pub fn effects(&self, population: &Population) -> InterventionEffects {
        let cfg    = &self.config;
        let access = cfg.effective_treatment_access();
        let hours  = &population.traits().social_media_hours;

        let treatment_start_probability = population
            .states()
            .iter()
            .zip(hours)
            .map(|(&state, &h)| {
                let p_access = if state == MentalState::Symptomatic { access } else { 0.0 };
                let reachable = matches!(state, MentalState::AtRisk | MentalState::Symptomatic);
                let p_outreach = if cfg.digital_outreach && reachable {
                    (cfg.outreach_rate_per_hour * h).min(1.0)
                } else {
                    0.0
                };
                1.0 - (1.0 - p_access) * (1.0 - p_outreach)
            })
            .collect();

        let shielded = 1.0 - cfg.peer_support_protection;
        let peer_multiplier = self
            .enrolled
            .iter()
            .map(|&e| if e { shielded } else { 1.0 })
            .collect();

        InterventionEffects { treatment_start_probability, peer_multiplier }
    }

    fn log_enrolment(&self) {
        info!(
            "interventions: access {:.3}/tick, outreach {}, peer support {} agents ({:?})",
            self.config.effective_treatment_access(),
            if self.config.digital_outreach { "on" } else { "off" },
            self.enrolled_count(),
            self.config.peer_support_targeting,
        );
    }
}
