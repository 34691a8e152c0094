//! Unit tests for mh-transmission.

#[cfg(test)]
mod helpers {
    use mh_agent::{AgentUpdate, Population, PopulationBuilder};
    use mh_core::{AgentId, MentalState};
    use mh_network::{RelationKind, SocialNetwork, SocialNetworkBuilder};

    /// `n` sampled agents with every score forced to `score` at tick 1.
    pub fn uniform_population(
        n:       usize,
        score:   f64,
        state:   MentalState,
        seeking: bool,
        course:  u32,
    ) -> Population {
        let mut pop = PopulationBuilder::new(n, 1).build().unwrap();
        let update = (0..n)
            .map(|_| AgentUpdate {
                state,
                depression:        score,
                anxiety:           score,
                seeking_treatment: seeking,
                treatment_ticks:   course,
                ticks_above:       0,
            })
            .collect();
        pop.commit(update).unwrap();
        pop
    }

    /// Agent 0 linked to every other agent by full-weight peer ties.
    pub fn star(n: usize) -> SocialNetwork {
        let mut b = SocialNetworkBuilder::new(n);
        for leaf in 1..n as u32 {
            b.add_edge(AgentId(0), AgentId(leaf), RelationKind::Peer, 1.0).unwrap();
        }
        b.build()
    }
}

// ── Score primitives ──────────────────────────────────────────────────────────

#[cfg(test)]
mod score {
    use mh_core::{AgentId, MentalState, TransmissionParams};
    use mh_network::{RelationKind, SocialNetworkBuilder};

    use crate::NeighbourSignal;
    use crate::score::{logistic, relax};

    #[test]
    fn logistic_is_bounded() {
        for z in [-1e6, -40.0, -1.0, 0.0, 1.0, 40.0, 1e6] {
            let y = logistic(z);
            assert!((0.0..=1.0).contains(&y), "logistic({z}) = {y}");
        }
        assert!((logistic(0.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn relax_is_convex() {
        assert_eq!(relax(0.2, 1.0, 0.0), 0.2);
        assert_eq!(relax(0.2, 1.0, 1.0), 1.0);
        assert!((relax(0.2, 0.6, 0.5) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn signal_weights_by_relation_kind() {
        let pop = super::helpers::uniform_population(3, 0.5, MentalState::AtRisk, false, 0);
        let mut b = SocialNetworkBuilder::new(3);
        b.add_edge(AgentId(0), AgentId(1), RelationKind::Peer, 0.5).unwrap();
        b.add_edge(AgentId(0), AgentId(2), RelationKind::Digital, 1.0).unwrap();
        let net = b.build();

        let params = TransmissionParams::default();
        let s = NeighbourSignal::gather(AgentId(0), &pop, &net, &params);
        // 0.5 × 1.0 (peer) + 1.0 × 0.6 (digital)
        assert!((s.effective_weight - 1.1).abs() < 1e-12);
        assert!((s.peer_depression - 0.5).abs() < 1e-12);
        assert!(!s.is_isolated(&params));

        let hours = pop.traits().social_media_hours[0];
        assert!((s.media_depression - hours / 8.0 * 0.5).abs() < 1e-12);
    }

    #[test]
    fn no_neighbours_is_isolated_with_zero_signal() {
        let pop = super::helpers::uniform_population(2, 0.5, MentalState::AtRisk, false, 0);
        let net = mh_network::SocialNetwork::empty(2);
        let params = TransmissionParams::default();
        let s = NeighbourSignal::gather(AgentId(1), &pop, &net, &params);
        assert!(s.is_isolated(&params));
        assert_eq!(s.peer_depression, 0.0);
        assert_eq!(s.media_anxiety, 0.0);
    }

    #[test]
    fn loneliness_outweighs_full_peer_pressure() {
        let p = TransmissionParams::default();
        assert!(p.loneliness_log_odds() > p.peer_influence_strength);
    }
}

// ── Logit ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod logit {
    use mh_core::TransmissionParams;

    use crate::CalibratedTransmission;
    use crate::calibrated::Drivers;

    fn drivers() -> Drivers {
        Drivers { peer_factor: 1.0, isolated: false, stress: 0.5, protection: 0.5, in_course: false }
    }

    #[test]
    fn each_driver_moves_logit_in_expected_direction() {
        let model = CalibratedTransmission::default();
        let w = &model.params.depression;
        let base = model.logit(w, 0.3, 0.1, &drivers());

        assert!(model.logit(w, 0.6, 0.1, &drivers()) > base);
        assert!(model.logit(w, 0.3, 0.4, &drivers()) > base);
        assert!(model.logit(w, 0.3, 0.1, &Drivers { isolated: true, ..drivers() }) > base);
        assert!(model.logit(w, 0.3, 0.1, &Drivers { stress: 0.9, ..drivers() }) > base);
        assert!(model.logit(w, 0.3, 0.1, &Drivers { protection: 0.9, ..drivers() }) < base);
        assert!(model.logit(w, 0.3, 0.1, &Drivers { in_course: true, ..drivers() }) < base);
        assert!(model.logit(w, 0.3, 0.1, &Drivers { peer_factor: 0.5, ..drivers() }) < base);
    }

    #[test]
    fn isolation_adds_log_odds_ratio() {
        let model = CalibratedTransmission::default();
        let w = &model.params.anxiety;
        let connected = model.logit(w, 0.0, 0.0, &drivers());
        let isolated  = model.logit(w, 0.0, 0.0, &Drivers { isolated: true, ..drivers() });
        let expected  = TransmissionParams::default().loneliness_log_odds();
        assert!((isolated - connected - expected).abs() < 1e-12);
    }
}

// ── State machine ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod transition {
    use mh_core::{MentalState::*, Thresholds};

    use crate::transition::next_state;

    fn thr() -> Thresholds {
        Thresholds::default()
    }

    #[test]
    fn healthy_crosses_into_at_risk() {
        let t = next_state(&thr(), Healthy, 0.34, 0.30, 0, false, 0.9);
        assert_eq!((t.state, t.ticks_above), (AtRisk, 1));
        assert_eq!(next_state(&thr(), Healthy, 0.32, 0.30, 0, false, 0.9).state, Healthy);
    }

    #[test]
    fn at_risk_escalates_on_high_score() {
        assert_eq!(next_state(&thr(), AtRisk, 0.7, 0.6, 1, false, 0.9).state, Symptomatic);
    }

    #[test]
    fn at_risk_escalates_after_sustained_ticks() {
        let thr = thr();
        let below = next_state(&thr, AtRisk, 0.4, 0.4, thr.sustained_ticks - 2, false, 0.9);
        assert_eq!((below.state, below.ticks_above), (AtRisk, thr.sustained_ticks - 1));
        let at = next_state(&thr, AtRisk, 0.4, 0.4, thr.sustained_ticks - 1, false, 0.9);
        assert_eq!(at.state, Symptomatic);
    }

    #[test]
    fn at_risk_hysteresis_band_resets_run() {
        // Between recovered and at_risk: stays AtRisk, run resets.
        let t = next_state(&thr(), AtRisk, 0.25, 0.4, 5, false, 0.9);
        assert_eq!((t.state, t.ticks_above), (AtRisk, 0));
        let t = next_state(&thr(), AtRisk, 0.1, 0.25, 0, true, 0.9);
        assert_eq!(t.state, Healthy);
        assert!(t.ends_treatment);
    }

    #[test]
    fn symptomatic_recovers_only_with_treatment_and_decline() {
        assert_eq!(next_state(&thr(), Symptomatic, 0.6, 0.7, 0, true, 0.9).state, Recovering);
        assert_eq!(next_state(&thr(), Symptomatic, 0.6, 0.7, 0, false, 0.9).state, Symptomatic);
        assert_eq!(next_state(&thr(), Symptomatic, 0.75, 0.7, 0, true, 0.9).state, Symptomatic);
    }

    #[test]
    fn recovering_reaches_healthy_below_recovered() {
        let t = next_state(&thr(), Recovering, 0.15, 0.25, 0, true, 0.9);
        assert_eq!(t.state, Healthy);
        assert!(t.ends_treatment);
    }

    #[test]
    fn recovering_relapse_is_probabilistic() {
        let thr = thr();
        // Rising score, roll under the relapse probability.
        assert_eq!(next_state(&thr, Recovering, 0.5, 0.4, 0, true, 0.01).state, AtRisk);
        assert_eq!(next_state(&thr, Recovering, 0.7, 0.6, 0, true, 0.01).state, Symptomatic);
        // Rising score, roll over the relapse probability.
        assert_eq!(next_state(&thr, Recovering, 0.5, 0.4, 0, true, 0.5).state, Recovering);
        // Falling score never relapses.
        assert_eq!(next_state(&thr, Recovering, 0.3, 0.4, 0, true, 0.01).state, Recovering);
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod engine {
    use mh_agent::AgentUpdate;
    use mh_core::{AgentId, AgentRng, MentalState, RngStream};
    use mh_network::SocialNetwork;

    use crate::{
        CalibratedTransmission, InterventionEffects, TickContext, TransmissionEngine,
        TransmissionError, TransmissionModel,
    };

    use super::helpers::{star, uniform_population};

    fn calibrated_engine() -> TransmissionEngine<CalibratedTransmission> {
        TransmissionEngine::default()
    }

    /// Emits NaN for every agent at or above `from`.
    struct Faulty {
        from: u32,
    }

    impl TransmissionModel for Faulty {
        fn update(&self, agent: AgentId, ctx: &TickContext<'_>, _rng: &mut AgentRng) -> AgentUpdate {
            let i = agent.index();
            let pop = ctx.population;
            AgentUpdate {
                state:      pop.state(agent),
                depression: if agent.0 >= self.from { f64::NAN } else { pop.depression()[i] },
                anxiety:    pop.anxiety()[i],
                ..AgentUpdate::default()
            }
        }
    }

    #[test]
    fn scores_stay_in_unit_interval() {
        let pop = uniform_population(50, 0.99, MentalState::Symptomatic, false, 0);
        let net = star(50);
        let effects = InterventionEffects::none(50);
        let ctx = TickContext::new(&pop, &net, &effects, RngStream::new(3));
        let update = calibrated_engine().compute_tick(&ctx).unwrap();
        assert_eq!(update.len(), 50);
        for u in &update.agents {
            assert!((0.0..=1.0).contains(&u.depression));
            assert!((0.0..=1.0).contains(&u.anxiety));
        }
    }

    #[test]
    fn same_inputs_same_outputs() {
        let pop = uniform_population(40, 0.5, MentalState::AtRisk, false, 0);
        let net = star(40);
        let mut effects = InterventionEffects::none(40);
        effects.treatment_start_probability = vec![0.5; 40];
        let ctx = TickContext::new(&pop, &net, &effects, RngStream::new(77));
        let engine = calibrated_engine();
        let a = engine.compute_tick(&ctx).unwrap();
        let b = engine.compute_tick(&ctx).unwrap();
        assert_eq!(a.agents, b.agents);
    }

    #[test]
    fn context_targets_next_tick() {
        let pop = uniform_population(5, 0.5, MentalState::AtRisk, false, 0);
        let net = star(5);
        let effects = InterventionEffects::none(5);
        let ctx = TickContext::new(&pop, &net, &effects, RngStream::new(1));
        assert_eq!(ctx.tick, pop.tick().next());
    }

    #[test]
    fn lowest_offending_agent_is_reported() {
        let pop = uniform_population(10, 0.5, MentalState::AtRisk, false, 0);
        let net = star(10);
        let effects = InterventionEffects::none(10);
        let ctx = TickContext::new(&pop, &net, &effects, RngStream::new(1));
        let err = TransmissionEngine::new(Faulty { from: 6 }).compute_tick(&ctx).unwrap_err();
        assert!(err.is_numeric_invariant());
        match err {
            TransmissionError::Core(mh_core::MhError::NumericInvariant { agent, quantity, .. }) => {
                assert_eq!(agent, AgentId(6));
                assert_eq!(quantity, "depression");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn mismatched_effects_rejected() {
        let pop = uniform_population(10, 0.5, MentalState::AtRisk, false, 0);
        let net = star(10);
        let effects = InterventionEffects::none(9);
        let ctx = TickContext::new(&pop, &net, &effects, RngStream::new(1));
        let err = calibrated_engine().compute_tick(&ctx).unwrap_err();
        assert!(matches!(err, TransmissionError::AgentCountMismatch { expected: 10, got: 9, .. }));
    }

    #[test]
    fn certain_start_probability_starts_treatment() {
        let pop = uniform_population(20, 0.5, MentalState::AtRisk, false, 0);
        let net = star(20);
        let mut effects = InterventionEffects::none(20);
        effects.treatment_start_probability = vec![1.0; 20];
        let ctx = TickContext::new(&pop, &net, &effects, RngStream::new(1));
        let update = calibrated_engine().compute_tick(&ctx).unwrap();
        for u in &update.agents {
            assert!(u.seeking_treatment);
            assert_eq!(u.treatment_ticks, 0);
        }
    }

    #[test]
    fn treatment_course_lowers_scores() {
        let untreated = uniform_population(10, 0.7, MentalState::Symptomatic, false, 0);
        let treated   = uniform_population(10, 0.7, MentalState::Symptomatic, true, 4);
        let net = star(10);
        let effects = InterventionEffects::none(10);
        let engine = calibrated_engine();

        let a = engine
            .compute_tick(&TickContext::new(&untreated, &net, &effects, RngStream::new(1)))
            .unwrap();
        let b = engine
            .compute_tick(&TickContext::new(&treated, &net, &effects, RngStream::new(1)))
            .unwrap();
        for (u, t) in a.agents.iter().zip(&b.agents) {
            assert!(t.depression < u.depression);
            assert_eq!(t.treatment_ticks, 5);
        }
        // Treated agents whose score declined move to Recovering.
        assert!(b.agents.iter().all(|u| u.state == MentalState::Recovering));
    }

    #[test]
    fn peer_support_damps_neighbour_influence() {
        let pop = uniform_population(8, 0.9, MentalState::Symptomatic, false, 0);
        let net = star(8);
        let open = InterventionEffects::none(8);
        let mut shielded = InterventionEffects::none(8);
        shielded.peer_multiplier[0] = 0.0;

        let engine = calibrated_engine();
        let a = engine.compute_tick(&TickContext::new(&pop, &net, &open, RngStream::new(1))).unwrap();
        let b = engine
            .compute_tick(&TickContext::new(&pop, &net, &shielded, RngStream::new(1)))
            .unwrap();
        assert!(b.agents[0].depression < a.agents[0].depression);
        assert_eq!(b.agents[1], a.agents[1]);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_compute_matches_agent_by_agent_updates() {
        let pop = mh_agent::PopulationBuilder::new(300, 5).build().unwrap();
        let net = star(300);
        let mut effects = InterventionEffects::none(300);
        effects.treatment_start_probability = vec![0.3; 300];
        let ctx = TickContext::new(&pop, &net, &effects, RngStream::new(19));
        let engine = calibrated_engine();

        let sequential: Vec<AgentUpdate> = (0..300u32)
            .map(|i| {
                let agent = AgentId(i);
                engine.model.update(agent, &ctx, &mut ctx.rng.agent(agent, ctx.tick))
            })
            .collect();
        let parallel = engine.compute_tick(&ctx).unwrap();
        assert_eq!(parallel.agents, sequential);
    }

    #[test]
    fn isolation_raises_target() {
        let pop = uniform_population(6, 0.0, MentalState::Healthy, false, 0);
        let connected = star(6);
        let isolated  = SocialNetwork::empty(6);
        let effects = InterventionEffects::none(6);
        let engine = calibrated_engine();

        let a = engine
            .compute_tick(&TickContext::new(&pop, &connected, &effects, RngStream::new(1)))
            .unwrap();
        let b = engine
            .compute_tick(&TickContext::new(&pop, &isolated, &effects, RngStream::new(1)))
            .unwrap();
        assert!(b.agents[0].depression > a.agents[0].depression);
        assert!(b.agents[0].anxiety > a.agents[0].anxiety);
    }
}
