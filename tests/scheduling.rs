use std::collections::HashSet;

use petanque_scheduler::distribution::optimal_distribution;
use petanque_scheduler::prelude::*;
use petanque_scheduler::tracker::ConstraintTracker;
use tracing::{Level, Metadata};
use tracing_subscriber::{
    fmt,
    layer::{Context, Filter, SubscriberExt},
    Layer, Registry,
};

struct CustomLevelFilter;
impl<S> Filter<S> for CustomLevelFilter {
    fn enabled(&self, meta: &Metadata<'_>, _cx: &Context<'_, S>) -> bool {
        meta.level() <= &Level::INFO
    }
}

#[allow(dead_code)]
fn init_debug_logger() {
    let format = fmt::format()
        .without_time()
        .with_ansi(true)
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(false);

    let reg = Registry::default().with(
        fmt::layer()
            .event_format(format)
            .with_filter(CustomLevelFilter),
    );

    let _ = tracing::subscriber::set_global_default(reg);
}

fn roster(roles: &[&[Role]]) -> Vec<Player> {
    roles
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Player::new(format!("Player {i}"), r.iter().copied())
                .unwrap()
                .with_id(PlayerId(i as u32 + 1))
        })
        .collect()
}

const ROLE_PAIRS: [&[Role]; 3] = [
    &[Role::Tireur, Role::Pointeur],
    &[Role::Tireur, Role::Milieu],
    &[Role::Pointeur, Role::Milieu],
];

/// `count` players, each able to hold two roles.
fn versatile(count: usize) -> Vec<Player> {
    let roles = (0..count).map(|i| ROLE_PAIRS[i % 3]).collect::<Vec<_>>();
    roster(&roles)
}

fn seeded(seed: u64, mode: TournamentMode) -> Scheduler {
    Scheduler::new(Configuration::new().with_seed(seed).with_mode(mode)).unwrap()
}

fn assert_well_formed(round: &Round, players: &[Player]) {
    let mut seen = HashSet::new();
    for m in round.matches() {
        assert!(m.format().accepts_sizes(m.team_a().len(), m.team_b().len()));
        for id in m.all_player_ids() {
            assert!(seen.insert(id), "{id} seated twice in round {}", round.index());
        }
        assert!(!m.is_complete());
    }
    assert!(round.total_players() <= players.len());
    let known = players.iter().filter_map(|p| p.id).collect::<HashSet<_>>();
    assert!(seen.is_subset(&known));
}

#[test]
fn twelve_players_first_round() {
    let players = roster(&[
        &[Role::Tireur],
        &[Role::Tireur],
        &[Role::Tireur],
        &[Role::Tireur],
        &[Role::Pointeur],
        &[Role::Pointeur],
        &[Role::Pointeur],
        &[Role::Pointeur],
        &[Role::Milieu],
        &[Role::Milieu],
        &[Role::Milieu],
        &[Role::Milieu],
    ]);
    let scheduler = seeded(17, TournamentMode::Triplette);

    let (round, report, _) = scheduler
        .generate_round(&players, 0, &[], None, None)
        .unwrap();
    assert_eq!(round.matches().len(), 2);
    assert!(round
        .matches()
        .iter()
        .all(|m| m.format() == MatchFormat::Triplette));
    assert_eq!(report.repeated_partners, 0);
    assert_eq!(report.repeated_opponents, 0);
    assert_eq!(report.grade, Grade::APlus);
    assert_well_formed(&round, &players);

    let (round, report, level) = scheduler
        .generate_round_deterministic(&players, 0, &[], None)
        .unwrap();
    assert_eq!(level, ConstraintLevel::Strict);
    assert_eq!(round.matches().len(), 2);
    assert_eq!(report.grade, Grade::APlus);
}

#[test]
fn same_seed_same_tournament() {
    let players = versatile(17);
    let run = || {
        let scheduler = seeded(99, TournamentMode::Doublette);
        let mut rounds: Vec<Round> = Vec::new();
        for index in 0..3 {
            let (round, ..) = scheduler
                .generate_round(&players, index, &rounds, None, None)
                .unwrap();
            rounds.push(round);
        }
        rounds
    };
    assert_eq!(run(), run());
}

#[test]
fn rounds_are_well_formed_for_many_roster_sizes() {
    for mode in [TournamentMode::Triplette, TournamentMode::Doublette] {
        let scheduler = seeded(5, mode);
        for count in 4..=30 {
            let players = versatile(count);
            let mut rounds: Vec<Round> = Vec::new();
            for index in 0..3 {
                let (round, ..) = scheduler
                    .generate_round(&players, index, &rounds, None, None)
                    .unwrap_or_else(|e| panic!("{count} players, {mode}: {e}"));
                assert_well_formed(&round, &players);
                let expected = optimal_distribution(count, mode);
                assert_eq!(round.total_players(), expected.seated());
                rounds.push(round);
            }
        }
    }
}

#[test]
fn hybrid_matches_fill_odd_rosters() {
    let scheduler = seeded(8, TournamentMode::Triplette);

    let (round, report, _) = scheduler
        .generate_round(&versatile(5), 0, &[], None, None)
        .unwrap();
    assert_eq!(round.matches().len(), 1);
    assert_eq!(round.matches()[0].format(), MatchFormat::Hybrid);
    assert_eq!(report.fallback_matches, 1);

    let (round, report, _) = scheduler
        .generate_round(&versatile(11), 0, &[], None, None)
        .unwrap();
    let formats = round.matches().iter().map(Match::format).collect::<Vec<_>>();
    assert_eq!(formats, vec![MatchFormat::Triplette, MatchFormat::Hybrid]);
    assert_eq!(round.total_players(), 11);
    assert_eq!(report.fallback_matches, 1);
}

#[test]
fn seven_players_bench_one() {
    let players = versatile(7);
    let (round, ..) = seeded(3, TournamentMode::Triplette)
        .generate_round(&players, 0, &[], None, None)
        .unwrap();
    assert_eq!(round.total_players(), 6);
    assert_eq!(round.benched(&players).len(), 1);
}

#[test]
fn too_few_players() {
    let players = versatile(3);
    let scheduler = seeded(0, TournamentMode::Triplette);
    assert!(matches!(
        scheduler.generate_round(&players, 0, &[], None, None),
        Err(ScheduleError::Infeasible(_))
    ));
    assert!(matches!(
        scheduler.generate_round_deterministic(&players, 0, &[], None),
        Err(ScheduleError::Infeasible(_))
    ));
}

#[test]
fn replaying_a_round_rebuilds_its_relations() {
    let players = versatile(12);
    let scheduler = seeded(21, TournamentMode::Triplette);
    let (round, ..) = scheduler
        .generate_round(&players, 0, &[], None, None)
        .unwrap();

    let mut forward = ConstraintTracker::new(TournamentMode::Triplette, PenaltyWeights::default());
    for m in round.matches() {
        forward.add_match(m);
    }
    let mut backward = ConstraintTracker::new(TournamentMode::Triplette, PenaltyWeights::default());
    for m in round.matches().iter().rev() {
        backward.add_match(m);
    }
    assert_eq!(forward, backward);
    assert_eq!(forward, scheduler.history(std::slice::from_ref(&round)));

    for m in round.matches() {
        for team in m.teams() {
            for &a in team {
                for &b in team {
                    if a != b {
                        assert_eq!(forward.partner_count(a, b), 1);
                        assert_eq!(forward.opponent_count(a, b), 0);
                    }
                }
            }
        }
        for &a in m.team_a() {
            for &b in m.team_b() {
                assert_eq!(forward.opponent_count(a, b), 1);
            }
            assert!(forward.has_played_on(a, m.venue()));
        }
    }
}

#[test]
fn repeating_a_round_costs_more() {
    let players = versatile(12);
    let scheduler = seeded(4, TournamentMode::Triplette);
    let (round, ..) = scheduler
        .generate_round(&players, 0, &[], None, None)
        .unwrap();
    let fresh = scheduler.history(&[]);
    let once = scheduler.history(std::slice::from_ref(&round));
    let twice = scheduler.history(&[round.clone(), round.clone()]);

    let m = &round.matches()[0];
    let score = |t: &ConstraintTracker| t.score_match(m.team_a(), m.team_b(), "ZZ", m.format());
    assert_eq!(score(&fresh), 0.0);
    assert!(score(&once) > score(&fresh));
    // 6 partner pairs and 9 opponent pairs, all seen k times: 6*10*k² + 9*5*k²
    assert_eq!(score(&once), 105.0);
    assert_eq!(score(&twice), 420.0);
}

#[test]
fn deterministic_path_survives_history_pressure() {
    let all_roles: &[Role] = &Role::ALL;
    let players = roster(&[all_roles; 8]);
    let scheduler = seeded(0, TournamentMode::Doublette);
    let mut rounds: Vec<Round> = Vec::new();
    let mut levels = Vec::new();

    for index in 0..5 {
        let (round, _, level) = scheduler
            .generate_round_deterministic(&players, index, &rounds, None)
            .unwrap();
        assert_well_formed(&round, &players);
        assert_eq!(round.total_players(), 8);
        levels.push(level);
        rounds.push(round);
    }

    assert_eq!(levels[0], ConstraintLevel::Strict);
    assert!(levels.windows(2).all(|w| w[0] <= w[1]), "{levels:?}");
}

#[test]
fn full_tournament_through_a_store() {
    let mut store = MemoryStore::new();
    for player in versatile(14) {
        let player = Player::new(player.name(), player.roles().iter().copied()).unwrap();
        store.add_player(player).unwrap();
    }
    let config = Configuration::new()
        .with_seed(7)
        .with_rounds_count(3)
        .with_venue_count(4);
    store.save_config(&config).unwrap();
    let scheduler = Scheduler::new(store.load_config().unwrap()).unwrap();

    for expected in 0..3 {
        let strategy = if expected == 0 {
            GenerationStrategy::Deterministic
        } else {
            GenerationStrategy::Heuristic
        };
        let (round, report) = schedule_next_round(&mut store, &scheduler, strategy).unwrap();
        assert_eq!(round.index(), expected);
        assert_eq!(round.quality_report(), Some(&report));
        for m in round.matches() {
            store.record_score(expected, m.venue(), 13, 7).unwrap();
        }
    }

    let rounds = store.list_rounds().unwrap();
    assert_eq!(rounds.len(), 3);
    assert!(rounds.iter().all(Round::is_complete));
    assert!(schedule_next_round(&mut store, &scheduler, GenerationStrategy::Heuristic).is_err());
}
