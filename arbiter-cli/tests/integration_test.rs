//! Integration tests for the Arbiter standings engine
//!
//! Tests the full stack: builder, accumulation, tiebreaks and ranking, using
//! hand-written tournaments and seeded random round-robins.

use arbiter_core::{
    CompetitorId, Format, GameResult, ScoringPreset, Tiebreak, Tournament, TournamentBuilder,
};
use arbiter_standings::{
    accumulate, buchholz, compute_standings, has_decisive_result, score_many, sonneborn_berger,
    Standings, StandingsConfig,
};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

const RESULTS: [GameResult; 6] = [
    GameResult::WhiteWin,
    GameResult::BlackWin,
    GameResult::Draw,
    GameResult::WhiteForfeitWin,
    GameResult::BlackForfeitWin,
    GameResult::DoubleForfeit,
];

/// Circle-method pairings; `None` marks the bye slot for odd fields
fn round_robin_pairings(n: u32) -> Vec<Vec<(Option<u32>, Option<u32>)>> {
    let mut slots: Vec<Option<u32>> = (1..=n).map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }
    let size = slots.len();

    let mut rounds = Vec::new();
    for _ in 0..size.saturating_sub(1) {
        let pairs: Vec<_> = (0..size / 2)
            .map(|i| (slots[i], slots[size - 1 - i]))
            .collect();
        rounds.push(pairs);
        slots[1..].rotate_right(1);
    }
    rounds
}

fn random_result(rng: &mut ChaCha8Rng) -> GameResult {
    // Mostly played games, occasional forfeits
    if rng.gen_bool(0.85) {
        *RESULTS[..3].choose(rng).unwrap()
    } else {
        *RESULTS[3..].choose(rng).unwrap()
    }
}

fn random_lone_tournament(seed: u64, players: u32) -> Tournament {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut builder = TournamentBuilder::new()
        .competitors(1..=players)
        .tiebreaks([
            Tiebreak::HeadToHead,
            Tiebreak::SonnebornBerger,
            Tiebreak::Buchholz,
            Tiebreak::GamesWon,
        ]);

    for (i, pairs) in round_robin_pairings(players).into_iter().enumerate() {
        builder = builder.round(i as u32 + 1);
        for pair in pairs {
            builder = match pair {
                (Some(a), Some(b)) => {
                    let (white, black) = if rng.gen_bool(0.5) { (a, b) } else { (b, a) };
                    builder.game(white, black, random_result(&mut rng))
                }
                (Some(id), None) | (None, Some(id)) => builder.bye(id),
                (None, None) => builder,
            };
        }
    }
    builder.build().unwrap()
}

fn random_team_tournament(seed: u64, teams: u32, boards: usize) -> Tournament {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut builder = TournamentBuilder::new()
        .team(boards)
        .preset(ScoringPreset::Alternative)
        .competitors(1..=teams)
        .tiebreaks([Tiebreak::GamePoints, Tiebreak::HeadToHead, Tiebreak::GamesWon]);

    for (i, pairs) in round_robin_pairings(teams).into_iter().enumerate() {
        builder = builder.round(i as u32 + 1);
        for pair in pairs {
            builder = match pair {
                (Some(a), Some(b)) => {
                    let results: Vec<GameResult> =
                        (0..boards).map(|_| random_result(&mut rng)).collect();
                    builder.team_match(a, b, &results)
                }
                (Some(id), None) | (None, Some(id)) => builder.team_bye(id),
                (None, None) => builder,
            };
        }
    }
    builder.build().unwrap()
}

fn ranks(standings: &Standings) -> Vec<(u32, u32)> {
    standings.iter().map(|s| (s.rank, s.competitor.0)).collect()
}

// ============================================================================
// WORKED EXAMPLES
// ============================================================================

#[test]
fn test_single_decisive_game() {
    let t = TournamentBuilder::new()
        .competitor(1, "A")
        .competitor(2, "B")
        .round(1)
        .game(1, 2, GameResult::WhiteWin)
        .build()
        .unwrap();
    let standings = compute_standings(&t).unwrap();

    assert_eq!(ranks(&standings), vec![(1, 1), (2, 2)]);
    let a = &standings.standings[0].score;
    assert_eq!((a.match_points, a.game_points, a.wins), (1.0, 1.0, 1));
    let b = &standings.standings[1].score;
    assert_eq!((b.match_points, b.game_points, b.losses), (0.0, 0.0, 1));
}

#[test]
fn test_split_two_board_match() {
    let t = TournamentBuilder::new()
        .team(2)
        .competitors([1, 2])
        .tiebreaks([Tiebreak::GamesWon])
        .round(1)
        .team_match(1, 2, &[GameResult::WhiteWin, GameResult::BlackWin])
        .build()
        .unwrap();
    let standings = compute_standings(&t).unwrap();

    assert_eq!(ranks(&standings), vec![(1, 1), (1, 2)]);
    for s in standings.iter() {
        assert_eq!(s.score.game_points, 1.0);
        assert_eq!(s.score.match_points, 1.0);
        assert_eq!(s.score.tiebreak(Tiebreak::GamesWon), Some(1.0));
    }
}

#[test]
fn test_double_forfeit_lone_game() {
    let t = TournamentBuilder::new()
        .competitors([1, 2])
        .round(1)
        .game(1, 2, GameResult::DoubleForfeit)
        .build()
        .unwrap();
    let standings = compute_standings(&t).unwrap();

    for s in standings.iter() {
        assert_eq!(s.score.game_points, 0.0);
        assert_eq!(s.score.games_played, 1);
    }
    assert!(standings.is_tied(CompetitorId(1)));
}

#[test]
fn test_head_to_head_three_way_falls_through() {
    // 1 beats 2, 2 beats 3, 3 beats 1; Sonneborn-Berger cannot separate a
    // symmetric cycle either, so all three share first place
    let t = TournamentBuilder::new()
        .competitors([1, 2, 3])
        .tiebreaks([Tiebreak::HeadToHead, Tiebreak::SonnebornBerger])
        .round(1)
        .game(1, 2, GameResult::WhiteWin)
        .bye(3)
        .round(2)
        .game(2, 3, GameResult::WhiteWin)
        .bye(1)
        .round(3)
        .game(3, 1, GameResult::WhiteWin)
        .bye(2)
        .build()
        .unwrap();
    let standings = compute_standings(&t).unwrap();

    assert_eq!(ranks(&standings), vec![(1, 1), (1, 2), (1, 3)]);
    assert!(standings
        .iter()
        .all(|s| s.score.tiebreak(Tiebreak::HeadToHead).is_none()));
}

// ============================================================================
// PROPERTIES OVER RANDOM TOURNAMENTS
// ============================================================================

#[test]
fn test_outcome_counts_match_games_played() {
    for seed in 0..20 {
        let t = random_lone_tournament(seed, 5 + (seed as u32 % 4));
        let table = accumulate(&t).unwrap();
        for s in table.iter() {
            assert_eq!(
                s.wins + s.draws + s.losses + s.byes,
                s.games_played,
                "seed {} competitor {}",
                seed,
                s.competitor
            );
        }

        let t = random_team_tournament(seed, 5, 4);
        let table = accumulate(&t).unwrap();
        for s in table.iter() {
            assert_eq!(s.wins + s.draws + s.losses + s.byes, s.games_played);
        }
    }
}

#[test]
fn test_team_match_points_are_conserved() {
    for seed in 0..20 {
        let t = random_team_tournament(seed, 6, 4);
        let scoring = *t.scoring();
        let table = accumulate(&t).unwrap();

        for s in table.iter() {
            for e in s.encounters.iter().filter(|e| !e.is_bye()) {
                let opponent = e.opponent.unwrap();
                let other = table
                    .get(opponent)
                    .unwrap()
                    .encounters
                    .iter()
                    .find(|o| o.round == e.round)
                    .unwrap();

                let total = e.match_points + other.match_points;
                assert!(
                    total == scoring.match_win + scoring.match_loss
                        || total == 2.0 * scoring.match_draw,
                    "seed {} round {}: {} + {}",
                    seed,
                    e.round,
                    e.match_points,
                    other.match_points
                );
            }
        }
    }
}

#[test]
fn test_all_draws_sonneborn_berger_is_half_buchholz() {
    let mut builder = TournamentBuilder::new().competitors(1..=7);
    for (i, pairs) in round_robin_pairings(7).into_iter().enumerate() {
        builder = builder.round(i as u32 + 1);
        for pair in pairs {
            builder = match pair {
                (Some(a), Some(b)) => builder.game(a, b, GameResult::Draw),
                (Some(id), None) | (None, Some(id)) => builder.bye(id),
                (None, None) => builder,
            };
        }
    }
    let table = accumulate(&builder.build().unwrap()).unwrap();

    for &id in table.ids() {
        assert!(!has_decisive_result(id, &table));
        assert_eq!(sonneborn_berger(id, &table), buchholz(id, &table) / 2.0);
    }
}

#[test]
fn test_aggregation_is_deterministic() {
    let batch: Vec<Tournament> = (0..8)
        .map(|seed| random_lone_tournament(seed, 9))
        .chain((0..8).map(|seed| random_team_tournament(seed, 7, 6)))
        .collect();

    let parallel = score_many(&batch, &StandingsConfig::default());
    let sequential = score_many(&batch, &StandingsConfig::sequential());
    assert_eq!(parallel, sequential);

    for (t, result) in batch.iter().zip(&parallel) {
        assert_eq!(&compute_standings(t), result);
    }
}

#[test]
fn test_excluding_round_removes_its_contribution() {
    for seed in 0..10 {
        let t = random_lone_tournament(seed, 6);
        let mut rng = ChaCha8Rng::seed_from_u64(seed + 1000);
        let excluded = rng.gen_range(1..=t.rounds().len() as u32);

        let full = accumulate(&t).unwrap();
        let partial = accumulate(&t.with_round_completed(excluded, false)).unwrap();
        assert_eq!(partial.rounds_counted() + 1, full.rounds_counted());

        for s in full.iter() {
            let p = partial.get(s.competitor).unwrap();
            let removed: f64 = s
                .encounters
                .iter()
                .filter(|e| e.round == excluded)
                .map(|e| e.points_for)
                .sum();

            assert_eq!(s.game_points - removed, p.game_points);
            assert_eq!(s.games_played - 1, p.games_played);
            assert!(p.encounters.iter().all(|e| e.round != excluded));
        }

        // Restoring the round restores the original standings
        let restored = t
            .with_round_completed(excluded, false)
            .with_round_completed(excluded, true);
        assert_eq!(compute_standings(&restored), compute_standings(&t));
    }
}

#[test]
fn test_standings_are_consistently_ranked() {
    for seed in 0..20 {
        for t in [random_lone_tournament(seed, 8), random_team_tournament(seed, 8, 4)] {
            let standings = compute_standings(&t).unwrap();
            let primary = |i: usize| {
                let score = &standings.standings[i].score;
                match standings.format {
                    Format::Team => score.match_points,
                    Format::Lone => score.game_points,
                }
            };

            for i in 0..standings.len() {
                let row = &standings.standings[i];
                let ahead = standings
                    .iter()
                    .filter(|other| other.rank < row.rank)
                    .count();
                assert_eq!(row.rank as usize, ahead + 1);

                if i > 0 {
                    let prev = &standings.standings[i - 1];
                    assert!(primary(i - 1) >= primary(i));
                    if prev.rank == row.rank {
                        assert_eq!(primary(i - 1), primary(i));
                        assert!(prev.competitor < row.competitor);
                    }
                }
            }
        }
    }
}

#[test]
fn test_scoring_override_changes_only_points() {
    let t = random_team_tournament(3, 6, 4);
    let standard = compute_standings(&t.with_scoring(ScoringPreset::Standard.system())).unwrap();
    let alternative = compute_standings(&t).unwrap();

    for s in standard.iter() {
        let other = alternative.standing_for(s.competitor).unwrap();
        assert_eq!(s.score.game_points, other.score.game_points);
        assert_eq!(s.score.match_wins, other.score.match_wins);
        assert_eq!(
            s.score.match_points,
            2.0 * f64::from(s.score.match_wins) + f64::from(s.score.match_draws) + byes(s, 2.0)
        );
    }

    fn byes(s: &arbiter_standings::Standing, value: f64) -> f64 {
        let count = s.score.encounters.iter().filter(|e| e.is_bye()).count();
        value * count as f64
    }
}
