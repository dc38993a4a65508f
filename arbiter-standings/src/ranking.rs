//! Ordering competitors by primary score and configured tiebreaks
//!
//! Level 3 - Steps

use std::cmp::Ordering;

use arbiter_core::{CompetitorId, Tiebreak};

use crate::score::ScoreTable;
use crate::tiebreak::{registry, TiebreakFn};

/// Compute tiebreak values and return `(rank, competitor)` in final order.
///
/// Scalar tiebreaks are recorded for every competitor. A pairwise tiebreak is
/// only evaluated, and only recorded, for a tie group of exactly two.
pub fn rank_competitors(table: &mut ScoreTable, tiebreaks: &[Tiebreak]) -> Vec<(u32, CompetitorId)> {
    record_scalar_tiebreaks(table, tiebreaks);

    let ids = table.ids().to_vec();
    let mut groups = Vec::new();
    for group in split_ties(ids, |id| table.primary_points(id)) {
        refine(group, tiebreaks, table, &mut groups);
    }

    assign_ranks(groups)
}

fn record_scalar_tiebreaks(table: &mut ScoreTable, tiebreaks: &[Tiebreak]) {
    for &tiebreak in tiebreaks {
        if let TiebreakFn::Scalar(f) = registry(tiebreak) {
            let snapshot: &ScoreTable = table;
            let values: Vec<(CompetitorId, f64)> =
                snapshot.ids().iter().map(|&id| (id, f(id, snapshot))).collect();
            for (id, value) in values {
                table.set_tiebreak(id, tiebreak, value);
            }
        }
    }
}

/// Break one tie group with the remaining tiebreaks, pushing the resulting
/// groups in order
fn refine(
    group: Vec<CompetitorId>,
    tiebreaks: &[Tiebreak],
    table: &mut ScoreTable,
    out: &mut Vec<Vec<CompetitorId>>,
) {
    let Some((&tiebreak, rest)) = tiebreaks.split_first() else {
        out.push(group);
        return;
    };
    if group.len() < 2 {
        out.push(group);
        return;
    }

    match registry(tiebreak) {
        TiebreakFn::Scalar(_) => {
            let value = |id: CompetitorId| {
                table
                    .get(id)
                    .and_then(|s| s.tiebreak(tiebreak))
                    .unwrap_or(0.0)
            };
            for sub in split_ties(group, value) {
                refine(sub, rest, table, out);
            }
        }
        TiebreakFn::Pairwise(f) => {
            if let &[a, b] = group.as_slice() {
                let (va, vb) = (f(a, b, table), f(b, a, table));
                table.set_tiebreak(a, tiebreak, va);
                table.set_tiebreak(b, tiebreak, vb);

                match on_grid(vb).cmp(&on_grid(va)) {
                    Ordering::Less => {
                        out.push(vec![a]);
                        out.push(vec![b]);
                        return;
                    }
                    Ordering::Greater => {
                        out.push(vec![b]);
                        out.push(vec![a]);
                        return;
                    }
                    Ordering::Equal => {}
                }
            }
            // Neutral, or three or more tied: fall through
            refine(group, rest, table, out);
        }
    }
}

/// Sort by key descending (ties by ascending id) and split into runs of equal key
fn split_ties(
    ids: Vec<CompetitorId>,
    key: impl Fn(CompetitorId) -> f64,
) -> Vec<Vec<CompetitorId>> {
    let mut keyed: Vec<(i64, CompetitorId)> =
        ids.into_iter().map(|id| (on_grid(key(id)), id)).collect();
    keyed.sort_by(|&(ka, a), &(kb, b)| kb.cmp(&ka).then_with(|| a.cmp(&b)));

    let mut groups: Vec<Vec<CompetitorId>> = Vec::new();
    let mut last: Option<i64> = None;
    for (value, id) in keyed {
        match groups.last_mut() {
            Some(group) if last == Some(value) => group.push(id),
            _ => groups.push(vec![id]),
        }
        last = Some(value);
    }
    groups
}

/// Point values compared at this resolution; summation order cannot split a tie
const POINT_GRID: f64 = 1e6;

fn on_grid(value: f64) -> i64 {
    (value * POINT_GRID).round() as i64
}

/// Competition ranking: a group of n tied at rank r pushes the next to r + n
fn assign_ranks(groups: Vec<Vec<CompetitorId>>) -> Vec<(u32, CompetitorId)> {
    let mut ranked = Vec::new();
    for group in groups {
        let rank = ranked.len() as u32 + 1;
        ranked.extend(group.into_iter().map(|id| (rank, id)));
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::accumulate;
    use arbiter_core::{GameResult, ScoringSystem, TournamentBuilder};

    fn ids(ranked: &[(u32, CompetitorId)]) -> Vec<(u32, u32)> {
        ranked.iter().map(|&(rank, id)| (rank, id.0)).collect()
    }

    #[test]
    fn test_split_ties_orders_by_key_then_id() {
        let ids_in = vec![CompetitorId(3), CompetitorId(1), CompetitorId(2)];
        let groups = split_ties(ids_in, |id| if id.0 == 2 { 5.0 } else { 1.0 });
        assert_eq!(
            groups,
            vec![vec![CompetitorId(2)], vec![CompetitorId(1), CompetitorId(3)]]
        );
    }

    #[test]
    fn test_split_ties_ignores_summation_noise() {
        let ids_in = vec![CompetitorId(1), CompetitorId(2)];
        let groups = split_ties(ids_in, |id| {
            if id.0 == 1 {
                0.1 + 0.1 + 1.0
            } else {
                0.1 + 1.0 + 0.1
            }
        });
        assert_eq!(groups, vec![vec![CompetitorId(1), CompetitorId(2)]]);
    }

    #[test]
    fn test_fractional_bye_value_keeps_tie() {
        // 1 and 2 reach the same total with byes in different rounds
        let t = TournamentBuilder::new()
            .scoring(ScoringSystem::default().with_bye(0.1, 0.1))
            .competitors([1, 2, 3, 4])
            .round(1)
            .bye(1)
            .bye(2)
            .game(3, 4, GameResult::Draw)
            .round(2)
            .bye(1)
            .game(2, 3, GameResult::WhiteWin)
            .bye(4)
            .round(3)
            .game(1, 4, GameResult::WhiteWin)
            .bye(2)
            .bye(3)
            .build()
            .unwrap();
        let mut table = accumulate(&t).unwrap();
        assert_ne!(
            table.game_points(CompetitorId(1)).to_bits(),
            table.game_points(CompetitorId(2)).to_bits()
        );

        let ranked = rank_competitors(&mut table, &[]);
        assert_eq!(&ids(&ranked)[..2], &[(1, 1), (1, 2)]);
    }

    #[test]
    fn test_assign_competition_ranks() {
        let groups = vec![
            vec![CompetitorId(4)],
            vec![CompetitorId(1), CompetitorId(2)],
            vec![CompetitorId(3)],
        ];
        assert_eq!(ids(&assign_ranks(groups)), vec![(1, 4), (2, 1), (2, 2), (4, 3)]);
    }

    #[test]
    fn test_tiebreak_applies_only_within_ties() {
        let t = TournamentBuilder::new()
            .competitors([1, 2, 3, 4])
            .round(1)
            .game(1, 4, GameResult::Draw)
            .game(2, 3, GameResult::BlackWin)
            .round(2)
            .game(1, 2, GameResult::Draw)
            .game(3, 4, GameResult::WhiteWin)
            .build()
            .unwrap();
        let mut table = accumulate(&t).unwrap();
        let ranked = rank_competitors(&mut table, &[Tiebreak::Buchholz]);

        // 3 on 2, 1 on 1, then 2 and 4 on 0.5 with Buchholz 3 each
        assert_eq!(ids(&ranked), vec![(1, 3), (2, 1), (3, 2), (3, 4)]);
        assert_eq!(table.get(CompetitorId(2)).unwrap().tiebreak(Tiebreak::Buchholz), Some(3.0));
    }

    #[test]
    fn test_head_to_head_separates_pair() {
        // 1 beats 2, both lose to 3 and beat 4
        let t = TournamentBuilder::new()
            .competitors([1, 2, 3, 4])
            .round(1)
            .game(1, 2, GameResult::WhiteWin)
            .game(3, 4, GameResult::Draw)
            .round(2)
            .game(3, 1, GameResult::WhiteWin)
            .game(2, 4, GameResult::WhiteWin)
            .round(3)
            .game(2, 3, GameResult::Draw)
            .game(4, 1, GameResult::Draw)
            .build()
            .unwrap();
        let mut table = accumulate(&t).unwrap();
        assert_eq!(table.game_points(CompetitorId(1)), 1.5);
        assert_eq!(table.game_points(CompetitorId(2)), 1.5);

        let ranked = rank_competitors(&mut table, &[Tiebreak::HeadToHead]);
        assert_eq!(ids(&ranked), vec![(1, 3), (2, 1), (3, 2), (4, 4)]);
        assert_eq!(table.get(CompetitorId(1)).unwrap().tiebreak(Tiebreak::HeadToHead), Some(1.0));
        assert_eq!(table.get(CompetitorId(3)).unwrap().tiebreak(Tiebreak::HeadToHead), None);
    }

    #[test]
    fn test_head_to_head_falls_through_for_three_way_tie() {
        // Cycle: 1 beats 2, 2 beats 3, 3 beats 1
        let t = TournamentBuilder::new()
            .competitors([1, 2, 3])
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
        let mut table = accumulate(&t).unwrap();

        let ranked = rank_competitors(&mut table, &[Tiebreak::HeadToHead, Tiebreak::GamesWon]);
        assert_eq!(ids(&ranked), vec![(1, 1), (1, 2), (1, 3)]);
        for id in 1..=3 {
            let score = table.get(CompetitorId(id)).unwrap();
            assert_eq!(score.tiebreak(Tiebreak::HeadToHead), None);
            assert_eq!(score.tiebreak(Tiebreak::GamesWon), Some(1.0));
        }
    }

    #[test]
    fn test_head_to_head_neutral_when_never_met() {
        let t = TournamentBuilder::new()
            .competitors([1, 2, 3, 4])
            .round(1)
            .game(1, 3, GameResult::WhiteWin)
            .game(2, 4, GameResult::WhiteWin)
            .build()
            .unwrap();
        let mut table = accumulate(&t).unwrap();

        let ranked = rank_competitors(&mut table, &[Tiebreak::HeadToHead]);
        assert_eq!(ids(&ranked), vec![(1, 1), (1, 2), (3, 3), (3, 4)]);
        assert_eq!(table.get(CompetitorId(1)).unwrap().tiebreak(Tiebreak::HeadToHead), Some(0.0));
    }
}
