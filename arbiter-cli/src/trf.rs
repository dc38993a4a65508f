//! TRF16 import - FIDE Tournament Report Format to tournament values
//!
//! Player records (`001`) carry one cell per round: opponent start number,
//! colour and result code. Games are read from the white player's cell. When
//! team records (`013`) are present the report is a team event: teams are
//! numbered in record order and a match's boards follow the team lineups.
//!
//! ```text
//! 012 Club Championship
//! 142 3
//! 001    1 m    Alpha,Anna        1500 GRE    11111111 2000/01/01  2.0    1     2 w 1  0000 - U     3 b 0
//! 013 Knights                        1    2
//! ```

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use rustc_hash::FxHashMap;

use arbiter_core::{GameResult, Side, Tournament, TournamentBuilder};

// ============================================================================
// RECORD TYPES (Level 4 - Configuration)
// ============================================================================

/// One round cell of a player record
#[derive(Clone, Debug, PartialEq)]
enum RoundCell {
    Paired {
        opponent: u32,
        colour: Side,
        code: String,
    },
    Unpaired {
        code: String,
    },
}

#[derive(Clone, Debug)]
struct PlayerRecord {
    start: u32,
    name: String,
    cells: Vec<RoundCell>,
}

#[derive(Clone, Debug)]
struct TeamRecord {
    name: String,
    members: Vec<u32>,
}

/// Parsed report, keyed by start number
#[derive(Clone, Debug, Default)]
struct TrfReport {
    name: Option<String>,
    declared_rounds: Option<u32>,
    players: BTreeMap<u32, PlayerRecord>,
    teams: Vec<TeamRecord>,
}

/// A game seen from the team pairing it belongs to
#[derive(Clone, Copy, Debug)]
struct BoardGame {
    /// Lineup position deciding board order
    order: usize,
    white_team: u32,
    result: GameResult,
}

#[derive(Clone, Debug)]
struct TeamPairing {
    teams: (u32, u32),
    games: Vec<BoardGame>,
}

impl TeamPairing {
    /// Home is the team with white on board 1; colours are home's
    fn coloured(mut self) -> (u32, u32, Vec<(Side, GameResult)>) {
        self.games.sort_by_key(|g| g.order);
        let home = self.games.first().map_or(self.teams.0, |g| g.white_team);
        let away = if home == self.teams.0 { self.teams.1 } else { self.teams.0 };

        let boards = self
            .games
            .iter()
            .map(|g| {
                let colour = if g.white_team == home { Side::White } else { Side::Black };
                (colour, g.result)
            })
            .collect();
        (home, away, boards)
    }
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Build a tournament from TRF16 text
pub fn parse_trf(text: &str) -> Result<Tournament> {
    let report = parse_report(text)?;
    tracing::debug!(
        name = report.name.as_deref().unwrap_or(""),
        players = report.players.len(),
        teams = report.teams.len(),
        "parsed TRF report"
    );

    if report.teams.is_empty() {
        report.lone_tournament()
    } else {
        report.team_tournament()
    }
}

fn parse_report(text: &str) -> Result<TrfReport> {
    let mut report = TrfReport::default();

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let Some(code) = line.get(..3) else {
            continue;
        };
        let data = line.get(3..).unwrap_or("").trim();

        match code {
            "012" => report.name = Some(data.to_string()),
            "142" => {
                let rounds = data
                    .parse()
                    .with_context(|| format!("Line {}: bad round count {:?}", line_no, data))?;
                report.declared_rounds = Some(rounds);
            }
            "001" => {
                let player = parse_player(line)
                    .with_context(|| format!("Line {}: malformed player record", line_no))?;
                let start = player.start;
                if report.players.insert(start, player).is_some() {
                    bail!("Line {}: start number {} listed twice", line_no, start);
                }
            }
            "013" => {
                let team = parse_team(data)
                    .with_context(|| format!("Line {}: malformed team record", line_no))?;
                report.teams.push(team);
            }
            _ => {}
        }
    }

    Ok(report)
}

impl TrfReport {
    fn lone_tournament(&self) -> Result<Tournament> {
        let mut builder = TournamentBuilder::new().lone();
        for player in self.players.values() {
            builder = named(builder, player.start, &player.name);
        }

        for number in 1..=self.round_count() {
            let index = number as usize - 1;
            builder = builder.round(number);
            if !self.round_started(index) {
                builder = builder.incomplete();
            }

            for player in self.players.values() {
                match player.cells.get(index) {
                    Some(RoundCell::Paired {
                        opponent,
                        colour: Side::White,
                        code,
                    }) => {
                        let reply = self.reply_code(*opponent, player.start, index);
                        let result = game_result(code, reply).with_context(|| {
                            format!("Round {}: {} vs {}", number, player.start, opponent)
                        })?;
                        builder = builder.game(player.start, *opponent, result);
                    }
                    Some(RoundCell::Unpaired { code }) => {
                        if is_full_bye(code) {
                            builder = builder.bye(player.start);
                        } else if code.eq_ignore_ascii_case("H") {
                            tracing::warn!(
                                "Round {}: half-point bye for {} not scored",
                                number,
                                player.start
                            );
                        }
                    }
                    _ => {}
                }
            }
        }

        builder.build().context("Invalid tournament structure")
    }

    fn team_tournament(&self) -> Result<Tournament> {
        let lineup = self.lineup()?;

        let schedule = (1..=self.round_count())
            .map(|number| self.team_pairings(number, &lineup))
            .collect::<Result<Vec<_>>>()?;
        let boards = schedule
            .iter()
            .flatten()
            .map(|p| p.games.len())
            .max()
            .unwrap_or(1)
            .max(1);

        let mut builder = TournamentBuilder::new().team(boards);
        for (i, team) in self.teams.iter().enumerate() {
            builder = named(builder, i as u32 + 1, &team.name);
        }

        for (i, pairings) in schedule.into_iter().enumerate() {
            builder = builder.round(i as u32 + 1);
            if !self.round_started(i) {
                builder = builder.incomplete();
            }
            for pairing in pairings {
                let (home, away, boards) = pairing.coloured();
                builder = builder.team_match_coloured(home, away, &boards);
            }
        }

        builder.build().context("Invalid tournament structure")
    }

    /// Team pairings of one round, in order of first appearance
    fn team_pairings(
        &self,
        number: u32,
        lineup: &FxHashMap<u32, (u32, usize)>,
    ) -> Result<Vec<TeamPairing>> {
        let index = number as usize - 1;
        let mut pairings: Vec<TeamPairing> = Vec::new();

        for player in self.players.values() {
            let Some(RoundCell::Paired {
                opponent,
                colour: Side::White,
                code,
            }) = player.cells.get(index)
            else {
                continue;
            };

            let &(white_team, white_pos) = lineup
                .get(&player.start)
                .with_context(|| format!("Round {}: player {} has no team", number, player.start))?;
            let &(black_team, black_pos) = lineup
                .get(opponent)
                .with_context(|| format!("Round {}: player {} has no team", number, opponent))?;
            if white_team == black_team {
                bail!("Round {}: teammates {} and {} paired", number, player.start, opponent);
            }

            let result = game_result(code, self.reply_code(*opponent, player.start, index))
                .with_context(|| format!("Round {}: {} vs {}", number, player.start, opponent))?;
            let game = BoardGame {
                order: white_pos.min(black_pos),
                white_team,
                result,
            };

            let teams = (white_team.min(black_team), white_team.max(black_team));
            match pairings.iter_mut().find(|p| p.teams == teams) {
                Some(pairing) => pairing.games.push(game),
                None => pairings.push(TeamPairing {
                    teams,
                    games: vec![game],
                }),
            }
        }

        Ok(pairings)
    }

    // ========================================================================
    // Level 3 - Steps
    // ========================================================================

    /// Start number to (team id, lineup position)
    fn lineup(&self) -> Result<FxHashMap<u32, (u32, usize)>> {
        let mut lineup = FxHashMap::default();
        for (i, team) in self.teams.iter().enumerate() {
            for (position, &start) in team.members.iter().enumerate() {
                if lineup.insert(start, (i as u32 + 1, position)).is_some() {
                    bail!("Player {} is listed in more than one team", start);
                }
            }
        }
        Ok(lineup)
    }

    /// Declared round count, or the longest player record
    fn round_count(&self) -> u32 {
        let recorded = self
            .players
            .values()
            .map(|p| p.cells.len())
            .max()
            .unwrap_or(0) as u32;
        self.declared_rounds.unwrap_or(0).max(recorded)
    }

    fn round_started(&self, index: usize) -> bool {
        self.players.values().any(|p| index < p.cells.len())
    }

    /// Result code the opponent recorded for the same game
    fn reply_code(&self, opponent: u32, start: u32, index: usize) -> Option<&str> {
        match self.players.get(&opponent)?.cells.get(index)? {
            RoundCell::Paired { opponent, code, .. } if *opponent == start => Some(code.as_str()),
            _ => None,
        }
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn parse_player(line: &str) -> Result<PlayerRecord> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let start: u32 = tokens
        .get(1)
        .context("missing start number")?
        .parse()
        .context("bad start number")?;

    let rating_at = tokens
        .iter()
        .enumerate()
        .skip(3)
        .find(|(_, t)| t.len() == 4 && t.bytes().all(|b| b.is_ascii_digit()))
        .map(|(i, _)| i)
        .context("missing rating field")?;
    let name = tokens[3..rating_at].join(" ");

    // Rating, federation, FIDE id, birth date, points and rank precede the rounds
    let cells = tokens.get(rating_at + 6..).unwrap_or(&[]);
    if cells.len() % 3 != 0 {
        bail!("incomplete round cell");
    }
    let cells = cells
        .chunks(3)
        .map(parse_cell)
        .collect::<Result<Vec<_>>>()?;

    Ok(PlayerRecord { start, name, cells })
}

fn parse_cell(cell: &[&str]) -> Result<RoundCell> {
    let &[opponent, colour, code] = cell else {
        bail!("round cell needs opponent, colour and result");
    };
    let opponent: u32 = opponent
        .parse()
        .with_context(|| format!("bad opponent {:?}", opponent))?;
    let code = code.to_string();
    if opponent == 0 {
        return Ok(RoundCell::Unpaired { code });
    }

    let colour = match colour {
        "w" | "W" => Side::White,
        "b" | "B" => Side::Black,
        other => bail!("bad colour {:?}", other),
    };
    Ok(RoundCell::Paired {
        opponent,
        colour,
        code,
    })
}

fn parse_team(data: &str) -> Result<TeamRecord> {
    let tokens: Vec<&str> = data.split_whitespace().collect();
    let split = tokens
        .iter()
        .rposition(|t| t.parse::<u32>().is_err())
        .map_or(0, |i| i + 1);

    let name = tokens[..split].join(" ");
    let members = tokens[split..]
        .iter()
        .map(|t| t.parse::<u32>())
        .collect::<Result<Vec<_>, _>>()?;
    if name.is_empty() || members.is_empty() {
        bail!("team record needs a name and members");
    }
    Ok(TeamRecord { name, members })
}

/// Result from the white player's code; the black player's code only matters
/// for telling a double forfeit from a single one
fn game_result(white_code: &str, black_code: Option<&str>) -> Result<GameResult> {
    let result = match white_code.to_ascii_uppercase().as_str() {
        "1" | "W" => GameResult::WhiteWin,
        "0" | "L" => GameResult::BlackWin,
        "=" | "1/2" | "D" => GameResult::Draw,
        "+" => GameResult::WhiteForfeitWin,
        "-" if black_code == Some("-") => GameResult::DoubleForfeit,
        "-" => GameResult::BlackForfeitWin,
        _ => bail!("Unknown TRF result code: {:?}", white_code),
    };
    Ok(result)
}

/// Pairing-allocated and full-point byes
fn is_full_bye(code: &str) -> bool {
    code.eq_ignore_ascii_case("U") || code.eq_ignore_ascii_case("F")
}

fn named(builder: TournamentBuilder, id: u32, name: &str) -> TournamentBuilder {
    if name.is_empty() {
        builder.competitors([id])
    } else {
        builder.competitor(id, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbiter_core::{CompetitorId, Format};
    use arbiter_standings::compute_standings;

    const LONE: &str = "\
012 Club Championship
142 4
001    1 m    Alpha,Anna                        1500 GRE    11111111 2000/01/01  2.0    2     2 w 1  0000 - U     3 b 0
001    2 m    Beta,Bea                          1450 GRE    11111112 2001/01/01  1.5    3     1 b 0     3 w =  0000 - U
001    3 m    Gamma,Gus                         0000 GRE    11111113 2002/01/01  2.5    1  0000 - U     2 b =     1 w 1
";

    const TEAM: &str = "\
012 Team Cup
142 2
001    1 m    Player One                        1500 GRE    12345678 2000/01/01  2.0    1     3 w 1     3 b 1
001    2 m    Player Two                        1450 GRE    12345679 2001/01/01  0.5    3     4 b =     4 w -
001    3 m    Player Three                      1400 GRE    12345680 2002/01/01  0.0    4     1 b 0     1 w 0
001    4 m    Player Four                       1350 GRE    12345681 2003/01/01  0.5    2     2 w =     2 b -

013 Team Alpha                           1    2
013 Team Beta                            3    4
";

    #[test]
    fn test_lone_report() {
        let t = parse_trf(LONE).unwrap();

        assert_eq!(t.format(), Format::Lone);
        assert_eq!(t.competitor(CompetitorId(1)).unwrap().label(), "Alpha,Anna");
        assert_eq!(t.rounds().len(), 4);
        assert!(!t.rounds()[3].is_completed());

        let first = t.rounds()[0].matches();
        assert_eq!(first[0].games()[0].result(), GameResult::WhiteWin);
        assert!(first[1].is_bye());
        assert_eq!(first[1].home(), CompetitorId(3));

        let standings = compute_standings(&t).unwrap();
        let order: Vec<(u32, f64)> = standings
            .iter()
            .map(|s| (s.competitor.0, s.score.game_points))
            .collect();
        assert_eq!(order, vec![(3, 2.5), (1, 2.0), (2, 1.5)]);
    }

    #[test]
    fn test_team_report() {
        let t = parse_trf(TEAM).unwrap();

        assert_eq!(t.format(), Format::Team);
        assert_eq!(t.boards_per_match(), Some(2));
        assert_eq!(t.competitor(CompetitorId(1)).unwrap().label(), "Team Alpha");

        // Round 2: Beta has white on board 1, so it is the home team
        let m = &t.rounds()[1].matches()[0];
        assert_eq!(m.home(), CompetitorId(2));
        assert_eq!(m.games()[0].result(), GameResult::BlackWin);
        assert_eq!(m.games()[1].white(), Some(CompetitorId(1)));
        assert_eq!(m.games()[1].result(), GameResult::DoubleForfeit);

        let standings = compute_standings(&t).unwrap();
        let winner = standings.winner().unwrap();
        assert_eq!(winner.competitor, CompetitorId(1));
        assert_eq!(winner.score.match_points, 4.0);
        assert_eq!(winner.score.game_points, 2.5);
    }

    #[test]
    fn test_result_codes() {
        assert_eq!(game_result("1", Some("0")).unwrap(), GameResult::WhiteWin);
        assert_eq!(game_result("=", None).unwrap(), GameResult::Draw);
        assert_eq!(game_result("+", Some("-")).unwrap(), GameResult::WhiteForfeitWin);
        assert_eq!(game_result("-", Some("+")).unwrap(), GameResult::BlackForfeitWin);
        assert_eq!(game_result("-", Some("-")).unwrap(), GameResult::DoubleForfeit);
        assert!(game_result("?", None).is_err());
    }

    #[test]
    fn test_team_record_name_and_members() {
        let team = parse_team("Team Alpha   1   2   3").unwrap();
        assert_eq!(team.name, "Team Alpha");
        assert_eq!(team.members, vec![1, 2, 3]);
        assert!(parse_team("1 2 3").is_err());
    }

    #[test]
    fn test_rejects_bad_reports() {
        let no_rating = "001    1 m    Nameless\n";
        assert!(parse_trf(no_rating).is_err());

        let teamless: String = TEAM
            .lines()
            .filter(|line| !line.contains("Team Beta"))
            .map(|line| format!("{}\n", line))
            .collect();
        let err = parse_trf(&teamless).unwrap_err();
        assert!(format!("{:#}", err).contains("has no team"));
    }
}
