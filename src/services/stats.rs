//! Win/loss aggregation and rankings, recomputed on read from raw match
//! history. Nothing here is cached or persisted.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;

/// One participant entry inside a match's `participants` column.
#[derive(Debug, Clone, Deserialize)]
pub struct Participant {
    #[serde(rename = "playerId")]
    pub player_id: String,
    pub team: String,
}

/// Win/loss record for a single player.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WinLoss {
    pub wins: u32,
    pub losses: u32,
}

impl WinLoss {
    pub fn total_matches(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn win_percentage(&self) -> f64 {
        let total = self.total_matches();
        if total == 0 {
            return 0.0;
        }
        f64::from(self.wins) / f64::from(total) * 100.0
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RosterPlayer {
    pub id: Uuid,
    pub screen_name: String,
    pub real_name: Option<String>,
    pub hide_real_name: Option<bool>,
}

impl RosterPlayer {
    /// Screen name when the player hides their real name, otherwise the
    /// real name, falling back to the screen name.
    pub fn display_name(&self) -> &str {
        if self.hide_real_name.unwrap_or(false) {
            return &self.screen_name;
        }
        self.real_name.as_deref().unwrap_or(&self.screen_name)
    }
}

#[derive(Debug, Serialize)]
pub struct RankedPlayer {
    pub id: Uuid,
    #[serde(rename = "screenName")]
    pub screen_name: String,
    #[serde(rename = "realName")]
    pub real_name: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub wins: u32,
    pub losses: u32,
    pub rank: u32,
}

/// Normalize a stored participants value into participant entries.
///
/// Legacy rows hold the array JSON-encoded as a string; current rows hold
/// the array directly. Anything else is a decode error for that match.
pub fn parse_participants(raw: &Value) -> Result<Vec<Participant>, serde_json::Error> {
    match raw {
        Value::String(s) => serde_json::from_str(s),
        other => serde_json::from_value(other.clone()),
    }
}

/// Fold a player's candidate matches into a win/loss record.
///
/// Candidates come from the coarse substring filter, so every match is
/// re-checked for an exact `playerId` hit before it may count. A match
/// whose participants cannot be decoded contributes to neither side, and
/// never aborts the rest of the batch.
pub fn compute_win_loss(player_id: &str, matches: &[(String, Value)]) -> WinLoss {
    let mut record = WinLoss::default();

    for (outcome, raw_participants) in matches {
        let participants = match parse_participants(raw_participants) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("Skipping match with undecodable participants: {e}");
                continue;
            }
        };

        // Substring candidates can be false positives (e.g. "p1" inside
        // "p10"); only an exact id hit counts.
        let Some(entry) = participants.iter().find(|p| p.player_id == player_id) else {
            continue;
        };

        if entry.team.eq_ignore_ascii_case(outcome) {
            record.wins += 1;
        } else {
            record.losses += 1;
        }
    }

    record
}

/// Order standings by wins and assign positional ranks.
///
/// The sort is stable, so equal win counts keep roster order and each
/// position gets its own rank number; ties never share a rank.
pub fn build_rankings(mut standings: Vec<(RosterPlayer, WinLoss)>) -> Vec<RankedPlayer> {
    standings.sort_by(|a, b| b.1.wins.cmp(&a.1.wins));

    standings
        .into_iter()
        .enumerate()
        .map(|(i, (player, record))| {
            let display_name = player.display_name().to_string();
            RankedPlayer {
                id: player.id,
                screen_name: player.screen_name,
                real_name: player.real_name,
                display_name,
                wins: record.wins,
                losses: record.losses,
                rank: i as u32 + 1,
            }
        })
        .collect()
}

/// All matches whose serialized participants mention `player_id`.
///
/// This is the coarse containment filter inherited from the storage query
/// pattern; callers must re-check exact participation before attributing
/// anything (see [`compute_win_loss`]).
pub async fn candidate_matches(db: &PgPool, player_id: &str) -> AppResult<Vec<(String, Value)>> {
    let rows: Vec<(String, Value)> = sqlx::query_as(
        "SELECT outcome, participants FROM matches WHERE participants::text LIKE '%' || $1 || '%'",
    )
    .bind(player_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn player_stats(db: &PgPool, player_id: &str) -> AppResult<WinLoss> {
    let matches = candidate_matches(db, player_id).await?;
    Ok(compute_win_loss(player_id, &matches))
}

/// Compute standings for every known player and rank them.
///
/// Any fetch failure aborts the whole computation; partial rankings are
/// never returned.
pub async fn rankings(db: &PgPool) -> AppResult<Vec<RankedPlayer>> {
    let roster: Vec<RosterPlayer> =
        sqlx::query_as("SELECT id, screen_name, real_name, hide_real_name FROM players")
            .fetch_all(db)
            .await?;

    let mut standings = Vec::with_capacity(roster.len());
    for player in roster {
        let record = player_stats(db, &player.id.to_string()).await?;
        standings.push((player, record));
    }

    Ok(build_rankings(standings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(id: &str, team: &str) -> Value {
        json!({"playerId": id, "playerName": id, "team": team})
    }

    fn structured(entries: &[(&str, &str)]) -> Value {
        Value::Array(entries.iter().map(|(id, team)| entry(id, team)).collect())
    }

    fn serialized(entries: &[(&str, &str)]) -> Value {
        Value::String(structured(entries).to_string())
    }

    fn roster_player(screen: &str, real: Option<&str>, hide: Option<bool>) -> RosterPlayer {
        RosterPlayer {
            id: Uuid::new_v4(),
            screen_name: screen.to_string(),
            real_name: real.map(String::from),
            hide_real_name: hide,
        }
    }

    #[test]
    fn test_win_and_loss_attribution() {
        // p1 on home, home wins -> win; p1 on away, home wins -> loss
        let matches = vec![
            ("home".to_string(), structured(&[("p1", "home"), ("p2", "away")])),
            ("home".to_string(), structured(&[("p1", "away"), ("p2", "home")])),
        ];

        let record = compute_win_loss("p1", &matches);
        assert_eq!(record, WinLoss { wins: 1, losses: 1 });

        let record = compute_win_loss("p2", &matches);
        assert_eq!(record, WinLoss { wins: 1, losses: 1 });
    }

    #[test]
    fn test_substring_id_is_not_attributed() {
        // "p1" is a substring of "p10": the coarse filter would surface this
        // match for both, but only "p10" actually played.
        let matches = vec![("home".to_string(), structured(&[("p10", "home")]))];

        assert_eq!(compute_win_loss("p1", &matches), WinLoss::default());
        assert_eq!(
            compute_win_loss("p10", &matches),
            WinLoss { wins: 1, losses: 0 }
        );
    }

    #[test]
    fn test_wins_plus_losses_equals_played_matches() {
        let matches = vec![
            ("home".to_string(), structured(&[("p1", "home")])),
            ("away".to_string(), structured(&[("p1", "home")])),
            ("home".to_string(), structured(&[("p1", "away")])),
            // not actually a participant
            ("home".to_string(), structured(&[("p19", "home")])),
            // undecodable participants
            ("home".to_string(), Value::String("not json".to_string())),
        ];

        let record = compute_win_loss("p1", &matches);
        assert_eq!(record.wins + record.losses, 3);
        assert_eq!(record.total_matches(), 3);
    }

    #[test]
    fn test_serialized_and_structured_parse_identically() {
        let as_array = vec![("home".to_string(), structured(&[("p1", "home")]))];
        let as_string = vec![("home".to_string(), serialized(&[("p1", "home")]))];

        assert_eq!(
            compute_win_loss("p1", &as_array),
            compute_win_loss("p1", &as_string)
        );
        assert_eq!(compute_win_loss("p1", &as_array).wins, 1);
    }

    #[test]
    fn test_malformed_match_does_not_poison_the_batch() {
        let clean = vec![
            ("home".to_string(), structured(&[("p1", "home")])),
            ("away".to_string(), structured(&[("p1", "home")])),
        ];
        let mut with_garbage = clean.clone();
        with_garbage.insert(1, ("home".to_string(), Value::String("{broken".to_string())));
        with_garbage.push(("away".to_string(), json!({"playerId": "p1"})));

        assert_eq!(
            compute_win_loss("p1", &clean),
            compute_win_loss("p1", &with_garbage)
        );
    }

    #[test]
    fn test_unrecognized_outcome_counts_as_loss() {
        // Anything that is not an equality match with the recorded team is a
        // loss; there is no third bucket.
        let matches = vec![("cancelled".to_string(), structured(&[("p1", "home")]))];
        assert_eq!(
            compute_win_loss("p1", &matches),
            WinLoss { wins: 0, losses: 1 }
        );
    }

    #[test]
    fn test_outcome_comparison_is_case_insensitive() {
        let matches = vec![("HOME".to_string(), structured(&[("p1", "home")]))];
        assert_eq!(
            compute_win_loss("p1", &matches),
            WinLoss { wins: 1, losses: 0 }
        );
    }

    #[test]
    fn test_win_percentage() {
        assert_eq!(WinLoss::default().win_percentage(), 0.0);
        assert_eq!(WinLoss { wins: 1, losses: 1 }.win_percentage(), 50.0);
        assert_eq!(WinLoss { wins: 3, losses: 0 }.win_percentage(), 100.0);
    }

    #[test]
    fn test_tied_wins_get_distinct_positional_ranks() {
        let standings = vec![
            (roster_player("alice", None, None), WinLoss { wins: 5, losses: 0 }),
            (roster_player("bob", None, None), WinLoss { wins: 5, losses: 2 }),
            (roster_player("carol", None, None), WinLoss { wins: 3, losses: 1 }),
        ];

        let ranked = build_rankings(standings);
        let names: Vec<&str> = ranked.iter().map(|r| r.screen_name.as_str()).collect();
        let ranks: Vec<u32> = ranked.iter().map(|r| r.rank).collect();

        // Stable sort keeps roster order for the tie; ranks are positional.
        assert_eq!(names, vec!["alice", "bob", "carol"]);
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_ranking_sorts_descending_by_wins() {
        let standings = vec![
            (roster_player("low", None, None), WinLoss { wins: 1, losses: 5 }),
            (roster_player("high", None, None), WinLoss { wins: 9, losses: 0 }),
        ];

        let ranked = build_rankings(standings);
        assert_eq!(ranked[0].screen_name, "high");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].screen_name, "low");
        assert_eq!(ranked[1].rank, 2);
    }

    #[test]
    fn test_display_name_resolution() {
        let hidden = roster_player("ace", Some("Alice Example"), Some(true));
        assert_eq!(hidden.display_name(), "ace");

        let shown = roster_player("ace", Some("Alice Example"), Some(false));
        assert_eq!(shown.display_name(), "Alice Example");

        let unset = roster_player("ace", Some("Alice Example"), None);
        assert_eq!(unset.display_name(), "Alice Example");

        let no_real_name = roster_player("ace", None, None);
        assert_eq!(no_real_name.display_name(), "ace");
    }

    #[test]
    fn test_two_player_ranking_scenario() {
        let p1_matches = vec![
            ("home".to_string(), structured(&[("p1", "home"), ("p2", "away")])),
            ("home".to_string(), structured(&[("p1", "away"), ("p2", "home")])),
        ];
        let p2_matches = vec![
            ("home".to_string(), structured(&[("p2", "away")])),
            ("away".to_string(), structured(&[("p2", "home")])),
        ];

        let p1 = compute_win_loss("p1", &p1_matches);
        let p2 = compute_win_loss("p2", &p2_matches);
        assert_eq!(p1, WinLoss { wins: 1, losses: 1 });
        assert_eq!(p2, WinLoss { wins: 0, losses: 2 });

        let ranked = build_rankings(vec![
            (roster_player("p1", None, None), p1),
            (roster_player("p2", None, None), p2),
        ]);
        assert_eq!(ranked[0].screen_name, "p1");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].screen_name, "p2");
        assert_eq!(ranked[1].rank, 2);
    }

    #[test]
    fn test_parse_rejects_non_array_values() {
        assert!(parse_participants(&Value::Null).is_err());
        assert!(parse_participants(&json!({"playerId": "p1", "team": "home"})).is_err());
        assert!(parse_participants(&Value::String("42".to_string())).is_err());
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let raw = json!([{"playerId": "p1", "playerName": "Alice", "team": "home", "seed": 4}]);
        let parsed = parse_participants(&raw).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].player_id, "p1");
        assert_eq!(parsed[0].team, "home");
    }
}
