//! Aggregation of the unified match table into per-(season, team) away-goal
//! differentials.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::data::MatchRecord;

/// One team's away-performance summary for one season. `(season, team)` is
/// unique across the aggregated table.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamSeasonStat {
    pub season: i32,
    pub team: String,
    pub avg_goal_diff: f64,
}

/// Away-goal differential of a single fixture: actual away goals minus
/// expected away goals. Positive means the away side over-performed the
/// model.
pub fn goal_diff(record: &MatchRecord) -> f64 {
    record.away_goals as f64 - record.away_xg
}

/// Reduces the unified table to one mean differential per (season, team).
///
/// Only teams with away fixtures in every distinct season of the input are
/// retained; a team missing even one season is dropped entirely. The
/// denominator is the distinct-season count of the whole table, so an
/// off-schedule extra source changes which teams survive the filter. An empty
/// input yields an empty output.
///
/// The result is sorted by (season, team) so downstream tables and renders
/// are reproducible.
pub fn summarise(records: &[MatchRecord]) -> Vec<TeamSeasonStat> {
    let mut seasons = FxHashSet::default();
    let mut seasons_by_team: FxHashMap<&str, FxHashSet<i32>> = FxHashMap::default();
    for record in records {
        seasons.insert(record.season);
        seasons_by_team
            .entry(record.away_team.as_str())
            .or_default()
            .insert(record.season);
    }

    let mut accumulators: FxHashMap<(i32, &str), (f64, u32)> = FxHashMap::default();
    for record in records {
        let complete = seasons_by_team[record.away_team.as_str()].len() == seasons.len();
        if !complete {
            continue;
        }
        let (sum, count) = accumulators
            .entry((record.season, record.away_team.as_str()))
            .or_insert((0.0, 0));
        *sum += goal_diff(record);
        *count += 1;
    }

    let mut stats: Vec<_> = accumulators
        .into_iter()
        .map(|((season, team), (sum, count))| TeamSeasonStat {
            season,
            team: String::from(team),
            avg_goal_diff: sum / count as f64,
        })
        .collect();
    stats.sort_by(|a, b| a.season.cmp(&b.season).then_with(|| a.team.cmp(&b.team)));
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::*;

    fn away_record(season: i32, away_team: &str, away_goals: u32, away_xg: f64) -> MatchRecord {
        MatchRecord {
            home_team: String::from("Host"),
            away_team: String::from(away_team),
            home_goals: 1,
            away_goals,
            home_xg: 1.3,
            away_xg,
            season,
        }
    }

    #[test]
    fn empty_table_yields_empty_stats() {
        assert!(summarise(&[]).is_empty());
    }

    #[test]
    fn single_record_yields_its_own_differential() {
        let stats = summarise(&[away_record(2016, "A", 2, 1.2)]);
        assert_eq!(1, stats.len());
        assert_eq!(2016, stats[0].season);
        assert_eq!("A", stats[0].team);
        assert_float_absolute_eq!(0.8, stats[0].avg_goal_diff);
    }

    #[test]
    fn one_row_per_season_for_complete_team() {
        let stats = summarise(&[
            away_record(2016, "A", 2, 1.2),
            away_record(2017, "A", 0, 1.5),
        ]);
        assert_eq!(2, stats.len());
        assert_eq!((2016, "A"), (stats[0].season, stats[0].team.as_str()));
        assert_float_absolute_eq!(0.8, stats[0].avg_goal_diff);
        assert_eq!((2017, "A"), (stats[1].season, stats[1].team.as_str()));
        assert_float_absolute_eq!(-1.5, stats[1].avg_goal_diff);
    }

    #[test]
    fn incomplete_team_dropped_from_every_season() {
        let stats = summarise(&[
            away_record(2016, "A", 2, 1.2),
            away_record(2016, "B", 1, 0.9),
            away_record(2017, "A", 0, 1.5),
        ]);
        assert!(stats.iter().all(|stat| stat.team != "B"));
        assert_eq!(2, stats.len());
    }

    #[test]
    fn mean_taken_within_each_group_only() {
        let stats = summarise(&[
            away_record(2016, "A", 3, 1.0),
            away_record(2016, "A", 0, 1.0),
            away_record(2017, "A", 1, 0.5),
        ]);
        assert_eq!(2, stats.len());
        // (3 - 1.0 + 0 - 1.0) / 2
        assert_float_absolute_eq!(0.5, stats[0].avg_goal_diff);
        assert_float_absolute_eq!(0.5, stats[1].avg_goal_diff);
    }

    #[test]
    fn completeness_measured_against_global_season_set() {
        // "B" covers 2016 and 2017, but the off-schedule 2018 source widens
        // the global season set and knocks it out.
        let stats = summarise(&[
            away_record(2016, "A", 2, 1.2),
            away_record(2016, "B", 1, 0.9),
            away_record(2017, "A", 0, 1.5),
            away_record(2017, "B", 2, 2.1),
            away_record(2018, "A", 1, 1.1),
        ]);
        assert!(stats.iter().all(|stat| stat.team == "A"));
        assert_eq!(3, stats.len());
    }

    #[test]
    fn home_fixtures_never_contribute() {
        // "A" hosts in 2017 but never plays away that season.
        let mut hosted = away_record(2017, "X", 1, 1.0);
        hosted.home_team = String::from("A");
        let stats = summarise(&[away_record(2016, "A", 2, 1.2), hosted]);
        assert!(stats.iter().all(|stat| stat.team != "A"));
    }

    #[test]
    fn deterministic_across_runs() {
        let records = vec![
            away_record(2017, "B", 2, 2.1),
            away_record(2016, "A", 2, 1.2),
            away_record(2017, "A", 0, 1.5),
            away_record(2016, "B", 1, 0.9),
        ];
        let first = summarise(&records);
        let second = summarise(&records);
        assert_eq!(first, second);
        let keys: Vec<_> = first
            .iter()
            .map(|stat| (stat.season, stat.team.clone()))
            .collect();
        assert_eq!(
            vec![
                (2016, String::from("A")),
                (2016, String::from("B")),
                (2017, String::from("A")),
                (2017, String::from("B"))
            ],
            keys
        );
    }
}
