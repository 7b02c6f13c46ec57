//! Test fixtures shared by the integration tests
#![allow(dead_code)]

use fight_elo::config::AppConfig;
use fight_elo::export::{MatchRatingRow, RunManifest, TableSummary, LEADERBOARD_TABLE};
use fight_elo::query::{QueryService, StaticTableSource};
use fight_elo::rating::{RatingCalculator, RatingEngine};
use fight_elo::stats::StatsAggregator;
use fight_elo::types::{FightCounters, MatchRecord, Outcome};
use fight_elo::utils::{current_timestamp, generate_run_id};
use std::path::Path;
use std::sync::Arc;

/// A small card in the default scraper layout
///
/// Row 4 has no second competitor and is dropped; row 5 carries a token the
/// default vocabulary does not know and counts as a no-contest.
pub const SAMPLE_LOG: &str = "\
event,fighter_1_name,fighter_2_name,fighter_1_result,fighter_1_knockdowns_number,fighter_2_knockdowns_number,fighter_1_number_strikes,fighter_2_number_strikes,fighter_1_number_takedowns,fighter_2_number_takedowns,fighter_1_number_submissions,fighter_2_number_submissions
UFC 1,Royce Gracie,Art Jimmerson,win,0,0,10,2,1,0,1,0
UFC 1,Ken Shamrock,Patrick Smith,win,0,0,4,1,2,0,1,0
UFC 1,Royce Gracie,Ken Shamrock,win,0,0,3,5,1,1,1,0
UFC 1,Gerard Gordeau,,win,1,0,7,0,0,0,0,0
UFC 2,Patrick Smith,Art Jimmerson,overturned,--,,12,nan,0,0,0,0
UFC 2,Art Jimmerson,Ken Shamrock,draw,0,1,20,18,0,2,0,1
";

/// Number of data rows in [`SAMPLE_LOG`]
pub const SAMPLE_ROWS: usize = 6;

/// Write `contents` as the match log and point a default config at it
pub fn config_for(dir: &Path, contents: &str) -> AppConfig {
    let input = dir.join("fights.csv");
    std::fs::write(&input, contents).expect("write match log");

    let mut config = AppConfig::default();
    config.input.path = input;
    config.output.dir = dir.join("out");
    config
}

/// Records with deterministic names, cycling through every outcome
pub fn generate_records(count: usize, competitors: usize) -> Vec<MatchRecord> {
    let outcomes = [Outcome::AWins, Outcome::BWins, Outcome::Draw, Outcome::NoContest];
    let competitors = competitors.max(2);

    (0..count)
        .map(|i| {
            let a = i % competitors;
            let b = (i * 7 + 1) % competitors;
            let b = if a == b { (b + 1) % competitors } else { b };
            MatchRecord::new(
                i,
                format!("fighter_{}", a),
                format!("fighter_{}", b),
                outcomes[i % outcomes.len()],
            )
            .with_counters(
                FightCounters {
                    knockdowns: (i % 2) as u64,
                    strikes_landed: (i % 50) as u64,
                    takedowns: (i % 3) as u64,
                    submission_attempts: (i % 4) as u64,
                },
                FightCounters::default(),
            )
        })
        .collect()
}

/// In-memory tables computed from `records`, with every table present
pub fn static_source(records: &[MatchRecord]) -> StaticTableSource {
    let engine = RatingEngine::elo(Default::default()).expect("default rating config");
    let run = engine.run(records);
    let stats = StatsAggregator::run(records);
    let match_ratings: Vec<MatchRatingRow> =
        run.match_ratings.iter().map(MatchRatingRow::from).collect();

    let manifest = RunManifest {
        run_id: generate_run_id(),
        generated_at: current_timestamp(),
        input: "memory".to_string(),
        rows_read: records.len(),
        matches: records.len(),
        dropped_rows: 0,
        unrecognized_outcomes: 0,
        competitors: run.leaderboard.len(),
        rating: engine.calculator().config(),
        tables: vec![TableSummary {
            name: LEADERBOARD_TABLE.to_string(),
            file: "current_fighters_elo.csv".to_string(),
            rows: run.leaderboard.len(),
        }],
    };

    StaticTableSource {
        leaderboard: Some(run.leaderboard),
        stats: Some(stats),
        match_ratings: Some(match_ratings),
        manifest: Some(manifest),
    }
}

/// Query service over a static source with the default vocabulary
pub fn query_service(source: StaticTableSource) -> QueryService {
    QueryService::new(Arc::new(source), Default::default())
}

/// A four-bout card used by the query tests
pub fn sample_records() -> Vec<MatchRecord> {
    vec![
        MatchRecord::new(0, "Alpha", "Bravo", Outcome::AWins),
        MatchRecord::new(1, "Charlie", "Delta", Outcome::BWins),
        MatchRecord::new(2, "Alpha", "Delta", Outcome::Draw),
        MatchRecord::new(3, "Bravo", "Charlie", Outcome::NoContest),
    ]
}
