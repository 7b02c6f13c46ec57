//! End-to-end tests for the compute pipeline
//!
//! These run the whole parse, compute and export path against a small
//! on-disk match log and check the published tables byte for byte.

mod fixtures;

use fight_elo::export::{
    read_csv_table, LeaderboardRow, MatchRatingRow, RunManifest, LEADERBOARD_TABLE,
    MATCH_RATINGS_TABLE, STATS_TABLE,
};
use fight_elo::service::Pipeline;
use fight_elo::types::StatsRecord;

use fixtures::{config_for, SAMPLE_LOG, SAMPLE_ROWS};

const EXPECTED_LEADERBOARD: &str = "\
competitor,rating
Royce Gracie,1040.00
Ken Shamrock,998.85
Art Jimmerson,981.15
Patrick Smith,980.00
";

#[tokio::test]
async fn test_sample_log_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), SAMPLE_LOG);
    let out = config.output.dir.clone();

    let summary = Pipeline::new(config).unwrap().run().await.unwrap();

    assert_eq!(summary.rows_read, SAMPLE_ROWS);
    assert_eq!(summary.matches, 5);
    assert_eq!(summary.dropped_rows, 1);
    assert_eq!(summary.unrecognized_outcomes, 1);
    assert_eq!(summary.competitors, 4);

    let leaderboard = std::fs::read_to_string(out.join("current_fighters_elo.csv")).unwrap();
    assert_eq!(leaderboard, EXPECTED_LEADERBOARD);

    let stats: Vec<StatsRecord> = read_csv_table(&out.join("fighter_stats.csv")).unwrap();
    let names: Vec<&str> = stats.iter().map(|s| s.competitor.as_str()).collect();
    assert_eq!(
        names,
        vec!["Royce Gracie", "Art Jimmerson", "Ken Shamrock", "Patrick Smith"]
    );

    let ken = &stats[2];
    assert_eq!((ken.fights, ken.wins, ken.losses, ken.draws), (3, 1, 1, 1));
    assert_eq!(ken.strikes_landed, 27);
    assert_eq!(ken.takedowns, 5);
    assert_eq!(ken.knockdowns, 1);

    // The unrecognized "overturned" bout still counts as a fight
    let patrick = &stats[3];
    assert_eq!(patrick.fights, 2);
    assert_eq!(patrick.no_contests, 1);
    assert_eq!(patrick.strikes_landed, 13);

    let art = &stats[1];
    assert_eq!(art.strikes_landed, 22);
    assert_eq!(art.fights, art.wins + art.losses + art.draws + art.no_contests);
}

#[tokio::test]
async fn test_match_ratings_table_keeps_source_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), SAMPLE_LOG);
    let out = config.output.dir.clone();

    Pipeline::new(config).unwrap().run().await.unwrap();

    let rows: Vec<MatchRatingRow> = read_csv_table(&out.join("fights_with_elo.csv")).unwrap();
    let sequences: Vec<usize> = rows.iter().map(|r| r.sequence).collect();
    assert_eq!(sequences, vec![0, 1, 2, 4, 5]);

    let no_contest = &rows[3];
    assert_eq!(no_contest.outcome, "overturned");
    assert_eq!(no_contest.competitor_a_rating_before, no_contest.competitor_a_rating_after);
    assert_eq!(no_contest.competitor_b_rating_before, no_contest.competitor_b_rating_after);

    // Each bout starts from the previous bout's post-rating
    let rematch = &rows[2];
    assert_eq!(rematch.competitor_a_rating_before, 1020.0);
    assert_eq!(rematch.competitor_b_rating_before, 1020.0);
    assert_eq!(rematch.event.as_deref(), Some("UFC 1"));

    let header = std::fs::read_to_string(out.join("fights_with_elo.csv")).unwrap();
    assert!(header.starts_with("sequence,event,competitorA,competitorB,outcome,"));
}

#[tokio::test]
async fn test_manifest_describes_published_tables() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), SAMPLE_LOG);
    let out = config.output.dir.clone();

    let summary = Pipeline::new(config).unwrap().run().await.unwrap();

    let manifest: RunManifest =
        serde_json::from_str(&std::fs::read_to_string(out.join("manifest.json")).unwrap()).unwrap();
    assert_eq!(manifest.run_id, summary.run_id);
    assert_eq!(manifest.matches, 5);
    assert_eq!(manifest.unrecognized_outcomes, 1);
    assert_eq!(manifest.table(LEADERBOARD_TABLE).map(|t| t.rows), Some(4));
    assert_eq!(manifest.table(STATS_TABLE).map(|t| t.rows), Some(4));
    assert_eq!(manifest.table(MATCH_RATINGS_TABLE).map(|t| t.rows), Some(5));
    assert_eq!(manifest.rating["k_factor"], 40.0);
}

#[tokio::test]
async fn test_rerun_produces_identical_tables() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), SAMPLE_LOG);
    let out = config.output.dir.clone();
    let files = ["current_fighters_elo.csv", "fighter_stats.csv", "fights_with_elo.csv"];

    Pipeline::new(config.clone()).unwrap().run().await.unwrap();
    let first: Vec<Vec<u8>> = files.iter().map(|f| std::fs::read(out.join(f)).unwrap()).collect();

    Pipeline::new(config).unwrap().run().await.unwrap();
    let second: Vec<Vec<u8>> = files.iter().map(|f| std::fs::read(out.join(f)).unwrap()).collect();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_failed_run_leaves_previous_tables() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), SAMPLE_LOG);
    let out = config.output.dir.clone();

    Pipeline::new(config.clone()).unwrap().run().await.unwrap();
    let before = std::fs::read(out.join("current_fighters_elo.csv")).unwrap();

    // Same input path, but the outcome column is gone
    std::fs::write(&config.input.path, "fighter_1_name,fighter_2_name\nA,B\n").unwrap();
    let result = Pipeline::new(config).unwrap().run().await;
    assert!(result.is_err());

    let after = std::fs::read(out.join("current_fighters_elo.csv")).unwrap();
    assert_eq!(before, after);

    let staged: Vec<_> = std::fs::read_dir(&out)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(staged.is_empty());
}

#[tokio::test]
async fn test_header_only_log_publishes_empty_tables() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(
        dir.path(),
        "fighter_1_name,fighter_2_name,fighter_1_result\n",
    );
    let out = config.output.dir.clone();

    let summary = Pipeline::new(config).unwrap().run().await.unwrap();
    assert_eq!(summary.matches, 0);
    assert_eq!(summary.competitors, 0);

    let leaderboard: Vec<LeaderboardRow> =
        read_csv_table(&out.join("current_fighters_elo.csv")).unwrap();
    assert!(leaderboard.is_empty());
    assert_eq!(
        std::fs::read_to_string(out.join("current_fighters_elo.csv")).unwrap(),
        "competitor,rating\n"
    );
}

#[tokio::test]
async fn test_custom_vocabulary_reclassifies_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_for(dir.path(), SAMPLE_LOG);
    config.input.outcomes.no_contest.push("overturned".to_string());
    let out = config.output.dir.clone();

    let summary = Pipeline::new(config).unwrap().run().await.unwrap();
    assert_eq!(summary.unrecognized_outcomes, 0);

    let leaderboard = std::fs::read_to_string(out.join("current_fighters_elo.csv")).unwrap();
    assert_eq!(leaderboard, EXPECTED_LEADERBOARD);
}
