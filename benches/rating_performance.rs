//! Performance benchmarks for rating calculations

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fight_elo::config::AppConfig;
use fight_elo::parser::MatchLogParser;
use fight_elo::rating::{RatingCalculator, RatingEngine};
use fight_elo::service::Pipeline;
use fight_elo::stats::StatsAggregator;
use fight_elo::types::{FightCounters, MatchRecord, Outcome};
use fight_elo::EloRatingCalculator;
use std::sync::Arc;

fn generate_records(count: usize, competitors: usize) -> Vec<MatchRecord> {
    let outcomes = [Outcome::AWins, Outcome::BWins, Outcome::Draw, Outcome::NoContest];

    (0..count)
        .map(|i| {
            let a = i % competitors;
            let b = (a + 1 + (i * 31) % (competitors - 1)) % competitors;
            MatchRecord::new(
                i,
                format!("fighter_{}", a),
                format!("fighter_{}", b),
                outcomes[i % outcomes.len()],
            )
            .with_counters(
                FightCounters {
                    knockdowns: (i % 2) as u64,
                    strikes_landed: (i % 80) as u64,
                    takedowns: (i % 4) as u64,
                    submission_attempts: (i % 3) as u64,
                },
                FightCounters {
                    knockdowns: 0,
                    strikes_landed: (i % 60) as u64,
                    takedowns: (i % 2) as u64,
                    submission_attempts: 0,
                },
            )
        })
        .collect()
}

fn match_log(count: usize) -> String {
    let mut log = String::from(
        "event,fighter_1_name,fighter_2_name,fighter_1_result,\
fighter_1_number_strikes,fighter_2_number_strikes\n",
    );
    for record in generate_records(count, 500) {
        let token = match record.outcome {
            Outcome::AWins => "win",
            Outcome::BWins => "loss",
            Outcome::Draw => "draw",
            Outcome::NoContest => "nc",
        };
        log.push_str(&format!(
            "Event {},{},{},{},{},{}\n",
            record.sequence / 12,
            record.competitor_a,
            record.competitor_b,
            token,
            record.counters_a.strikes_landed,
            record.counters_b.strikes_landed,
        ));
    }
    log
}

fn bench_single_bout(c: &mut Criterion) {
    let calculator = EloRatingCalculator::default();

    c.bench_function("elo_single_bout", |b| {
        b.iter(|| black_box(calculator.rate(black_box(1040.0), black_box(985.5), Outcome::Draw)))
    });
}

fn bench_rating_fold(c: &mut Criterion) {
    let engine = RatingEngine::elo(Default::default()).unwrap();
    let mut group = c.benchmark_group("rating_fold");

    for count in [1_000, 10_000] {
        let records = generate_records(count, 500);
        group.bench_with_input(BenchmarkId::from_parameter(count), &records, |b, records| {
            b.iter(|| black_box(engine.run(records)))
        });
    }
    group.finish();
}

fn bench_stats_aggregation(c: &mut Criterion) {
    let records = generate_records(10_000, 500);

    c.bench_function("stats_aggregation_10000", |b| {
        b.iter(|| black_box(StatsAggregator::run(&records)))
    });
}

fn bench_parse(c: &mut Criterion) {
    let log = match_log(10_000);
    let parser = MatchLogParser::default();

    c.bench_function("parse_10000_rows", |b| {
        b.iter(|| black_box(parser.parse_reader(log.as_bytes()).unwrap()))
    });
}

fn bench_concurrent_compute(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let pipeline = Pipeline::new(AppConfig::default()).unwrap();
    let records: Arc<[MatchRecord]> = generate_records(10_000, 500).into();

    c.bench_function("concurrent_compute_10000", |b| {
        b.iter(|| {
            rt.block_on(async {
                black_box(pipeline.compute(records.clone()).await.unwrap())
            })
        })
    });
}

criterion_group!(
    benches,
    bench_single_bout,
    bench_rating_fold,
    bench_stats_aggregation,
    bench_parse,
    bench_concurrent_compute
);
criterion_main!(benches);
