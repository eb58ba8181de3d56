
use colstat_summary::cell::RawCell;
use colstat_summary::column::ColumnSummary;
use colstat_summary::config::SummaryConfig;
use colstat_summary::errors::Error;
use colstat_summary::merge::{Mergeable, tree_reduce};
use colstat_summary::report::ColumnReport;
use colstat_summary::synthetic::SyntheticConfig;
use colstat_summary::table::{ColumnAccumulator, TableSummary};
use test_helpers::{assert_same_summary, summarize_rows, synthetic_rows};

const ROWS: usize = 100_000;
const SEED: u64 = 0x5eed;

fn check_binary_column(summary: &ColumnSummary, report: &ColumnReport) {
    assert_eq!(summary.count(), ROWS as u64);
    assert_eq!(summary.missing_count(), 0);
    assert_eq!(summary.min(), Ok(0.0));
    assert_eq!(summary.max(), Ok(1.0));
    assert!((summary.mean().unwrap() - 0.5).abs() < 0.01);
    assert!((summary.sigma().unwrap() - 0.5).abs() < 0.01);
    assert_eq!(
        summary.histogram().total() + summary.zero_count(),
        summary.count()
    );

    let ColumnReport::Number(report) = report else {
        panic!("expected a number column, got {report:?}");
    };
    assert_eq!(report.n, ROWS as u64);
    assert_eq!(report.histogram.bin_size, 1.0);
    assert_eq!(report.histogram.bin_names, vec!["0", "1"]);
    assert_eq!(report.histogram.bins.len(), 2);
    for count in &report.histogram.bins {
        assert!(
            (*count as f64 - 0.5 * ROWS as f64).abs() <= 0.01 * ROWS as f64,
            "bin count {count}"
        );
    }
    assert_eq!(report.zeros, report.histogram.bins[0]);
    assert_eq!(report.min, vec![0.0]);
    assert_eq!(report.max, vec![1.0]);
    let percentiles = report.percentiles.as_ref().expect("percentiles");
    assert_eq!(percentiles.values.len(), percentiles.thresholds.len());
    for v in &percentiles.values {
        assert!((0.0..=1.0).contains(v), "percentile {v} outside [0, 1]");
    }
}

fn numbers(table: &TableSummary) -> Vec<&ColumnSummary> {
    table
        .columns()
        .iter()
        .map(|column| column.as_number().expect("number column"))
        .collect()
}

#[test]
fn single_column_binary() {
    let config = SummaryConfig::default();
    let rows = synthetic_rows(&SyntheticConfig::binary(ROWS, 1, SEED));
    let table = summarize_rows(&rows, 1, &config);
    let report = table.report(&config.percentile_thresholds).unwrap();
    assert_eq!(report.columns.len(), 1);
    check_binary_column(numbers(&table)[0], &report.columns[0]);

    let json = serde_json::to_value(&report).unwrap();
    let column = &json["columns"][0];
    assert_eq!(column["type"], "number");
    assert_eq!(column["name"], "C1");
    assert_eq!(column["n"], 100_000);
    assert_eq!(column["histogram"]["bin_size"], 1.0);
    assert_eq!(column["percentiles"]["values"].as_array().unwrap().len(), 7);
}

#[test]
fn two_columns_are_independent() {
    let config = SummaryConfig::default();
    let rows = synthetic_rows(&SyntheticConfig::binary(ROWS, 2, SEED + 1));
    let table = summarize_rows(&rows, 2, &config);
    let report = table.report(&config.percentile_thresholds).unwrap();
    let columns = numbers(&table);
    for (summary, column_report) in columns.iter().zip(&report.columns) {
        check_binary_column(summary, column_report);
    }

    // each column only saw its own cells
    let first: Vec<Vec<i64>> = rows.iter().map(|row| vec![row[0]]).collect();
    let alone = summarize_rows(&first, 1, &config);
    assert_same_summary(columns[0], numbers(&alone)[0]);
}

#[test]
fn four_shards_reproduce_single_pass() {
    let config = SummaryConfig::default();
    let rows = synthetic_rows(&SyntheticConfig::binary(ROWS, 1, SEED));
    let whole = summarize_rows(&rows, 1, &config);
    let shards: Vec<TableSummary> = rows
        .chunks(25_000)
        .map(|chunk| summarize_rows(chunk, 1, &config))
        .collect();
    assert_eq!(shards.len(), 4);

    let reduced = tree_reduce(shards.clone()).unwrap().unwrap();
    assert_same_summary(numbers(&reduced)[0], numbers(&whole)[0]);

    let folded = shards[1..]
        .iter()
        .try_fold(shards[0].clone(), |acc, shard| acc.merge(shard))
        .unwrap();
    assert_same_summary(numbers(&folded)[0], numbers(&whole)[0]);

    let report = reduced.report(&config.percentile_thresholds).unwrap();
    check_binary_column(numbers(&reduced)[0], &report.columns[0]);
}

#[test]
fn all_missing_column() {
    let config = SummaryConfig::default();
    let mut summary = ColumnSummary::new(&config);
    for _ in 0..1000 {
        summary.observe_raw(RawCell::Text("NA")).unwrap();
    }
    summary.observe_raw(RawCell::Null).unwrap();
    assert_eq!(summary.count(), 0);
    assert_eq!(summary.missing_count(), 1001);
    assert_eq!(summary.min(), Err(Error::EmptySummary));
    assert_eq!(summary.max(), Err(Error::EmptySummary));
    assert_eq!(summary.mean(), Err(Error::EmptySummary));
    assert_eq!(summary.sigma(), Err(Error::EmptySummary));
    assert_eq!(summary.percentiles(&[0.5]), Err(Error::EmptySummary));

    let column = ColumnAccumulator::Number(summary);
    let ColumnReport::Number(report) = column.report("empty", &[0.5]).unwrap() else {
        panic!("expected a number column");
    };
    assert_eq!(report.n, 0);
    assert_eq!(report.na, 1001);
    assert_eq!(report.mean, None);
    assert_eq!(report.sigma, None);
    assert!(report.percentiles.is_none());
}
