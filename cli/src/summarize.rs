use anyhow::{Context, Result};
use colstat_summary::cell::RawCell;
use colstat_summary::config::SummaryConfig;
use colstat_summary::merge::tree_reduce;
use colstat_summary::report::SummaryReport;
use colstat_summary::table::{ColumnSpec, TableSummary};
use csv::StringRecord;
use std::fs::File;
use std::path::PathBuf;
use tokio::sync::mpsc::{Receiver, Sender, channel};
use tracing::{debug, info, warn};

/// Batches queued per accumulator before the reader blocks
const CHANNEL_CAPACITY: usize = 4;

/// Accumulators and the reader each hold a blocking thread for the whole run, so their
/// total must stay below tokio's blocking pool size (512 by default).
pub const MAX_SHARDS: usize = 256;

type Batch = Vec<StringRecord>;

#[derive(Debug)]
pub struct SummarizeOptions {
    pub path: PathBuf,
    pub shards: usize,
    pub enum_columns: Vec<String>,
    pub has_headers: bool,
    pub batch_rows: usize,
}

/// Streams the file through `shards` accumulators and merges their summaries.
pub async fn summarize_csv(
    options: SummarizeOptions,
    config: SummaryConfig,
) -> Result<SummaryReport> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(options.has_headers)
        .flexible(true)
        .from_path(&options.path)
        .with_context(|| format!("opening {}", options.path.display()))?;
    let mut first = None;
    let names: Vec<String> = if options.has_headers {
        reader
            .headers()
            .with_context(|| "reading csv header")?
            .iter()
            .map(|name| name.trim().to_owned())
            .collect()
    } else {
        let mut record = StringRecord::new();
        let has_row = reader
            .read_record(&mut record)
            .with_context(|| "reading first csv record")?;
        let names = (1..=record.len()).map(|index| format!("C{index}")).collect();
        if has_row {
            first = Some(record);
        }
        names
    };
    let specs = column_specs(names, &options.enum_columns)?;

    let shards = shard_count(options.shards);
    let mut senders = Vec::with_capacity(shards);
    let mut workers = Vec::with_capacity(shards);
    for shard in 0..shards {
        let (sender, receiver) = channel::<Batch>(CHANNEL_CAPACITY);
        senders.push(sender);
        let table = TableSummary::try_new(specs.clone(), &config)?;
        workers.push(tokio::task::spawn_blocking(move || {
            accumulate(shard, table, receiver)
        }));
    }
    let batch_rows = options.batch_rows.max(1);
    let reading = tokio::task::spawn_blocking(move || {
        let records = first.into_iter().map(Ok).chain(reader.into_records());
        dispatch(records, RoundRobin::new(senders), batch_rows)
    });

    // workers end once the reader drops its senders, successful or not
    let mut tables = Vec::with_capacity(shards);
    for worker in workers {
        tables.push(worker.await.with_context(|| "joining accumulator")??);
    }
    let nb_rows = reading.await.with_context(|| "joining reader")??;
    let table = tree_reduce(tables)?.with_context(|| "no accumulator")?;
    info!(
        "summarized {nb_rows} rows of {} columns over {shards} shards",
        table.specs().len()
    );
    Ok(table.report(&config.percentile_thresholds)?)
}

fn shard_count(requested: usize) -> usize {
    if requested > MAX_SHARDS {
        warn!("{requested} shards requested, using {MAX_SHARDS}");
    }
    requested.clamp(1, MAX_SHARDS)
}

fn column_specs(names: Vec<String>, enum_columns: &[String]) -> Result<Vec<ColumnSpec>> {
    if let Some(unknown) = enum_columns.iter().find(|name| !names.contains(name)) {
        anyhow::bail!("unknown column {unknown}, columns are {names:?}");
    }
    Ok(names
        .into_iter()
        .map(|name| {
            if enum_columns.contains(&name) {
                ColumnSpec::category(name)
            } else {
                ColumnSpec::number(name)
            }
        })
        .collect())
}

struct RoundRobin {
    senders: Vec<Sender<Batch>>,
    next: usize,
}

impl RoundRobin {
    fn new(senders: Vec<Sender<Batch>>) -> Self {
        Self { senders, next: 0 }
    }

    fn send(&mut self, batch: Batch) -> Result<()> {
        let shard = self.next;
        self.next = (self.next + 1) % self.senders.len();
        self.senders[shard]
            .blocking_send(batch)
            .map_err(|_| anyhow::anyhow!("accumulator {shard} stopped"))
    }
}

fn dispatch(
    records: impl Iterator<Item = csv::Result<StringRecord>>,
    mut shards: RoundRobin,
    batch_rows: usize,
) -> Result<u64> {
    let mut nb_rows = 0;
    let mut batch = Vec::with_capacity(batch_rows);
    for record in records {
        batch.push(record.with_context(|| "reading csv record")?);
        nb_rows += 1;
        if batch.len() >= batch_rows {
            shards.send(std::mem::replace(&mut batch, Vec::with_capacity(batch_rows)))?;
        }
    }
    if !batch.is_empty() {
        shards.send(batch)?;
    }
    Ok(nb_rows)
}

fn accumulate(
    shard: usize,
    mut table: TableSummary,
    mut batches: Receiver<Batch>,
) -> Result<TableSummary> {
    let mut nb_rows = 0_u64;
    while let Some(batch) = batches.blocking_recv() {
        for record in &batch {
            let cells: Vec<RawCell<'_>> = record.iter().map(RawCell::Text).collect();
            table.observe_row(&cells).with_context(|| {
                format!(
                    "summarizing line {}",
                    record.position().map_or(0, csv::Position::line)
                )
            })?;
            nb_rows += 1;
        }
    }
    debug!("accumulator {shard} observed {nb_rows} rows");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use colstat_summary::report::ColumnReport;
    use std::io::Write;

    fn write_temp_csv(name: &str, content: &str) -> PathBuf {
        let path =
            std::env::temp_dir().join(format!("colstat-{}-{name}.csv", std::process::id()));
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    fn options(path: PathBuf, has_headers: bool, enum_columns: Vec<String>) -> SummarizeOptions {
        SummarizeOptions {
            path,
            shards: 3,
            enum_columns,
            has_headers,
            batch_rows: 2,
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_summarize_with_header() {
        let path = write_temp_csv("header", "x,color\n1,red\n0,blue\nNA,red\n3,\n2,red\n");
        let report = summarize_csv(
            options(path.clone(), true, vec!["color".into()]),
            SummaryConfig::default(),
        )
        .await
        .unwrap();
        std::fs::remove_file(path).unwrap();
        assert_eq!(report.columns.len(), 2);
        let ColumnReport::Number(x) = &report.columns[0] else {
            panic!("x should be numeric");
        };
        assert_eq!(x.name, "x");
        assert_eq!(x.n, 4);
        assert_eq!(x.zeros, 1);
        assert_eq!(x.na, 1);
        assert!((x.mean.unwrap() - 1.5).abs() < 1e-12);
        let ColumnReport::Enum(color) = &report.columns[1] else {
            panic!("color should be an enum");
        };
        assert_eq!(color.n, 4);
        assert_eq!(color.na, 1);
        assert_eq!(color.cardinality, 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_summarize_without_header() {
        let path = write_temp_csv("noheader", "1,2\n3,4\n5\n");
        let report = summarize_csv(
            options(path.clone(), false, vec![]),
            SummaryConfig::default(),
        )
        .await
        .unwrap();
        std::fs::remove_file(path).unwrap();
        let names: Vec<&str> = report.columns.iter().map(ColumnReport::name).collect();
        assert_eq!(names, vec!["C1", "C2"]);
        assert_eq!(report.columns[0].n(), 3);
        assert_eq!(report.columns[1].n(), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_row_too_wide_fails() {
        let path = write_temp_csv("wide", "a\n1\n2,3\n");
        let result =
            summarize_csv(options(path.clone(), true, vec![]), SummaryConfig::default()).await;
        std::fs::remove_file(path).unwrap();
        assert!(result.is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_many_shards_complete() {
        let path = write_temp_csv("many-shards", "x\n1\n2\n3\n4\n5\n");
        let mut opts = options(path.clone(), true, vec![]);
        opts.shards = 600;
        opts.batch_rows = 1;
        let report = tokio::time::timeout(
            std::time::Duration::from_secs(30),
            summarize_csv(opts, SummaryConfig::default()),
        )
        .await
        .expect("summarize should not stall")
        .unwrap();
        std::fs::remove_file(path).unwrap();
        assert_eq!(report.columns[0].n(), 5);
        assert_eq!(shard_count(600), MAX_SHARDS);
        assert_eq!(shard_count(0), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_invalid_config_is_rejected() {
        let path = write_temp_csv("bad-config", "x\n1\n");
        let config = SummaryConfig {
            bin_size_hint: Some(0.0),
            ..SummaryConfig::default()
        };
        let result = summarize_csv(options(path.clone(), true, vec![]), config).await;
        std::fs::remove_file(path).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_enum_column() {
        assert!(column_specs(vec!["a".into()], &["b".to_owned()]).is_err());
        let specs = column_specs(vec!["a".into(), "b".into()], &["b".to_owned()]).unwrap();
        assert_eq!(specs, vec![ColumnSpec::number("a"), ColumnSpec::category("b")]);
    }
}
