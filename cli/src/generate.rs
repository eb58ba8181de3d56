use anyhow::{Context, Result};
use colstat_summary::synthetic::{SyntheticConfig, TriangularRows};
use std::io::Write;
use std::path::Path;
use tracing::info;

pub fn write_csv(config: &SyntheticConfig, output: Option<&Path>, header: bool) -> Result<()> {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut writer = csv::WriterBuilder::new().from_writer(sink);
    if header {
        writer
            .write_record((1..=config.columns).map(|index| format!("C{index}")))
            .with_context(|| "writing header")?;
    }
    for row in TriangularRows::new(config.clone()) {
        writer
            .write_record(row.iter().map(i64::to_string))
            .with_context(|| "writing row")?;
    }
    writer.flush().with_context(|| "flushing csv")?;
    info!(
        "generated {} rows of {} columns with seed {}",
        config.rows, config.columns, config.seed
    );
    Ok(())
}
