use anyhow::{Context, Result};
use colstat_summary::config::SummaryConfig;
use config::{Config, Environment, File};
use std::path::Path;
use tracing::debug;

/// Builds the summary options from an optional TOML file, then `COLSTAT_*`
/// environment variables (`COLSTAT_MAX_BINS=256`, `COLSTAT_PERCENTILE_THRESHOLDS=0.5,0.9`).
pub fn load_summary_config(path: Option<&Path>) -> Result<SummaryConfig> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path));
    }
    let settings = builder
        .add_source(
            Environment::with_prefix("COLSTAT")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("percentile_thresholds"),
        )
        .build()
        .with_context(|| "reading summary settings")?;
    let summary_config: SummaryConfig = settings
        .try_deserialize()
        .with_context(|| "parsing summary settings")?;
    summary_config
        .validate()
        .with_context(|| "validating summary settings")?;
    debug!("summary settings: {summary_config:?}");
    Ok(summary_config)
}
