use std::path::PathBuf;

use anyhow::Result;

use tourism_insights::config::PipelineConfig;
use tourism_insights::data::cache::DatasetCache;
use tourism_insights::report;
use tourism_insights::state::AppState;

/// Dataset read when no path is given.
const DEFAULT_DATASET: &str = "tourism_dataset.csv";

fn main() -> Result<()> {
    env_logger::init();

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET));

    let mut cache = DatasetCache::new(PipelineConfig::default());
    let mut state = AppState::default();

    let loaded = cache.get_or_load(&path);
    match &loaded {
        Ok(table) => {
            if table.is_empty() {
                log::warn!("{} contains no data rows", path.display());
            }
            log::info!(
                "Loaded {} rows with extra columns {:?}",
                table.len(),
                table.extra_columns
            );
            state.set_table(table.clone());
        }
        Err(e) => {
            log::error!("Failed to load {}: {e:#}", path.display());
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }

    print!("{}", report::render(&state)?);
    loaded.map(|_| ())
}
