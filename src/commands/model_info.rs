use crate::commands::surface;
use crate::config::ClientConfig;
use crate::error::AppError;
use crate::services::model_info::{status_panel, ModelInfoFetcher};
use std::io::Write;

/// Prints the model status panel. Returns `false` if the panel is an error.
pub async fn run_model_info(config: ClientConfig, json: bool) -> Result<bool, AppError> {
    let result = ModelInfoFetcher::new(&config).fetch().await;
    let panel = status_panel(&result);

    let mut stdout = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, &panel)?;
        writeln!(stdout)?;
    } else {
        surface::write_model_info(&mut stdout, &panel)?;
    }

    Ok(result.is_ok())
}
