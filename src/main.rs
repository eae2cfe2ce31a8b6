mod tui;

use anyhow::{Context, Result};
use skycast_core::{Config, ConfigError};
use skycast_ui::WeatherWidget;

#[tokio::main]
async fn main() -> Result<()> {
    skycast_core::init(&Config::log_path()?)?;

    let (config, _validation) = match Config::load_validated() {
        Ok(loaded) => loaded,
        Err(e) => {
            if let Some(config_error) = e.downcast_ref::<ConfigError>() {
                eprintln!("{}", config_error.user_message());
            }
            return Err(e);
        }
    };
    tracing::info!("Config directory: {}", config.config_dir.display());

    let widget =
        WeatherWidget::from_config(&config.weather).context("Failed to create weather provider")?;

    let mut terminal = ratatui::init();
    let result = tui::run(&mut terminal, tui::App::new(widget)).await;
    ratatui::restore();
    result
}
