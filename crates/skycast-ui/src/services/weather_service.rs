//! Weather backend: async weather fetching.
//! Network work runs on spawned tasks; results come back over mpsc in the
//! order the requests complete.

use std::sync::Arc;

use skycast_weather::{WeatherError, WeatherProvider, WeatherSnapshot};
use tokio::sync::mpsc::UnboundedSender;

/// Messages sent from async operations back to the UI loop
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Result of fetching current conditions for `city`
    FetchDone {
        city: String,
        result: Result<WeatherSnapshot, WeatherError>,
    },
}

/// Request current conditions asynchronously.
/// Sends `FetchDone` on the channel when complete. Must be called from within
/// a tokio runtime.
pub fn request_fetch(
    tx: &UnboundedSender<WeatherServiceMessage>,
    provider: Arc<WeatherProvider>,
    city: String,
) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = provider.current(&city).await;
        if tx
            .send(WeatherServiceMessage::FetchDone { city, result })
            .is_err()
        {
            tracing::debug!("Weather result dropped, UI loop has exited");
        }
    });
}
