use std::sync::Arc;

use skycast_core::WeatherConfig;
use skycast_weather::{
    DisplayUnit, ProviderSettings, WeatherError, WeatherProvider, WeatherSnapshot,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::services::{request_fetch, WeatherServiceMessage};
use crate::view::WeatherView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// A user-facing message. The front end decides how to show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub text: String,
}

impl Notice {
    fn info(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            text: text.into(),
        }
    }
}

/// The single-screen weather widget: pending input, last snapshot, display
/// unit, and queued notices.
///
/// Any failed fetch clears the snapshot, so stale conditions are never shown
/// next to an error. Blank input is rejected before a request is made and
/// leaves the snapshot alone.
pub struct WeatherWidget {
    provider: Arc<WeatherProvider>,
    default_city: String,
    input: Option<String>,
    snapshot: Option<WeatherSnapshot>,
    unit: DisplayUnit,
    mounted: bool,
    notices: Vec<Notice>,
}

impl WeatherWidget {
    pub fn new(provider: Arc<WeatherProvider>, default_city: impl Into<String>) -> Self {
        Self {
            provider,
            default_city: default_city.into(),
            input: None,
            snapshot: None,
            unit: DisplayUnit::default(),
            mounted: false,
            notices: Vec::new(),
        }
    }

    /// Build a widget, and its provider, from the weather config section
    pub fn from_config(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let provider = WeatherProvider::new(ProviderSettings::from(config))?;
        Ok(Self::new(Arc::new(provider), config.default_city.clone())
            .with_unit(config.temperature_unit.into()))
    }

    pub fn with_unit(mut self, unit: DisplayUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    /// Replace the pending input. Never triggers a request.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = Some(text.into());
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn unit(&self) -> DisplayUnit {
        self.unit
    }

    /// Flip between Celsius and Fahrenheit. Stored data is untouched.
    pub fn toggle_unit(&mut self) {
        self.unit = self.unit.toggled();
        tracing::debug!("Display unit is now {:?}", self.unit);
    }

    /// Render the panel, or `None` when there is nothing to show
    pub fn view(&self) -> Option<WeatherView> {
        self.snapshot
            .as_ref()
            .map(|snapshot| WeatherView::render(snapshot, self.unit))
    }

    /// Drain queued notices, oldest first
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Search for `city` and wait for the result
    pub async fn search(&mut self, city: &str) {
        let Some(city) = self.accept_city(city) else {
            return;
        };
        let result = self.provider.current(&city).await;
        self.apply_outcome(&city, result);
    }

    /// Search for the pending input
    pub async fn submit(&mut self) {
        let city = self.input.clone().unwrap_or_default();
        self.search(&city).await;
    }

    /// One-time search for the default city. Returns whether a search was
    /// issued.
    pub async fn mount(&mut self) -> bool {
        let Some(city) = self.take_mount_city() else {
            return false;
        };
        self.search(&city).await;
        true
    }

    /// Like [`Self::search`], but the fetch runs on a spawned task and the
    /// result arrives on `tx`. Feed it back through [`Self::handle_message`].
    pub fn search_in_background(
        &mut self,
        city: &str,
        tx: &UnboundedSender<WeatherServiceMessage>,
    ) -> bool {
        let Some(city) = self.accept_city(city) else {
            return false;
        };
        request_fetch(tx, Arc::clone(&self.provider), city);
        true
    }

    pub fn submit_in_background(&mut self, tx: &UnboundedSender<WeatherServiceMessage>) -> bool {
        let city = self.input.clone().unwrap_or_default();
        self.search_in_background(&city, tx)
    }

    pub fn mount_in_background(&mut self, tx: &UnboundedSender<WeatherServiceMessage>) -> bool {
        let Some(city) = self.take_mount_city() else {
            return false;
        };
        self.search_in_background(&city, tx)
    }

    /// Apply a finished background fetch. Results are applied in arrival
    /// order, so the last one to complete wins.
    pub fn handle_message(&mut self, message: WeatherServiceMessage) {
        match message {
            WeatherServiceMessage::FetchDone { city, result } => {
                self.apply_outcome(&city, result)
            }
        }
    }

    fn take_mount_city(&mut self) -> Option<String> {
        if self.mounted {
            tracing::debug!("Widget already mounted, skipping initial search");
            return None;
        }
        self.mounted = true;
        tracing::info!("Initial search for {}", self.default_city);
        Some(self.default_city.clone())
    }

    /// Validate user input. Blank input queues a notice and yields `None`.
    fn accept_city(&mut self, city: &str) -> Option<String> {
        let city = city.trim();
        if city.is_empty() {
            self.notices
                .push(Notice::info(WeatherError::EmptyCity.user_message()));
            return None;
        }
        Some(city.to_string())
    }

    fn apply_outcome(&mut self, city: &str, result: Result<WeatherSnapshot, WeatherError>) {
        match result {
            Ok(snapshot) => {
                tracing::info!(
                    "Showing weather for {} ({}°C)",
                    snapshot.location,
                    snapshot.temperature_celsius
                );
                self.snapshot = Some(snapshot);
            }
            Err(e) => {
                if e.is_transport() {
                    tracing::error!("Error fetching data for {}: {}", city, e);
                } else {
                    tracing::warn!("Provider error for {}: {}", city, e);
                }
                self.snapshot = None;
                self.notices.push(Notice::error(e.user_message()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skycast_core::NetworkError;
    use skycast_weather::Icon;
    use std::time::Duration;

    fn widget() -> WeatherWidget {
        let provider = WeatherProvider::new(ProviderSettings {
            base_url: "http://127.0.0.1:9".into(),
            api_key: None,
            timeout: Duration::from_secs(1),
        })
        .unwrap();
        WeatherWidget::new(Arc::new(provider), "Vancouver")
    }

    fn shown_temperature(widget: &WeatherWidget) -> String {
        widget.view().map(|v| v.temperature).unwrap_or_default()
    }

    fn snapshot(celsius: i32) -> WeatherSnapshot {
        WeatherSnapshot {
            humidity: 50,
            wind_speed: 2.0,
            temperature_celsius: celsius,
            location: "Vancouver".into(),
            icon: Icon::Clear,
        }
    }

    #[test]
    fn starts_empty_in_celsius() {
        let widget = widget();
        assert!(widget.snapshot().is_none());
        assert!(widget.view().is_none());
        assert_eq!(shown_temperature(&widget), "");
        assert_eq!(widget.unit(), DisplayUnit::Celsius);
        assert_eq!(widget.input(), None);
    }

    #[test]
    fn toggle_twice_restores_display() {
        let mut widget = widget();
        widget.apply_outcome("Vancouver", Ok(snapshot(27)));
        let original = shown_temperature(&widget);
        assert_eq!(original, "27°C");

        widget.toggle_unit();
        assert_eq!(shown_temperature(&widget), "81°F");
        widget.toggle_unit();
        assert_eq!(shown_temperature(&widget), original);
        assert_eq!(widget.snapshot(), Some(&snapshot(27)));
    }

    #[test]
    fn toggle_without_data_only_flips_unit() {
        let mut widget = widget();
        widget.toggle_unit();
        assert_eq!(widget.unit(), DisplayUnit::Fahrenheit);
        assert_eq!(shown_temperature(&widget), "");
        assert!(widget.take_notices().is_empty());
    }

    #[test]
    fn failure_clears_previous_snapshot() {
        let mut widget = widget();
        widget.apply_outcome("Vancouver", Ok(snapshot(12)));

        widget.apply_outcome(
            "Vancouver",
            Err(WeatherError::Network(NetworkError::ConnectionFailed(
                "refused".into(),
            ))),
        );

        assert!(widget.snapshot().is_none());
        let notices = widget.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].severity, Severity::Error);
        assert!(widget.take_notices().is_empty());
    }

    #[test]
    fn provider_error_also_clears_snapshot() {
        let mut widget = widget();
        widget.apply_outcome("Vancouver", Ok(snapshot(12)));

        widget.apply_outcome(
            "Nowhere",
            Err(WeatherError::Provider {
                status: 404,
                message: Some("city not found".into()),
            }),
        );

        assert!(widget.snapshot().is_none());
        assert_eq!(widget.take_notices(), vec![Notice::error("city not found")]);
    }

    #[tokio::test]
    async fn blank_search_queues_notice_and_keeps_state() {
        let mut widget = widget();
        widget.apply_outcome("Vancouver", Ok(snapshot(5)));

        widget.search("   ").await;

        assert_eq!(widget.snapshot(), Some(&snapshot(5)));
        assert_eq!(widget.take_notices(), vec![Notice::info("Please enter a city.")]);
    }

    #[tokio::test]
    async fn mount_only_runs_once() {
        let mut widget = widget();
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        assert!(widget.mount_in_background(&tx));
        assert!(!widget.mount_in_background(&tx));
        assert!(!widget.mount().await);
    }

    #[test]
    fn configured_unit_is_initial_unit() {
        let config = WeatherConfig {
            temperature_unit: skycast_core::TemperatureUnit::Fahrenheit,
            ..WeatherConfig::default()
        };
        let widget = WeatherWidget::from_config(&config).unwrap();
        assert_eq!(widget.unit(), DisplayUnit::Fahrenheit);
    }
}
