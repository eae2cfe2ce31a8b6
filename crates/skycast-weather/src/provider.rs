//! OpenWeatherMap current-conditions client.

use crate::types::{kelvin_to_celsius, IconCatalog, WeatherError, WeatherSnapshot};
use reqwest::Client;
use serde::Deserialize;
use skycast_core::{ReqwestErrorExt, WeatherConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

const USER_AGENT: &str = concat!("skycast/", env!("CARGO_PKG_VERSION"));

/// Everything the provider needs, injected at construction
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    /// Sent as `appid`. An absent key is sent empty and the provider answers
    /// with its own error message.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl From<&WeatherConfig> for ProviderSettings {
    fn from(config: &WeatherConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.effective_api_key(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    endpoint: String,
    api_key: String,
}

impl WeatherProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ReqwestErrorExt::into_network_error)?;

        Ok(Self {
            client: Arc::new(client),
            endpoint: format!("{}/weather", settings.base_url.trim_end_matches('/')),
            api_key: settings.api_key.unwrap_or_default(),
        })
    }

    /// Fetch current conditions for a city and map them to a snapshot.
    ///
    /// Blank input is rejected before any request is made.
    #[instrument(skip(self), level = "info")]
    pub async fn current(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::EmptyCity);
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", city), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        if !status.is_success() {
            let message = ErrorBody::parse(&body).and_then(ErrorBody::into_message);
            tracing::warn!(
                "Provider rejected lookup for {}: {} {:?}",
                city,
                status,
                message
            );
            return Err(WeatherError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let conditions: CurrentConditions = match serde_json::from_str(&body) {
            Ok(conditions) => conditions,
            Err(e) => {
                // The provider sometimes reports errors in a success response
                if let Some(err) = embedded_error(&body, status.as_u16()) {
                    tracing::warn!("Provider reported an error for {}: {}", city, err);
                    return Err(err);
                }
                return Err(WeatherError::Parse(e.to_string()));
            }
        };
        let snapshot = conditions.into_snapshot()?;
        tracing::debug!("Fetched conditions for {}: {:?}", snapshot.location, snapshot);
        Ok(snapshot)
    }
}

/// An error payload inside a success response, such as
/// `{"cod":"404","message":"city not found"}`. `cod` becomes the status when
/// it is a valid code.
fn embedded_error(body: &str, status: u16) -> Option<WeatherError> {
    let error = ErrorBody::parse(body)?;
    let status = error.code().unwrap_or(status);
    let message = error.into_message()?;
    Some(WeatherError::Provider {
        status,
        message: Some(message),
    })
}

/// `cod` is a string in some responses and a number in others
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    cod: Option<serde_json::Value>,
    message: Option<String>,
}

impl ErrorBody {
    fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    fn code(&self) -> Option<u16> {
        match self.cod.as_ref()? {
            serde_json::Value::String(s) => s.trim().parse().ok(),
            serde_json::Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            _ => None,
        }
    }

    fn into_message(self) -> Option<String> {
        self.message.filter(|m| !m.trim().is_empty())
    }
}

/// https://openweathermap.org/current#fields_json
#[derive(Debug, Deserialize)]
struct CurrentConditions {
    weather: Vec<Condition>,
    main: MainReadings,
    wind: Wind,
    name: String,
}

#[derive(Debug, Deserialize)]
struct Condition {
    icon: String,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    /// Kelvin
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

impl CurrentConditions {
    fn into_snapshot(self) -> Result<WeatherSnapshot, WeatherError> {
        let condition = self
            .weather
            .first()
            .ok_or_else(|| WeatherError::Parse("response has no weather conditions".into()))?;

        Ok(WeatherSnapshot {
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
            temperature_celsius: kelvin_to_celsius(self.main.temp),
            location: self.name,
            icon: IconCatalog::resolve(&condition.icon),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Icon;

    fn conditions(body: &str) -> CurrentConditions {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_into_snapshot_maps_fields() {
        let snapshot = conditions(
            r#"{
                "weather": [{"id": 500, "main": "Rain", "icon": "10d"}, {"icon": "01d"}],
                "main": {"temp": 300.15, "humidity": 64, "pressure": 1012},
                "wind": {"speed": 3.6, "deg": 200},
                "name": "Vancouver",
                "cod": 200
            }"#,
        )
        .into_snapshot()
        .unwrap();

        assert_eq!(
            snapshot,
            WeatherSnapshot {
                humidity: 64,
                wind_speed: 3.6,
                temperature_celsius: 27,
                location: "Vancouver".into(),
                icon: Icon::Rain,
            }
        );
    }

    #[test]
    fn test_into_snapshot_requires_a_condition() {
        let result = conditions(
            r#"{"weather": [], "main": {"temp": 280.0, "humidity": 10}, "wind": {"speed": 0.0}, "name": "X"}"#,
        )
        .into_snapshot();
        assert!(matches!(result, Err(WeatherError::Parse(_))));
    }

    #[test]
    fn test_error_body_message() {
        let message = |body: &str| ErrorBody::parse(body).and_then(ErrorBody::into_message);
        assert_eq!(
            message(r#"{"cod":"404","message":"city not found"}"#).as_deref(),
            Some("city not found")
        );
        assert_eq!(message(r#"{"cod":"500","message":""}"#), None);
        assert_eq!(message("<html>Bad Gateway</html>"), None);
    }

    #[test]
    fn test_error_body_code_accepts_string_or_number() {
        let code = |body: &str| ErrorBody::parse(body).and_then(|b| b.code());
        assert_eq!(code(r#"{"cod":"404","message":"x"}"#), Some(404));
        assert_eq!(code(r#"{"cod":401,"message":"x"}"#), Some(401));
        assert_eq!(code(r#"{"cod":"abc","message":"x"}"#), None);
        assert_eq!(code(r#"{"message":"x"}"#), None);
    }

    #[test]
    fn test_embedded_error_needs_a_message() {
        assert!(matches!(
            embedded_error(r#"{"cod":"404","message":"city not found"}"#, 200),
            Some(WeatherError::Provider { status: 404, message: Some(m) }) if m == "city not found"
        ));
        assert!(matches!(
            embedded_error(r#"{"message":"quota exceeded"}"#, 200),
            Some(WeatherError::Provider { status: 200, .. })
        ));
        assert!(embedded_error(r#"{"cod":200,"name":"Vancouver"}"#, 200).is_none());
        assert!(embedded_error("not json", 200).is_none());
    }

    #[test]
    fn test_settings_from_config() {
        let config = WeatherConfig {
            api_key: Some("file-key".into()),
            base_url: "http://localhost:9000/data/2.5/".into(),
            timeout_secs: 3,
            ..WeatherConfig::default()
        };
        let settings = ProviderSettings::from(&config);
        assert_eq!(settings.timeout, Duration::from_secs(3));

        let provider = WeatherProvider::new(settings).unwrap();
        assert_eq!(provider.endpoint, "http://localhost:9000/data/2.5/weather");
    }

    #[tokio::test]
    async fn test_blank_city_is_rejected_without_request() {
        let provider = WeatherProvider::new(ProviderSettings {
            // Nothing listens here; a request would fail with a network error
            base_url: "http://127.0.0.1:9".into(),
            api_key: None,
            timeout: Duration::from_secs(1),
        })
        .unwrap();

        assert!(matches!(
            provider.current("   ").await,
            Err(WeatherError::EmptyCity)
        ));
    }
}
