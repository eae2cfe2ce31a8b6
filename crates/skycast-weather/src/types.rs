use skycast_core::NetworkError;

/// Offset between Kelvin and Celsius
const KELVIN_OFFSET: f64 = 273.15;

/// Notice text used when the provider gives no message of its own
pub const GENERIC_FETCH_FAILURE: &str = "Failed to fetch weather data.";

/// Convert a provider temperature in Kelvin to whole degrees Celsius,
/// rounding down
pub fn kelvin_to_celsius(kelvin: f64) -> i32 {
    (kelvin - KELVIN_OFFSET).floor() as i32
}

/// Convert whole degrees Celsius to the nearest whole degree Fahrenheit
pub fn celsius_to_fahrenheit(celsius: i32) -> i32 {
    (f64::from(celsius) * 9.0 / 5.0 + 32.0).round() as i32
}

/// Temperature unit used when rendering. Stored data is always Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl DisplayUnit {
    /// The other unit
    pub fn toggled(self) -> Self {
        match self {
            Self::Celsius => Self::Fahrenheit,
            Self::Fahrenheit => Self::Celsius,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }

    /// Format a Celsius reading in this unit, e.g. `27°C` or `81°F`
    pub fn format(self, celsius: i32) -> String {
        let value = match self {
            Self::Celsius => celsius,
            Self::Fahrenheit => celsius_to_fahrenheit(celsius),
        };
        format!("{}{}", value, self.symbol())
    }
}

/// The configured startup unit. This is the only bridge between the config
/// enum and the display enum.
impl From<skycast_core::TemperatureUnit> for DisplayUnit {
    fn from(unit: skycast_core::TemperatureUnit) -> Self {
        match unit {
            skycast_core::TemperatureUnit::Celsius => Self::Celsius,
            skycast_core::TemperatureUnit::Fahrenheit => Self::Fahrenheit,
        }
    }
}

/// Condition icons bundled with the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Clear,
    Cloud,
    Drizzle,
    Rain,
    Snow,
}

impl Icon {
    /// Glyph for text front ends
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Clear => "☀",
            Self::Cloud => "☁",
            Self::Drizzle => "🌦",
            Self::Rain => "🌧",
            Self::Snow => "❄",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Cloud => "Cloudy",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
        }
    }
}

/// Static lookup from provider icon codes to bundled icons.
/// See: https://openweathermap.org/weather-conditions
pub struct IconCatalog;

impl IconCatalog {
    /// Icon used for any code not in the table
    pub const FALLBACK: Icon = Icon::Clear;

    const ENTRIES: &'static [(&'static str, Icon)] = &[
        ("01d", Icon::Clear),
        ("01n", Icon::Clear),
        ("02d", Icon::Cloud),
        ("03d", Icon::Cloud),
        ("03n", Icon::Cloud),
        ("04d", Icon::Drizzle),
        ("04n", Icon::Drizzle),
        ("09d", Icon::Rain),
        ("09n", Icon::Rain),
        ("10d", Icon::Rain),
        ("10n", Icon::Rain),
        ("13d", Icon::Snow),
        ("13n", Icon::Snow),
    ];

    /// Resolve a provider code. Unknown codes get [`IconCatalog::FALLBACK`].
    pub fn resolve(code: &str) -> Icon {
        Self::ENTRIES
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, icon)| *icon)
            .unwrap_or(Self::FALLBACK)
    }
}

/// Display-ready result of one successful lookup. Replaced as a whole, never
/// patched.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// Relative humidity, percent
    pub humidity: u8,
    /// Wind speed, m/s
    pub wind_speed: f64,
    /// Whole degrees Celsius, floored
    pub temperature_celsius: i32,
    /// Location name as reported by the provider
    pub location: String,
    pub icon: Icon,
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Please enter a city.")]
    EmptyCity,
    #[error("Provider returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Provider {
        status: u16,
        message: Option<String>,
    },
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherError {
    /// Text for the user-facing notice. Provider errors carry the provider's
    /// own message when there is one.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyCity => self.to_string(),
            Self::Provider {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Provider { message: None, .. } | Self::Parse(_) => {
                GENERIC_FETCH_FAILURE.to_string()
            }
            Self::Network(e) => e.user_message().to_string(),
        }
    }

    /// Whether the request never reached (or never came back from) the
    /// provider in a usable form
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Parse(_))
    }
}
