use skycast_weather::{DisplayUnit, Icon, WeatherSnapshot};

/// Strings for one render of the weather panel. Derived from the snapshot
/// and the current unit every time, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherView {
    pub icon: Icon,
    pub temperature: String,
    /// Label for the toggle control, naming the unit it switches to
    pub toggle_label: String,
    pub location: String,
    pub humidity: String,
    pub wind_speed: String,
}

impl WeatherView {
    pub fn render(snapshot: &WeatherSnapshot, unit: DisplayUnit) -> Self {
        Self {
            icon: snapshot.icon,
            temperature: unit.format(snapshot.temperature_celsius),
            toggle_label: format!("Show in {}", unit.toggled().symbol()),
            location: snapshot.location.clone(),
            humidity: format!("{}%", snapshot.humidity),
            wind_speed: format!("{} m/s", snapshot.wind_speed),
        }
    }
}
