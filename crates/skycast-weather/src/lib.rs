//! Weather service for Skycast
//!
//! Fetches current conditions from OpenWeatherMap and maps them to a
//! display-ready snapshot.

pub mod provider;
pub mod types;

pub use provider::{ProviderSettings, WeatherProvider};
pub use types::*;
