//! Skycast widget model and its background services.

pub mod models;
pub mod services;
pub mod view;

pub use models::weather_model::{Notice, Severity, WeatherWidget};
pub use services::WeatherServiceMessage;
pub use view::WeatherView;
