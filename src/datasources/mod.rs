pub mod local;
pub mod openweathermap;

pub use local::{
    load_ndvi_csv, load_series_csv, load_weather_csv, read_series_csv, read_weather_csv,
    series_from_weather,
};
pub use openweathermap::OpenWeatherMapClient;
