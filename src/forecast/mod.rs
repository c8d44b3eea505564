pub mod coordinates;
pub mod error;
pub mod fetcher;
mod http;
pub mod noaa;
pub mod open_weather_map;
