mod airport_weather;
mod config;
mod error;
mod forecast;
mod stations;
mod types;
mod weather_data;

pub use airport_weather::AirportWeather;
pub use config::*;
pub use error::{AirportWeatherError, ErrorKind};

pub use stations::directory::StationDirectory;
pub use stations::error::StationDirectoryError;

pub use types::coordinates::LatLon;
pub use types::forecast::{AirportForecast, ForecastPeriod, ForecastSource};
pub use types::month::{Month, MonthRange};
pub use types::observation::WeatherObservation;

pub use weather_data::acquisition::{fetch_historical, fetch_months, HistoricalRequest, DEFAULT_YEARS_BACK};
pub use weather_data::error::WeatherDataError;
pub use weather_data::ncei_client::NceiClient;
pub use weather_data::source::ObservationSource;

pub use forecast::coordinates::AviationstackClient;
pub use forecast::error::ForecastError;
pub use forecast::fetcher::ForecastFetcher;
pub use forecast::noaa::{GridPoint, NwsClient};
pub use forecast::open_weather_map::OpenWeatherMapClient;
