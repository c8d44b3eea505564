use airport_weather::{AirportWeather, AirportWeatherError, ApiConfig};
use std::env;

#[tokio::main]
async fn main() -> Result<(), AirportWeatherError> {
    let client = AirportWeather::builder()
        .user_agent("airport_weather demo (you@example.com)")
        .maybe_aviationstack(env::var("AVIATIONSTACK_API_KEY").ok().map(ApiConfig::aviationstack))
        .maybe_open_weather_map(env::var("OPENWEATHERMAP_API_KEY").ok().map(ApiConfig::open_weather_map))
        .build()?;

    let observations = client
        .historical("JFK")
        .years_back(0)
        .concurrency(2)
        .call()
        .await?;
    println!("Fetched {} observations for JFK", observations.len());
    for observation in observations.iter().take(5) {
        println!("{:?}", observation);
    }

    match client.airport_forecast("JFK").await {
        Ok(forecast) => {
            for period in forecast.noaa.iter().take(3) {
                println!(
                    "{}: {}{} {}",
                    period.start_time, period.temperature, period.temperature_unit, period.detailed_forecast
                );
            }
        }
        Err(e) => println!("No forecast: {}", e),
    }

    Ok(())
}
