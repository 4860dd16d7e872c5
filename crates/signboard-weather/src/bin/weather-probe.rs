//! Fetch current conditions once, the way a weather widget would.
//!
//! ```text
//! OPENWEATHER_API_KEY=... weather-probe --city Oslo
//! OPENWEATHER_API_KEY=... weather-probe --lat 59.91 --lon 10.75
//! ```

use clap::Parser;
use signboard_core::weather::WeatherProvider;
use signboard_weather::{API_KEY_ENV, OpenWeatherClient, OpenWeatherConfig};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(version, about = "Query OpenWeather for a city or coordinate")]
struct Args {
    /// City name to look up.
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    city: Option<String>,

    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// OpenWeather API key.
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: String,

    /// Override the API endpoint.
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut config = OpenWeatherConfig::new(args.api_key);
    if let Some(base_url) = args.base_url {
        config = config.with_base_url(base_url);
    }
    let client = match OpenWeatherClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match (args.city, args.lat, args.lon) {
        (Some(city), _, _) => client.fetch_by_city_name(&city).await,
        (None, Some(lat), Some(lon)) => client.fetch_by_coordinates(lat, lon).await,
        _ => {
            eprintln!("pass --city or both --lat and --lon");
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(report) => {
            println!("{}: {:.1}°C, {}", report.city_name, report.temperature, report.description);
            if let Some(icon) = report.icon_ref {
                println!("icon: {icon}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Lookup failed: {e:?}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
