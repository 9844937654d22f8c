//! Plain-text weather report export.

use std::path::Path;

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::error::FetchError;
use crate::service::{WeatherService, DEFAULT_FORECAST_DAYS};
use crate::types::ForecastResponse;

pub const DEFAULT_REPORT_FILE: &str = "weather_report.txt";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to fetch forecast: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Render the report body for a forecast response.
pub fn render_report(
    location: &str,
    data: &ForecastResponse,
    generated_at: DateTime<Local>,
) -> String {
    let current = &data.current;
    let mut lines = vec![
        format!("Weather Report for {}", location),
        format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S")),
        "=".repeat(49),
        String::new(),
        "CURRENT CONDITIONS:".to_string(),
        format!("Temperature: {}°C", current.temp_c),
        format!("Condition: {}", current.condition.text),
        format!("Feels Like: {}°C", current.feelslike_c),
        format!("Humidity: {}%", current.humidity),
        format!("Wind: {} km/h {}", current.wind_kph, current.wind_dir),
    ];

    let days = data.days();
    if !days.is_empty() {
        lines.push(String::new());
        lines.push(format!("{}-DAY FORECAST:", days.len()));
        lines.extend(days.iter().map(|day| {
            format!(
                "{}: {} | High: {}°C | Low: {}°C",
                day.date, day.day.condition.text, day.day.maxtemp_c, day.day.mintemp_c
            )
        }));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Fetch a 7-day forecast for `location` and write the report to `path`.
pub async fn export_report(
    service: &WeatherService,
    location: &str,
    path: &Path,
) -> Result<(), ReportError> {
    let data = service.forecast(location, DEFAULT_FORECAST_DAYS).await?;
    let body = render_report(location, &data, Local::now());
    std::fs::write(path, body)?;
    tracing::info!("Weather report for {} written to {}", location, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn forecast() -> ForecastResponse {
        serde_json::from_value(json!({
            "location": {"name": "Oslo", "lat": 59.9, "lon": 10.7},
            "current": {
                "temp_c": 4.0, "temp_f": 39.2, "feelslike_c": 1.5, "feelslike_f": 34.7,
                "condition": {"text": "Light snow"}, "humidity": 87,
                "wind_kph": 14.4, "wind_dir": "N"
            },
            "forecast": {"forecastday": [
                {"date": "2025-01-10", "day": {"maxtemp_c": 5.0, "maxtemp_f": 41.0,
                  "mintemp_c": -2.0, "mintemp_f": 28.4, "condition": {"text": "Snow"}}},
                {"date": "2025-01-11", "day": {"maxtemp_c": 3.0, "maxtemp_f": 37.4,
                  "mintemp_c": -4.0, "mintemp_f": 24.8, "condition": {"text": "Overcast"}}}
            ]}
        }))
        .unwrap()
    }

    #[test]
    fn test_render_report() {
        let at = Local.with_ymd_and_hms(2025, 1, 10, 8, 30, 0).unwrap();
        let report = render_report("Oslo", &forecast(), at);

        assert!(report.starts_with("Weather Report for Oslo\nGenerated: 2025-01-10 08:30:00\n"));
        assert!(report.contains("Temperature: 4°C"));
        assert!(report.contains("Wind: 14.4 km/h N"));
        assert!(report.contains("2-DAY FORECAST:"));
        assert!(report.contains("2025-01-11: Overcast | High: 3°C | Low: -4°C"));
    }

    #[test]
    fn test_render_report_layout() {
        let at = Local.with_ymd_and_hms(2025, 1, 10, 8, 30, 0).unwrap();
        let report = render_report("Oslo", &forecast(), at);
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[2], "=".repeat(49));
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "CURRENT CONDITIONS:");
        assert_eq!(lines[10], "");
        assert_eq!(lines[11], "2-DAY FORECAST:");
        assert_eq!(lines[12], "2025-01-10: Snow | High: 5°C | Low: -2°C");
        assert_eq!(lines.len(), 14);
        assert!(report.ends_with("Low: -4°C\n"));
    }

    #[test]
    fn test_render_report_without_days() {
        let mut data = forecast();
        data.forecast.forecastday.clear();
        let report = render_report("Oslo", &data, Local::now());
        assert!(!report.contains("FORECAST:"));
    }
}
