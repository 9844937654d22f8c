//! Screens built from the display primitives.
//!
//! Every view takes already-decoded payloads; fetching and error reporting
//! happen in the menu loop.

use std::io::{self, Write};

use chrono::{NaiveDateTime, Timelike};
use stratus_core::Config;
use stratus_weather::{
    AirQuality, Alert, AqiCategory, Astro, CurrentWeather, ForecastDay, ForecastResponse,
    ForecastSummary, HourForecast, IpLookup, PollenEstimate, TemperatureUnit,
};

use crate::display::Printer;
use crate::style::{self, aqi_color, temperature_color, weather_icon};

const CARD_WIDTH: usize = 35;
const ALERT_WRAP_WIDTH: usize = 57;
const HOURLY_ROWS: usize = 12;
const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Rounded temperature in the preferred unit, e.g. `18°C`
pub fn format_temp(celsius: f64, fahrenheit: f64, unit: TemperatureUnit) -> String {
    let value = unit.pick(celsius, fahrenheit).round();
    // Avoid printing "-0"
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.0}{}", value, unit.symbol())
}

/// Greedy word wrap; a single word longer than `width` gets its own line.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };

        if needed > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Hourly entries from the location's current hour onwards.
///
/// Falls back to the first entries when the local time cannot be parsed.
pub fn upcoming_hours(data: &ForecastResponse, count: usize) -> Vec<&HourForecast> {
    let hours = data.days().iter().flat_map(|day| day.hour.iter());
    let now = NaiveDateTime::parse_from_str(&data.location.localtime, LOCAL_TIME_FORMAT).ok();

    let Some(start) = now.and_then(|now| now.date().and_hms_opt(now.hour(), 0, 0)) else {
        return hours.take(count).collect();
    };

    hours
        .filter(|h| {
            NaiveDateTime::parse_from_str(&h.time, LOCAL_TIME_FORMAT)
                .map(|time| time >= start)
                .unwrap_or(true)
        })
        .take(count)
        .collect()
}

/// Boxed summary of current conditions
pub fn weather_card<W: Write>(
    p: &mut Printer<W>,
    label: &str,
    current: &CurrentWeather,
    unit: TemperatureUnit,
) -> io::Result<()> {
    let t = p.theme();
    let border = "─".repeat(CARD_WIDTH + 2);
    let condition = &current.condition.text;
    let row = |text: String| format!("{:<width$}", text, width = CARD_WIDTH);

    p.blank()?;
    p.line(format!("╭{}╮", border))?;
    p.line(format!(
        "│ {} │",
        t.bold_fg(row(truncate(label, CARD_WIDTH)), style::CYAN)
    ))?;
    p.line(format!("├{}┤", border))?;
    p.line(format!(
        "│ {} │",
        row(format!("{} {}", weather_icon(condition), truncate(condition, CARD_WIDTH - 3)))
    ))?;
    p.line(format!(
        "│ {} │",
        t.bold_fg(
            row(format_temp(current.temp_c, current.temp_f, unit)),
            temperature_color(current.temp_c)
        )
    ))?;
    p.line(format!(
        "│ {} │",
        t.fg(
            row(format!(
                "Feels like {}",
                format_temp(current.feelslike_c, current.feelslike_f, unit)
            )),
            temperature_color(current.feelslike_c)
        )
    ))?;
    p.line(format!("╰{}╯", border))
}

/// Full conditions list; `location` is printed untruncated, unlike the card title
pub fn detailed_conditions<W: Write>(
    p: &mut Printer<W>,
    location: &str,
    current: &CurrentWeather,
    unit: TemperatureUnit,
) -> io::Result<()> {
    p.section_header("DETAILED CONDITIONS")?;

    p.key_value("Location", location, style::CYAN)?;

    p.key_value(
        "Temperature",
        format_temp(current.temp_c, current.temp_f, unit),
        temperature_color(current.temp_c),
    )?;
    p.key_value(
        "Feels Like",
        format_temp(current.feelslike_c, current.feelslike_f, unit),
        temperature_color(current.feelslike_c),
    )?;

    p.key_value("Wind Speed", format!("{:.0} km/h", current.wind_kph), style::CYAN)?;
    p.key_value("Wind Direction", &current.wind_dir, style::CYAN)?;
    p.key_value("Wind Gust", format!("{:.0} km/h", current.gust_kph), style::CYAN)?;

    p.key_value("Pressure", format!("{:.0} mb", current.pressure_mb), style::BLUE)?;
    p.key_value("Humidity", format!("{}%", current.humidity), style::BLUE)?;
    p.key_value("Visibility", format!("{:.0} km", current.vis_km), style::BLUE)?;
    p.key_value("UV Index", format!("{:.0}", current.uv), style::ORANGE)?;

    p.progress_bar(u32::from(current.humidity), "Humidity")?;
    p.progress_bar(((current.uv * 10.0).max(0.0) as u32).min(100), "UV Index")
}

pub fn today_forecast<W: Write>(
    p: &mut Printer<W>,
    today: &ForecastDay,
    unit: TemperatureUnit,
) -> io::Result<()> {
    let day = &today.day;
    p.section_header("TODAY'S FORECAST")?;

    p.key_value(
        "Max Temperature",
        format_temp(day.maxtemp_c, day.maxtemp_f, unit),
        temperature_color(day.maxtemp_c),
    )?;
    p.key_value(
        "Min Temperature",
        format_temp(day.mintemp_c, day.mintemp_f, unit),
        temperature_color(day.mintemp_c),
    )?;
    p.key_value("Condition", &day.condition.text, style::GREEN)?;
    p.key_value("Precipitation", format!("{:.1} mm", day.totalprecip_mm), style::BLUE)?;
    p.key_value("Max Wind", format!("{:.0} km/h", day.maxwind_kph), style::CYAN)?;

    p.progress_bar(u32::from(day.daily_chance_of_rain), "Chance of Rain")?;
    p.progress_bar(u32::from(day.daily_chance_of_snow), "Chance of Snow")?;

    astronomy(p, &today.astro)
}

pub fn astronomy<W: Write>(p: &mut Printer<W>, astro: &Astro) -> io::Result<()> {
    p.section_header("ASTRONOMY")?;

    p.key_value("Sunrise", &astro.sunrise, style::ORANGE)?;
    p.key_value("Sunset", &astro.sunset, style::ORANGE)?;
    p.key_value("Moonrise", &astro.moonrise, style::PURPLE)?;
    p.key_value("Moonset", &astro.moonset, style::PURPLE)?;
    p.key_value("Moon Phase", &astro.moon_phase, style::PURPLE)?;

    p.progress_bar(u32::from(astro.moon_illumination), "Moon Illumination")
}

/// Current weather screen: card, details, then today's outlook
pub fn current_overview<W: Write>(
    p: &mut Printer<W>,
    location: &str,
    data: &ForecastResponse,
    unit: TemperatureUnit,
) -> io::Result<()> {
    weather_card(p, location, &data.current, unit)?;
    detailed_conditions(p, location, &data.current, unit)?;
    if let Some(today) = data.today() {
        today_forecast(p, today, unit)?;
    }
    Ok(())
}

/// Multi-day table followed by aggregates
pub fn extended_forecast<W: Write>(
    p: &mut Printer<W>,
    days: &[ForecastDay],
    unit: TemperatureUnit,
) -> io::Result<()> {
    let t = p.theme();
    p.section_header(&format!("{}-DAY FORECAST", days.len()))?;

    p.blank()?;
    p.line(t.bold(format!(
        "{:<8}{:<15}{:>8}{:>8}{:>8}{:>10}",
        "Date", "Condition", "High", "Low", "Rain%", "Wind"
    )))?;
    p.line("─".repeat(57))?;

    for day in days {
        let summary = &day.day;
        // "2025-06-01" -> "06-01"
        let date = day.date.get(5..).unwrap_or(&day.date);
        p.line(format!(
            "{}{:<15}{}{}{}{}",
            t.fg(format!("{:<8}", date), style::CYAN),
            truncate(&summary.condition.text, 13),
            t.fg(
                format!("{:>8}", format_temp(summary.maxtemp_c, summary.maxtemp_f, unit)),
                temperature_color(summary.maxtemp_c)
            ),
            t.fg(
                format!("{:>8}", format_temp(summary.mintemp_c, summary.mintemp_f, unit)),
                temperature_color(summary.mintemp_c)
            ),
            t.fg(format!("{:>7}%", summary.daily_chance_of_rain), style::BLUE),
            t.fg(format!("{:>6.0} kph", summary.maxwind_kph), style::GRAY),
        ))?;
    }

    if let Some(summary) = ForecastSummary::from_days(days) {
        forecast_summary(p, &summary, unit)?;
    }
    Ok(())
}

pub fn forecast_summary<W: Write>(
    p: &mut Printer<W>,
    summary: &ForecastSummary,
    unit: TemperatureUnit,
) -> io::Result<()> {
    p.section_header("FORECAST SUMMARY")?;

    p.key_value(
        "Avg High",
        format_temp(summary.avg_high_c, summary.avg_high_f, unit),
        temperature_color(summary.avg_high_c),
    )?;
    p.key_value(
        "Avg Low",
        format_temp(summary.avg_low_c, summary.avg_low_f, unit),
        temperature_color(summary.avg_low_c),
    )?;
    p.key_value("Total Rain", format!("{:.1} mm", summary.total_precip_mm), style::BLUE)?;
    p.key_value(
        "Rainy Days",
        format!("{}/{}", summary.rainy_days, summary.days),
        style::BLUE,
    )
}

pub fn hourly_forecast<W: Write>(
    p: &mut Printer<W>,
    data: &ForecastResponse,
    unit: TemperatureUnit,
) -> io::Result<()> {
    let t = p.theme();
    let hours = upcoming_hours(data, HOURLY_ROWS);

    p.section_header(&format!("NEXT {} HOURS", HOURLY_ROWS))?;
    if hours.is_empty() {
        return p.warning_message("Hourly data not available for this location");
    }

    p.blank()?;
    p.line(t.bold(format!(
        "{:<7}{:<13}{:>7}{:>7}{:>10}",
        "Time", "Condition", "Temp", "Rain%", "Wind"
    )))?;
    p.line("─".repeat(44))?;

    for hour in hours {
        p.line(format!(
            "{}{:<13}{}{}{}",
            t.fg(format!("{:<7}", hour.clock_time()), style::CYAN),
            truncate(&hour.condition.text, 11),
            t.fg(
                format!("{:>7}", format_temp(hour.temp_c, hour.temp_f, unit)),
                temperature_color(hour.temp_c)
            ),
            t.fg(format!("{:>6}%", hour.chance_of_rain), style::BLUE),
            t.fg(format!("{:>6.0} kph", hour.wind_kph), style::GRAY),
        ))?;
    }
    Ok(())
}

pub fn air_quality<W: Write>(
    p: &mut Printer<W>,
    location: &str,
    air: Option<&AirQuality>,
) -> io::Result<()> {
    p.section_header(&format!("AIR QUALITY INDEX - {}", location))?;

    let Some(aq) = air else {
        return p.warning_message("Air quality data not available for this location");
    };

    let index = aq.us_epa_index;
    let category = AqiCategory::from_epa_index(index);
    p.key_value(
        "AQI Level",
        format!("{} - {}", index, category.label()),
        aqi_color(index),
    )?;
    p.key_value("Health Advice", category.health_advice(), style::YELLOW)?;
    if let Some(defra) = aq.gb_defra_index {
        p.key_value("UK DEFRA Index", format!("{}/10", defra), style::GRAY)?;
    }

    p.blank()?;
    p.progress_bar((u32::from(index) * 16).min(100), "Air Quality Index")?;

    p.section_header("POLLUTANT BREAKDOWN")?;
    let pollutants = [
        ("Carbon Monoxide", aq.co),
        ("Nitrogen Dioxide", aq.no2),
        ("Ozone", aq.o3),
        ("Sulphur Dioxide", aq.so2),
        ("PM 2.5", aq.pm2_5),
        ("PM 10", aq.pm10),
    ];
    for (name, value) in pollutants {
        p.key_value(name, format!("{:.1} µg/m³", value), style::CYAN)?;
    }
    Ok(())
}

fn alert_box<W: Write>(p: &mut Printer<W>, number: usize, alert: &Alert) -> io::Result<()> {
    let t = p.theme();
    p.blank()?;
    p.line(format!("╭── Alert {} {}╮", number, "─".repeat(48)))?;
    p.line(format!("│ {}", t.bold_fg(format!("⚠️  {}", alert.headline), style::RED)))?;
    p.line(format!("├{}┤", "─".repeat(59)))?;
    p.line(format!("│ {}{}", t.bold("Severity: "), t.fg(&alert.severity, style::ORANGE)))?;
    if !alert.event.is_empty() {
        p.line(format!("│ {}{}", t.bold("Event: "), alert.event))?;
    }
    p.line(format!("│ {}{}", t.bold("Areas: "), alert.areas))?;
    p.line(format!("│ {}{}", t.bold("Expires: "), alert.expires))?;
    p.line(format!("│ {}", t.bold("Description: ")))?;
    for line in wrap_words(&alert.desc, ALERT_WRAP_WIDTH) {
        p.line(format!("│ {}", line))?;
    }
    p.line(format!("╰{}╯", "─".repeat(59)))
}

pub fn weather_alerts<W: Write>(
    p: &mut Printer<W>,
    location: &str,
    alerts: &[Alert],
) -> io::Result<()> {
    p.section_header(&format!("WEATHER ALERTS - {}", location))?;

    if alerts.is_empty() {
        return p.success_message(&format!(
            "No weather alerts for {} - All clear! 🌤️",
            location
        ));
    }

    for (i, alert) in alerts.iter().enumerate() {
        alert_box(p, i + 1, alert)?;
    }
    Ok(())
}

pub fn pollen<W: Write>(
    p: &mut Printer<W>,
    location: &str,
    air: Option<&AirQuality>,
) -> io::Result<()> {
    let t = p.theme();
    p.section_header(&format!("POLLEN & ALLERGEN DATA - {}", location))?;
    p.info_message(
        "Detailed pollen data requires a specialized API. Showing available air quality metrics.",
    )?;

    let Some(aq) = air else {
        return p.warning_message("Pollen data not available for this location");
    };

    let index = aq.us_epa_index;
    let estimate = PollenEstimate::from_epa_index(index);
    p.key_value("Estimated Pollen", estimate.label(), aqi_color(index))?;
    p.key_value("Air Quality", format!("{}/6", index), aqi_color(index))?;
    p.progress_bar((u32::from(index) * 16).min(100), "Allergen Risk Level")?;

    p.blank()?;
    p.line(t.fg(format!("💡 Tip: {}", estimate.tip()), style::YELLOW))
}

pub fn ip_lookup<W: Write>(p: &mut Printer<W>, ip: &IpLookup) -> io::Result<()> {
    p.section_header("IP GEOLOCATION LOOKUP")?;

    p.key_value("IP Address", &ip.ip, style::CYAN)?;
    p.key_value("Type", &ip.ip_type, style::CYAN)?;
    p.key_value("Country", &ip.country_name, style::GREEN)?;
    p.key_value("Region", &ip.region, style::GREEN)?;
    p.key_value("City", &ip.city, style::GREEN)?;
    p.key_value("Latitude", format!("{:.4}", ip.lat), style::YELLOW)?;
    p.key_value("Longitude", format!("{:.4}", ip.lon), style::YELLOW)?;
    p.key_value("Timezone", &ip.tz_id, style::PURPLE)?;
    p.key_value("Local Time", &ip.localtime, style::PURPLE)
}

pub fn main_menu<W: Write>(p: &mut Printer<W>) -> io::Result<()> {
    let t = p.theme();
    let entries = [
        ("1", "🌤️  Current Weather & Today's Forecast"),
        ("2", "📅  7-Day Extended Forecast"),
        ("3", "🕒  Hourly Forecast"),
        ("4", "💨  Air Quality Index & Pollution Data"),
        ("5", "⚠️   Weather Alerts & Warnings"),
        ("6", "🌿  Pollen & Allergen Information"),
        ("7", "🌍  IP Geolocation & Weather"),
        ("8", "⚙️   Settings & Configuration"),
        ("9", "📄  Export Weather Report"),
        ("0", "🚪  Exit"),
    ];

    p.blank()?;
    p.line(format!("╭{:─^57}╮", " MAIN MENU "))?;
    for (key, label) in entries {
        p.line(format!("│ {} {}", t.bold(format!("{}.", key)), label))?;
    }
    p.line(format!("╰{}╯", "─".repeat(57)))
}

/// Current settings followed by the settings menu
pub fn settings_menu<W: Write>(
    p: &mut Printer<W>,
    config: &Config,
    logging_enabled: bool,
    cached_entries: usize,
) -> io::Result<()> {
    let t = p.theme();
    p.section_header("SETTINGS & CONFIGURATION")?;

    p.blank()?;
    p.line(t.bold("Current Configuration:"))?;
    p.key_value("API Key", config.masked_api_key(), style::GRAY)?;
    p.key_value("Base URL", &config.api.base_url, style::GRAY)?;
    p.key_value(
        "Timeout",
        format!("{} seconds", config.http.timeout_secs),
        style::CYAN,
    )?;
    p.key_value(
        "Retries",
        format!(
            "{} attempts, {}s backoff",
            config.http.max_attempts, config.http.backoff_secs
        ),
        style::CYAN,
    )?;
    p.key_value(
        "Logging",
        if logging_enabled { "Enabled" } else { "Disabled" },
        if logging_enabled { style::GREEN } else { style::RED },
    )?;
    p.key_value(
        "Units",
        config.display.temperature_unit.symbol(),
        style::CYAN,
    )?;
    p.key_value(
        "Cache",
        format!("{} entries, {}s TTL", cached_entries, config.cache.ttl_secs),
        style::CYAN,
    )?;

    let entries = [
        ("1", "🔑 Configure API Key"),
        ("2", "📊 Toggle Logging"),
        ("3", "🌡️  Switch Temperature Unit"),
        ("4", "🗑️  Clear Cache"),
        ("5", "📤 Export Settings"),
        ("6", "📥 Import Settings"),
        ("7", "⬅️  Back to Main Menu"),
    ];
    p.blank()?;
    p.line(format!("╭{:─^36}╮", " Settings Menu "))?;
    for (key, label) in entries {
        p.line(format!("│ {}. {}", key, label))?;
    }
    p.line(format!("╰{}╯", "─".repeat(36)))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::style::Theme;
    use serde_json::json;

    fn printer() -> Printer<Vec<u8>> {
        Printer::new(Vec::new(), Theme::plain())
    }

    fn output(p: Printer<Vec<u8>>) -> String {
        String::from_utf8(p.into_inner()).unwrap()
    }

    fn hour(time: &str, temp: f64) -> serde_json::Value {
        json!({"time": time, "temp_c": temp, "temp_f": temp * 1.8 + 32.0,
               "condition": {"text": "Clear"}, "chance_of_rain": 10, "wind_kph": 7.0})
    }

    fn forecast(localtime: &str) -> ForecastResponse {
        let day1: Vec<_> = (0..24).map(|h| hour(&format!("2025-06-01 {:02}:00", h), 10.0 + h as f64)).collect();
        let day2: Vec<_> = (0..24).map(|h| hour(&format!("2025-06-02 {:02}:00", h), 5.0)).collect();
        serde_json::from_value(json!({
            "location": {"name": "Lisbon", "lat": 38.7, "lon": -9.1, "localtime": localtime},
            "current": {
                "temp_c": 27.0, "temp_f": 80.6, "feelslike_c": 28.0, "feelslike_f": 82.4,
                "condition": {"text": "Sunny"}, "humidity": 40, "uv": 7.0,
                "air_quality": {"co": 200.0, "no2": 10.0, "o3": 90.0, "so2": 1.0,
                                "pm2_5": 8.0, "pm10": 12.0, "us-epa-index": 2}
            },
            "forecast": {"forecastday": [
                {"date": "2025-06-01", "day": {"maxtemp_c": 30.0, "maxtemp_f": 86.0,
                  "mintemp_c": 18.0, "mintemp_f": 64.4, "totalprecip_mm": 0.0,
                  "daily_chance_of_rain": 0, "condition": {"text": "Sunny"}},
                 "astro": {"sunrise": "06:12 AM", "sunset": "08:59 PM", "moon_phase": "Waxing Crescent",
                           "moon_illumination": "23"},
                 "hour": day1},
                {"date": "2025-06-02", "day": {"maxtemp_c": 24.0, "maxtemp_f": 75.2,
                  "mintemp_c": 16.0, "mintemp_f": 60.8, "totalprecip_mm": 4.2,
                  "daily_chance_of_rain": 80, "condition": {"text": "Patchy rain nearby"}},
                 "hour": day2}
            ]}
        }))
        .unwrap()
    }

    #[test]
    fn test_format_temp() {
        assert_eq!(format_temp(18.4, 65.1, TemperatureUnit::Celsius), "18°C");
        assert_eq!(format_temp(18.4, 65.1, TemperatureUnit::Fahrenheit), "65°F");
        assert_eq!(format_temp(-0.4, 31.3, TemperatureUnit::Celsius), "0°C");
    }

    #[test]
    fn test_wrap_words() {
        let text = "Heavy rain is expected across the region tonight with local flooding likely in low lying areas near rivers";
        let lines = wrap_words(text, 57);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 57));
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_long_word_and_empty() {
        let long = "x".repeat(70);
        assert_eq!(wrap_words(&format!("a {} b", long), 57), vec!["a".to_string(), long, "b".to_string()]);
        assert!(wrap_words("   ", 57).is_empty());
    }

    #[test]
    fn test_upcoming_hours_starts_at_local_hour() {
        let data = forecast("2025-06-01 9:41");
        let hours = upcoming_hours(&data, 12);
        assert_eq!(hours.len(), 12);
        assert_eq!(hours[0].time, "2025-06-01 09:00");
        assert_eq!(hours[11].time, "2025-06-01 20:00");
    }

    #[test]
    fn test_upcoming_hours_crosses_midnight() {
        let data = forecast("2025-06-01 22:05");
        let hours = upcoming_hours(&data, 12);
        assert_eq!(hours[0].time, "2025-06-01 22:00");
        assert_eq!(hours[2].time, "2025-06-02 00:00");
        assert_eq!(hours.len(), 12);
    }

    #[test]
    fn test_upcoming_hours_without_local_time() {
        let data = forecast("");
        let hours = upcoming_hours(&data, 12);
        assert_eq!(hours[0].time, "2025-06-01 00:00");
    }

    #[test]
    fn test_current_overview() {
        let mut p = printer();
        current_overview(&mut p, "Lisbon", &forecast("2025-06-01 12:00"), TemperatureUnit::Celsius).unwrap();
        let out = output(p);

        assert!(out.contains("Lisbon"));
        assert!(out.contains("27°C"));
        assert!(out.contains("Feels like 28°C"));
        assert!(out.contains("DETAILED CONDITIONS"));
        assert!(out.contains("TODAY'S FORECAST"));
        assert!(out.contains("Moon Phase:       Waxing Crescent"));
        assert!(out.contains("Moon Illumination: ["));
        assert!(out.contains("] 23%"));
        assert!(out.contains("UV Index: ["));
        assert!(out.contains("] 70%"));
    }

    #[test]
    fn test_long_location_name_is_shown_in_full() {
        let name = "Llanfairpwllgwyngyll, Isle of Anglesey, United Kingdom";
        let mut p = printer();
        current_overview(&mut p, name, &forecast("2025-06-01 12:00"), TemperatureUnit::Celsius).unwrap();
        let out = output(p);

        assert!(name.chars().count() > CARD_WIDTH);
        assert!(out.contains(&format!("Location:         {}", name)));
        // The card title stays inside its box
        assert!(out.contains(&format!("│ {} │", truncate(name, CARD_WIDTH))));
    }

    #[test]
    fn test_fahrenheit_preference() {
        let mut p = printer();
        current_overview(&mut p, "Lisbon", &forecast("2025-06-01 12:00"), TemperatureUnit::Fahrenheit).unwrap();
        let out = output(p);
        assert!(out.contains("81°F"));
        assert!(!out.contains("°C"));
    }

    #[test]
    fn test_extended_forecast_with_summary() {
        let mut p = printer();
        let data = forecast("2025-06-01 12:00");
        extended_forecast(&mut p, data.days(), TemperatureUnit::Celsius).unwrap();
        let out = output(p);

        assert!(out.contains("2-DAY FORECAST"));
        assert!(out.contains("06-02"));
        assert!(out.contains("Patchy rain n"));
        assert!(!out.contains("Patchy rain ne"));
        assert!(out.contains("FORECAST SUMMARY"));
        assert!(out.contains("Avg High:         27°C"));
        assert!(out.contains("Total Rain:       4.2 mm"));
        assert!(out.contains("Rainy Days:       1/2"));
    }

    #[test]
    fn test_extended_forecast_empty_has_no_summary() {
        let mut p = printer();
        extended_forecast(&mut p, &[], TemperatureUnit::Celsius).unwrap();
        assert!(!output(p).contains("FORECAST SUMMARY"));
    }

    #[test]
    fn test_hourly_forecast_rows() {
        let mut p = printer();
        hourly_forecast(&mut p, &forecast("2025-06-01 9:41"), TemperatureUnit::Celsius).unwrap();
        let out = output(p);
        assert!(out.contains("NEXT 12 HOURS"));
        assert!(out.contains("09:00"));
        assert!(out.contains("20:00"));
        assert!(!out.contains("21:00"));
    }

    #[test]
    fn test_air_quality_view() {
        let data = forecast("");
        let mut p = printer();
        air_quality(&mut p, "Lisbon", data.current.air_quality.as_ref()).unwrap();
        let out = output(p);
        assert!(out.contains("AIR QUALITY INDEX - Lisbon"));
        assert!(out.contains("2 - Moderate"));
        assert!(out.contains("Acceptable for most people"));
        assert!(out.contains("] 32%"));
        assert!(out.contains("Ozone:            90.0 µg/m³"));
    }

    #[test]
    fn test_air_quality_missing() {
        let mut p = printer();
        air_quality(&mut p, "Nowhere", None).unwrap();
        assert!(output(p).contains("Air quality data not available"));
    }

    #[test]
    fn test_alerts_view() {
        let alerts: Vec<Alert> = serde_json::from_value(json!([{
            "headline": "Flood Warning issued",
            "severity": "Moderate",
            "areas": "Coastal districts",
            "expires": "2025-06-02T06:00:00+00:00",
            "desc": "Heavy rain is expected across the region tonight with local flooding likely in low lying areas near rivers"
        }]))
        .unwrap();

        let mut p = printer();
        weather_alerts(&mut p, "Lisbon", &alerts).unwrap();
        let out = output(p);
        assert!(out.contains("╭── Alert 1"));
        assert!(out.contains("⚠️  Flood Warning issued"));
        assert!(out.contains("Severity: Moderate"));
        assert!(out
            .lines()
            .filter(|l| l.starts_with("│ ") && !l.contains(':'))
            .all(|l| l.chars().count() <= 59));
    }

    #[test]
    fn test_no_alerts() {
        let mut p = printer();
        weather_alerts(&mut p, "Lisbon", &[]).unwrap();
        assert!(output(p).contains("No weather alerts for Lisbon - All clear!"));
    }

    #[test]
    fn test_pollen_view() {
        let data = forecast("");
        let mut p = printer();
        pollen(&mut p, "Lisbon", data.current.air_quality.as_ref()).unwrap();
        let out = output(p);
        assert!(out.contains("Estimated Pollen: Low"));
        assert!(out.contains("Air Quality:      2/6"));
        assert!(out.contains("Good conditions for outdoor activities!"));
    }

    #[test]
    fn test_ip_lookup_view() {
        let ip: IpLookup = serde_json::from_value(json!({
            "ip": "8.8.8.8", "type": "ipv4", "country_name": "United States",
            "region": "California", "city": "Mountain View",
            "lat": 37.386, "lon": -122.0838, "tz_id": "America/Los_Angeles",
            "localtime": "2025-06-01 4:05"
        }))
        .unwrap();
        let mut p = printer();
        ip_lookup(&mut p, &ip).unwrap();
        let out = output(p);
        assert!(out.contains("IP Address:       8.8.8.8"));
        assert!(out.contains("Longitude:        -122.0838"));
        assert!(out.contains("Timezone:         America/Los_Angeles"));
    }

    #[test]
    fn test_settings_menu_masks_key() {
        let mut config = Config::default();
        config.set_api_key("0123456789abcdef");
        let mut p = printer();
        settings_menu(&mut p, &config, true, 3).unwrap();
        let out = output(p);
        assert!(out.contains("API Key:          01234567..."));
        assert!(!out.contains("89abcdef"));
        assert!(out.contains("Logging:          Enabled"));
        assert!(out.contains("3 entries, 300s TTL"));
    }
}
