use serde::{Deserialize, Deserializer, Serialize};

/// Temperature unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }

    /// Pick the matching reading from a Celsius/Fahrenheit pair
    pub fn pick(&self, celsius: f64, fahrenheit: f64) -> f64 {
        match self {
            Self::Celsius => celsius,
            Self::Fahrenheit => fahrenheit,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Celsius => Self::Fahrenheit,
            Self::Fahrenheit => Self::Celsius,
        }
    }
}

/// Condition text and icon code reported by the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Condition {
    pub text: String,
    #[serde(default)]
    pub code: Option<u32>,
}

/// Resolved location for a query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationInfo {
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub tz_id: String,
    #[serde(default)]
    pub localtime: String,
}

impl LocationInfo {
    /// "London, City of London, Greater London, United Kingdom" style label
    pub fn display_name(&self) -> String {
        [&self.name, &self.region, &self.country]
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Pollutant concentrations (µg/m³) and indices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirQuality {
    #[serde(default)]
    pub co: f64,
    #[serde(default)]
    pub no2: f64,
    #[serde(default)]
    pub o3: f64,
    #[serde(default)]
    pub so2: f64,
    #[serde(default)]
    pub pm2_5: f64,
    #[serde(default)]
    pub pm10: f64,
    #[serde(rename = "us-epa-index")]
    pub us_epa_index: u8,
    #[serde(rename = "gb-defra-index", default)]
    pub gb_defra_index: Option<u8>,
}

/// Current conditions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    #[serde(default)]
    pub last_updated: String,
    pub temp_c: f64,
    pub temp_f: f64,
    pub feelslike_c: f64,
    pub feelslike_f: f64,
    pub condition: Condition,
    #[serde(default)]
    pub wind_kph: f64,
    #[serde(default)]
    pub wind_dir: String,
    #[serde(default)]
    pub gust_kph: f64,
    #[serde(default)]
    pub pressure_mb: f64,
    #[serde(default)]
    pub humidity: u8,
    #[serde(default)]
    pub vis_km: f64,
    #[serde(default)]
    pub uv: f64,
    #[serde(default)]
    pub air_quality: Option<AirQuality>,
}

/// Daily aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySummary {
    pub maxtemp_c: f64,
    pub maxtemp_f: f64,
    pub mintemp_c: f64,
    pub mintemp_f: f64,
    #[serde(default)]
    pub totalprecip_mm: f64,
    #[serde(default)]
    pub maxwind_kph: f64,
    #[serde(default)]
    pub daily_chance_of_rain: u8,
    #[serde(default)]
    pub daily_chance_of_snow: u8,
    pub condition: Condition,
}

/// Sun and moon data for a day
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Astro {
    #[serde(default)]
    pub sunrise: String,
    #[serde(default)]
    pub sunset: String,
    #[serde(default)]
    pub moonrise: String,
    #[serde(default)]
    pub moonset: String,
    #[serde(default)]
    pub moon_phase: String,
    #[serde(default, deserialize_with = "number_or_string")]
    pub moon_illumination: u8,
}

/// Hourly forecast entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourForecast {
    /// Local time, "YYYY-MM-DD HH:MM"
    pub time: String,
    pub temp_c: f64,
    pub temp_f: f64,
    pub condition: Condition,
    #[serde(default)]
    pub chance_of_rain: u8,
    #[serde(default)]
    pub wind_kph: f64,
}

impl HourForecast {
    /// "HH:MM" part of the timestamp
    pub fn clock_time(&self) -> &str {
        self.time
            .split_once(' ')
            .map(|(_, clock)| clock)
            .unwrap_or(&self.time)
    }
}

/// Daily forecast entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: String,
    pub day: DaySummary,
    #[serde(default)]
    pub astro: Astro,
    #[serde(default)]
    pub hour: Vec<HourForecast>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Forecast {
    #[serde(default)]
    pub forecastday: Vec<ForecastDay>,
}

/// Government weather alert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub areas: String,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub expires: String,
    #[serde(default)]
    pub desc: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Alerts {
    #[serde(default)]
    pub alert: Vec<Alert>,
}

/// Body of `current.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentResponse {
    pub location: LocationInfo,
    pub current: CurrentWeather,
}

/// Body of `forecast.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub location: LocationInfo,
    pub current: CurrentWeather,
    #[serde(default)]
    pub forecast: Forecast,
    #[serde(default)]
    pub alerts: Alerts,
}

impl ForecastResponse {
    pub fn days(&self) -> &[ForecastDay] {
        &self.forecast.forecastday
    }

    pub fn today(&self) -> Option<&ForecastDay> {
        self.forecast.forecastday.first()
    }
}

/// Body of `ip.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpLookup {
    pub ip: String,
    #[serde(rename = "type", default)]
    pub ip_type: String,
    #[serde(default)]
    pub country_name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub city: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub tz_id: String,
    #[serde(default)]
    pub localtime: String,
}

impl IpLookup {
    /// Query for weather at the resolved place: "City, Country", else coordinates
    pub fn weather_query(&self) -> String {
        if self.city.is_empty() {
            format!("{},{}", self.lat, self.lon)
        } else if self.country_name.is_empty() {
            self.city.clone()
        } else {
            format!("{}, {}", self.city, self.country_name)
        }
    }
}

/// US EPA air quality band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
    Unknown,
}

impl AqiCategory {
    pub fn from_epa_index(index: u8) -> Self {
        match index {
            1 => Self::Good,
            2 => Self::Moderate,
            3 => Self::UnhealthyForSensitiveGroups,
            4 => Self::Unhealthy,
            5 => Self::VeryUnhealthy,
            6 => Self::Hazardous,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
            Self::Hazardous => "Hazardous",
            Self::Unknown => "Unknown",
        }
    }

    pub fn health_advice(&self) -> &'static str {
        match self {
            Self::Good => "Air quality is satisfactory",
            Self::Moderate => "Acceptable for most people",
            Self::UnhealthyForSensitiveGroups => {
                "Sensitive individuals should limit outdoor activities"
            }
            Self::Unhealthy => "Everyone should limit outdoor activities",
            Self::VeryUnhealthy => "Avoid outdoor activities",
            Self::Hazardous => "Emergency conditions - stay indoors",
            Self::Unknown => "Data unavailable",
        }
    }
}

/// Rough allergen level derived from the EPA index; the API has no pollen data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollenEstimate {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl PollenEstimate {
    pub fn from_epa_index(index: u8) -> Self {
        match index {
            0..=2 => Self::Low,
            3 => Self::Moderate,
            4 => Self::High,
            _ => Self::VeryHigh,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }

    pub fn tip(&self) -> &'static str {
        match self {
            Self::Low => "Good conditions for outdoor activities!",
            Self::Moderate => "Sensitive individuals should monitor symptoms.",
            Self::High | Self::VeryHigh => "Consider staying indoors and using air purifiers.",
        }
    }
}

/// Aggregates over a multi-day forecast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastSummary {
    pub avg_high_c: f64,
    pub avg_low_c: f64,
    pub avg_high_f: f64,
    pub avg_low_f: f64,
    pub total_precip_mm: f64,
    pub rainy_days: usize,
    pub days: usize,
}

impl ForecastSummary {
    /// Chance of rain above which a day counts as rainy
    pub const RAINY_DAY_THRESHOLD: u8 = 50;

    pub fn from_days(days: &[ForecastDay]) -> Option<Self> {
        if days.is_empty() {
            return None;
        }

        let n = days.len() as f64;
        let sum = |f: fn(&DaySummary) -> f64| days.iter().map(|d| f(&d.day)).sum::<f64>();

        Some(Self {
            avg_high_c: sum(|d| d.maxtemp_c) / n,
            avg_low_c: sum(|d| d.mintemp_c) / n,
            avg_high_f: sum(|d| d.maxtemp_f) / n,
            avg_low_f: sum(|d| d.mintemp_f) / n,
            total_precip_mm: sum(|d| d.totalprecip_mm),
            rainy_days: days
                .iter()
                .filter(|d| d.day.daily_chance_of_rain > Self::RAINY_DAY_THRESHOLD)
                .count(),
            days: days.len(),
        })
    }
}

/// Accepts `57`, `57.0` or `"57"`.
fn number_or_string<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Float(f64),
        Text(String),
    }

    let value = match Raw::deserialize(deserializer)? {
        Raw::Int(n) => n as f64,
        Raw::Float(f) => f,
        Raw::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom)?,
    };
    Ok(value.clamp(0.0, 100.0).round() as u8)
}
