//! Interactive menu loop.
//!
//! The loop is synchronous and drives async requests through a runtime
//! [`Handle`], so it must not be called from inside the runtime.

use std::future::Future;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use stratus_core::{AppError, Config};
use stratus_weather::report::DEFAULT_REPORT_FILE;
use stratus_weather::{
    export_report, is_valid_ipv4, FetchError, FetchObserver, Fetcher, FileLogObserver, LogLevel,
    ResponseCache, TemperatureUnit, WeatherService,
};
use tokio::runtime::Handle;

use crate::display::Printer;
use crate::spinner::Spinner;
use crate::style::{self, Theme};
use crate::views;

/// Days fetched for the current-weather screen (today's outlook only)
const CURRENT_FORECAST_DAYS: u8 = 1;

/// Build the weather service for `config` on top of an existing cache.
pub fn build_service(
    config: &Config,
    cache: Arc<ResponseCache>,
    observer: Arc<dyn FetchObserver>,
) -> Result<WeatherService> {
    let fetcher = Fetcher::new(config.fetcher_config(), cache)
        .context("Failed to build HTTP client")?
        .with_observer(observer);
    Ok(WeatherService::new(fetcher, config.api_config()).with_cache(config.cache.enabled))
}

/// Menu-driven front end over one [`WeatherService`]
pub struct App<R: BufRead, W: Write> {
    input: R,
    pub(crate) printer: Printer<W>,
    runtime: Handle,
    pub(crate) config: Config,
    pub(crate) config_path: PathBuf,
    pub(crate) cache: Arc<ResponseCache>,
    pub(crate) activity: Arc<FileLogObserver>,
    pub(crate) service: WeatherService,
    animate: bool,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub fn new(
        runtime: Handle,
        config: Config,
        config_path: PathBuf,
        input: R,
        output: W,
        theme: Theme,
    ) -> Result<Self> {
        let cache = Arc::new(ResponseCache::new(config.cache_ttl()));

        if let Some(parent) = config.logging.file.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    tracing::warn!("Cannot create log directory {}: {}", parent.display(), e);
                }
            }
        }
        let activity = Arc::new(FileLogObserver::new(
            config.logging.file.clone(),
            config.logging.enabled,
        ));

        let service = build_service(&config, cache.clone(), activity.clone())?;
        activity.log(LogLevel::Info, "Stratus started");

        Ok(Self {
            input,
            printer: Printer::new(output, theme),
            runtime,
            config,
            config_path,
            cache,
            activity,
            service,
            animate: theme.is_colored(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn activity(&self) -> &Arc<FileLogObserver> {
        &self.activity
    }

    pub fn service(&self) -> &WeatherService {
        &self.service
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn output(&self) -> &W {
        self.printer.get_ref()
    }

    /// Hand back the output sink
    pub fn into_output(self) -> W {
        self.printer.into_inner()
    }

    pub(crate) fn unit(&self) -> TemperatureUnit {
        self.config.display.temperature_unit
    }

    /// Swap in a service built from the current config, keeping the cache
    pub(crate) fn rebuild_service(&mut self) -> Result<()> {
        self.service = build_service(&self.config, self.cache.clone(), self.activity.clone())?;
        tracing::info!("Weather service rebuilt");
        Ok(())
    }

    /// Trimmed line of input, `None` at end of input
    pub(crate) fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub(crate) fn prompt_line(&mut self, text: &str) -> io::Result<Option<String>> {
        self.printer.prompt(text)?;
        self.read_line()
    }

    /// Wait for Enter; `false` at end of input
    fn pause(&mut self, text: &str) -> io::Result<bool> {
        self.printer.hint(text)?;
        Ok(self.read_line()?.is_some())
    }

    pub(crate) fn begin_screen(&mut self) -> io::Result<()> {
        self.printer.clear_screen()?;
        self.printer.banner(Local::now())
    }

    /// Drive `future` to completion with the spinner running
    fn wait_for<F: Future>(&self, message: &str, future: F) -> F::Output {
        let spinner = self
            .animate
            .then(|| Spinner::start(&self.runtime, message, self.printer.theme()));
        let output = self.runtime.block_on(future);
        if let Some(spinner) = spinner {
            spinner.finish();
        }
        output
    }

    fn report_failure(&mut self, what: &str, error: FetchError) -> io::Result<()> {
        let detail = error.detail().to_string();
        let error = AppError::from(error);
        tracing::warn!("{}: {}", what, error);

        self.printer
            .error_message(&format!("{}: {}", what, error.user_message()))?;
        if !detail.is_empty() {
            let t = self.printer.theme();
            self.printer.line(t.dim(format!("  Details: {}", detail)))?;
        }
        Ok(())
    }

    /// Quick lookup for a location given on the command line
    pub fn quick_lookup(&mut self, location: &str) -> Result<()> {
        self.begin_screen()?;
        self.printer
            .info_message(&format!("Quick lookup for: {}", location))?;
        self.show_current(location)
    }

    /// Menu loop; returns when the user exits or input ends
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.begin_screen()?;
            views::main_menu(&mut self.printer)?;

            let Some(choice) = self.prompt_line("Select an option (0-9): ")? else {
                break;
            };

            match choice.as_str() {
                "0" | "exit" | "quit" => break,
                "8" => {
                    self.settings()?;
                    continue;
                }
                _ => self.dispatch(&choice)?,
            }

            if !self.pause("Press Enter to return to main menu...")? {
                break;
            }
        }

        self.shutdown()
    }

    /// Continue from a quick lookup into the menu
    pub fn pause_before_menu(&mut self) -> Result<bool> {
        Ok(self.pause("Press Enter to continue to main menu...")?)
    }

    fn dispatch(&mut self, choice: &str) -> Result<()> {
        match choice {
            "1" => self.with_location(Self::show_current),
            "2" => self.with_location(Self::show_extended),
            "3" => self.with_location(Self::show_hourly),
            "4" => self.with_location(Self::show_air_quality),
            "5" => self.with_location(Self::show_alerts),
            "6" => self.with_location(Self::show_pollen),
            "7" => {
                let Some(ip) = self.prompt_ip()? else {
                    return Ok(());
                };
                self.show_ip_lookup(&ip)
            }
            "9" => self.export_report_flow(),
            _ => {
                self.printer
                    .error_message("Invalid choice. Please select 0-9.")?;
                Ok(())
            }
        }
    }

    fn prompt_location(&mut self) -> io::Result<Option<String>> {
        self.prompt_line("🌍 Enter location (city, coordinates, or postal code): ")
    }

    fn with_location(&mut self, action: fn(&mut Self, &str) -> Result<()>) -> Result<()> {
        let Some(location) = self.prompt_location()? else {
            return Ok(());
        };
        if location.is_empty() {
            self.printer.error_message("Location cannot be empty")?;
            return Ok(());
        }
        action(self, &location)
    }

    /// Empty input and `auto` both mean the caller's own address
    fn prompt_ip(&mut self) -> io::Result<Option<String>> {
        let Some(ip) = self.prompt_line("🌐 Enter IP address (or 'auto' for your IP): ")? else {
            return Ok(None);
        };
        let ip = if ip.is_empty() || ip.eq_ignore_ascii_case("auto") {
            "auto".to_string()
        } else {
            ip
        };

        if ip != "auto" && !is_valid_ipv4(&ip) {
            self.printer.warning_message(&format!(
                "{} is not a dotted IPv4 address; sending it as entered",
                ip
            ))?;
        }
        Ok(Some(ip))
    }

    pub(crate) fn show_current(&mut self, location: &str) -> Result<()> {
        let result = self.wait_for(
            "Fetching current weather data",
            self.service.forecast(location, CURRENT_FORECAST_DAYS),
        );

        match result {
            Ok(data) => {
                self.begin_screen()?;
                let resolved = data.location.display_name();
                let label = if resolved.is_empty() {
                    location
                } else {
                    resolved.as_str()
                };
                let unit = self.unit();
                views::current_overview(&mut self.printer, label, &data, unit)?;
            }
            Err(e) => {
                self.report_failure(&format!("Failed to fetch weather data for {}", location), e)?
            }
        }
        Ok(())
    }

    fn show_extended(&mut self, location: &str) -> Result<()> {
        let result = self.wait_for(
            "Fetching extended forecast",
            self.service
                .forecast(location, stratus_weather::service::DEFAULT_FORECAST_DAYS),
        );

        match result {
            Ok(data) => {
                self.begin_screen()?;
                let unit = self.unit();
                views::extended_forecast(&mut self.printer, data.days(), unit)?;
            }
            Err(e) => {
                self.report_failure(&format!("Failed to fetch forecast data for {}", location), e)?
            }
        }
        Ok(())
    }

    fn show_hourly(&mut self, location: &str) -> Result<()> {
        let result = self.wait_for("Fetching hourly forecast", self.service.hourly(location));

        match result {
            Ok(data) => {
                self.begin_screen()?;
                let unit = self.unit();
                views::hourly_forecast(&mut self.printer, &data, unit)?;
            }
            Err(e) => {
                self.report_failure(&format!("Failed to fetch hourly data for {}", location), e)?
            }
        }
        Ok(())
    }

    fn show_air_quality(&mut self, location: &str) -> Result<()> {
        let result = self.wait_for("Fetching air quality data", self.service.air_quality(location));

        match result {
            Ok(data) => {
                self.begin_screen()?;
                views::air_quality(&mut self.printer, location, data.current.air_quality.as_ref())?;
            }
            Err(e) => self.report_failure(
                &format!("Failed to fetch air quality data for {}", location),
                e,
            )?,
        }
        Ok(())
    }

    fn show_alerts(&mut self, location: &str) -> Result<()> {
        let result = self.wait_for("Checking weather alerts", self.service.alerts(location));

        match result {
            Ok(data) => {
                self.begin_screen()?;
                views::weather_alerts(&mut self.printer, location, &data.alerts.alert)?;
            }
            Err(e) => {
                self.report_failure(&format!("Failed to fetch alerts for {}", location), e)?
            }
        }
        Ok(())
    }

    fn show_pollen(&mut self, location: &str) -> Result<()> {
        let result = self.wait_for("Fetching pollen information", self.service.air_quality(location));

        match result {
            Ok(data) => {
                self.begin_screen()?;
                views::pollen(&mut self.printer, location, data.current.air_quality.as_ref())?;
            }
            Err(e) => {
                self.report_failure(&format!("Failed to fetch pollen data for {}", location), e)?
            }
        }
        Ok(())
    }

    fn show_ip_lookup(&mut self, ip: &str) -> Result<()> {
        let lookup = match self.wait_for("Looking up IP information", self.service.ip_lookup(ip)) {
            Ok(lookup) => lookup,
            Err(e) => {
                self.report_failure(&format!("Failed to lookup IP: {}", ip), e)?;
                return Ok(());
            }
        };

        self.begin_screen()?;
        views::ip_lookup(&mut self.printer, &lookup)?;

        let location = lookup.weather_query();
        self.printer
            .info_message("Fetching weather for detected location...")?;
        let unit = self.unit();
        match self.wait_for("Loading weather data", self.service.current(&location)) {
            Ok(weather) => views::weather_card(&mut self.printer, &location, &weather.current, unit)?,
            Err(e) => {
                self.report_failure(&format!("Failed to fetch weather data for {}", location), e)?
            }
        }
        Ok(())
    }

    fn export_report_flow(&mut self) -> Result<()> {
        let Some(location) = self.prompt_location()? else {
            return Ok(());
        };
        if location.is_empty() {
            self.printer.error_message("Location cannot be empty")?;
            return Ok(());
        }

        let Some(filename) = self.prompt_line(&format!(
            "📄 Enter filename (default: {}): ",
            DEFAULT_REPORT_FILE
        ))?
        else {
            return Ok(());
        };
        let path = if filename.is_empty() {
            PathBuf::from(DEFAULT_REPORT_FILE)
        } else {
            PathBuf::from(filename)
        };

        let result = self.wait_for(
            "Generating weather report",
            export_report(&self.service, &location, &path),
        );

        match result {
            Ok(()) => {
                self.activity.log(
                    LogLevel::Info,
                    &format!("Weather report for {} exported to {}", location, path.display()),
                );
                self.printer.success_message(&format!(
                    "Weather report exported to {}",
                    path.display()
                ))?;
            }
            Err(e) => {
                let error = AppError::from(e);
                tracing::warn!("Report export failed: {}", error);
                self.printer.error_message(&format!(
                    "Failed to export weather report: {}",
                    error.user_message()
                ))?;
            }
        }
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.activity.log(LogLevel::Info, "Stratus shutting down");
        let t = self.printer.theme();

        self.printer.blank()?;
        self.printer
            .line(t.bold_fg("Thank you for using Stratus!", style::CYAN))?;
        self.printer
            .line(t.fg("🌈 Stay informed, stay safe! 🌈", style::GREEN))?;
        self.printer.flush()?;
        Ok(())
    }
}
