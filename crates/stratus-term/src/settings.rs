//! Settings submenu.

use std::io::{BufRead, Write};

use anyhow::Result;
use stratus_core::Config;

use crate::app::App;
use crate::views;

impl<R: BufRead, W: Write> App<R, W> {
    /// Settings loop; returns to the main menu on "7" or end of input
    pub(crate) fn settings(&mut self) -> Result<()> {
        self.begin_screen()?;
        loop {
            views::settings_menu(
                &mut self.printer,
                &self.config,
                self.activity.is_enabled(),
                self.cache.len(),
            )?;

            let Some(choice) = self.prompt_line("Select option (1-7): ")? else {
                return Ok(());
            };

            match choice.as_str() {
                "1" => self.configure_api_key()?,
                "2" => self.toggle_logging()?,
                "3" => self.switch_units()?,
                "4" => self.clear_cache()?,
                "5" => self.export_settings()?,
                "6" => self.import_settings()?,
                "7" => return Ok(()),
                _ => self.printer.error_message("Invalid choice")?,
            }
        }
    }

    fn configure_api_key(&mut self) -> Result<()> {
        let Some(key) = self.prompt_line("Enter new API key (or press Enter to keep current): ")?
        else {
            return Ok(());
        };
        if key.is_empty() {
            self.printer.info_message("API key unchanged")?;
            return Ok(());
        }

        self.config.set_api_key(key);
        self.rebuild_service()?;

        match self.config.save_to(&self.config_path) {
            Ok(()) => self.printer.success_message("API key updated successfully")?,
            Err(e) => {
                tracing::warn!("Failed to save configuration: {:#}", e);
                self.printer
                    .error_message("API key set for this session, but saving the configuration failed")?;
            }
        }
        Ok(())
    }

    fn toggle_logging(&mut self) -> Result<()> {
        let enabled = self.activity.toggle();
        self.config.logging.enabled = enabled;
        self.printer.success_message(if enabled {
            "Logging enabled"
        } else {
            "Logging disabled"
        })?;
        Ok(())
    }

    fn switch_units(&mut self) -> Result<()> {
        let unit = self.config.display.temperature_unit.toggled();
        self.config.display.temperature_unit = unit;
        self.printer
            .success_message(&format!("Temperatures now shown in {}", unit.symbol()))?;
        Ok(())
    }

    fn clear_cache(&mut self) -> Result<()> {
        self.service.clear_cache();
        tracing::info!("Response cache cleared");
        self.printer.success_message("Cache cleared successfully")?;
        Ok(())
    }

    fn export_settings(&mut self) -> Result<()> {
        match self.config.save_to(&self.config_path) {
            Ok(()) => self.printer.success_message(&format!(
                "Settings exported to {}",
                self.config_path.display()
            ))?,
            Err(e) => {
                tracing::warn!("Failed to export settings: {:#}", e);
                self.printer.error_message("Failed to export settings")?;
            }
        }
        Ok(())
    }

    /// Reload the file and rebuild the service; the cache survives
    fn import_settings(&mut self) -> Result<()> {
        match Config::load_from(&self.config_path) {
            Ok(config) => {
                self.activity.set_enabled(config.logging.enabled);
                self.config = config;
                self.rebuild_service()?;
                self.printer.success_message("Settings imported successfully")?;
            }
            Err(e) => {
                tracing::warn!("Failed to import settings: {:#}", e);
                self.printer.error_message("Failed to import settings")?;
            }
        }
        Ok(())
    }
}
