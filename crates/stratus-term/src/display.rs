//! Display primitives shared by every screen.

use std::io::{self, Write};

use chrono::{DateTime, Local};
use crossterm::style::Color;
use crossterm::{cursor, queue, terminal};

use crate::style::{self, Theme};

const PROGRESS_WIDTH: usize = 50;
const KEY_WIDTH: usize = 18;

/// Writes styled output to any sink
pub struct Printer<W: Write> {
    out: W,
    theme: Theme,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W, theme: Theme) -> Self {
        Self { out, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Raw line, already styled by the caller
    pub fn line(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.out, "{}", text.as_ref())
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    /// Text without a newline, flushed so it shows before input is read
    pub fn prompt(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "\n{}", self.theme.bold_fg(text, style::PURPLE))?;
        self.out.flush()
    }

    /// Dimmed prompt such as "Press Enter to continue..."
    pub fn hint(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "\n{}", self.theme.fg(text, style::GRAY))?;
        self.out.flush()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// Clear the terminal. Plain output never emits control sequences.
    pub fn clear_screen(&mut self) -> io::Result<()> {
        if self.theme.is_colored() {
            queue!(
                self.out,
                terminal::Clear(terminal::ClearType::All),
                cursor::MoveTo(0, 0)
            )?;
        }
        Ok(())
    }

    pub fn banner(&mut self, now: DateTime<Local>) -> io::Result<()> {
        let t = self.theme;
        let art = [
            "  ╔══════════════════════════════════════════════════╗",
            "  ║     ┌─┐┌┬┐┬─┐┌─┐┌┬┐┬ ┬┌─┐                        ║",
            "  ║     └─┐ │ ├┬┘├─┤ │ │ │└─┐   weather in your shell ║",
            "  ║     └─┘ ┴ ┴└─┴ ┴ ┴ └─┘└─┘                        ║",
            "  ╚══════════════════════════════════════════════════╝",
        ];
        self.blank()?;
        for row in art {
            self.line(t.badge(row, style::PURPLE, style::BG_BLUE))?;
        }
        self.line(t.fg(
            format!("  🌍 WeatherAPI.com client v{}", env!("CARGO_PKG_VERSION")),
            style::CYAN,
        ))?;
        self.blank()?;
        self.line(t.dim(format!(
            "Current time: {}",
            now.format("%Y-%m-%d %H:%M:%S")
        )))?;
        self.blank()
    }

    /// Boxed title
    pub fn section_header(&mut self, title: &str) -> io::Result<()> {
        let t = self.theme;
        let border = "═".repeat(title.chars().count() + 2);
        self.blank()?;
        self.line(t.bold_fg(format!("╔{}╗", border), style::BLUE))?;
        self.line(t.bold_fg(format!("║ {} ║", title), style::BLUE))?;
        self.line(t.bold_fg(format!("╚{}╝", border), style::BLUE))
    }

    /// ` Key:              value` with the key padded to a fixed column
    pub fn key_value(&mut self, key: &str, value: impl AsRef<str>, color: Color) -> io::Result<()> {
        let t = self.theme;
        let key = format!("{:<width$}", format!("{}:", key), width = KEY_WIDTH);
        let line = format!(" {}{}", t.bold_fg(key, style::GRAY), t.fg(value.as_ref(), color));
        self.line(line)
    }

    /// 50-cell bar; values above 100 are shown full
    pub fn progress_bar(&mut self, percentage: u32, label: &str) -> io::Result<()> {
        let t = self.theme;
        let filled = progress_cells(percentage);
        let bar = format!(
            "{}{}",
            t.fg("█".repeat(filled), style::GREEN),
            t.fg("░".repeat(PROGRESS_WIDTH - filled), style::DARK_GRAY)
        );
        let line = format!(
            " {} [{}] {}",
            t.bold(format!("{}:", label)),
            bar,
            t.bold(format!("{}%", percentage))
        );
        self.line(line)
    }

    pub fn error_message(&mut self, message: &str) -> io::Result<()> {
        let t = self.theme;
        self.blank()?;
        self.line(format!(
            "{} {}",
            t.badge(" ❌ ERROR ", style::WHITE, style::BG_RED),
            t.fg(message, style::RED)
        ))
    }

    pub fn success_message(&mut self, message: &str) -> io::Result<()> {
        let t = self.theme;
        self.blank()?;
        self.line(format!(
            "{} {}",
            t.badge(" ✅ SUCCESS ", style::WHITE, style::BG_GREEN),
            t.fg(message, style::GREEN)
        ))
    }

    pub fn warning_message(&mut self, message: &str) -> io::Result<()> {
        let t = self.theme;
        self.blank()?;
        self.line(format!(
            "{} {}",
            t.badge(" ⚠️  WARNING ", style::WHITE, style::BG_YELLOW),
            t.fg(message, style::YELLOW)
        ))
    }

    pub fn info_message(&mut self, message: &str) -> io::Result<()> {
        let t = self.theme;
        self.blank()?;
        self.line(t.fg(format!("ℹ️  {}", message), style::CYAN))
    }
}

fn progress_cells(percentage: u32) -> usize {
    let clamped = percentage.min(100) as usize;
    clamped * PROGRESS_WIDTH / 100
}
