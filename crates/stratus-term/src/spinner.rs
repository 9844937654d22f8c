//! Loading indicator drawn on stdout while a request is in flight.

use std::io::Write;
use std::time::Duration;

use crossterm::{cursor, queue, terminal};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::style::{self, Theme};

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

pub fn frame(index: usize) -> &'static str {
    FRAMES[index % FRAMES.len()]
}

fn draw(text: &str) {
    let mut out = std::io::stdout().lock();
    let _ = write!(out, "\r{}", text);
    let _ = out.flush();
}

fn clear_line() {
    let mut out = std::io::stdout().lock();
    let _ = queue!(
        out,
        terminal::Clear(terminal::ClearType::CurrentLine),
        cursor::MoveToColumn(0)
    );
    let _ = out.flush();
}

/// Animation task; stop it with [`Spinner::finish`]
pub struct Spinner {
    handle: Handle,
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl Spinner {
    pub fn start(handle: &Handle, message: impl Into<String>, theme: Theme) -> Self {
        let message = message.into();
        let (stop, mut stopped) = oneshot::channel::<()>();

        let task = handle.spawn(async move {
            let mut ticker = tokio::time::interval(FRAME_INTERVAL);
            let mut index = 0;
            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = ticker.tick() => {
                        draw(&theme.fg(format!("{} {}", frame(index), message), style::CYAN));
                        index += 1;
                    }
                }
            }
            clear_line();
        });

        Self {
            handle: handle.clone(),
            stop: Some(stop),
            task: Some(task),
        }
    }

    /// Stop the animation and wait until the line is cleared.
    ///
    /// Must be called from outside the runtime.
    pub fn finish(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = self.handle.block_on(task) {
                tracing::debug!("Spinner task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_frames_cycle() {
        assert_eq!(frame(0), "⠋");
        assert_eq!(frame(9), "⠏");
        assert_eq!(frame(10), "⠋");
    }

    #[test]
    fn test_finish_stops_task() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let spinner = Spinner::start(runtime.handle(), "Loading", Theme::plain());
        std::thread::sleep(Duration::from_millis(30));
        spinner.finish();
    }
}
