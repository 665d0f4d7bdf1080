//! Live terminal output for renamer events.
//!
//! Events arrive while a run is in progress (see [`crate::events`]). In
//! verbose mode output is suppressed since tracing already reports the same
//! steps. In normal mode events are styled by their message shape.

use colored::Colorize;
use std::io::{self, IsTerminal, Write};

use crate::events::{Event, EventKind};

const ARROW: &str = " → ";

/// Progress reporter for user-facing output
pub struct Progress {
    writer: Box<dyn Write + Send>,
    /// When true, all output is suppressed (verbose mode uses tracing instead)
    silent: bool,
    /// When true, output is colorized
    colors_enabled: bool,
}

/// Check if we should use colors in output
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }
    io::stderr().is_terminal()
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    /// Create a new progress reporter writing to stderr
    pub fn new() -> Self {
        Self::new_with_ui(false, should_use_colors())
    }

    /// Create a progress reporter that respects UI mode
    /// When verbose=true, output is suppressed (tracing handles it)
    pub fn new_with_ui(verbose: bool, colors_enabled: bool) -> Self {
        colored::control::set_override(colors_enabled);
        Self {
            writer: Box::new(io::stderr()),
            silent: verbose,
            colors_enabled,
        }
    }

    /// Create a progress reporter with a custom writer (for testing)
    #[cfg(test)]
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer,
            silent: false,
            colors_enabled: false,
        }
    }

    /// Print one renamer event
    pub fn event(&mut self, event: &Event) {
        if self.silent {
            return;
        }
        let line = if self.colors_enabled {
            colorize_event(event)
        } else {
            plain_event(event)
        };
        let _ = writeln!(self.writer, "{}", line);
        let _ = self.writer.flush();
    }

    /// Report an error during operation (non-fatal)
    pub fn warn(&mut self, message: &str) {
        if self.silent {
            return;
        }
        if self.colors_enabled {
            let _ = writeln!(self.writer, "{} {}", "!".yellow().bold(), message.yellow());
        } else {
            let _ = writeln!(self.writer, "Warning: {}", message);
        }
    }
}

fn plain_event(event: &Event) -> String {
    match event.kind {
        EventKind::Warning => format!("Warning: {}", event.message),
        EventKind::Error => format!("Error: {}", event.message),
        EventKind::Info | EventKind::Success => event.message.clone(),
    }
}

/// Style `"Label: old → new"` and `"Label: value"` messages; anything else
/// passes through
fn colorize_event(event: &Event) -> String {
    let msg = event.message.as_str();

    let styled = if let Some((left, right)) = msg.split_once(ARROW) {
        let (label, old) = match left.split_once(": ") {
            Some((label, old)) => (format!("{} ", style_label(event.kind, label)), old),
            None => (String::new(), left),
        };
        format!("{}{} {} {}", label, old.dimmed(), "→".dimmed(), right.cyan().bold())
    } else if let Some((label, value)) = msg.split_once(": ") {
        format!("{} {}", style_label(event.kind, label), value.blue())
    } else {
        msg.to_string()
    };

    match event.kind {
        EventKind::Warning => format!("{} {}", "!".yellow().bold(), styled),
        EventKind::Error => format!("{} {}", "✗".red().bold(), styled),
        EventKind::Info | EventKind::Success => styled,
    }
}

fn style_label(kind: EventKind, label: &str) -> colored::ColoredString {
    let label = format!("{}:", label);
    match kind {
        EventKind::Info | EventKind::Success => label.green().bold(),
        EventKind::Warning => label.yellow().bold(),
        EventKind::Error => label.red().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn create_test_progress() -> (Progress, Arc<Mutex<Vec<u8>>>) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let writer = TestWriter(buffer.clone());
        let progress = Progress::with_writer(Box::new(writer));
        (progress, buffer)
    }

    struct TestWriter(Arc<Mutex<Vec<u8>>>);

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_plain_events() {
        let (mut progress, buffer) = create_test_progress();

        progress.event(&Event::success("Renamed: a.mkv → Show - 01.mkv"));
        progress.event(&Event::warning("Skipped: b.mkv (episode 9 not found)"));
        progress.event(&Event::error("Backup failed: c.mkv (denied)"));

        let output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Renamed: a.mkv → Show - 01.mkv");
        assert_eq!(lines[1], "Warning: Skipped: b.mkv (episode 9 not found)");
        assert_eq!(lines[2], "Error: Backup failed: c.mkv (denied)");
    }

    #[test]
    fn test_colorize_keeps_message_parts() {
        colored::control::set_override(false);

        let line = colorize_event(&Event::success("Renamed: a.mkv → b.mkv"));
        assert_eq!(line, "Renamed: a.mkv → b.mkv");

        let line = colorize_event(&Event::info("Backed up: a.mkv"));
        assert_eq!(line, "Backed up: a.mkv");

        let line = colorize_event(&Event::warning("no label here"));
        assert_eq!(line, "! no label here");
    }
}
