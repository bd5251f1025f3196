//! Terminal output: prefixed log lines and the per-class progress line.
//!
//! ```ignore
//! log!("build"; "{} stylesheets", count);
//! debug!("rewrite"; "css: {} references", n); // --verbose only
//!
//! let progress = ProgressLine::new("build", &[("css", 4), ("js", 10)]);
//! progress.add("css", 1);
//! progress.finish();
//! ```
//!
//! While a progress line is on screen it has no trailing newline, so
//! `log` wipes it before printing. The next refresh redraws it.

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// Set by `--verbose`.
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// A progress line currently occupies the cursor line.
static PROGRESS_ACTIVE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macros
// ============================================================================

/// Print `[module] message`.
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Like `log!`, but only with `--verbose`.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut stdout = stdout().lock();

    if PROGRESS_ACTIVE.load(Ordering::SeqCst) {
        execute!(stdout, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
    } else {
        execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    }

    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

fn colorize_prefix(module: &str) -> String {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "build" | "dev" => prefix.bright_blue().bold().to_string(),
        "rewrite" | "revision" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Progress Line
// ============================================================================

/// One in-place line with a counter per asset class:
/// `[build] html(3/3) css(2/4) js(5/10) assets(120/371)`.
///
/// Workers refresh it with `try_lock`; a refresh is skipped while another
/// thread is drawing.
pub struct ProgressLine {
    label: &'static str,
    counters: Vec<Counter>,
    lock: Mutex<()>,
}

struct Counter {
    name: &'static str,
    total: usize,
    current: AtomicUsize,
}

impl ProgressLine {
    /// Classes with nothing to do get no counter.
    pub fn new(label: &'static str, items: &[(&'static str, usize)]) -> Self {
        let counters = items
            .iter()
            .filter(|(_, total)| *total > 0)
            .map(|&(name, total)| Counter {
                name,
                total,
                current: AtomicUsize::new(0),
            })
            .collect();

        PROGRESS_ACTIVE.store(true, Ordering::SeqCst);
        let progress = Self {
            label,
            counters,
            lock: Mutex::new(()),
        };
        progress.display(false);
        progress
    }

    /// Add `n` to a class counter. Unknown names are ignored.
    pub fn add(&self, name: &str, n: usize) {
        let Some(counter) = self.counters.iter().find(|c| c.name == name) else {
            return;
        };
        counter.current.fetch_add(n, Ordering::Relaxed);
        if let Some(_guard) = self.lock.try_lock() {
            self.display(false);
        }
    }

    fn line(&self) -> String {
        self.counters
            .iter()
            .map(|c| {
                let current = c.current.load(Ordering::Relaxed).min(c.total);
                format!("{}({}/{})", c.name, current, c.total)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn display(&self, newline: bool) {
        let mut stdout = stdout().lock();
        execute!(stdout, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
        write!(stdout, "{} {}", colorize_prefix(self.label), self.line()).ok();
        if newline {
            writeln!(stdout).ok();
        }
        stdout.flush().ok();
    }

    /// Leave the final counts on screen.
    pub fn finish(self) {
        PROGRESS_ACTIVE.store(false, Ordering::SeqCst);
        {
            let _guard = self.lock.lock();
            self.display(true);
        }
        std::mem::forget(self);
    }
}

impl Drop for ProgressLine {
    /// Unfinished (failed) builds erase the line.
    fn drop(&mut self) {
        PROGRESS_ACTIVE.store(false, Ordering::SeqCst);
        let mut stdout = stdout().lock();
        execute!(stdout, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
        stdout.flush().ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_skips_empty_counters() {
        let progress = ProgressLine::new("build", &[("css", 2), ("js", 0)]);
        assert_eq!(progress.counters.len(), 1);
        progress.add("css", 1);
        progress.add("js", 1);
        assert_eq!(progress.line(), "css(1/2)");
        progress.finish();
    }

    #[test]
    fn test_progress_line_clamps_to_total() {
        let progress = ProgressLine::new("dev", &[("assets", 1)]);
        progress.add("assets", 3);
        assert_eq!(progress.line(), "assets(1/1)");
        drop(progress);
    }

    #[test]
    fn test_verbose_toggle() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }
}
