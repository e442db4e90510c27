//! Status messages on stderr.

use owo_colors::OwoColorize;
use std::sync::atomic::{AtomicBool, Ordering};

static COLORS: AtomicBool = AtomicBool::new(true);

/// Decide once whether status messages are colored
pub fn init_colors(no_color: bool) {
    COLORS.store(!no_color && crate::logger::should_use_colors(), Ordering::Relaxed);
}

pub fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}

pub fn success(message: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "✓".green().bold(), message);
    } else {
        eprintln!("✓ {message}");
    }
}

pub fn info(message: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "ℹ".blue().bold(), message);
    } else {
        eprintln!("ℹ {message}");
    }
}

pub fn warning(message: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
    } else {
        eprintln!("⚠ {message}");
    }
}

pub fn error(message: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    } else {
        eprintln!("✗ {message}");
    }
}

/// `path: N blocks, M diagnostics` summary line
pub fn document_summary(path: &str, blocks: usize, diagnostics: usize) -> String {
    format!(
        "{}: {} {}, {} {}",
        path,
        blocks,
        plural(blocks, "block", "blocks"),
        diagnostics,
        plural(diagnostics, "diagnostic", "diagnostics"),
    )
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}
