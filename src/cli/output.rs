//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

use crate::domain::NodeRow;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print failure status (red X, indented)
pub fn failure(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {} {}", "✗".red(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print plain output (no color)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// One row per line: id, bounds, depth, name indented by depth.
pub fn row(row: &NodeRow) {
    println!(
        "{:>5}  {:>5} {:>5} {:>3}  {}{}",
        row.id.to_string().dimmed(),
        row.left,
        row.right,
        row.depth,
        "  ".repeat(row.depth as usize),
        row.name
    );
}

pub fn rows(rows: &[NodeRow]) {
    for r in rows {
        row(r);
    }
}
