//! Terminal UI utilities.
//!
//! A box-drawn table that shrinks its widest columns to fit the terminal,
//! used by `mkconf show` and `mkconf targets`.
//!
//! ```rust
//! use mkconf::ui::Table;
//!
//! let mut table = Table::new(&["Setting", "Value"]);
//! table.add_row(vec!["assembler.strip".to_string(), "true".to_string()]);
//! assert!(table.render(80).contains("assembler.strip"));
//! ```

use colored::*;
use console::{measure_text_width, strip_ansi_codes, truncate_str};

/// Columns never shrink below this many characters.
const MIN_COLUMN: usize = 8;

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Rows with the wrong number of cells are dropped.
    pub fn add_row(&mut self, row: Vec<String>) {
        if row.len() == self.headers.len() {
            self.rows.push(row);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn print(&self) {
        let (_, width) = console::Term::stdout().size();
        print!("{}", self.render(width as usize));
    }

    /// The table as text, fitted into `max_width` columns where possible.
    pub fn render(&self, max_width: usize) -> String {
        if self.headers.is_empty() {
            return String::new();
        }
        let widths = self.column_widths(max_width);

        let rule = |left: &str, mid: &str, right: &str| -> String {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("  {left}{}{right}\n", segments.join(mid))
        };

        let mut out = rule("┌", "┬", "┐");
        let header: Vec<String> = self.headers.iter().map(|h| h.bold().to_string()).collect();
        out.push_str(&line(&header, &widths));
        out.push_str(&rule("├", "┼", "┤"));
        for row in &self.rows {
            out.push_str(&line(row, &widths));
        }
        out.push_str(&rule("└", "┴", "┘"));
        out
    }

    fn column_widths(&self, max_width: usize) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(visible_width(&flatten(cell)));
            }
        }

        let overhead = 3 + 3 * widths.len();
        let available = max_width.saturating_sub(overhead);
        let mut total: usize = widths.iter().sum();
        while total > available {
            let Some(widest) = widths
                .iter_mut()
                .filter(|w| **w > MIN_COLUMN)
                .max_by_key(|w| **w)
            else {
                break;
            };
            *widest -= 1;
            total -= 1;
        }
        widths
    }
}

fn line(cells: &[String], widths: &[usize]) -> String {
    let mut out = String::from("  │");
    for (cell, width) in cells.iter().zip(widths) {
        let flat = flatten(cell);
        let shown = truncate_str(&flat, *width, "...");
        let padding = width.saturating_sub(visible_width(&shown));
        out.push_str(&format!(" {shown}{} │", " ".repeat(padding)));
    }
    out.push('\n');
    out
}

/// Control whitespace would break the row layout.
fn flatten(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            _ => c,
        })
        .collect()
}

fn visible_width(text: &str) -> usize {
    measure_text_width(&strip_ansi_codes(text))
}
