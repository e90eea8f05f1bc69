//! Plain-text front files.
//!
//! One row per solution, values separated by single spaces. Readers skip
//! blank lines and accept any whitespace between values; writers overwrite
//! existing files.

use crate::error::MoeaError;
use crate::model::Solution;
use log::debug;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Reads a reference front: one objective vector per non-blank line.
pub fn read_front(path: impl AsRef<Path>) -> Result<Vec<Vec<f64>>, MoeaError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| MoeaError::io(path, e))?;
    let front = parse_front(&text)?;
    debug!("Read {} points from {:?}", front.len(), path);
    Ok(front)
}

/// Parses front text; every row must have the same number of values.
pub fn parse_front(text: &str) -> Result<Vec<Vec<f64>>, MoeaError> {
    let mut front: Vec<Vec<f64>> = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| MoeaError::Parse {
                    line: i + 1,
                    message: format!("invalid number `{token}`"),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        if let Some(first) = front.first() {
            if first.len() != row.len() {
                return Err(MoeaError::Parse {
                    line: i + 1,
                    message: format!("expected {} values, found {}", first.len(), row.len()),
                });
            }
        }
        front.push(row);
    }
    Ok(front)
}

/// Writes the objective vector of every solution, one row each.
pub fn write_function_values<V>(
    path: impl AsRef<Path>,
    solutions: &[Solution<V>],
) -> Result<(), MoeaError> {
    write_rows(path.as_ref(), solutions.iter().map(|s| s.objectives()))
}

/// Writes the decision vector of every solution, one row each.
///
/// `bool` variables are written as `true`/`false`.
pub fn write_variables<V: Display>(
    path: impl AsRef<Path>,
    solutions: &[Solution<V>],
) -> Result<(), MoeaError> {
    write_rows(path.as_ref(), solutions.iter().map(|s| s.variables()))
}

fn write_rows<'a, T, I>(path: &Path, rows: I) -> Result<(), MoeaError>
where
    T: Display + 'a,
    I: Iterator<Item = &'a [T]>,
{
    let file = File::create(path).map_err(|e| MoeaError::io(path, e))?;
    let mut out = BufWriter::new(file);
    let mut count = 0usize;
    for row in rows {
        let line = row
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{line}").map_err(|e| MoeaError::io(path, e))?;
        count += 1;
    }
    out.flush().map_err(|e| MoeaError::io(path, e))?;
    debug!("Wrote {count} rows to {path:?}");
    Ok(())
}
