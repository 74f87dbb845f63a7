//! Parser for catalog data files.
//!
//! Handles the MovieLens `movies.dat` layout:
//! - `movieId::Title (Year)::Genre|Genre|...`
//!
//! Lines that do not follow the layout are logged and skipped; only I/O
//! failures abort a load.

use crate::error::{CatalogError, Result};
use crate::types::*;
use rayon::prelude::*;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::warn;

/// Read a file with ISO-8859-1 encoding (Latin-1)
///
/// The MovieLens files are Latin-1, not UTF-8. Every byte maps directly to
/// the Unicode code point of the same value.
fn read_lines_latin1(path: &Path) -> Result<Vec<String>> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CatalogError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => CatalogError::IoError(e),
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let content: String = bytes.iter().map(|&b| b as char).collect();

    Ok(content.lines().map(|s| s.to_string()).collect())
}

/// Parse the movies.dat file
///
/// Lines are parsed in parallel; the output keeps file order.
pub fn parse_movies(path: &Path) -> Result<Vec<CatalogMovie>> {
    let lines = read_lines_latin1(path)?;
    Ok(parse_movie_lines(&lines))
}

/// Parse already-loaded lines, skipping blank and malformed ones
pub fn parse_movie_lines<S: AsRef<str> + Sync>(lines: &[S]) -> Vec<CatalogMovie> {
    lines
        .par_iter()
        .enumerate()
        .filter_map(|(idx, line)| {
            let line = line.as_ref().trim();
            if line.is_empty() {
                return None;
            }
            match parse_movie_line(line, idx + 1) {
                Ok(movie) => Some(movie),
                Err(e) => {
                    warn!("{}; line will be ignored", e);
                    None
                }
            }
        })
        .collect()
}

/// Parse one `movieId::Title (Year)::Genres` line
pub fn parse_movie_line(line: &str, line_no: usize) -> Result<CatalogMovie> {
    let parse_error = |reason: String| CatalogError::ParseError {
        file: "movies.dat".to_string(),
        line: line_no,
        reason,
    };

    let mut parts = line.splitn(3, "::");

    let movie_id = parts
        .next()
        .ok_or_else(|| parse_error("Missing movieId".to_string()))?;
    let title_and_year = parts
        .next()
        .ok_or_else(|| parse_error("Missing title".to_string()))?;
    let genres = parts
        .next()
        .ok_or_else(|| parse_error("Missing genres".to_string()))?;

    let id = movie_id
        .trim()
        .parse()
        .map_err(|e| parse_error(format!("Invalid movieId: {}", e)))?;

    let (title, year) = split_title_and_year(title_and_year)
        .ok_or_else(|| parse_error(format!("Missing year in title: {}", title_and_year)))?;

    if genres.trim().is_empty() {
        return Err(parse_error("Missing genres".to_string()));
    }

    Ok(CatalogMovie {
        id,
        title,
        year,
        genres: parse_genres(genres),
    })
}

/// Split `"Toy Story (1995)"` into `("Toy Story", 1995)`
///
/// Only the last parenthesised group is the year, so titles such as
/// `"City of Lost Children, The (Cité des enfants perdus, La) (1995)"`
/// keep their inner parentheses.
fn split_title_and_year(s: &str) -> Option<(String, u16)> {
    let inner = s.trim_end().strip_suffix(')')?;
    let (title, year) = inner.rsplit_once(" (")?;
    if year.is_empty() || !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let year = year.parse().ok()?;
    let title = title.trim();
    if title.is_empty() {
        return None;
    }
    Some((title.to_string(), year))
}

/// Parse pipe-separated genres, keeping their listed order
fn parse_genres(s: &str) -> Vec<String> {
    s.split('|')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}
