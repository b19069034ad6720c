//! ASCII PLY reader for 2D obstacle point clouds.
//!
//! Only the first two columns of each vertex record are used; a third `z`
//! column (always zero for planar scenes) is accepted and ignored.

use crate::error::{InputError, Result};
use crate::math::Point2;

/// Parses an ASCII PLY document into 2D points.
///
/// # Errors
///
/// Returns `InputError::MalformedPly` if the magic line or `end_header` is
/// missing, the format is not ASCII, a record is not numeric or has fewer
/// than two columns, or the record count disagrees with the declared
/// `element vertex` count.
pub fn parse_ply(text: &str) -> Result<Vec<Point2>> {
    let mut lines = text.lines().enumerate();
    let malformed = InputError::MalformedPly;

    match lines.next() {
        Some((_, magic)) if magic.trim() == "ply" => {}
        _ => return Err(malformed("missing `ply` magic line".into()).into()),
    }

    let mut declared: Option<usize> = None;
    let mut header_closed = false;
    for (_, line) in lines.by_ref() {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("end_header") => {
                header_closed = true;
                break;
            }
            Some("format") => {
                let format = tokens.next().unwrap_or_default();
                if format != "ascii" {
                    return Err(malformed(format!("unsupported format `{format}`")).into());
                }
            }
            Some("element") if tokens.next() == Some("vertex") => {
                let count = tokens.next().unwrap_or_default();
                declared = Some(
                    count
                        .parse()
                        .map_err(|_| malformed(format!("bad vertex count `{count}`")))?,
                );
            }
            _ => {}
        }
    }
    if !header_closed {
        return Err(malformed("missing `end_header`".into()).into());
    }

    let mut points = Vec::with_capacity(declared.unwrap_or(0));
    for (line_no, line) in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let coords = line
            .split_whitespace()
            .take(2)
            .map(str::parse::<f64>)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| malformed(format!("line {}: {e}", line_no + 1)))?;
        if coords.len() < 2 {
            return Err(malformed(format!("line {}: expected x y [z]", line_no + 1)).into());
        }
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(malformed(format!("line {}: non-finite coordinate", line_no + 1)).into());
        }
        points.push(Point2::new(coords[0], coords[1]));
    }

    if let Some(n) = declared {
        if n != points.len() {
            return Err(malformed(format!(
                "header declares {n} vertices but {} were read",
                points.len()
            ))
            .into());
        }
    }
    Ok(points)
}

/// Serializes points as an ASCII PLY document with a zero `z` column.
#[must_use]
pub fn write_ply(points: &[Point2]) -> String {
    let mut out = format!(
        "ply\nformat ascii 1.0\nelement vertex {}\n\
         property float x\nproperty float y\nproperty float z\nend_header\n",
        points.len()
    );
    for p in points {
        out.push_str(&format!("{} {} 0.0\n", p.x, p.y));
    }
    out
}
