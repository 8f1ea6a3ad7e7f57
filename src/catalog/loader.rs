//! Row ingestion - parsing comma separated department rows.
//!
//! # Format
//! ```text
//! id,university,department,score      <- header, skipped
//! 101,Ege University,Physics,412.5
//! 102,Bogazici University,Physics,498.1
//! ```
//!
//! Only the first four fields are read; anything after them is ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::catalog::record::DepartmentRecord;
use crate::common::config::MAX_NAME_LEN;
use crate::common::{Error, Result};

/// Cut `s` to at most `max` bytes without splitting a character.
fn truncate_name(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s[..end].to_string()
}

/// Parse one data row. `line` is the 1-based line number used in errors.
///
/// # Errors
/// `Error::Parse` if a field is missing or the id/score are not numbers.
pub fn parse_line(line: usize, text: &str) -> Result<DepartmentRecord> {
    let mut fields = text.trim_end_matches(['\r', '\n']).split(',').map(str::trim);

    let mut next_field = |name: &str| {
        fields.next().ok_or_else(|| Error::Parse {
            line,
            message: format!("missing {name} field"),
        })
    };

    let id_field = next_field("id")?;
    let university = next_field("university")?;
    let department = next_field("department")?;
    let score_field = next_field("score")?;

    let id = id_field.parse::<i32>().map_err(|_| Error::Parse {
        line,
        message: format!("id '{id_field}' is not an integer"),
    })?;
    let score = score_field.parse::<f32>().map_err(|_| Error::Parse {
        line,
        message: format!("score '{score_field}' is not a number"),
    })?;

    Ok(DepartmentRecord {
        id,
        university: truncate_name(university, MAX_NAME_LEN),
        department: truncate_name(department, MAX_NAME_LEN),
        score,
    })
}

/// Read every data row from `reader`, skipping the header and blank lines.
///
/// # Errors
/// I/O errors from the reader and `Error::Parse` for the first bad row.
pub fn read_records<R: BufRead>(reader: R) -> Result<Vec<DepartmentRecord>> {
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if index == 0 {
            debug!(header = %line, "skipping header");
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        records.push(parse_line(index + 1, &line)?);
    }

    Ok(records)
}

/// Read every data row from the file at `path`.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Vec<DepartmentRecord>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let records = read_records(BufReader::new(file))?;
    info!(path = %path.display(), rows = records.len(), "loaded department rows");
    Ok(records)
}
