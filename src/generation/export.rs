//! Flattens a batch of profiles into a CSV table.

use crate::catalog::Category;
use crate::profiles::Profile;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

pub const ANALYSIS_FILE_NAME: &str = "diversity_analysis.csv";

const FIXED_COLUMNS: &[&str] = &[
    "image_id",
    "nationality",
    "gender",
    "age",
    "region",
    "generated_at",
    "generation_method",
    "uniqueness_score",
];

pub fn header() -> Vec<String> {
    FIXED_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(Category::traits().map(|c| c.as_str().to_string()))
        .collect()
}

pub fn row(profile: &Profile) -> Vec<String> {
    let d = &profile.demographics;
    let mut cells = vec![
        profile.image_id.clone(),
        d.nationality.clone(),
        d.gender.as_str().to_string(),
        d.age.to_string(),
        d.region.clone(),
        profile.generated_at.to_rfc3339(),
        profile.generation_method.as_str().to_string(),
        format!("{:.4}", profile.uniqueness_score),
    ];
    cells.extend(Category::traits().map(|c| profile.trait_or_none(c).to_string()));
    cells
}

/// Quotes a field when it holds a comma, quote or line break.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn write_rows<W: Write>(mut out: W, profiles: &[Profile]) -> Result<()> {
    let mut write_line = |cells: Vec<String>| -> Result<()> {
        let line = cells.iter().map(|c| escape(c)).collect::<Vec<_>>().join(",");
        out.write_all(line.as_bytes())?;
        out.write_all(b"\r\n")?;
        Ok(())
    };
    write_line(header())?;
    for profile in profiles {
        write_line(row(profile))?;
    }
    Ok(())
}

/// Writes `profiles` to `path`, replacing any previous export.
pub fn export_csv(path: &Path, profiles: &[Profile]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut buffer = Vec::new();
    write_rows(&mut buffer, profiles)?;
    fs::write(path, buffer).with_context(|| format!("Failed to write CSV export {:?}", path))?;
    Ok(())
}
