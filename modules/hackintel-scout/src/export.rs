//! Report artifacts on disk.
//!
//! Each run writes one file per requested format under a shared
//! `report_YYYYmmdd_HHMMSS` stem. Files are staged as temp files in the
//! target directory and only then persisted, so a failed run leaves nothing
//! behind.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use hackintel_common::{HackIntelError, Result};

use crate::intelligence::render;
use crate::intelligence::IntelligenceReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Pretty JSON of the full report.
    Structured,
    /// Markdown summary.
    Narrative,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "structured" | "json" => Some(Self::Structured),
            "narrative" | "markdown" | "md" => Some(Self::Narrative),
            _ => None,
        }
    }

    /// Recognized formats out of `values`; anything else is logged and ignored.
    pub fn parse_all<I, S>(values: I) -> BTreeSet<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = BTreeSet::new();
        for v in values {
            match Self::parse(v.as_ref()) {
                Some(format) => {
                    out.insert(format);
                }
                None => warn!(format = v.as_ref(), "Ignoring unknown export format"),
            }
        }
        out
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Structured => "json",
            Self::Narrative => "md",
        }
    }

    /// Both formats.
    pub fn all() -> BTreeSet<Self> {
        [Self::Structured, Self::Narrative].into_iter().collect()
    }

    fn render(&self, report: &IntelligenceReport) -> Result<String> {
        match self {
            Self::Structured => render::to_json(report),
            Self::Narrative => Ok(render::to_markdown(report)),
        }
    }
}

/// Write `report` in every requested format, all or nothing.
///
/// `timestamp` is the `YYYYmmdd_HHMMSS` part of the file stem; when any target
/// name is taken a numeric suffix (`_1`, `_2`, ...) is appended to all of them.
pub fn write_reports(
    dir: &Path,
    report: &IntelligenceReport,
    formats: &BTreeSet<ExportFormat>,
    timestamp: &str,
) -> Result<BTreeMap<ExportFormat, PathBuf>> {
    if formats.is_empty() {
        return Ok(BTreeMap::new());
    }

    let mut rendered = Vec::with_capacity(formats.len());
    for format in formats {
        rendered.push((*format, format.render(report)?));
    }

    std::fs::create_dir_all(dir).map_err(|e| {
        HackIntelError::Export(format!("cannot create {}: {e}", dir.display()))
    })?;
    let stem = free_stem(dir, formats, &format!("report_{timestamp}"));

    let mut staged = Vec::with_capacity(rendered.len());
    for (format, body) in rendered {
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(body.as_bytes())?;
        tmp.flush()?;
        staged.push((format, tmp));
    }

    let mut written: BTreeMap<ExportFormat, PathBuf> = BTreeMap::new();
    for (format, tmp) in staged {
        let path = dir.join(format!("{stem}.{}", format.extension()));
        if let Err(e) = tmp.persist_noclobber(&path) {
            rollback(&written);
            return Err(HackIntelError::Export(format!(
                "cannot write {}: {}",
                path.display(),
                e.error
            )));
        }
        written.insert(format, path);
    }

    for (format, path) in &written {
        info!(?format, path = %path.display(), "Report written");
    }
    Ok(written)
}

fn free_stem(dir: &Path, formats: &BTreeSet<ExportFormat>, base: &str) -> String {
    let taken = |stem: &str| {
        formats
            .iter()
            .any(|f| dir.join(format!("{stem}.{}", f.extension())).exists())
    };
    if !taken(base) {
        return base.to_string();
    }
    let mut n = 1u32;
    loop {
        let stem = format!("{base}_{n}");
        if !taken(&stem) {
            return stem;
        }
        n += 1;
    }
}

fn rollback(written: &BTreeMap<ExportFormat, PathBuf>) {
    for path in written.values() {
        if let Err(e) = std::fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "Failed to remove partial report");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::HackathonIntelligence;
    use hackintel_common::HistoricalDataset;

    fn report() -> IntelligenceReport {
        let mut ds = HistoricalDataset::new("https://x.devpost.com");
        ds.past_hackathons.push(Default::default());
        HackathonIntelligence::new(ds).analyze()
    }

    #[test]
    fn parse_accepts_aliases_and_ignores_unknown() {
        let formats = ExportFormat::parse_all(["JSON", "markdown", "pdf", "narrative"]);
        assert_eq!(formats, ExportFormat::all());
        assert!(ExportFormat::parse_all(["pdf"]).is_empty());
    }

    #[test]
    fn writes_one_file_per_format() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_reports(dir.path(), &report(), &ExportFormat::all(), "20240101_120000")
            .unwrap();

        assert_eq!(
            files[&ExportFormat::Structured],
            dir.path().join("report_20240101_120000.json")
        );
        assert_eq!(
            files[&ExportFormat::Narrative],
            dir.path().join("report_20240101_120000.md")
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn existing_name_gets_suffix() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("report_20240101_120000.md"), "old").unwrap();

        let files = write_reports(dir.path(), &report(), &ExportFormat::all(), "20240101_120000")
            .unwrap();
        assert_eq!(
            files[&ExportFormat::Structured],
            dir.path().join("report_20240101_120000_1.json")
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("report_20240101_120000.md")).unwrap(),
            "old"
        );
    }

    #[test]
    fn no_formats_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_reports(dir.path(), &report(), &BTreeSet::new(), "20240101_120000")
            .unwrap();
        assert!(files.is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
