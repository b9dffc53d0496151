//! Structured run report for downstream tool consumption.
//!
//! Written as JSON next to the converted table when requested.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::ConversionSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Converter {
    Hapmap,
    Xpclr,
}

/// Complete report of a conversion run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Tool version
    pub version: String,
    /// Timestamp of run (RFC 3339)
    pub timestamp: String,
    pub converter: Option<Converter>,
    pub input: String,
    pub output: String,

    /// Population label passed to the hapmap converter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population: Option<String>,

    /// Sample selection used by the XP-CLR converter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<SelectionInfo>,

    pub statistics: ConversionSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectionInfo {
    pub path: String,
    /// Lines in the sample list
    pub requested: usize,
    /// Entries that resolved to a VCF column
    pub matched: usize,
}

impl RunReport {
    /// For out.hapmap, this is out_report.json
    pub fn report_path(output_path: &Path) -> PathBuf {
        let stem = output_path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy();
        output_path.with_file_name(format!("{stem}_report.json"))
    }

    /// Write the report as JSON alongside the output file.
    pub fn write(&self, output_path: &Path) -> std::io::Result<PathBuf> {
        let report_path = Self::report_path(output_path);
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        std::fs::write(&report_path, json)?;
        tracing::info!("Wrote run report to {}", report_path.display());

        Ok(report_path)
    }
}

/// Builder for constructing a RunReport during conversion.
#[derive(Debug, Default)]
pub struct RunReportBuilder {
    pub converter: Option<Converter>,
    pub input_path: String,
    pub output_path: String,
    pub population: Option<String>,
    pub selection: Option<SelectionInfo>,
}

impl RunReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(self, summary: &ConversionSummary) -> RunReport {
        let timestamp = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string());

        RunReport {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp,
            converter: self.converter,
            input: self.input_path,
            output: self.output_path,
            population: self.population,
            selection: self.selection,
            statistics: summary.clone(),
        }
    }
}
