use std::{
    ffi::OsString,
    fs::File,
    io::{BufRead, BufWriter},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::{
    ConversionSummary,
    vcf::{self, Record},
};

/// Default number of emitted sites between progress lines.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 10_000;

/// Destination for converted biallelic sites.
pub trait SiteWriter {
    /// Write one row for `record`, returning how many genotype cells were missing.
    fn write_site(&mut self, record: &Record) -> Result<usize>;

    /// Flush buffered output.
    fn finish(&mut self) -> Result<()>;
}

/// `{prefix}{suffix}` without interpreting the prefix as a file stem.
pub fn output_path(prefix: &Path, suffix: &str) -> PathBuf {
    let mut path = OsString::from(prefix.as_os_str());
    path.push(suffix);
    PathBuf::from(path)
}

pub fn create_output(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .with_context(|| format!("failed to create output {}", path.display()))
}

/// Stream every data record into `writer`, dropping multi-allelic sites.
///
/// Stops at the first malformed line or write failure; rows already written
/// stay in the output.
pub fn process_sites<R, W>(
    records: &mut vcf::Reader<R>,
    writer: &mut W,
    summary: &mut ConversionSummary,
    progress_interval: usize,
) -> Result<()>
where
    R: BufRead,
    W: SiteWriter,
{
    while let Some(result) = records.next() {
        let record = result.context("malformed VCF input")?;
        summary.data_lines += 1;

        if !record.is_biallelic() {
            summary.multiallelic_sites += 1;
            tracing::debug!(site = %record, "skipping multi-allelic site");
            continue;
        }

        let missing = writer
            .write_site(&record)
            .with_context(|| format!("line {}: failed to write site {record}", records.line()))?;
        summary.record_emission(missing);

        if progress_interval > 0 && summary.emitted_sites % progress_interval == 0 {
            tracing::info!("processed {} SNP sites", summary.emitted_sites);
        }
    }

    writer.finish()
}
