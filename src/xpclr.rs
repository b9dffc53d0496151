use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::{
    ConversionSummary,
    conversion::{self, DEFAULT_PROGRESS_INTERVAL, SiteWriter},
    report::{Converter, RunReportBuilder, SelectionInfo},
    smart_reader,
    vcf::{FIRST_SAMPLE_COLUMN, Record},
};

pub const XPCLR_SUFFIX: &str = ".xpclr.txt";

const MISSING_ALLELE: &str = "N";

#[derive(Debug, Clone)]
pub struct XpclrConfig {
    pub input: PathBuf,
    pub output_prefix: PathBuf,
    /// One sample name per line; order sets the output column order.
    pub samples: PathBuf,
    /// Emitted sites between progress lines; 0 disables them.
    pub progress_interval: usize,
    pub write_report: bool,
}

impl XpclrConfig {
    pub fn new(
        input: impl Into<PathBuf>,
        output_prefix: impl Into<PathBuf>,
        samples: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input: input.into(),
            output_prefix: output_prefix.into(),
            samples: samples.into(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            write_report: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct XpclrOutcome {
    /// The `{prefix}.xpclr.txt` file that was written.
    pub path: PathBuf,
    pub summary: ConversionSummary,
}

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("{chromosome}:{position}: line has no genotype column {column}")]
    MissingSampleColumn {
        chromosome: String,
        position: String,
        column: usize,
    },
}

/// Sample names, one per line, with surrounding whitespace removed.
///
/// Blank lines are kept as empty names; they simply never match the roster.
pub fn parse_selection<R>(reader: R) -> io::Result<Vec<String>>
where
    R: BufRead,
{
    reader
        .lines()
        .map(|line| line.map(|name| name.trim().to_string()))
        .collect()
}

pub fn read_selection(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open sample list {}", path.display()))?;
    parse_selection(BufReader::new(file))
        .with_context(|| format!("failed to read sample list {}", path.display()))
}

/// Roster positions of `targets`, in target order.
///
/// Names absent from the roster are dropped. A name that appears more than
/// once in the roster resolves to its first column.
pub fn resolve_indices(roster: &[String], targets: &[String]) -> Vec<usize> {
    let mut positions: HashMap<&str, usize> = HashMap::with_capacity(roster.len());
    for (index, name) in roster.iter().enumerate() {
        if positions.contains_key(name.as_str()) {
            tracing::warn!(sample = %name, column = index, "duplicate sample name in VCF header; using first column");
            continue;
        }
        positions.insert(name.as_str(), index);
    }

    targets
        .iter()
        .filter_map(|name| {
            let index = positions.get(name.as_str()).copied();
            if index.is_none() {
                tracing::debug!(sample = %name, "selected sample not present in VCF header");
            }
            index
        })
        .collect()
}

/// Writes XP-CLR rows for a fixed, ordered set of roster columns.
pub struct XpclrWriter<W> {
    inner: W,
    indices: Vec<usize>,
}

impl<W> XpclrWriter<W>
where
    W: Write,
{
    pub fn new(inner: W, indices: Vec<usize>) -> Self {
        Self { inner, indices }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W> SiteWriter for XpclrWriter<W>
where
    W: Write,
{
    fn write_site(&mut self, record: &Record) -> Result<usize> {
        let mut tokens = Vec::with_capacity(self.indices.len() * 2);
        let mut missing = 0;
        for &index in &self.indices {
            let genotype = record
                .genotype(index)
                .ok_or_else(|| SiteError::MissingSampleColumn {
                    chromosome: record.chromosome.clone(),
                    position: record.position.clone(),
                    column: FIRST_SAMPLE_COLUMN + index,
                })?;
            match genotype.alleles(&record.reference, &record.alternate) {
                Some(pair) => tokens.extend(pair),
                None => {
                    missing += 1;
                    tokens.extend([MISSING_ALLELE, MISSING_ALLELE]);
                }
            }
        }

        // No selected samples still leaves the separator after ALT.
        writeln!(
            self.inner,
            "{}\t{}\t{}\t{}\t{}",
            record.chromosome,
            record.position,
            record.reference,
            record.alternate,
            tokens.join("\t"),
        )?;

        Ok(missing)
    }

    fn finish(&mut self) -> Result<()> {
        self.inner.flush().context("failed to flush XP-CLR output")
    }
}

/// Convert a VCF into `{prefix}.xpclr.txt` for the samples listed in
/// `config.samples`.
pub fn convert_xpclr(config: &XpclrConfig) -> Result<XpclrOutcome> {
    tracing::info!(
        input = %config.input.display(),
        output_prefix = %config.output_prefix.display(),
        samples = %config.samples.display(),
        "starting XP-CLR conversion",
    );

    let targets = read_selection(&config.samples)?;

    let mut input = smart_reader::open_vcf(&config.input)?;
    if !input.header_found {
        tracing::warn!("no #CHROM header line found; no selected sample can match");
    }

    let indices = resolve_indices(&input.roster, &targets);
    tracing::info!("found {} target samples", indices.len());

    let mut summary = ConversionSummary {
        roster_samples: input.roster.len(),
        selected_samples: indices.len(),
        ..ConversionSummary::default()
    };

    let path = conversion::output_path(&config.output_prefix, XPCLR_SUFFIX);
    let output = conversion::create_output(&path)?;
    let mut writer = XpclrWriter::new(output, indices);

    conversion::process_sites(
        &mut input.records,
        &mut writer,
        &mut summary,
        config.progress_interval,
    )?;

    tracing::info!(
        "conversion complete: {} SNP sites written to {}",
        summary.emitted_sites,
        path.display()
    );

    if config.write_report {
        RunReportBuilder {
            converter: Some(Converter::Xpclr),
            input_path: config.input.display().to_string(),
            output_path: path.display().to_string(),
            selection: Some(SelectionInfo {
                path: config.samples.display().to_string(),
                requested: targets.len(),
                matched: summary.selected_samples,
            }),
            ..RunReportBuilder::new()
        }
        .build(&summary)
        .write(&path)
        .context("failed to write run report")?;
    }

    Ok(XpclrOutcome { path, summary })
}
