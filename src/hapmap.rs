use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};

use crate::{
    ConversionSummary,
    conversion::{self, DEFAULT_PROGRESS_INTERVAL, SiteWriter},
    report::{Converter, RunReportBuilder},
    smart_reader,
    vcf::Record,
};

pub const HAPMAP_SUFFIX: &str = ".hapmap";

/// Leading hapmap columns, before one column per sample.
pub const FIXED_COLUMNS: [&str; 11] = [
    "rs#",
    "alleles",
    "chrom",
    "pos",
    "strand",
    "assembly#",
    "center",
    "protLSID",
    "assayLSID",
    "panelLSID",
    "QCcode",
];

const STRAND: &str = "+";
const PLACEHOLDER: &str = "NA";
/// assembly#, center, protLSID, assayLSID, panelLSID, QCcode
const PLACEHOLDER_COLUMNS: usize = 6;
const MISSING_CALL: &str = "NN";

#[derive(Debug, Clone)]
pub struct HapmapConfig {
    pub input: PathBuf,
    pub output_prefix: PathBuf,
    /// Accepted for compatibility with existing pipelines; does not affect output.
    pub population: String,
    /// Emitted sites between progress lines; 0 disables them.
    pub progress_interval: usize,
    pub write_report: bool,
}

impl HapmapConfig {
    pub fn new(
        input: impl Into<PathBuf>,
        output_prefix: impl Into<PathBuf>,
        population: impl Into<String>,
    ) -> Self {
        Self {
            input: input.into(),
            output_prefix: output_prefix.into(),
            population: population.into(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            write_report: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HapmapOutcome {
    /// The `{prefix}.hapmap` file that was written.
    pub path: PathBuf,
    pub summary: ConversionSummary,
}

/// Writes hapmap rows; the header goes out on construction.
pub struct HapmapWriter<W> {
    inner: W,
}

impl<W> HapmapWriter<W>
where
    W: Write,
{
    pub fn new(mut inner: W, roster: &[String]) -> io::Result<Self> {
        let mut header = FIXED_COLUMNS.join("\t");
        for name in roster {
            header.push('\t');
            header.push_str(name);
        }
        writeln!(inner, "{header}")?;
        Ok(Self { inner })
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W> SiteWriter for HapmapWriter<W>
where
    W: Write,
{
    fn write_site(&mut self, record: &Record) -> Result<usize> {
        write!(
            self.inner,
            "{}\t{}\t{}\t{}\t{STRAND}",
            record.marker_id(),
            record.allele_pair(),
            record.chromosome,
            record.position,
        )?;
        for _ in 0..PLACEHOLDER_COLUMNS {
            write!(self.inner, "\t{PLACEHOLDER}")?;
        }

        let mut missing = 0;
        for index in 0..record.samples.len() {
            let alleles = record
                .genotype(index)
                .and_then(|gt| gt.alleles(&record.reference, &record.alternate));
            match alleles {
                Some([first, second]) => write!(self.inner, "\t{first}{second}")?,
                None => {
                    missing += 1;
                    write!(self.inner, "\t{MISSING_CALL}")?;
                }
            }
        }
        writeln!(self.inner)?;

        Ok(missing)
    }

    fn finish(&mut self) -> Result<()> {
        self.inner.flush().context("failed to flush hapmap output")
    }
}

/// Convert a VCF into `{prefix}.hapmap`, one row per biallelic site.
pub fn convert_hapmap(config: &HapmapConfig) -> Result<HapmapOutcome> {
    tracing::info!(
        input = %config.input.display(),
        output_prefix = %config.output_prefix.display(),
        population = %config.population,
        "starting hapmap conversion",
    );

    let mut input = smart_reader::open_vcf(&config.input)?;
    if !input.header_found {
        tracing::warn!("no #CHROM header line found; rows will carry no genotype columns");
    }
    tracing::info!("sample count: {}", input.roster.len());

    let path = conversion::output_path(&config.output_prefix, HAPMAP_SUFFIX);
    let output = conversion::create_output(&path)?;
    let mut writer = HapmapWriter::new(output, &input.roster)
        .with_context(|| format!("failed to write hapmap header to {}", path.display()))?;

    let mut summary = ConversionSummary {
        roster_samples: input.roster.len(),
        selected_samples: input.roster.len(),
        ..ConversionSummary::default()
    };
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
            converter: Some(Converter::Hapmap),
            input_path: config.input.display().to_string(),
            output_path: path.display().to_string(),
            population: Some(config.population.clone()),
            ..RunReportBuilder::new()
        }
        .build(&summary)
        .write(&path)
        .context("failed to write run report")?;
    }

    Ok(HapmapOutcome { path, summary })
}
