#![doc = include_str!("../README.md")]

pub mod cli;
pub mod conversion;
pub mod genotype;
pub mod hapmap;
pub mod report;
pub mod smart_reader;
pub mod vcf;
pub mod xpclr;

use serde::Serialize;

pub use conversion::{DEFAULT_PROGRESS_INTERVAL, SiteWriter, process_sites};
pub use genotype::Genotype;
pub use hapmap::{HapmapConfig, HapmapOutcome, convert_hapmap};
pub use xpclr::{XpclrConfig, XpclrOutcome, convert_xpclr};

/// Counters gathered over one conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionSummary {
    /// Non-comment, non-blank lines read.
    pub data_lines: usize,
    /// Biallelic sites written to the output.
    pub emitted_sites: usize,
    /// Sites dropped because ALT lists more than one allele.
    pub multiallelic_sites: usize,
    /// Genotype cells written as missing.
    pub missing_calls: usize,
    /// Samples named on the `#CHROM` line.
    pub roster_samples: usize,
    /// Samples written per row.
    pub selected_samples: usize,
}

impl ConversionSummary {
    pub fn record_emission(&mut self, missing_calls: usize) {
        self.emitted_sites += 1;
        self.missing_calls += missing_calls;
    }
}
