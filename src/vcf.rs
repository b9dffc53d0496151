//! Fixed-schema reading of VCF text.
//!
//! Columns are taken by position (0 = CHROM, 1 = POS, 3 = REF, 4 = ALT,
//! 9.. = samples). The FORMAT column is never consulted; the genotype call is
//! assumed to be the first colon-separated token of each sample column.

use std::{
    fmt,
    io::{self, BufRead},
};

use thiserror::Error;

use crate::genotype::Genotype;

/// Prefix of the header line that names the samples.
pub const SAMPLE_HEADER_PREFIX: &str = "#CHROM";

/// Index of the first sample column.
pub const FIRST_SAMPLE_COLUMN: usize = 9;

/// Number of leading columns a data line must carry to be converted.
const REQUIRED_COLUMNS: usize = 5;

/// A single data line of a VCF file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    pub chromosome: String,
    /// Kept verbatim as text; never reformatted.
    pub position: String,
    pub reference: String,
    pub alternate: String,
    /// Raw sample columns in roster order.
    pub samples: Vec<String>,
}

impl Record {
    /// True when ALT names a single allele.
    pub fn is_biallelic(&self) -> bool {
        !self.alternate.contains(',')
    }

    /// Synthetic marker id `{chrom}_{pos}`.
    pub fn marker_id(&self) -> String {
        format!("{}_{}", self.chromosome, self.position)
    }

    /// `{ref}/{alt}`
    pub fn allele_pair(&self) -> String {
        format!("{}/{}", self.reference, self.alternate)
    }

    /// Decoded call of the sample at roster `index`, or `None` if the line
    /// has no column for it.
    pub fn genotype(&self, index: usize) -> Option<Genotype> {
        self.samples
            .get(index)
            .map(|field| Genotype::from_sample_field(field))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} {}>{}",
            self.chromosome, self.position, self.reference, self.alternate
        )
    }
}

/// Iterator over data records, skipping `#` lines and blank lines.
pub struct Reader<R> {
    inner: R,
    line: u64,
    buf: String,
}

impl<R> Reader<R>
where
    R: BufRead,
{
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: 0,
            buf: String::new(),
        }
    }

    /// Number of physical lines consumed so far.
    pub fn line(&self) -> u64 {
        self.line
    }
}

impl<R> Iterator for Reader<R>
where
    R: BufRead,
{
    type Item = Result<Record, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.inner.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line += 1;
                    if self.buf.starts_with('#') {
                        continue;
                    }
                    let trimmed = self.buf.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    return Some(parse_record(trimmed).map_err(|kind| ParseError {
                        line: self.line,
                        raw: trimmed.to_string(),
                        kind,
                    }));
                }
                Err(e) => {
                    return Some(Err(ParseError {
                        line: self.line + 1,
                        raw: String::new(),
                        kind: ParseErrorKind::Io(e),
                    }));
                }
            }
        }
    }
}

/// Errors that can arise while reading a VCF data line.
#[derive(Debug, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: u64,
    pub raw: String,
    #[source]
    pub kind: ParseErrorKind,
}

#[derive(Debug, Error)]
pub enum ParseErrorKind {
    #[error("I/O error")]
    Io(#[from] io::Error),
    #[error("expected at least 5 tab-delimited fields, found {0}")]
    FieldCount(usize),
}

fn parse_record(line: &str) -> Result<Record, ParseErrorKind> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < REQUIRED_COLUMNS {
        return Err(ParseErrorKind::FieldCount(fields.len()));
    }

    let samples = fields
        .get(FIRST_SAMPLE_COLUMN..)
        .unwrap_or_default()
        .iter()
        .map(|s| s.to_string())
        .collect();

    Ok(Record {
        chromosome: fields[0].to_string(),
        position: fields[1].to_string(),
        reference: fields[3].to_string(),
        alternate: fields[4].to_string(),
        samples,
    })
}

/// Sample names of a `#CHROM` line, in column order.
pub fn parse_roster(header_line: &str) -> Vec<String> {
    header_line
        .trim()
        .split('\t')
        .skip(FIRST_SAMPLE_COLUMN)
        .map(str::to_string)
        .collect()
}

/// Read lines until the first `#CHROM` line and return its sample names.
///
/// Returns `None` when the input ends first. Every non-`#` line passed over
/// on the way is handed to `on_data_line` with its line terminator intact.
pub fn scan_roster<R, F>(reader: &mut R, mut on_data_line: F) -> io::Result<Option<Vec<String>>>
where
    R: BufRead,
    F: FnMut(&str),
{
    let mut buf = String::new();
    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        if buf.starts_with(SAMPLE_HEADER_PREFIX) {
            return Ok(Some(parse_roster(&buf)));
        }
        if !buf.starts_with('#') {
            on_data_line(&buf);
        }
    }
}
