use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;

use crate::vcf::{self, scan_roster};

/// Path that selects standard input instead of a file.
pub const STDIN_PATH: &str = "-";

pub type DynBufRead = Box<dyn BufRead + Send>;

/// Compression is decided by the `.gz` suffix alone; content is never sniffed.
pub fn is_gzip_path(path: &Path) -> bool {
    path.to_string_lossy().ends_with(".gz")
}

pub fn is_stdin_path(path: &Path) -> bool {
    path.as_os_str() == STDIN_PATH
}

/// Opens a file as text, peeling off a gzip layer when the name ends in `.gz`.
pub fn open_input(path: &Path) -> Result<DynBufRead> {
    let file =
        File::open(path).with_context(|| format!("failed to open input {}", path.display()))?;
    if is_gzip_path(path) {
        tracing::debug!(path = %path.display(), "decoding gzip input");
        // MultiGzDecoder also covers BGZF and concatenated members
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// A VCF whose sample roster has been resolved and whose data records are
/// ready to be streamed from the first line.
pub struct VcfInput {
    pub roster: Vec<String>,
    /// False when no `#CHROM` line was found; the roster is then empty.
    pub header_found: bool,
    pub records: vcf::Reader<DynBufRead>,
}

/// Resolve the roster and position a record reader at the start of the data.
///
/// A regular path is read twice through two independent handles: the first
/// stops at the `#CHROM` line, the second starts again from byte 0. Standard
/// input cannot be rewound, so data lines seen before the header are buffered
/// and replayed ahead of the rest of the stream.
pub fn open_vcf(path: &Path) -> Result<VcfInput> {
    if is_stdin_path(path) {
        tracing::debug!("reading VCF from standard input");
        let stdin: DynBufRead = Box::new(BufReader::new(io::stdin()));
        return single_pass(stdin).context("failed to read VCF from standard input");
    }

    let roster = {
        let mut header_pass = open_input(path)?;
        scan_roster(&mut header_pass, |_| {})
            .with_context(|| format!("failed to read VCF header from {}", path.display()))?
    };
    let data_pass = open_input(path)?;

    Ok(VcfInput {
        header_found: roster.is_some(),
        roster: roster.unwrap_or_default(),
        records: vcf::Reader::new(data_pass),
    })
}

/// Roster resolution and data streaming over one forward-only reader.
pub fn single_pass<R>(mut reader: R) -> io::Result<VcfInput>
where
    R: BufRead + Send + 'static,
{
    let mut early = String::new();
    let roster = scan_roster(&mut reader, |line| early.push_str(line))?;
    if !early.is_empty() {
        tracing::debug!(
            bytes = early.len(),
            "buffered data lines found before the #CHROM header"
        );
    }
    let replay: DynBufRead = Box::new(Cursor::new(early.into_bytes()).chain(reader));

    Ok(VcfInput {
        header_found: roster.is_some(),
        roster: roster.unwrap_or_default(),
        records: vcf::Reader::new(replay),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    const VCF: &str = "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\ts1\ts2\nchr1\t100\t.\tA\tT\t.\t.\t.\tGT\t0/0\t0/1\n";

    #[test]
    fn gzip_detection_is_suffix_only() {
        assert!(is_gzip_path(Path::new("calls.vcf.gz")));
        assert!(!is_gzip_path(Path::new("calls.vcf")));
        assert!(!is_gzip_path(Path::new("calls.gz.vcf")));
        assert!(is_stdin_path(Path::new("-")));
        assert!(!is_stdin_path(Path::new("./-")));
    }

    #[test]
    fn reads_plain_and_gzip_files_identically() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("in.vcf");
        std::fs::write(&plain, VCF).unwrap();

        let gz: PathBuf = dir.path().join("in.vcf.gz");
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(VCF.as_bytes()).unwrap();
        std::fs::write(&gz, encoder.finish().unwrap()).unwrap();

        for path in [plain, gz] {
            let input = open_vcf(&path).unwrap();
            assert!(input.header_found);
            assert_eq!(input.roster, vec!["s1", "s2"]);
            let records: Vec<_> = input.records.collect::<Result<_, _>>().unwrap();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].marker_id(), "chr1_100");
        }
    }

    #[test]
    fn single_pass_replays_lines_before_header() {
        let data = "chr0\t1\t.\tG\tC\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\ts1\nchr1\t2\t.\tA\tT\t.\t.\t.\tGT\t1/1\n";
        let input = single_pass(Cursor::new(data.as_bytes().to_vec())).unwrap();
        assert_eq!(input.roster, vec!["s1"]);
        let positions: Vec<_> = input.records.map(|r| r.unwrap().position).collect();
        assert_eq!(positions, vec!["1", "2"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_vcf(&dir.path().join("absent.vcf")).err().unwrap();
        assert!(err.to_string().contains("failed to open input"));
    }
}
