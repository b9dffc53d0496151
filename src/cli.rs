use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, error::ErrorKind};
use tracing_subscriber::{EnvFilter, fmt};

use crate::{
    ConversionSummary, DEFAULT_PROGRESS_INTERVAL, HapmapConfig, XpclrConfig, convert_hapmap,
    convert_xpclr,
};

/// Options shared by both converters. None of them change the positional arity.
#[derive(Debug, Args)]
struct CommonArgs {
    /// Logging verbosity (e.g. error, warn, info, debug)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit a progress line every N converted sites (0 disables)
    #[arg(long, value_name = "N", default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    progress_interval: usize,

    /// Write a JSON run report next to the output file
    #[arg(long)]
    report: bool,
}

#[derive(Debug, Parser)]
#[command(
    name = "vcf_to_hapmap",
    author,
    version,
    about = "Convert a VCF into hapmap format for selective sweep scans",
    long_about = None
)]
struct HapmapCli {
    /// Input VCF (.gz is decompressed; - reads standard input)
    #[arg(value_name = "VCF_FILE")]
    vcf: PathBuf,

    /// Output prefix; writes {prefix}.hapmap
    #[arg(value_name = "OUTPUT_PREFIX")]
    output_prefix: PathBuf,

    /// Population label (recorded in the run report only)
    #[arg(value_name = "POPULATION_NAME")]
    population: String,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Debug, Parser)]
#[command(
    name = "vcf_to_xpclr",
    author,
    version,
    about = "Convert a VCF into an XP-CLR allele table for selected samples",
    long_about = None
)]
struct XpclrCli {
    /// Input VCF (.gz is decompressed; - reads standard input)
    #[arg(value_name = "VCF_FILE")]
    vcf: PathBuf,

    /// Output prefix; writes {prefix}.xpclr.txt
    #[arg(value_name = "OUTPUT_PREFIX")]
    output_prefix: PathBuf,

    /// File listing one sample name per line, in output order
    #[arg(value_name = "SAMPLE_FILE")]
    samples: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

/// Entry point of the `vcf_to_hapmap` binary.
pub fn run_hapmap() -> Result<()> {
    let cli: HapmapCli = parse_or_usage();
    init_logging(&cli.common.log_level)?;

    let config = HapmapConfig {
        progress_interval: cli.common.progress_interval,
        write_report: cli.common.report,
        ..HapmapConfig::new(cli.vcf, cli.output_prefix, cli.population)
    };
    let outcome = convert_hapmap(&config)?;
    print_summary(&outcome.summary);

    Ok(())
}

/// Entry point of the `vcf_to_xpclr` binary.
pub fn run_xpclr() -> Result<()> {
    let cli: XpclrCli = parse_or_usage();
    init_logging(&cli.common.log_level)?;

    let config = XpclrConfig {
        progress_interval: cli.common.progress_interval,
        write_report: cli.common.report,
        ..XpclrConfig::new(cli.vcf, cli.output_prefix, cli.samples)
    };
    let outcome = convert_xpclr(&config)?;
    print_summary(&outcome.summary);

    Ok(())
}

/// Parse the process arguments. Any argument error prints the usage line on
/// standard output and exits with status 1; help and version exit normally.
fn parse_or_usage<C>() -> C
where
    C: Parser,
{
    match C::try_parse() {
        Ok(cli) => cli,
        Err(err) if is_informational(&err) => err.exit(),
        Err(err) => {
            println!("{}", usage::<C>());
            eprint!("{}", err.render());
            std::process::exit(1);
        }
    }
}

fn is_informational(err: &clap::Error) -> bool {
    matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}

fn usage<C>() -> String
where
    C: CommandFactory,
{
    C::command().render_usage().to_string()
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
    Ok(())
}

fn print_summary(summary: &ConversionSummary) {
    eprintln!(
        "Read {lines} data lines; wrote {emitted} sites for {samples} samples.",
        lines = summary.data_lines,
        emitted = summary.emitted_sites,
        samples = summary.selected_samples,
    );

    if summary.multiallelic_sites > 0 {
        eprintln!(
            "Skipped {count} multi-allelic sites.",
            count = summary.multiallelic_sites
        );
    }

    if summary.missing_calls > 0 {
        eprintln!(
            "Wrote {count} missing genotype calls.",
            count = summary.missing_calls
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_positionals() {
        let cli = HapmapCli::parse_from(["vcf_to_hapmap", "in.vcf.gz", "out/pop", "CEU"]);
        assert_eq!(cli.vcf, PathBuf::from("in.vcf.gz"));
        assert_eq!(cli.output_prefix, PathBuf::from("out/pop"));
        assert_eq!(cli.population, "CEU");
        assert_eq!(cli.common.progress_interval, DEFAULT_PROGRESS_INTERVAL);
        assert!(!cli.common.report);
    }

    #[test]
    fn optional_flags_do_not_change_arity() {
        let cli = XpclrCli::parse_from([
            "vcf_to_xpclr",
            "-",
            "out",
            "samples.txt",
            "--progress-interval",
            "0",
            "--report",
        ]);
        assert_eq!(cli.vcf, PathBuf::from("-"));
        assert_eq!(cli.samples, PathBuf::from("samples.txt"));
        assert_eq!(cli.common.progress_interval, 0);
        assert!(cli.common.report);
    }

    #[test]
    fn wrong_arity_is_an_argument_error() {
        let missing = HapmapCli::try_parse_from(["vcf_to_hapmap", "in.vcf", "out"]).unwrap_err();
        assert!(!is_informational(&missing));
        let extra =
            XpclrCli::try_parse_from(["vcf_to_xpclr", "a", "b", "c", "d"]).unwrap_err();
        assert!(!is_informational(&extra));
    }

    #[test]
    fn help_is_informational() {
        let help = HapmapCli::try_parse_from(["vcf_to_hapmap", "--help"]).unwrap_err();
        assert!(is_informational(&help));
    }

    #[test]
    fn usage_names_positionals() {
        let text = usage::<XpclrCli>();
        assert!(text.contains("<VCF_FILE> <OUTPUT_PREFIX> <SAMPLE_FILE>"), "{text}");
    }

    #[test]
    fn clap_definitions_are_consistent() {
        HapmapCli::command().debug_assert();
        XpclrCli::command().debug_assert();
    }
}
