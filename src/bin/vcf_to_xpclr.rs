use anyhow::Result;

fn main() -> Result<()> {
    sweep_convert::cli::run_xpclr()
}
