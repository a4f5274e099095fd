use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use docreformat::{build_options, rewrite_lines, run_reformat, Args};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docreformat=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let opts = build_options(&args)?;

    let counters = run_reformat(rewrite_lines, &opts)
        .with_context(|| format!("Cannot reformat {}", opts.path.display()))?;

    if opts.dry_run {
        println!("== DRY RUN ==");
        for preview in &counters.previews {
            println!("Would rewrite: {}", preview.path.display());
            print!("{}", preview.diff);
        }
    }

    println!("== docreformat: Summary ==");
    println!("Scanned:     {}", counters.scanned);
    if opts.dry_run {
        println!("To rewrite:  {}", counters.rewritten);
    } else {
        println!("Rewritten:   {}", counters.rewritten);
    }
    println!("Unchanged:   {}", counters.unchanged);
    println!("Failed:      {}", counters.failed);
    println!("Skipped:     {}", counters.skipped);

    if counters.failed > 0 {
        for err in &counters.failures {
            eprintln!("error: {err}");
        }
        anyhow::bail!("{} file(s) could not be reformatted", counters.failed);
    }

    Ok(())
}
