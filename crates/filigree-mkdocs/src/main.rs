//! filigree-mkdocs CLI - Post-process mkdocs output with semantic highlighting.

use anyhow::{Result, bail};
use facet::Facet;
use facet_args as args;
use filigree_mkdocs::{ProcessOptions, Processor};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::time::Instant;

/// Post-process mkdocs HTML output to add semantic highlighting for the
/// String-Plus library.
///
/// This tool transforms mkdocs-generated documentation by re-tagging
/// Pygments spans with library semantics and retargeting source buttons at
/// the library repository.
#[derive(Debug, Facet)]
struct Args {
    /// Input directory containing mkdocs output (e.g., site)
    #[facet(args::positional)]
    input: PathBuf,

    /// Output directory (defaults to modifying input in place)
    #[facet(args::positional, default)]
    output: Option<PathBuf>,

    /// Show verbose output
    #[facet(args::named, args::short = 'v', default)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args: Args = facet_args::from_std_args()?;

    // Validate input directory
    if !args.input.exists() {
        bail!("Input directory does not exist: {}", args.input.display());
    }

    if !args.input.is_dir() {
        bail!("Input path is not a directory: {}", args.input.display());
    }

    // Create processor
    let options = ProcessOptions {
        input_dir: args.input.clone(),
        output_dir: args.output.clone(),
        verbose: args.verbose,
    };

    let mut processor = Processor::new(options);

    // Print header
    eprintln!(
        "{} Processing mkdocs output: {}",
        "filigree-mkdocs".green().bold(),
        args.input.display()
    );

    if let Some(out) = &args.output {
        eprintln!("  Output: {}", out.display());
    } else {
        eprintln!("  {} Modifying in place", "Note:".yellow());
    }

    eprintln!();

    // Process
    let start = Instant::now();
    let stats = processor.process()?;
    let elapsed = start.elapsed();

    // Print results
    eprintln!("{}", "Results:".bold());
    eprintln!(
        "  {} HTML files processed",
        stats.files_processed.to_string().cyan()
    );
    eprintln!(
        "  {} code blocks rewritten",
        stats.blocks_changed.to_string().green()
    );
    eprintln!(
        "  {} tokens re-tagged, {} interpolation regions, {} placeholders split",
        stats.tokens_reclassified.to_string().green(),
        stats.regions_split.to_string().green(),
        stats.placeholders_split.to_string().green()
    );
    eprintln!(
        "  {} source buttons retargeted",
        stats.links_rewritten.to_string().green()
    );

    if stats.blocks_skipped > 0 {
        eprintln!(
            "  {} code blocks skipped (foreign markup)",
            stats.blocks_skipped.to_string().yellow()
        );
    }

    if let Some(ref css_path) = stats.css_file_modified {
        eprintln!("  {} CSS patched: {}", "✓".green(), css_path.display());
    }

    if !stats.files_with_unterminated.is_empty() {
        eprintln!(
            "\n  {} Unterminated interpolation (left untouched) in: {}",
            "Note:".yellow(),
            stats.files_with_unterminated.join(", ")
        );
    }

    eprintln!(
        "\n  Completed in {:.2}s ({:.1} MB/s, {:+.1}% HTML size)",
        elapsed.as_secs_f64(),
        stats.throughput_mb_s(),
        stats.html_inflation_percent()
    );

    Ok(())
}
