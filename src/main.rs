use anyhow::Result;
use clap::Parser;
use qrvcard::{run, BatchConfig, EccLevel, FailureKind};
use std::path::PathBuf;

/// Generate one vCard 3.0 QR code per contact in a CSV file, plus a
/// browsable HTML index page and a cumulative .vcf log.
#[derive(Parser, Debug)]
#[command(
    name = "qrvcard",
    version,
    about = "Convert a CSV contact list to scannable vCard QR codes"
)]
struct Cli {
    /// Input CSV file with fname,lname,office_phone,mobile_phone,org,title,email columns
    #[arg(default_value = "contacts.csv")]
    input: PathBuf,

    /// Directory receiving the generated PNG files
    #[arg(short = 'o', long, default_value = ".")]
    outdir: PathBuf,

    /// Cumulative vCard log file, written into the output directory
    #[arg(long, default_value = "vcards.vcf")]
    vcf: PathBuf,

    /// HTML index page, written into the output directory
    #[arg(long, default_value = "qrvcards.html")]
    html: PathBuf,

    /// Index cells per table row
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    columns: u32,

    /// QR error-correction level
    #[arg(long, value_parser = ["low", "medium", "quartile", "high"], default_value = "high")]
    ecc: String,

    /// Pixels per QR module
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..=64))]
    scale: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let ecc = match cli.ecc.as_str() {
        "low" => EccLevel::Low,
        "medium" => EccLevel::Medium,
        "quartile" => EccLevel::Quartile,
        _ => EccLevel::High,
    };

    // Relative log/index paths land next to the images.
    let vcf_path = if cli.vcf.is_absolute() {
        cli.vcf.clone()
    } else {
        cli.outdir.join(&cli.vcf)
    };
    let html_path = if cli.html.is_absolute() {
        cli.html.clone()
    } else {
        cli.outdir.join(&cli.html)
    };

    let config = BatchConfig {
        input: cli.input,
        outdir: cli.outdir,
        vcf_path,
        html_path,
        columns: cli.columns as usize,
        ecc,
        scale: cli.scale,
    };

    let summary = run(&config)?;

    for failure in &summary.failures {
        let verb = match failure.kind {
            FailureKind::Validation => "skipped",
            FailureKind::Encoding => "failed",
        };
        eprintln!(
            "row {} ({}): {} - {}",
            failure.row, failure.name, verb, failure.reason
        );
    }
    println!(
        "Processed {} contact(s): {} skipped, {} failed",
        summary.processed,
        summary.skipped(),
        summary.failed()
    );
    println!(
        "Card log: {} / index: {}",
        config.vcf_path.display(),
        config.html_path.display()
    );

    Ok(())
}
