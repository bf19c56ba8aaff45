//! Batch driver: reads the contact CSV, generates one QR image per
//! row, and accumulates the card log and the HTML index.
//!
//! Per-row problems (unreadable record, missing name, payload too
//! large) skip that row and are collected into the run summary; the
//! remaining rows are still processed. Anything touching the output
//! files is fatal and aborts the run.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

use crate::contact::{ContactCard, ContactRow};
use crate::page::IndexPage;
use crate::qr::{render_qr_image, EccLevel};

/// Everything a run needs; the CLI fills this in from flags.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Input CSV with a header row naming at least
    /// `fname,lname,office_phone,mobile_phone,org,title,email`.
    pub input: PathBuf,
    /// Directory receiving the generated PNG files.
    pub outdir: PathBuf,
    /// Cumulative vCard log file.
    pub vcf_path: PathBuf,
    /// Generated HTML index page.
    pub html_path: PathBuf,
    /// Index cells per table row.
    pub columns: usize,
    pub ecc: EccLevel,
    /// Pixels per QR module.
    pub scale: u32,
}

/// Why a row was left out of the outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The record could not be read or lacked a required field.
    Validation,
    /// The card text did not fit a QR symbol at the chosen level.
    Encoding,
}

/// One skipped row, identified by its 1-based data-row position.
#[derive(Debug, Clone)]
pub struct RowFailure {
    pub row: usize,
    pub name: String,
    pub kind: FailureKind,
    pub reason: String,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub processed: usize,
    pub failures: Vec<RowFailure>,
}

impl RunSummary {
    pub fn skipped(&self) -> usize {
        self.failures
            .iter()
            .filter(|f| f.kind == FailureKind::Validation)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.failures
            .iter()
            .filter(|f| f.kind == FailureKind::Encoding)
            .count()
    }
}

/// Run the whole batch. Outputs are truncated and rewritten; re-running
/// on identical input produces byte-identical files.
pub fn run(config: &BatchConfig) -> Result<RunSummary> {
    let mut reader = csv::ReaderBuilder::new()
        .from_path(&config.input)
        .with_context(|| format!("failed to open {}", config.input.display()))?;

    fs::create_dir_all(&config.outdir)
        .with_context(|| format!("failed to create {}", config.outdir.display()))?;

    let mut summary = RunSummary::default();
    let mut card_log = String::new();
    let mut page = IndexPage::new(config.columns);
    // Count of images already written per filename stem, for collision
    // suffixing when two contacts share a name.
    let mut stems_used: HashMap<String, usize> = HashMap::new();

    for (idx, record) in reader.deserialize::<ContactRow>().enumerate() {
        let row_no = idx + 1;
        let row = match record {
            Ok(row) => row,
            Err(err) => {
                summary.failures.push(RowFailure {
                    row: row_no,
                    name: "(unreadable)".to_string(),
                    kind: FailureKind::Validation,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        let card = match ContactCard::from_row(&row) {
            Ok(card) => card,
            Err(err) => {
                summary.failures.push(RowFailure {
                    row: row_no,
                    name: row.label(),
                    kind: FailureKind::Validation,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        let vcard = card.to_vcard();
        let image = match render_qr_image(&vcard, config.ecc, config.scale) {
            Ok(image) => image,
            Err(err) => {
                summary.failures.push(RowFailure {
                    row: row_no,
                    name: row.label(),
                    kind: FailureKind::Encoding,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        let filename = unique_filename(&mut stems_used, &card.image_file_stem());
        let target = config.outdir.join(&filename);
        image
            .save(&target)
            .with_context(|| format!("failed to write {}", target.display()))?;

        card_log.push_str(&vcard);
        page.push_cell(
            &image_href(config, &filename),
            &card.display_name(),
        );
        summary.processed += 1;
    }

    fs::write(&config.vcf_path, card_log)
        .with_context(|| format!("failed to write {}", config.vcf_path.display()))?;
    fs::write(&config.html_path, page.finish())
        .with_context(|| format!("failed to write {}", config.html_path.display()))?;

    Ok(summary)
}

/// First use of a stem keeps the plain name; later uses get `-2`, `-3`
/// and so on, so same-named contacts never overwrite each other.
fn unique_filename(stems_used: &mut HashMap<String, usize>, stem: &str) -> String {
    let count = stems_used.entry(stem.to_string()).or_insert(0);
    *count += 1;
    if *count == 1 {
        format!("{stem}.png")
    } else {
        format!("{stem}-{count}.png")
    }
}

/// Image reference as seen from the index page. The link must resolve
/// from the HTML file's own directory, not the working directory of the
/// generating process.
fn image_href(config: &BatchConfig, filename: &str) -> String {
    let html_dir = config.html_path.parent().unwrap_or_else(|| Path::new(""));
    if html_dir == config.outdir.as_path() || html_dir.as_os_str().is_empty() {
        return filename.to_string();
    }
    if let Some(prefix) = lexical_relative(html_dir, &config.outdir) {
        return prefix.join(filename).display().to_string();
    }
    // One side is relative and the other absolute; anchor the image
    // directory to the working directory so the link still resolves.
    let outdir = if config.outdir.is_absolute() {
        config.outdir.clone()
    } else {
        env::current_dir().unwrap_or_default().join(&config.outdir)
    };
    outdir.join(filename).display().to_string()
}

/// Relative path from `from` to `to`, computed lexically. Only possible
/// when both are absolute or both relative, and `from` contains no `..`
/// segments to invert.
fn lexical_relative(from: &Path, to: &Path) -> Option<PathBuf> {
    if from.is_absolute() != to.is_absolute() {
        return None;
    }
    let from: Vec<Component> = from.components().collect();
    let to: Vec<Component> = to.components().collect();
    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();
    if from[common..]
        .iter()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return None;
    }
    let mut rel = PathBuf::new();
    for _ in &from[common..] {
        rel.push("..");
    }
    for component in &to[common..] {
        if !matches!(component, Component::CurDir) {
            rel.push(component.as_os_str());
        }
    }
    Some(rel)
}
