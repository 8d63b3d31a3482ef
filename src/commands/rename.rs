use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::classify::{Classification, Classifier};
use crate::cli::Cli;
use crate::config::{DEFAULT_OUTPUT_DIRNAME, FAILED_LIST_FILENAME, SUPPORTED_EXTENSION};
use crate::extract::extract_preview;
use crate::model::{FileRecord, NameDecision};
use crate::place;
use crate::recover::TitleRecovery;
use crate::util::{Sanitizer, ensure_directory};

#[derive(Debug, Default)]
pub struct RunReport {
    pub placed: usize,
    pub skipped: usize,
    pub failed: Vec<String>,
}

enum FileOutcome {
    Placed,
    Skipped,
    Failed,
}

pub fn run(cli: Cli) -> Result<()> {
    let output_dir = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.join(DEFAULT_OUTPUT_DIRNAME));

    info!(
        input = %cli.input.display(),
        output = %output_dir.display(),
        "starting filename repair"
    );

    let classifier = Classifier::new()?;
    let recovery = TitleRecovery::from_env()?;

    let report = rename_directory(&cli.input, &output_dir, &classifier, &recovery)?;

    info!(
        placed = report.placed,
        skipped = report.skipped,
        failed = report.failed.len(),
        "run complete"
    );

    Ok(())
}

pub fn rename_directory(
    input_dir: &Path,
    output_dir: &Path,
    classifier: &Classifier,
    recovery: &TitleRecovery,
) -> Result<RunReport> {
    ensure_directory(output_dir)?;

    let sanitizer = Sanitizer::new()?;
    let mut report = RunReport::default();

    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("failed to read {}", input_dir.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", input_dir.display()))?;

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", entry.path().display()))?
            .is_file()
        {
            continue;
        }

        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            warn!(path = %entry.path().display(), "skipping non-UTF-8 filename");
            continue;
        };

        // Entries without the supported extension are excluded, not failed.
        let Some(record) = FileRecord::from_name(name) else {
            continue;
        };

        match process_file(
            &record,
            &entry.path(),
            output_dir,
            classifier,
            recovery,
            &sanitizer,
        ) {
            Ok(FileOutcome::Placed) => report.placed += 1,
            Ok(FileOutcome::Skipped) => report.skipped += 1,
            Ok(FileOutcome::Failed) => {
                warn!(file = %record.raw_name, "could not process file");
                report.failed.push(record.raw_name);
            }
            Err(err) => {
                error!(file = %record.raw_name, error = %err, "error while processing file");
                report.failed.push(record.raw_name);
            }
        }
    }

    write_failed_list(output_dir, &report.failed)?;

    Ok(report)
}

fn process_file(
    record: &FileRecord,
    src: &Path,
    output_dir: &Path,
    classifier: &Classifier,
    recovery: &TitleRecovery,
    sanitizer: &Sanitizer,
) -> Result<FileOutcome> {
    let classification = classifier.classify(record);

    if classification == Classification::AlreadyValid {
        info!(file = %record.raw_name, "filename already well formed, moving verbatim");
        place::move_file(src, &output_dir.join(&record.raw_name))?;
        return Ok(FileOutcome::Placed);
    }

    match decide_new_name(record, src, recovery, sanitizer, classification)? {
        NameDecision::Skip => {
            info!(file = %record.raw_name, "cleaning changed nothing, skipping");
            Ok(FileOutcome::Skipped)
        }
        NameDecision::RenameReady(new_name) => {
            place::copy_file(src, &output_dir.join(&new_name))?;
            Ok(FileOutcome::Placed)
        }
        NameDecision::Failed => Ok(FileOutcome::Failed),
    }
}

fn decide_new_name(
    record: &FileRecord,
    src: &Path,
    recovery: &TitleRecovery,
    sanitizer: &Sanitizer,
    classification: Classification,
) -> Result<NameDecision> {
    let title = match classification {
        // The caller routes already-valid names through the move fast path.
        Classification::AlreadyValid => return Ok(NameDecision::Skip),
        Classification::CleanTitle(title) | Classification::StrippedSuffix(title) => {
            if title == record.stem {
                return Ok(NameDecision::Skip);
            }
            title
        }
        Classification::NeedsRecovery => {
            let preview = extract_preview(src);
            let title = recovery.recover(&preview, &record.stem)?;
            if title.is_empty() {
                warn!(file = %record.raw_name, "recovery produced no title");
                return Ok(NameDecision::Failed);
            }
            sanitizer.sanitize(&title)
        }
    };

    Ok(NameDecision::RenameReady(format!(
        "{title}.{SUPPORTED_EXTENSION}"
    )))
}

fn write_failed_list(output_dir: &Path, failed: &[String]) -> Result<()> {
    if failed.is_empty() {
        return Ok(());
    }

    let path = output_dir.join(FAILED_LIST_FILENAME);
    fs::write(&path, failed.join("\n"))
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!(path = %path.display(), count = failed.len(), "wrote failure report");
    Ok(())
}
