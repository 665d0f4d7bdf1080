use crate::rename::{RenameResult, RenameStatus};
use crate::scanner::PatternScan;
use std::io::{self, Write};
use std::path::Path;

/// Display dry run results in a formatted output
pub fn display_dry_run(
    target: &Path,
    result: &RenameResult,
    writer: &mut impl Write,
) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "========================================")?;
    writeln!(writer, "              DRY RUN")?;
    writeln!(writer, "========================================")?;
    writeln!(writer)?;
    writeln!(writer, "Target:     {}", target.display())?;
    writeln!(writer, "Operations: {}", result.operations.len())?;
    writeln!(writer)?;

    if result.operations.is_empty() {
        writeln!(writer, "No files to rename.")?;
        write_skipped(result, writer)?;
        return Ok(());
    }

    writeln!(writer, "Planned changes:")?;
    writeln!(writer)?;

    for (i, op) in result.operations.iter().enumerate() {
        writeln!(writer, "  {}. [episode {}]", i + 1, op.episode)?;
        writeln!(writer, "     From: {}", op.source_name)?;
        writeln!(writer, "     To:   {}", op.target_name)?;

        match op.status {
            RenameStatus::Skipped => writeln!(writer, "     [=] Already named")?,
            RenameStatus::Failed => {
                if let Some(err) = &op.error {
                    writeln!(writer, "     [!] {}", err)?;
                }
            }
            RenameStatus::Pending | RenameStatus::Success => {}
        }

        writeln!(writer)?;
    }

    // Summary
    writeln!(writer, "----------------------------------------")?;
    writeln!(writer, "Summary:")?;
    writeln!(
        writer,
        "  {} files would be renamed",
        result.count(RenameStatus::Pending)
    )?;

    let unchanged = result.count(RenameStatus::Skipped);
    if unchanged > 0 {
        writeln!(writer, "  {} files already named", unchanged)?;
    }

    let failed = result.count(RenameStatus::Failed);
    if failed > 0 {
        writeln!(writer, "  {} files could not be planned", failed)?;
    }

    write_skipped(result, writer)?;

    writeln!(writer)?;
    writeln!(writer, "Run without --dry to apply these changes.")?;

    Ok(())
}

/// Display dry run results in a simple tab-separated format for scripting
pub fn display_dry_run_simple(result: &RenameResult, writer: &mut impl Write) -> io::Result<()> {
    for op in &result.operations {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            op.episode,
            op.status.description(),
            op.source_name,
            op.target_name
        )?;
    }
    Ok(())
}

/// Display execution results (non-dry-run)
pub fn display_execution_result(
    target: &Path,
    result: &RenameResult,
    writer: &mut impl Write,
) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(
        writer,
        "{}: renamed {} files.",
        target.display(),
        result.count(RenameStatus::Success)
    )?;

    let unchanged = result.count(RenameStatus::Skipped);
    if unchanged > 0 {
        writeln!(writer, "  {} files were already named.", unchanged)?;
    }

    let failed: Vec<_> = result
        .operations
        .iter()
        .filter(|op| op.status == RenameStatus::Failed)
        .collect();
    if !failed.is_empty() {
        writeln!(writer, "  {} files failed:", failed.len())?;
        for op in failed {
            let reason = op.error.as_ref().map(|e| e.to_string()).unwrap_or_default();
            writeln!(writer, "    - {} ({})", op.source_name, reason)?;
        }
    }

    write_skipped(result, writer)?;

    if result.cancelled {
        writeln!(writer, "  Cancelled before all files were processed.")?;
    }

    Ok(())
}

/// Display guessed input patterns
pub fn display_patterns(
    target: &Path,
    scan: &PatternScan,
    writer: &mut impl Write,
) -> io::Result<()> {
    if !scan.has_media {
        writeln!(writer, "No media files found in {}", target.display())?;
        return Ok(());
    }

    if scan.patterns.is_empty() {
        writeln!(
            writer,
            "No pattern detected for {} media files in {}",
            scan.total_files,
            target.display()
        )?;
        return Ok(());
    }

    writeln!(
        writer,
        "Detected {} patterns from {} media files:",
        scan.patterns.len(),
        scan.total_files
    )?;
    for pattern in &scan.patterns {
        writeln!(writer, "  {}", pattern)?;
    }

    Ok(())
}

fn write_skipped(result: &RenameResult, writer: &mut impl Write) -> io::Result<()> {
    if result.skipped_files > 0 {
        writeln!(
            writer,
            "  {} matched files skipped (see warnings)",
            result.skipped_files
        )?;
    }
    Ok(())
}
