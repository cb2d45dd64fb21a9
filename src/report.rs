use crate::abbrev::{abbrev_count, abbrev_path};
use crate::stats::{DirStats, RunStats};
use indicatif::HumanCount;
use std::io::{self, Write};
use std::time::Duration;

const FILE_COUNT_WIDTH: usize = "123.4K".len();
const FILE_SIZE_WIDTH: usize = "(123.4 MiB)".len();
const DUPLICATES_COL_WIDTH: usize = FILE_COUNT_WIDTH + 1 + FILE_SIZE_WIDTH;
const GUTTER_WIDTH: usize = 2;

/// Write the end-of-run summary table.
///
/// One row per target root, largest duplicate size first, followed by the totals. The
/// directory column is as wide as the longest target path, but no wider than what fits
/// in `term_width`.
pub fn write_report<W: Write>(out: &mut W, stats: &RunStats, term_width: usize) -> io::Result<()> {
    let mut targets: Vec<&DirStats> = stats.iter().filter(|s| s.is_target_dir).collect();
    targets.sort_by(|a, b| {
        b.dup_file_size
            .cmp(&a.dup_file_size)
            .then_with(|| a.directory.cmp(&b.directory))
    });

    let longest_target_path = targets
        .iter()
        .map(|s| s.directory.to_string_lossy().chars().count())
        .max()
        .unwrap_or(0);
    let dir_col_width = term_width
        .saturating_sub(DUPLICATES_COL_WIDTH + GUTTER_WIDTH)
        .min(longest_target_path);

    let hline = format!(
        "{}{}{}",
        "-".repeat(DUPLICATES_COL_WIDTH),
        " ".repeat(GUTTER_WIDTH),
        "-".repeat(dir_col_width)
    );

    writeln!(
        out,
        "{:^width$}{}Directory",
        "Duplicates",
        " ".repeat(GUTTER_WIDTH),
        width = DUPLICATES_COL_WIDTH
    )?;
    writeln!(out, "{}", hline)?;
    for s in &targets {
        let path = abbrev_path(&s.directory, dir_col_width);
        write_row(out, s.dup_file_count, s.dup_file_size, &path)?;
    }
    writeln!(out, "{}", hline)?;
    write_row(out, stats.total_dup_files(), stats.total_dup_size(), "Total")?;
    writeln!(out)?;

    writeln!(
        out,
        "Scanned {} files in {} directories",
        HumanCount(stats.total_files()),
        HumanCount(stats.total_dirs())
    )?;
    match stats.total_empty_dirs() {
        0 => {}
        1 => writeln!(out, "Removed 1 empty directory")?,
        n => writeln!(out, "Removed {} empty directories", n)?,
    }
    writeln!(out, "Completed in {}", format_elapsed(stats.elapsed()))?;
    Ok(())
}

fn write_row<W: Write>(out: &mut W, count: u64, size: u64, label: &str) -> io::Result<()> {
    let file_count = abbrev_count(count, true);
    let file_size = format!("({})", abbrev_count(size, false));
    writeln!(
        out,
        "{:>count_width$} {:>size_width$}{}{}",
        file_count,
        file_size,
        " ".repeat(GUTTER_WIDTH),
        label,
        count_width = FILE_COUNT_WIDTH,
        size_width = FILE_SIZE_WIDTH
    )
}

/// `H:MM:SS`, whole seconds.
fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
