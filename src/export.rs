use crate::error::ExpResult;
use crate::stage::Stage;
use crate::summary::SummaryBook;
use std::fs;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use tracing::info;

/// Session timestamp in the `2026-08-24_14h05` shape used by the exported
/// summary.
pub fn session_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d_%Hh%M").to_string()
}

/// External persistence collaborator. The core's contract ends at handing
/// over length-aligned, correctly labeled columns per stage prefix; the
/// caller keeps the `SummaryBook` on failure so export can be retried.
pub trait Exporter {
    fn export(&self, book: &SummaryBook, participant: &str, group: &str) -> ExpResult<PathBuf>;
}

/// Writes one CSV file per participant (`<group>_<participant>.csv`),
/// overwriting any previous export of the same name. Stage blocks appear in
/// prefix order, each as a header row plus its padded columns.
pub struct CsvExporter {
    out_dir: PathBuf,
}

impl CsvExporter {
    pub fn new<P: AsRef<Path>>(out_dir: P) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
        }
    }
}

impl Exporter for CsvExporter {
    fn export(&self, book: &SummaryBook, participant: &str, group: &str) -> ExpResult<PathBuf> {
        // Pad a copy; the caller's book stays untouched for retry.
        let mut book = book.clone();
        book.pad_all();

        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(format!("{}_{}.csv", group, participant));
        let mut writer = csv::WriterBuilder::new().flexible(true).from_path(&path)?;

        for stage in Stage::iter() {
            let cols = book.stage(stage);
            if cols.is_empty() {
                continue;
            }
            let prefix = stage.prefix();
            let labeled = cols.columns();

            let mut header = vec!["time".to_string(), prefix.to_string()];
            header.extend(labeled.iter().map(|(label, _)| format!("{}_{}", label, prefix)));
            writer.write_record(&header)?;

            for row in 0..cols.row_count() {
                let mut record = Vec::with_capacity(header.len());
                record.push(if row == 0 { book.timestamp.clone() } else { String::new() });
                record.push(String::new());
                for (_, col) in &labeled {
                    record.push(col[row].clone());
                }
                writer.write_record(&record)?;
            }
            writer.write_record(&["", ""])?;
        }

        writer.flush()?;
        info!("💾 Exported session summary to '{}'", path.display());
        Ok(path)
    }
}
