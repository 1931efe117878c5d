use std::path::Path;

use anyhow::Result;
use tempfile::NamedTempFile;

use crate::extract::Record;
use crate::report::{Event, Reporter};

/// What the writer did with the record sequence.
#[derive(Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Header plus `n` data rows written.
    Written(usize),
    /// Empty input; the destination was not touched.
    Empty,
    /// I/O failure, already reported; the destination was not replaced.
    Failed,
}

/// Serialize records to a CSV file. An empty sequence is a no-op, not an
/// error. I/O failures are reported and folded into the outcome instead of
/// propagating.
pub fn write_csv(records: &[Record], path: &Path, reporter: &mut dyn Reporter) -> WriteOutcome {
    if records.is_empty() {
        reporter.report(Event::NothingToWrite);
        return WriteOutcome::Empty;
    }

    match write_records(records, path) {
        Ok(()) => {
            reporter.report(Event::Saved {
                rows: records.len(),
                path: path.to_path_buf(),
            });
            WriteOutcome::Written(records.len())
        }
        Err(err) => {
            reporter.report(Event::WriteFailed {
                path: path.to_path_buf(),
                cause: format!("{err:#}"),
            });
            WriteOutcome::Failed
        }
    }
}

/// Write header and rows to a temp file in the destination directory, then
/// atomically replace the destination. A mid-write failure never leaves a
/// partial file at `path`.
fn write_records(records: &[Record], path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;

    {
        let mut wtr = csv::Writer::from_writer(&mut tmp);
        for record in records {
            // The header row comes from the field renames on the first serialize.
            wtr.serialize(record)?;
        }
        wtr.flush()?;
    }

    tmp.persist(path)?;
    Ok(())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Recorder;

    fn record(name: &str, price: &str, rating: &str) -> Record {
        Record {
            name: name.to_string(),
            price: price.to_string(),
            rating: rating.to_string(),
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.csv");
        let records = vec![
            record("Widget A", "$9.99", "4.5 stars"),
            record("Widget B", "$14.99", "N/A"),
        ];

        let mut rec = Recorder::default();
        let outcome = write_csv(&records, &dest, &mut rec);
        assert_eq!(outcome, WriteOutcome::Written(2));

        let text = std::fs::read_to_string(&dest).unwrap();
        assert_eq!(
            text,
            "Product Name,Price,Rating\nWidget A,$9.99,4.5 stars\nWidget B,$14.99,N/A\n"
        );
        assert!(rec.events.contains(&Event::Saved {
            rows: 2,
            path: dest.clone(),
        }));
    }

    #[test]
    fn round_trip_preserves_fields() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.csv");
        let records = vec![
            record("Widget, Deluxe", "$1,299.00", "4.5 stars"),
            record("Plain", "$5", "said \"great\""),
            record("Multi\nline", "$0", "N/A"),
        ];

        let mut rec = Recorder::default();
        assert_eq!(write_csv(&records, &dest, &mut rec), WriteOutcome::Written(3));

        let mut rdr = csv::Reader::from_path(&dest).unwrap();
        assert_eq!(
            rdr.headers().unwrap(),
            &csv::StringRecord::from(vec!["Product Name", "Price", "Rating"])
        );
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), records.len());
        for (row, orig) in rows.iter().zip(&records) {
            assert_eq!(&row[0], orig.name.as_str());
            assert_eq!(&row[1], orig.price.as_str());
            assert_eq!(&row[2], orig.rating.as_str());
        }
    }

    #[test]
    fn empty_input_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.csv");

        let mut rec = Recorder::default();
        let outcome = write_csv(&[], &dest, &mut rec);
        assert_eq!(outcome, WriteOutcome::Empty);
        assert!(!dest.exists());
        assert!(rec.events.contains(&Event::NothingToWrite));
    }

    #[test]
    fn rerun_overwrites_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.csv");
        let mut rec = Recorder::default();

        let first = vec![record("Old", "$1", "N/A"), record("Older", "$2", "N/A")];
        write_csv(&first, &dest, &mut rec);
        let second = vec![record("New", "$3", "N/A")];
        write_csv(&second, &dest, &mut rec);

        let text = std::fs::read_to_string(&dest).unwrap();
        assert_eq!(text, "Product Name,Price,Rating\nNew,$3,N/A\n");
    }

    #[test]
    fn unwritable_destination_is_reported_not_propagated() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing_subdir").join("out.csv");
        let records = vec![record("Widget", "$1", "N/A")];

        let mut rec = Recorder::default();
        let outcome = write_csv(&records, &dest, &mut rec);
        assert_eq!(outcome, WriteOutcome::Failed);
        assert!(!dest.exists());
        assert!(rec
            .events
            .iter()
            .any(|e| matches!(e, Event::WriteFailed { .. })));
    }
}
