//! File emitters.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use super::document::CardsDocument;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("refusing to overwrite existing file without --force: {0}")]
    Exists(PathBuf),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Overwrite and directory policy for one write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Create missing parent directories.
    pub mkdirs: bool,
    /// Replace an existing file.
    pub overwrite: bool,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> OutputError + '_ {
    move |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn prepare(path: &Path, options: WriteOptions) -> Result<(), OutputError> {
    if path.exists() && !options.overwrite {
        return Err(OutputError::Exists(path.to_path_buf()));
    }
    if options.mkdirs {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
    }
    Ok(())
}

/// Write `value` as pretty JSON followed by a newline.
pub fn write_json<T: Serialize>(
    path: &Path,
    value: &T,
    options: WriteOptions,
) -> Result<(), OutputError> {
    prepare(path, options)?;
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    fs::write(path, text).map_err(io_error(path))
}

/// Per-number totals, then per-position counts when given.
///
/// Two sections: `number,total` rows in ascending number order, then a
/// blank line and `position,number,count` rows in ascending position-key
/// order.
pub fn write_summary_csv(
    path: &Path,
    frequencies: &BTreeMap<u32, u64>,
    by_position: Option<&BTreeMap<String, BTreeMap<u32, u64>>>,
    options: WriteOptions,
) -> Result<(), OutputError> {
    prepare(path, options)?;
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)?;

    writer.write_record(["number", "total"])?;
    for (number, total) in frequencies {
        writer.write_record([number.to_string(), total.to_string()])?;
    }

    if let Some(by_position) = by_position {
        writer.flush().map_err(io_error(path))?;
        { let mut file: &fs::File = writer.get_ref(); file.write_all(b"\n") }.map_err(io_error(path))?;
        writer.write_record(["position", "number", "count"])?;
        for (position, counts) in by_position {
            for (number, count) in counts {
                writer.write_record([position.clone(), number.to_string(), count.to_string()])?;
            }
        }
    }

    writer.flush().map_err(io_error(path))
}

/// Load a cards document emitted by a previous run.
pub fn read_cards_document(path: &Path) -> Result<CardsDocument, OutputError> {
    let text = fs::read_to_string(path).map_err(io_error(path))?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_json_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");

        write_json(&path, &vec![1, 2], WriteOptions::default()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[\n  1,\n  2\n]\n");

        let err = write_json(&path, &vec![3], WriteOptions::default()).unwrap_err();
        assert!(matches!(err, OutputError::Exists(_)));

        let force = WriteOptions {
            overwrite: true,
            ..WriteOptions::default()
        };
        write_json(&path, &vec![3], force).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains('3'));
    }

    #[test]
    fn test_mkdirs_creates_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("out.json");

        let err = write_json(&path, &1, WriteOptions::default()).unwrap_err();
        assert!(matches!(err, OutputError::Io { .. }));

        let mkdirs = WriteOptions {
            mkdirs: true,
            ..WriteOptions::default()
        };
        write_json(&path, &1, mkdirs).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_summary_csv_sections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let freqs: BTreeMap<u32, u64> = [(1, 2), (2, 0)].into_iter().collect();
        let mut by_position = BTreeMap::new();
        by_position.insert("(0,0)".to_string(), freqs.clone());

        write_summary_csv(&path, &freqs, Some(&by_position), WriteOptions::default()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "number,total",
                "1,2",
                "2,0",
                "",
                "position,number,count",
                "\"(0,0)\",1,2",
                "\"(0,0)\",2,0",
            ]
        );
    }

    #[test]
    fn test_summary_csv_totals_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("totals.csv");
        let freqs: BTreeMap<u32, u64> = [(1, 1)].into_iter().collect();

        write_summary_csv(&path, &freqs, None, WriteOptions::default()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().collect::<Vec<_>>(), vec!["number,total", "1,1"]);
    }
}
