use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

pub const DEFAULT_SKIP_ROWS: usize = 2;

// Empty cells are not stored, so `get` treats them like a missing column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatRow {
    cells: HashMap<String, String>,
}

impl StatRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut row = Self::new();
        for (column, value) in pairs {
            row.insert(column, value);
        }
        row
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return;
        }
        self.cells.insert(column.into(), trimmed.to_string());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RowSourceError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to read preamble: {0}")]
    Preamble(#[source] std::io::Error),

    #[error("failed to read header row: {0}")]
    Header(#[source] csv::Error),

    #[error("no header row after skipping {skipped} preamble rows")]
    MissingHeader { skipped: usize },

    #[error("row {index}: {source}")]
    Record { index: usize, source: csv::Error },
}

pub struct RowSource<R> {
    reader: csv::Reader<BufReader<R>>,
    headers: Vec<String>,
    record: StringRecord,
    index: usize,
    done: bool,
}

impl RowSource<File> {
    pub fn from_path(path: &Path, skip_rows: usize) -> Result<Self, RowSourceError> {
        let file = File::open(path).map_err(|source| RowSourceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file, skip_rows)
    }
}

impl<R: Read> RowSource<R> {
    pub fn from_reader(rdr: R, skip_rows: usize) -> Result<Self, RowSourceError> {
        let mut input = BufReader::new(rdr);
        skip_lines(&mut input, skip_rows)?;

        // The csv reader drops empty lines, so the preamble is skipped by
        // physical line before it takes over.
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(input);

        let mut record = StringRecord::new();
        let has_header = reader
            .read_record(&mut record)
            .map_err(RowSourceError::Header)?;
        if !has_header {
            return Err(RowSourceError::MissingHeader { skipped: skip_rows });
        }

        Ok(Self {
            reader,
            headers: dedupe_headers(record.iter()),
            record: StringRecord::new(),
            index: 0,
            done: false,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    fn current_row(&self) -> StatRow {
        let mut row = StatRow::new();
        for (column, value) in self.headers.iter().zip(self.record.iter()) {
            row.insert(column.as_str(), value);
        }
        row
    }
}

impl<R: Read> Iterator for RowSource<R> {
    type Item = Result<(usize, StatRow), RowSourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let index = self.index;
            match self.reader.read_record(&mut self.record) {
                Ok(false) => self.done = true,
                Ok(true) => {
                    self.index += 1;
                    if self.record.iter().all(str::is_empty) {
                        continue;
                    }
                    return Some(Ok((index, self.current_row())));
                }
                Err(source) => {
                    self.index += 1;
                    // An I/O failure leaves the reader in an unknown position.
                    if source.is_io_error() {
                        self.done = true;
                    }
                    return Some(Err(RowSourceError::Record { index, source }));
                }
            }
        }
        None
    }
}

fn skip_lines<R: BufRead>(input: &mut R, count: usize) -> Result<(), RowSourceError> {
    let mut line = Vec::new();
    for _ in 0..count {
        line.clear();
        let read = input
            .read_until(b'\n', &mut line)
            .map_err(RowSourceError::Preamble)?;
        if read == 0 {
            return Err(RowSourceError::MissingHeader { skipped: count });
        }
    }
    Ok(())
}

/// Repeated column names get `.1`, `.2`, ... suffixes in order of appearance,
/// so three `Pass` columns read as `Pass`, `Pass.1`, `Pass.2`.
pub fn dedupe_headers<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut next_suffix: HashMap<String, usize> = HashMap::new();
    let mut taken: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for name in names {
        let base = name.trim().to_string();
        let mut n = next_suffix.get(&base).copied().unwrap_or(0);
        let mut label = if n == 0 {
            base.clone()
        } else {
            format!("{base}.{n}")
        };
        while taken.contains(&label) {
            n += 1;
            label = format!("{base}.{n}");
        }
        next_suffix.insert(base, n + 1);
        taken.insert(label.clone());
        out.push(label);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{RowSource, RowSourceError, StatRow, dedupe_headers};

    #[test]
    fn dedupe_headers_suffixes_repeats() {
        let headers = dedupe_headers(["Player", "Pass", "Pass", "Pass", "Rec", "Rec"]);
        assert_eq!(
            headers,
            vec!["Player", "Pass", "Pass.1", "Pass.2", "Rec", "Rec.1"]
        );
    }

    #[test]
    fn dedupe_headers_skips_existing_suffix() {
        let headers = dedupe_headers(["A", "A.1", "A"]);
        assert_eq!(headers, vec!["A", "A.1", "A.2"]);
    }

    #[test]
    fn empty_cells_are_absent() {
        let row = StatRow::from_pairs([("Player", "J. Doe"), ("TGT", "  ")]);
        assert_eq!(row.get("Player"), Some("J. Doe"));
        assert_eq!(row.get("TGT"), None);
        assert_eq!(row.len(), 1);
    }

    #[test]
    fn short_file_reports_missing_header() {
        let err = RowSource::from_reader("only one line\n".as_bytes(), 2)
            .err()
            .expect("should fail");
        assert!(matches!(err, RowSourceError::MissingHeader { skipped: 2 }));
    }

    #[test]
    fn blank_records_are_skipped_but_counted() {
        let raw = "Player,Team\nA,KC\n,\nB,SF\n";
        let rows = RowSource::from_reader(raw.as_bytes(), 0)
            .expect("header")
            .collect::<Result<Vec<_>, _>>()
            .expect("rows");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, 0);
        assert_eq!(rows[1].0, 2);
        assert_eq!(rows[1].1.get("Player"), Some("B"));
    }

    #[test]
    fn preamble_is_skipped_by_physical_line() {
        let raw = "2024 Season Player Stats\n\nPlayer,Team,SZN,Week\nJ. Doe,KC,2024,1\n";
        let source = RowSource::from_reader(raw.as_bytes(), 2).expect("header");
        assert_eq!(source.headers().to_vec(), vec!["Player", "Team", "SZN", "Week"]);

        let rows = source.collect::<Result<Vec<_>, _>>().expect("rows");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, 0);
        assert_eq!(rows[0].1.get("Player"), Some("J. Doe"));
        assert_eq!(rows[0].1.get("Week"), Some("1"));
    }

    #[test]
    fn preamble_of_blank_lines_only() {
        let raw = "\n\nPlayer,Team\nA,KC\n";
        let source = RowSource::from_reader(raw.as_bytes(), 2).expect("header");
        assert_eq!(source.headers().to_vec(), vec!["Player", "Team"]);
    }
}
