//! In-memory tables loaded from delimited text files

use clap::ValueEnum;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse as {}", describe_attempts(.0))]
    Unparseable(Vec<(Delimiter, ParseError)>),
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("no header row")]
    Empty,
    #[error("line {line}: expected {expected} fields, found {found}")]
    TooManyFields {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

fn describe_attempts(attempts: &[(Delimiter, ParseError)]) -> String {
    attempts
        .iter()
        .map(|(delimiter, err)| format!("{delimiter}-separated ({err})"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Field separator of a delimited file
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Delimiter {
    Comma,
    Semicolon,
    Tab,
}

impl Delimiter {
    /// Order in which separators are tried when none is given
    pub const FALLBACK_ORDER: [Delimiter; 3] =
        [Delimiter::Comma, Delimiter::Semicolon, Delimiter::Tab];

    pub fn byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
            Delimiter::Tab => b'\t',
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Comma => f.write_str("comma"),
            Delimiter::Semicolon => f.write_str("semicolon"),
            Delimiter::Tab => f.write_str("tab"),
        }
    }
}

/// Position of a column within one table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnRef(pub(crate) usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    /// `None` where a row ended before reaching this column
    pub cells: Vec<Option<String>>,
}

/// Ordered collection of named columns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        let rows = columns.iter().map(|c| c.cells.len()).max().unwrap_or(0);
        Table { columns, rows }
    }

    /// Parse delimited text using one specific separator.
    ///
    /// The first record is the header. Rows shorter than the header leave the
    /// remaining cells missing; a longer row fails the parse.
    pub fn parse(data: &[u8], delimiter: Delimiter) -> Result<Self, ParseError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter.byte())
            .has_headers(true)
            .flexible(true)
            .from_reader(data);

        let headers = rdr.headers()?.clone();
        if headers.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut columns: Vec<Column> = headers
            .iter()
            .map(|name| Column {
                name: name.to_string(),
                cells: Vec::new(),
            })
            .collect();

        for record in rdr.records() {
            let record = record?;
            if record.len() > columns.len() {
                return Err(ParseError::TooManyFields {
                    line: record.position().map_or(0, |p| p.line()),
                    expected: columns.len(),
                    found: record.len(),
                });
            }
            for (i, column) in columns.iter_mut().enumerate() {
                column.cells.push(record.get(i).map(str::to_string));
            }
        }

        Ok(Table::new(columns))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, column: ColumnRef) -> Option<&Column> {
        self.columns.get(column.0)
    }

    pub fn column_name(&self, column: ColumnRef) -> Option<&str> {
        self.column(column).map(|c| c.name.as_str())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Cells of the first `n` rows, row by row; missing cells are empty
    pub fn head(&self, n: usize) -> Vec<Vec<&str>> {
        (0..self.rows.min(n))
            .map(|row| {
                self.columns
                    .iter()
                    .map(|c| c.cells.get(row).and_then(|cell| cell.as_deref()).unwrap_or(""))
                    .collect()
            })
            .collect()
    }
}

/// A table together with the separator that parsed it
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: Table,
    pub delimiter: Delimiter,
}

/// Parse with the first delimiter that succeeds, trying `delimiters` in order
pub fn parse_with_fallback(
    data: &[u8],
    delimiters: &[Delimiter],
) -> Result<LoadedTable, LoadError> {
    let mut failures = Vec::new();
    for &delimiter in delimiters {
        match Table::parse(data, delimiter) {
            Ok(table) => {
                return Ok(LoadedTable { table, delimiter });
            }
            Err(err) => {
                log::debug!("{delimiter}-separated parse failed: {err}");
                failures.push((delimiter, err));
            }
        }
    }
    Err(LoadError::Unparseable(failures))
}

/// Load a file, forcing `delimiter` if given, otherwise using the fallback order
pub fn load(path: &Path, delimiter: Option<Delimiter>) -> Result<LoadedTable, LoadError> {
    let data = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let delimiters = match delimiter {
        Some(d) => vec![d],
        None => Delimiter::FALLBACK_ORDER.to_vec(),
    };
    let loaded = parse_with_fallback(&data, &delimiters)?;
    log::info!(
        "Loaded {}: {} rows, {} columns ({}-separated)",
        path.display(),
        loaded.table.row_count(),
        loaded.table.columns().len(),
        loaded.delimiter
    );
    Ok(loaded)
}
