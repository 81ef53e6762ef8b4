//! Uploaded-file dataset source with extension-based format dispatch.
//!
//! Two formats are accepted: `.csv` (delimited text) and `.xlsx` (binary
//! spreadsheet container, first sheet, first row as headers). Anything else
//! is rejected before any I/O happens. Required columns are validated
//! against the canonical schema before rows are parsed, and a malformed
//! cell aborts the load with the offending row number.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, Xlsx, open_workbook};
use gapview_core::model::{Record, Table, columns};
use gapview_core::ports::{DatasetSource, SourceError};
use tracing::debug;

/// Supported on-disk formats, decided by file extension.
#[derive(Debug, Clone, Copy)]
enum Format {
    Csv,
    Xlsx,
}

/// Dataset source backed by a user-supplied file.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    label: String,
    format: Format,
}

impl FileSource {
    /// Bind a source to the given path, dispatching on its extension.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::UnsupportedFormat`] when the extension is
    /// neither `.csv` nor `.xlsx`. The file itself is not touched yet.
    pub fn new<P: Into<PathBuf>>(path: P) -> Result<Self, SourceError> {
        let path = path.into();

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);

        let format = match extension.as_deref() {
            Some("csv") => Format::Csv,
            Some("xlsx") => Format::Xlsx,
            _ => return Err(SourceError::UnsupportedFormat(path.display().to_string())),
        };

        let label = format!("file: {}", path.display());
        Ok(Self {
            path,
            label,
            format,
        })
    }
}

impl DatasetSource for FileSource {
    fn describe(&self) -> &str {
        &self.label
    }

    fn load(&self) -> Result<Table, SourceError> {
        let table = match self.format {
            Format::Csv => load_csv(&self.path),
            Format::Xlsx => load_xlsx(&self.path),
        }?;
        debug!(path = %self.path.display(), rows = table.len(), "parsed upload");
        Ok(table)
    }
}

/// Positions of the required columns within a header row.
struct ColumnIndex {
    country: usize,
    continent: usize,
    year: usize,
    population: usize,
    gdp_per_capita: usize,
    life_expectancy: usize,
}

impl ColumnIndex {
    /// Resolve the required columns, accepting canonical names and the raw
    /// abbreviated aliases. The first occurrence of a column wins.
    fn resolve<'h, I>(headers: I) -> Result<Self, SourceError>
    where
        I: Iterator<Item = &'h str>,
    {
        let mut positions: HashMap<&'static str, usize> = HashMap::new();
        for (idx, header) in headers.enumerate() {
            if let Some(name) = columns::canonical(header) {
                positions.entry(name).or_insert(idx);
            }
        }

        let find = |name: &'static str| {
            positions
                .get(name)
                .copied()
                .ok_or(SourceError::MissingColumn(name))
        };

        Ok(Self {
            country: find(columns::COUNTRY)?,
            continent: find(columns::CONTINENT)?,
            year: find(columns::YEAR)?,
            population: find(columns::POPULATION)?,
            gdp_per_capita: find(columns::GDP_PER_CAPITA)?,
            life_expectancy: find(columns::LIFE_EXPECTANCY)?,
        })
    }
}

fn load_csv(path: &Path) -> Result<Table, SourceError> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers()?.clone();
    let index = ColumnIndex::resolve(headers.iter())?;

    let mut rows = Vec::new();
    for (offset, result) in reader.records().enumerate() {
        let record = result?;
        let row = offset + 1;
        rows.push(Record {
            country: text_field(row, columns::COUNTRY, record.get(index.country))?,
            continent: text_field(row, columns::CONTINENT, record.get(index.continent))?,
            year: year_field(row, record.get(index.year))?,
            population: numeric_field(row, columns::POPULATION, record.get(index.population))?,
            gdp_per_capita: numeric_field(
                row,
                columns::GDP_PER_CAPITA,
                record.get(index.gdp_per_capita),
            )?,
            life_expectancy: numeric_field(
                row,
                columns::LIFE_EXPECTANCY,
                record.get(index.life_expectancy),
            )?,
        });
    }

    Ok(Table::new(rows))
}

fn load_xlsx(path: &Path) -> Result<Table, SourceError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| malformed(0, "workbook has no sheets"))??;

    let mut sheet_rows = range.rows();
    let Some(header_cells) = sheet_rows.next() else {
        return Err(malformed(0, "sheet has no header row"));
    };

    let headers: Vec<String> = header_cells.iter().map(ToString::to_string).collect();
    let index = ColumnIndex::resolve(headers.iter().map(String::as_str))?;

    let mut rows = Vec::new();
    for (offset, cells) in sheet_rows.enumerate() {
        let row = offset + 1;
        rows.push(Record {
            country: text_cell(row, columns::COUNTRY, cells.get(index.country))?,
            continent: text_cell(row, columns::CONTINENT, cells.get(index.continent))?,
            year: year_cell(row, cells.get(index.year))?,
            population: numeric_cell(row, columns::POPULATION, cells.get(index.population))?,
            gdp_per_capita: numeric_cell(
                row,
                columns::GDP_PER_CAPITA,
                cells.get(index.gdp_per_capita),
            )?,
            life_expectancy: numeric_cell(
                row,
                columns::LIFE_EXPECTANCY,
                cells.get(index.life_expectancy),
            )?,
        });
    }

    Ok(Table::new(rows))
}

fn malformed<M: Into<String>>(row: usize, message: M) -> SourceError {
    SourceError::MalformedRow {
        row,
        message: message.into(),
    }
}

fn text_field(row: usize, column: &'static str, value: Option<&str>) -> Result<String, SourceError> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_owned()),
        _ => Err(malformed(row, format!("missing value in '{column}'"))),
    }
}

fn numeric_field(row: usize, column: &'static str, value: Option<&str>) -> Result<f64, SourceError> {
    let text = text_field(row, column, value)?;
    text.parse::<f64>()
        .map_err(|_parse| malformed(row, format!("'{text}' in '{column}' is not a number")))
}

fn year_field(row: usize, value: Option<&str>) -> Result<i32, SourceError> {
    let text = text_field(row, columns::YEAR, value)?;
    text.parse::<i32>()
        .map_err(|_parse| malformed(row, format!("'{text}' is not a valid year")))
}

fn text_cell(row: usize, column: &'static str, cell: Option<&Data>) -> Result<String, SourceError> {
    match cell {
        Some(Data::String(text)) if !text.trim().is_empty() => Ok(text.trim().to_owned()),
        _ => Err(malformed(row, format!("missing value in '{column}'"))),
    }
}

#[allow(clippy::cast_precision_loss, reason = "measure magnitudes fit f64")]
fn numeric_cell(row: usize, column: &'static str, cell: Option<&Data>) -> Result<f64, SourceError> {
    match cell {
        Some(Data::Float(value)) => Ok(*value),
        Some(Data::Int(value)) => Ok(*value as f64),
        Some(Data::String(text)) if !text.trim().is_empty() => text
            .trim()
            .parse::<f64>()
            .map_err(|_parse| malformed(row, format!("'{text}' in '{column}' is not a number"))),
        _ => Err(malformed(row, format!("missing numeric value in '{column}'"))),
    }
}

#[allow(clippy::cast_possible_truncation, reason = "years are small integers")]
fn year_cell(row: usize, cell: Option<&Data>) -> Result<i32, SourceError> {
    let value = numeric_cell(row, columns::YEAR, cell)?;
    Ok(value as i32)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_csv(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn rejects_unsupported_extensions_before_io() {
        let err = FileSource::new("upload.json").unwrap_err();
        assert!(matches!(err, SourceError::UnsupportedFormat(_)));

        let err = FileSource::new("no_extension").unwrap_err();
        assert!(matches!(err, SourceError::UnsupportedFormat(_)));
    }

    #[test]
    fn accepts_both_supported_extensions() {
        assert!(FileSource::new("data.csv").is_ok());
        assert!(FileSource::new("Data.XLSX").is_ok());
    }

    #[test]
    fn parses_a_canonical_csv_upload() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "upload.csv",
            "country,continent,year,population,gdp_per_capita,life_expectancy\n\
             A,X,2000,10,100,50\n\
             B,X,2000,20,300,70\n",
        );

        let table = FileSource::new(path).unwrap().load().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1].country, "B");
        assert!((table.rows()[1].gdp_per_capita - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn accepts_raw_abbreviated_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "raw.csv",
            "country,continent,year,lifeExp,pop,gdpPercap\n\
             A,X,1952,50,1000,120.5\n",
        );

        let table = FileSource::new(path).unwrap().load().unwrap();
        assert_eq!(table.len(), 1);
        assert!((table.rows()[0].life_expectancy - 50.0).abs() < f64::EPSILON);
        assert!((table.rows()[0].population - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_column_fails_before_row_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "short.csv",
            "country,year,population,gdp_per_capita,life_expectancy\n\
             A,2000,10,100,50\n",
        );

        let err = FileSource::new(path).unwrap().load().unwrap_err();
        assert!(matches!(err, SourceError::MissingColumn("continent")));
    }

    #[test]
    fn malformed_measure_reports_the_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "bad.csv",
            "country,continent,year,population,gdp_per_capita,life_expectancy\n\
             A,X,2000,10,100,50\n\
             B,X,2000,not-a-number,300,70\n",
        );

        let err = FileSource::new(path).unwrap().load().unwrap_err();
        match err {
            SourceError::MalformedRow { row, message } => {
                assert_eq!(row, 2);
                assert!(message.contains("population"), "{message}");
            }
            other => panic!("expected MalformedRow, got {other}"),
        }
    }

    #[test]
    fn absent_measure_is_an_error_not_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "hole.csv",
            "country,continent,year,population,gdp_per_capita,life_expectancy\n\
             A,X,2000,,100,50\n",
        );

        let err = FileSource::new(path).unwrap().load().unwrap_err();
        assert!(matches!(err, SourceError::MalformedRow { row: 1, .. }));
    }

    #[test]
    fn unreadable_spreadsheet_surfaces_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "fake.xlsx", "this is not a zip container");

        let err = FileSource::new(path).unwrap().load().unwrap_err();
        assert!(matches!(
            err,
            SourceError::Spreadsheet(_) | SourceError::Io(_)
        ));
    }
}
