//! Delimited-text (CSV) reading and writing.
//!
//! A table has a header `time,<name>,...` and one row per timestamp. Cells
//! may be blank, meaning "no sample for this column at this time": reading
//! keeps each column sparse, so a column's series holds only its non-blank
//! cells.
//!
//! Writing several columns produces rows over the union of their
//! timestamps, repeating a timestamp when a column has several points there. In [`WriteMode::Dense`] (the default) absent cells are
//! written as zero, so a sparse table written densely and read back comes out
//! zero-filled rather than sparse. [`WriteMode::Sparse`] leaves them blank.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Timelike, Utc};

use crate::error::{Error, Result};
use crate::series::TimeSeries;
use crate::time::Instant;
use crate::value::Value;

const TIME_HEADER: &str = "time";
const VALUE_HEADER: &str = "value";

/// How absent cells are written by [`CsvFormat::write_columns`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Absent cells are written as zero.
    #[default]
    Dense,
    /// Absent cells are left blank.
    Sparse,
}

/// A named series, one per value column of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column<V> {
    /// Header of the column.
    pub name: String,
    /// Samples of the column, blank cells excluded.
    pub series: TimeSeries<V>,
}

impl<V> Column<V> {
    /// Names a series.
    pub fn new(name: impl Into<String>, series: TimeSeries<V>) -> Column<V> {
        Column {
            name: name.into(),
            series,
        }
    }
}

/// Reader/writer settings.
///
/// # Examples
///
/// ```rust
/// use aligned_timeseries::codec::{CsvFormat, WriteMode};
///
/// let format = CsvFormat::new().delimiter(b';').write_mode(WriteMode::Sparse);
/// let columns = format.read_columns::<f64>("time;a;b\n2024-01-01;1.5;\n2024-01-02;;2\n").unwrap();
///
/// assert_eq!(columns[0].series.len(), 1);
/// assert_eq!(columns[1].series.len(), 1);
/// assert_eq!(
///     format.write_columns(&columns).unwrap(),
///     "time;a;b\n2024-01-01 00:00:00;1.5;\n2024-01-02 00:00:00;;2\n"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvFormat {
    delimiter: u8,
    write_mode: WriteMode,
}

impl Default for CsvFormat {
    fn default() -> Self {
        CsvFormat {
            delimiter: b',',
            write_mode: WriteMode::Dense,
        }
    }
}

impl CsvFormat {
    /// Comma-delimited, dense writes.
    pub fn new() -> CsvFormat {
        CsvFormat::default()
    }

    /// Field separator, `,` by default.
    pub fn delimiter(mut self, delimiter: u8) -> CsvFormat {
        self.delimiter = delimiter;
        self
    }

    /// How [`CsvFormat::write_columns`] writes absent cells.
    pub fn write_mode(mut self, write_mode: WriteMode) -> CsvFormat {
        self.write_mode = write_mode;
        self
    }

    /// Reads every value column of a table into its own sparse series.
    ///
    /// Fails on a header that does not start with `time` or names no value
    /// column, and on any row with the wrong number of fields, an
    /// unrecognised timestamp or an unparseable number.
    pub fn read_columns<V: FromStr>(&self, text: &str) -> Result<Vec<Column<V>>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        let mut fields = headers.iter();
        match fields.next() {
            Some(first) if first.eq_ignore_ascii_case(TIME_HEADER) => {}
            other => {
                return Err(Error::InvalidHeader(format!(
                    "expected leading {:?} column, found {:?}",
                    TIME_HEADER,
                    other.unwrap_or_default()
                )))
            }
        }
        let names: Vec<String> = fields.map(str::to_string).collect();
        if names.is_empty() {
            return Err(Error::InvalidHeader("no value columns".to_string()));
        }

        let mut points: Vec<Vec<(Instant, V)>> = names.iter().map(|_| Vec::new()).collect();
        let mut rows = 0;
        for record in reader.records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line());
            if record.len() != headers.len() {
                return Err(Error::ColumnCount {
                    line,
                    expected: headers.len(),
                    found: record.len(),
                });
            }

            let time = &record[0];
            let t = parse_instant(time).ok_or_else(|| Error::InvalidTimestamp {
                line,
                value: time.to_string(),
            })?;
            for (i, field) in record.iter().skip(1).enumerate() {
                if field.is_empty() {
                    continue;
                }
                let value = field.parse::<V>().map_err(|_| Error::InvalidValue {
                    line,
                    column: names[i].clone(),
                    value: field.to_string(),
                })?;
                points[i].push((t, value));
            }
            rows += 1;
        }

        log::debug!("read {} rows into {} columns", rows, names.len());
        Ok(names
            .into_iter()
            .zip(points)
            .map(|(name, points)| Column::new(name, TimeSeries::from_points(points)))
            .collect())
    }

    /// Reads the first value column of a table.
    pub fn read_series<V: FromStr>(&self, text: &str) -> Result<TimeSeries<V>> {
        let mut columns = self.read_columns(text)?;
        // read_columns guarantees at least one column
        Ok(columns.swap_remove(0).series)
    }

    /// Writes a single series as `time,value`, one row per point in order.
    pub fn write_series<V: Copy + Display>(&self, series: &TimeSeries<V>) -> Result<String> {
        let mut writer = self.writer();
        writer.write_record([TIME_HEADER, VALUE_HEADER])?;
        for (t, v) in series.iter() {
            writer.write_record([format_instant(t), v.to_string()])?;
        }
        finish(writer)
    }

    /// Writes several series side by side over the union of their
    /// timestamps, in time order. Absent cells follow the write mode.
    ///
    /// Every point is written: when a column holds several points at the same
    /// timestamp, the extra ones go on repeated rows for that timestamp.
    pub fn write_columns<V: Value + Display>(&self, columns: &[Column<V>]) -> Result<String> {
        let mut writer = self.writer();
        writer.write_record(
            std::iter::once(TIME_HEADER).chain(columns.iter().map(|c| c.name.as_str())),
        )?;

        let sorted: Vec<TimeSeries<V>> = columns.iter().map(|c| c.series.sort_by_time()).collect();
        let mut cursors = vec![0; sorted.len()];
        let mut rows = 0;

        loop {
            let next = sorted
                .iter()
                .zip(&cursors)
                .filter_map(|(series, &i)| series.index().get(i).copied())
                .min();
            let Some(t) = next else {
                break;
            };

            let mut row = Vec::with_capacity(columns.len() + 1);
            row.push(format_instant(t));
            for (series, cursor) in sorted.iter().zip(cursors.iter_mut()) {
                let cell = match series.index().get(*cursor) {
                    Some(x) if *x == t => {
                        let v = series.values()[*cursor];
                        *cursor += 1;
                        Some(v)
                    }
                    _ => None,
                };
                row.push(match (cell, self.write_mode) {
                    (Some(v), _) => v.to_string(),
                    (None, WriteMode::Dense) => V::zero().to_string(),
                    (None, WriteMode::Sparse) => String::new(),
                });
            }
            writer.write_record(&row)?;
            rows += 1;
        }

        log::debug!("wrote {} rows for {} columns", rows, columns.len());
        finish(writer)
    }

    fn writer(&self) -> csv::Writer<Vec<u8>> {
        csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new())
    }
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Reads all value columns with the default format.
///
/// # Examples
///
/// ```rust
/// use aligned_timeseries::codec;
///
/// let text = "time,a,b\n2024-01-01 00:00:00,1,\n2024-01-01 00:01:00,2,5\n";
/// let columns = codec::read_columns::<i64>(text).unwrap();
///
/// assert_eq!(columns[0].series.values(), &[1, 2]);
/// assert_eq!(columns[1].series.values(), &[5]);
/// ```
pub fn read_columns<V: FromStr>(text: &str) -> Result<Vec<Column<V>>> {
    CsvFormat::default().read_columns(text)
}

/// Reads the first value column with the default format.
pub fn read_series<V: FromStr>(text: &str) -> Result<TimeSeries<V>> {
    CsvFormat::default().read_series(text)
}

/// Writes a single series with the default format.
pub fn write_series<V: Copy + Display>(series: &TimeSeries<V>) -> Result<String> {
    CsvFormat::default().write_series(series)
}

/// Writes several columns densely with the default format.
pub fn write_columns<V: Value + Display>(columns: &[Column<V>]) -> Result<String> {
    CsvFormat::default().write_columns(columns)
}

/// Parses RFC 3339, `YYYY-MM-DD HH:MM:SS[.f]`, `YYYY-MM-DDTHH:MM:SS[.f]`
/// or a bare `YYYY-MM-DD` (midnight). Zoneless forms are taken as UTC.
pub fn parse_instant(text: &str) -> Option<Instant> {
    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Some(t.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    let midnight = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight))
}

/// Formats as `YYYY-MM-DD HH:MM:SS`, or RFC 3339 with nanoseconds when the
/// instant has a fractional second.
pub fn format_instant(t: Instant) -> String {
    if t.nanosecond() == 0 {
        t.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        t.to_rfc3339_opts(SecondsFormat::Nanos, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{instant_from_epoch_seconds, Duration};

    fn at(seconds: i64) -> Instant {
        instant_from_epoch_seconds(seconds).unwrap()
    }

    const SPARSE: &str = "\
time,a,b,c
2024-01-01 00:00:00,1,,3
2024-01-01 00:01:00,,2,
2024-01-01 00:02:00,4,5,
2024-01-01 00:03:00,,7,6
";

    #[test]
    fn sparse_columns_keep_only_defined_cells() {
        let columns = read_columns::<f64>(SPARSE).unwrap();
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);

        let lengths: Vec<usize> = columns.iter().map(|c| c.series.len()).collect();
        assert_eq!(lengths, [2, 3, 2]);
        assert_eq!(columns[1].series.values(), &[2.0, 5.0, 7.0]);
        assert_eq!(
            columns[2].series.index(),
            &[
                parse_instant("2024-01-01 00:00:00").unwrap(),
                parse_instant("2024-01-01 00:03:00").unwrap()
            ]
        );
    }

    #[test]
    fn accepts_several_timestamp_formats() {
        let expected = parse_instant("2024-03-05T00:00:00Z").unwrap();
        assert_eq!(parse_instant("2024-03-05"), Some(expected));
        assert_eq!(parse_instant("2024-03-05 00:00:00"), Some(expected));
        assert_eq!(parse_instant("2024-03-05T00:00:00"), Some(expected));
        assert_eq!(parse_instant("2024-03-05T01:00:00+01:00"), Some(expected));
        assert_eq!(
            parse_instant("2024-03-05 00:00:00.250"),
            Some(expected + Duration::milliseconds(250))
        );
        assert_eq!(parse_instant("05/03/2024"), None);
    }

    #[test]
    fn dense_single_series_round_trip() {
        let ts = TimeSeries::from_epoch_seconds(vec![(0, 1.5), (60, -2.0), (61, 0.1), (3_600, 7.0)])
            .unwrap();
        let text = write_series(&ts).unwrap();
        assert!(text.starts_with("time,value\n1970-01-01 00:00:00,1.5\n"));
        assert_eq!(read_series::<f64>(&text).unwrap(), ts);
    }

    #[test]
    fn round_trip_keeps_sub_second_timestamps() {
        let t = at(10) + Duration::nanoseconds(123_456_789);
        let ts = TimeSeries::from_points(vec![(at(10), 1i64), (t, 2)]);
        let text = write_series(&ts).unwrap();
        assert_eq!(read_series::<i64>(&text).unwrap(), ts);
    }

    #[test]
    fn dense_write_fills_gaps_with_zero() {
        let columns = read_columns::<i32>(SPARSE).unwrap();
        let text = write_columns(&columns).unwrap();
        assert_eq!(
            text,
            "\
time,a,b,c
2024-01-01 00:00:00,1,0,3
2024-01-01 00:01:00,0,2,0
2024-01-01 00:02:00,4,5,0
2024-01-01 00:03:00,0,7,6
"
        );

        // reading back densifies every column
        let reread = read_columns::<i32>(&text).unwrap();
        assert!(reread.iter().all(|c| c.series.len() == 4));
        assert_ne!(reread, columns);
    }

    #[test]
    fn sparse_write_round_trips() {
        let columns = read_columns::<i32>(SPARSE).unwrap();
        let format = CsvFormat::new().write_mode(WriteMode::Sparse);
        let text = format.write_columns(&columns).unwrap();
        assert_eq!(read_columns::<i32>(&text).unwrap(), columns);
    }

    #[test]
    fn write_columns_orders_union_of_timestamps() {
        let a = TimeSeries::from_epoch_seconds(vec![(2, 1), (0, 2)]).unwrap();
        let b = TimeSeries::from_epoch_seconds(vec![(1, 3)]).unwrap();
        let text = write_columns(&[Column::new("a", a), Column::new("b", b)]).unwrap();
        assert_eq!(
            text,
            "time,a,b\n\
             1970-01-01 00:00:00,2,0\n\
             1970-01-01 00:00:01,0,3\n\
             1970-01-01 00:00:02,1,0\n"
        );
    }

    #[test]
    fn write_columns_keeps_repeated_timestamps() {
        let ts = TimeSeries::from_epoch_seconds(vec![(5, 1), (5, 2), (6, 3)]).unwrap();
        let text = write_columns(&[Column::new("value", ts.clone())]).unwrap();
        assert_eq!(
            text,
            "time,value\n\
             1970-01-01 00:00:05,1\n\
             1970-01-01 00:00:05,2\n\
             1970-01-01 00:00:06,3\n"
        );
        assert_eq!(read_series::<i32>(&text).unwrap(), ts);
    }

    #[test]
    fn write_columns_pairs_repeats_across_columns() {
        let a = TimeSeries::from_epoch_seconds(vec![(5, 1), (5, 2)]).unwrap();
        let b = TimeSeries::from_epoch_seconds(vec![(5, 9), (7, 8)]).unwrap();
        let format = CsvFormat::new().write_mode(WriteMode::Sparse);
        let columns = [Column::new("a", a), Column::new("b", b)];
        let text = format.write_columns(&columns).unwrap();
        assert_eq!(
            text,
            "time,a,b\n\
             1970-01-01 00:00:05,1,9\n\
             1970-01-01 00:00:05,2,\n\
             1970-01-01 00:00:07,,8\n"
        );
        assert_eq!(read_columns::<i32>(&text).unwrap(), columns);
    }

    #[test]
    fn rejects_wrong_field_count() {
        let text = "time,a,b\n2024-01-01,1,2\n2024-01-02,1\n";
        match read_columns::<f64>(text) {
            Err(Error::ColumnCount {
                line,
                expected,
                found,
            }) => {
                assert_eq!((line, expected, found), (3, 3, 2));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rejects_bad_timestamp() {
        let text = "time,value\nnot-a-date,1\n";
        assert!(matches!(
            read_series::<f64>(text),
            Err(Error::InvalidTimestamp { line: 2, .. })
        ));
    }

    #[test]
    fn rejects_bad_number() {
        let text = "time,value\n2024-01-01,1\n2024-01-02,one\n";
        match read_series::<f64>(text) {
            Err(Error::InvalidValue { line, column, value }) => {
                assert_eq!(line, 3);
                assert_eq!(column, "value");
                assert_eq!(value, "one");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rejects_bad_header() {
        assert!(matches!(
            read_series::<f64>("date,value\n2024-01-01,1\n"),
            Err(Error::InvalidHeader(_))
        ));
        assert!(matches!(
            read_series::<f64>("time\n2024-01-01\n"),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn header_only_is_empty() {
        let ts = read_series::<f64>("time,value\n").unwrap();
        assert!(ts.is_empty());
    }

    #[test]
    fn custom_delimiter() {
        let format = CsvFormat::new().delimiter(b'\t');
        let ts = format.read_series::<u32>("time\tvalue\n1970-01-01 00:00:05\t9\n").unwrap();
        assert_eq!(ts.head(), Some((at(5), 9)));
        assert_eq!(
            format.write_series(&ts).unwrap(),
            "time\tvalue\n1970-01-01 00:00:05\t9\n"
        );
    }
}
