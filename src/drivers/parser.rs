//! Conversion of raw serial lines into [`Measurement`] values.
//!
//! A line looks like `"<start_time>,<end_time>,<volt_1>,...,<volt_n>\r\n"`.
//! Line numbers in errors are 1-based positions in the input sequence.
use std::str::FromStr;
use crate::drivers::MeasureError;
use crate::types::{Measurement, MeasurementSet};
/// Smallest number of comma separated fields that still carries one sample.
pub const MIN_FIELDS: usize = 3;
/// Parses every line in order. Fails on the first malformed line; an empty
/// input gives an empty set.
pub fn parse_lines<I, S>(lines: I) -> Result<MeasurementSet, MeasureError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .enumerate()
        .map(|(idx, line)| parse_line(idx + 1, line.as_ref()))
        .collect()
}
pub fn parse_line(line_number: usize, raw: &str) -> Result<Measurement, MeasureError> {
    let line = raw.trim_end_matches(['\r', '\n']);
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < MIN_FIELDS {
        return Err(MeasureError::InsufficientFields {
            line_number,
            line: line.to_owned(),
            found: fields.len(),
        });
    }
    let start_time: i64 = parse_field(line_number, line, "start_time", fields[0])?;
    let end_time: i64 = parse_field(line_number, line, "end_time", fields[1])?;
    if end_time < start_time {
        return Err(MeasureError::Parse {
            line_number,
            line: line.to_owned(),
            field: "end_time".into(),
            reason: format!("{end_time} precedes start_time {start_time}"),
        });
    }
    let voltages = fields[2..]
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let name = format!("voltage {}", idx + 1);
            let value: f64 = parse_field(line_number, line, &name, field)?;
            if value.is_finite() {
                Ok(value)
            } else {
                Err(MeasureError::Parse {
                    line_number,
                    line: line.to_owned(),
                    field: name,
                    reason: format!("{value} is not a finite number"),
                })
            }
        })
        .collect::<Result<Vec<f64>, _>>()?;
    Ok(Measurement::new(start_time, end_time, voltages))
}
fn parse_field<T>(line_number: usize, line: &str, name: &str, raw: &str) -> Result<T, MeasureError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|err| MeasureError::Parse {
        line_number,
        line: line.to_owned(),
        field: name.to_owned(),
        reason: format!("{err} ({raw:?})"),
    })
}
