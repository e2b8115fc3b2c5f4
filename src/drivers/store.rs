//! JSON persistence of a [`MeasurementSet`].
//!
//! On disk the set is one object keyed by `"measurement N"`; each value is
//! `{"start time": int, "end_time": int, "voltages": [float, ...]}`. The mixed
//! spelling of the two time fields is part of the file format and is kept
//! as is so existing output files stay readable.
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use crate::drivers::MeasureError;
use crate::types::{Measurement, MeasurementSet};
pub const FIELD_START_TIME: &str = "start time";
pub const FIELD_END_TIME: &str = "end_time";
pub const FIELD_VOLTAGES: &str = "voltages";
#[derive(Serialize)]
struct MeasurementRecord<'a> {
    #[serde(rename = "start time")]
    start_time: i64,
    end_time: i64,
    voltages: &'a [f64],
}
impl<'a> From<&'a Measurement> for MeasurementRecord<'a> {
    fn from(m: &'a Measurement) -> Self {
        Self {
            start_time: m.start_time,
            end_time: m.end_time,
            voltages: &m.voltages,
        }
    }
}
/// Writes `set` to `path`, replacing any existing file. Missing parent
/// directories are created.
pub fn save(set: &MeasurementSet, path: &Path) -> Result<(), MeasureError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut document = Map::new();
    for (label, measurement) in set.iter() {
        let record = serde_json::to_value(MeasurementRecord::from(measurement))
            .map_err(|err| MeasureError::Io(err.into()))?;
        document.insert(label, record);
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &document).map_err(|err| MeasureError::Io(err.into()))?;
    writer.flush()?;
    info!("saved {} measurement(s) to {}", set.len(), path.display());
    Ok(())
}
/// Reads a set back in file order. The whole file must be valid; there is no
/// partial result.
pub fn load(path: &Path) -> Result<MeasurementSet, MeasureError> {
    let format_error = |reason: String| MeasureError::FileFormat {
        path: path.to_path_buf(),
        reason,
    };
    let text = fs::read_to_string(path).map_err(|err| format_error(err.to_string()))?;
    let document: Value = serde_json::from_str(&text).map_err(|err| format_error(err.to_string()))?;
    let Value::Object(entries) = document else {
        return Err(format_error("top level is not a JSON object".into()));
    };
    let mut set = MeasurementSet::new();
    for (label, record) in entries {
        let measurement = measurement_from_record(path, &label, &record)?;
        let assigned = set.push(measurement);
        if assigned != label {
            warn!("{}: entry {label:?} loaded as {assigned:?}", path.display());
        }
    }
    debug!("loaded {} measurement(s) from {}", set.len(), path.display());
    Ok(set)
}
fn measurement_from_record(
    path: &Path,
    label: &str,
    record: &Value,
) -> Result<Measurement, MeasureError> {
    let schema_error = |field: &str, reason: String| MeasureError::Schema {
        path: path.to_path_buf(),
        label: label.to_owned(),
        field: field.to_owned(),
        reason,
    };
    let Some(fields) = record.as_object() else {
        return Err(schema_error("*", "record is not a JSON object".into()));
    };
    let start_time: i64 = required_field(fields, FIELD_START_TIME, &schema_error)?;
    let end_time: i64 = required_field(fields, FIELD_END_TIME, &schema_error)?;
    let voltages: Vec<f64> = required_field(fields, FIELD_VOLTAGES, &schema_error)?;
    if voltages.is_empty() {
        return Err(schema_error(FIELD_VOLTAGES, "no samples".into()));
    }
    Ok(Measurement::new(start_time, end_time, voltages))
}
fn required_field<T, F>(fields: &Map<String, Value>, name: &str, schema_error: &F) -> Result<T, MeasureError>
where
    T: DeserializeOwned,
    F: Fn(&str, String) -> MeasureError,
{
    let value = fields
        .get(name)
        .ok_or_else(|| schema_error(name, "missing required field".into()))?;
    T::deserialize(value).map_err(|err| schema_error(name, err.to_string()))
}
#[cfg(test)]
mod tests {
    use super::*;
    fn sample_set() -> MeasurementSet {
        [
            Measurement::new(1000, 2000, vec![0.0, 1.5, 2.25]),
            Measurement::new(3000, 3100, vec![4.98]),
            Measurement::new(3100, 3300, vec![0.1, -0.2]),
        ]
        .into_iter()
        .collect()
    }
    #[test]
    fn save_then_load_reproduces_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out").join("output.json");
        let set = sample_set();
        save(&set, &path).unwrap();
        assert_eq!(load(&path).unwrap(), set);
    }
    #[test]
    fn order_survives_more_than_nine_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");
        let set: MeasurementSet = (0..12)
            .map(|i| Measurement::new(i * 100, i * 100 + 50, vec![i as f64]))
            .collect();
        save(&set, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let ninth = text.find("\"measurement 9\"").unwrap();
        let tenth = text.find("\"measurement 10\"").unwrap();
        assert!(ninth < tenth);
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, set);
        assert_eq!(loaded.get(10).unwrap().start_time, 900);
    }
    #[test]
    fn load_follows_file_order_not_key_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shuffled.json");
        fs::write(
            &path,
            r#"{"measurement 2": {"start time": 5, "end_time": 6, "voltages": [2.0]},
                "measurement 1": {"start time": 1, "end_time": 2, "voltages": [1.0]}}"#,
        )
        .unwrap();
        let set = load(&path).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(1).unwrap().start_time, 5);
        assert_eq!(set.get(2).unwrap().start_time, 1);
    }
    #[test]
    fn file_uses_legacy_field_names_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");
        save(&sample_set(), &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(r#"{"measurement 1":{"start time":1000,"end_time":2000,"voltages":[0.0,1.5,2.25]}"#));
        let first = text.find("measurement 1").unwrap();
        let second = text.find("measurement 2").unwrap();
        let third = text.find("measurement 3").unwrap();
        assert!(first < second && second < third);
    }
    #[test]
    fn save_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");
        save(&sample_set(), &path).unwrap();
        let smaller: MeasurementSet = [Measurement::new(5, 6, vec![1.0])].into_iter().collect();
        save(&smaller, &path).unwrap();
        assert_eq!(load(&path).unwrap(), smaller);
    }
    #[test]
    fn missing_file_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, MeasureError::FileFormat { .. }));
    }
    #[test]
    fn invalid_json_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{\"measurement 1\": ").unwrap();
        assert!(matches!(load(&path).unwrap_err(), MeasureError::FileFormat { .. }));
        fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(matches!(load(&path).unwrap_err(), MeasureError::FileFormat { .. }));
    }
    #[test]
    fn missing_field_is_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        // Underscore spelling of the start field does not count.
        fs::write(
            &path,
            r#"{"measurement 1": {"start_time": 0, "end_time": 10, "voltages": [1.0]}}"#,
        )
        .unwrap();
        match load(&path).unwrap_err() {
            MeasureError::Schema { label, field, .. } => {
                assert_eq!(label, "measurement 1");
                assert_eq!(field, FIELD_START_TIME);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
    #[test]
    fn wrong_type_is_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typed.json");
        fs::write(
            &path,
            r#"{"measurement 1": {"start time": 0, "end_time": 10, "voltages": ["a"]}}"#,
        )
        .unwrap();
        assert!(matches!(
            load(&path).unwrap_err(),
            MeasureError::Schema { ref field, .. } if field == FIELD_VOLTAGES
        ));
    }
    #[test]
    fn empty_object_loads_as_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        save(&MeasurementSet::new(), &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
        assert!(load(&path).unwrap().is_empty());
    }
}
