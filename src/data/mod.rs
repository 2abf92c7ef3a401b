use std::path::Path;

use thiserror::Error;

use crate::model::{Record, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Yaml,
    Csv,
}

impl DataFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yml" | "yaml" => Some(Self::Yaml),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("unsupported data file extension: {path} (expected .json, .yaml, .yml or .csv)")]
    UnknownFormat { path: String },

    #[error("failed to read data file: {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid json in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid yaml in {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid csv in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

pub fn parse_csv(contents: &str) -> Result<Vec<Record>, csv::Error> {
    let mut reader = csv::Reader::from_reader(contents.as_bytes());
    let headers = reader.headers()?.clone();
    let mut out = Vec::new();
    for row in reader.records() {
        let row = row?;
        out.push(
            headers
                .iter()
                .zip(row.iter())
                .map(|(h, cell)| (h.to_string(), Value::from_cell(cell)))
                .collect(),
        );
    }
    Ok(out)
}

pub fn load_records(path: &Path) -> Result<Vec<Record>, DataError> {
    let display = path.display().to_string();
    let format = DataFormat::from_path(path).ok_or_else(|| DataError::UnknownFormat {
        path: display.clone(),
    })?;
    let contents = std::fs::read_to_string(path).map_err(|source| DataError::Read {
        path: display.clone(),
        source,
    })?;
    match format {
        DataFormat::Json => serde_json::from_str(&contents).map_err(|source| DataError::Json {
            path: display,
            source,
        }),
        DataFormat::Yaml => serde_yaml::from_str(&contents).map_err(|source| DataError::Yaml {
            path: display,
            source,
        }),
        DataFormat::Csv => parse_csv(&contents).map_err(|source| DataError::Csv {
            path: display,
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::FieldDescriptor;

    #[test]
    fn csv_cells_become_typed_values() {
        let records = parse_csv("branch,ahead\nmaster,3\ndev,\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].value("ahead"), &Value::Number(3.0));
        assert!(records[1].value("ahead").is_null());
    }

    #[test]
    fn loads_json_and_yaml_files() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("d.json");
        std::fs::write(&json, r#"[{"branch":"master"},{"branch":"dev"}]"#).unwrap();
        assert_eq!(load_records(&json).unwrap()[1].text("branch"), "dev");

        let yaml = dir.path().join("d.yaml");
        std::fs::write(&yaml, "- branch: master\n  ahead: 2\n").unwrap();
        assert_eq!(load_records(&yaml).unwrap()[0].text("ahead"), "2");
    }

    #[test]
    fn nested_json_and_yaml_values_load_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("nested.json");
        std::fs::write(&json, r#"[{"branch":"master","tags":["a","b"]}]"#).unwrap();
        let records = load_records(&json).unwrap();
        assert_eq!(records[0].text("branch"), "master");
        assert_eq!(records[0].text("tags"), r#"["a","b"]"#);

        let yaml = dir.path().join("nested.yaml");
        std::fs::write(&yaml, "- branch: dev\n  owner:\n    name: ann\n").unwrap();
        assert_eq!(load_records(&yaml).unwrap()[0].text("owner"), r#"{"name":"ann"}"#);
    }

    #[test]
    fn csv_cells_survive_load_and_export() {
        let input = "branch,zip,ahead,ratio\n1e3,0123,7,2.5\nmaster,00,-1,4.0\n";
        let records = parse_csv(input).unwrap();
        assert_eq!(records[0].text("branch"), "1e3");
        assert_eq!(records[0].text("zip"), "0123");
        assert_eq!(records[0].value("ahead"), &Value::Number(7.0));
        assert_eq!(records[1].text("ratio"), "4.0");

        let headers: Vec<FieldDescriptor> = ["branch", "zip", "ahead", "ratio"]
            .iter()
            .map(|f| FieldDescriptor::new(f, f))
            .collect();
        let out = crate::export::render_csv(&headers, &records).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), input);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_records(Path::new("data.txt")).unwrap_err();
        assert!(matches!(err, DataError::UnknownFormat { .. }));
    }

    #[test]
    fn malformed_json_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("bad.json");
        std::fs::write(&json, "{not json").unwrap();
        let err = load_records(&json).unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }
}
