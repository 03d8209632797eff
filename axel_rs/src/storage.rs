use crate::error::{AxelError, AxelResult};
use crate::sensors::GyroSample;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// First line of every recording
pub const CSV_HEADER: &str = "time;x;y;z";
pub const CSV_DELIMITER: char = ';';

/// Format one recording row, newline included.
/// Always uses `.` as the decimal separator.
pub fn format_row(elapsed_secs: f64, sample: &GyroSample) -> String {
    format!(
        "{:.3};{:.6};{:.6};{:.6}\n",
        elapsed_secs, sample.x, sample.y, sample.z
    )
}

/// A row read back from a recording file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordedRow {
    pub time: f64,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RecordedRow {
    pub fn to_sample(&self) -> GyroSample {
        GyroSample::new(self.x, self.y, self.z, (self.time * 1e9) as i64)
    }
}

/// Parse a recording file written by the recorder
pub fn read_recording(path: &Path) -> AxelResult<Vec<RecordedRow>> {
    let file = File::open(path).map_err(|e| AxelError::io(path, e))?;
    let reader = BufReader::new(file);
    let mut rows = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| AxelError::io(path, e))?;
        let line_no = index + 1;
        if index == 0 {
            if line.trim() != CSV_HEADER {
                return Err(AxelError::Parse {
                    line: line_no,
                    message: format!("expected header {:?}, got {:?}", CSV_HEADER, line),
                });
            }
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        rows.push(parse_row(&line, line_no)?);
    }

    Ok(rows)
}

fn parse_row(line: &str, line_no: usize) -> AxelResult<RecordedRow> {
    let fields: Vec<&str> = line.trim().split(CSV_DELIMITER).collect();
    if fields.len() != 4 {
        return Err(AxelError::Parse {
            line: line_no,
            message: format!("expected 4 fields, got {}", fields.len()),
        });
    }

    let parse_err = |field: &str| AxelError::Parse {
        line: line_no,
        message: format!("invalid number {:?}", field),
    };

    Ok(RecordedRow {
        time: fields[0].parse().map_err(|_| parse_err(fields[0]))?,
        x: fields[1].parse().map_err(|_| parse_err(fields[1]))?,
        y: fields[2].parse().map_err(|_| parse_err(fields[2]))?,
        z: fields[3].parse().map_err(|_| parse_err(fields[3]))?,
    })
}

/// What the Java side needs to fire an `ACTION_SEND` intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRequest {
    pub path: PathBuf,
    pub mime_type: String,
    /// FileProvider authority used to build the content URI
    pub authority: String,
    pub chooser_title: String,
}

/// Summary of a finished recording, used by the replay tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingStats {
    pub row_count: usize,
    pub duration_secs: f64,
    pub peak_rate: f32,
    pub mean_rate: [f32; 3],
}

impl RecordingStats {
    pub fn from_rows(rows: &[RecordedRow]) -> Self {
        let duration_secs = match (rows.first(), rows.last()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => 0.0,
        };
        let peak_rate = rows
            .iter()
            .map(|row| row.to_sample().magnitude())
            .fold(0.0_f32, f32::max);
        let mut mean_rate = [0.0_f32; 3];
        if !rows.is_empty() {
            for row in rows {
                mean_rate[0] += row.x;
                mean_rate[1] += row.y;
                mean_rate[2] += row.z;
            }
            let n = rows.len() as f32;
            for m in &mut mean_rate {
                *m /= n;
            }
        }

        RecordingStats {
            row_count: rows.len(),
            duration_secs,
            peak_rate,
            mean_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_format_row() {
        let sample = GyroSample::new(0.1, -0.2, 0.3, 0);
        assert_eq!(format_row(1.5, &sample), "1.500;0.100000;-0.200000;0.300000\n");
    }

    #[test]
    fn test_read_recording() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.csv");
        fs::write(
            &path,
            "time;x;y;z\n0.000;1.000000;2.000000;3.000000\n0.020;4.000000;5.000000;6.000000\n",
        )
        .unwrap();

        let rows = read_recording(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].time, 0.02);
        assert_eq!(rows[1].z, 6.0);
    }

    #[test]
    fn test_read_rejects_missing_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "0.000;1;2;3\n").unwrap();
        assert!(matches!(
            read_recording(&path),
            Err(AxelError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_read_rejects_short_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.csv");
        fs::write(&path, "time;x;y;z\n0.000;1;2\n").unwrap();
        assert!(matches!(
            read_recording(&path),
            Err(AxelError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_stats() {
        let rows = vec![
            RecordedRow { time: 0.5, x: 3.0, y: 4.0, z: 0.0 },
            RecordedRow { time: 2.0, x: 1.0, y: 0.0, z: 0.0 },
        ];
        let stats = RecordingStats::from_rows(&rows);
        assert_eq!(stats.row_count, 2);
        assert_eq!(stats.duration_secs, 1.5);
        assert_eq!(stats.peak_rate, 5.0);
        assert_eq!(stats.mean_rate, [2.0_f32, 2.0, 0.0]);
    }
}
