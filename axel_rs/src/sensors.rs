use serde::{Deserialize, Serialize};

/// Gyroscope sample from Android SensorEvent (rad/s)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GyroSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// SensorEvent.timestamp, nanoseconds since boot
    pub timestamp_ns: i64,
}

impl GyroSample {
    pub fn new(x: f32, y: f32, z: f32, timestamp_ns: i64) -> Self {
        Self {
            x,
            y,
            z,
            timestamp_ns,
        }
    }

    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// On-screen text for the three axis readouts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorLabels {
    pub x: String,
    pub y: String,
    pub z: String,
}

impl SensorLabels {
    pub fn from_sample(sample: &GyroSample) -> Self {
        Self {
            x: format!("x={:.6}", sample.x),
            y: format!(" y={:.6}", sample.y),
            z: format!(" z={:.6}", sample.z),
        }
    }

    pub fn into_array(self) -> [String; 3] {
        [self.x, self.y, self.z]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gyro_magnitude() {
        let gyro = GyroSample::new(0.6, 0.8, 0.0, 0);
        assert!((gyro.magnitude() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_labels_format() {
        let labels = SensorLabels::from_sample(&GyroSample::new(0.5, -0.25, 1.0, 0));
        assert_eq!(labels.x, "x=0.500000");
        assert_eq!(labels.y, " y=-0.250000");
        assert_eq!(labels.z, " z=1.000000");
    }
}
