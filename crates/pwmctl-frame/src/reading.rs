use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// The kinds of reading the IMU streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingKind {
    /// Accelerometer, in g.
    Acc,
    /// Gyroscope, in degrees per second.
    Gyro,
    /// Magnetometer, in microtesla.
    Mag,
}

impl ReadingKind {
    /// Every kind, in declaration order.
    pub const ALL: [ReadingKind; 3] = [ReadingKind::Acc, ReadingKind::Gyro, ReadingKind::Mag];

    /// Short lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            ReadingKind::Acc => "acc",
            ReadingKind::Gyro => "gyro",
            ReadingKind::Mag => "mag",
        }
    }

    /// Unit of the axis values.
    pub fn unit(self) -> &'static str {
        match self {
            ReadingKind::Acc => "g",
            ReadingKind::Gyro => "deg/s",
            ReadingKind::Mag => "uT",
        }
    }
}

impl fmt::Display for ReadingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no [`ReadingKind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reading kind '{0}' (expected acc, gyro or mag)")]
pub struct UnknownReadingKind(pub String);

impl FromStr for ReadingKind {
    type Err = UnknownReadingKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "acc" | "accelerometer" => Ok(ReadingKind::Acc),
            "gyro" | "gyroscope" => Ok(ReadingKind::Gyro),
            "mag" | "magnetometer" => Ok(ReadingKind::Mag),
            _ => Err(UnknownReadingKind(s.to_string())),
        }
    }
}

/// One decoded sensor sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    pub kind: ReadingKind,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Reading {
    pub fn new(kind: ReadingKind, x: f32, y: f32, z: f32) -> Self {
        Self { kind, x, y, z }
    }

    pub fn acc(x: f32, y: f32, z: f32) -> Self {
        Self::new(ReadingKind::Acc, x, y, z)
    }

    pub fn gyro(x: f32, y: f32, z: f32) -> Self {
        Self::new(ReadingKind::Gyro, x, y, z)
    }

    pub fn mag(x: f32, y: f32, z: f32) -> Self {
        Self::new(ReadingKind::Mag, x, y, z)
    }

    /// The axes as `[x, y, z]`.
    pub fn axes(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_from_short_and_long_names() {
        assert_eq!("acc".parse::<ReadingKind>().unwrap(), ReadingKind::Acc);
        assert_eq!("Gyroscope".parse::<ReadingKind>().unwrap(), ReadingKind::Gyro);
        assert_eq!(" MAG ".parse::<ReadingKind>().unwrap(), ReadingKind::Mag);
        assert!("temp".parse::<ReadingKind>().is_err());
    }

    #[test]
    fn display_matches_as_str() {
        for kind in ReadingKind::ALL {
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }
}
