use serde::{Deserialize, Serialize};

use crate::frame::Trajectory;

/// Persisted outcome of one alignment run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlignmentRecord {
    /// Rotation centre, absolute pixels.
    pub xc: f64,
    pub yc: f64,
    /// Rotation angle of every frame, radians.
    pub angle: Vec<f64>,
    /// Time of every frame relative to frame 0, minutes.
    pub dt: Vec<f64>,
    /// Cumulative displacement relative to frame 0, pixels.
    pub dx: Vec<f64>,
    pub dy: Vec<f64>,
}

impl AlignmentRecord {
    pub fn new(center: (f64, f64), angle: Vec<f64>, dt: Vec<f64>, trajectory: Trajectory) -> Self {
        Self {
            xc: center.0,
            yc: center.1,
            angle,
            dt,
            dx: trajectory.dx,
            dy: trajectory.dy,
        }
    }

    pub fn len(&self) -> usize {
        self.dx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dx.is_empty()
    }

    pub fn trajectory(&self) -> Trajectory {
        Trajectory {
            dx: self.dx.clone(),
            dy: self.dy.clone(),
        }
    }
}

/// Externally matched orientation and pointing of the first frame against a
/// full-disk reference.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WcsMatch {
    pub match_angle: f64,
    pub wcsx: f64,
    pub wcsy: f64,
}

/// Level-1 record: trajectory plus its WCS match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchedAlignmentRecord {
    #[serde(flatten)]
    pub alignment: AlignmentRecord,
    pub sdo_angle: f64,
    pub wcsx: f64,
    pub wcsy: f64,
}

impl MatchedAlignmentRecord {
    pub fn new(alignment: AlignmentRecord, wcs: WcsMatch) -> Self {
        Self {
            alignment,
            sdo_angle: wcs.match_angle,
            wcsx: wcs.wcsx,
            wcsy: wcs.wcsy,
        }
    }
}

/// Which flavour of record a store writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordLevel {
    /// Trajectory only.
    #[default]
    Level0,
    /// Trajectory merged with an upstream WCS match, which it supersedes.
    Level1,
}

impl std::fmt::Display for RecordLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordLevel::Level0 => write!(f, "level 0"),
            RecordLevel::Level1 => write!(f, "level 1"),
        }
    }
}
