//! ## beredskap-analysis::mttr
//! **Mean Time To Recovery: detection + diagnosis + repair + testing**

use serde::{Deserialize, Serialize};

/// Recovery phases in minutes. Defaults match the reference walkthrough.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MttrInput {
    pub detection_min: u64,
    pub diagnosis_min: u64,
    pub repair_min: u64,
    pub testing_min: u64,
}

impl Default for MttrInput {
    fn default() -> Self {
        Self {
            detection_min: 5,
            diagnosis_min: 10,
            repair_min: 30,
            testing_min: 15,
        }
    }
}

impl MttrInput {
    pub fn total_min(&self) -> u64 {
        compute_mttr(
            self.detection_min,
            self.diagnosis_min,
            self.repair_min,
            self.testing_min,
        )
    }
}

/// MTTR is the plain sum of the four phases, in minutes.
pub fn compute_mttr(detection: u64, diagnosis: u64, repair: u64, testing: u64) -> u64 {
    detection + diagnosis + repair + testing
}
