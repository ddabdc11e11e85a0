use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrescribedMedication {
    pub name: String,
    pub dosage: String,
    pub purpose: String,
}

impl Default for PrescribedMedication {
    fn default() -> Self {
        Self {
            name: String::new(),
            dosage: "—".to_string(),
            purpose: String::new(),
        }
    }
}

/// Medications identified from a free-text prescription description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrescriptionResult {
    pub medications: Vec<PrescribedMedication>,
    pub advice: String,
}
