/// Shown in place of any attribute that is missing or empty.
pub const FALLBACK_VALUE: &str = "N/A";

/// The four patient/study attributes displayed for every file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub patient_name: String,
    pub patient_id: String,
    pub modality: String,
    pub study_date: String,
}

impl Metadata {
    pub const KEYS: [&'static str; 4] = ["Patient Name", "Patient ID", "Modality", "Study Date"];

    /// Builds the table from an attribute lookup keyed by DICOM keyword.
    pub fn from_lookup<F>(mut lookup: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut text = |keyword: &str| {
            lookup(keyword)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| FALLBACK_VALUE.to_string())
        };

        Self {
            patient_name: text("PatientName"),
            patient_id: text("PatientID"),
            modality: text("Modality"),
            study_date: text("StudyDate"),
        }
    }

    pub fn entries(&self) -> [(&'static str, &str); 4] {
        [
            (Self::KEYS[0], self.patient_name.as_str()),
            (Self::KEYS[1], self.patient_id.as_str()),
            (Self::KEYS[2], self.modality.as_str()),
            (Self::KEYS[3], self.study_date.as_str()),
        ]
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries()
            .into_iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value)
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// One row of the full attribute listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRow {
    pub tag: String,
    pub vr: String,
    pub alias: String,
    pub value: String,
}
