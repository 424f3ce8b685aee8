//! Image recognition boundary
//!
//! The recognizer itself is an external service; only its contract lives here.

/// Marker a recognizer returns when the photo shows no car
pub const NOT_A_CAR: &str = "NOT_A_CAR";

/// Outcome of a successful recognition call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recognition {
    Car(String),
    NotACar,
}

impl Recognition {
    /// Interpret raw recognizer text.
    ///
    /// Empty answers and the `NOT_A_CAR` marker both mean no car.
    pub fn from_text(text: &str) -> Self {
        let name = normalize_name(text);
        if name.is_empty() || name.eq_ignore_ascii_case(NOT_A_CAR) {
            Self::NotACar
        } else {
            Self::Car(name)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("recognition request failed: {0}")]
    Transport(String),

    #[error("unreadable recognition response: {0}")]
    BadResponse(String),
}

/// Identifies the car in a photo
pub trait CarRecognizer {
    fn identify(&self, image: &[u8]) -> Result<Recognition, RecognitionError>;
}

impl<F> CarRecognizer for F
where
    F: Fn(&[u8]) -> Result<Recognition, RecognitionError>,
{
    fn identify(&self, image: &[u8]) -> Result<Recognition, RecognitionError> {
        self(image)
    }
}

/// Trim and fold line breaks into single spaces
pub fn normalize_name(raw: &str) -> String {
    raw.trim()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
