//! Confidence gate in front of identification.

use serde::{Deserialize, Serialize};

use crate::reading::{OcrError, OcrReading, OcrResult};

/// Default minimum OCR confidence.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 30.0;

/// Decides whether an OCR reading is good enough to identify.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OcrGate {
    pub min_confidence: f64,
}

impl Default for OcrGate {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

impl OcrGate {
    pub fn new(min_confidence: f64) -> Self {
        Self { min_confidence }
    }

    /// Accept a reading or say why it was rejected.
    pub fn accept<'r>(&self, reading: &'r OcrReading) -> OcrResult<&'r OcrReading> {
        let confidence = reading.confidence;

        if !(0.0..=100.0).contains(&confidence) {
            tracing::warn!(confidence, "OCR confidence out of range");
            return Err(OcrError::ConfidenceOutOfRange(confidence));
        }
        if reading.transcript.trim().is_empty() {
            tracing::warn!(confidence, "OCR returned no text");
            return Err(OcrError::EmptyTranscript);
        }
        if confidence < self.min_confidence {
            tracing::warn!(
                confidence,
                floor = self.min_confidence,
                "OCR confidence below floor"
            );
            return Err(OcrError::LowConfidence {
                confidence,
                floor: self.min_confidence,
            });
        }

        Ok(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_accepts_at_floor() {
        let gate = OcrGate::default();
        let reading = OcrReading::new("Brufen", 30.0);
        assert!(gate.accept(&reading).is_ok());
    }

    #[test]
    fn test_rejects_low_confidence() {
        let gate = OcrGate::default();
        let reading = OcrReading::new("Brufen", 29.9);
        assert!(matches!(
            gate.accept(&reading),
            Err(OcrError::LowConfidence { .. })
        ));
    }

    #[test]
    fn test_rejects_empty_and_out_of_range() {
        let gate = OcrGate::new(0.0);
        assert!(matches!(
            gate.accept(&OcrReading::new(" \n ", 80.0)),
            Err(OcrError::EmptyTranscript)
        ));
        assert!(matches!(
            gate.accept(&OcrReading::new("Brufen", 101.0)),
            Err(OcrError::ConfidenceOutOfRange(_))
        ));
        assert!(matches!(
            gate.accept(&OcrReading::new("Brufen", f64::NAN)),
            Err(OcrError::ConfidenceOutOfRange(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_gate_matches_floor(confidence in 0.0f64..=100.0, floor in 0.0f64..=100.0) {
            let gate = OcrGate::new(floor);
            let accepted = gate.accept(&OcrReading::new("Panadol", confidence)).is_ok();
            prop_assert_eq!(accepted, confidence >= floor);
        }
    }
}
