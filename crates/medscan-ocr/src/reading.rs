//! OCR engine responses.

use medscan_core::models::SearchQuery;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OCR errors.
#[derive(Error, Debug)]
pub enum OcrError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    #[error("Confidence {0} outside 0-100")]
    ConfidenceOutOfRange(f64),

    #[error("Confidence {confidence} below floor {floor}")]
    LowConfidence { confidence: f64, floor: f64 },

    #[error("Empty transcript")]
    EmptyTranscript,
}

pub type OcrResult<T> = Result<T, OcrError>;

/// Text read from one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrReading {
    #[serde(alias = "text")]
    pub transcript: String,
    /// Engine confidence, 0-100
    pub confidence: f64,
}

impl OcrReading {
    pub fn new(transcript: impl Into<String>, confidence: f64) -> Self {
        Self {
            transcript: transcript.into(),
            confidence,
        }
    }

    /// Build an identification query from the transcript.
    ///
    /// The first non-blank line is the primary text (labels print the brand
    /// name first); the remaining lines become alternatives.
    pub fn to_query(&self) -> SearchQuery {
        let mut lines = self
            .transcript
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty());

        let primary = lines.next().unwrap_or_default();
        let alternatives: Vec<String> = lines.map(str::to_string).collect();

        SearchQuery::new(primary)
            .with_alternatives(alternatives)
            .with_transcript(self.transcript.clone())
            .with_confidence(self.confidence)
    }
}

/// Parse an OCR engine response.
///
/// Tolerates text around the JSON object.
pub fn parse_ocr_response(response: &str) -> OcrResult<OcrReading> {
    let json_start = response
        .find('{')
        .ok_or_else(|| invalid_format("No JSON object found in response"))?;
    let json_end = response
        .rfind('}')
        .ok_or_else(|| invalid_format("No closing brace found in response"))?;
    if json_end < json_start {
        return Err(invalid_format("Closing brace before opening brace"));
    }

    let reading: OcrReading = serde_json::from_str(&response[json_start..=json_end])?;
    tracing::debug!(
        confidence = reading.confidence,
        chars = reading.transcript.chars().count(),
        "OCR response parsed"
    );

    Ok(reading)
}

fn invalid_format(message: &str) -> OcrError {
    OcrError::InvalidFormat(message.to_string())
}
