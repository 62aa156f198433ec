//! OCR glue for medscan identification.
//!
//! Parses OCR engine responses, gates them on confidence and turns accepted
//! readings into a [`medscan_core::models::SearchQuery`].

pub mod gate;
pub mod reading;

pub use gate::*;
pub use reading::*;

use medscan_core::models::{Corpus, MatchResult};
use medscan_core::resolver::Identifier;

/// Parse, gate and identify an OCR response in one step.
///
/// Rejected readings never reach the matcher.
pub fn identify_ocr_response(
    response: &str,
    gate: &OcrGate,
    identifier: &Identifier,
    corpus: &Corpus,
) -> OcrResult<MatchResult> {
    let reading = parse_ocr_response(response)?;
    let reading = gate.accept(&reading)?;
    Ok(identifier.identify(&reading.to_query(), corpus))
}

#[cfg(test)]
mod tests {
    use super::*;
    use medscan_core::models::{MedicationRecord, Strategy};

    fn corpus() -> Corpus {
        let mut augmentin = MedicationRecord::new("AUG-1".into(), "Augmentin".into());
        augmentin.generic_name = Some("Amoxicillin".into());
        Corpus::new(vec![augmentin]).unwrap()
    }

    #[test]
    fn test_identify_ocr_response() {
        let response = r#"{"transcript":"AUGMENTIN\n625mg tablets","confidence":77}"#;
        let gate = OcrGate::default();
        let identifier = Identifier::default();
        let corpus = corpus();
        let outcome = identify_ocr_response(response, &gate, &identifier, &corpus);
        let result = outcome.unwrap();

        assert_eq!(result.record_id(), Some("AUG-1"));
        assert_eq!(result.strategy, Some(Strategy::Exact));
    }

    #[test]
    fn test_low_confidence_not_identified() {
        let response = r#"{"transcript":"AUGMENTIN","confidence":12}"#;
        let gate = OcrGate::default();
        let identifier = Identifier::default();
        let result = identify_ocr_response(response, &gate, &identifier, &corpus());

        assert!(matches!(result, Err(OcrError::LowConfidence { .. })));
    }
}
