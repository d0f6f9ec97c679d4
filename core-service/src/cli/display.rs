//! Terminal output formatting

use std::io::{self, Write};

use attrition_core::logic::model::{ModelMetadata, PredictionResult};
use attrition_core::logic::narrative::Analysis;

const RULE: &str = "==================================================";

fn section(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out, "\n{}", RULE)?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", RULE)
}

pub fn banner(out: &mut impl Write, metadata: &ModelMetadata) -> io::Result<()> {
    writeln!(out, "Employee Attrition Analysis System")?;
    writeln!(out, "{}", RULE)?;
    writeln!(
        out,
        "Model: {} ({} features, layout {:08x})",
        metadata.model_name, metadata.feature_count, metadata.layout_hash
    )
}

pub fn prediction(out: &mut impl Write, result: &PredictionResult) -> io::Result<()> {
    section(out, "PREDICTION RESULTS")?;
    writeln!(out, "Employee: {}", result.employee_name)?;
    writeln!(out, "Attrition Probability: {:.2}%", result.probability_percent())?;
    writeln!(
        out,
        "Model Prediction: {}",
        if result.will_leave {
            "Will likely leave"
        } else {
            "Will likely stay"
        }
    )?;
    writeln!(out, "Risk Level: {}", result.risk_level)?;
    if let Some(actual) = result.actual_attrition {
        writeln!(
            out,
            "Actual Result: {}",
            if actual == 1 { "Left" } else { "Stayed" }
        )?;
    }
    Ok(())
}

pub fn analysis(out: &mut impl Write, analysis: &Analysis) -> io::Result<()> {
    section(out, "AI ENGAGEMENT ANALYSIS")?;
    writeln!(out, "{}", analysis.content.trim_end())?;
    if let Some(session) = &analysis.session {
        writeln!(out, "\nAnalysis saved to: {}", session.path().display())?;
    }
    Ok(())
}

pub fn narrative_unavailable(out: &mut impl Write, reason: &str) -> io::Result<()> {
    section(out, "AI ENGAGEMENT ANALYSIS")?;
    writeln!(out, "Analysis unavailable: {}", reason)?;
    writeln!(out, "The prediction above is unaffected.")
}

pub fn suggestions(out: &mut impl Write, questions: &[&str]) -> io::Result<()> {
    section(out, "FOLLOW-UP CONSULTATION")?;
    writeln!(out, "\nSuggested Questions:")?;
    for (i, q) in questions.iter().enumerate() {
        writeln!(out, "  {}. {}", i + 1, q)?;
    }
    writeln!(
        out,
        "\nType a question or its number below (or 'quit' to exit):"
    )
}

pub fn chat_response(out: &mut impl Write, response: &str) -> io::Result<()> {
    writeln!(out, "\nAI Response:")?;
    writeln!(out, "------------------------------")?;
    writeln!(out, "{}", response.trim_end())?;
    writeln!(out, "------------------------------")
}

#[cfg(test)]
mod tests {
    use super::*;
    use attrition_core::logic::features::{LlmContext, NamedFeatures, VectorOrigin};
    use attrition_core::logic::model::RiskTier;
    use chrono::Utc;

    fn result(actual: Option<u8>) -> PredictionResult {
        PredictionResult {
            employee_name: "Test Employee 4".into(),
            employee_index: Some(4),
            attrition_probability: 0.8123,
            will_leave: true,
            risk_level: RiskTier::VeryHigh,
            threshold: 0.68,
            actual_attrition: actual,
            features: NamedFeatures::default(),
            simplified_input: None,
            llm_context: LlmContext::new(),
            source: VectorOrigin::TestRow,
            predicted_at: Utc::now(),
        }
    }

    #[test]
    fn test_prediction_output() {
        let mut out = Vec::new();
        prediction(&mut out, &result(Some(0))).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Attrition Probability: 81.23%"));
        assert!(text.contains("Will likely leave"));
        assert!(text.contains("Risk Level: Very High"));
        assert!(text.contains("Actual Result: Stayed"));
    }

    #[test]
    fn test_profile_output_has_no_actual() {
        let mut out = Vec::new();
        prediction(&mut out, &result(None)).unwrap();
        assert!(!String::from_utf8(out).unwrap().contains("Actual Result"));
    }
}
