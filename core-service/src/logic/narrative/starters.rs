//! Suggested follow-up questions by risk band

const HIGH_RISK: &[&str] = &[
    "What immediate retention actions should we take?",
    "How can we address their top concerns quickly?",
    "What compensation adjustments might help?",
    "Should we involve senior management?",
    "What's the timeline for intervention?",
];

const MEDIUM_RISK: &[&str] = &[
    "What preventive measures should we implement?",
    "How can we enhance their job satisfaction?",
    "What development opportunities can we offer?",
    "How can we improve their work environment?",
    "What recognition strategies would be effective?",
];

const LOW_RISK: &[&str] = &[
    "How can we maintain their current engagement?",
    "What growth opportunities should we provide?",
    "How can they mentor others?",
    "What new challenges might motivate them?",
    "How can we leverage their strengths?",
];

/// Bands: >= 0.7 high, >= 0.4 medium, else low
pub fn conversation_starters(probability: f64) -> &'static [&'static str] {
    if probability >= 0.7 {
        HIGH_RISK
    } else if probability >= 0.4 {
        MEDIUM_RISK
    } else {
        LOW_RISK
    }
}
