//! Prompt assembly for engagement narratives

use serde::{Deserialize, Serialize};

use crate::logic::features::{AttributeValue, NamedFeatures, NAME_KEY};
use crate::logic::model::PredictionResult;

pub const ANALYSIS_SYSTEM_PROMPT: &str = "\
You are an expert HR Analytics consultant specializing in employee retention and engagement psychology.

Your task is to analyze raw employee data and attrition probability to provide actionable insights.

**Analysis Framework:**
- Assess attrition risk based on probability score
- Identify key psychological and workplace factors
- Provide specific, actionable recommendations
- Focus on human psychology behind the data

**Output Format Requirements:**
- Use clear headings with ##
- Use bullet points for lists
- Keep sections concise and focused
- Provide specific action items
- Write in professional, empathetic tone

**Key Areas to Address:**
1. Risk Assessment
2. Key Contributing Factors
3. Recommended Actions
4. Timeline for Implementation
5. Success Metrics";

pub const CHAT_SYSTEM_PROMPT: &str =
    "You are an HR expert continuing a conversation about employee engagement. Provide concise, actionable responses.";

pub const OPEN_CHAT_SYSTEM_PROMPT: &str =
    "You are an HR expert specializing in employee engagement and retention strategies.";

/// (column, label) pairs reported as raw numeric data
const RAW_FIELDS: &[(&str, &str)] = &[
    ("Age", "Age (scaled)"),
    ("MonthlyIncome", "Monthly Income (scaled)"),
    ("YearsAtCompany", "Years at Company"),
    ("TotalWorkingYears", "Total Experience"),
    ("DistanceFromHome", "Distance from Home (scaled)"),
];

/// One-hot groups decoded back into readable factors
const DECODED_GROUPS: &[(&str, &str)] = &[
    ("Department_", "Department"),
    ("JobRole_", "Job Role"),
    ("WorkLifeBalance_", "Work-Life Balance"),
    ("JobSatisfaction_", "Job Satisfaction"),
    ("EnvironmentSatisfaction_", "Environment Satisfaction"),
    ("MaritalStatus_", "Marital Status"),
    ("BusinessTravel_", "Business Travel"),
];

/// Minimal context carried into follow-up questions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatContext {
    pub employee_name: String,
    pub attrition_probability: f64,
}

impl From<&PredictionResult> for ChatContext {
    fn from(result: &PredictionResult) -> Self {
        Self {
            employee_name: result.employee_name.clone(),
            attrition_probability: result.attrition_probability,
        }
    }
}

pub fn percent(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

pub fn raw_data_lines(features: &NamedFeatures) -> Vec<String> {
    RAW_FIELDS
        .iter()
        .filter_map(|(column, label)| features.get(column).map(|v| format!("{}: {:.2}", label, v)))
        .collect()
}

/// "YearsAtCompany" -> "Years At Company", "job_role" -> "Job Role"
fn title_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev_lower = false;
    for ch in key.chars() {
        if ch == '_' {
            out.push(' ');
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower {
            out.push(' ');
        }
        if out.is_empty() || out.ends_with(' ') {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
    }
    out
}

/// Readable workplace factors. Uses the simplified input when the result
/// came from a profile, otherwise decodes each one-hot group by its
/// dominant column.
pub fn key_factors(result: &PredictionResult) -> Vec<String> {
    if let Some(input) = &result.simplified_input {
        return input
            .iter()
            .filter(|(key, _)| *key != NAME_KEY)
            .map(|(key, value)| match value {
                AttributeValue::Number(n) => format!("{}: {}", title_case(key), n),
                AttributeValue::Text(t) => format!("{}: {}", title_case(key), t),
            })
            .collect();
    }

    let features = &result.features;
    let mut factors = Vec::new();
    for (prefix, label) in DECODED_GROUPS {
        if let Some(value) = features.dominant_with_prefix(prefix) {
            factors.push(format!("{}: {}", label, value));
        }
        // Overtime sits between satisfaction and marital status in reports
        if *prefix == "EnvironmentSatisfaction_" && features.get("OverTime_Yes").is_some() {
            let status = features.dominant_with_prefix("OverTime_").unwrap_or("No");
            factors.push(format!("Overtime: {}", status));
        }
    }
    factors
}

pub fn analysis_prompt(result: &PredictionResult) -> String {
    let raw = raw_data_lines(&result.features);
    let raw = if raw.is_empty() {
        "Limited demographic data available".to_string()
    } else {
        raw.join("\n")
    };

    let factors = key_factors(result);
    let factors = if factors.is_empty() {
        "Limited feature information available".to_string()
    } else {
        factors.join("\n")
    };

    let mut prompt = format!(
        "## Employee Attrition Analysis Request\n\n\
         **Employee:** {}\n\
         **Attrition Probability:** {}\n\n\
         **Raw Employee Data:**\n{}\n\n\
         **Key Features:**\n{}\n",
        result.employee_name,
        percent(result.attrition_probability),
        raw,
        factors
    );

    if !result.llm_context.is_empty() {
        prompt.push_str("\n**Additional context:**\n");
        for (key, value) in result.llm_context.iter() {
            prompt.push_str(&format!("- {}: {}\n", title_case(key), value));
        }
    }

    prompt.push_str("\nPlease provide a comprehensive analysis and engagement strategy.");
    prompt
}

/// (system, user) messages for a follow-up question
pub fn chat_prompt(question: &str, context: Option<&ChatContext>) -> (&'static str, String) {
    match context {
        Some(ctx) => (
            CHAT_SYSTEM_PROMPT,
            format!(
                "**Context:**\n\
                 - Employee: {}\n\
                 - Attrition Probability: {}\n\n\
                 **Previous Analysis Summary:** See previous conversation for detailed analysis.\n\n\
                 **Question:** {}",
                ctx.employee_name,
                percent(ctx.attrition_probability),
                question
            ),
        ),
        None => (OPEN_CHAT_SYSTEM_PROMPT, question.to_string()),
    }
}
