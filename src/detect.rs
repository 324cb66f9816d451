use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw score above which a stress assessment demands attention.
const ATTENTION_THRESHOLD: u32 = 5;

/// Reported stress level is clamped to this ceiling.
const STRESS_CEILING: u32 = 10;

/// Negation markers used by the keyword contradiction heuristic.
const NEGATION_WORDS: [&str; 6] = ["don't", "not", "never", "cannot", "shouldn't", "mustn't"];

/// Contradictory pairs must share more than this many word tokens.
const SHARED_TOKEN_THRESHOLD: usize = 3;

/// How many trailing prior instructions the contradiction check examines.
const CONTRADICTION_WINDOW: usize = 5;

/// Outcome of [`cognitive_stress`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StressAssessment {
    pub stress_level: u32,
    pub signals: Vec<String>,
    pub requires_attention: bool,
}

/// One contradictory instruction pair found by [`contradiction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContradictionDetail {
    pub previous: String,
    pub current: String,
    pub common_elements: Vec<String>,
}

/// Outcome of [`contradiction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContradictionReport {
    pub contradiction_detected: bool,
    pub count: usize,
    pub details: Vec<ContradictionDetail>,
}

#[allow(clippy::cast_possible_truncation)]
fn context_number(context: &Value, key: &str) -> i64 {
    let Some(value) = context.get(key) else {
        return 0;
    };
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
        .unwrap_or(0)
}

/// Assess cognitive stress from a context mapping.
///
/// Recognized fields are `complexity` (0-10), `contradictions` (count) and
/// `recursion_depth` (count); anything absent or non-numeric counts as 0.
/// Pure and deterministic. `requires_attention` reflects the raw, pre-cap
/// score so a heavily loaded context is not masked by the ceiling.
#[must_use]
pub fn cognitive_stress(context: &Value) -> StressAssessment {
    let mut raw_score: u32 = 0;
    let mut signals = Vec::new();

    let complexity = context_number(context, "complexity");
    if complexity > 7 {
        raw_score = raw_score.saturating_add(3);
        signals.push(format!("High complexity detected: {complexity}/10"));
    }

    let contradictions = context_number(context, "contradictions");
    if contradictions > 0 {
        let weighted = u32::try_from(contradictions).unwrap_or(u32::MAX).saturating_mul(2);
        raw_score = raw_score.saturating_add(weighted);
        signals.push(format!("Contradictions detected: {contradictions}"));
    }

    let recursion_depth = context_number(context, "recursion_depth");
    if recursion_depth > 5 {
        raw_score = raw_score.saturating_add(u32::try_from(recursion_depth).unwrap_or(u32::MAX));
        signals.push(format!("Excessive recursion: depth {recursion_depth}"));
    }

    StressAssessment {
        stress_level: raw_score.min(STRESS_CEILING),
        signals,
        requires_attention: raw_score > ATTENTION_THRESHOLD,
    }
}

fn has_negation(text: &str) -> bool {
    let lowered = text.to_lowercase();
    NEGATION_WORDS.iter().any(|word| lowered.contains(word))
}

fn token_set(text: &str) -> std::collections::BTreeSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(ToOwned::to_owned)
        .collect()
}

/// Flag instruction pairs whose negation presence differs while sharing more
/// than [`SHARED_TOKEN_THRESHOLD`] word tokens. Only the trailing
/// [`CONTRADICTION_WINDOW`] prior instructions are examined. No stemming, no
/// external state.
#[must_use]
pub fn contradiction(instruction: &str, previous_instructions: &[String]) -> ContradictionReport {
    let current_negated = has_negation(instruction);
    let current_tokens = token_set(instruction);

    let window_start = previous_instructions
        .len()
        .saturating_sub(CONTRADICTION_WINDOW);

    let mut details = Vec::new();
    for prev in &previous_instructions[window_start..] {
        if has_negation(prev) == current_negated {
            continue;
        }

        let common: Vec<String> = token_set(prev)
            .intersection(&current_tokens)
            .cloned()
            .collect();
        if common.len() > SHARED_TOKEN_THRESHOLD {
            details.push(ContradictionDetail {
                previous: prev.clone(),
                current: instruction.to_string(),
                common_elements: common,
            });
        }
    }

    ContradictionReport {
        contradiction_detected: !details.is_empty(),
        count: details.len(),
        details,
    }
}
