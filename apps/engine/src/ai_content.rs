//! AI-generated-content signal.
//!
//! Detection backends are pluggable: the detector holds an
//! `Arc<dyn AiContentAnalyzer>` and never cares which backend produced
//! the probability. The default is `PatternAnalyzer` — pure-Rust, fast,
//! deterministic, fully testable — so the engine works with no external
//! AI service configured. A remote backend that fails degrades to an
//! "unavailable" signal rather than aborting the aggregate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AnalyzerError;

/// The AI-content fraud signal for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiContentSignal {
    pub ai_probability: f64,
    pub confidence: f64,
    /// Backend that produced the probability, for transparency:
    /// "pattern_fallback" for the built-in analyzer, "unavailable" when
    /// a remote backend failed.
    pub detection_method: String,
    pub suspicious_sections: Vec<String>,
    pub issues: Vec<String>,
}

impl AiContentSignal {
    /// Builds a signal from a backend's raw output, clamping the numeric
    /// fields and deriving the issue strings.
    pub fn from_analysis(
        ai_probability: f64,
        confidence: f64,
        detection_method: &str,
        suspicious_sections: Vec<String>,
    ) -> Self {
        let ai_probability = ai_probability.clamp(0.0, 1.0);
        let issues = ai_issues(ai_probability, &suspicious_sections);

        Self {
            ai_probability,
            confidence: confidence.clamp(0.0, 1.0),
            detection_method: detection_method.to_string(),
            suspicious_sections,
            issues,
        }
    }

    /// Most degraded state: the backend could not be reached and no
    /// pattern fallback was available. Contributes nothing to the
    /// aggregate score and nothing to its confidence.
    pub fn unavailable() -> Self {
        Self {
            ai_probability: 0.0,
            confidence: 0.0,
            detection_method: "unavailable".to_string(),
            suspicious_sections: Vec::new(),
            issues: Vec::new(),
        }
    }
}

fn ai_issues(probability: f64, suspicious_sections: &[String]) -> Vec<String> {
    let mut issues = Vec::new();

    if probability > 0.7 {
        issues.push("High probability of AI-generated content detected".to_string());
    } else if probability > 0.4 {
        issues.push("Moderate probability of AI-generated content detected".to_string());
    }

    for section in suspicious_sections {
        issues.push(format!("AI-generated content detected in {section} section"));
    }

    issues
}

/// An AI-content detection backend. Implement this to swap in a remote
/// detector without touching the aggregation path.
#[async_trait]
pub trait AiContentAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<AiContentSignal, AnalyzerError>;
}

// ── PatternAnalyzer — default offline backend ──────────────────────────

/// Phrases that appear far more often in generated resumes than in
/// human-written ones. Substring match against lower-cased text.
const BOILERPLATE_PHRASES: &[&str] = &[
    "results-driven professional",
    "proven track record of",
    "dynamic and motivated",
    "passionate about leveraging",
    "leveraging cutting-edge",
    "spearheaded cross-functional",
    "detail-oriented individual",
    "thrive in fast-paced environments",
    "demonstrated expertise in",
    "committed to delivering excellence",
];

const PATTERN_CONFIDENCE: f64 = 0.6;

/// Offline heuristic backend: boilerplate-phrase density plus
/// sentence-length uniformity. Generated text tends to repeat stock
/// phrasing and to keep sentences unnaturally even in length.
pub struct PatternAnalyzer;

#[async_trait]
impl AiContentAnalyzer for PatternAnalyzer {
    async fn analyze(&self, text: &str) -> Result<AiContentSignal, AnalyzerError> {
        let probability = pattern_probability(text);
        Ok(AiContentSignal::from_analysis(
            probability,
            PATTERN_CONFIDENCE,
            "pattern_fallback",
            Vec::new(),
        ))
    }
}

fn pattern_probability(text: &str) -> f64 {
    let lower = text.to_lowercase();

    let phrase_hits = BOILERPLATE_PHRASES
        .iter()
        .filter(|phrase| lower.contains(*phrase))
        .count();
    let phrase_score = (phrase_hits as f64 * 0.15).min(0.6);

    (phrase_score + uniformity_score(text)).clamp(0.0, 1.0)
}

/// Scores how uniform sentence lengths are. Needs at least five
/// sentences to say anything; below that it contributes nothing.
fn uniformity_score(text: &str) -> f64 {
    let lengths: Vec<f64> = text
        .split(['.', '!', '?'])
        .map(|s| s.split_whitespace().count())
        .filter(|&words| words >= 3)
        .map(|words| words as f64)
        .collect();

    if lengths.len() < 5 {
        return 0.0;
    }

    let mean = lengths.iter().sum::<f64>() / lengths.len() as f64;
    let variance = lengths.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / lengths.len() as f64;
    let coefficient_of_variation = variance.sqrt() / mean;

    if coefficient_of_variation < 0.2 {
        0.3
    } else if coefficient_of_variation < 0.35 {
        0.15
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_plain_text_scores_low() {
        let signal = PatternAnalyzer
            .analyze("I fixed bugs at Initech for three years. Mostly in the billing system.")
            .await
            .unwrap();

        assert!(signal.ai_probability < 0.4, "got {}", signal.ai_probability);
        assert_eq!(signal.detection_method, "pattern_fallback");
        assert_eq!(signal.confidence, PATTERN_CONFIDENCE);
        assert!(signal.issues.is_empty());
    }

    #[tokio::test]
    async fn test_boilerplate_heavy_text_scores_higher() {
        let text = "Results-driven professional with a proven track record of success. \
                    Detail-oriented individual passionate about leveraging modern tools. \
                    Demonstrated expertise in delivering projects and committed to delivering excellence.";
        let signal = PatternAnalyzer.analyze(text).await.unwrap();

        assert!(signal.ai_probability > 0.4, "got {}", signal.ai_probability);
        assert_eq!(
            signal.issues,
            vec!["Moderate probability of AI-generated content detected".to_string()]
        );
    }

    #[tokio::test]
    async fn test_analyzer_is_deterministic() {
        let text = "Spearheaded cross-functional initiatives. Thrive in fast-paced environments.";
        let a = PatternAnalyzer.analyze(text).await.unwrap();
        let b = PatternAnalyzer.analyze(text).await.unwrap();
        assert_eq!(a.ai_probability, b.ai_probability);
    }

    #[test]
    fn test_uniform_sentences_flagged() {
        let uniform = "One two three four five six seven. \
                       Apple bear cedar delta echo fox gulf. \
                       Red blue green yellow pink black white. \
                       Cats dogs birds fish mice deer owls. \
                       Run walk jump swim climb crawl slide.";
        assert!(uniformity_score(uniform) > 0.0);
    }

    #[test]
    fn test_short_text_uniformity_is_zero() {
        assert_eq!(uniformity_score("Two sentences. Not enough signal."), 0.0);
    }

    #[test]
    fn test_issue_thresholds() {
        let high = AiContentSignal::from_analysis(0.8, 0.6, "pattern_fallback", vec![]);
        assert_eq!(
            high.issues,
            vec!["High probability of AI-generated content detected".to_string()]
        );

        let sections = AiContentSignal::from_analysis(
            0.5,
            0.6,
            "remote",
            vec!["summary".to_string(), "experience".to_string()],
        );
        assert_eq!(
            sections.issues,
            vec![
                "Moderate probability of AI-generated content detected".to_string(),
                "AI-generated content detected in summary section".to_string(),
                "AI-generated content detected in experience section".to_string(),
            ]
        );

        let low = AiContentSignal::from_analysis(0.2, 0.6, "pattern_fallback", vec![]);
        assert!(low.issues.is_empty());
    }

    #[test]
    fn test_probability_is_clamped() {
        let signal = AiContentSignal::from_analysis(1.7, 2.0, "remote", vec![]);
        assert_eq!(signal.ai_probability, 1.0);
        assert_eq!(signal.confidence, 1.0);
    }

    #[test]
    fn test_unavailable_signal_is_inert() {
        let signal = AiContentSignal::unavailable();
        assert_eq!(signal.ai_probability, 0.0);
        assert_eq!(signal.confidence, 0.0);
        assert!(signal.issues.is_empty());
    }
}
