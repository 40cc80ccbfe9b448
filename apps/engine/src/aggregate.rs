//! Multi-signal risk aggregation.
//!
//! Combines whichever signals were produced for a request into one
//! weighted score, tier, and issue list. Absent signals are simply
//! omitted from the sums — treated as risk-free, not as missing
//! information. Confidence uses the same weights, normalized by the
//! weight of the signals actually present, so a run with two signals is
//! not diluted by the one that never happened. This never fails: every
//! input combination, including all-absent, yields a well-formed report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ai_content::AiContentSignal;
use crate::config::{RiskThresholds, ScoringWeights};
use crate::contact::ContactSignal;
use crate::document::DocumentSignal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// The full fraud assessment returned to callers. The constituent
/// signals ride along for transparency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudReport {
    pub overall_risk_score: f64,
    pub risk_level: RiskLevel,
    pub confidence: f64,
    pub detected_issues: Vec<String>,
    pub explanation: String,
    pub recommendations: Vec<String>,
    pub contact_verification: Option<ContactSignal>,
    pub ai_content_analysis: Option<AiContentSignal>,
    pub document_analysis: Option<DocumentSignal>,
    pub analysis_timestamp: DateTime<Utc>,
}

/// Combines per-signal scores into one report. Weights and thresholds
/// are fixed at construction; multiple engines with different
/// configurations can coexist.
#[derive(Debug, Clone)]
pub struct AggregationEngine {
    weights: ScoringWeights,
    thresholds: RiskThresholds,
}

impl AggregationEngine {
    pub fn new(weights: ScoringWeights, thresholds: RiskThresholds) -> Self {
        Self {
            weights,
            thresholds,
        }
    }

    pub fn aggregate(
        &self,
        contact: Option<ContactSignal>,
        ai: Option<AiContentSignal>,
        document: Option<DocumentSignal>,
    ) -> FraudReport {
        // Fixed signal order: contact, then AI content, then document.
        // Issue concatenation preserves each signal's internal order.
        let present: Vec<(f64, f64, f64, &[String])> = [
            contact
                .as_ref()
                .map(|s| (s.risk_score, s.confidence, self.weights.contact, &s.issues[..])),
            ai.as_ref().map(|s| {
                (
                    s.ai_probability,
                    s.confidence,
                    self.weights.ai_content,
                    &s.issues[..],
                )
            }),
            document.as_ref().map(|s| {
                (
                    s.risk_score,
                    s.confidence,
                    self.weights.document,
                    &s.suspicious_patterns[..],
                )
            }),
        ]
        .into_iter()
        .flatten()
        .collect();

        let overall_risk_score = present
            .iter()
            .map(|(score, _, weight, _)| score * weight)
            .sum::<f64>()
            .clamp(0.0, 1.0);

        let present_weight: f64 = present.iter().map(|(_, _, weight, _)| weight).sum();
        let confidence = if present_weight > 0.0 {
            (present
                .iter()
                .map(|(_, confidence, weight, _)| confidence * weight)
                .sum::<f64>()
                / present_weight)
                .clamp(0.0, 1.0)
        } else {
            0.0
        };

        let detected_issues: Vec<String> = present
            .iter()
            .flat_map(|(_, _, _, issues)| issues.iter().cloned())
            .collect();

        let risk_level = self.risk_level(overall_risk_score);

        FraudReport {
            overall_risk_score,
            risk_level,
            confidence,
            explanation: explanation(risk_level, overall_risk_score),
            recommendations: recommendations(risk_level, &detected_issues),
            detected_issues,
            contact_verification: contact,
            ai_content_analysis: ai,
            document_analysis: document,
            analysis_timestamp: Utc::now(),
        }
    }

    fn risk_level(&self, score: f64) -> RiskLevel {
        if score >= self.thresholds.high {
            RiskLevel::High
        } else if score >= self.thresholds.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

fn explanation(level: RiskLevel, score: f64) -> String {
    match level {
        RiskLevel::High => format!(
            "High fraud risk detected (score: {score:.3}). Multiple strong indicators \
             suggest this resume may be fraudulent or fabricated."
        ),
        RiskLevel::Medium => format!(
            "Medium fraud risk detected (score: {score:.3}). Some indicators warrant \
             a closer review before proceeding."
        ),
        RiskLevel::Low => format!(
            "Low fraud risk detected (score: {score:.3}). No strong fraud indicators \
             were found in this resume."
        ),
    }
}

fn recommendations(level: RiskLevel, issues: &[String]) -> Vec<String> {
    match level {
        RiskLevel::High => vec![
            "Conduct a thorough manual review of this application".to_string(),
            "Verify the candidate's identity through a secondary channel".to_string(),
            "Request original documents or references before proceeding".to_string(),
        ],
        RiskLevel::Medium => {
            let mut recs = vec![
                "Review the flagged issues before advancing this application".to_string(),
                "Verify contact details during the screening call".to_string(),
            ];
            if issues.iter().any(|issue| issue.contains("AI-generated")) {
                recs.push(
                    "Probe the candidate's listed skills in depth during a live interview"
                        .to_string(),
                );
            }
            recs
        }
        RiskLevel::Low => vec!["Proceed with the standard screening process".to_string()],
    }
}
