use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Per-signal weights applied to both risk scores and confidences.
///
/// The weights need not sum to exactly 1.0 — the aggregate is a weighted
/// score, not a probability — but must not sum to more than 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub contact: f64,
    pub ai_content: f64,
    pub document: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            contact: 0.45,
            ai_content: 0.35,
            document: 0.20,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.contact + self.ai_content + self.document
    }
}

/// Cut points between the three risk tiers.
/// A score >= `high` classifies HIGH, >= `medium` classifies MEDIUM.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub medium: f64,
    pub high: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            medium: 0.40,
            high: 0.70,
        }
    }
}

/// Detector configuration loaded from environment variables.
///
/// `abstract_api_key` is optional: without it every verification cascade
/// resolves through the local fallback and the engine stays fully offline.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    pub abstract_api_key: Option<String>,
    pub email_api_url: String,
    pub phone_api_url: String,
    pub ip_api_url: String,
    /// Bound on each remote verification call. On expiry the cascade
    /// falls back locally; there is no retry.
    pub request_timeout_secs: u64,
    pub weights: ScoringWeights,
    pub thresholds: RiskThresholds,
}

const DEFAULT_EMAIL_API: &str = "https://emailvalidation.abstractapi.com/v1/";
const DEFAULT_PHONE_API: &str = "https://phonevalidation.abstractapi.com/v1/";
const DEFAULT_IP_API: &str = "https://ipgeolocation.abstractapi.com/v1/";

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            abstract_api_key: None,
            email_api_url: DEFAULT_EMAIL_API.to_string(),
            phone_api_url: DEFAULT_PHONE_API.to_string(),
            ip_api_url: DEFAULT_IP_API.to_string(),
            request_timeout_secs: 10,
            weights: ScoringWeights::default(),
            thresholds: RiskThresholds::default(),
        }
    }
}

impl DetectorConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Self::default();
        let config = Self {
            abstract_api_key: optional_env("ABSTRACT_API_KEY"),
            email_api_url: env_or("ABSTRACT_EMAIL_API", &defaults.email_api_url),
            phone_api_url: env_or("ABSTRACT_PHONE_API", &defaults.phone_api_url),
            ip_api_url: env_or("ABSTRACT_IP_API", &defaults.ip_api_url),
            request_timeout_secs: env_parsed("VERIFY_TIMEOUT_SECS", 10)?,
            weights: ScoringWeights {
                contact: env_parsed("CONTACT_WEIGHT", defaults.weights.contact)?,
                ai_content: env_parsed("AI_CONTENT_WEIGHT", defaults.weights.ai_content)?,
                document: env_parsed("DOCUMENT_WEIGHT", defaults.weights.document)?,
            },
            thresholds: RiskThresholds {
                medium: env_parsed("MEDIUM_RISK_THRESHOLD", defaults.thresholds.medium)?,
                high: env_parsed("HIGH_RISK_THRESHOLD", defaults.thresholds.high)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let w = &self.weights;
        for (name, value) in [
            ("CONTACT_WEIGHT", w.contact),
            ("AI_CONTENT_WEIGHT", w.ai_content),
            ("DOCUMENT_WEIGHT", w.document),
        ] {
            if !(0.0..=1.0).contains(&value) {
                bail!("{name} must be in [0, 1], got {value}");
            }
        }
        if w.sum() > 1.0 + f64::EPSILON {
            bail!("signal weights must sum to at most 1.0, got {}", w.sum());
        }

        let t = &self.thresholds;
        if !(0.0..=1.0).contains(&t.medium) || !(0.0..=1.0).contains(&t.high) {
            bail!("risk thresholds must be in [0, 1]");
        }
        if t.medium >= t.high {
            bail!(
                "MEDIUM_RISK_THRESHOLD ({}) must be below HIGH_RISK_THRESHOLD ({})",
                t.medium,
                t.high
            );
        }

        Ok(())
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("'{key}' must be a valid number")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_below_one() {
        let w = ScoringWeights::default();
        assert!(w.sum() <= 1.0 + f64::EPSILON);
    }

    #[test]
    fn test_default_config_validates() {
        assert!(DetectorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_oversized_weights_rejected() {
        let config = DetectorConfig {
            weights: ScoringWeights {
                contact: 0.6,
                ai_content: 0.6,
                document: 0.2,
            },
            ..DetectorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let config = DetectorConfig {
            thresholds: RiskThresholds {
                medium: 0.8,
                high: 0.4,
            },
            ..DetectorConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
