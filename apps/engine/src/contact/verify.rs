//! Remote verification cascade for contact fields.
//!
//! Every check computes the offline verdict first, then — when an API key
//! is configured — makes a single authoritative call. Any failure on that
//! path (network error, non-200 status, an embedded `error` field, or a
//! missing required field) is a [`CascadeFailure`]: the attempt is
//! abandoned immediately, with no retry, and the outcome is rebuilt from
//! the offline verdict. Bounded timeout, no retries — request latency and
//! availability win over exhaustive correctness.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::DetectorConfig;
use crate::contact::local;
use crate::errors::CascadeFailure;

/// Which path produced a verification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationSource {
    Authoritative,
    LocalFallback,
}

/// Boolean fields as remote verification APIs actually ship them: a raw
/// bool, a `{"value": bool}` wrapper, or a `"true"`/`"false"` string.
/// All three normalize through [`BoolLike::as_bool`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BoolLike {
    Bool(bool),
    Wrapped { value: bool },
    Text(String),
}

impl BoolLike {
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Wrapped { value } => *value,
            Self::Text(s) => s.eq_ignore_ascii_case("true"),
        }
    }
}

/// Numeric fields that may arrive as JSON numbers or as strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberLike {
    Num(f64),
    Text(String),
}

impl NumberLike {
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Num(n) => *n,
            Self::Text(s) => s.trim().parse().unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailVerification {
    pub valid: bool,
    pub disposable: bool,
    pub deliverable: bool,
    pub quality_score: f64,
    pub source: VerificationSource,
}

impl EmailVerification {
    /// Fallback outcome derived purely from the offline syntax check.
    fn local(valid: bool) -> Self {
        Self {
            valid,
            disposable: false,
            deliverable: valid,
            quality_score: if valid { 0.5 } else { 0.0 },
            source: VerificationSource::LocalFallback,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneVerification {
    pub valid: bool,
    pub country: Option<String>,
    pub carrier: Option<String>,
    pub source: VerificationSource,
}

impl PhoneVerification {
    fn local(check: local::LocalPhoneCheck) -> Self {
        Self {
            valid: check.valid,
            country: check.country,
            carrier: None,
            source: VerificationSource::LocalFallback,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpVerification {
    pub ip_address: String,
    pub country_code: String,
    pub is_vpn: bool,
    pub is_tor: bool,
    pub threat_level: String,
    pub abuse_confidence: f64,
    pub source: VerificationSource,
}

impl IpVerification {
    /// There is no offline geolocation check; the fallback is a neutral
    /// "unknown" outcome that adds no risk.
    fn unknown(ip_address: &str) -> Self {
        Self {
            ip_address: ip_address.to_string(),
            country_code: "UNKNOWN".to_string(),
            is_vpn: false,
            is_tor: false,
            threat_level: "unknown".to_string(),
            abuse_confidence: 0.0,
            source: VerificationSource::LocalFallback,
        }
    }
}

/// Client for the remote verification sources (email, phone, IP).
#[derive(Debug, Clone)]
pub struct VerifyClient {
    http: Client,
    api_key: Option<String>,
    email_api_url: String,
    phone_api_url: String,
    ip_api_url: String,
}

impl VerifyClient {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
                .build()
                .expect("Failed to build HTTP client"),
            api_key: config.abstract_api_key.clone(),
            email_api_url: config.email_api_url.clone(),
            phone_api_url: config.phone_api_url.clone(),
            ip_api_url: config.ip_api_url.clone(),
        }
    }

    /// Whether an authoritative source is configured at all.
    pub fn has_remote_source(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn verify_email(&self, email: &str) -> EmailVerification {
        let local_valid = local::is_valid_email(email);
        let Some(api_key) = self.api_key.as_deref() else {
            return EmailVerification::local(local_valid);
        };

        match self.fetch_email(api_key, email).await {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!("email verification fell back to the local check: {err}");
                EmailVerification::local(local_valid)
            }
        }
    }

    pub async fn verify_phone(&self, phone: &str) -> PhoneVerification {
        let local_check = local::check_phone(phone);
        let Some(api_key) = self.api_key.as_deref() else {
            return PhoneVerification::local(local_check);
        };

        match self.fetch_phone(api_key, phone).await {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!("phone verification fell back to the local check: {err}");
                PhoneVerification::local(local_check)
            }
        }
    }

    pub async fn verify_ip(&self, ip_address: &str) -> IpVerification {
        let Some(api_key) = self.api_key.as_deref() else {
            return IpVerification::unknown(ip_address);
        };

        match self.fetch_ip(api_key, ip_address).await {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!("IP verification fell back to the neutral outcome: {err}");
                IpVerification::unknown(ip_address)
            }
        }
    }

    async fn fetch_email(
        &self,
        api_key: &str,
        email: &str,
    ) -> Result<EmailVerification, CascadeFailure> {
        let body = self
            .fetch_json(&self.email_api_url, &[("api_key", api_key), ("email", email)])
            .await?;
        parse_email_response(body)
    }

    async fn fetch_phone(
        &self,
        api_key: &str,
        phone: &str,
    ) -> Result<PhoneVerification, CascadeFailure> {
        let body = self
            .fetch_json(&self.phone_api_url, &[("api_key", api_key), ("phone", phone)])
            .await?;
        parse_phone_response(body)
    }

    async fn fetch_ip(
        &self,
        api_key: &str,
        ip_address: &str,
    ) -> Result<IpVerification, CascadeFailure> {
        let body = self
            .fetch_json(
                &self.ip_api_url,
                &[
                    ("api_key", api_key),
                    ("ip_address", ip_address),
                    ("fields", "country_code,is_vpn,connection,threat,abuse_confidence"),
                ],
            )
            .await?;
        parse_ip_response(ip_address, body)
    }

    /// Single GET against a verification source. A non-200 status or an
    /// embedded `error` field fails the cascade here, before any field
    /// parsing happens.
    async fn fetch_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, CascadeFailure> {
        let response = self.http.get(url).query(query).send().await?;

        let status = response.status();
        if status.as_u16() != 200 {
            return Err(CascadeFailure::Status(status.as_u16()));
        }

        let body: Value = response.json().await?;
        if let Some(error) = body.get("error") {
            return Err(CascadeFailure::ApiError(error.to_string()));
        }

        Ok(body)
    }
}

// ── Response parsing ───────────────────────────────────────────────────
//
// Parsing is split out of the HTTP path so the field normalization can be
// tested against captured payloads without a network in sight. A missing
// required field surfaces as a serde error and fails the cascade.

#[derive(Debug, Deserialize)]
struct EmailApiResponse {
    is_valid_format: BoolLike,
    is_smtp_valid: BoolLike,
    #[serde(default)]
    is_disposable_email: Option<BoolLike>,
    #[serde(default)]
    deliverability: Option<String>,
    #[serde(default)]
    quality_score: Option<NumberLike>,
}

fn parse_email_response(body: Value) -> Result<EmailVerification, CascadeFailure> {
    let response: EmailApiResponse = serde_json::from_value(body)?;

    let deliverability = response.deliverability.as_deref().unwrap_or("UNKNOWN");

    Ok(EmailVerification {
        valid: response.is_valid_format.as_bool() && response.is_smtp_valid.as_bool(),
        disposable: response
            .is_disposable_email
            .map(|b| b.as_bool())
            .unwrap_or(false),
        deliverable: matches!(deliverability, "DELIVERABLE" | "RISKY"),
        quality_score: response
            .quality_score
            .map(|n| n.as_f64())
            .unwrap_or(0.0)
            .clamp(0.0, 1.0),
        source: VerificationSource::Authoritative,
    })
}

#[derive(Debug, Deserialize)]
struct PhoneApiResponse {
    valid: BoolLike,
    #[serde(default)]
    country: Option<PhoneCountry>,
    #[serde(default)]
    carrier: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PhoneCountry {
    #[serde(default)]
    code: Option<String>,
}

fn parse_phone_response(body: Value) -> Result<PhoneVerification, CascadeFailure> {
    let response: PhoneApiResponse = serde_json::from_value(body)?;

    Ok(PhoneVerification {
        valid: response.valid.as_bool(),
        country: response.country.and_then(|c| c.code),
        carrier: response.carrier.filter(|c| !c.is_empty()),
        source: VerificationSource::Authoritative,
    })
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default)]
    connection: IpConnection,
    #[serde(default)]
    threat: IpThreat,
}

#[derive(Debug, Default, Deserialize)]
struct IpConnection {
    #[serde(default)]
    is_vpn: Option<BoolLike>,
}

#[derive(Debug, Default, Deserialize)]
struct IpThreat {
    #[serde(default)]
    is_tor: Option<BoolLike>,
    #[serde(default)]
    threat_level: Option<String>,
    #[serde(default)]
    abuse_confidence: Option<NumberLike>,
}

fn parse_ip_response(ip_address: &str, body: Value) -> Result<IpVerification, CascadeFailure> {
    let response: IpApiResponse = serde_json::from_value(body)?;

    Ok(IpVerification {
        ip_address: ip_address.to_string(),
        country_code: response
            .country_code
            .unwrap_or_else(|| "UNKNOWN".to_string()),
        is_vpn: response
            .connection
            .is_vpn
            .map(|b| b.as_bool())
            .unwrap_or(false),
        is_tor: response.threat.is_tor.map(|b| b.as_bool()).unwrap_or(false),
        threat_level: response
            .threat
            .threat_level
            .unwrap_or_else(|| "unknown".to_string()),
        abuse_confidence: response
            .threat
            .abuse_confidence
            .map(|n| n.as_f64())
            .unwrap_or(0.0),
        source: VerificationSource::Authoritative,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn offline_client() -> VerifyClient {
        VerifyClient::new(&DetectorConfig::default())
    }

    #[test]
    fn test_bool_like_normalizes_all_shapes() {
        let raw: BoolLike = serde_json::from_value(json!(true)).unwrap();
        assert!(raw.as_bool());

        let wrapped: BoolLike = serde_json::from_value(json!({"value": true})).unwrap();
        assert!(wrapped.as_bool());

        let text: BoolLike = serde_json::from_value(json!("TRUE")).unwrap();
        assert!(text.as_bool());

        let text_false: BoolLike = serde_json::from_value(json!("false")).unwrap();
        assert!(!text_false.as_bool());
    }

    #[test]
    fn test_number_like_accepts_strings() {
        let n: NumberLike = serde_json::from_value(json!("0.95")).unwrap();
        assert_eq!(n.as_f64(), 0.95);

        let garbage: NumberLike = serde_json::from_value(json!("n/a")).unwrap();
        assert_eq!(garbage.as_f64(), 0.0);
    }

    #[test]
    fn test_parse_email_response_mixed_shapes() {
        let body = json!({
            "is_valid_format": {"value": true},
            "is_smtp_valid": "TRUE",
            "is_disposable_email": false,
            "deliverability": "DELIVERABLE",
            "quality_score": "0.90"
        });

        let outcome = parse_email_response(body).unwrap();
        assert!(outcome.valid);
        assert!(!outcome.disposable);
        assert!(outcome.deliverable);
        assert_eq!(outcome.quality_score, 0.90);
        assert_eq!(outcome.source, VerificationSource::Authoritative);
    }

    #[test]
    fn test_parse_email_response_missing_required_field_fails() {
        let body = json!({"is_valid_format": true});
        assert!(matches!(
            parse_email_response(body),
            Err(CascadeFailure::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_parse_email_risky_counts_as_deliverable() {
        let body = json!({
            "is_valid_format": true,
            "is_smtp_valid": true,
            "deliverability": "RISKY"
        });
        assert!(parse_email_response(body).unwrap().deliverable);
    }

    #[test]
    fn test_parse_phone_response() {
        let body = json!({
            "valid": true,
            "country": {"code": "US"},
            "carrier": "Example Wireless"
        });

        let outcome = parse_phone_response(body).unwrap();
        assert!(outcome.valid);
        assert_eq!(outcome.country.as_deref(), Some("US"));
        assert_eq!(outcome.carrier.as_deref(), Some("Example Wireless"));
    }

    #[test]
    fn test_parse_ip_response_defaults() {
        let outcome = parse_ip_response("203.0.113.7", json!({})).unwrap();
        assert_eq!(outcome.country_code, "UNKNOWN");
        assert!(!outcome.is_vpn);
        assert!(!outcome.is_tor);
        assert_eq!(outcome.abuse_confidence, 0.0);
        assert_eq!(outcome.source, VerificationSource::Authoritative);
    }

    #[test]
    fn test_parse_ip_response_threat_fields() {
        let body = json!({
            "country_code": "DE",
            "connection": {"is_vpn": "true"},
            "threat": {"is_tor": false, "threat_level": "high", "abuse_confidence": 80}
        });

        let outcome = parse_ip_response("203.0.113.7", body).unwrap();
        assert_eq!(outcome.country_code, "DE");
        assert!(outcome.is_vpn);
        assert!(!outcome.is_tor);
        assert_eq!(outcome.abuse_confidence, 80.0);
    }

    #[tokio::test]
    async fn test_offline_email_cascade_is_local_and_deterministic() {
        let client = offline_client();

        let first = client.verify_email("john@example.com").await;
        let second = client.verify_email("john@example.com").await;

        assert_eq!(first.source, VerificationSource::LocalFallback);
        assert!(first.valid);
        assert!(first.deliverable);
        assert_eq!(first.quality_score, 0.5);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_offline_invalid_email_quality_is_zero() {
        let outcome = offline_client().verify_email("not-an-email").await;
        assert!(!outcome.valid);
        assert!(!outcome.deliverable);
        assert_eq!(outcome.quality_score, 0.0);
    }

    #[tokio::test]
    async fn test_offline_phone_cascade() {
        let outcome = offline_client().verify_phone("(555) 123-4567").await;
        assert!(outcome.valid);
        assert_eq!(outcome.country.as_deref(), Some("US"));
        assert_eq!(outcome.carrier, None);
        assert_eq!(outcome.source, VerificationSource::LocalFallback);
    }

    #[tokio::test]
    async fn test_offline_ip_cascade_is_neutral() {
        let outcome = offline_client().verify_ip("203.0.113.7").await;
        assert_eq!(outcome.country_code, "UNKNOWN");
        assert!(!outcome.is_vpn && !outcome.is_tor);
        assert_eq!(outcome.source, VerificationSource::LocalFallback);
    }

    #[tokio::test]
    async fn test_unreachable_remote_falls_back_locally() {
        // A configured key with an unroutable endpoint: the cascade must
        // swallow the connection error and land on the local verdict.
        let config = DetectorConfig {
            abstract_api_key: Some("test-key".to_string()),
            email_api_url: "http://127.0.0.1:1/unreachable".to_string(),
            request_timeout_secs: 1,
            ..DetectorConfig::default()
        };
        let client = VerifyClient::new(&config);

        let outcome = client.verify_email("john@example.com").await;
        assert_eq!(outcome.source, VerificationSource::LocalFallback);
        assert!(outcome.valid);
    }
}
