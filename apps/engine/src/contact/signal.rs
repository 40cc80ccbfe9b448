//! Contact signal builder: extracts contact fields from the document
//! text, runs the verification cascade for each one present, and folds
//! the outcomes into a single risk score and confidence.

use serde::{Deserialize, Serialize};

use crate::contact::extract;
use crate::contact::verify::{
    EmailVerification, IpVerification, PhoneVerification, VerificationSource, VerifyClient,
};

/// The contact-information fraud signal for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSignal {
    pub email_verification: Option<EmailVerification>,
    pub phone_verification: Option<PhoneVerification>,
    pub ip_verification: Option<IpVerification>,
    pub risk_score: f64,
    pub confidence: f64,
    pub issues: Vec<String>,
}

/// Runs the cascade for every contact field present in `text` (and for
/// the originating IP when the transport layer supplied one and a
/// geolocation source is configured).
pub async fn build_contact_signal(
    client: &VerifyClient,
    text: &str,
    client_ip: Option<&str>,
) -> ContactSignal {
    let mut attempted_checks = 0u32;
    let mut authoritative_successes = 0u32;

    let email_verification = match extract::first_email(text) {
        Some(email) => {
            let outcome = client.verify_email(email).await;
            attempted_checks += 1;
            if outcome.source == VerificationSource::Authoritative {
                authoritative_successes += 1;
            }
            Some(outcome)
        }
        None => None,
    };

    let phone_verification = match extract::first_phone(text) {
        Some(phone) => {
            let outcome = client.verify_phone(phone).await;
            attempted_checks += 1;
            if outcome.source == VerificationSource::Authoritative {
                authoritative_successes += 1;
            }
            Some(outcome)
        }
        None => None,
    };

    let ip_verification = match client_ip {
        Some(ip) if client.has_remote_source() => {
            let outcome = client.verify_ip(ip).await;
            attempted_checks += 1;
            if outcome.source == VerificationSource::Authoritative {
                authoritative_successes += 1;
            }
            Some(outcome)
        }
        _ => None,
    };

    let risk_score = contact_risk(
        email_verification.as_ref(),
        phone_verification.as_ref(),
        ip_verification.as_ref(),
    );
    let issues = contact_issues(
        email_verification.as_ref(),
        phone_verification.as_ref(),
        ip_verification.as_ref(),
    );

    ContactSignal {
        email_verification,
        phone_verification,
        ip_verification,
        risk_score,
        confidence: verification_confidence(authoritative_successes, attempted_checks),
        issues,
    }
}

/// Additive per-finding risk, clamped to 1.0. Each finding contributes
/// independently; there is no interaction between fields.
fn contact_risk(
    email: Option<&EmailVerification>,
    phone: Option<&PhoneVerification>,
    ip: Option<&IpVerification>,
) -> f64 {
    let mut risk: f64 = 0.0;

    if let Some(email) = email {
        if !email.valid {
            risk += 0.3;
        }
        if email.disposable {
            risk += 0.5;
        }
        if !email.deliverable {
            risk += 0.2;
        }
        if email.quality_score < 0.3 {
            risk += 0.3;
        } else if email.quality_score < 0.6 {
            risk += 0.1;
        }
    }

    if let Some(phone) = phone {
        if !phone.valid {
            risk += 0.3;
        }
    }

    if let Some(ip) = ip {
        if ip.is_tor {
            risk += 0.6;
        } else if ip.is_vpn {
            risk += 0.3;
        }
        if ip.abuse_confidence > 50.0 {
            risk += 0.4;
        } else if ip.abuse_confidence > 25.0 {
            risk += 0.2;
        }
    }

    risk.clamp(0.0, 1.0)
}

fn contact_issues(
    email: Option<&EmailVerification>,
    phone: Option<&PhoneVerification>,
    ip: Option<&IpVerification>,
) -> Vec<String> {
    let mut issues = Vec::new();

    if let Some(email) = email {
        if !email.valid {
            issues.push("Invalid email format detected".to_string());
        }
        if email.disposable {
            issues.push("Disposable email address detected".to_string());
        }
        if !email.deliverable {
            issues.push("Email address may not be deliverable".to_string());
        }
    }

    if let Some(phone) = phone {
        if !phone.valid {
            issues.push("Invalid phone number format detected".to_string());
        }
    }

    if let Some(ip) = ip {
        if ip.is_tor {
            issues.push("Tor network usage detected".to_string());
        } else if ip.is_vpn {
            issues.push("VPN usage detected".to_string());
        }
        if ip.abuse_confidence > 50.0 {
            issues.push("High IP abuse confidence detected".to_string());
        }
    }

    issues
}

/// Baseline 0.5 when everything resolved locally, rising toward 0.9 as
/// every attempted cascade resolves authoritatively. Zero attempted
/// checks leave the ratio at 0 (and the confidence at the baseline).
fn verification_confidence(authoritative_successes: u32, attempted_checks: u32) -> f64 {
    let ratio = if attempted_checks == 0 {
        0.0
    } else {
        f64::from(authoritative_successes) / f64::from(attempted_checks)
    };
    (0.5 + 0.3 * ratio).clamp(0.0, 1.0)
}
