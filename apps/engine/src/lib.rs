//! Resume fraud detection core: combines contact-information
//! verification, AI-generated-content likelihood, and document-metadata
//! authenticity into one weighted risk assessment.
//!
//! The transport layer (upload handling, routing, rate limiting) and
//! document parsing (PDF/DOCX extraction) live outside this crate; the
//! [`FraudDetector`] expects already-validated text and already-extracted
//! metadata, and exposes four operations: [`FraudDetector::verify_contact`],
//! [`FraudDetector::analyze_content`], [`FraudDetector::examine_document`],
//! and [`FraudDetector::detect`].

pub mod aggregate;
pub mod ai_content;
pub mod config;
pub mod contact;
pub mod detector;
pub mod document;
pub mod errors;
pub mod models;

pub use aggregate::{AggregationEngine, FraudReport, RiskLevel};
pub use ai_content::{AiContentAnalyzer, AiContentSignal, PatternAnalyzer};
pub use config::{DetectorConfig, RiskThresholds, ScoringWeights};
pub use contact::{ContactSignal, VerificationSource};
pub use detector::FraudDetector;
pub use document::DocumentSignal;
pub use errors::{AnalyzerError, CascadeFailure, ExtractionError};
pub use models::{DocumentKind, DocumentMetadata, ExtractedDocument, MetadataDate};
