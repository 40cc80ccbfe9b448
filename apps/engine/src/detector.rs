//! Detector facade: wires the verification client, the AI analyzer
//! backend, and the aggregation engine together and exposes the four
//! operations the transport layer invokes with already-validated,
//! already-extracted input.

use std::sync::Arc;

use tracing::warn;

use crate::ai_content::{AiContentAnalyzer, AiContentSignal, PatternAnalyzer};
use crate::aggregate::{AggregationEngine, FraudReport};
use crate::config::DetectorConfig;
use crate::contact::{build_contact_signal, ContactSignal, VerifyClient};
use crate::document::{examine_metadata, DocumentSignal};
use crate::models::DocumentMetadata;

/// One detector per configuration. Stateless across requests: every
/// evaluation builds its signals fresh and discards them with the
/// response.
pub struct FraudDetector {
    verifier: VerifyClient,
    analyzer: Arc<dyn AiContentAnalyzer>,
    engine: AggregationEngine,
}

impl FraudDetector {
    /// Detector with the built-in pattern analyzer as the AI backend.
    pub fn new(config: DetectorConfig) -> Self {
        Self::with_analyzer(config, Arc::new(PatternAnalyzer))
    }

    /// Detector with a caller-supplied AI-content backend.
    pub fn with_analyzer(config: DetectorConfig, analyzer: Arc<dyn AiContentAnalyzer>) -> Self {
        let verifier = VerifyClient::new(&config);
        let engine = AggregationEngine::new(config.weights, config.thresholds);
        Self {
            verifier,
            analyzer,
            engine,
        }
    }

    /// Contact verification only.
    pub async fn verify_contact(&self, text: &str, client_ip: Option<&str>) -> ContactSignal {
        build_contact_signal(&self.verifier, text, client_ip).await
    }

    /// AI-content analysis only. A failed backend degrades to the
    /// inert "unavailable" signal; it never surfaces as an error.
    pub async fn analyze_content(&self, text: &str) -> AiContentSignal {
        match self.analyzer.analyze(text).await {
            Ok(signal) => signal,
            Err(err) => {
                warn!("AI content analyzer unavailable, degrading: {err}");
                AiContentSignal::unavailable()
            }
        }
    }

    /// Document-authenticity analysis only.
    pub fn examine_document(&self, metadata: &DocumentMetadata) -> DocumentSignal {
        examine_metadata(metadata)
    }

    /// Full detection: all applicable signals, aggregated. The contact
    /// and AI evaluations are independent and run concurrently; the
    /// document heuristics are pure computation and run inline.
    pub async fn detect(
        &self,
        text: &str,
        metadata: Option<&DocumentMetadata>,
        client_ip: Option<&str>,
    ) -> FraudReport {
        let (contact, ai) = tokio::join!(
            self.verify_contact(text, client_ip),
            self.analyze_content(text),
        );
        let document = metadata.map(examine_metadata);

        self.engine.aggregate(Some(contact), Some(ai), document)
    }
}
