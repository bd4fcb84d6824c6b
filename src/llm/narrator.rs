use crate::config::NarrationConfig;
use crate::llm::prompts::{build_prompts, Language, PromptKind};
use crate::llm::types::*;
use crate::metrics::MetricsBundle;
use log::{debug, warn};
use serde::Serialize;
use std::time::Duration;

/// Turns pre-computed metrics into a narrative via a [`TextGenerator`].
///
/// Every failure degrades to a fixed fallback sentence; callers never see a
/// provider error.
///
/// The timeout uses `tokio::time`, so narration futures must be polled inside
/// a Tokio runtime with the time driver enabled (`enable_time` or
/// `enable_all`). Polling them elsewhere panics.
pub struct Narrator<G> {
    generator: G,
    timeout: Duration,
    temperature: f32,
}

impl<G: TextGenerator> Narrator<G> {
    pub fn new(generator: G, config: &NarrationConfig) -> Self {
        Self {
            generator,
            timeout: config.timeout,
            temperature: config.temperature,
        }
    }

    /// Financial-health narrative for `metrics`, in the language named by
    /// `language` (`"en"`, `"hi"`; others fall back to English).
    pub async fn narrate(
        &self,
        metrics: &MetricsBundle,
        industry: &str,
        language: impl Into<Language>,
    ) -> Narrative {
        self.narrate_payload(PromptKind::FinancialHealth, metrics, industry, language.into())
            .await
    }

    pub async fn narrate_creditworthiness(
        &self,
        metrics: &MetricsBundle,
        industry: &str,
        language: impl Into<Language>,
    ) -> Narrative {
        self.narrate_payload(PromptKind::Creditworthiness, metrics, industry, language.into())
            .await
    }

    pub async fn narrate_investor(
        &self,
        metrics: &MetricsBundle,
        industry: &str,
        language: impl Into<Language>,
    ) -> Narrative {
        self.narrate_payload(PromptKind::Investor, metrics, industry, language.into())
            .await
    }

    /// Narrates any serializable assessment payload.
    pub async fn narrate_payload<P: Serialize + ?Sized>(
        &self,
        kind: PromptKind,
        payload: &P,
        industry: &str,
        language: Language,
    ) -> Narrative {
        let metrics = match serde_json::to_value(payload) {
            Ok(value) => value,
            Err(e) => {
                warn!("Narration skipped, payload could not be serialized: {}", e);
                return Narrative::fallback(FallbackReason::InvalidInput);
            }
        };

        let (system_prompt, user_prompt) = build_prompts(kind, &metrics, industry, language);
        let request = GenerationRequest {
            system_prompt,
            user_prompt,
            temperature: self.temperature,
        };

        debug!(
            "Requesting {:?} narration ({}, industry '{}')",
            kind,
            language.code(),
            industry
        );

        match tokio::time::timeout(self.timeout, self.generator.generate(&request)).await {
            Ok(Ok(generation)) => Narrative::from(generation),
            Ok(Err(err)) => {
                warn!("Narration degraded to fallback: {}", err);
                Narrative::fallback(FallbackReason::from(&err))
            }
            Err(_) => {
                warn!("Narration timed out after {:?}", self.timeout);
                Narrative::fallback(FallbackReason::Timeout)
            }
        }
    }
}
