use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use jiff::Timestamp;
use notra_core::{Capability, Error, Language, Result};
use tokio::sync::Semaphore;

use super::outcome::NoteOutcome;
use super::request::{NoteBatch, NoteRequest};
use super::{BatchConfig, TRACING_TARGET};
use crate::inference::{AudioRequest, ImageRequest, ImageSource, InferenceService, TextRequest};

/// Fans a note batch out to the provider and reassembles the results.
///
/// Items are processed concurrently up to the configured limit, each
/// under its own deadline. The returned outcomes are in the same order
/// as the input items and there is exactly one outcome per item.
#[derive(Debug, Clone)]
pub struct BatchOrchestrator {
    service: InferenceService,
    config: BatchConfig,
}

impl BatchOrchestrator {
    /// Creates an orchestrator over the given service.
    pub fn new(service: InferenceService, config: BatchConfig) -> Self {
        Self { service, config }
    }

    /// The orchestrator's configuration.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Processes a batch with the given capability.
    ///
    /// The whole call fails only for invalid input; individual provider
    /// failures are carried in the corresponding outcome.
    pub async fn process(
        &self,
        batch: NoteBatch,
        capability: Capability,
    ) -> Result<Vec<NoteOutcome>> {
        batch.validate()?;
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let started_at = Timestamp::now();
        let batch_id = batch.batch_id;
        let language = batch.language();
        tracing::debug!(
            target: TRACING_TARGET,
            batch_id = %batch_id,
            items = batch.len(),
            capability = %capability,
            "Processing note batch"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));
        let futures: Vec<_> = batch
            .into_items()
            .into_iter()
            .map(|item| {
                let semaphore = Arc::clone(&semaphore);
                async move {
                    let result = match semaphore.acquire().await {
                        Ok(_permit) => self.run_item(&item, language, capability).await,
                        Err(_) => {
                            Err(Error::internal().with_message("concurrency limiter closed"))
                        }
                    };
                    if let Err(error) = &result {
                        tracing::warn!(
                            target: TRACING_TARGET,
                            batch_id = %batch_id,
                            item_id = %item.id,
                            error = %error,
                            "Note item failed"
                        );
                    }
                    NoteOutcome::from_result(item, result)
                }
            })
            .collect();

        let outcomes = futures_util::future::join_all(futures).await;
        let elapsed = Timestamp::now().duration_since(started_at);
        let failed = outcomes.iter().filter(|outcome| !outcome.is_success()).count();
        tracing::debug!(
            target: TRACING_TARGET,
            batch_id = %batch_id,
            succeeded = outcomes.len() - failed,
            failed,
            elapsed_ms = elapsed.as_millis(),
            "Note batch completed"
        );

        Ok(outcomes)
    }

    async fn run_item(
        &self,
        item: &NoteRequest,
        language: Language,
        capability: Capability,
    ) -> Result<String> {
        let deadline = self.config.item_timeout();
        match capability {
            Capability::TextGeneration => {
                let request = TextRequest::new(&item.label, &item.guide)
                    .with_input(&item.sample)
                    .with_language(language);
                let response = tokio::time::timeout(deadline, self.service.generate_text(&request))
                    .await
                    .map_err(|_| self.timeout_error(capability))??;
                Ok(response.content)
            }
            Capability::ImageAnalysis => {
                let image = decode_sample(item)?;
                let request = ImageRequest::new(&item.label, &item.guide)
                    .add_image(ImageSource::png(image))
                    .with_language(language);
                let response = tokio::time::timeout(deadline, self.service.analyze_image(&request))
                    .await
                    .map_err(|_| self.timeout_error(capability))??;
                Ok(response.content)
            }
            Capability::AudioTranscription => {
                let audio = decode_sample(item)?;
                let request = AudioRequest::new(&item.label, audio).with_language(language);
                let response =
                    tokio::time::timeout(deadline, self.service.transcribe_audio(&request))
                        .await
                        .map_err(|_| self.timeout_error(capability))??;
                Ok(response.transcript)
            }
        }
    }

    fn timeout_error(&self, capability: Capability) -> Error {
        Error::provider_timeout().with_message(format!(
            "{capability} call exceeded {}s deadline",
            self.config.item_timeout_secs
        ))
    }
}

fn decode_sample(item: &NoteRequest) -> Result<Bytes> {
    STANDARD
        .decode(item.sample.as_bytes())
        .map(Bytes::from)
        .map_err(|err| {
            Error::invalid_input()
                .with_message(format!("item {} sample is not valid base64", item.id))
                .with_source(err)
        })
}
