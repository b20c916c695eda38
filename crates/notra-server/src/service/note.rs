use notra_core::{Capability, ErrorKind, Language};
use notra_service::{
    BatchOrchestrator, FailurePolicy, NoteBatch, NoteOutcome, NoteRequest, ProviderResult,
};
use tonic::{Request, Response, Status};

use crate::auth::AuthContext;
use crate::proto::note_service_server::NoteService;
use crate::proto::{
    GenerateNotesRequest, GenerateNotesResponse, GeneratedNote, HelloRequest, HelloResponse,
    NoteError, generated_note,
};
use crate::service::status::{error_to_status, failure_status};
use crate::utility::tracing_targets::TRACING_TARGET_NOTES;

/// gRPC surface for note generation.
///
/// Registered behind the authentication interceptor; handlers only see
/// requests that already passed the key check.
#[derive(Debug, Clone)]
pub struct NoteGateway {
    orchestrator: BatchOrchestrator,
    policy: FailurePolicy,
}

impl NoteGateway {
    /// Creates the gateway.
    pub fn new(orchestrator: BatchOrchestrator, policy: FailurePolicy) -> Self {
        Self {
            orchestrator,
            policy,
        }
    }
}

#[tonic::async_trait]
impl NoteService for NoteGateway {
    async fn say_hello(
        &self,
        request: Request<HelloRequest>,
    ) -> Result<Response<HelloResponse>, Status> {
        let caller = request
            .extensions()
            .get::<AuthContext>()
            .and_then(AuthContext::caller)
            .unwrap_or("unknown")
            .to_owned();
        let name = request.into_inner().name;

        tracing::debug!(target: TRACING_TARGET_NOTES, caller = %caller, "Greeting request");
        Ok(Response::new(HelloResponse {
            message: format!("Hello {name}! This is the Notra gRPC service."),
        }))
    }

    async fn generate_notes(
        &self,
        request: Request<GenerateNotesRequest>,
    ) -> Result<Response<GenerateNotesResponse>, Status> {
        let message = request.into_inner();
        let language = parse_language(&message.language)?;
        let items: Vec<NoteRequest> = message
            .items
            .into_iter()
            .map(|item| {
                NoteRequest::new(item.id, item.label)
                    .with_guide(item.guide)
                    .with_sample(item.sample)
            })
            .collect();
        let batch = NoteBatch::from_items(items).with_language(language);

        tracing::debug!(
            target: TRACING_TARGET_NOTES,
            batch_id = %batch.batch_id,
            items = batch.len(),
            language = %language,
            "Generating notes"
        );

        let outcomes = self
            .orchestrator
            .process(batch, Capability::TextGeneration)
            .await
            .map_err(|error| error_to_status(&error))?;

        if self.policy == FailurePolicy::Atomic
            && let Some(failed) = outcomes.iter().find(|outcome| !outcome.is_success())
        {
            let kind = failed.result.error_kind().unwrap_or(ErrorKind::Internal);
            let message = failed
                .result
                .error_message()
                .unwrap_or("note generation failed");
            return Err(failure_status(kind, format!("item {}: {message}", failed.id)));
        }

        let items = outcomes.into_iter().map(note_to_proto).collect();
        Ok(Response::new(GenerateNotesResponse { items }))
    }
}

fn parse_language(tag: &str) -> Result<Language, Status> {
    if tag.is_empty() {
        return Ok(Language::default());
    }
    tag.parse()
        .map_err(|_| Status::invalid_argument(format!("unsupported language: {tag}")))
}

fn note_to_proto(outcome: NoteOutcome) -> GeneratedNote {
    let result = match outcome.result {
        ProviderResult::Success { value } => generated_note::Outcome::Value(value),
        ProviderResult::Failure { kind, message } => {
            generated_note::Outcome::Error(NoteError {
                kind: kind.as_ref().to_owned(),
                message,
            })
        }
    };
    GeneratedNote {
        id: outcome.id,
        label: outcome.label,
        outcome: Some(result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language() {
        assert_eq!(parse_language("").unwrap(), Language::Vietnamese);
        assert_eq!(parse_language("vi-VN").unwrap(), Language::Vietnamese);
        assert_eq!(parse_language("en-US").unwrap(), Language::English);
        assert!(parse_language("fr-FR").is_err());
    }

    #[test]
    fn test_note_to_proto_success() {
        let outcome = NoteOutcome::success("a", "Summary", "Generated note.");
        let proto = note_to_proto(outcome);

        assert_eq!(proto.id, "a");
        assert_eq!(proto.label, "Summary");
        assert_eq!(
            proto.outcome,
            Some(generated_note::Outcome::Value("Generated note.".to_owned()))
        );
    }

    #[test]
    fn test_note_to_proto_failure_uses_stable_kind() {
        let error = notra_core::Error::provider_timeout().with_message("deadline exceeded");
        let outcome = NoteOutcome::failure("a", "Summary", &error);
        let proto = note_to_proto(outcome);

        match proto.outcome {
            Some(generated_note::Outcome::Error(note_error)) => {
                assert_eq!(note_error.kind, "provider_timeout");
                assert!(note_error.message.contains("deadline exceeded"));
            }
            other => panic!("expected an error outcome, got {other:?}"),
        }
    }
}
