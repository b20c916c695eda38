//! gRPC service implementations.

mod health;
mod note;
pub mod status;

pub use health::HealthGateway;
pub use note::NoteGateway;

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use notra_service::{
        BatchConfig, BatchOrchestrator, FailurePolicy, InferenceService, MockProvider,
    };
    use tokio::net::TcpListener;
    use tokio_stream::wrappers::TcpListenerStream;
    use tonic::metadata::MetadataValue;
    use tonic::transport::Server;
    use tonic::{Code, Request};

    use super::*;
    use crate::auth::{API_KEY_METADATA, Authenticator};
    use crate::proto::health_service_client::HealthServiceClient;
    use crate::proto::health_service_server::HealthServiceServer;
    use crate::proto::note_service_client::NoteServiceClient;
    use crate::proto::note_service_server::NoteServiceServer;
    use crate::proto::{
        GenerateNotesRequest, HealthRequest, HelloRequest, NoteItem, generated_note,
    };

    async fn spawn_gateway(
        provider: MockProvider,
        policy: FailurePolicy,
        health_requires_auth: bool,
    ) -> SocketAddr {
        let authenticator = Authenticator::new(["test-key".to_owned()]);
        let orchestrator = BatchOrchestrator::new(
            InferenceService::from_provider(provider),
            BatchConfig::default(),
        );
        let note_gateway = NoteGateway::new(orchestrator, policy);
        let health_gateway = HealthGateway::new(authenticator.clone(), health_requires_auth);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let incoming = TcpListenerStream::new(listener);

        tokio::spawn(async move {
            Server::builder()
                .add_service(NoteServiceServer::with_interceptor(
                    note_gateway,
                    authenticator,
                ))
                .add_service(HealthServiceServer::new(health_gateway))
                .serve_with_incoming(incoming)
                .await
                .unwrap();
        });

        address
    }

    fn authed<T>(message: T) -> Request<T> {
        let mut request = Request::new(message);
        request
            .metadata_mut()
            .insert(API_KEY_METADATA, MetadataValue::from_static("test-key"));
        request
    }

    fn item(id: &str, label: &str) -> NoteItem {
        NoteItem {
            id: id.to_owned(),
            label: label.to_owned(),
            guide: "Write the section.".to_owned(),
            sample: String::new(),
        }
    }

    #[tokio::test]
    async fn authenticated_hello_round_trip() {
        let address = spawn_gateway(MockProvider::default(), FailurePolicy::Partial, false).await;
        let mut client = NoteServiceClient::connect(format!("http://{address}"))
            .await
            .unwrap();

        let response = client
            .say_hello(authed(HelloRequest {
                name: "Ada".to_owned(),
            }))
            .await
            .unwrap();

        assert_eq!(
            response.into_inner().message,
            "Hello Ada! This is the Notra gRPC service."
        );
    }

    #[tokio::test]
    async fn unauthenticated_call_never_reaches_handler() {
        let provider = MockProvider::default();
        let address = spawn_gateway(provider.clone(), FailurePolicy::Partial, false).await;
        let mut client = NoteServiceClient::connect(format!("http://{address}"))
            .await
            .unwrap();

        let mut request = Request::new(GenerateNotesRequest {
            items: vec![item("a", "L1")],
            language: String::new(),
        });
        request
            .metadata_mut()
            .insert(API_KEY_METADATA, MetadataValue::from_static("wrong-key"));

        let status = client.generate_notes(request).await.unwrap_err();
        assert_eq!(status.code(), Code::Unauthenticated);
        assert_eq!(status.message(), "Invalid API key");
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_key_is_rejected_with_the_same_message() {
        let address = spawn_gateway(MockProvider::default(), FailurePolicy::Partial, false).await;
        let mut client = NoteServiceClient::connect(format!("http://{address}"))
            .await
            .unwrap();

        let status = client
            .say_hello(Request::new(HelloRequest {
                name: "Ada".to_owned(),
            }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), Code::Unauthenticated);
        assert_eq!(status.message(), "Invalid API key");
    }

    #[tokio::test]
    async fn generate_notes_preserves_order_and_identity() {
        let provider = MockProvider::with_reply_prefix("V");
        let address = spawn_gateway(provider, FailurePolicy::Partial, false).await;
        let mut client = NoteServiceClient::connect(format!("http://{address}"))
            .await
            .unwrap();

        let response = client
            .generate_notes(authed(GenerateNotesRequest {
                items: vec![item("a", "L1"), item("b", "L2")],
                language: "en-US".to_owned(),
            }))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(response.items.len(), 2);
        assert_eq!(response.items[0].id, "a");
        assert_eq!(
            response.items[0].outcome,
            Some(generated_note::Outcome::Value("VL1".to_owned()))
        );
        assert_eq!(response.items[1].id, "b");
        assert_eq!(
            response.items[1].outcome,
            Some(generated_note::Outcome::Value("VL2".to_owned()))
        );
    }

    #[tokio::test]
    async fn empty_batch_returns_empty_response() {
        let provider = MockProvider::default();
        let address = spawn_gateway(provider.clone(), FailurePolicy::Partial, false).await;
        let mut client = NoteServiceClient::connect(format!("http://{address}"))
            .await
            .unwrap();

        let response = client
            .generate_notes(authed(GenerateNotesRequest {
                items: Vec::new(),
                language: String::new(),
            }))
            .await
            .unwrap()
            .into_inner();

        assert!(response.items.is_empty());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn duplicate_ids_are_rejected_before_any_provider_call() {
        let provider = MockProvider::default();
        let address = spawn_gateway(provider.clone(), FailurePolicy::Partial, false).await;
        let mut client = NoteServiceClient::connect(format!("http://{address}"))
            .await
            .unwrap();

        let status = client
            .generate_notes(authed(GenerateNotesRequest {
                items: vec![item("a", "L1"), item("a", "L2")],
                language: String::new(),
            }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn failed_items_are_marked_in_place() {
        let provider = MockProvider::with_fail_label("L2");
        let address = spawn_gateway(provider, FailurePolicy::Partial, false).await;
        let mut client = NoteServiceClient::connect(format!("http://{address}"))
            .await
            .unwrap();

        let response = client
            .generate_notes(authed(GenerateNotesRequest {
                items: vec![item("a", "L1"), item("b", "L2"), item("c", "L3")],
                language: String::new(),
            }))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(response.items.len(), 3);
        match &response.items[1].outcome {
            Some(generated_note::Outcome::Error(error)) => {
                assert_eq!(error.kind, "provider_unavailable");
            }
            other => panic!("expected an error outcome, got {other:?}"),
        }
        assert!(matches!(
            response.items[0].outcome,
            Some(generated_note::Outcome::Value(_))
        ));
        assert!(matches!(
            response.items[2].outcome,
            Some(generated_note::Outcome::Value(_))
        ));
    }

    #[tokio::test]
    async fn atomic_policy_escalates_item_failures() {
        let provider = MockProvider::with_fail_label("L2");
        let address = spawn_gateway(provider, FailurePolicy::Atomic, false).await;
        let mut client = NoteServiceClient::connect(format!("http://{address}"))
            .await
            .unwrap();

        let status = client
            .generate_notes(authed(GenerateNotesRequest {
                items: vec![item("a", "L1"), item("b", "L2")],
                language: String::new(),
            }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), Code::Unavailable);
        assert!(status.message().contains("item b"));
    }

    #[tokio::test]
    async fn unsupported_language_is_invalid_argument() {
        let address = spawn_gateway(MockProvider::default(), FailurePolicy::Partial, false).await;
        let mut client = NoteServiceClient::connect(format!("http://{address}"))
            .await
            .unwrap();

        let status = client
            .generate_notes(authed(GenerateNotesRequest {
                items: vec![item("a", "L1")],
                language: "fr-FR".to_owned(),
            }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn health_is_open_by_default() {
        let address = spawn_gateway(MockProvider::default(), FailurePolicy::Partial, false).await;
        let mut client = HealthServiceClient::connect(format!("http://{address}"))
            .await
            .unwrap();

        let response = client.health(Request::new(HealthRequest {})).await.unwrap();
        assert_eq!(response.into_inner().message, "Healthy");
    }

    #[tokio::test]
    async fn health_can_be_locked_down() {
        let address = spawn_gateway(MockProvider::default(), FailurePolicy::Partial, true).await;
        let mut client = HealthServiceClient::connect(format!("http://{address}"))
            .await
            .unwrap();

        let status = client
            .health(Request::new(HealthRequest {}))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::Unauthenticated);

        let response = client.health(authed(HealthRequest {})).await.unwrap();
        assert_eq!(response.into_inner().message, "Healthy");
    }

    #[tokio::test]
    async fn authenticated_health_always_requires_a_key() {
        let address = spawn_gateway(MockProvider::default(), FailurePolicy::Partial, false).await;
        let mut client = HealthServiceClient::connect(format!("http://{address}"))
            .await
            .unwrap();

        let status = client
            .health_with_authentication(Request::new(HealthRequest {}))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::Unauthenticated);

        let response = client
            .health_with_authentication(authed(HealthRequest {}))
            .await
            .unwrap();
        assert_eq!(response.into_inner().message, "Healthy");
    }
}
