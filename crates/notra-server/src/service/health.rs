use tonic::{Request, Response, Status};

use crate::auth::Authenticator;
use crate::proto::health_service_server::HealthService;
use crate::proto::{HealthRequest, HealthResponse};
use crate::utility::tracing_targets::TRACING_TARGET_HEALTH;

/// Liveness endpoints.
///
/// Registered without the interceptor so the plain `Health` probe can
/// stay open; whether it requires a key is a deployment choice.
#[derive(Debug, Clone)]
pub struct HealthGateway {
    authenticator: Authenticator,
    health_requires_auth: bool,
}

impl HealthGateway {
    /// Creates the gateway.
    pub fn new(authenticator: Authenticator, health_requires_auth: bool) -> Self {
        Self {
            authenticator,
            health_requires_auth,
        }
    }
}

#[tonic::async_trait]
impl HealthService for HealthGateway {
    async fn health(
        &self,
        request: Request<HealthRequest>,
    ) -> Result<Response<HealthResponse>, Status> {
        if self.health_requires_auth {
            self.authenticator.require(request.metadata())?;
        }

        tracing::debug!(target: TRACING_TARGET_HEALTH, "Health check");
        Ok(Response::new(HealthResponse {
            message: "Healthy".to_owned(),
        }))
    }

    async fn health_with_authentication(
        &self,
        request: Request<HealthRequest>,
    ) -> Result<Response<HealthResponse>, Status> {
        self.authenticator.require(request.metadata())?;

        tracing::debug!(target: TRACING_TARGET_HEALTH, "Authenticated health check");
        Ok(Response::new(HealthResponse {
            message: "Healthy".to_owned(),
        }))
    }
}
