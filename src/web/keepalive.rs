use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::{error, info};

use crate::bot::data::Data;

#[derive(Debug, Serialize)]
struct StatusPayload {
    status: &'static str,
    active_confinements: usize,
}

async fn status(State(data): State<Arc<Data>>) -> Json<StatusPayload> {
    Json(StatusPayload {
        status: "ok",
        active_confinements: data.ledger.active_count(),
    })
}

/// Start the keep-alive HTTP endpoint. A bind failure is logged and the bot
/// keeps running; only the hosting platform's pinger cares about this port.
pub fn spawn(port: u16, data: Arc<Data>) {
    tokio::spawn(async move {
        let app = Router::new().route("/", get(status)).with_state(data);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => {
                info!("Keep-alive endpoint listening on {}", addr);
                if let Err(e) = axum::serve(listener, app).await {
                    error!("Keep-alive server error: {}", e);
                }
            }
            Err(e) => {
                error!("Could not bind keep-alive endpoint on {}: {}", addr, e);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_payload_shape() {
        let payload = StatusPayload {
            status: "ok",
            active_confinements: 3,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["active_confinements"], 3);
    }
}
