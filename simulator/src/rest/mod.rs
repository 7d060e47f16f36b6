use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use dht22_dashboard_shared::{SensorReading, SENSOR_PATH, TESTPOST_PATH};
use log::{debug, info, warn};
use tokio::time::sleep;
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::{sensor::SimulatedSensor, Configuration, SimulatorError};

/// How the simulated device misbehaves.
struct Behaviour {
    response_delay: Duration,
    error_every: Option<u64>,
    sensor_requests: AtomicU64,
}

impl Behaviour {
    fn from_configuration(config: &Configuration) -> Self {
        Self {
            response_delay: Duration::from_millis(config.response_delay_ms),
            error_every: config.error_every.filter(|every| *every > 0),
            sensor_requests: AtomicU64::new(0),
        }
    }

    async fn delay(&self) {
        if !self.response_delay.is_zero() {
            sleep(self.response_delay).await;
        }
    }

    /// Counts a sensor request, true if it is one of those to fail.
    fn next_fails(&self) -> bool {
        let request = self.sensor_requests.fetch_add(1, Ordering::Relaxed) + 1;
        self.error_every.is_some_and(|every| request % every == 0)
    }
}

#[derive(Clone)]
struct AppState {
    sensor: Arc<SimulatedSensor>,
    behaviour: Arc<Behaviour>,
}

pub(crate) async fn serve_rest_endpoint(
    sensor: SimulatedSensor,
    config: &Configuration,
) -> Result<(), SimulatorError> {
    let listener = tokio::net::TcpListener::bind(&config.listen).await?;
    info!("Listening on {}", listener.local_addr()?);
    let app_state = AppState {
        sensor: Arc::new(sensor),
        behaviour: Arc::new(Behaviour::from_configuration(config)),
    };

    let app = Router::new()
        .route(SENSOR_PATH, get(sensor_json))
        .route(TESTPOST_PATH, post(testpost))
        .layer(CorsLayer::permissive())
        .fallback_service(ServeDir::new(config.static_dir.clone()))
        .with_state(app_state);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn sensor_json(
    State(state): State<AppState>,
) -> Result<Json<SensorReading>, StatusCode> {
    state.behaviour.delay().await;
    if state.behaviour.next_fails() {
        warn!("Failing sensor request on purpose");
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let reading = state.sensor.current();
    debug!("{reading:?}");
    Ok(Json(reading))
}

async fn testpost(State(state): State<AppState>, body: String) -> String {
    state.behaviour.delay().await;
    info!("Test POST with {} bytes", body.len());
    format!("Received {} bytes: {}", body.len(), body)
}
