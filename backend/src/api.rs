use std::{sync::Mutex, time::Duration};

use actix_cors::Cors;
use actix_web::{
    error::{ErrorBadRequest, ErrorInternalServerError},
    get,
    http::header,
    post,
    web::{self, Data},
    App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use common::{
    req::{DataResponse, HealthResponse, HistoryResponse, IngestRequest, IngestResponse},
    Alert, Classifier, FeedEvent, SafetyTier,
};
use log::{info, warn};

use crate::{
    config::Config,
    db::{Db, NewGasReading, NewNotification, SensorRow, UNKNOWN},
    feed::Feed,
    utils,
};

/// Number of readings returned by `GET /api/data`.
const LATEST_LIMIT: i64 = 100;

pub struct AppState {
    pub db: Mutex<Db>,
    pub feed: Feed,
    pub classifier: Classifier,
}

impl AppState {
    pub fn new(db: Db, classifier: Classifier) -> Self {
        Self {
            db: Mutex::new(db),
            feed: Feed::new(),
            classifier,
        }
    }

    fn db(&self) -> actix_web::Result<std::sync::MutexGuard<'_, Db>> {
        self.db
            .lock()
            .map_err(|_| ErrorInternalServerError("database unavailable"))
    }

    /// Stores one device upload and publishes it to the live feed.
    ///
    /// The database lock is held until the reading and its alerts are
    /// published, so the feed order is the commit order and the alerts of a
    /// reading directly follow it.
    fn ingest(
        &self,
        request: IngestRequest,
        ip_address: Option<String>,
    ) -> actix_web::Result<IngestResponse> {
        let IngestRequest {
            mut reading,
            sensor_id,
            firmware_version,
        } = request;
        reading.validate().map_err(|e| {
            warn!("Rejected reading: {e}");
            ErrorBadRequest(e)
        })?;

        let now = utils::ms_since_epoch();
        let timestamp = *reading.timestamp.get_or_insert(now);
        let sensor = sensor_id.as_deref().unwrap_or(UNKNOWN);

        let alerts: Vec<_> = self
            .classifier
            .assess(&reading)
            .filter(|level| level.tier == SafetyTier::Danger)
            .map(|level| (level, Alert::for_gas(level.gas, level.value)))
            .collect();
        let notifications: Vec<_> = alerts
            .iter()
            .map(|(level, alert)| {
                NewNotification::gas_alert(sensor, level, &alert.message, timestamp)
            })
            .collect();
        let metadata = sensor_id.as_ref().map(|id| SensorRow {
            sensor_id: id.clone(),
            last_seen: now,
            ip_address,
            firmware_version: firmware_version.unwrap_or_else(|| UNKNOWN.to_owned()),
        });

        let mut db = self.db()?;
        db.record_ingest(
            &NewGasReading::new(sensor, timestamp, &reading),
            &notifications,
            metadata.as_ref(),
        )
        .map_err(ErrorInternalServerError)?;

        self.feed.publish(FeedEvent::Reading(reading.clone()));
        for (_, alert) in &alerts {
            self.feed.publish(FeedEvent::Alert(alert.clone()));
        }
        drop(db);
        info!("Reading from {sensor} stored, {} alerts", alerts.len());

        Ok(IngestResponse {
            status: "success".to_owned(),
            received: reading,
            alerts: alerts.len(),
        })
    }
}

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("gas monitor backend")
}

#[post("/api/data")]
async fn api_ingest(
    req: HttpRequest,
    body: web::Json<IngestRequest>,
    state: Data<AppState>,
) -> actix_web::Result<impl Responder> {
    let ip_address = req.peer_addr().map(|addr| addr.ip().to_string());
    Ok(web::Json(state.ingest(body.into_inner(), ip_address)?))
}

#[get("/api/data")]
async fn api_data(state: Data<AppState>) -> actix_web::Result<impl Responder> {
    let since = utils::ms_since_epoch() - utils::MS_PER_DAY;
    let mut db = state.db()?;

    Ok(web::Json(DataResponse {
        gas_readings: db
            .latest_readings(LATEST_LIMIT)
            .map_err(ErrorInternalServerError)?,
        notifications: db
            .notifications_since(since)
            .map_err(ErrorInternalServerError)?,
        sensor_metadata: db.sensors().map_err(ErrorInternalServerError)?,
    }))
}

#[derive(serde::Deserialize, Debug)]
struct HistoryQuery {
    date: String,
    /// Minutes east of UTC of the client's local time.
    #[serde(default)]
    tz_offset_min: i32,
}

#[get("/api/history")]
async fn api_history(
    query: web::Query<HistoryQuery>,
    state: Data<AppState>,
) -> actix_web::Result<impl Responder> {
    let (from, to) =
        utils::day_bounds(&query.date, query.tz_offset_min).map_err(ErrorBadRequest)?;
    let readings = state
        .db()?
        .readings_between(from, to)
        .map_err(ErrorInternalServerError)?;

    Ok(web::Json(HistoryResponse { readings }))
}

#[get("/api/health")]
async fn api_health(state: Data<AppState>) -> actix_web::Result<HttpResponse> {
    match state.db()?.stats() {
        Ok(database_stats) => Ok(HttpResponse::Ok().json(HealthResponse {
            status: "healthy".to_owned(),
            database_stats,
        })),
        Err(e) => Ok(HttpResponse::InternalServerError().json(serde_json::json!({
            "status": "database_error",
            "error": e.to_string(),
        }))),
    }
}

#[derive(serde::Deserialize, Debug)]
struct FeedQuery {
    after: Option<u64>,
    wait_ms: Option<u64>,
}

#[get("/api/feed")]
async fn api_feed(query: web::Query<FeedQuery>, state: Data<AppState>) -> impl Responder {
    let wait = Duration::from_millis(query.wait_ms.unwrap_or(0));
    web::Json(state.feed.wait_page(query.after, wait).await)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(hello)
        .service(api_ingest)
        .service(api_data)
        .service(api_history)
        .service(api_health)
        .service(api_feed);
}

pub async fn new_http_server(state: Data<AppState>, config: &Config) -> std::io::Result<()> {
    let origin = config.frontend_origin.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(configure)
            .wrap(
                Cors::default()
                    .allowed_origin(&origin) // frontend
                    .allowed_methods(vec!["GET", "POST"])
                    .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT])
                    .allowed_header(header::CONTENT_TYPE)
                    .supports_credentials()
                    .max_age(3600),
            )
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await
}
