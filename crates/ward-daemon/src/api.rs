use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use ward_core::{
    now_ms, CitizenReport, DetectionFrame, EvidenceRef, Incident, IncidentFilter, IncidentId,
    IncidentStatus, IntakeOutcome, IssueKind, Overview, VerifyDecision, WorkerId, WorkflowError,
};
use ward_storage::IncidentStore;
use ward_workflow::{complete, dispatch, intake, query, verify};

use crate::config::DaemonConfig;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn IncidentStore>,
    pub cfg: DaemonConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn IncidentStore>, cfg: DaemonConfig) -> Self {
        Self { store, cfg }
    }
}

/// Wire form of WorkflowError. Conflict maps to 409 so clients know to
/// re-fetch before retrying; nothing here is retried server-side.
pub struct ApiError(WorkflowError);

impl From<WorkflowError> for ApiError {
    fn from(e: WorkflowError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        let code = match &self.0 {
            WorkflowError::NotFound(_) => StatusCode::NOT_FOUND,
            WorkflowError::Conflict { .. } => StatusCode::CONFLICT,
            WorkflowError::Forbidden(_) => StatusCode::FORBIDDEN,
            WorkflowError::Validation(_) => StatusCode::BAD_REQUEST,
            WorkflowError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        (code, self.0.to_string()).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssignRequest {
    pub incident_id: IncidentId,
    pub worker_id: WorkerId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompleteRequest {
    pub incident_id: IncidentId,
    pub worker_id: WorkerId,
    pub image: EvidenceRef,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub incident_id: IncidentId,
    pub decision: VerifyDecision,
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub kind: Option<String>,
    pub worker: Option<String>,
}

impl ListParams {
    fn into_filter(self) -> Result<IncidentFilter, WorkflowError> {
        let status = match self.status.as_deref() {
            None => None,
            Some(s) => Some(IncidentStatus::parse(s).ok_or_else(|| {
                WorkflowError::Validation(format!("unknown status filter: {s}"))
            })?),
        };
        Ok(IncidentFilter {
            status,
            kind: self.kind.map(IssueKind::new),
            worker: self.worker.map(WorkerId::new),
        })
    }
}

pub async fn submit_detection(
    State(state): State<AppState>,
    Json(frame): Json<DetectionFrame>,
) -> Result<Json<IntakeOutcome>, ApiError> {
    let outcome = intake::submit_detection(
        state.store.as_ref(),
        state.cfg.confidence_threshold,
        frame,
    )?;
    Ok(Json(outcome))
}

pub async fn submit_report(
    State(state): State<AppState>,
    Json(report): Json<CitizenReport>,
) -> Result<Json<Incident>, ApiError> {
    let incident = intake::submit_report(state.store.as_ref(), report)?;
    Ok(Json(incident))
}

pub async fn assign(
    State(state): State<AppState>,
    Json(req): Json<AssignRequest>,
) -> Result<Json<Incident>, ApiError> {
    let incident = dispatch::assign(state.store.as_ref(), req.incident_id, req.worker_id)?;
    Ok(Json(incident))
}

pub async fn submit_completion(
    State(state): State<AppState>,
    Json(req): Json<CompleteRequest>,
) -> Result<Json<Incident>, ApiError> {
    let incident = complete::complete(
        state.store.as_ref(),
        req.incident_id,
        req.worker_id,
        req.image,
    )?;
    Ok(Json(incident))
}

pub async fn submit_verification(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<Incident>, ApiError> {
    let incident = verify::verify(
        state.store.as_ref(),
        req.incident_id,
        req.decision,
        req.note,
    )?;
    Ok(Json(incident))
}

pub async fn list_incidents(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Incident>>, ApiError> {
    let filter = params.into_filter()?;
    Ok(Json(query::list(state.store.as_ref(), &filter)?))
}

pub async fn get_incident(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Incident>, ApiError> {
    Ok(Json(query::get(state.store.as_ref(), IncidentId(id))?))
}

pub async fn worker_tasks(
    State(state): State<AppState>,
    Path(worker): Path<String>,
) -> Result<Json<Vec<Incident>>, ApiError> {
    Ok(Json(query::worker_tasks(
        state.store.as_ref(),
        &WorkerId::new(worker),
    )?))
}

#[derive(Debug, Default, Deserialize)]
pub struct StaleParams {
    /// Cutoff in milliseconds; defaults to 24h.
    pub older_than_ms: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub overview: Overview,
    pub stale_pending: usize,
}

pub async fn stats(
    State(state): State<AppState>,
    Query(params): Query<StaleParams>,
) -> Result<Json<StatsResponse>, ApiError> {
    let overview = query::overview(state.store.as_ref())?;
    let cutoff = params.older_than_ms.unwrap_or(24 * 60 * 60 * 1000);
    let stale = query::stale_pending(state.store.as_ref(), now_ms(), cutoff)?;
    Ok(Json(StatsResponse {
        overview,
        stale_pending: stale.len(),
    }))
}
