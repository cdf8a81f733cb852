//! Senapoti HTTP Routes
//!
//! Leadership hierarchy endpoints backed by [`RoleTransitionEngine`].
//! Authentication happens upstream; the caller's id arrives in `X-Actor-Id`.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json, Path, Query, State},
    http::HeaderMap,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use super::errors::ApiError;
use crate::hierarchy::{
    ActorId, DemoteRequest, DevoteeId, DevoteeNode, HistoryPage, LeadershipRole, PromoteRequest,
    RankGroup, RemoveRoleRequest, RoleChangeResult, RoleOptions, RoleTransitionEngine,
    TransferResult, TransferSubordinatesRequest,
};
use crate::store::MemoryDirectory;

/// Header carrying the authenticated caller's id.
pub const ACTOR_HEADER: &str = "x-actor-id";

const DEFAULT_HISTORY_PAGE_SIZE: usize = 20;

/// Shared hierarchy state
pub struct SenapotiState {
    pub engine: RoleTransitionEngine<MemoryDirectory>,
}

impl SenapotiState {
    pub fn new(engine: RoleTransitionEngine<MemoryDirectory>) -> Self {
        Self { engine }
    }
}

/// Senapoti routes with shared state
pub fn senapoti_routes(state: Arc<SenapotiState>) -> Router {
    Router::new()
        .route("/promote", post(promote_handler))
        .route("/demote", post(demote_handler))
        .route("/remove-role", post(remove_role_handler))
        .route("/transfer-subordinates", post(transfer_handler))
        .route(
            "/available-supervisors/:district/:role",
            get(available_supervisors_handler),
        )
        .route("/subordinates/:id", get(direct_subordinates_handler))
        .route("/subordinates/:id/all", get(all_subordinates_handler))
        .route("/role-history/:id", get(role_history_handler))
        .route("/role-options/:id", get(role_options_handler))
        .route("/leaders", get(leaders_handler))
        .with_state(state)
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorQuery {
    /// Comma-separated ids, e.g. `1,2,3`
    #[serde(default)]
    pub exclude_ids: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub size: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorsResponse {
    pub district_code: String,
    pub target_role: LeadershipRole,
    pub supervisors: Vec<DevoteeNode>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubordinatesResponse {
    pub devotee_id: DevoteeId,
    pub subordinates: Vec<DevoteeNode>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllSubordinatesResponse {
    pub devotee_id: DevoteeId,
    pub all_subordinates: Vec<DevoteeNode>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadersResponse {
    pub ranks: Vec<RankGroup>,
    pub top_level: Vec<DevoteeNode>,
}

// ==================
// Helpers
// ==================

fn actor_id(headers: &HeaderMap) -> Result<ActorId, ApiError> {
    let raw = headers
        .get(ACTOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing X-Actor-Id header"))?;

    raw.trim()
        .parse()
        .map_err(|_| ApiError::unauthorized("Invalid X-Actor-Id header"))
}

fn parse_id_list(raw: Option<&str>) -> Result<Vec<DevoteeId>, ApiError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse()
                .map_err(|_| ApiError::bad_request(format!("Invalid devotee id: {}", s)))
        })
        .collect()
}

// ==================
// Mutation Handlers
// ==================

async fn promote_handler(
    State(state): State<Arc<SenapotiState>>,
    headers: HeaderMap,
    body: Result<Json<PromoteRequest>, JsonRejection>,
) -> Result<Json<RoleChangeResult>, ApiError> {
    let actor = actor_id(&headers)?;
    let Json(request) = body?;
    Ok(Json(state.engine.promote(&request, actor)?))
}

async fn demote_handler(
    State(state): State<Arc<SenapotiState>>,
    headers: HeaderMap,
    body: Result<Json<DemoteRequest>, JsonRejection>,
) -> Result<Json<RoleChangeResult>, ApiError> {
    let actor = actor_id(&headers)?;
    let Json(request) = body?;
    Ok(Json(state.engine.demote(&request, actor)?))
}

async fn remove_role_handler(
    State(state): State<Arc<SenapotiState>>,
    headers: HeaderMap,
    body: Result<Json<RemoveRoleRequest>, JsonRejection>,
) -> Result<Json<RoleChangeResult>, ApiError> {
    let actor = actor_id(&headers)?;
    let Json(request) = body?;
    Ok(Json(state.engine.remove_role(&request, actor)?))
}

async fn transfer_handler(
    State(state): State<Arc<SenapotiState>>,
    headers: HeaderMap,
    body: Result<Json<TransferSubordinatesRequest>, JsonRejection>,
) -> Result<Json<TransferResult>, ApiError> {
    let actor = actor_id(&headers)?;
    let Json(request) = body?;
    Ok(Json(state.engine.transfer_subordinates(&request, actor)?))
}

// ==================
// Query Handlers
// ==================

async fn available_supervisors_handler(
    State(state): State<Arc<SenapotiState>>,
    Path((district, role)): Path<(String, String)>,
    Query(query): Query<SupervisorQuery>,
) -> Result<Json<SupervisorsResponse>, ApiError> {
    let target_role: LeadershipRole = role
        .parse()
        .map_err(|e: crate::hierarchy::UnknownRole| ApiError::bad_request(e.to_string()))?;
    let exclude_ids = parse_id_list(query.exclude_ids.as_deref())?;

    let supervisors = state
        .engine
        .available_supervisors(Some(&district), target_role, &exclude_ids)?;

    Ok(Json(SupervisorsResponse {
        district_code: district,
        target_role,
        supervisors,
    }))
}

async fn direct_subordinates_handler(
    State(state): State<Arc<SenapotiState>>,
    Path(id): Path<DevoteeId>,
) -> Result<Json<SubordinatesResponse>, ApiError> {
    let subordinates = state.engine.direct_subordinates(id)?;
    Ok(Json(SubordinatesResponse {
        devotee_id: id,
        count: subordinates.len(),
        subordinates,
    }))
}

async fn all_subordinates_handler(
    State(state): State<Arc<SenapotiState>>,
    Path(id): Path<DevoteeId>,
) -> Result<Json<AllSubordinatesResponse>, ApiError> {
    let all = state.engine.all_subordinates(id)?;
    Ok(Json(AllSubordinatesResponse {
        devotee_id: id,
        count: all.len(),
        all_subordinates: all,
    }))
}

async fn role_history_handler(
    State(state): State<Arc<SenapotiState>>,
    Path(id): Path<DevoteeId>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryPage>, ApiError> {
    let page = query.page.unwrap_or(0);
    let size = query.size.unwrap_or(DEFAULT_HISTORY_PAGE_SIZE);
    Ok(Json(state.engine.role_history(id, page, size)?))
}

async fn role_options_handler(
    State(state): State<Arc<SenapotiState>>,
    Path(id): Path<DevoteeId>,
) -> Result<Json<RoleOptions>, ApiError> {
    Ok(Json(state.engine.role_options(id)?))
}

async fn leaders_handler(
    State(state): State<Arc<SenapotiState>>,
) -> Result<Json<LeadersResponse>, ApiError> {
    Ok(Json(LeadersResponse {
        ranks: state.engine.leaders_by_rank()?,
        top_level: state.engine.top_level_leaders()?,
    }))
}
