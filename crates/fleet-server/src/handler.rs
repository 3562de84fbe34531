use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use chrono::Datelike;
use fleet_custody::{AuditReport, CarView, CustodyAuditor};
use fleet_store::FleetStore;
use fleet_types::{
    AssociationId, Branch, BranchId, BranchInventory, Car, CarId, Driver, DriverId,
    DriverInventory, NewBranch, NewCar, NewDriver,
};
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};
use crate::postcode::PostcodeCheck;
use crate::request::{reference_error, JsonObject, PathId, RentCar, ReturnCar};
use crate::state::AppState;

type Created<T> = ServerResult<(StatusCode, Json<T>)>;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Reply to a successful custody transition.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BranchCreated {
    pub message: String,
    pub branch: Branch,
}

#[derive(Debug, Serialize)]
pub struct AuditResponse {
    pub valid: bool,
    #[serde(flatten)]
    pub report: AuditReport,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

// --- cars ---

pub async fn list_cars<S: FleetStore>(
    State(state): State<AppState<S>>,
) -> ServerResult<Json<Vec<CarView>>> {
    Ok(Json(state.projector.render_all()?))
}

pub async fn get_car<S: FleetStore>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
) -> ServerResult<Json<CarView>> {
    Ok(Json(state.projector.render_car(CarId::new(id))?))
}

pub async fn create_car<S: FleetStore>(
    State(state): State<AppState<S>>,
    JsonObject(body): JsonObject,
) -> Created<Car> {
    let draft = NewCar::from_body(&body, chrono::Utc::now().year())?;
    let car = state.store.create_car(draft)?;
    tracing::info!(car = %car.id, "car created");
    Ok((StatusCode::CREATED, Json(car)))
}

pub async fn delete_car<S: FleetStore>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
) -> ServerResult<StatusCode> {
    let car = state.store.delete_car(CarId::new(id))?;
    tracing::info!(car = %car.id, "car deleted");
    Ok(StatusCode::NO_CONTENT)
}

// --- branches ---

pub async fn list_branches<S: FleetStore>(
    State(state): State<AppState<S>>,
) -> ServerResult<Json<Vec<Branch>>> {
    let branches = state
        .store
        .read(|t| t.branches().cloned().collect::<Vec<_>>())?;
    Ok(Json(branches))
}

pub async fn get_branch<S: FleetStore>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
) -> ServerResult<Json<Branch>> {
    let branch = state
        .store
        .read(|t| t.branch(BranchId::new(id)).cloned())??;
    Ok(Json(branch))
}

pub async fn create_branch<S: FleetStore>(
    State(state): State<AppState<S>>,
    JsonObject(body): JsonObject,
) -> Created<BranchCreated> {
    let draft = NewBranch::from_body(&body, state.config.default_branch_capacity)?;
    match state.postcodes.check(&draft.postcode).await {
        Ok(PostcodeCheck::Valid) => {}
        Ok(PostcodeCheck::Invalid) => return Err(ServerError::InvalidPostcode(draft.postcode)),
        Err(e) => {
            tracing::warn!(postcode = %draft.postcode, error = %e, "postcode lookup failed");
            return Err(e);
        }
    }

    let branch = state.store.create_branch(draft)?;
    tracing::info!(branch = %branch.id, capacity = branch.capacity, "branch created");
    Ok((
        StatusCode::CREATED,
        Json(BranchCreated {
            message: format!("A branch in {branch} was created successfully."),
            branch,
        }),
    ))
}

pub async fn delete_branch<S: FleetStore>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
) -> ServerResult<StatusCode> {
    let branch = state.store.delete_branch(BranchId::new(id))?;
    tracing::info!(branch = %branch.id, "branch deleted");
    Ok(StatusCode::NO_CONTENT)
}

// --- drivers ---

pub async fn list_drivers<S: FleetStore>(
    State(state): State<AppState<S>>,
) -> ServerResult<Json<Vec<Driver>>> {
    let drivers = state
        .store
        .read(|t| t.drivers().cloned().collect::<Vec<_>>())?;
    Ok(Json(drivers))
}

pub async fn get_driver<S: FleetStore>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
) -> ServerResult<Json<Driver>> {
    let driver = state
        .store
        .read(|t| t.driver(DriverId::new(id)).cloned())??;
    Ok(Json(driver))
}

pub async fn create_driver<S: FleetStore>(
    State(state): State<AppState<S>>,
    JsonObject(body): JsonObject,
) -> Created<Driver> {
    let draft = NewDriver::from_body(&body)?;
    let driver = state.store.create_driver(draft)?;
    tracing::info!(driver = %driver.id, "driver created");
    Ok((StatusCode::CREATED, Json(driver)))
}

pub async fn delete_driver<S: FleetStore>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
) -> ServerResult<StatusCode> {
    let driver = state.store.delete_driver(DriverId::new(id))?;
    tracing::info!(driver = %driver.id, "driver deleted");
    Ok(StatusCode::NO_CONTENT)
}

// --- custody transitions ---

pub async fn return_car<S: FleetStore>(
    State(state): State<AppState<S>>,
    JsonObject(body): JsonObject,
) -> Created<MessageResponse> {
    let request = ReturnCar::from_body(&body)?;
    state.store.read(|t| request.check_references(t))??;
    let outcome = state
        .transitions
        .assign_to_branch(request.car, request.branch)
        .map_err(reference_error)?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: outcome.message,
        }),
    ))
}

pub async fn list_branch_inventory<S: FleetStore>(
    State(state): State<AppState<S>>,
) -> ServerResult<Json<Vec<BranchInventory>>> {
    let rows = state
        .store
        .read(|t| t.branch_associations().copied().collect::<Vec<_>>())?;
    Ok(Json(rows))
}

pub async fn get_branch_inventory<S: FleetStore>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
) -> ServerResult<Json<BranchInventory>> {
    let row = state
        .store
        .read(|t| t.branch_association(AssociationId::new(id)).copied())??;
    Ok(Json(row))
}

pub async fn rent_car<S: FleetStore>(
    State(state): State<AppState<S>>,
    JsonObject(body): JsonObject,
) -> Created<MessageResponse> {
    let request = RentCar::from_body(&body)?;
    state.store.read(|t| request.check_references(t))??;
    let outcome = state
        .transitions
        .assign_to_driver(request.car, request.driver)
        .map_err(reference_error)?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: outcome.message,
        }),
    ))
}

pub async fn list_driver_inventory<S: FleetStore>(
    State(state): State<AppState<S>>,
) -> ServerResult<Json<Vec<DriverInventory>>> {
    let rows = state
        .store
        .read(|t| t.driver_associations().copied().collect::<Vec<_>>())?;
    Ok(Json(rows))
}

pub async fn get_driver_inventory<S: FleetStore>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
) -> ServerResult<Json<DriverInventory>> {
    let row = state
        .store
        .read(|t| t.driver_association(AssociationId::new(id)).copied())??;
    Ok(Json(row))
}

// --- audit ---

pub async fn audit<S: FleetStore>(
    State(state): State<AppState<S>>,
) -> ServerResult<Json<AuditResponse>> {
    let report = state.store.read(CustodyAuditor::audit)?;
    if !report.is_valid() {
        tracing::error!(violations = report.violations.len(), "custody audit failed");
    }
    Ok(Json(AuditResponse {
        valid: report.is_valid(),
        report,
    }))
}
