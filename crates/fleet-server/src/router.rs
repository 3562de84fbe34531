use axum::routing::{get, MethodRouter};
use axum::Router;
use fleet_store::FleetStore;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Register `route` under `path` both with and without a trailing slash.
fn slashed<S>(
    router: Router<AppState<S>>,
    path: &str,
    route: MethodRouter<AppState<S>>,
) -> Router<AppState<S>>
where
    S: FleetStore + 'static,
{
    let trimmed = path.trim_end_matches('/');
    router
        .route(trimmed, route.clone())
        .route(&format!("{trimmed}/"), route)
}

/// Build the HTTP router with all API routes.
pub fn build_router<S: FleetStore + 'static>(state: AppState<S>) -> Router {
    let cars = get(handler::list_cars::<S>).post(handler::create_car::<S>);
    let car = get(handler::get_car::<S>).delete(handler::delete_car::<S>);
    let branches = get(handler::list_branches::<S>).post(handler::create_branch::<S>);
    let branch = get(handler::get_branch::<S>).delete(handler::delete_branch::<S>);
    let drivers = get(handler::list_drivers::<S>).post(handler::create_driver::<S>);
    let driver = get(handler::get_driver::<S>).delete(handler::delete_driver::<S>);
    let return_car = get(handler::list_branch_inventory::<S>).post(handler::return_car::<S>);
    let branch_row = get(handler::get_branch_inventory::<S>);
    let rent_car = get(handler::list_driver_inventory::<S>).post(handler::rent_car::<S>);
    let driver_row = get(handler::get_driver_inventory::<S>);

    let mut router = Router::new().route("/health", get(handler::health));
    for (path, route) in [
        ("/cars", cars),
        ("/cars/:id", car),
        ("/branches", branches),
        ("/branches/:id", branch),
        ("/drivers", drivers),
        ("/drivers/:id", driver),
        ("/return-car", return_car.clone()),
        ("/return-car/:id", branch_row.clone()),
        ("/branch-inventory", return_car),
        ("/branch-inventory/:id", branch_row),
        ("/rent-car", rent_car.clone()),
        ("/rent-car/:id", driver_row.clone()),
        ("/driver-inventory", rent_car),
        ("/driver-inventory/:id", driver_row),
        ("/audit", get(handler::audit::<S>)),
    ] {
        router = slashed(router, path, route);
    }

    router.with_state(state).layer(TraceLayer::new_for_http())
}
