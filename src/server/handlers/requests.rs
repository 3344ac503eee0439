use axum::extract::{Extension, Json, Path};

use crate::api::{DynAPI, ResolvedPath};
use crate::board::filter_requests;
use crate::entities::RideRequest;
use crate::error::{invalid_input_error, Error};
use crate::server::SharedFilter;

/// Open requests, narrowed by the saved radius filter. Requests whose
/// origin cannot be measured stay in the response.
pub async fn list(
    Extension(api): Extension<DynAPI>,
    Extension(filter): Extension<SharedFilter>,
) -> Result<Json<Vec<RideRequest>>, Error> {
    let requests = api.list_open_requests().await?;

    let selection = filter
        .lock()
        .unwrap_or_else(|p| p.into_inner())
        .current()
        .cloned();

    let visible: Vec<RideRequest> = filter_requests(&requests, selection.as_ref())
        .into_iter()
        .cloned()
        .collect();

    Ok(visible.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<String>,
) -> Result<Json<RideRequest>, Error> {
    let request = api.find_request(&id).await?;

    Ok(request.into())
}

#[axum_macros::debug_handler]
pub async fn resolve_path(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<String>,
) -> Result<Json<ResolvedPath>, Error> {
    let request = api.find_request(&id).await?;
    let route = request.parsed_route().ok_or_else(invalid_input_error)?;
    let path = api.resolve_route(&route).await?;

    Ok(path.into())
}
