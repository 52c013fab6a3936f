//! Request handlers.

use crate::{ApiError, ApiState};
use alloy_primitives::B256;
use axum::{
    Json,
    extract::{Path, RawQuery, State, rejection::PathRejection},
    http::{HeaderMap, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use kona_archive_beacon::BeaconClient;
use kona_archive_primitives::BlockId;
use kona_archive_storage::BlobStorage;

/// The blob sidecars route.
pub const BLOB_SIDECARS_ROUTE: &str = "/eth/v1/beacon/blob_sidecars/:block_id";

/// The liveness route.
pub const HEALTHZ_ROUTE: &str = "/healthz";

/// The media type of SSZ encoded responses.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Always answers `200 OK`.
pub(crate) async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Serves the archived blob sidecars of a block.
pub(crate) async fn blob_sidecars<B, S>(
    State(state): State<ApiState<B, S>>,
    path: Result<Path<String>, PathRejection>,
    RawQuery(query): RawQuery,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, ApiError>
where
    B: BeaconClient + 'static,
    S: BlobStorage + 'static,
{
    let raw_id = match path {
        Ok(Path(raw_id)) => raw_id,
        Err(rejection) => {
            // The segment did not decode, so report it as sent.
            let raw_id = uri.path().rsplit('/').next().unwrap_or_default().to_string();
            kona_macros::inc!(counter, crate::Metrics::BLOCK_ID_REQUESTS_TOTAL, "type" => "invalid");
            debug!(target: "archive_api", raw = %raw_id, %rejection, "Rejected undecodable block id");
            return Err(ApiError::InvalidBlockId(raw_id));
        }
    };

    let block_id = match raw_id.parse::<BlockId>() {
        Ok(block_id) => block_id,
        Err(err) => {
            kona_macros::inc!(counter, crate::Metrics::BLOCK_ID_REQUESTS_TOTAL, "type" => "invalid");
            debug!(target: "archive_api", raw = %raw_id, "Rejected invalid block id");
            return Err(err.into());
        }
    };
    kona_macros::inc!(counter, crate::Metrics::BLOCK_ID_REQUESTS_TOTAL, "type" => block_id.kind());

    let indices = parse_indices(query.as_deref())?;
    let root = resolve_root(&state, &block_id).await?;
    let mut sidecars = state.storage.read(root).await?.blob_sidecars;

    if let Some(indices) = indices {
        sidecars.retain_indices(&indices);
    }

    debug!(
        target: "archive_api",
        block_id = %block_id,
        root = %root,
        blobs = sidecars.len(),
        "Serving blob sidecars",
    );

    if accepts_ssz(&headers) {
        Ok(([(header::CONTENT_TYPE, OCTET_STREAM)], sidecars.to_ssz_bytes()).into_response())
    } else {
        Ok(Json(sidecars).into_response())
    }
}

/// Maps a block id to the root of the block.
///
/// Hashes are used as-is since they already are storage keys. Slots and names are resolved by the
/// beacon node.
async fn resolve_root<B, S>(state: &ApiState<B, S>, block_id: &BlockId) -> Result<B256, ApiError>
where
    B: BeaconClient,
    S: BlobStorage,
{
    match block_id {
        BlockId::Hash(root) => Ok(*root),
        _ => Ok(state.beacon.block_header(block_id).await?.root),
    }
}

/// Collects the `indices` query parameter.
///
/// Accepts comma separated lists, repeated parameters, or both. Returns `None` if no index was
/// requested.
fn parse_indices(query: Option<&str>) -> Result<Option<Vec<u64>>, ApiError> {
    let Some(query) = query else {
        return Ok(None);
    };

    let mut indices = Vec::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if key != "indices" {
            continue;
        }
        for raw in value.split(',').map(str::trim).filter(|raw| !raw.is_empty()) {
            let index = raw.parse().map_err(|_| ApiError::InvalidIndex(raw.to_string()))?;
            indices.push(index);
        }
    }

    Ok((!indices.is_empty()).then_some(indices))
}

/// Returns `true` if any media range of the `Accept` header is `application/octet-stream` with a
/// non-zero quality.
fn accepts_ssz(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|range| {
            let mut parts = range.split(';').map(str::trim);
            let media = parts.next().unwrap_or_default();
            media.eq_ignore_ascii_case(OCTET_STREAM) && !parts.any(is_zero_quality)
        })
}

/// Returns `true` for a `q=0` media range parameter.
fn is_zero_quality(param: &str) -> bool {
    let Some((name, value)) = param.split_once('=') else {
        return false;
    };
    name.trim().eq_ignore_ascii_case("q") && value.trim().parse::<f32>().is_ok_and(|q| q == 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use rstest::rstest;

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("foo=1"), None)]
    #[case(Some("indices=1"), Some(vec![1]))]
    #[case(Some("indices=0,2"), Some(vec![0, 2]))]
    #[case(Some("indices=0&indices=3"), Some(vec![0, 3]))]
    #[case(Some("indices=0%2C1"), Some(vec![0, 1]))]
    #[case(Some("indices="), None)]
    fn test_parse_indices(#[case] query: Option<&str>, #[case] expected: Option<Vec<u64>>) {
        assert_eq!(parse_indices(query).unwrap(), expected);
    }

    #[test]
    fn test_parse_indices_invalid() {
        let err = parse_indices(Some("indices=1,x")).unwrap_err();
        assert_eq!(err.to_string(), "invalid index: x");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[case(None, false)]
    #[case(Some("application/json"), false)]
    #[case(Some("*/*"), false)]
    #[case(Some("application/octet-stream"), true)]
    #[case(Some("Application/Octet-Stream"), true)]
    #[case(Some("application/json;q=0.5, application/octet-stream"), true)]
    #[case(Some("application/octet-stream;q=0.9"), true)]
    #[case(Some("application/octet-stream;q=0"), false)]
    #[case(Some("application/octet-stream; Q=0.000"), false)]
    #[case(Some("application/octet-stream;q=0, application/json"), false)]
    #[case(Some("application/json, application/octet-stream;q=0.1"), true)]
    fn test_accepts_ssz(#[case] accept: Option<&'static str>, #[case] expected: bool) {
        let mut headers = HeaderMap::new();
        if let Some(accept) = accept {
            headers.insert(header::ACCEPT, HeaderValue::from_static(accept));
        }
        assert_eq!(accepts_ssz(&headers), expected);
    }
}
