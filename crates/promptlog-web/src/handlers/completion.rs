//! Completion endpoint.
//! Runs the call-and-log sequence on behalf of the inbound caller.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Query, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    response::{IntoResponse, Response},
};
use promptlog_common::{ApiError, CallerContext};

use crate::state::SharedState;

const KEYWORD_PARAM: &str = "keyword";
const REQUEST_ID_PARAM: &str = "requestId";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CompletionQuery {
    /// Absent keyword is forwarded as empty user content.
    pub keyword: String,
    pub request_id: Option<String>,
}

impl CompletionQuery {
    /// Takes the first occurrence of each parameter; repeats and unknown
    /// parameters are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        let mut keyword_seen = false;
        for (name, value) in pairs {
            match name.as_str() {
                KEYWORD_PARAM if !keyword_seen => {
                    keyword_seen = true;
                    query.keyword = value;
                }
                REQUEST_ID_PARAM if query.request_id.is_none() => {
                    query.request_id = Some(value);
                }
                _ => {}
            }
        }
        query
    }
}

/// GET /api/openai?keyword=&requestId= - Proxy one completion and log it
pub async fn openai_completion(
    State(state): State<SharedState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let query = CompletionQuery::from_pairs(pairs);
    tracing::info!(keyword = %query.keyword, request_id = ?query.request_id, "Completion requested");

    let caller = CallerContext::from_headers(&headers, Some(peer));
    let completion = state
        .service
        .call_and_log(&query.keyword, query.request_id.as_deref(), Some(&caller))
        .await?;

    Ok(([(CONTENT_TYPE, "application/json")], completion.body).into_response())
}
