use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::error_response;
use crate::auth::Claims;
use crate::domain::{LoanFilter, SubmitLoanInput};
use crate::infrastructure::AppState;
use crate::models::loan::LoanStatus;

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

#[derive(Deserialize)]
pub struct ListLoansQuery {
    pub status: Option<String>,
    pub item_id: Option<i32>,
}

pub async fn list_loans(
    State(state): State<AppState>,
    Query(query): Query<ListLoansQuery>,
) -> ApiResult {
    let status = match query.status.as_deref() {
        None => None,
        Some("pending") => Some(LoanStatus::Pending),
        Some("returned") => Some(LoanStatus::Returned),
        Some(other) => {
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": format!("unknown loan status '{}'", other) })),
            ));
        }
    };

    let loans = state
        .loans
        .list_loans(LoanFilter {
            status,
            item_id: query.item_id,
        })
        .await
        .map_err(error_response)?;
    Ok(Json(json!({ "loans": loans })))
}

pub async fn list_active_loans(State(state): State<AppState>) -> ApiResult {
    let loans = state
        .loans
        .list_active_loans()
        .await
        .map_err(error_response)?;
    Ok(Json(json!({ "loans": loans })))
}

/// Guest-reachable: no token needed to ask to borrow.
pub async fn submit_loan(
    State(state): State<AppState>,
    Json(payload): Json<SubmitLoanInput>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let loan = state
        .loans
        .submit_loan(payload)
        .await
        .map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "loan": loan, "message": "Loan submitted successfully" })),
    ))
}

pub async fn return_loan(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    claims: Claims,
) -> ApiResult {
    let loan = state
        .loans
        .close_loan(&claims.caller(), id)
        .await
        .map_err(error_response)?;
    Ok(Json(json!({ "loan": loan, "message": "Loan returned successfully" })))
}
