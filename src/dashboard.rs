//! Browser-facing routes that drive the upload gate.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::{Html, Redirect},
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::{
    error::ANALYSIS_FAILED,
    model::AnalysisResult,
    relay::read_file_field,
    render::render_page,
    state::AppState,
};

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let gate = state.gate();
    Html(render_page(&gate))
}

/// Offer the uploaded file to the gate. Non-CSV files are not held.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Redirect {
    let selection = match multipart {
        Ok(mut multipart) => read_file_field(&mut multipart).await,
        Err(e) => Err(e.into()),
    };

    match selection {
        Ok(Some(selection)) => {
            let name = selection.name.clone();
            if state.gate().offer(selection) {
                info!("Holding {name} for analysis");
            } else {
                info!("Ignored non-CSV upload {name}");
            }
        }
        Ok(None) => warn!("Upload form submitted without a file"),
        Err(e) => warn!("Unreadable upload form: {e}"),
    }

    Redirect::to("/")
}

/// Start the held file through the relay and return straight away; the page
/// refreshes itself until the run completes. Does nothing while another run
/// is in flight or when no file is held.
pub async fn analyze(State(state): State<Arc<AppState>>) -> Redirect {
    let Some(selection) = state.gate().confirm() else {
        return Redirect::to("/");
    };

    let task_state = state.clone();
    let run = tokio::spawn(async move {
        let outcome = match task_state.relay.forward(&selection).await {
            Ok(body) => serde_json::from_value::<AnalysisResult>(body).map_err(|e| {
                error!("Backend result does not match the analysis shape: {e}");
                ANALYSIS_FAILED.to_string()
            }),
            Err(e) => Err(e.public_message().to_string()),
        };
        task_state.gate().complete(outcome);
    });

    // A panicked run must still release the gate.
    tokio::spawn(async move {
        if let Err(e) = run.await {
            error!("Analysis task failed: {e}");
            state.gate().complete(Err(ANALYSIS_FAILED.to_string()));
        }
    });

    Redirect::to("/")
}

#[derive(Serialize)]
pub struct Health {
    status: &'static str,
    backend_url: String,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Health> {
    Json(Health {
        status: "ok",
        backend_url: state.relay.backend_url().to_string(),
    })
}
