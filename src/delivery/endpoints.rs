use actix_web::web::{Data, Json, Path};
use actix_web::{get, post, HttpResponse};

use crate::advertisement::AdPosition;
use crate::database::Database;

use super::render::RenderedAd;
use super::script::ScriptGate;
use super::{SlotSession, SlotState};

/// Delivers a slot. Always answers 200: a failed or empty delivery is an
/// empty list, never an error page.
#[get("/delivery/{position}")]
#[tracing::instrument(skip(db, gate))]
async fn deliver_slot(
    db: Data<Box<dyn Database>>,
    gate: Data<ScriptGate>,
    params: Path<AdPosition>,
) -> Json<Vec<RenderedAd>> {
    let mut session = SlotSession::new(params.into_inner());
    session.deliver(&***db, &gate).await;

    let payloads = match session.state() {
        SlotState::Ready => session.payloads().to_vec(),
        _ => vec![],
    };

    Json(payloads)
}

/// Called by the page once the third-party ad script has finished loading.
#[post("/delivery/script-ready")]
#[tracing::instrument(skip(gate))]
async fn script_ready(gate: Data<ScriptGate>) -> HttpResponse {
    gate.signal_ready();

    HttpResponse::NoContent().finish()
}
