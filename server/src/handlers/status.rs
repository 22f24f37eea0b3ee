use actix_web::{web, HttpResponse, Responder};
use tokio::sync::oneshot;

use crate::error::ServerError;
use crate::server::{ServerCommand, ServerStatus, ServerTx};

pub fn configure_status_handlers(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/status").route(web::get().to(get)));
}

async fn get(srv_tx: web::Data<ServerTx>) -> Result<impl Responder, ServerError> {
    let (tx, rx) = oneshot::channel::<ServerStatus>();
    srv_tx
        .send(ServerCommand::GetStatus { tx })
        .map_err(|_| ServerError::Stopped)?;
    let status = rx.await.map_err(|_| ServerError::Stopped)?;
    Ok(HttpResponse::Ok().json(status))
}
