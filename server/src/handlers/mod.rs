use std::path::Path;

use crate::connection::ws_index;
use crate::handlers::status::configure_status_handlers;
use actix_files::Files;
use actix_web::web;

mod status;

pub fn root(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ws").route(web::get().to(ws_index)));

    configure_status_handlers(cfg);
}

/// Serves the browser client. Must be registered last: it claims `/`.
pub fn client_assets(static_dir: &Path) -> impl FnOnce(&mut web::ServiceConfig) + '_ {
    move |cfg| {
        if static_dir.is_dir() {
            cfg.service(Files::new("/", static_dir).index_file("index.html"));
        } else {
            log::warn!(
                "Static directory {} not found, serving no client",
                static_dir.display()
            );
        }
    }
}
