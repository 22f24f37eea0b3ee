use actix_web::{web, App, HttpServer};
use clap::Parser;

use whiteboard_server::config::Config;
use whiteboard_server::connection::ConnectionSettings;
use whiteboard_server::error::ServerError;
use whiteboard_server::handlers::{client_assets, root};
use whiteboard_server::server::spawn_server;

#[actix_web::main]
async fn main() -> Result<(), ServerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    let srv_tx = spawn_server();
    let settings = web::Data::new(ConnectionSettings {
        buffer: config.connection_buffer,
        heartbeat: config.heartbeat(),
    });

    log::info!("Server running at http://{}:{}", config.host, config.port);

    let static_dir = config.static_dir.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(srv_tx.clone()))
            .app_data(settings.clone())
            .configure(root)
            .configure(client_assets(&static_dir))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
