mod config;
mod error;
mod handlers;
mod pages;
mod state;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use pretty_env_logger::env_logger::{Builder, Env};

use crate::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let logger_env = Env::default().default_filter_or("debug");
    let mut logger_builder = Builder::from_env(logger_env);
    logger_builder.init();

    if cli::run_cli().await {
        return Ok(());
    }

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("Application initialization failed: {:#}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    let state = config.create_app_state().await.map_err(|e| {
        log::error!("Application initialization failed: {:#}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    log::info!("App state initialized successfully");

    let qr_code_dir = state.qr.output_dir().to_path_buf();
    let data = web::Data::new(state);

    log::info!("Listening on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(Logger::new("%a %t %r %s  %{Referer}i %Dms"))
            .wrap(Cors::permissive())
            .configure(handlers::configure)
            .service(Files::new(pages::QR_CODE_ROUTE, qr_code_dir.clone()))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
