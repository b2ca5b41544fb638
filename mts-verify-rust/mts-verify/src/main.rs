use actix_web::{web, App, HttpServer};
use std::sync::Arc;

use mts_verify::api;
use mts_verify::app::{ProcessRunner, VerificationRunner};
use mts_verify::infrastructure::{logger, VerifyConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = match VerifyConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration initialization failed: {e}");
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    // Dropping the guard stops the file writer, so it lives as long as main
    let _log_guard = logger::init(&config.log_level, config.log_dir.as_deref())
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    tracing::info!(
        network = %config.network,
        workdir = %config.workdir.display(),
        timeout_secs = config.timeout.as_secs(),
        "Starting MTS verification server"
    );

    let runner: Arc<dyn VerificationRunner> = Arc::new(ProcessRunner::new(config.clone()));
    let bind = config.bind_address();
    let config = web::Data::new(config);

    tracing::info!("Verification server listening on http://{}:{}", bind.0, bind.1);
    tracing::info!("POST /verify to verify contracts");

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(
                actix_cors::Cors::default()
                    .allow_any_origin()
                    .send_wildcard()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(web::Data::new(Arc::clone(&runner)))
            .app_data(config.clone())
            .configure(api::configure)
    })
    .bind(bind)?
    .run()
    .await
}
