use face_api::{
    config::Config,
    infrastructure::{
        ml::{
            local_face_service::LocalFaceService, onnx_face_encoder::OnnxFaceEncoder,
            rustface_detector::RustfaceDetector,
        },
        storage::temp_file_store::TempFileStore,
    },
    presentation::http::{routes::create_router, state::AppState},
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Uses RUST_LOG if set, otherwise sensible defaults
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info,face_api=debug,tower_http=debug"))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = Config::from_env()?;

    let detector = Arc::new(RustfaceDetector::new(
        &config.detector_model_path,
        config.detection_model,
        config.min_face_size,
    )?);
    let encoder = Arc::new(OnnxFaceEncoder::new(
        &config.encoder_model_path,
        config.encoder_input_size,
    )?);
    let faces = Arc::new(LocalFaceService::new(detector, encoder));
    let storage = Arc::new(TempFileStore::new(config.temp_dir.clone()));

    tracing::info!(temp_dir = %config.temp_dir.display(), "Temp image store ready");

    let state = AppState::new(config.clone(), storage, faces);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Face API listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("SIGTERM received, initiating graceful shutdown");
        }
    }
}
