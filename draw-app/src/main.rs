//! # Kids Draw
//!
//! Command-line host for the drawing app: replays drawings, sends them to the
//! generation backend and saves the resulting models.

use anyhow::Context;
use clap::Parser;
use draw_app::{
    AppConfig, AppController, CliArgs, Command, DrawingScript, GlbDownload, LogOpener,
};
use draw_client::{ApiClient, GenerationApi};
use draw_core::GenerationPhase;
use draw_renderer::image::{decode_data_url, image_data_url};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured tracing with optional JSON format.
///
/// Set `RUST_LOG` to control log levels (default: info,kids_draw=debug,draw_app=debug).
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kids_draw=debug,draw_app=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

type Controller = AppController<ApiClient, LogOpener>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let config = AppConfig::from(args.global);
    let api = ApiClient::new(&config.api_url, config.timeout)
        .with_context(|| format!("Invalid backend URL: {}", config.api_url))?;
    tracing::debug!(api = %api.base_url(), engine = %config.engine, "Starting kids-draw");

    match args.command {
        Command::Engines => {
            let controller = Controller::new(api, LogOpener, &config);
            for engine in controller.registry().descriptors() {
                println!(
                    "{} {:<11} {:<32} [{}]",
                    engine.icon, engine.id, engine.description, engine.capabilities
                );
            }
        }
        Command::Render { script, out } => {
            let mut controller = Controller::new(api, LogOpener, &config);
            DrawingScript::from_path(&script)
                .await?
                .replay(&mut controller)
                .await?;

            let engine = controller
                .engine()
                .context("No canvas is active; check --engine and the canvas size")?;
            let (_, png) = decode_data_url(&engine.to_data_url()?)?;
            tokio::fs::write(&out, &png)
                .await
                .with_context(|| format!("Failed to write {}", out.display()))?;
            println!("Saved {}", out.display());
        }
        Command::Generate { script, image } => {
            let mut controller = Controller::new(api, LogOpener, &config);
            if let Some(script) = script {
                DrawingScript::from_path(&script)
                    .await?
                    .replay(&mut controller)
                    .await?;
            }
            if let Some(image) = image {
                let bytes = tokio::fs::read(&image)
                    .await
                    .with_context(|| format!("Failed to read {}", image.display()))?;
                controller.import_image(&image_data_url(&bytes))?;
            }
            generate(&mut controller).await?;
        }
        Command::Status { task_id } => {
            let status = api.task_status(&task_id).await?;
            println!("{task_id}: {:?} - {}", status.status, status.message);
        }
        Command::Health => {
            let health = api.health().await?;
            println!("{}: {}", health.status, health.message);
            if !health.is_ok() {
                anyhow::bail!("Backend is not healthy");
            }
        }
    }

    Ok(())
}

async fn generate(controller: &mut Controller) -> anyhow::Result<()> {
    if controller.generate().await != GenerationPhase::Ready {
        let message = controller.error().unwrap_or("Generation failed");
        anyhow::bail!("{message}");
    }
    if let Some(result) = controller.generation().result() {
        println!("Task:  {}", result.task_id);
        println!("Model: {}", result.model_url);
        println!("STL:   {}", result.stl_url);
        if let Some(message) = &result.message {
            println!("{message}");
        }
    }

    match controller.download_glb().await {
        Ok(GlbDownload::Saved(path)) => println!("Saved {}", path.display()),
        Ok(GlbDownload::Opened(url)) => println!("Download the model from {url}"),
        Err(e) => eprintln!("GLB download failed: {}", e.user_message()),
    }
    match controller.download_stl().await {
        Ok(path) => println!("Saved {}", path.display()),
        Err(e) => eprintln!("STL download failed: {}", e.user_message()),
    }

    if let Some(summary) = controller.viewer().summary() {
        println!(
            "Model has {} meshes, {} vertices, {} triangles",
            summary.meshes, summary.vertices, summary.triangles
        );
        if let Some(bounds) = summary.bounds {
            let [x, y, z] = bounds.size();
            println!("Size: {x:.2} x {y:.2} x {z:.2}");
        }
    }
    Ok(())
}
