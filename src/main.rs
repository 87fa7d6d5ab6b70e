use config::{Config, InferenceBackend, RenderTarget};
use frame_source::impl_fake::FrameSourceFake;
use frame_source::impl_image_files::{FrameSourceImageFiles, ImageFilesConfig};
use frame_source::interface::FrameSource;
use inference_provider::impl_fake::InferenceProviderLoaderFake;
use inference_provider::impl_tract_onnx::InferenceProviderLoaderTractOnnx;
use inference_provider::interface::InferenceProviderLoader;
use library::cancellation::CancellationToken;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use prediction_loop::session::Session;
use refresh_clock::impl_interval::RefreshClockInterval;
use render_sink::impl_console::RenderSinkConsole;
use render_sink::impl_gui::{run_window, RenderSinkGui};
use std::sync::Arc;

mod config;
mod frame;
mod frame_source;
mod inference_provider;
mod library;
mod prediction;
mod prediction_loop;
mod refresh_clock;
mod render_sink;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;

    let logger: Arc<dyn Logger + Send + Sync> =
        Arc::new(LoggerConsole::new(config.logger_timezone));

    let loader: Arc<dyn InferenceProviderLoader> = match config.inference_backend {
        InferenceBackend::TractOnnx => Arc::new(InferenceProviderLoaderTractOnnx::new(
            logger.clone(),
        )),
        InferenceBackend::Fake => Arc::new(InferenceProviderLoaderFake::new(
            config.fake_labels.clone(),
            logger.clone(),
        )),
    };

    let frame_source: Box<dyn FrameSource> = match &config.frames_dir {
        Some(dir) => Box::new(FrameSourceImageFiles::new(
            ImageFilesConfig {
                dir: dir.clone(),
                size: config.capture_size,
                flip: config.flip,
            },
            logger.clone(),
        )),
        None => Box::new(FrameSourceFake::new(config.capture_size, logger.clone())),
    };

    let refresh_clock = Box::new(RefreshClockInterval::new(config.refresh_rate));
    let cancel = CancellationToken::new();

    match config.render_target {
        RenderTarget::Console => {
            let mut session = Session::new(
                config,
                logger.clone(),
                loader,
                frame_source,
                Box::new(RenderSinkConsole::new()),
                refresh_clock,
                cancel,
            );
            let cycles = session.run()?;
            logger.info(&format!("Stopped after {} cycles", cycles))?;
        }
        RenderTarget::Gui => {
            let render_sink = RenderSinkGui::new();
            let window = render_sink.window();
            let mut session = Session::new(
                config,
                logger.clone(),
                loader,
                frame_source,
                Box::new(render_sink),
                refresh_clock,
                cancel.clone(),
            );

            // The window owns the main thread; the loop runs beside it.
            let handle = std::thread::spawn(move || session.run());
            run_window(window, cancel)?;

            let cycles = handle
                .join()
                .map_err(|_| "Prediction loop panicked")??;
            logger.info(&format!("Stopped after {} cycles", cycles))?;
        }
    }

    Ok(())
}
