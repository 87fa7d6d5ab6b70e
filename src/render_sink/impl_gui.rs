use crate::frame::Frame;
use crate::library::cancellation::CancellationToken;
use crate::prediction::{Color, CycleView, DetailView, HeadlineView};
use crate::render_sink::interface::{RenderBuffer, RenderSink};
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const REPAINT_INTERVAL: Duration = Duration::from_millis(16);

fn to_color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgb(color.r, color.g, color.b)
}

pub struct DisplayWindow {
    buffer: Arc<Mutex<RenderBuffer>>,
    surface: Arc<Mutex<Option<Frame>>>,
    texture: Option<egui::TextureHandle>,
    texture_frame_id: Option<u64>,
}

impl DisplayWindow {
    fn refresh_texture(&mut self, ctx: &egui::Context) {
        let Ok(surface) = self.surface.lock() else {
            return;
        };
        let Some(frame) = surface.as_ref() else {
            return;
        };
        if self.texture_frame_id == Some(frame.id) {
            return;
        }

        let (width, height) = frame.size();
        let image =
            egui::ColorImage::from_rgb([width as usize, height as usize], frame.image.as_raw());

        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::default()),
            None => {
                self.texture =
                    Some(ctx.load_texture("camera", image, egui::TextureOptions::default()))
            }
        }
        self.texture_frame_id = Some(frame.id);
    }
}

impl eframe::App for DisplayWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.refresh_texture(ctx);

        let buffer = match self.buffer.lock() {
            Ok(buffer) => buffer.clone(),
            Err(_) => return,
        };

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(10.0);

                if let Some(texture) = &self.texture {
                    ui.image((texture.id(), texture.size_vec2()));
                    ui.add_space(10.0);
                }

                if let Some(error) = &buffer.error {
                    ui.label(
                        egui::RichText::new(error)
                            .color(egui::Color32::RED)
                            .size(16.0),
                    );
                    return;
                }

                let headline = &buffer.headline;
                ui.label(
                    egui::RichText::new(format!("Prediction: {}", headline.text))
                        .color(to_color32(headline.color))
                        .size(26.0),
                );
                ui.add(
                    egui::ProgressBar::new(headline.fill_percent as f32 / 100.0)
                        .fill(to_color32(headline.color)),
                );

                ui.add_space(20.0);

                for detail in &buffer.details {
                    ui.horizontal(|ui| {
                        ui.label(format!("{}: ", detail.label));
                        ui.label(&detail.percent_text);
                    });
                    ui.add(egui::ProgressBar::new(detail.fill_percent as f32 / 100.0));
                    ui.add_space(5.0);
                }
            });
        });

        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}

/// Writes into buffers shared with a `DisplayWindow`. The window itself must
/// run on the main thread through `run_window`.
pub struct RenderSinkGui {
    buffer: Arc<Mutex<RenderBuffer>>,
    surface: Arc<Mutex<Option<Frame>>>,
}

impl RenderSinkGui {
    pub fn new() -> Self {
        Self {
            buffer: Arc::new(Mutex::new(RenderBuffer::default())),
            surface: Arc::new(Mutex::new(None)),
        }
    }

    pub fn window(&self) -> DisplayWindow {
        DisplayWindow {
            buffer: Arc::clone(&self.buffer),
            surface: Arc::clone(&self.surface),
            texture: None,
            texture_frame_id: None,
        }
    }

    fn buffer(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, RenderBuffer>, Box<dyn Error + Send + Sync>> {
        Ok(self.buffer.lock().map_err(|_| "Render buffer poisoned")?)
    }
}

/// Blocks until the window is closed, then cancels the session.
pub fn run_window(
    window: DisplayWindow,
    cancel: CancellationToken,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([360.0, 560.0])
            .with_resizable(true),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Live classifier",
        options,
        Box::new(|_cc| Box::new(window)),
    );
    cancel.cancel();

    result.map_err(|e| e.to_string().into())
}

impl RenderSink for RenderSinkGui {
    fn build_slots(&mut self, count: usize) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.buffer()?.build_slots(count);
        Ok(())
    }

    fn slot_count(&self) -> usize {
        self.buffer().map(|b| b.details.len()).unwrap_or_default()
    }

    fn set_headline(&mut self, headline: &HeadlineView) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.buffer()?.headline = headline.clone();
        Ok(())
    }

    fn set_detail(
        &mut self,
        index: usize,
        detail: &DetailView,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.buffer()?.set_detail(index, detail)
    }

    fn set_view(&mut self, view: &CycleView) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.buffer()?.set_view(view)
    }

    fn draw_surface(&mut self, frame: &Frame) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut surface = self.surface.lock().map_err(|_| "Surface poisoned")?;
        *surface = Some(frame.clone());
        Ok(())
    }

    fn show_error(&mut self, message: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.buffer()?.show_error(message);
        Ok(())
    }
}
