use eframe::egui;
use eframe::{NativeOptions, egui::ViewportBuilder};
use tracing::info;

use crate::core::processing::composite::DetectionFigure;
use crate::error::{Error, Result};

/// Window showing the stretched original image beside the colony mask.
pub struct DetectionViewer {
    figure: DetectionFigure,
    textures: Option<(egui::TextureHandle, egui::TextureHandle)>,
}

impl DetectionViewer {
    pub fn new(figure: DetectionFigure) -> Self {
        Self {
            figure,
            textures: None,
        }
    }

    fn textures(&mut self, ctx: &egui::Context) -> &(egui::TextureHandle, egui::TextureHandle) {
        let size = [self.figure.width, self.figure.height];
        let figure = &self.figure;
        self.textures.get_or_insert_with(|| {
            let original = ctx.load_texture(
                "original",
                egui::ColorImage::from_rgb(size, &figure.original_rgb),
                egui::TextureOptions::NEAREST,
            );
            let mask = ctx.load_texture(
                "mask",
                egui::ColorImage::from_rgb(size, &figure.mask_rgb),
                egui::TextureOptions::NEAREST,
            );
            (original, mask)
        })
    }
}

impl eframe::App for DetectionViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut style = (*ctx.style()).clone();
        style.visuals.override_text_color = Some(egui::Color32::from_gray(220));
        style.visuals.panel_fill = egui::Color32::from_rgb(30, 30, 30);
        ctx.set_style(style);

        let (original, mask) = self.textures(ctx).clone();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                for (col, (title, texture)) in columns.iter_mut().zip([
                    (DetectionFigure::LEFT_TITLE, &original),
                    (DetectionFigure::RIGHT_TITLE, &mask),
                ]) {
                    col.vertical_centered(|ui| {
                        ui.label(egui::RichText::new(title).size(16.0).strong());
                        ui.add(egui::Image::new(texture).shrink_to_fit());
                    });
                }
            });
        });
    }
}

/// Open the viewer and block until the window is closed.
pub fn show_detection(figure: DetectionFigure) -> Result<()> {
    info!(
        "Opening viewer for {}x{} detection",
        figure.width, figure.height
    );
    let options = NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([1200.0, 600.0])
            .with_min_inner_size([600.0, 300.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Emperor penguin colony detection",
        options,
        Box::new(|_cc| Ok(Box::new(DetectionViewer::new(figure)))),
    )
    .map_err(|e| Error::Display(e.to_string()))
}
