// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the current annotation session and the
//! submission protocol, and routes UI actions between them.

use crate::api::client::HttpProcessingService;
use crate::api::protocol::{PollPolicy, SubmissionProtocol};
use crate::config::AppConfig;
use crate::io::media::LoadedImage;
use crate::models::session::Session;
use crate::ui::canvas;
use crate::ui::renderer::{ImageHandle, StrokeStyle};
use crate::ui::results::{self, ResultGallery};
use crate::ui::toolbar::{self, ToolbarAction, ToolbarState};
use crate::util::geometry::WheelDirection;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::time::Duration;

/// How often to repaint while waiting on the backend.
const BACKEND_REPAINT_INTERVAL: Duration = Duration::from_millis(100);

/// Main application state.
pub struct StrokeSegApp {
    config: AppConfig,

    style: StrokeStyle,

    /// Current annotation session (if an image is loaded)
    session: Option<Session>,

    /// Loaded image texture for display
    image_texture: Option<egui::TextureHandle>,

    /// Upload/poll/fetch state machine
    protocol: SubmissionProtocol,

    /// Decoded results of the last fetch
    gallery: Option<ResultGallery>,

    /// Receiver for background image loading
    image_loader: Option<Receiver<Result<LoadedImage, String>>>,

    /// Loading state message
    loading_message: Option<String>,
}

impl StrokeSegApp {
    /// Create the application with an HTTP client for the configured backend.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let service = HttpProcessingService::new(&config.service)?;
        let protocol = SubmissionProtocol::new(Arc::new(service), PollPolicy::from(&config.service));
        log::info!("Using processing backend at {}", config.service.base_url);

        Ok(Self {
            style: StrokeStyle::from(&config.display),
            config,
            session: None,
            image_texture: None,
            protocol,
            gallery: None,
            image_loader: None,
            loading_message: None,
        })
    }

    fn open_image_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"])
            .pick_file()
        {
            self.load_image_file(path);
        }
    }

    /// Load an image file in the background.
    pub fn load_image_file(&mut self, path: std::path::PathBuf) {
        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.loading_message = Some("Loading image...".to_string());

        std::thread::spawn(move || {
            let result = crate::io::media::load_image(&path)
                .map_err(|e| format!("Failed to load {}: {}", path.display(), e));
            if let Ok(ref loaded) = result {
                log::info!("Loaded image: {} ({}x{})", path.display(), loaded.width, loaded.height);
            }
            let _ = sender.send(result);
        });
    }

    /// Start a fresh session for a newly decoded image.
    fn install_image(&mut self, ctx: &egui::Context, loaded: LoadedImage) {
        let size = [loaded.width as usize, loaded.height as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &loaded.pixels);
        self.image_texture = Some(ctx.load_texture(
            "loaded_image",
            color_image,
            egui::TextureOptions::LINEAR,
        ));

        self.session = Some(Session::new(&loaded, &self.config.display));
        self.protocol.reset();
        self.gallery = None;
    }

    fn undo(&mut self) {
        if let Some(ref mut session) = self.session {
            session.strokes.undo();
        }
    }

    fn redo(&mut self) {
        if let Some(ref mut session) = self.session {
            session.strokes.redo();
        }
    }

    fn submit(&mut self) {
        let Some(ref session) = self.session else {
            log::warn!("No image selected!");
            return;
        };
        if session.strokes.is_empty() {
            log::warn!("Submitting {} with no strokes", session.image.file_name);
        }

        match session.upload_request() {
            Ok(request) => {
                if self.protocol.submit(request) {
                    self.gallery = None;
                }
            }
            Err(e) => log::error!("Failed to encode strokes: {}", e),
        }
    }

    fn zoom(&mut self, direction: Option<WheelDirection>) {
        if let Some(ref mut session) = self.session {
            match direction {
                Some(direction) => session.zoom_step(direction),
                None => session.reset_view(),
            }
        }
    }

    fn poll_image_loader(&mut self, ctx: &egui::Context) {
        let Some(ref receiver) = self.image_loader else {
            return;
        };
        let Ok(result) = receiver.try_recv() else {
            return;
        };

        self.image_loader = None;
        self.loading_message = None;
        match result {
            Ok(loaded) => self.install_image(ctx, loaded),
            Err(e) => log::error!("{}", e),
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        // Undo (Ctrl+Z)
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Z) && !i.modifiers.shift) {
            self.undo();
        }

        // Redo (Ctrl+Shift+Z or Ctrl+Y)
        if ctx.input(|i| {
            (i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::Z))
                || (i.modifiers.command && i.key_pressed(egui::Key::Y))
        }) {
            self.redo();
        }
    }

    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        let has_session = self.session.is_some();
        let (can_undo, can_redo) = self
            .session
            .as_ref()
            .map(|s| (s.strokes.can_undo(), s.strokes.can_redo()))
            .unwrap_or((false, false));

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Image...").clicked() {
                        self.open_image_dialog();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    if ui.add_enabled(can_undo, egui::Button::new("Undo (Ctrl+Z)")).clicked() {
                        self.undo();
                        ui.close_menu();
                    }
                    if ui.add_enabled(can_redo, egui::Button::new("Redo (Ctrl+Shift+Z)")).clicked() {
                        self.redo();
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.add_enabled(has_session, egui::Button::new("Zoom In")).clicked() {
                        self.zoom(Some(WheelDirection::Up));
                        ui.close_menu();
                    }
                    if ui.add_enabled(has_session, egui::Button::new("Zoom Out")).clicked() {
                        self.zoom(Some(WheelDirection::Down));
                        ui.close_menu();
                    }
                    if ui.add_enabled(has_session, egui::Button::new("Reset View")).clicked() {
                        self.zoom(None);
                        ui.close_menu();
                    }
                });
            });
        });
    }

    fn show_welcome(ui: &mut egui::Ui) {
        ui.centered_and_justified(|ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);
                ui.heading(
                    egui::RichText::new("StrokeSeg")
                        .size(32.0)
                        .color(egui::Color32::from_gray(200)),
                );
                ui.label(
                    egui::RichText::new("Stroke-guided segmentation")
                        .size(14.0)
                        .color(egui::Color32::from_gray(150)),
                );
                ui.add_space(20.0);
                ui.label(
                    egui::RichText::new("Open an image to begin annotating")
                        .color(egui::Color32::from_gray(180)),
                );
            });
        });
    }
}

impl eframe::App for StrokeSegApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_image_loader(ctx);

        if let Some(images) = self.protocol.process_events() {
            self.gallery = Some(ResultGallery::from_images(ctx, &images));
        }

        if self.loading_message.is_some() {
            ctx.request_repaint();
        } else if self.protocol.is_busy() || self.protocol.is_fetching() {
            ctx.request_repaint_after(BACKEND_REPAINT_INTERVAL);
        }

        self.show_menu_bar(ctx);

        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                let state = ToolbarState {
                    has_image: self.session.is_some(),
                    can_undo: self.session.as_ref().is_some_and(|s| s.strokes.can_undo()),
                    can_redo: self.session.as_ref().is_some_and(|s| s.strokes.can_redo()),
                    protocol: &self.protocol,
                };
                toolbar::show(ui, &state)
            })
            .inner;

        match toolbar_action {
            ToolbarAction::OpenImage => self.open_image_dialog(),
            ToolbarAction::Undo => self.undo(),
            ToolbarAction::Redo => self.redo(),
            ToolbarAction::Submit => self.submit(),
            ToolbarAction::FetchResults => {
                self.protocol.fetch_results();
            }
            ToolbarAction::None => {}
        }

        self.handle_shortcuts(ctx);

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| match &self.session {
                Some(session) => {
                    ui.label(format!(
                        "{} ({}x{})",
                        session.image.file_name, session.image.width, session.image.height
                    ));
                    ui.separator();
                    ui.label(format!("Zoom: {:.0}%", session.viewport.zoom * 100.0));
                    ui.separator();
                    ui.label(format!("Strokes: {}", session.strokes.len()));
                    if session.strokes.is_drawing() {
                        ui.separator();
                        ui.label("Drawing");
                    }
                }
                None => {
                    ui.label("No file loaded");
                }
            });
        });

        if let Some(ref gallery) = self.gallery {
            egui::TopBottomPanel::bottom("results")
                .resizable(true)
                .show(ctx, |ui| results::show(ui, gallery));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

            if let Some(ref message) = self.loading_message {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.spinner();
                        ui.add_space(10.0);
                        ui.label(
                            egui::RichText::new(message)
                                .size(16.0)
                                .color(egui::Color32::from_gray(200)),
                        );
                    });
                });
                return;
            }

            match (&mut self.session, &self.image_texture) {
                (Some(session), Some(texture)) => {
                    let image = ImageHandle::fitted(texture.id(), &session.fit);
                    ui.horizontal_top(|ui| {
                        canvas::show(ui, session, &image, &self.style);
                        let session = &*session;
                        ui.separator();
                        ui.vertical(|ui| {
                            ui.label(egui::RichText::new("Overview").weak());
                            canvas::show_overview(ui, session, &image, &self.style);
                        });
                    });
                }
                _ => Self::show_welcome(ui),
            }
        });
    }
}
