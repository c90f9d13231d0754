// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with the session and submission actions.

use crate::api::protocol::{SubmissionProtocol, SubmissionState};

/// Action requested from the toolbar this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    OpenImage,
    Undo,
    Redo,
    Submit,
    FetchResults,
}

/// What the toolbar needs to know to enable its buttons.
pub struct ToolbarState<'a> {
    pub has_image: bool,
    pub can_undo: bool,
    pub can_redo: bool,
    pub protocol: &'a SubmissionProtocol,
}

/// Display the toolbar.
pub fn show(ui: &mut egui::Ui, state: &ToolbarState<'_>) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui.button("📂 Open Image").clicked() {
            action = ToolbarAction::OpenImage;
        }

        ui.separator();

        if ui.add_enabled(state.can_undo, egui::Button::new("⟲ Undo")).clicked() {
            action = ToolbarAction::Undo;
        }
        if ui.add_enabled(state.can_redo, egui::Button::new("⟳ Redo")).clicked() {
            action = ToolbarAction::Redo;
        }

        ui.separator();

        let can_submit = state.has_image && state.protocol.can_submit();
        if ui.add_enabled(can_submit, egui::Button::new("Send to Backend")).clicked() {
            action = ToolbarAction::Submit;
        }

        let fetch_label = if state.protocol.is_fetching() {
            "Loading..."
        } else {
            "Fetch Results"
        };
        if ui
            .add_enabled(state.protocol.can_fetch(), egui::Button::new(fetch_label))
            .clicked()
        {
            action = ToolbarAction::FetchResults;
        }

        ui.separator();

        let protocol_state = state.protocol.state();
        if state.protocol.is_busy() || state.protocol.is_fetching() {
            ui.spinner();
        }
        ui.label(status_text(protocol_state)).on_hover_text(match protocol_state {
            SubmissionState::Failed(reason) => reason.to_string(),
            _ => "Left-drag to draw, right-drag to pan, scroll to zoom".to_string(),
        });
    });

    action
}

fn status_text(state: &SubmissionState) -> egui::RichText {
    let text = egui::RichText::new(format!("Submission: {}", state.label()));
    match state {
        SubmissionState::Done => text.color(egui::Color32::LIGHT_GREEN),
        SubmissionState::Failed(_) => text.color(egui::Color32::LIGHT_RED),
        _ => text.italics().weak(),
    }
}
