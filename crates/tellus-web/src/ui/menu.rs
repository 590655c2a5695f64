use tellus_core::controls::{apply_generation, reset_generation, ControlKind, ControlSpec};
use tellus_core::{ControlGroup, Reallocation, SceneState, CONTROLS};

/// Settings panel built from the control table.
pub struct MenuPanel {
    last_rejection: Option<String>,
}

impl MenuPanel {
    pub fn new() -> Self {
        Self {
            last_rejection: None,
        }
    }

    /// Draw every control group. Returns the target reallocations the
    /// committed changes require, in commit order.
    pub fn show(&mut self, ctx: &egui::Context, state: &mut SceneState) -> Vec<Reallocation> {
        let mut reallocations = Vec::new();

        egui::Window::new("Planet")
            .anchor(egui::Align2::LEFT_TOP, egui::vec2(8.0, 8.0))
            .resizable(false)
            .collapsible(true)
            .show(ctx, |ui| {
                for group in ControlGroup::ALL {
                    egui::CollapsingHeader::new(group.title())
                        .default_open(group != ControlGroup::Render)
                        .show(ui, |ui| {
                            for spec in CONTROLS.iter().filter(|c| c.group == group) {
                                self.control_row(ui, spec, state, &mut reallocations);
                            }
                            if group == ControlGroup::Generation {
                                ui.horizontal(|ui| {
                                    if ui.button("Apply").clicked() {
                                        reallocations.push(apply_generation(state));
                                    }
                                    if ui.button("Reset").clicked() {
                                        reallocations.push(reset_generation(state));
                                    }
                                });
                            }
                        });
                }

                if let Some(reason) = &self.last_rejection {
                    ui.separator();
                    ui.colored_label(egui::Color32::from_rgb(230, 160, 60), reason);
                }
            });

        reallocations
    }

    fn control_row(
        &mut self,
        ui: &mut egui::Ui,
        spec: &ControlSpec,
        state: &mut SceneState,
        reallocations: &mut Vec<Reallocation>,
    ) {
        let current = spec.read(state);
        let mut value = current;

        let changed = match spec.kind {
            ControlKind::Toggle => {
                let mut on = current != 0.0;
                let changed = ui.checkbox(&mut on, spec.label).changed();
                value = if on { 1.0 } else { 0.0 };
                changed
            }
            ControlKind::Integer | ControlKind::Continuous => {
                let display = spec.display;
                let mut slider = egui::Slider::new(&mut value, spec.min..=spec.max)
                    .text(spec.label)
                    .step_by(spec.step as f64)
                    .custom_formatter(move |v, _| display(v as f32));
                if spec.kind == ControlKind::Integer {
                    slider = slider.integer();
                }
                ui.add(slider).changed()
            }
        };

        if !changed || value == current {
            return;
        }
        match spec.commit(state, value) {
            Ok(realloc) => {
                self.last_rejection = None;
                reallocations.extend(realloc);
            }
            Err(e) => self.last_rejection = Some(e.to_string()),
        }
    }
}
