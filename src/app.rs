use std::sync::Arc;

use eframe::egui;

use crate::config::Config;
use crate::dispatch::{ui_queue, UiHandle, UiQueue};
use crate::elevate::Pkexec;
use crate::rows::{BatteryRow, FanModeRow, KeyboardLightRow, Panel, ToggleRow};
use crate::sysfs::Gateway;
use crate::types::{Attribute, ChargeLimit, FanMode, KbdBrightness};

// Main application GUI
pub struct LgGramApp {
    panel: Panel,
    queue: UiQueue<Panel>,
    ui_handle: UiHandle<Panel>,
    gateway: Gateway,
    // Owns the worker threads used by privileged writes
    _runtime: tokio::runtime::Runtime,
    dark_mode: bool,
    show_driver_warning: bool,
}

impl LgGramApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config, runtime: tokio::runtime::Runtime) -> Self {
        let repaint = cc.egui_ctx.clone();
        let (ui_handle, queue) = ui_queue();
        let ui_handle = ui_handle.with_waker(move || repaint.request_repaint());

        let gateway = Gateway::new(runtime.handle().clone(), Arc::new(Pkexec::new(config.elevator.clone())));
        let panel = Panel::new(&config);

        let dark_mode = config.dark_mode.unwrap_or_else(|| cc.egui_ctx.style().visuals.dark_mode);
        apply_theme(&cc.egui_ctx, dark_mode);

        Self {
            show_driver_warning: !panel.driver_loaded,
            panel,
            queue,
            ui_handle,
            gateway,
            _runtime: runtime,
            dark_mode,
        }
    }

    fn toggle_theme(&mut self, ctx: &egui::Context) {
        self.dark_mode = !self.dark_mode;
        apply_theme(ctx, self.dark_mode);
    }
}

fn apply_theme(ctx: &egui::Context, dark: bool) {
    ctx.set_visuals(if dark { egui::Visuals::dark() } else { egui::Visuals::light() });
}

impl eframe::App for LgGramApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Completions posted by write workers
        self.queue.drain(&mut self.panel);

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("☰", |ui| {
                    if ui.button("Refresh").clicked() {
                        self.panel.refresh_all();
                        ui.close_menu();
                    }
                    if ui.button("Toggle Dark Mode").clicked() {
                        self.toggle_theme(ctx);
                        ui.close_menu();
                    }
                });
                ui.heading("LG Gram Manager");
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.set_max_width(600.0);
                ui.add_space(10.0);

                let (gateway, handle) = (&self.gateway, &self.ui_handle);
                let panel = &mut self.panel;

                section(ui, "Features", |ui| {
                    show_toggle(ui, &mut panel.reader_mode, gateway, handle);
                    ui.separator();
                    show_toggle(ui, &mut panel.fn_lock, gateway, handle);
                    ui.separator();
                    show_toggle(ui, &mut panel.usb_charge, gateway, handle);
                });

                section(ui, "Battery", |ui| {
                    show_battery(ui, &mut panel.battery, gateway, handle);
                });

                section(ui, "LEDs", |ui| {
                    show_keyboard_light(ui, &mut panel.keyboard, gateway, handle);
                    ui.separator();
                    show_toggle(ui, &mut panel.touchpad, gateway, handle);
                });

                section(ui, "Cooling", |ui| {
                    show_fan_mode(ui, &mut panel.fan, gateway, handle);
                });
            });
        });

        if self.show_driver_warning {
            egui::Window::new("Driver Not Found")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label("The lg-laptop driver doesn't appear to be loaded.");
                    ui.add_space(6.0);
                    ui.label("Make sure you have the lg-laptop kernel module installed and loaded.");
                    ui.add_space(6.0);
                    ui.monospace("sudo modprobe lg-laptop");
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.show_driver_warning = false;
                    }
                });
        }
    }
}

fn section(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    ui.label(egui::RichText::new(title).strong());
    ui.group(|ui| {
        ui.set_width(ui.available_width());
        add_contents(ui);
    });
    ui.add_space(12.0);
}

fn row_header(ui: &mut egui::Ui, attribute: Attribute) {
    let spec = attribute.spec();
    ui.vertical(|ui| {
        ui.label(spec.title);
        ui.label(egui::RichText::new(spec.subtitle).small().weak());
    });
}

fn show_toggle(ui: &mut egui::Ui, row: &mut ToggleRow, gateway: &Gateway, handle: &UiHandle<Panel>) {
    ui.horizontal(|ui| {
        row_header(ui, row.attribute);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let mut on = row.active;
            let response = ui.add_enabled(row.enabled(), egui::Checkbox::without_text(&mut on));
            if response.changed() {
                row.set(on, gateway, handle);
            }
        });
    });
}

fn show_battery(ui: &mut egui::Ui, row: &mut BatteryRow, gateway: &Gateway, handle: &UiHandle<Panel>) {
    ui.horizontal(|ui| {
        row_header(ui, Attribute::BatteryLimit);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let enabled = row.enabled();
            if ui.add_enabled(enabled, egui::Button::new("Apply")).clicked() {
                row.apply(gateway, handle);
            }
            ui.add_enabled_ui(enabled, |ui| {
                egui::ComboBox::from_id_source("battery_limit")
                    .selected_text(row.selected.label())
                    .show_ui(ui, |ui| {
                        for limit in ChargeLimit::ALL {
                            ui.selectable_value(&mut row.selected, limit, limit.label());
                        }
                    });
            });
        });
    });
}

fn show_keyboard_light(ui: &mut egui::Ui, row: &mut KeyboardLightRow, gateway: &Gateway, handle: &UiHandle<Panel>) {
    ui.horizontal(|ui| {
        row_header(ui, Attribute::KeyboardLight);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let enabled = row.enabled();
            // right_to_left lays buttons out in reverse
            for level in KbdBrightness::ALL.into_iter().rev() {
                let selected = row.selected == Some(level);
                let button = egui::SelectableLabel::new(selected, level.label());
                if ui.add_enabled(enabled, button).clicked() && !selected {
                    row.select(level, gateway, handle);
                }
            }
        });
    });
}

fn show_fan_mode(ui: &mut egui::Ui, row: &mut FanModeRow, gateway: &Gateway, handle: &UiHandle<Panel>) {
    ui.label(egui::RichText::new(Attribute::FanMode.spec().title).heading());
    ui.add_space(6.0);
    let enabled = row.enabled();
    ui.columns(FanMode::DISPLAY_ORDER.len(), |columns| {
        for (column, mode) in columns.iter_mut().zip(FanMode::DISPLAY_ORDER) {
            column.vertical_centered_justified(|ui| {
                let selected = row.current == Some(mode);
                let text = egui::RichText::new(format!("{}\n{}", mode.icon(), mode.label()));
                let button = egui::Button::new(text)
                    .selected(selected)
                    .min_size(egui::vec2(0.0, 56.0));
                if ui.add_enabled(enabled, button).clicked() {
                    row.select(mode, gateway, handle);
                }
            });
        }
    });
}
