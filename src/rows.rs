//! State behind each control in the panel, independent of egui.
//!
//! Every row remembers whether its backing file exists and whether a write
//! is in flight. A row that is unavailable or busy refuses new writes.

use std::path::PathBuf;

use crate::config::Config;
use crate::dispatch::UiHandle;
use crate::sysfs::{self, Completion, Gateway, WriteStatus};
use crate::types::{Attribute, ChargeLimit, FanMode, KbdBrightness, WriteOutcome, DRIVER_DIR};

/// On/off switch for a `"0"`/`"1"` attribute.
#[derive(Debug, Clone)]
pub struct ToggleRow {
    pub attribute: Attribute,
    pub path: PathBuf,
    pub available: bool,
    pub busy: bool,
    pub active: bool,
    on_value: &'static str,
    off_value: &'static str,
}

impl ToggleRow {
    pub fn new(attribute: Attribute, path: PathBuf) -> Self {
        let mut row = Self {
            attribute,
            path,
            available: false,
            busy: false,
            active: false,
            on_value: "1",
            off_value: "0",
        };
        row.refresh();
        row
    }

    pub fn enabled(&self) -> bool {
        self.available && !self.busy
    }

    pub fn refresh(&mut self) {
        self.available = sysfs::path_exists(&self.path);
        if !self.available {
            return;
        }
        if let Some(value) = sysfs::read(&self.path) {
            self.active = value == self.on_value;
        }
    }

    pub fn set(&mut self, on: bool, gateway: &Gateway, ui: &UiHandle<Panel>) -> Option<WriteStatus> {
        if !self.enabled() {
            return None;
        }
        let previous = self.active;
        let value = if on { self.on_value } else { self.off_value };
        self.active = on;
        self.busy = true;

        let attribute = self.attribute;
        let completion = Completion::new(ui, move |panel: &mut Panel, outcome| {
            if let Some(row) = panel.toggle_mut(attribute) {
                row.write_finished(previous, outcome);
            }
        });
        Some(gateway.write(&self.path, value, completion))
    }

    fn write_finished(&mut self, previous: bool, outcome: WriteOutcome) {
        self.busy = false;
        if !outcome.success {
            self.active = previous;
        }
    }
}

#[derive(Debug, Clone)]
pub struct FanModeRow {
    pub path: PathBuf,
    pub available: bool,
    pub busy: bool,
    pub current: Option<FanMode>,
}

impl FanModeRow {
    pub fn new(path: PathBuf) -> Self {
        let mut row = Self {
            path,
            available: false,
            busy: false,
            current: None,
        };
        row.refresh();
        row
    }

    pub fn enabled(&self) -> bool {
        self.available && !self.busy
    }

    pub fn refresh(&mut self) {
        self.available = sysfs::path_exists(&self.path);
        if !self.available {
            return;
        }
        if let Some(mode) = sysfs::read(&self.path).as_deref().and_then(FanMode::from_sysfs) {
            self.current = Some(mode);
        }
    }

    pub fn select(&mut self, mode: FanMode, gateway: &Gateway, ui: &UiHandle<Panel>) -> Option<WriteStatus> {
        if !self.enabled() || self.current == Some(mode) {
            return None;
        }
        self.busy = true;

        let completion = Completion::new(ui, move |panel: &mut Panel, outcome: WriteOutcome| {
            panel.fan.busy = false;
            if outcome.success {
                panel.fan.current = Some(mode);
            }
        });
        Some(gateway.write(&self.path, mode.as_sysfs(), completion))
    }
}

/// Charge limit dropdown with an explicit Apply button.
#[derive(Debug, Clone)]
pub struct BatteryRow {
    pub path: PathBuf,
    pub available: bool,
    pub busy: bool,
    pub selected: ChargeLimit,
}

impl BatteryRow {
    pub fn new(path: PathBuf) -> Self {
        let mut row = Self {
            path,
            available: false,
            busy: false,
            selected: ChargeLimit::Eighty,
        };
        row.refresh();
        row
    }

    pub fn enabled(&self) -> bool {
        self.available && !self.busy
    }

    pub fn refresh(&mut self) {
        self.available = sysfs::path_exists(&self.path);
        if !self.available {
            return;
        }
        match sysfs::read(&self.path) {
            Some(value) if !value.is_empty() => self.selected = ChargeLimit::from_sysfs(&value),
            _ => {}
        }
    }

    pub fn apply(&mut self, gateway: &Gateway, ui: &UiHandle<Panel>) -> Option<WriteStatus> {
        if !self.enabled() {
            return None;
        }
        self.busy = true;

        let completion = Completion::new(ui, |panel: &mut Panel, outcome: WriteOutcome| {
            panel.battery.busy = false;
            if !outcome.success {
                panel.battery.refresh();
            }
        });
        Some(gateway.write(&self.path, self.selected.as_sysfs(), completion))
    }
}

/// Off/Low/High buttons over the 0-255 LED brightness.
#[derive(Debug, Clone)]
pub struct KeyboardLightRow {
    pub path: PathBuf,
    pub available: bool,
    pub busy: bool,
    pub selected: Option<KbdBrightness>,
}

impl KeyboardLightRow {
    pub fn new(path: PathBuf) -> Self {
        let mut row = Self {
            path,
            available: false,
            busy: false,
            selected: None,
        };
        row.refresh();
        row
    }

    pub fn enabled(&self) -> bool {
        self.available && !self.busy
    }

    pub fn refresh(&mut self) {
        self.available = sysfs::path_exists(&self.path);
        if !self.available {
            return;
        }
        if let Some(level) = sysfs::read(&self.path).as_deref().and_then(KbdBrightness::from_sysfs) {
            self.selected = Some(level);
        }
    }

    pub fn select(&mut self, level: KbdBrightness, gateway: &Gateway, ui: &UiHandle<Panel>) -> Option<WriteStatus> {
        if !self.enabled() {
            return None;
        }
        self.selected = Some(level);
        self.busy = true;

        let completion = Completion::new(ui, |panel: &mut Panel, outcome: WriteOutcome| {
            panel.keyboard.busy = false;
            if !outcome.success {
                panel.keyboard.refresh();
            }
        });
        Some(gateway.write(&self.path, level.level(), completion))
    }
}

/// All controls shown by the window.
#[derive(Debug, Clone)]
pub struct Panel {
    pub driver_loaded: bool,
    pub reader_mode: ToggleRow,
    pub fn_lock: ToggleRow,
    pub usb_charge: ToggleRow,
    pub battery: BatteryRow,
    pub keyboard: KeyboardLightRow,
    pub touchpad: ToggleRow,
    pub fan: FanModeRow,
}

impl Panel {
    pub fn new(config: &Config) -> Self {
        let path = |attribute: Attribute| config.attribute_path(attribute.spec());
        let panel = Self {
            driver_loaded: sysfs::driver_loaded(&config.locate(DRIVER_DIR)),
            reader_mode: ToggleRow::new(Attribute::ReaderMode, path(Attribute::ReaderMode)),
            fn_lock: ToggleRow::new(Attribute::FnLock, path(Attribute::FnLock)),
            usb_charge: ToggleRow::new(Attribute::UsbCharge, path(Attribute::UsbCharge)),
            battery: BatteryRow::new(path(Attribute::BatteryLimit)),
            keyboard: KeyboardLightRow::new(path(Attribute::KeyboardLight)),
            touchpad: ToggleRow::new(Attribute::TouchpadLed, path(Attribute::TouchpadLed)),
            fan: FanModeRow::new(path(Attribute::FanMode)),
        };
        if !panel.driver_loaded {
            tracing::warn!("lg-laptop driver not loaded ({} missing)", DRIVER_DIR);
        }
        panel
    }

    pub fn toggle_mut(&mut self, attribute: Attribute) -> Option<&mut ToggleRow> {
        match attribute {
            Attribute::ReaderMode => Some(&mut self.reader_mode),
            Attribute::FnLock => Some(&mut self.fn_lock),
            Attribute::UsbCharge => Some(&mut self.usb_charge),
            Attribute::TouchpadLed => Some(&mut self.touchpad),
            _ => None,
        }
    }

    pub fn refresh_all(&mut self) {
        self.reader_mode.refresh();
        self.fn_lock.refresh();
        self.usb_charge.refresh();
        self.battery.refresh();
        self.keyboard.refresh();
        self.touchpad.refresh();
        self.fan.refresh();
    }
}
