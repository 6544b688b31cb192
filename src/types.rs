// Attribute table for the lg-laptop driver
pub const DRIVER_DIR: &str = "/sys/devices/platform/lg-laptop";

pub const READER_MODE: &str = "/sys/devices/platform/lg-laptop/reader_mode";
pub const FN_LOCK: &str = "/sys/devices/platform/lg-laptop/fn_lock";
pub const BATTERY_THRESHOLD: &str = "/sys/class/power_supply/CMB0/charge_control_end_threshold";
pub const FAN_MODE: &str = "/sys/devices/platform/lg-laptop/fan_mode";
pub const USB_CHARGE: &str = "/sys/devices/platform/lg-laptop/usb_charge";
pub const KBD_LED: &str = "/sys/class/leds/kbd_backlight/brightness";
pub const TPAD_LED: &str = "/sys/class/leds/tpad_led/brightness";

// Some kernels name the LED class devices after the driver
pub const KBD_LED_ALT: &str = "/sys/class/leds/lg_laptop::kbd_backlight/brightness";
pub const TPAD_LED_ALT: &str = "/sys/class/leds/lg_laptop::tpad/brightness";

const BINARY: &[&str] = &["0", "1"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    ReaderMode,
    FnLock,
    UsbCharge,
    BatteryLimit,
    KeyboardLight,
    TouchpadLed,
    FanMode,
}

/// Static description of one driver attribute.
#[derive(Debug, Clone, Copy)]
pub struct AttributeSpec {
    pub attribute: Attribute,
    /// Name used on the command line and in `status` output
    pub key: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub primary: &'static str,
    pub alternate: Option<&'static str>,
    /// Legal values, in sysfs text form
    pub domain: &'static [&'static str],
}

impl AttributeSpec {
    pub fn accepts(&self, value: &str) -> bool {
        self.domain.contains(&value)
    }
}

pub static ATTRIBUTES: [AttributeSpec; 7] = [
    AttributeSpec {
        attribute: Attribute::ReaderMode,
        key: "reader_mode",
        title: "Reader Mode",
        subtitle: "Reduces blue light for eye comfort",
        primary: READER_MODE,
        alternate: None,
        domain: BINARY,
    },
    AttributeSpec {
        attribute: Attribute::FnLock,
        key: "fn_lock",
        title: "FN Lock",
        subtitle: "Lock function keys as F1-F12",
        primary: FN_LOCK,
        alternate: None,
        domain: BINARY,
    },
    AttributeSpec {
        attribute: Attribute::UsbCharge,
        key: "usb_charge",
        title: "USB Charge (Off)",
        subtitle: "Enable USB charging when laptop is off",
        primary: USB_CHARGE,
        alternate: None,
        domain: BINARY,
    },
    AttributeSpec {
        attribute: Attribute::BatteryLimit,
        key: "battery_limit",
        title: "Battery Limit",
        subtitle: "Limit charge to extend battery lifespan",
        primary: BATTERY_THRESHOLD,
        alternate: None,
        domain: &["80", "100"],
    },
    AttributeSpec {
        attribute: Attribute::KeyboardLight,
        key: "kbd_backlight",
        title: "Keyboard Light",
        subtitle: "Keyboard backlight brightness",
        primary: KBD_LED,
        alternate: Some(KBD_LED_ALT),
        domain: &["0", "127", "255"],
    },
    AttributeSpec {
        attribute: Attribute::TouchpadLed,
        key: "touchpad_led",
        title: "Touchpad LED",
        subtitle: "Touchpad indicator LED",
        primary: TPAD_LED,
        alternate: Some(TPAD_LED_ALT),
        domain: BINARY,
    },
    AttributeSpec {
        attribute: Attribute::FanMode,
        key: "fan_mode",
        title: "Fan Mode",
        subtitle: "Cooling profile",
        primary: FAN_MODE,
        alternate: None,
        domain: &["0", "1", "2"],
    },
];

impl Attribute {
    pub fn spec(self) -> &'static AttributeSpec {
        // The table is indexed by declaration order
        &ATTRIBUTES[self as usize]
    }

    pub fn from_key(key: &str) -> Option<Self> {
        ATTRIBUTES.iter().find(|s| s.key == key).map(|s| s.attribute)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanMode {
    Optimal = 0,
    Silent = 1,
    Performance = 2,
}

impl FanMode {
    /// Button order in the cooling section
    pub const DISPLAY_ORDER: [FanMode; 3] = [FanMode::Silent, FanMode::Optimal, FanMode::Performance];

    pub fn from_sysfs(value: &str) -> Option<Self> {
        match value.trim().parse::<i64>().ok()? {
            0 => Some(Self::Optimal),
            1 => Some(Self::Silent),
            2 => Some(Self::Performance),
            _ => None,
        }
    }

    pub fn as_sysfs(self) -> &'static str {
        match self {
            Self::Optimal => "0",
            Self::Silent => "1",
            Self::Performance => "2",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Optimal => "Optimal",
            Self::Silent => "Silent",
            Self::Performance => "Performance",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Optimal => "✔",
            Self::Silent => "☀",
            Self::Performance => "🔥",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeLimit {
    Eighty,
    Full,
}

impl ChargeLimit {
    pub const ALL: [ChargeLimit; 2] = [ChargeLimit::Eighty, ChargeLimit::Full];

    /// "80" selects the limit; anything else reads as a full charge.
    pub fn from_sysfs(value: &str) -> Self {
        if value == "80" {
            Self::Eighty
        } else {
            Self::Full
        }
    }

    pub fn as_sysfs(self) -> &'static str {
        match self {
            Self::Eighty => "80",
            Self::Full => "100",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Eighty => "80%",
            Self::Full => "100%",
        }
    }
}

/// Discrete keyboard backlight levels offered by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KbdBrightness {
    Off,
    Low,
    High,
}

impl KbdBrightness {
    pub const ALL: [KbdBrightness; 3] = [KbdBrightness::Off, KbdBrightness::Low, KbdBrightness::High];

    pub fn level(self) -> u32 {
        match self {
            Self::Off => 0,
            Self::Low => 127,
            Self::High => 255,
        }
    }

    /// Buckets a raw brightness: 0, 1..=127, 128 and above.
    pub fn from_level(level: u32) -> Self {
        match level {
            0 => Self::Off,
            1..=127 => Self::Low,
            _ => Self::High,
        }
    }

    pub fn from_sysfs(value: &str) -> Option<Self> {
        value.trim().parse::<u32>().ok().map(Self::from_level)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Low => "Low",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMechanism {
    Direct,
    Privileged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    pub success: bool,
    pub mechanism: WriteMechanism,
}

impl WriteOutcome {
    pub fn direct(success: bool) -> Self {
        Self { success, mechanism: WriteMechanism::Direct }
    }

    pub fn privileged(success: bool) -> Self {
        Self { success, mechanism: WriteMechanism::Privileged }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_attribute() {
        for spec in ATTRIBUTES.iter() {
            assert_eq!(spec.attribute.spec().key, spec.key);
        }
    }

    #[test]
    fn only_leds_have_alternate_paths() {
        let with_alt: Vec<_> = ATTRIBUTES
            .iter()
            .filter(|s| s.alternate.is_some())
            .map(|s| s.attribute)
            .collect();
        assert_eq!(with_alt, vec![Attribute::KeyboardLight, Attribute::TouchpadLed]);
    }

    #[test]
    fn fan_mode_two_is_performance() {
        assert_eq!(FanMode::from_sysfs("2"), Some(FanMode::Performance));
        assert_eq!(FanMode::from_sysfs("0\n"), Some(FanMode::Optimal));
        assert_eq!(FanMode::from_sysfs("7"), None);
        assert_eq!(FanMode::from_sysfs("fast"), None);
    }

    #[test]
    fn brightness_buckets() {
        assert_eq!(KbdBrightness::from_sysfs("0"), Some(KbdBrightness::Off));
        assert_eq!(KbdBrightness::from_sysfs("1"), Some(KbdBrightness::Low));
        assert_eq!(KbdBrightness::from_sysfs("127"), Some(KbdBrightness::Low));
        assert_eq!(KbdBrightness::from_sysfs("128"), Some(KbdBrightness::High));
        assert_eq!(KbdBrightness::from_sysfs("200"), Some(KbdBrightness::High));
        assert_eq!(KbdBrightness::from_sysfs("-3"), None);
    }

    #[test]
    fn charge_limit_reads_anything_but_80_as_full() {
        assert_eq!(ChargeLimit::from_sysfs("80"), ChargeLimit::Eighty);
        assert_eq!(ChargeLimit::from_sysfs("100"), ChargeLimit::Full);
        assert_eq!(ChargeLimit::from_sysfs("95"), ChargeLimit::Full);
    }

    #[test]
    fn domain_matching() {
        let fan = Attribute::FanMode.spec();
        assert!(fan.accepts("2"));
        assert!(!fan.accepts("3"));
        assert_eq!(Attribute::from_key("kbd_backlight"), Some(Attribute::KeyboardLight));
        assert_eq!(Attribute::from_key("brightness"), None);
    }
}
