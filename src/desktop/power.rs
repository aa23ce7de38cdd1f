//! Power devices and session power actions

use serde::Serialize;

use crate::entity::command;
use crate::entity::{Base, CommandBus, Entity, Kind, Postable};
use crate::registry::RegistryError;

/// Device types reported by the power subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    #[default]
    Unknown,
    LinePower,
    Battery,
    Ups,
    Monitor,
    Mouse,
    Keyboard,
    Pda,
    Phone,
}

impl From<u32> for DeviceType {
    fn from(value: u32) -> Self {
        match value {
            1 => DeviceType::LinePower,
            2 => DeviceType::Battery,
            3 => DeviceType::Ups,
            4 => DeviceType::Monitor,
            5 => DeviceType::Mouse,
            6 => DeviceType::Keyboard,
            7 => DeviceType::Pda,
            8 => DeviceType::Phone,
            _ => DeviceType::Unknown,
        }
    }
}

/// Charge state of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceState {
    #[default]
    Unknown,
    Charging,
    Discharging,
    Empty,
    FullyCharged,
    PendingCharge,
    PendingDischarge,
}

impl From<u32> for DeviceState {
    fn from(value: u32) -> Self {
        match value {
            1 => DeviceState::Charging,
            2 => DeviceState::Discharging,
            3 => DeviceState::Empty,
            4 => DeviceState::FullyCharged,
            5 => DeviceState::PendingCharge,
            6 => DeviceState::PendingDischarge,
            _ => DeviceState::Unknown,
        }
    }
}

impl std::fmt::Display for DeviceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DeviceState::Unknown => "Unknown",
            DeviceState::Charging => "Charging",
            DeviceState::Discharging => "Discharging",
            DeviceState::Empty => "Empty",
            DeviceState::FullyCharged => "Fully charged",
            DeviceState::PendingCharge => "Pending charge",
            DeviceState::PendingDischarge => "Pending discharge",
        };
        f.write_str(s)
    }
}

/// A power device such as a battery or the AC adapter
///
/// Read only; devices have no capabilities.
#[derive(Debug, Clone, Serialize)]
pub struct Device {
    #[serde(flatten)]
    pub base: Base,
    pub id: String,
    pub device_type: DeviceType,
    pub model: String,
    pub state: DeviceState,
    pub percentage: f64,
    pub online: bool,
    /// The composite device summarising all batteries
    pub display_device: bool,
}

impl Device {
    pub fn new(
        id: impl Into<String>,
        device_type: DeviceType,
        model: impl Into<String>,
        state: DeviceState,
        percentage: f64,
    ) -> Self {
        let model = model.into();
        let title = match device_type {
            DeviceType::LinePower => "Line Power".to_string(),
            DeviceType::Battery => format!("Battery {}", model).trim_end().to_string(),
            _ => model.clone(),
        };
        let subtitle = match device_type {
            DeviceType::Battery => format!("{} {:.0}%", state, percentage),
            _ => state.to_string(),
        };
        let icon = match device_type {
            DeviceType::LinePower => "ac-adapter",
            DeviceType::Battery => "battery",
            _ => "",
        };

        Self {
            base: Base::new(title, subtitle, icon, Kind::Device),
            id: id.into(),
            device_type,
            model,
            state,
            percentage,
            online: false,
            display_device: false,
        }
    }

    pub fn with_online(mut self, online: bool) -> Self {
        self.online = online;
        self
    }

    pub fn with_display_device(mut self, display_device: bool) -> Self {
        self.display_device = display_device;
        self
    }
}

impl Entity for Device {
    fn base(&self) -> &Base {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Base {
        &mut self.base
    }
}

/// Session power actions seeded at startup: (key, title, icon)
pub const POWER_ACTIONS: [(&str, &str, &str); 3] = [
    ("shutdown", "Power off", "system-shutdown"),
    ("reboot", "Reboot", "system-reboot"),
    ("suspend", "Suspend", "system-suspend"),
];

/// A session power action: power off, reboot or suspend
#[derive(Debug, Clone, Serialize)]
pub struct PowerAction {
    #[serde(flatten)]
    pub base: Base,
    #[serde(skip)]
    commands: CommandBus,
}

impl PowerAction {
    pub fn new(title: &str, icon: &str, commands: &CommandBus) -> Self {
        Self {
            base: Base::new(title, "", icon, Kind::Start).with_action("", title, icon),
            commands: commands.clone(),
        }
    }
}

impl Entity for PowerAction {
    fn base(&self) -> &Base {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Base {
        &mut self.base
    }

    fn as_postable(&self) -> Option<&dyn Postable> {
        Some(self)
    }
}

impl Postable for PowerAction {
    fn post(&self, action: &str) -> Result<(), RegistryError> {
        command::post_default(&self.commands, &self.base, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_titles() {
        let battery = Device::new("bat0", DeviceType::Battery, "BAT0", DeviceState::Discharging, 84.6);
        assert_eq!(battery.base.title, "Battery BAT0");
        assert_eq!(battery.base.subtitle, "Discharging 85%");

        let ac = Device::new("ac", DeviceType::LinePower, "", DeviceState::Unknown, 0.0);
        assert_eq!(ac.base.title, "Line Power");

        let mouse = Device::new("m", DeviceType::from(5), "MX Master", DeviceState::from(0), 50.0);
        assert_eq!(mouse.base.title, "MX Master");
        assert_eq!(mouse.device_type, DeviceType::Mouse);
    }

    #[test]
    fn test_device_has_no_capabilities() {
        let device = Device::new("bat0", DeviceType::Battery, "", DeviceState::Charging, 10.0);
        assert!(device.as_postable().is_none());
        assert!(device.as_deletable().is_none());
    }

    #[test]
    fn test_power_action_default_only() {
        let commands = CommandBus::new();
        let action = PowerAction::new("Reboot", "system-reboot", &commands);
        assert!(action.post("").is_ok());
        assert!(action.post("now").is_err());
    }
}
