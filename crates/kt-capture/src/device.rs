//! evdev-backed input sources.

use std::io;
use std::path::{Path, PathBuf};

use evdev::{Device, InputEvent, PropType};
use kt_core::{EventKind, InputSource, RawInput};

use crate::DeviceInfo;
use crate::classify::{PointerAxes, classify, decode, is_pointer_axis, is_position_axis};

/// Reads one device node on behalf of one device class.
pub struct EvdevSource {
    device: Device,
    class: EventKind,
}

impl EvdevSource {
    pub fn open(path: &Path, class: EventKind) -> io::Result<Self> {
        let device = Device::open(path)?;
        Ok(Self { device, class })
    }
}

impl InputSource for EvdevSource {
    fn wait(&mut self) -> io::Result<Option<Vec<RawInput>>> {
        let class = self.class;
        let batch = self
            .device
            .fetch_events()?
            .filter_map(|event: InputEvent| {
                decode(class, event.event_type().0, event.code(), event.value())
            })
            .collect();
        Ok(Some(batch))
    }
}

fn describe(path: PathBuf, device: &Device) -> DeviceInfo {
    let has_key = |code: u16| {
        device
            .supported_keys()
            .is_some_and(|keys| keys.contains(evdev::Key::new(code)))
    };
    let pointer = PointerAxes {
        relative: device
            .supported_relative_axes()
            .is_some_and(|axes| axes.iter().filter(|axis| is_pointer_axis(axis.0)).count() == 2),
        absolute: device
            .supported_absolute_axes()
            .is_some_and(|axes| axes.iter().filter(|axis| is_position_axis(axis.0)).count() == 2),
        pointer_property: device.properties().contains(PropType::POINTER),
    };
    DeviceInfo {
        path,
        name: device.name().unwrap_or("unknown device").to_string(),
        classes: classify(has_key, pointer),
    }
}

/// Every readable device node under `/dev/input`.
///
/// Nodes the process lacks permission to open are skipped silently.
pub fn enumerate() -> Vec<DeviceInfo> {
    let mut devices: Vec<DeviceInfo> = evdev::enumerate()
        .map(|(path, device)| describe(path, &device))
        .collect();
    devices.sort_by(|a, b| a.path.cmp(&b.path));
    devices
}

/// Opens and describes a specific device node.
pub fn inspect(path: &Path) -> io::Result<DeviceInfo> {
    let device = Device::open(path)?;
    Ok(describe(path.to_path_buf(), &device))
}
