//! Input device listeners for keytally.
//!
//! Discovers keyboards and mice, then starts one listener thread per
//! device and class. Each listener owns its own store connection and writes
//! every event as it arrives.
//!
//! Only Linux evdev is supported. Reading `/dev/input/event*` requires root or
//! membership in the `input` group.

pub mod classify;
#[cfg(target_os = "linux")]
mod device;

use std::path::PathBuf;
use std::thread::JoinHandle;

use kt_core::{Clock, EventKind, ListenerStats};
use kt_db::{Store, StoreError};
use thiserror::Error;

/// Errors starting capture. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// No input backend exists for this platform.
    #[error("input capture is not supported on this platform")]
    Unsupported,
    /// Discovery found nothing readable for an enabled device class.
    #[error(
        "no {kind} found among readable input devices; run `kt devices` to see how each was classified (reading /dev/input requires root or membership in the `input` group)"
    )]
    NoDevices { kind: EventKind },
    /// A configured device could not be opened.
    #[error("failed to open input device {}: {source}", path.display())]
    OpenDevice {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A configured device is neither a keyboard nor a mouse.
    #[error("{} is neither a keyboard nor a mouse", path.display())]
    Unclassified { path: PathBuf },
    /// The store could not provide a connection for a listener.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The listener thread could not be started.
    #[error("failed to spawn listener thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Which listeners to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfig {
    pub keyboard: bool,
    pub mouse: bool,
    /// Device nodes to read. Empty means discover automatically.
    pub devices: Vec<PathBuf>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            keyboard: true,
            mouse: true,
            devices: Vec::new(),
        }
    }
}

impl CaptureConfig {
    const fn enabled(&self, kind: EventKind) -> bool {
        match kind {
            EventKind::Keyboard => self.keyboard,
            EventKind::Mouse => self.mouse,
        }
    }
}

/// A detected input device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub path: PathBuf,
    pub name: String,
    pub classes: Vec<EventKind>,
}

/// A running listener.
#[derive(Debug)]
pub struct Listener {
    pub name: String,
    pub kind: EventKind,
    pub path: PathBuf,
    pub handle: JoinHandle<ListenerStats>,
}

/// One device node to listen on, for one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub path: PathBuf,
    pub kind: EventKind,
}

/// Picks listener targets from detected devices.
///
/// Fails when an enabled class ends up with no device, so a missing
/// permission is reported instead of silently capturing nothing.
pub fn plan_targets(
    devices: &[DeviceInfo],
    config: &CaptureConfig,
) -> Result<Vec<Target>, CaptureError> {
    let mut targets = Vec::new();
    for kind in [EventKind::Keyboard, EventKind::Mouse] {
        if !config.enabled(kind) {
            continue;
        }
        let before = targets.len();
        targets.extend(
            devices
                .iter()
                .filter(|device| device.classes.contains(&kind))
                .map(|device| Target {
                    path: device.path.clone(),
                    kind,
                }),
        );
        if targets.len() == before {
            return Err(CaptureError::NoDevices { kind });
        }
    }
    Ok(targets)
}

/// Lists readable input devices.
#[cfg(target_os = "linux")]
pub fn list_devices() -> Result<Vec<DeviceInfo>, CaptureError> {
    Ok(device::enumerate())
}

#[cfg(not(target_os = "linux"))]
pub fn list_devices() -> Result<Vec<DeviceInfo>, CaptureError> {
    Err(CaptureError::Unsupported)
}

/// Starts listeners for every configured device class.
///
/// Device discovery and store connections happen on the calling thread, so
/// any failure surfaces here before a listener runs.
#[cfg(target_os = "linux")]
pub fn start<C>(store: &Store, config: &CaptureConfig, clock: &C) -> Result<Vec<Listener>, CaptureError>
where
    C: Clock + Clone + 'static,
{
    use kt_core::{Adapter, LinuxKeymap, spawn_listener};
    use tracing::info;

    let devices = if config.devices.is_empty() {
        device::enumerate()
    } else {
        let mut devices = Vec::with_capacity(config.devices.len());
        for path in &config.devices {
            let info = device::inspect(path).map_err(|source| CaptureError::OpenDevice {
                path: path.clone(),
                source,
            })?;
            if info.classes.is_empty() {
                return Err(CaptureError::Unclassified { path: path.clone() });
            }
            devices.push(info);
        }
        devices
    };

    let targets = plan_targets(&devices, config)?;
    let mut listeners = Vec::with_capacity(targets.len());
    for (index, target) in targets.into_iter().enumerate() {
        let source = device::EvdevSource::open(&target.path, target.kind).map_err(|source| {
            CaptureError::OpenDevice {
                path: target.path.clone(),
                source,
            }
        })?;
        let sink = store.connect()?;
        let adapter = match target.kind {
            EventKind::Keyboard => Adapter::keyboard(LinuxKeymap),
            EventKind::Mouse => Adapter::mouse(LinuxKeymap),
        };
        let name = format!("kt-{}-{index}", target.kind);
        info!(listener = %name, device = %target.path.display(), "starting listener");
        let handle = spawn_listener(name.clone(), adapter, source, sink, clock.clone())
            .map_err(CaptureError::Spawn)?;
        listeners.push(Listener {
            name,
            kind: target.kind,
            path: target.path,
            handle,
        });
    }
    Ok(listeners)
}

#[cfg(not(target_os = "linux"))]
pub fn start<C>(
    _store: &Store,
    _config: &CaptureConfig,
    _clock: &C,
) -> Result<Vec<Listener>, CaptureError>
where
    C: Clock + Clone + 'static,
{
    Err(CaptureError::Unsupported)
}
