//! Devices command for listing input devices.

use std::io::Write;

use anyhow::Result;
use kt_capture::DeviceInfo;

pub fn run<W: Write>(writer: &mut W, devices: &[DeviceInfo]) -> Result<()> {
    if devices.is_empty() {
        writeln!(writer, "No readable input devices found.")?;
        writeln!(
            writer,
            "Reading /dev/input requires root or membership in the `input` group."
        )?;
        return Ok(());
    }

    for device in devices {
        let classes = if device.classes.is_empty() {
            "ignored".to_string()
        } else {
            device
                .classes
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        writeln!(
            writer,
            "- {}: {} ({classes})",
            device.path.display(),
            device.name
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    use insta::assert_snapshot;
    use kt_core::EventKind;

    #[test]
    fn devices_command_shows_classification() {
        let devices = vec![
            DeviceInfo {
                path: PathBuf::from("/dev/input/event0"),
                name: "Power Button".to_string(),
                classes: vec![],
            },
            DeviceInfo {
                path: PathBuf::from("/dev/input/event3"),
                name: "Logitech K400".to_string(),
                classes: vec![EventKind::Keyboard, EventKind::Mouse],
            },
            DeviceInfo {
                path: PathBuf::from("/dev/input/event4"),
                name: "USB Optical Mouse".to_string(),
                classes: vec![EventKind::Mouse],
            },
        ];

        let mut output = Vec::new();
        run(&mut output, &devices).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        - /dev/input/event0: Power Button (ignored)
        - /dev/input/event3: Logitech K400 (keyboard, mouse)
        - /dev/input/event4: USB Optical Mouse (mouse)
        ");
    }

    #[test]
    fn devices_command_hints_at_permissions() {
        let mut output = Vec::new();
        run(&mut output, &[]).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("`input` group"));
    }
}
