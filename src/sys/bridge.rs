use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::error::{Error, Result};

/// Copies files between this machine and the device.
pub trait DeviceBridge {
    fn pull(&self, remote: &str, local: &Path) -> Result<()>;
    fn push(&self, local: &Path, remote: &str) -> Result<()>;
}

/// Runs an adb-compatible program: `<program> pull|push <src> <dst>`.
#[derive(Debug, Clone)]
pub struct CommandBridge {
    program: String,
}

impl CommandBridge {
    pub fn new(program: impl Into<String>) -> Self { Self { program: program.into() } }

    fn run(&self, args: &[&OsStr]) -> Result<()> {
        let command = std::iter::once(OsStr::new(&self.program))
            .chain(args.iter().copied())
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");
        debug!(%command, "running device bridge");

        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::ExternalProcess {
                command: command.clone(),
                reason: e.to_string(),
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::process_status(command, output.status, &stderr));
        }
        Ok(())
    }
}

impl DeviceBridge for CommandBridge {
    fn pull(&self, remote: &str, local: &Path) -> Result<()> {
        info!(remote, local = %local.display(), "pulling from device");
        self.run(&[OsStr::new("pull"), OsStr::new(remote), local.as_os_str()])
    }

    fn push(&self, local: &Path, remote: &str) -> Result<()> {
        info!(remote, local = %local.display(), "pushing to device");
        self.run(&[OsStr::new("push"), local.as_os_str(), OsStr::new(remote)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_an_external_process_error() {
        let err = CommandBridge::new("false").pull("/sdcard/x.db", Path::new("x.db")).unwrap_err();
        match err {
            Error::ExternalProcess { command, reason } => {
                assert_eq!(command, "false pull /sdcard/x.db x.db");
                assert!(reason.contains("status 1"), "{reason}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn zero_exit_succeeds() {
        CommandBridge::new("true").push(Path::new("x.db"), "/sdcard/x.db").unwrap();
    }

    #[test]
    fn missing_program_is_an_external_process_error() {
        let bridge = CommandBridge::new("launcher-grid-no-such-bridge");
        let err = bridge.pull("/a", Path::new("b")).unwrap_err();
        assert!(matches!(err, Error::ExternalProcess { .. }));
    }
}
