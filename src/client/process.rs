use std::io;
use std::process::{Child, Command, ExitStatus, Stdio};

/// Exclusive handle on the background API service. The process is killed and
/// reaped by `shutdown`, or by `Drop` on any other exit path.
pub struct ServiceProcess {
    child: Option<Child>,
}

impl ServiceProcess {
    pub fn spawn(mut command: Command) -> io::Result<Self> {
        let child = command.stdin(Stdio::null()).spawn()?;
        tracing::info!("Started API service (pid {})", child.id());
        Ok(Self { child: Some(child) })
    }

    /// Re-run the current executable as `serve` on `port`.
    pub fn launch(port: u16) -> io::Result<Self> {
        let mut command = Command::new(std::env::current_exe()?);
        command
            .arg("serve")
            .arg("--port")
            .arg(port.to_string())
            .stdout(Stdio::null());
        // Keep request logs off the interactive terminal unless asked for.
        if std::env::var_os("RUST_LOG").is_none() {
            command.env("RUST_LOG", "warn");
        }
        Self::spawn(command)
    }

    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    pub fn is_running(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    pub fn shutdown(mut self) -> io::Result<Option<ExitStatus>> {
        self.terminate()
    }

    fn terminate(&mut self) -> io::Result<Option<ExitStatus>> {
        let Some(mut child) = self.child.take() else {
            return Ok(None);
        };

        if child.try_wait()?.is_none() {
            child.kill()?;
        }
        let status = child.wait()?;
        tracing::info!("API service (pid {}) stopped: {}", child.id(), status);
        Ok(Some(status))
    }
}

impl Drop for ServiceProcess {
    fn drop(&mut self) {
        if let Err(e) = self.terminate() {
            tracing::warn!("Failed to stop API service: {}", e);
        }
    }
}
