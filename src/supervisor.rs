use std::env;
use std::ffi::OsString;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::error::LaunchError;
use crate::process::{ChildProcess, Launcher, SystemLauncher};
use crate::resolver;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Running { pid: u32 },
    Exited { code: i32 },
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Something the user should see in a dialog, as opposed to the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub body: String,
}

impl Notice {
    fn new(severity: Severity, title: &str, body: String) -> Self {
        Notice {
            severity,
            title: title.to_owned(),
            body,
        }
    }
}

impl From<&LaunchError> for Notice {
    fn from(err: &LaunchError) -> Self {
        match err {
            LaunchError::BinaryNotFound { candidate } => Notice::new(
                Severity::Error,
                "Binary not found",
                format!(
                    "Could not find '{candidate}'.\n\nUse Browse... to locate the dump1090 executable."
                ),
            ),
            LaunchError::PermissionDenied { path } => Notice::new(
                Severity::Error,
                "Permission denied",
                format!(
                    "Cannot execute '{0}'.\nTry: chmod +x {0}",
                    path.display()
                ),
            ),
            LaunchError::Failed { source, .. } => {
                Notice::new(Severity::Error, "Launch failed", source.to_string())
            }
            LaunchError::AlreadyRunning => Notice::new(
                Severity::Info,
                "Already running",
                "Stop the current process first.".to_owned(),
            ),
        }
    }
}

/// Owns the single decoder process. Liveness is polled on deadlines driven by
/// `tick`, so nothing here ever blocks the UI thread.
pub struct Supervisor<L: Launcher = SystemLauncher> {
    launcher: L,
    child: Option<L::Child>,
    state: State,
    status: String,
    next_poll: Option<Instant>,
    notices: Vec<Notice>,
    /// Stopped children not yet seen to exit; drained without waiting.
    reaping: Vec<L::Child>,
    search_path: Option<OsString>,

    first_poll_delay: Duration,
    poll_interval: Duration,
}

impl Supervisor {
    pub fn new(settings: &Settings) -> Self {
        Supervisor::with_launcher(SystemLauncher, settings)
    }
}

impl<L: Launcher> Supervisor<L> {
    pub fn with_launcher(launcher: L, settings: &Settings) -> Self {
        Supervisor {
            launcher,
            child: None,
            state: State::Idle,
            status: "Ready.".to_owned(),
            next_poll: None,
            notices: vec![],
            reaping: vec![],
            search_path: env::var_os("PATH"),
            first_poll_delay: settings.first_poll_delay,
            poll_interval: settings.poll_interval,
        }
    }

    /// Replaces the search path used to resolve bare binary names.
    pub fn with_search_path(mut self, search_path: Option<OsString>) -> Self {
        self.search_path = search_path;
        self
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.child.is_some()
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().map(ChildProcess::id)
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    #[cfg(test)]
    pub fn next_poll(&self) -> Option<Instant> {
        self.next_poll
    }

    #[cfg(test)]
    pub fn reaping_len(&self) -> usize {
        self.reaping.len()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Resolves `command[0]` and spawns it with the remaining tokens.
    /// Every failure is also queued as a notice.
    pub fn launch(&mut self, command: &[String], now: Instant) -> Result<u32, LaunchError> {
        self.reap();

        let result = self.try_launch(command, now);
        if let Err(e) = &result {
            warn!("Launch rejected: {e}");
            self.notices.push(Notice::from(e));

            if !matches!(e, LaunchError::AlreadyRunning) {
                self.state = State::Idle;
                self.status = "Ready.".to_owned();
            }
        }
        result
    }

    fn try_launch(&mut self, command: &[String], now: Instant) -> Result<u32, LaunchError> {
        if self.child_alive() {
            return Err(LaunchError::AlreadyRunning);
        }

        let (binary, args) = match command.split_first() {
            Some((binary, args)) => (binary.as_str(), args),
            None => ("", &[][..]),
        };

        let resolved = resolver::resolve_in(binary, self.search_path.as_deref())?;
        let child = self
            .launcher
            .spawn(&resolved, args)
            .map_err(|e| LaunchError::from_spawn(resolved.clone(), e))?;

        let pid = child.id();
        let command_line = std::iter::once(resolved.display().to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");

        info!("Started pid {pid}: {command_line}");

        self.child = Some(child);
        self.state = State::Running { pid };
        self.status = format!("Running (PID {pid}) - {command_line}");
        self.next_poll = Some(now + self.first_poll_delay);

        Ok(pid)
    }

    /// True when a handle exists and its process has not been seen to exit.
    /// A handle whose process already exited is released here.
    fn child_alive(&mut self) -> bool {
        let Some(child) = self.child.as_mut() else {
            return false;
        };

        match child.try_exit_code() {
            Ok(Some(code)) => {
                debug!("Releasing exited pid {} (code {code})", child.id());
                self.child = None;
                self.next_poll = None;
                false
            }
            Ok(None) => true,
            Err(e) => {
                debug!("Unable to check pid {}: {e}", child.id());
                true
            }
        }
    }

    /// Runs the liveness check once its deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        self.reap();

        if self.next_poll.map_or(false, |due| now >= due) {
            self.next_poll = None;
            self.poll(now);
        }
    }

    /// How long until `tick` has work to do. Pending reaps keep the
    /// schedule alive at the regular interval.
    pub fn time_until_poll(&self, now: Instant) -> Option<Duration> {
        let poll = self.next_poll.map(|due| due.saturating_duration_since(now));
        if self.reaping.is_empty() {
            return poll;
        }

        Some(poll.map_or(self.poll_interval, |wait| wait.min(self.poll_interval)))
    }

    fn reap(&mut self) {
        self.reaping.retain_mut(|child| match child.try_exit_code() {
            Ok(None) => true,
            Ok(Some(code)) => {
                debug!("Reaped stopped pid {} (code {code})", child.id());
                false
            }
            Err(e) => {
                debug!("Giving up on stopped pid {}: {e}", child.id());
                false
            }
        });
    }

    pub fn poll(&mut self, now: Instant) {
        // Stopped or already reported; a leftover schedule ends here
        let Some(child) = self.child.as_mut() else {
            self.next_poll = None;
            return;
        };

        let code = match child.try_exit_code() {
            Ok(Some(code)) => code,
            Ok(None) => {
                debug!("pid {} still running", child.id());
                self.next_poll = Some(now + self.poll_interval);
                return;
            }
            Err(e) => {
                warn!("Unable to check pid {}: {e}", child.id());
                self.next_poll = Some(now + self.poll_interval);
                return;
            }
        };

        let pid = child.id();
        self.child = None;
        self.next_poll = None;
        self.state = State::Exited { code };
        self.status = format!("Process exited with code {code}.");

        if code == 0 {
            info!("pid {pid} exited with code 0");
        } else {
            warn!("pid {pid} exited with code {code}");
            self.notices.push(Notice::new(
                Severity::Warning,
                "Process exited",
                format!("dump1090 exited with code {code}.\nCheck that your SDR device is connected."),
            ));
        }
    }

    /// Best-effort termination. The handle is dropped whether or not the
    /// signal could be delivered, and calling this with no process is fine.
    pub fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let pid = child.id();
            match child.terminate() {
                Ok(()) => info!("Sent termination request to pid {pid}"),
                Err(e) => debug!("Ignoring failure to terminate pid {pid}: {e}"),
            }
            self.reaping.push(child);
        }

        self.next_poll = None;
        self.state = State::Stopped;
        self.status = "Stopped.".to_owned();
    }
}

impl<L: Launcher> Drop for Supervisor<L> {
    fn drop(&mut self) {
        if self.child.is_some() {
            self.stop();
        }
    }
}
