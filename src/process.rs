use std::io;
use std::path::Path;
use std::process::{Child, Command, ExitStatus};

/// A spawned child as seen by the supervisor.
pub trait ChildProcess {
    fn id(&self) -> u32;

    /// Non-blocking exit check; `None` while the process is alive.
    fn try_exit_code(&mut self) -> io::Result<Option<i32>>;

    /// Asks the process to exit. Does not wait for it.
    fn terminate(&mut self) -> io::Result<()>;
}

pub trait Launcher {
    type Child: ChildProcess;

    fn spawn(&mut self, program: &Path, args: &[String]) -> io::Result<Self::Child>;
}

/// Spawns real OS processes. Standard streams and environment are inherited.
#[derive(Debug, Default)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    type Child = SystemChild;

    fn spawn(&mut self, program: &Path, args: &[String]) -> io::Result<SystemChild> {
        let child = Command::new(program).args(args).spawn()?;
        Ok(SystemChild { child })
    }
}

#[derive(Debug)]
pub struct SystemChild {
    child: Child,
}

impl ChildProcess for SystemChild {
    fn id(&self) -> u32 {
        self.child.id()
    }

    fn try_exit_code(&mut self) -> io::Result<Option<i32>> {
        Ok(self.child.try_wait()?.map(exit_code))
    }

    #[cfg(unix)]
    fn terminate(&mut self) -> io::Result<()> {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        // Already reaped; the pid may belong to someone else by now
        if self.child.try_wait()?.is_some() {
            return Ok(());
        }

        let pid = i32::try_from(self.child.id())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        kill(Pid::from_raw(pid), Signal::SIGTERM)?;

        // Reap straight away if it went quickly, otherwise leave it be
        let _ = self.child.try_wait();
        Ok(())
    }

    #[cfg(not(unix))]
    fn terminate(&mut self) -> io::Result<()> {
        self.child.kill()
    }
}

/// Exit code of a finished process. Signal deaths map to `-signal` on Unix.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    -1
}
