use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Grace period between SIGTERM and SIGKILL
pub const TERMINATION_GRACE: Duration = Duration::from_secs(1);

/// Stops running instances of an application before its binary is touched.
///
/// Best effort: implementations log problems and never fail the caller.
pub trait ProcessControl {
    fn terminate(&self, application_name: &str);
}

/// Signals processes by exact name through `pgrep`/`pkill`.
#[derive(Debug, Clone)]
pub struct Pkill {
    grace: Duration,
}

impl Default for Pkill {
    fn default() -> Self {
        Self {
            grace: TERMINATION_GRACE,
        }
    }
}

impl Pkill {
    pub fn with_grace(grace: Duration) -> Self {
        Self { grace }
    }
}

/// Linux keeps at most this many bytes of the executable name in `comm`,
/// which is what `pgrep -x`/`pkill -x` compare against
const COMM_LEN: usize = 15;

/// Name as the kernel reports it for a process running `application_name`
fn process_name(application_name: &str) -> &str {
    if application_name.len() <= COMM_LEN {
        return application_name;
    }
    let mut end = COMM_LEN;
    while !application_name.is_char_boundary(end) {
        end -= 1;
    }
    &application_name[..end]
}

/// External utilities this module shells out to
pub const REQUIRED_UTILITIES: &[&str] = &["pgrep", "pkill"];

fn is_running(application_name: &str) -> bool {
    Command::new("pgrep")
        .arg("-x")
        .arg(application_name)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

fn signal(application_name: &str, sig: &str) {
    let result = Command::new("pkill")
        .arg(format!("-{sig}"))
        .arg("-x")
        .arg(application_name)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        // 1 means nothing matched, which is fine
        Ok(status) if status.success() || status.code() == Some(1) => {}
        Ok(status) => {
            warn!(application = application_name, sig, %status, "pkill reported an error")
        }
        Err(e) => {
            warn!(application = application_name, sig, error = %e, "failed to run pkill")
        }
    }
}

/// Whether `application_name` names this very process
fn is_self(application_name: &str) -> bool {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.file_name().map(|n| n == application_name))
        .unwrap_or(false)
}

impl ProcessControl for Pkill {
    fn terminate(&self, application_name: &str) {
        if is_self(application_name) {
            warn!(application = application_name, "not signalling own process name");
            return;
        }
        let name = process_name(application_name);
        if name != application_name {
            debug!(application = application_name, name, "matching truncated process name");
        }
        if !is_running(name) {
            debug!(application = application_name, "no running instances");
            return;
        }

        debug!(application = application_name, "sending SIGTERM");
        signal(name, "TERM");
        thread::sleep(self.grace);

        if is_running(name) {
            warn!(application = application_name, "still running after SIGTERM, sending SIGKILL");
            signal(name, "KILL");
        }
    }
}
