use std::process::{Child, Command, Stdio};

use tracing::{debug, warn};
use which::which;

use crate::error::LaunchError;

/// Fire-and-forget hand-off of a URL to whatever the host uses to open it.
pub trait Navigator {
    fn open_external(&mut self, url: &str) -> Result<(), LaunchError>;
}

/// A hidden attempt at a deep link that must be released exactly once.
pub trait ProbeHandle {
    fn teardown(self: Box<Self>);
}

pub trait Prober {
    fn start_probe(&mut self, link: &str) -> std::io::Result<Box<dyn ProbeHandle>>;
}

/// Owns a probe and tears it down when released or dropped.
pub struct ProbeGuard {
    handle: Option<Box<dyn ProbeHandle>>,
}

impl ProbeGuard {
    pub fn new(handle: Box<dyn ProbeHandle>) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    pub fn release(mut self) {
        self.teardown_now();
    }

    fn teardown_now(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.teardown();
        }
    }
}

impl Drop for ProbeGuard {
    fn drop(&mut self) {
        self.teardown_now();
    }
}

/// Uses the host's default URL handler (xdg-open, open, start, ...).
#[derive(Debug, Default)]
pub struct SystemOpener;

impl SystemOpener {
    /// Whether any known URL handler program is on PATH.
    pub fn is_available() -> bool {
        handler_command("https://example.invalid").is_some()
    }
}

impl Navigator for SystemOpener {
    fn open_external(&mut self, url: &str) -> Result<(), LaunchError> {
        debug!(url, "opening externally");
        open::that_detached(url).map_err(|source| LaunchError::Navigation {
            url: url.to_string(),
            source,
        })
    }
}

impl Prober for SystemOpener {
    fn start_probe(&mut self, link: &str) -> std::io::Result<Box<dyn ProbeHandle>> {
        let mut command = handler_command(link).ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no url handler on PATH")
        })?;
        let child = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        debug!(link, pid = child.id(), "deep link probe started");
        Ok(Box::new(ChildProbe(child)))
    }
}

fn handler_command(url: &str) -> Option<Command> {
    open::commands(url)
        .into_iter()
        .find(|command| which(command.get_program()).is_ok())
}

struct ChildProbe(Child);

impl ProbeHandle for ChildProbe {
    fn teardown(self: Box<Self>) {
        let mut child = self.0;
        match child.try_wait() {
            Ok(Some(_)) => {}
            Ok(None) => {
                if let Err(e) = child.kill() {
                    warn!(error = %e, "failed to stop deep link probe");
                }
                let _ = child.wait();
            }
            Err(e) => warn!(error = %e, "failed to poll deep link probe"),
        }
        debug!("deep link probe torn down");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    struct CountingProbe(Rc<Cell<u32>>);

    impl ProbeHandle for CountingProbe {
        fn teardown(self: Box<Self>) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_guard_release_tears_down_once() {
        let count = Rc::new(Cell::new(0));
        let guard = ProbeGuard::new(Box::new(CountingProbe(Rc::clone(&count))));
        guard.release();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_guard_drop_tears_down() {
        let count = Rc::new(Cell::new(0));
        {
            let _guard = ProbeGuard::new(Box::new(CountingProbe(Rc::clone(&count))));
        }
        assert_eq!(count.get(), 1);
    }
}
