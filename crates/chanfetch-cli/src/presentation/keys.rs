//! Single-keystroke job controls.

use std::io::IsTerminal;
use std::thread;

use console::{Key, Term};
use tokio::sync::mpsc;
use tracing::debug;

/// A control key pressed during a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKey {
    Pause,
    Resume,
    Cancel,
}

impl JobKey {
    /// Map a keystroke to a control, ignoring everything else.
    pub const fn from_key(key: &Key) -> Option<Self> {
        match key {
            Key::Char('p' | 'P') => Some(Self::Pause),
            Key::Char('r' | 'R') => Some(Self::Resume),
            Key::Char('c' | 'C') | Key::Escape | Key::CtrlC => Some(Self::Cancel),
            _ => None,
        }
    }
}

/// Read keys from the terminal on a detached thread.
///
/// Returns `None` unless both stdin and stdout are a terminal. The thread
/// is not joined: it stays blocked in `read_key` until the process exits.
pub fn spawn_key_reader() -> Option<mpsc::UnboundedReceiver<JobKey>> {
    let term = Term::stdout();
    if !std::io::stdin().is_terminal() || !term.is_term() {
        return None;
    }

    let (tx, rx) = mpsc::unbounded_channel();
    let spawned = thread::Builder::new()
        .name("chanfetch-keys".to_string())
        .spawn(move || {
            loop {
                match term.read_key() {
                    Ok(key) => {
                        if let Some(control) = JobKey::from_key(&key) {
                            if tx.send(control).is_err() {
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        debug!(error = %e, "Key reader stopped");
                        break;
                    }
                }
            }
        });

    match spawned {
        Ok(_) => Some(rx),
        Err(e) => {
            debug!(error = %e, "Could not start key reader");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(JobKey::from_key(&Key::Char('p')), Some(JobKey::Pause));
        assert_eq!(JobKey::from_key(&Key::Char('R')), Some(JobKey::Resume));
        assert_eq!(JobKey::from_key(&Key::Char('c')), Some(JobKey::Cancel));
        assert_eq!(JobKey::from_key(&Key::Escape), Some(JobKey::Cancel));
        assert_eq!(JobKey::from_key(&Key::CtrlC), Some(JobKey::Cancel));
        assert_eq!(JobKey::from_key(&Key::Char('x')), None);
        assert_eq!(JobKey::from_key(&Key::Enter), None);
    }
}
