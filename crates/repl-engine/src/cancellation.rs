//! SIGINT handling: flips a shared flag the phase loop polls between
//! steps (`spec.md` §5 "the Executor honors process-level interrupt").

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use repl_domain::ReplicationError;

pub fn install() -> Result<Arc<AtomicBool>, ReplicationError> {
    let cancelled = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&cancelled))
        .map_err(|e| ReplicationError::connect_failed(format!("failed to install SIGINT handler: {e}")))?;
    Ok(cancelled)
}

pub fn requested(flag: &AtomicBool) -> bool {
    flag.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requested_reflects_the_flags_current_value() {
        let flag = AtomicBool::new(false);
        assert!(!requested(&flag));
        flag.store(true, Ordering::SeqCst);
        assert!(requested(&flag));
    }
}
