use std::sync::Arc;

use tokio::sync::watch;

/// One-shot readiness signal for the third-party ad script. The script is
/// loaded out of band and announces readiness exactly once; dependents either
/// check `is_ready` or await `ready`. Signalling again is a no-op.
#[derive(Clone, Debug)]
pub struct ScriptGate {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl ScriptGate {
    pub fn new() -> ScriptGate {
        let (tx, rx) = watch::channel(false);
        ScriptGate { tx: Arc::new(tx), rx }
    }

    pub fn signal_ready(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }

    pub async fn ready(&self) {
        let mut rx = self.rx.clone();
        while !*rx.borrow() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for ScriptGate {
    fn default() -> ScriptGate {
        ScriptGate::new()
    }
}
