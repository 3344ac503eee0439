use futures::channel::oneshot;
use futures::future::Shared;
use futures::FutureExt;

/// Host-side handle; fire it once the widget script has finished loading.
pub struct ReadySignal(oneshot::Sender<()>);

impl ReadySignal {
    pub fn notify(self) {
        let _ = self.0.send(());
    }
}

/// Readiness of the external map widget as an explicit one-shot future in
/// place of a polling loop. Awaiting is cheap after the first resolution.
/// If the host never signals, `ready` stays pending for the component's
/// whole lifetime, which is the intended behavior for a widget that never
/// loads.
#[derive(Clone)]
pub struct WidgetGate {
    inner: Shared<oneshot::Receiver<()>>,
}

impl WidgetGate {
    pub fn new() -> (WidgetGate, ReadySignal) {
        let (tx, rx) = oneshot::channel();
        let gate = WidgetGate { inner: rx.shared() };

        (gate, ReadySignal(tx))
    }

    /// A gate that is already open, for hosts that load synchronously.
    pub fn open() -> WidgetGate {
        let (gate, signal) = WidgetGate::new();
        signal.notify();
        gate
    }

    pub async fn ready(&self) {
        match self.inner.clone().await {
            Ok(()) => {}
            // the host dropped the signal without loading; never proceed
            Err(_) => futures::future::pending::<()>().await,
        }
    }
}
