use tokio::sync::broadcast;

/// Fan-out of a single "stop now" notification: an interrupt from the user
/// or the end of the run.
pub type ShutdownSender = broadcast::Sender<()>;
pub type ShutdownReceiver = broadcast::Receiver<()>;
