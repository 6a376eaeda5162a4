use tokio::sync::broadcast;

pub type ShutdownSender = broadcast::Sender<()>;
