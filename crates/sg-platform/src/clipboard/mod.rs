mod local;
mod signal;
mod uri;

pub use local::LocalClipboard;
pub use signal::{ChangeSignalSource, ClipboardRsSignalSource};
