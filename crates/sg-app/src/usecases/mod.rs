mod capture_clipboard;
mod clipboard_watcher;
mod handle_clipboard_changed;
mod insert_captured_item;
mod restore_slot_to_clipboard;
pub mod settings;
mod slot_command;

pub use capture_clipboard::CaptureClipboard;
pub use clipboard_watcher::{ClipboardWatcherError, StartClipboardWatcher, StopClipboardWatcher};
pub use handle_clipboard_changed::HandleClipboardChanged;
pub use insert_captured_item::InsertCapturedItem;
pub use restore_slot_to_clipboard::RestoreSlotToClipboard;
pub use settings::ApplySettingsChange;
pub use slot_command::{ExecuteSlotCommand, SlotCommand};
