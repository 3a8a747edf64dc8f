mod atomic;

pub use atomic::{atomic_write, ensure_parent_dir};
