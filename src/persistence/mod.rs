mod blobs;
mod files;

pub use blobs::{Storage, KEY_COMPLETED, KEY_STATS, KEY_THEME, KEY_TODO};
pub use files::{atomic_write, init_local_dir};
