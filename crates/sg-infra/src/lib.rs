pub mod cache;
pub mod fs;
pub mod hashing;
pub mod imaging;
pub mod settings;
pub mod slots;
pub mod time;

pub use cache::FsPayloadCache;
pub use hashing::Sha256Hasher;
pub use imaging::CanonicalImageCodec;
pub use settings::{FileSettingsRepository, SettingsMigrator};
pub use slots::FileSlotRepository;
pub use time::SystemClock;
