mod fs_payload_cache;

pub use fs_payload_cache::FsPayloadCache;
