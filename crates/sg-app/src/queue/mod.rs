mod ingestion_queue;

pub use ingestion_queue::{ClipboardItemProcessor, IngestionQueue};
