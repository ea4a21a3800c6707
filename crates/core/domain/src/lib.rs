pub mod data;
pub mod record;

pub use data::RawEvent;
pub use record::{RecordDraft, RecordError, TimeseriesRecord};
