pub mod error;
pub mod legacy_csv;
pub mod preprocess;

pub use error::{IngestError, IngestResult};
pub use legacy_csv::{LegacyCsvReader, LegacyCsvReaderConfig, REQUIRED_COLUMNS};
pub use preprocess::{clean_frame, clean_observations, RawObservation, MISSING_VALUE_TOKENS};
