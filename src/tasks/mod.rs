//! The pipeline's task implementations, one module per task of the fixed
//! graph: ingest → preprocess → {train per family} → select_and_promote.

mod ingest;
mod preprocess;
#[cfg(test)]
mod preprocess_test;
mod select_and_promote;
#[cfg(test)]
mod select_and_promote_test;
mod train_stage;

pub use ingest::{ingest, DatasetSource, LocalSeedSource};
pub use preprocess::{preprocess, PreprocessOutput, PROCESSED_HEADERS};
pub use select_and_promote::select_and_promote;
pub use train_stage::run_training_stage;
