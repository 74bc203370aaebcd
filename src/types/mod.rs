//! Shared data types for the pipeline and serving sides.

mod candidate;
mod model_family;
#[cfg(test)]
mod model_family_test;
mod pipeline_run;
#[cfg(test)]
mod pipeline_run_test;
mod prediction;
#[cfg(test)]
mod prediction_test;
mod promotion;

pub use candidate::{HyperGrid, HyperParams, MetricBundle, TrainingCandidate};
pub use model_family::ModelFamily;
pub use pipeline_run::{PipelineRun, RunId, RunState, TaskId, TaskRecord, TaskState};
pub use prediction::{
  Contract, Gender, InternetOption, InternetService, MultipleLines, PaymentMethod,
  PredictionRequest, PredictionResponse, YesNo, FEATURE_COUNT,
};
pub use promotion::{ModelRef, PromotionRecord};
