pub mod assess;
pub mod config;
pub mod error;
pub mod matching;
pub mod missing;
pub mod normalize;
pub mod payload;
pub mod predict;
pub mod record;
pub mod report;
pub mod users;
pub mod vocab;

pub use assess::{Assessment, Assessor, GENERIC_FAILURE_MESSAGE};
pub use config::Settings;
pub use error::{Error, PredictionError};
pub use missing::{missing_fields, MissingReport};
pub use normalize::{normalize, Normalizer};
pub use payload::{assemble_payload, Clock, FixedClock, Payload, SystemClock};
pub use predict::{Prediction, PredictionClient, Predictor};
pub use record::{
    CategoricalField, Field, FieldState, InvalidFieldSet, ProjectRecord, RawFields, RawValue,
    ResourceLevel,
};
pub use report::format_report;
pub use vocab::{Vocabulary, VocabularyStore};
