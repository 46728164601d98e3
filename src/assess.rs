//! End-to-end flow: normalize, check completeness, predict, report.

use tracing::{info, instrument, warn};

use crate::error::PredictionError;
use crate::matching::FuzzyMatcher;
use crate::missing::MissingReport;
use crate::normalize::Normalizer;
use crate::payload::{assemble_payload, Clock};
use crate::predict::{Prediction, Predictor};
use crate::record::{ProjectRecord, RawFields};
use crate::report::format_report;
use crate::vocab::Vocabulary;

/// Shown to the user whenever the prediction service fails, whatever the cause.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Sorry, the prediction could not be completed right now. Please try again later.";

#[derive(Debug, Clone, PartialEq)]
pub enum Assessment {
    /// Something required is missing or invalid; nothing was sent.
    Incomplete(MissingReport),
    Complete {
        prediction: Prediction,
        record: ProjectRecord,
        report: String,
    },
}

pub struct Assessor<'v, P, C> {
    vocabulary: &'v Vocabulary,
    normalizer: Normalizer<'v>,
    predictor: P,
    clock: C,
}

impl<'v, P: Predictor, C: Clock> Assessor<'v, P, C> {
    pub fn new(vocabulary: &'v Vocabulary, matcher: FuzzyMatcher, predictor: P, clock: C) -> Self {
        Self {
            vocabulary,
            normalizer: Normalizer::new(vocabulary, matcher),
            predictor,
            clock,
        }
    }

    #[instrument(level = "info", skip_all, fields(supplied = raw.len()))]
    pub fn assess(&self, raw: &RawFields) -> Result<Assessment, PredictionError> {
        let (record, invalid) = self.normalizer.normalize(raw);

        let missing = MissingReport::build(&record, &invalid, self.vocabulary);
        if !missing.is_complete() {
            info!(fields = ?missing.fields(), "input incomplete");
            return Ok(Assessment::Incomplete(missing));
        }

        let payload = assemble_payload(&record, &self.clock);
        let prediction = self.predictor.predict(&payload).map_err(|e| {
            warn!(error = %e, "prediction failed");
            e
        })?;
        let report = format_report(&prediction, &record);

        Ok(Assessment::Complete {
            prediction,
            record,
            report,
        })
    }
}
