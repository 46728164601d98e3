// src/predict/mod.rs

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::error::{Error, PredictionError};
use crate::payload::Payload;

/// Service verdict. The service's Portuguese keys are accepted as well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(alias = "probabilidade_sucesso")]
    pub probability: f64,
    #[serde(alias = "sucesso")]
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
}

/// Anything that can turn a payload into a prediction.
pub trait Predictor {
    fn predict(&self, payload: &Payload) -> Result<Prediction, PredictionError>;
}

impl<T: Predictor + ?Sized> Predictor for &T {
    fn predict(&self, payload: &Payload) -> Result<Prediction, PredictionError> {
        (**self).predict(payload)
    }
}

/// `base` joined with `name`, treating `base` as a directory.
fn endpoint(base: &Url, name: &str) -> Result<Url, Error> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(name)
        .map_err(|e| Error::Config(format!("bad endpoint {base}{name}: {e}")))
}

/// Blocking HTTP client for the prediction service. One attempt per call,
/// bounded by the configured timeout.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    http: Client,
    predict_url: Url,
    health_url: Url,
}

impl PredictionClient {
    pub fn new(base: &Url, timeout: Duration) -> Result<Self, Error> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("building HTTP client: {e}")))?;
        Ok(Self {
            http,
            predict_url: endpoint(base, "predict")?,
            health_url: endpoint(base, "health")?,
        })
    }

    pub fn health(&self) -> Result<HealthStatus, PredictionError> {
        let status = self
            .http
            .get(self.health_url.clone())
            .send()?
            .error_for_status()?
            .json::<HealthStatus>()?;
        Ok(status)
    }
}

impl Predictor for PredictionClient {
    fn predict(&self, payload: &Payload) -> Result<Prediction, PredictionError> {
        let body = payload
            .to_json()
            .map_err(|e| PredictionError::Transport(format!("encoding payload: {e}")))?;
        debug!(url = %self.predict_url, payload = %body, "sending prediction request");
        let prediction = self
            .http
            .post(self.predict_url.clone())
            .json(&body)
            .send()?
            .error_for_status()?
            .json::<Prediction>()?;

        if !(0.0..=1.0).contains(&prediction.probability) {
            return Err(PredictionError::Malformed(format!(
                "probability {} outside [0, 1]",
                prediction.probability
            )));
        }
        info!(
            probability = prediction.probability,
            success = prediction.success,
            "prediction received"
        );
        Ok(prediction)
    }
}
