//! Client for a hosted-inference API exposing summarization and
//! zero-shot classification models.
//!
//! Failures pass through to the caller untouched — the digest worker
//! decides what a failed chunk means; nothing is retried here.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::InferenceConfig;

/// Zero-shot classification result. `labels` and `scores` are aligned by
/// index and ordered by descending score; scores are model-dependent and
/// not guaranteed to sum to exactly 1.0.
#[derive(Debug, Clone)]
pub struct Classification {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

pub struct InferenceClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
    summarization_model: String,
    classification_model: String,
}

#[derive(Serialize)]
struct SummarizationRequest<'a> {
    inputs: &'a str,
    parameters: SummarizationParameters,
}

#[derive(Serialize)]
struct SummarizationParameters {
    min_length: usize,
    max_length: usize,
    do_sample: bool,
}

#[derive(Deserialize)]
struct SummarizationOutput {
    summary_text: String,
}

#[derive(Serialize)]
struct ClassificationRequest<'a> {
    inputs: &'a str,
    parameters: ClassificationParameters<'a>,
}

#[derive(Serialize)]
struct ClassificationParameters<'a> {
    candidate_labels: &'a [String],
}

#[derive(Deserialize)]
struct ClassificationOutput {
    labels: Vec<String>,
    scores: Vec<f64>,
}

impl InferenceClient {
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build inference HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone().filter(|t| !t.is_empty()),
            summarization_model: config.summarization_model.clone(),
            classification_model: config.classification_model.clone(),
        })
    }

    /// Abstractively condense `text`, bounded by min/max output-length
    /// token targets.
    pub async fn summarize(&self, text: &str, min_length: usize, max_length: usize) -> Result<String> {
        let request = SummarizationRequest {
            inputs: text,
            parameters: SummarizationParameters {
                min_length,
                max_length,
                do_sample: false,
            },
        };

        let outputs: Vec<SummarizationOutput> = self
            .post_model(&self.summarization_model, &request)
            .await?
            .json()
            .await
            .context("Failed to decode summarization response")?;

        outputs
            .into_iter()
            .next()
            .map(|o| o.summary_text)
            .ok_or_else(|| anyhow::anyhow!("Summarization response was empty"))
    }

    /// Score `text` against `candidate_labels` without label-specific
    /// training.
    pub async fn classify(&self, text: &str, candidate_labels: &[String]) -> Result<Classification> {
        let request = ClassificationRequest {
            inputs: text,
            parameters: ClassificationParameters { candidate_labels },
        };

        let output: ClassificationOutput = self
            .post_model(&self.classification_model, &request)
            .await?
            .json()
            .await
            .context("Failed to decode classification response")?;

        if output.labels.len() != output.scores.len() {
            anyhow::bail!(
                "Classification response misaligned: {} labels, {} scores",
                output.labels.len(),
                output.scores.len()
            );
        }

        Ok(Classification {
            labels: output.labels,
            scores: output.scores,
        })
    }

    async fn post_model<B: Serialize>(&self, model: &str, body: &B) -> Result<reqwest::Response> {
        let url = format!("{}/models/{model}", self.base_url);

        let mut request = self.http.post(&url).json(body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Inference request to {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Inference API returned {status}: {body}");
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarization_request_wire_format() {
        let request = SummarizationRequest {
            inputs: "some long text",
            parameters: SummarizationParameters {
                min_length: 50,
                max_length: 250,
                do_sample: false,
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["inputs"], "some long text");
        assert_eq!(value["parameters"]["min_length"], 50);
        assert_eq!(value["parameters"]["max_length"], 250);
        assert_eq!(value["parameters"]["do_sample"], false);
    }

    #[test]
    fn test_classification_request_wire_format() {
        let labels = vec!["Physics".to_string(), "Biology".to_string()];
        let request = ClassificationRequest {
            inputs: "quarks and leptons",
            parameters: ClassificationParameters {
                candidate_labels: &labels,
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["parameters"]["candidate_labels"][0], "Physics");
        assert_eq!(value["parameters"]["candidate_labels"][1], "Biology");
    }

    #[test]
    fn test_summarization_response_parses() {
        let body = r#"[{"summary_text": "A short digest."}]"#;
        let outputs: Vec<SummarizationOutput> = serde_json::from_str(body).unwrap();
        assert_eq!(outputs[0].summary_text, "A short digest.");
    }

    #[test]
    fn test_classification_response_parses_aligned() {
        let body = r#"{
            "sequence": "quarks and leptons",
            "labels": ["Physics", "Biology"],
            "scores": [0.91, 0.09]
        }"#;
        let output: ClassificationOutput = serde_json::from_str(body).unwrap();
        assert_eq!(output.labels.len(), output.scores.len());
        assert_eq!(output.labels[0], "Physics");
        assert!(output.scores[0] > output.scores[1]);
    }
}
