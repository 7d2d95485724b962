// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use churnboard_app::{Customer, PredictionRequest, PredictionResponse};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Blocking client for the churn-prediction service. Calls are independent
/// and never retried; the caller decides what a failure means for its own
/// state.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("service.base_url must not be empty");
        }
        let parsed = Url::parse(&base_url)
            .with_context(|| format!("service.base_url {base_url:?} is not a valid URL"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "service.base_url {base_url:?} must use http or https, got {:?}",
                parsed.scheme()
            );
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `GET /customers`. Returns the array as served; the directory cache
    /// applies its own truncation.
    pub fn fetch_customers(&self) -> Result<Vec<Customer>> {
        let response = self
            .http
            .get(format!("{}/customers", self.base_url))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        response.json().context("decode customer list")
    }

    /// `POST /predict` with the request as the JSON body.
    pub fn submit_prediction(&self, request: &PredictionRequest) -> Result<PredictionResponse> {
        let response = self
            .http
            .post(format!("{}/predict", self.base_url))
            .json(request)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        response.json().context("decode prediction response")
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach the prediction service at {} -- check that it is running ({} )",
        base_url,
        error
    )
}

/// The service reports failures as `{"error": "..."}` with a 4xx status;
/// fall back to the raw body or the bare status for anything else.
fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ServiceErrorEnvelope>(body)
        && let Some(error) = parsed.error
        && !error.is_empty()
    {
        return anyhow!("service error ({}): {}", status.as_u16(), error);
    }

    if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        return anyhow!("service error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("service returned {}", status.as_u16())
}

#[derive(Debug, Deserialize)]
struct ServiceErrorEnvelope {
    error: Option<String>,
}
