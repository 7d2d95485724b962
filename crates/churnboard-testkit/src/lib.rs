// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Shared fixtures for churnboard tests: canned customers, a canned
//! prediction response, and a scripted mock of the prediction service.

use anyhow::{Context, Result, anyhow};
use churnboard_app::{ChurnForm, Customer, PredictionResponse};
use std::io::Read;
use std::thread::{self, JoinHandle};
use tiny_http::{Header, Response, Server};

const SURNAMES: [&str; 12] = [
    "Smith", "Okafor", "Hargrave", "Lindqvist", "Moreau", "Castillo", "Nakamura", "Petrov",
    "Adeyemi", "Keller", "Rossi", "Whitfield",
];

pub fn sample_customers(count: usize) -> Vec<Customer> {
    (0..count)
        .map(|index| Customer {
            customer_id: 15_600_000 + index as i64,
            surname: SURNAMES[index % SURNAMES.len()].to_owned(),
        })
        .collect()
}

pub fn customers_json(customers: &[Customer]) -> String {
    serde_json::to_string(customers).expect("encode customer fixtures")
}

/// Raw JSON exactly as the service would send it, model keys in the
/// service's order.
pub fn sample_response_json() -> &'static str {
    r#"{
  "prediction": 1,
  "probability": 78.5,
  "model_probabilities": {
    "RandomForest": 0.81,
    "GradientBoosting": 0.76,
    "XGBoost": 0.84,
    "StackingClassifier": 0.785
  },
  "explanation": "Smith is at risk of leaving due to several factors we have noticed.",
  "email": "Dear Smith,\n\nWe value you.\n- <b>Premium Savings Account</b>: a better rate for 6 months.\n\nSincerely,\nThe Bank"
}"#
}

pub fn sample_response() -> PredictionResponse {
    serde_json::from_str(sample_response_json()).expect("decode response fixture")
}

/// A form with every operator-entered field valid and no selected customer.
pub fn filled_form() -> ChurnForm {
    ChurnForm {
        credit_score: "650".to_owned(),
        geography: "France".to_owned(),
        gender: "Female".to_owned(),
        age: "40".to_owned(),
        tenure: "3".to_owned(),
        balance: "50000.5".to_owned(),
        num_of_products: "2".to_owned(),
        has_cr_card: "1".to_owned(),
        is_active_member: "0".to_owned(),
        estimated_salary: "60000".to_owned(),
        ..ChurnForm::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedResponse {
    pub status: u16,
    pub body: String,
}

impl ScriptedResponse {
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedRequest {
    pub method: String,
    pub url: String,
    pub body: String,
}

/// One-shot scripted service: answers exactly the given responses in order,
/// records what it saw, then stops. `finish` joins the server thread and
/// returns the recorded requests for asserting on method, path, and body.
pub struct MockService {
    base_url: String,
    handle: JoinHandle<Vec<ReceivedRequest>>,
}

impl MockService {
    pub fn serve(responses: Vec<ScriptedResponse>) -> Result<Self> {
        let server =
            Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock service: {error}"))?;
        let base_url = format!("http://{}", server.server_addr());

        let handle = thread::spawn(move || {
            let mut received = Vec::with_capacity(responses.len());
            for scripted in responses {
                let mut request = server.recv().expect("mock service expected a request");
                let mut body = String::new();
                request
                    .as_reader()
                    .read_to_string(&mut body)
                    .expect("read request body");
                received.push(ReceivedRequest {
                    method: request.method().to_string(),
                    url: request.url().to_owned(),
                    body,
                });

                let response = Response::from_string(scripted.body)
                    .with_status_code(scripted.status)
                    .with_header(
                        Header::from_bytes("Content-Type", "application/json")
                            .expect("valid content type header"),
                    );
                request.respond(response).expect("mock response should send");
            }
            received
        });

        Ok(Self { base_url, handle })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn finish(self) -> Result<Vec<ReceivedRequest>> {
        self.handle
            .join()
            .map_err(|_| anyhow!("mock service thread panicked"))
            .context("join mock service")
    }
}

#[cfg(test)]
mod tests {
    use super::{filled_form, sample_customers, sample_response};

    #[test]
    fn fixture_customers_cycle_surnames() {
        let customers = sample_customers(14);
        assert_eq!(customers.len(), 14);
        assert_eq!(customers[0].surname, "Smith");
        assert_eq!(customers[12].surname, "Smith");
        assert_ne!(customers[0].customer_id, customers[12].customer_id);
    }

    #[test]
    fn fixture_response_keeps_service_model_order() {
        let response = sample_response();
        let models: Vec<&str> = response
            .model_probabilities
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            models,
            vec![
                "RandomForest",
                "GradientBoosting",
                "XGBoost",
                "StackingClassifier"
            ]
        );
        assert_eq!(response.prediction, Some(1));
    }

    #[test]
    fn fixture_form_builds() {
        assert!(filled_form().build().is_ok());
    }
}
