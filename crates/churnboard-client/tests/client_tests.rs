// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use churnboard_client::Client;
use churnboard_testkit::{
    MockService, ScriptedResponse, customers_json, filled_form, sample_customers,
    sample_response_json,
};
use std::time::Duration;

#[test]
fn fetch_error_names_the_service_address() {
    let client = Client::new("http://127.0.0.1:1", Duration::from_millis(50))
        .expect("client should initialize");

    let error = client
        .fetch_customers()
        .expect_err("fetch should fail for unreachable endpoint");
    let message = error.to_string();
    assert!(message.contains("prediction service"));
    assert!(message.contains("http://127.0.0.1:1"));
}

#[test]
fn fetch_customers_decodes_the_directory_payload() -> Result<()> {
    let customers = sample_customers(3);
    let service = MockService::serve(vec![ScriptedResponse::json(
        200,
        customers_json(&customers),
    )])?;

    let client = Client::new(service.base_url(), Duration::from_secs(1))?;
    let fetched = client.fetch_customers()?;
    assert_eq!(fetched, customers);

    let requests = service.finish()?;
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].url, "/customers");
    Ok(())
}

#[test]
fn submit_prediction_posts_the_exact_request_shape() -> Result<()> {
    let service = MockService::serve(vec![ScriptedResponse::json(200, sample_response_json())])?;

    let client = Client::new(service.base_url(), Duration::from_secs(1))?;
    let request = filled_form().build()?;
    let response = client.submit_prediction(&request)?;

    assert_eq!(response.probability, 78.5);
    assert_eq!(response.model_probabilities.len(), 4);
    assert!(response.email.contains("<b>"));

    let requests = service.finish()?;
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].url, "/predict");

    let posted: serde_json::Value = serde_json::from_str(&requests[0].body)?;
    let object = posted.as_object().expect("request body is an object");
    assert_eq!(object.len(), 12);
    assert!(object["CustomerId"].is_null());
    assert_eq!(object["Surname"], "");
    assert_eq!(object["CreditScore"], 650);
    assert_eq!(object["Geography"], "France");
    assert_eq!(object["HasCrCard"], 1);
    assert_eq!(object["IsActiveMember"], 0);
    Ok(())
}

#[test]
fn submit_prediction_surfaces_the_error_envelope() -> Result<()> {
    let service = MockService::serve(vec![ScriptedResponse::json(
        400,
        r#"{"error": "'Geography' not found in axis"}"#,
    )])?;

    let client = Client::new(service.base_url(), Duration::from_secs(1))?;
    let request = filled_form().build()?;
    let error = client
        .submit_prediction(&request)
        .expect_err("400 should surface as an error");
    let message = error.to_string();
    assert!(message.contains("400"));
    assert!(message.contains("'Geography' not found in axis"));

    service.finish()?;
    Ok(())
}

#[test]
fn malformed_response_body_is_a_decode_error() -> Result<()> {
    let service = MockService::serve(vec![ScriptedResponse::json(200, "not json at all")])?;

    let client = Client::new(service.base_url(), Duration::from_secs(1))?;
    let request = filled_form().build()?;
    let error = client
        .submit_prediction(&request)
        .expect_err("bad body should fail decode");
    assert!(error.to_string().contains("decode prediction response"));

    service.finish()?;
    Ok(())
}
