// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use churnboard_app::{Customer, PredictionRequest, PredictionResponse};
use churnboard_client::Client;
use churnboard_tui::{AppRuntime, DirectoryEvent, InternalEvent, PredictionEvent};
use std::sync::mpsc::Sender;
use std::thread;

/// The view's window on the prediction service. Spawn variants run each
/// call on its own worker thread and post the outcome back over the
/// internal channel, so the event loop never waits on the network.
pub struct HttpRuntime {
    client: Client,
}

impl HttpRuntime {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl AppRuntime for HttpRuntime {
    fn fetch_customers(&mut self) -> Result<Vec<Customer>> {
        self.client.fetch_customers()
    }

    fn submit_prediction(&mut self, request: &PredictionRequest) -> Result<PredictionResponse> {
        self.client.submit_prediction(request)
    }

    fn spawn_directory_load(&mut self, tx: Sender<InternalEvent>) -> Result<()> {
        let client = self.client.clone();
        thread::spawn(move || {
            let event = match client.fetch_customers() {
                Ok(customers) => InternalEvent::Directory(DirectoryEvent::Loaded(customers)),
                Err(error) => {
                    InternalEvent::Directory(DirectoryEvent::Failed(format!("{error:#}")))
                }
            };
            let _ = tx.send(event);
        });
        Ok(())
    }

    fn spawn_prediction(
        &mut self,
        request_id: u64,
        request: &PredictionRequest,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let client = self.client.clone();
        let request = request.clone();
        thread::spawn(move || {
            let event = match client.submit_prediction(&request) {
                Ok(response) => InternalEvent::Prediction(PredictionEvent::Ready {
                    request_id,
                    response: Box::new(response),
                }),
                Err(error) => InternalEvent::Prediction(PredictionEvent::Failed {
                    request_id,
                    error: format!("{error:#}"),
                }),
            };
            let _ = tx.send(event);
        });
        Ok(())
    }
}
