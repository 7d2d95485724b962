// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{ChartDataset, ChartStyle, PredictionResponse, PresentationMode, Rgb};

/// Derive the per-model chart data from a response. Probabilities arrive in
/// [0, 1] and leave as percentages; key order is preserved as received.
/// `mode` affects only the colors.
pub fn chart_dataset(response: &PredictionResponse, mode: PresentationMode) -> ChartDataset {
    let mut labels = Vec::with_capacity(response.model_probabilities.len());
    let mut values = Vec::with_capacity(response.model_probabilities.len());
    for (name, value) in &response.model_probabilities {
        labels.push(name.clone());
        values.push(value.as_f64().unwrap_or(0.0) * 100.0);
    }
    ChartDataset {
        labels,
        values,
        style: ChartStyle::for_mode(mode),
    }
}

/// The gauge reads `probability` as-is; the service already reports it on
/// the percentage scale the gauge displays.
pub fn gauge_value(response: &PredictionResponse) -> f64 {
    response.probability
}

/// Display contract for every percentage the widgets show: two decimals
/// then a percent sign.
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Arc color for a gauge value, picked from the mode's three bands in
/// thirds of the 0..=100 range.
pub fn gauge_color(value: f64, mode: PresentationMode) -> Rgb {
    let bands = mode.palette().gauge_bands;
    let clamped = value.clamp(0.0, 100.0);
    if clamped < 100.0 / 3.0 {
        bands[0]
    } else if clamped < 200.0 / 3.0 {
        bands[1]
    } else {
        bands[2]
    }
}
