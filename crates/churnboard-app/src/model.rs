// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Geography {
    France,
    Germany,
    Spain,
}

impl Geography {
    pub const ALL: [Self; 3] = [Self::France, Self::Germany, Self::Spain];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::France => "France",
            Self::Germany => "Germany",
            Self::Spain => "Spain",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "France" => Some(Self::France),
            "Germany" => Some(Self::Germany),
            "Spain" => Some(Self::Spain),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Self; 2] = [Self::Male, Self::Female];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Male" => Some(Self::Male),
            "Female" => Some(Self::Female),
            _ => None,
        }
    }
}

/// Directory entry as served by `GET /customers`. The service sends more
/// columns; only the identity pair matters here and the rest are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Customer {
    pub customer_id: i64,
    pub surname: String,
}

/// Wire payload for `POST /predict`. Field names and casing are the service
/// contract; do not rename.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PredictionRequest {
    pub customer_id: Option<i64>,
    pub surname: String,
    pub credit_score: i64,
    pub geography: Geography,
    pub gender: Gender,
    pub age: i64,
    pub tenure: i64,
    pub balance: f64,
    pub num_of_products: i64,
    pub has_cr_card: i64,
    pub is_active_member: i64,
    pub estimated_salary: f64,
}

/// Per-model probabilities in [0, 1], keyed by model name. The map keeps the
/// service's key order; downstream charting must not reorder it.
pub type ModelProbabilities = serde_json::Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub prediction: Option<i64>,
    pub probability: f64,
    pub model_probabilities: ModelProbabilities,
    pub explanation: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub chart_fill: Rgb,
    pub chart_border: Rgb,
    pub text: Rgb,
    pub axis: Rgb,
    pub grid: Rgb,
    pub needle: Rgb,
    /// Gauge arc colors from the low end to the high end, in thirds.
    pub gauge_bands: [Rgb; 3],
}

const LIGHT_PALETTE: Palette = Palette {
    chart_fill: Rgb(0x10, 0xB9, 0x81),
    chart_border: Rgb(0x05, 0x96, 0x69),
    text: Rgb(0x1F, 0x29, 0x37),
    axis: Rgb(0x6B, 0x72, 0x80),
    grid: Rgb(0xE5, 0xE7, 0xEB),
    needle: Rgb(0x6B, 0x72, 0x80),
    gauge_bands: [
        Rgb(0xEF, 0x44, 0x44),
        Rgb(0xF5, 0x9E, 0x0B),
        Rgb(0x10, 0xB9, 0x81),
    ],
};

const DARK_PALETTE: Palette = Palette {
    chart_fill: Rgb(0x34, 0xD3, 0x99),
    chart_border: Rgb(0x10, 0xB9, 0x81),
    text: Rgb(0xE5, 0xE7, 0xEB),
    axis: Rgb(0xD1, 0xD5, 0xDB),
    grid: Rgb(0x4B, 0x55, 0x63),
    needle: Rgb(0x9C, 0xA3, 0xAF),
    gauge_bands: [
        Rgb(0xF8, 0x71, 0x71),
        Rgb(0xFB, 0xBF, 0x24),
        Rgb(0x34, 0xD3, 0x99),
    ],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresentationMode {
    Light,
    Dark,
}

impl PresentationMode {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub const fn palette(self) -> &'static Palette {
        match self {
            Self::Light => &LIGHT_PALETTE,
            Self::Dark => &DARK_PALETTE,
        }
    }

    /// Interpret the `COLORFGBG` convention (`"<fg>;<bg>"`, sometimes with a
    /// default field in between). Background 7 or 15 means a light terminal.
    pub fn from_colorfgbg(value: Option<&str>) -> Option<Self> {
        let raw = value?;
        let background: u8 = raw.rsplit(';').next()?.trim().parse().ok()?;
        match background {
            7 | 15 => Some(Self::Light),
            0..=6 | 8..=14 => Some(Self::Dark),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartStyle {
    pub fill: Rgb,
    pub border: Rgb,
}

impl ChartStyle {
    pub const fn for_mode(mode: PresentationMode) -> Self {
        let palette = mode.palette();
        Self {
            fill: palette.chart_fill,
            border: palette.chart_border,
        }
    }
}

/// Per-model percentages derived from a response. `labels[i]` pairs with
/// `values[i]`; order is the response's key order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDataset {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub style: ChartStyle,
}

#[cfg(test)]
mod tests {
    use super::{Customer, Gender, Geography, PredictionRequest, PresentationMode};

    #[test]
    fn enum_round_trips() {
        for geography in Geography::ALL {
            assert_eq!(Geography::parse(geography.as_str()), Some(geography));
        }
        for gender in Gender::ALL {
            assert_eq!(Gender::parse(gender.as_str()), Some(gender));
        }
        assert_eq!(Geography::parse("Atlantis"), None);
    }

    #[test]
    fn customer_deserializes_with_extra_columns() {
        let customer: Customer = serde_json::from_str(
            r#"{"CustomerId": 42, "Surname": "Smith", "CreditScore": 650, "Exited": 0}"#,
        )
        .expect("decode customer");
        assert_eq!(customer.customer_id, 42);
        assert_eq!(customer.surname, "Smith");
    }

    #[test]
    fn request_serializes_exact_field_names() {
        let request = PredictionRequest {
            customer_id: None,
            surname: String::new(),
            credit_score: 650,
            geography: Geography::France,
            gender: Gender::Female,
            age: 40,
            tenure: 3,
            balance: 50_000.5,
            num_of_products: 2,
            has_cr_card: 1,
            is_active_member: 0,
            estimated_salary: 60_000.0,
        };
        let encoded = serde_json::to_value(&request).expect("encode request");
        let object = encoded.as_object().expect("request is an object");

        let expected = [
            "CustomerId",
            "Surname",
            "CreditScore",
            "Geography",
            "Gender",
            "Age",
            "Tenure",
            "Balance",
            "NumOfProducts",
            "HasCrCard",
            "IsActiveMember",
            "EstimatedSalary",
        ];
        let names: Vec<&str> = object.keys().map(String::as_str).collect();
        assert_eq!(names, expected);
        assert!(object["CustomerId"].is_null());
        assert_eq!(object["Geography"], "France");
        assert_eq!(object["HasCrCard"], 1);
    }

    #[test]
    fn mode_toggle_is_idempotent_in_pairs() {
        let mode = PresentationMode::Light;
        assert_eq!(mode.toggled().toggled(), mode);
        assert_ne!(
            PresentationMode::Light.palette().chart_fill,
            PresentationMode::Dark.palette().chart_fill
        );
    }

    #[test]
    fn colorfgbg_detection() {
        assert_eq!(
            PresentationMode::from_colorfgbg(Some("0;15")),
            Some(PresentationMode::Light)
        );
        assert_eq!(
            PresentationMode::from_colorfgbg(Some("15;default;0")),
            Some(PresentationMode::Dark)
        );
        assert_eq!(PresentationMode::from_colorfgbg(Some("garbage")), None);
        assert_eq!(PresentationMode::from_colorfgbg(None), None);
    }
}
