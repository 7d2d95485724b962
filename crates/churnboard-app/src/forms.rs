// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Customer, Gender, Geography, PredictionRequest};

/// One slot per request field, in the order the form renders them. The
/// identity pair is filled by picking a directory entry and is never
/// required; everything else is typed by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    CustomerId,
    Surname,
    CreditScore,
    Geography,
    Gender,
    Age,
    Tenure,
    Balance,
    NumOfProducts,
    HasCrCard,
    IsActiveMember,
    EstimatedSalary,
}

impl FormField {
    pub const ALL: [Self; 12] = [
        Self::CustomerId,
        Self::Surname,
        Self::CreditScore,
        Self::Geography,
        Self::Gender,
        Self::Age,
        Self::Tenure,
        Self::Balance,
        Self::NumOfProducts,
        Self::HasCrCard,
        Self::IsActiveMember,
        Self::EstimatedSalary,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::CustomerId => "customer id",
            Self::Surname => "surname",
            Self::CreditScore => "credit score",
            Self::Geography => "geography",
            Self::Gender => "gender",
            Self::Age => "age",
            Self::Tenure => "tenure (years)",
            Self::Balance => "balance",
            Self::NumOfProducts => "products",
            Self::HasCrCard => "has credit card",
            Self::IsActiveMember => "active member",
            Self::EstimatedSalary => "estimated salary",
        }
    }

    /// Allowed values for choice fields, empty for free-text entry.
    pub const fn choices(self) -> &'static [&'static str] {
        match self {
            Self::Geography => &["France", "Germany", "Spain"],
            Self::Gender => &["Male", "Female"],
            Self::HasCrCard | Self::IsActiveMember => &["1", "0"],
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{field} is required -- enter a value and retry")]
    Required { field: &'static str },
    #[error("{field} must be a whole number, got {value:?}")]
    NotAnInteger { field: &'static str, value: String },
    #[error("{field} must be a number, got {value:?}")]
    NotADecimal { field: &'static str, value: String },
    #[error("{field} must be one of its listed choices, got {value:?}")]
    UnknownChoice { field: &'static str, value: String },
    #[error("{field} must be at least {minimum}, got {value}")]
    BelowMinimum {
        field: &'static str,
        minimum: i64,
        value: i64,
    },
}

impl FieldError {
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Required { field }
            | Self::NotAnInteger { field, .. }
            | Self::NotADecimal { field, .. }
            | Self::UnknownChoice { field, .. }
            | Self::BelowMinimum { field, .. } => *field,
        }
    }
}

/// Raw operator input, one string per field. Values stay untyped until
/// submission; `build` is the single coercion point.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChurnForm {
    pub customer_id: String,
    pub surname: String,
    pub credit_score: String,
    pub geography: String,
    pub gender: String,
    pub age: String,
    pub tenure: String,
    pub balance: String,
    pub num_of_products: String,
    pub has_cr_card: String,
    pub is_active_member: String,
    pub estimated_salary: String,
}

impl ChurnForm {
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::CustomerId => &self.customer_id,
            FormField::Surname => &self.surname,
            FormField::CreditScore => &self.credit_score,
            FormField::Geography => &self.geography,
            FormField::Gender => &self.gender,
            FormField::Age => &self.age,
            FormField::Tenure => &self.tenure,
            FormField::Balance => &self.balance,
            FormField::NumOfProducts => &self.num_of_products,
            FormField::HasCrCard => &self.has_cr_card,
            FormField::IsActiveMember => &self.is_active_member,
            FormField::EstimatedSalary => &self.estimated_salary,
        }
    }

    pub fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::CustomerId => &mut self.customer_id,
            FormField::Surname => &mut self.surname,
            FormField::CreditScore => &mut self.credit_score,
            FormField::Geography => &mut self.geography,
            FormField::Gender => &mut self.gender,
            FormField::Age => &mut self.age,
            FormField::Tenure => &mut self.tenure,
            FormField::Balance => &mut self.balance,
            FormField::NumOfProducts => &mut self.num_of_products,
            FormField::HasCrCard => &mut self.has_cr_card,
            FormField::IsActiveMember => &mut self.is_active_member,
            FormField::EstimatedSalary => &mut self.estimated_salary,
        }
    }

    /// Autofill the identity pair from a directory entry. Programmatic, so
    /// it never marks the fields as operator-touched; required-field checks
    /// do not apply to identity anyway.
    pub fn apply_customer(&mut self, customer: &Customer) {
        self.customer_id = customer.customer_id.to_string();
        self.surname = customer.surname.clone();
    }

    /// Coerce the raw strings into a wire request. Any failure names the
    /// offending field and blocks submission; nothing is forwarded to the
    /// service half-typed. Identity is the exception: an empty customer id
    /// becomes `null` and an empty surname stays empty, leaving the service
    /// to decide whether it tolerates anonymous submissions.
    pub fn build(&self) -> Result<PredictionRequest, FieldError> {
        Ok(PredictionRequest {
            customer_id: parse_optional_integer("CustomerId", &self.customer_id)?,
            surname: self.surname.trim().to_owned(),
            credit_score: parse_integer("CreditScore", &self.credit_score)?,
            geography: parse_geography(&self.geography)?,
            gender: parse_gender(&self.gender)?,
            age: parse_integer_min("Age", &self.age, 18)?,
            tenure: parse_integer_min("Tenure", &self.tenure, 0)?,
            balance: parse_decimal("Balance", &self.balance)?,
            num_of_products: parse_integer_min("NumOfProducts", &self.num_of_products, 1)?,
            has_cr_card: parse_binary("HasCrCard", &self.has_cr_card)?,
            is_active_member: parse_binary("IsActiveMember", &self.is_active_member)?,
            estimated_salary: parse_decimal("EstimatedSalary", &self.estimated_salary)?,
        })
    }
}

fn parse_integer(field: &'static str, raw: &str) -> Result<i64, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Required { field });
    }
    trimmed.parse().map_err(|_| FieldError::NotAnInteger {
        field,
        value: trimmed.to_owned(),
    })
}

fn parse_integer_min(field: &'static str, raw: &str, minimum: i64) -> Result<i64, FieldError> {
    let value = parse_integer(field, raw)?;
    if value < minimum {
        return Err(FieldError::BelowMinimum {
            field,
            minimum,
            value,
        });
    }
    Ok(value)
}

fn parse_optional_integer(field: &'static str, raw: &str) -> Result<Option<i64>, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse_integer(field, trimmed).map(Some)
}

fn parse_decimal(field: &'static str, raw: &str) -> Result<f64, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Required { field });
    }
    trimmed.parse().map_err(|_| FieldError::NotADecimal {
        field,
        value: trimmed.to_owned(),
    })
}

fn parse_geography(raw: &str) -> Result<Geography, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Required { field: "Geography" });
    }
    Geography::parse(trimmed).ok_or_else(|| FieldError::UnknownChoice {
        field: "Geography",
        value: trimmed.to_owned(),
    })
}

fn parse_gender(raw: &str) -> Result<Gender, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Required { field: "Gender" });
    }
    Gender::parse(trimmed).ok_or_else(|| FieldError::UnknownChoice {
        field: "Gender",
        value: trimmed.to_owned(),
    })
}

fn parse_binary(field: &'static str, raw: &str) -> Result<i64, FieldError> {
    match raw.trim() {
        "" => Err(FieldError::Required { field }),
        "0" => Ok(0),
        "1" => Ok(1),
        other => Err(FieldError::UnknownChoice {
            field,
            value: other.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{ChurnForm, FieldError, FormField};
    use crate::{Customer, Gender, Geography};

    fn filled_form() -> ChurnForm {
        ChurnForm {
            customer_id: String::new(),
            surname: String::new(),
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
        }
    }

    #[test]
    fn build_coerces_every_field() {
        let request = filled_form().build().expect("valid form builds");
        assert_eq!(request.credit_score, 650);
        assert_eq!(request.geography, Geography::France);
        assert_eq!(request.gender, Gender::Female);
        assert_eq!(request.age, 40);
        assert_eq!(request.tenure, 3);
        assert_eq!(request.balance, 50_000.5);
        assert_eq!(request.num_of_products, 2);
        assert_eq!(request.has_cr_card, 1);
        assert_eq!(request.is_active_member, 0);
        assert_eq!(request.estimated_salary, 60_000.0);
    }

    #[test]
    fn build_without_selected_customer_leaves_identity_absent() {
        let request = filled_form().build().expect("identity is optional");
        assert_eq!(request.customer_id, None);
        assert_eq!(request.surname, "");
    }

    #[test]
    fn non_numeric_credit_score_names_the_field() {
        let mut form = filled_form();
        form.credit_score = "six fifty".to_owned();
        let error = form.build().expect_err("parse failure should block");
        assert_eq!(error.field(), "CreditScore");
        assert!(matches!(error, FieldError::NotAnInteger { .. }));
    }

    #[test]
    fn empty_required_field_blocks_submission() {
        let mut form = filled_form();
        form.balance = String::new();
        let error = form.build().expect_err("missing balance should block");
        assert_eq!(error, FieldError::Required { field: "Balance" });
    }

    #[test]
    fn enum_membership_is_enforced() {
        let mut form = filled_form();
        form.geography = "Atlantis".to_owned();
        let error = form.build().expect_err("unknown geography should block");
        assert!(matches!(error, FieldError::UnknownChoice { .. }));
        assert_eq!(error.field(), "Geography");
    }

    #[test]
    fn binary_fields_only_accept_zero_or_one() {
        let mut form = filled_form();
        form.has_cr_card = "yes".to_owned();
        let error = form.build().expect_err("non-binary value should block");
        assert_eq!(error.field(), "HasCrCard");

        form.has_cr_card = "0".to_owned();
        let request = form.build().expect("binary 0 builds");
        assert_eq!(request.has_cr_card, 0);
    }

    #[test]
    fn minimums_are_enforced() {
        let mut form = filled_form();
        form.age = "17".to_owned();
        let error = form.build().expect_err("underage should block");
        assert_eq!(
            error,
            FieldError::BelowMinimum {
                field: "Age",
                minimum: 18,
                value: 17,
            }
        );

        let mut form = filled_form();
        form.num_of_products = "0".to_owned();
        assert!(form.build().is_err());
    }

    #[test]
    fn apply_customer_autofills_identity() {
        let mut form = filled_form();
        form.apply_customer(&Customer {
            customer_id: 42,
            surname: "Smith".to_owned(),
        });
        assert_eq!(form.customer_id, "42");
        assert_eq!(form.surname, "Smith");

        let request = form.build().expect("autofilled form builds");
        assert_eq!(request.customer_id, Some(42));
        assert_eq!(request.surname, "Smith");
    }

    #[test]
    fn choice_fields_expose_their_options() {
        assert_eq!(
            FormField::Geography.choices(),
            ["France", "Germany", "Spain"]
        );
        assert_eq!(FormField::HasCrCard.choices(), ["1", "0"]);
        assert!(FormField::Balance.choices().is_empty());
    }
}
