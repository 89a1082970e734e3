//! Base contract for projects

use cp_core::config::ValidationConfig;
use cp_core::error::ValidationErrors;
use cp_models::{parse_display_date, Project, ProjectField};

use crate::base::{is_blank, Contract, ValidationResult};

const NOT_A_QUANTITY: &str = "is not a non-negative whole number";
const NOT_A_PRICE: &str = "is not a non-negative amount";
const ENDS_BEFORE_START: &str = "is before inicioProyecto";

/// Field-level checks shared by the create and update contracts
pub struct ProjectBaseContract<'a> {
    options: &'a ValidationConfig,
}

impl<'a> ProjectBaseContract<'a> {
    pub fn new(options: &'a ValidationConfig) -> Self {
        Self { options }
    }

    /// Every required field must be non-blank
    pub fn validate_required(&self, project: &Project, errors: &mut ValidationErrors) {
        for field in ProjectField::REQUIRED {
            if is_blank(project.text(field)) {
                errors.add_missing(field.key());
            }
        }
    }

    /// A non-blank quantity must be a non-negative whole number
    pub fn validate_quantity(&self, project: &Project, errors: &mut ValidationErrors) {
        if !is_blank(&project.quantity) && project.quantity_value().is_none() {
            errors.add(ProjectField::Quantity.key(), NOT_A_QUANTITY);
        }
    }

    /// A non-blank price must be a finite, non-negative number
    pub fn validate_price(&self, project: &Project, errors: &mut ValidationErrors) {
        if !is_blank(&project.price) && project.price_value().is_none() {
            errors.add(ProjectField::Price.key(), NOT_A_PRICE);
        }
    }

    /// End date must not precede start date, when enforcement is on and both
    /// dates parse
    pub fn validate_date_order(&self, project: &Project, errors: &mut ValidationErrors) {
        if !self.options.enforce_date_order {
            return;
        }
        let start = parse_display_date(&project.start_date);
        let end = parse_display_date(&project.end_date);
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                errors.add(ProjectField::EndDate.key(), ENDS_BEFORE_START);
            }
        }
    }
}

impl Contract<Project> for ProjectBaseContract<'_> {
    fn validate(&self, entity: &Project) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        self.validate_quantity(entity, &mut errors);
        self.validate_price(entity, &mut errors);
        self.validate_date_order(entity, &mut errors);

        errors.into_result()
    }
}

/// Required-field check for callers that enforce it before an update
pub fn validate_required(project: &Project) -> ValidationResult {
    let options = ValidationConfig::default();
    let mut errors = ValidationErrors::new();
    ProjectBaseContract::new(&options).validate_required(project, &mut errors);
    errors.into_result()
}

/// Tidy numeric fields that passed validation
///
/// Quantity becomes canonical integer text (`" 007 "` -> `"7"`). Price keeps
/// the digits as typed, only trimmed, so no precision is lost.
pub(crate) fn normalize_numbers(project: &mut Project, quantity: bool, price: bool) {
    if quantity {
        if let Some(value) = project.quantity_value() {
            project.quantity = value.to_string();
        } else if is_blank(&project.quantity) {
            project.quantity.clear();
        }
    }
    if price {
        if project.price_value().is_some() {
            project.price = project.price.trim().to_string();
        }
    }
}
