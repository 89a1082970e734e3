//! Create contract for projects

use cp_core::config::ValidationConfig;
use cp_core::error::ValidationErrors;
use cp_models::{Project, ProjectInput};
use tracing::debug;

use super::base::{normalize_numbers, ProjectBaseContract};
use crate::base::{Contract, ValidationResult};

/// Contract for creating a new project
pub struct CreateProjectContract<'a> {
    base: ProjectBaseContract<'a>,
}

impl<'a> CreateProjectContract<'a> {
    pub fn new(options: &'a ValidationConfig) -> Self {
        Self {
            base: ProjectBaseContract::new(options),
        }
    }
}

impl Contract<Project> for CreateProjectContract<'_> {
    fn validate(&self, entity: &Project) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        if !entity.is_new() {
            errors.add_base("record already has an id");
        }

        self.base.validate_required(entity, &mut errors);

        if let Err(base_errors) = self.base.validate(entity) {
            errors.merge(base_errors);
        }

        errors.into_result()
    }
}

/// Validate a create input and return the record to persist
///
/// Fails when any required field is blank, naming each one, or when a numeric
/// field does not parse. On success `quantity` holds canonical integer text
/// and `price` the trimmed text as typed.
pub fn validate_for_create(
    input: ProjectInput,
    options: &ValidationConfig,
) -> Result<Project, ValidationErrors> {
    let mut project = input.into_project();

    if let Err(errors) = CreateProjectContract::new(options).validate(&project) {
        debug!(fields = ?errors.fields().collect::<Vec<_>>(), "Create input rejected");
        return Err(errors);
    }

    normalize_numbers(&mut project, true, true);
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cp_models::{ProjectField, ProjectStatus};

    fn complete_input() -> ProjectInput {
        ProjectInput::new()
            .with_name("Mesa de comedor")
            .with_description("Cedro, seis puestos")
            .with_quantity(" 2 ")
            .with_price("4500.00")
            .with_client("Ana", "López", "8888-1234")
            .with_dates("5 marzo 2024", "30 marzo 2024")
    }

    fn blank(input: ProjectInput, field: ProjectField) -> ProjectInput {
        let mut input = input;
        let slot = match field {
            ProjectField::ProjectName => &mut input.name,
            ProjectField::Description => &mut input.description,
            ProjectField::Price => &mut input.price,
            ProjectField::ClientFirstName => &mut input.client_first_name,
            ProjectField::ClientLastName => &mut input.client_last_name,
            ProjectField::ClientPhone => &mut input.client_phone,
            ProjectField::StartDate => &mut input.start_date,
            ProjectField::EndDate => &mut input.end_date,
            other => panic!("{other} is not required"),
        };
        *slot = "   ".to_string();
        input
    }

    #[test]
    fn test_complete_input_is_accepted() {
        let options = ValidationConfig::default();
        let project = validate_for_create(complete_input(), &options).unwrap();

        assert!(project.is_new());
        assert_eq!(project.quantity, "2");
        assert_eq!(project.price, "4500.00");
        assert_eq!(project.price_value(), Some(4500.0));
        assert_eq!(project.status.known(), Some(ProjectStatus::InProgress));
    }

    #[test]
    fn test_each_missing_field_is_named() {
        let options = ValidationConfig::default();
        for field in ProjectField::REQUIRED {
            let errors = validate_for_create(blank(complete_input(), field), &options)
                .expect_err("blank required field must be rejected");

            assert_eq!(errors.fields().collect::<Vec<_>>(), vec![field.key()]);
            assert!(errors.is_missing(field.key()));
        }
    }

    #[test]
    fn test_quantity_is_optional() {
        let options = ValidationConfig::default();
        let project = validate_for_create(complete_input().with_quantity(""), &options).unwrap();
        assert_eq!(project.quantity, "");
    }

    #[test]
    fn test_explicit_status_is_kept() {
        let options = ValidationConfig::default();
        let project = validate_for_create(
            complete_input().with_status(ProjectStatus::Finished),
            &options,
        )
        .unwrap();
        assert_eq!(project.status.known(), Some(ProjectStatus::Finished));
    }

    #[test]
    fn test_invalid_price_is_rejected() {
        let options = ValidationConfig::default();
        let errors = validate_for_create(complete_input().with_price("-10"), &options).unwrap_err();
        assert!(errors.has_error("precioProducto"));
        assert!(!errors.is_missing("precioProducto"));
    }

    #[test]
    fn test_high_precision_price_is_stored_as_typed() {
        let options = ValidationConfig::default();

        let project = validate_for_create(complete_input().with_price("12345678901234567890"), &options).unwrap();
        assert_eq!(project.price, "12345678901234567890");

        let project = validate_for_create(complete_input().with_price(" 19.999999999999999999 "), &options).unwrap();
        assert_eq!(project.price, "19.999999999999999999");
    }

    #[test]
    fn test_large_quantity_is_accepted() {
        let options = ValidationConfig::default();
        let project = validate_for_create(complete_input().with_quantity("5000000000"), &options).unwrap();
        assert_eq!(project.quantity, "5000000000");
    }

    #[test]
    fn test_everything_missing() {
        let options = ValidationConfig::default();
        let errors = validate_for_create(ProjectInput::new(), &options).unwrap_err();
        assert_eq!(errors.fields().count(), ProjectField::REQUIRED.len());
    }
}
