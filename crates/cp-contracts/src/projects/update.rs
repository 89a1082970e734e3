//! Update contract for projects
//!
//! Updates may leave a record partial: required fields are not re-checked
//! here (callers use [`super::validate_required`] when they need that).

use cp_core::config::ValidationConfig;
use cp_core::error::ValidationErrors;
use cp_models::{Project, ProjectField, ProjectPatch};

use super::base::{normalize_numbers, ProjectBaseContract};
use crate::base::{Contract, ValidationResult};

/// Contract for updating an existing project
pub struct UpdateProjectContract<'a> {
    base: ProjectBaseContract<'a>,
    patch: &'a ProjectPatch,
}

impl<'a> UpdateProjectContract<'a> {
    pub fn new(options: &'a ValidationConfig, patch: &'a ProjectPatch) -> Self {
        Self {
            base: ProjectBaseContract::new(options),
            patch,
        }
    }
}

impl Contract<Project> for UpdateProjectContract<'_> {
    fn validate(&self, entity: &Project) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        if entity.is_new() {
            errors.add_base("cannot update a record that was never created");
        }

        // Only values the patch brings in are checked; whatever was already
        // stored is left to its writer.
        if self.patch.is_set(ProjectField::Quantity) {
            self.base.validate_quantity(entity, &mut errors);
        }
        if self.patch.is_set(ProjectField::Price) {
            self.base.validate_price(entity, &mut errors);
        }
        if self.patch.is_set(ProjectField::StartDate) || self.patch.is_set(ProjectField::EndDate) {
            self.base.validate_date_order(entity, &mut errors);
        }

        errors.into_result()
    }
}

/// Merge `patch` over `existing` and validate the supplied values
pub fn validate_for_update(
    existing: &Project,
    patch: &ProjectPatch,
    options: &ValidationConfig,
) -> Result<Project, ValidationErrors> {
    let mut merged = existing.clone();
    patch.apply_to(&mut merged);

    UpdateProjectContract::new(options, patch).validate(&merged)?;

    normalize_numbers(
        &mut merged,
        patch.is_set(ProjectField::Quantity),
        patch.is_set(ProjectField::Price),
    );
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cp_models::{ProjectId, ProjectInput, ProjectStatus, StatusValue};

    fn existing() -> Project {
        let mut project = ProjectInput::new()
            .with_name("Librero")
            .with_description("Pino")
            .with_price("800")
            .with_client("Rosa", "Mena", "777")
            .with_dates("1 mayo 2024", "20 mayo 2024")
            .into_project();
        project.id = Some(ProjectId::new("p-1"));
        project
    }

    #[test]
    fn test_merge_keeps_untouched_fields() {
        let options = ValidationConfig::default();
        let patch = ProjectPatch::new()
            .with_status(ProjectStatus::Finished)
            .with_price(" 950 ");

        let merged = validate_for_update(&existing(), &patch, &options).unwrap();
        assert_eq!(merged.id, Some(ProjectId::new("p-1")));
        assert_eq!(merged.status, StatusValue::Known(ProjectStatus::Finished));
        assert_eq!(merged.price, "950");
        assert_eq!(merged.name, "Librero");
    }

    #[test]
    fn test_partial_record_is_allowed() {
        let options = ValidationConfig::default();
        let patch = ProjectPatch::new().with_description("");

        let merged = validate_for_update(&existing(), &patch, &options).unwrap();
        assert_eq!(merged.description, "");
        assert!(crate::validate_required(&merged).is_err());
    }

    #[test]
    fn test_supplied_numbers_must_parse() {
        let options = ValidationConfig::default();
        let patch = ProjectPatch::new().with_quantity("muchos");

        let errors = validate_for_update(&existing(), &patch, &options).unwrap_err();
        assert!(errors.has_error("cantidad"));
    }

    #[test]
    fn test_stored_bad_values_are_not_rechecked() {
        let options = ValidationConfig::default();
        let mut stored = existing();
        stored.price = "n/a".into();

        let patch = ProjectPatch::new().with_client_phone("999");
        let merged = validate_for_update(&stored, &patch, &options).unwrap();
        assert_eq!(merged.price, "n/a");
    }

    #[test]
    fn test_new_record_cannot_be_updated() {
        let options = ValidationConfig::default();
        let mut record = existing();
        record.id = None;

        let errors = validate_for_update(&record, &ProjectPatch::new(), &options).unwrap_err();
        assert!(!errors.base_errors.is_empty());
    }

    #[test]
    fn test_date_order_on_update() {
        let options = ValidationConfig { enforce_date_order: true };
        let patch = ProjectPatch::new().with_end_date("1 abril 2024");

        let errors = validate_for_update(&existing(), &patch, &options).unwrap_err();
        assert!(errors.has_error("finalProyecto"));
    }
}
