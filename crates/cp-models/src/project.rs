//! Project model
//!
//! One carpentry job: client, product, dates, price, and status.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lenient;
use crate::status::{ProjectStatus, StatusValue};

/// Stored document body (field key -> value)
pub type Document = serde_json::Map<String, Value>;

/// Opaque identifier assigned by the document collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Persisted fields of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectField {
    ProjectName,
    Description,
    Quantity,
    Price,
    ClientFirstName,
    ClientLastName,
    ClientPhone,
    ImageRef,
    Status,
    StartDate,
    EndDate,
}

impl ProjectField {
    pub const ALL: [ProjectField; 11] = [
        ProjectField::ProjectName,
        ProjectField::Description,
        ProjectField::Quantity,
        ProjectField::Price,
        ProjectField::ClientFirstName,
        ProjectField::ClientLastName,
        ProjectField::ClientPhone,
        ProjectField::ImageRef,
        ProjectField::Status,
        ProjectField::StartDate,
        ProjectField::EndDate,
    ];

    /// Fields that must be non-blank for a record to be created
    pub const REQUIRED: [ProjectField; 8] = [
        ProjectField::ProjectName,
        ProjectField::Description,
        ProjectField::Price,
        ProjectField::ClientFirstName,
        ProjectField::ClientLastName,
        ProjectField::ClientPhone,
        ProjectField::StartDate,
        ProjectField::EndDate,
    ];

    /// Document key
    pub fn key(&self) -> &'static str {
        match self {
            Self::ProjectName => "nombreProyecto",
            Self::Description => "descripcion",
            Self::Quantity => "cantidad",
            Self::Price => "precioProducto",
            Self::ClientFirstName => "nombresCliente",
            Self::ClientLastName => "apellidosCliente",
            Self::ClientPhone => "telefonoCliente",
            Self::ImageRef => "imageUri",
            Self::Status => "estado",
            Self::StartDate => "inicioProyecto",
            Self::EndDate => "finalProyecto",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl fmt::Display for ProjectField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Project record
///
/// `quantity` and `price` keep their stored text; use [`Project::quantity_value`]
/// and [`Project::price_value`] for numbers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Project {
    /// Assigned by the collection; `None` until created
    #[serde(skip)]
    pub id: Option<ProjectId>,

    #[serde(rename = "nombreProyecto", default, deserialize_with = "lenient::string")]
    pub name: String,

    #[serde(rename = "descripcion", default, deserialize_with = "lenient::string")]
    pub description: String,

    #[serde(rename = "cantidad", default, deserialize_with = "lenient::string")]
    pub quantity: String,

    #[serde(rename = "precioProducto", default, deserialize_with = "lenient::string")]
    pub price: String,

    #[serde(rename = "nombresCliente", default, deserialize_with = "lenient::string")]
    pub client_first_name: String,

    #[serde(rename = "apellidosCliente", default, deserialize_with = "lenient::string")]
    pub client_last_name: String,

    #[serde(rename = "telefonoCliente", default, deserialize_with = "lenient::string")]
    pub client_phone: String,

    #[serde(
        rename = "imageUri",
        default,
        deserialize_with = "lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_ref: Option<String>,

    #[serde(rename = "estado", default = "StatusValue::missing")]
    pub status: StatusValue,

    #[serde(rename = "inicioProyecto", default, deserialize_with = "lenient::string")]
    pub start_date: String,

    #[serde(rename = "finalProyecto", default, deserialize_with = "lenient::string")]
    pub end_date: String,
}

impl Project {
    /// Build a record from a stored document
    ///
    /// Every field is read leniently, so a malformed document still yields a
    /// record (with blanks where values could not be read).
    pub fn from_document(id: ProjectId, document: &Document) -> Self {
        let mut project = serde_json::from_value::<Project>(Value::Object(document.clone()))
            .unwrap_or_else(|_| Project {
                status: StatusValue::missing(),
                ..Project::default()
            });
        project.id = Some(id);
        project
    }

    /// Stored document body (the id is not part of it)
    pub fn to_document(&self) -> Document {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Document::new(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Text of a field as stored (`""` for an absent image)
    pub fn text(&self, field: ProjectField) -> &str {
        match field {
            ProjectField::ProjectName => &self.name,
            ProjectField::Description => &self.description,
            ProjectField::Quantity => &self.quantity,
            ProjectField::Price => &self.price,
            ProjectField::ClientFirstName => &self.client_first_name,
            ProjectField::ClientLastName => &self.client_last_name,
            ProjectField::ClientPhone => &self.client_phone,
            ProjectField::ImageRef => self.image_ref.as_deref().unwrap_or(""),
            ProjectField::Status => self.status.as_str(),
            ProjectField::StartDate => &self.start_date,
            ProjectField::EndDate => &self.end_date,
        }
    }

    /// `"first last"`
    pub fn client_full_name(&self) -> String {
        format!("{} {}", self.client_first_name, self.client_last_name)
    }

    /// Parsed quantity; `None` when blank or not a non-negative integer
    pub fn quantity_value(&self) -> Option<u64> {
        self.quantity.trim().parse().ok()
    }

    /// Parsed price; `None` when blank, negative, or not a finite number
    pub fn price_value(&self) -> Option<f64> {
        self.price
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|price| price.is_finite() && *price >= 0.0)
    }
}

/// Input for creating a project
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectInput {
    pub name: String,
    pub description: String,
    pub quantity: String,
    pub price: String,
    pub client_first_name: String,
    pub client_last_name: String,
    pub client_phone: String,
    pub image_ref: Option<String>,
    /// Defaults to in-progress
    pub status: Option<ProjectStatus>,
    pub start_date: String,
    pub end_date: String,
}

impl ProjectInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = quantity.into();
        self
    }

    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = price.into();
        self
    }

    pub fn with_client(
        mut self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        self.client_first_name = first_name.into();
        self.client_last_name = last_name.into();
        self.client_phone = phone.into();
        self
    }

    pub fn with_image_ref(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_dates(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = start.into();
        self.end_date = end.into();
        self
    }

    /// Unvalidated record with no id
    pub fn into_project(self) -> Project {
        Project {
            id: None,
            name: self.name,
            description: self.description,
            quantity: self.quantity,
            price: self.price,
            client_first_name: self.client_first_name,
            client_last_name: self.client_last_name,
            client_phone: self.client_phone,
            image_ref: self.image_ref.filter(|image| !image.is_empty()),
            status: self.status.unwrap_or_default().into(),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Partial update; `None` means "leave unchanged"
///
/// There is no way to clear a field: an absent value and a cleared value
/// look the same once the patch is written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<String>,
    pub price: Option<String>,
    pub client_first_name: Option<String>,
    pub client_last_name: Option<String>,
    pub client_phone: Option<String>,
    pub image_ref: Option<String>,
    pub status: Option<ProjectStatus>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ProjectPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = Some(quantity.into());
        self
    }

    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    pub fn with_client_phone(mut self, phone: impl Into<String>) -> Self {
        self.client_phone = Some(phone.into());
        self
    }

    pub fn with_image_ref(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_end_date(mut self, end: impl Into<String>) -> Self {
        self.end_date = Some(end.into());
        self
    }

    /// Fields carrying a value, in declaration order
    pub fn fields(&self) -> Vec<ProjectField> {
        ProjectField::ALL
            .into_iter()
            .filter(|field| self.is_set(*field))
            .collect()
    }

    pub fn is_set(&self, field: ProjectField) -> bool {
        match field {
            ProjectField::ProjectName => self.name.is_some(),
            ProjectField::Description => self.description.is_some(),
            ProjectField::Quantity => self.quantity.is_some(),
            ProjectField::Price => self.price.is_some(),
            ProjectField::ClientFirstName => self.client_first_name.is_some(),
            ProjectField::ClientLastName => self.client_last_name.is_some(),
            ProjectField::ClientPhone => self.client_phone.is_some(),
            ProjectField::ImageRef => self.image_ref.is_some(),
            ProjectField::Status => self.status.is_some(),
            ProjectField::StartDate => self.start_date.is_some(),
            ProjectField::EndDate => self.end_date.is_some(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Copy every supplied value onto `project`
    pub fn apply_to(&self, project: &mut Project) {
        fn set(target: &mut String, value: &Option<String>) {
            if let Some(value) = value {
                target.clone_from(value);
            }
        }

        set(&mut project.name, &self.name);
        set(&mut project.description, &self.description);
        set(&mut project.quantity, &self.quantity);
        set(&mut project.price, &self.price);
        set(&mut project.client_first_name, &self.client_first_name);
        set(&mut project.client_last_name, &self.client_last_name);
        set(&mut project.client_phone, &self.client_phone);
        set(&mut project.start_date, &self.start_date);
        set(&mut project.end_date, &self.end_date);
        if let Some(image_ref) = &self.image_ref {
            project.image_ref = Some(image_ref.clone());
        }
        if let Some(status) = self.status {
            project.status = status.into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Project {
        ProjectInput::new()
            .with_name("Mesa de comedor")
            .with_description("Mesa de cedro para seis personas")
            .with_quantity("1")
            .with_price("4500")
            .with_client("Ana", "López", "8888-1234")
            .with_dates("5 marzo 2024", "30 marzo 2024")
            .into_project()
    }

    #[test]
    fn test_document_uses_stored_keys() {
        let document = sample().to_document();
        let mut keys: Vec<&str> = document.keys().map(String::as_str).collect();
        keys.sort_unstable();

        let mut expected: Vec<&str> = ProjectField::ALL
            .iter()
            .filter(|field| **field != ProjectField::ImageRef)
            .map(ProjectField::key)
            .collect();
        expected.sort_unstable();

        assert_eq!(keys, expected);
        assert_eq!(document["estado"], json!("En proceso"));
        assert_eq!(document["precioProducto"], json!("4500"));
    }

    #[test]
    fn test_from_document_keeps_id_and_values() {
        let document = sample().with_image("file:///mesa.png").to_document();
        let project = Project::from_document(ProjectId::new("abc"), &document);

        assert_eq!(project.id, Some(ProjectId::new("abc")));
        assert_eq!(project.image_ref.as_deref(), Some("file:///mesa.png"));
        assert_eq!(project.client_full_name(), "Ana López");
        assert_eq!(project.to_document(), document);
    }

    #[test]
    fn test_from_document_is_lenient() {
        let document = json!({
            "nombreProyecto": "Puerta",
            "cantidad": 3,
            "precioProducto": 120.5,
            "imageUri": null,
            "estado": "Cancelado"
        });
        let Value::Object(document) = document else { unreachable!() };

        let project = Project::from_document(ProjectId::new("x"), &document);
        assert_eq!(project.quantity, "3");
        assert_eq!(project.quantity_value(), Some(3));
        assert_eq!(project.price_value(), Some(120.5));
        assert_eq!(project.image_ref, None);
        assert_eq!(project.status, StatusValue::Unrecognized("Cancelado".into()));
        assert_eq!(project.description, "");
    }

    #[test]
    fn test_missing_status_is_unrecognized() {
        let project = Project::from_document(ProjectId::new("x"), &Document::new());
        assert!(!project.status.is_known());
    }

    #[test]
    fn test_numeric_accessors() {
        let mut project = sample();
        project.price = "-3".into();
        assert_eq!(project.price_value(), None);
        project.price = " 12.75 ".into();
        assert_eq!(project.price_value(), Some(12.75));
        project.quantity = "dos".into();
        assert_eq!(project.quantity_value(), None);
        project.quantity = "5000000000".into();
        assert_eq!(project.quantity_value(), Some(5_000_000_000));
        project.quantity = "-1".into();
        assert_eq!(project.quantity_value(), None);
    }

    #[test]
    fn test_patch_fields_and_apply() {
        let patch = ProjectPatch::new()
            .with_price("5000")
            .with_status(ProjectStatus::Finished);
        assert_eq!(patch.fields(), vec![ProjectField::Price, ProjectField::Status]);

        let mut project = sample();
        patch.apply_to(&mut project);
        assert_eq!(project.price, "5000");
        assert_eq!(project.status.known(), Some(ProjectStatus::Finished));
        assert_eq!(project.name, "Mesa de comedor");
        assert!(ProjectPatch::new().is_empty());
    }

    #[test]
    fn test_field_keys_round_trip() {
        for field in ProjectField::ALL {
            assert_eq!(ProjectField::from_key(field.key()), Some(field));
        }
        assert_eq!(ProjectField::from_key("id"), None);
    }

    impl Project {
        fn with_image(mut self, image: &str) -> Self {
            self.image_ref = Some(image.to_string());
            self
        }
    }
}
