use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::model::Contact;

/// REST DTO for a contact record.
///
/// The three named fields come first, followed by every pass-through
/// attribute of the source record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactDto {
    pub id: String,
    pub full_name: Value,
    pub is_favourite: Value,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl From<Contact> for ContactDto {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id.into_inner(),
            full_name: contact.full_name,
            is_favourite: contact.favourite,
            attributes: contact.attributes,
        }
    }
}

fn to_dtos(contacts: Vec<Contact>) -> Vec<ContactDto> {
    contacts.into_iter().map(ContactDto::from).collect()
}

/// `{success, count, data}` envelope for list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ContactListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<ContactDto>,
}

impl From<Vec<Contact>> for ContactListResponse {
    fn from(contacts: Vec<Contact>) -> Self {
        let data = to_dtos(contacts);
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// `{success, count, searchTerm, data}` envelope for name search.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub success: bool,
    pub count: usize,
    pub search_term: String,
    pub data: Vec<ContactDto>,
}

impl SearchResponse {
    #[must_use]
    pub fn new(search_term: String, matches: Vec<Contact>) -> Self {
        let data = to_dtos(matches);
        Self {
            success: true,
            count: data.len(),
            search_term,
            data,
        }
    }
}

/// `{success, data}` envelope for a single record.
#[derive(Debug, Clone, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub data: ContactDto,
}

impl From<Contact> for ContactResponse {
    fn from(contact: Contact) -> Self {
        Self {
            success: true,
            data: contact.into(),
        }
    }
}

/// `{success, message, data}` envelope returned by the favourite toggle.
#[derive(Debug, Clone, Serialize)]
pub struct FavouriteToggledResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: ContactDto,
}

impl From<Contact> for FavouriteToggledResponse {
    fn from(contact: Contact) -> Self {
        Self {
            success: true,
            message: "Favourite status updated",
            data: contact.into(),
        }
    }
}

/// Liveness report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub total_contacts: usize,
}

/// Query string of the search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
}

/// `{success: false, message, error?}` envelope for every failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
