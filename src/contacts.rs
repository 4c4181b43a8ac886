//! Contacts — delimited-file-backed contact records and their service.
//!
//! The on-disk header is `id,name,email,phone,message`; `id` is a random
//! 36-character hyphenated token assigned at creation. Collisions are
//! treated as negligible at 128-bit strength and not defended against.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::codec::{self, Record};
use crate::error::ServiceError;
use crate::store::RecordStore;

/// One persisted contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl Record for Contact {
    const HEADER: &'static [&'static str] = &["id", "name", "email", "phone", "message"];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.message.clone(),
        ]
    }

    fn from_row(row: &[String]) -> Result<Self, String> {
        Ok(Contact {
            id: row[0].clone(),
            name: row[1].clone(),
            email: row[2].clone(),
            phone: row[3].clone(),
            message: row[4].clone(),
        })
    }
}

/// Creation input — all fields required, email syntactically valid.
#[derive(Debug, Clone, Deserialize)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

/// Partial-update input. A key absent from the payload means "leave
/// unchanged".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Validation, identity assignment, and merge logic over a contact store.
pub struct ContactService {
    store: Box<dyn RecordStore<Contact>>,
}

impl ContactService {
    /// Create a service over any contact store backend.
    pub fn new(store: impl RecordStore<Contact> + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Create a contact: validate, assign a fresh random identity, append,
    /// persist the full set.
    pub fn create(&self, input: NewContact) -> Result<Contact, ServiceError> {
        require_non_empty("name", &input.name)?;
        require_non_empty("phone", &input.phone)?;
        require_non_empty("message", &input.message)?;
        validate_email(&input.email)?;

        let mut contacts = self.store.load_all()?;
        let contact = Contact {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            message: input.message,
        };
        contacts.push(contact.clone());
        self.store.save_all(&contacts)?;
        Ok(contact)
    }

    /// Fetch one contact by identity.
    pub fn get(&self, id: &str) -> Result<Contact, ServiceError> {
        let contacts = self.store.load_all()?;
        contacts
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("contact {}", id)))
    }

    /// List all contacts in on-disk order.
    pub fn list(&self) -> Result<Vec<Contact>, ServiceError> {
        Ok(self.store.load_all()?)
    }

    /// Merge the fields present in `patch` over the existing contact and
    /// persist the full set.
    pub fn update(&self, id: &str, patch: ContactPatch) -> Result<Contact, ServiceError> {
        if let Some(name) = &patch.name {
            require_non_empty("name", name)?;
        }
        if let Some(phone) = &patch.phone {
            require_non_empty("phone", phone)?;
        }
        if let Some(message) = &patch.message {
            require_non_empty("message", message)?;
        }
        if let Some(email) = &patch.email {
            validate_email(email)?;
        }

        let mut contacts = self.store.load_all()?;
        let contact = contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("contact {}", id)))?;

        if let Some(name) = patch.name {
            contact.name = name;
        }
        if let Some(email) = patch.email {
            contact.email = email;
        }
        if let Some(phone) = patch.phone {
            contact.phone = phone;
        }
        if let Some(message) = patch.message {
            contact.message = message;
        }

        let updated = contact.clone();
        self.store.save_all(&contacts)?;
        Ok(updated)
    }

    /// Remove the contact with the given identity and persist. Deleting an
    /// absent identity is a no-op, not an error.
    pub fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let mut contacts = self.store.load_all()?;
        contacts.retain(|c| c.id != id);
        self.store.save_all(&contacts)?;
        Ok(())
    }

    /// Encode the full store, in on-disk order, for bulk download.
    pub fn export(&self) -> Result<String, ServiceError> {
        let contacts = self.store.load_all()?;
        Ok(codec::encode(&contacts))
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::Validation(format!(
            "field `{}` must not be empty",
            field
        )));
    }
    Ok(())
}

/// Syntactic email check: exactly one `@`, non-empty local part, and a
/// domain with at least one dot. Deliverability is not our problem.
fn validate_email(email: &str) -> Result<(), ServiceError> {
    let invalid = || ServiceError::Validation(format!("invalid email address `{}`", email));

    if email.contains(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let (host, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;
    if host.is_empty() || tld.is_empty() {
        return Err(invalid());
    }
    Ok(())
}
