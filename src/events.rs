//! Events — delimited-file-backed event records and their service.
//!
//! The on-disk header is `ID,Titulo,Descripcion,Ubicacion,Fecha,Hora`; `ID`
//! is a base-10 integer assigned as `max(existing) + 1` (or 1 for an empty
//! store) and never reused. Listing sorts by `Fecha` as a plain string
//! comparison — two dates written in different formats do not sort as
//! calendar dates would. That is a documented quirk of the format, kept
//! as-is.

use serde::{Deserialize, Serialize};

use crate::codec::{self, Record};
use crate::error::ServiceError;
use crate::store::RecordStore;

/// Hard cap on the `limit` query parameter.
pub const MAX_LIMIT: usize = 50;
/// Default page size when `limit` is not given.
pub const DEFAULT_LIMIT: usize = 2;

/// One persisted event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub titulo: String,
    pub descripcion: String,
    pub ubicacion: String,
    pub fecha: String,
    pub hora: String,
}

impl Record for Event {
    const HEADER: &'static [&'static str] =
        &["ID", "Titulo", "Descripcion", "Ubicacion", "Fecha", "Hora"];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.titulo.clone(),
            self.descripcion.clone(),
            self.ubicacion.clone(),
            self.fecha.clone(),
            self.hora.clone(),
        ]
    }

    fn from_row(row: &[String]) -> Result<Self, String> {
        let id = row[0]
            .parse()
            .map_err(|_| format!("invalid event ID `{}`", row[0]))?;
        Ok(Event {
            id,
            titulo: row[1].clone(),
            descripcion: row[2].clone(),
            ubicacion: row[3].clone(),
            fecha: row[4].clone(),
            hora: row[5].clone(),
        })
    }
}

/// Creation input — all fields required and non-empty.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub titulo: String,
    pub descripcion: String,
    pub ubicacion: String,
    pub fecha: String,
    pub hora: String,
}

/// Partial-update input. A key absent from the payload means "leave
/// unchanged"; this is distinct from a key set to an empty string, which is
/// rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPatch {
    #[serde(default)]
    pub titulo: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub ubicacion: Option<String>,
    #[serde(default)]
    pub fecha: Option<String>,
    #[serde(default)]
    pub hora: Option<String>,
}

/// Validation, identity assignment, and merge logic over an event store.
pub struct EventService {
    store: Box<dyn RecordStore<Event>>,
}

impl EventService {
    /// Create a service over any event store backend.
    pub fn new(store: impl RecordStore<Event> + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Create an event: validate, assign the next identity, append,
    /// persist the full set.
    pub fn create(&self, input: NewEvent) -> Result<Event, ServiceError> {
        require_non_empty("titulo", &input.titulo)?;
        require_non_empty("descripcion", &input.descripcion)?;
        require_non_empty("ubicacion", &input.ubicacion)?;
        require_non_empty("fecha", &input.fecha)?;
        require_non_empty("hora", &input.hora)?;

        let mut events = self.store.load_all()?;
        let id = events.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        let event = Event {
            id,
            titulo: input.titulo,
            descripcion: input.descripcion,
            ubicacion: input.ubicacion,
            fecha: input.fecha,
            hora: input.hora,
        };
        events.push(event.clone());
        self.store.save_all(&events)?;
        Ok(event)
    }

    /// Merge the fields present in `patch` over the existing event and
    /// persist the full set. Fields absent from the patch are untouched.
    pub fn update(&self, id: i64, patch: EventPatch) -> Result<Event, ServiceError> {
        for (name, value) in [
            ("titulo", &patch.titulo),
            ("descripcion", &patch.descripcion),
            ("ubicacion", &patch.ubicacion),
            ("fecha", &patch.fecha),
            ("hora", &patch.hora),
        ] {
            if let Some(value) = value {
                require_non_empty(name, value)?;
            }
        }

        let mut events = self.store.load_all()?;
        let event = events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("event {}", id)))?;

        if let Some(titulo) = patch.titulo {
            event.titulo = titulo;
        }
        if let Some(descripcion) = patch.descripcion {
            event.descripcion = descripcion;
        }
        if let Some(ubicacion) = patch.ubicacion {
            event.ubicacion = ubicacion;
        }
        if let Some(fecha) = patch.fecha {
            event.fecha = fecha;
        }
        if let Some(hora) = patch.hora {
            event.hora = hora;
        }

        let updated = event.clone();
        self.store.save_all(&events)?;
        Ok(updated)
    }

    /// Remove the event with the given identity and persist. Deleting an
    /// absent identity is a no-op, not an error; the set is persisted
    /// unchanged.
    pub fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let mut events = self.store.load_all()?;
        events.retain(|e| e.id != id);
        self.store.save_all(&events)?;
        Ok(())
    }

    /// List events sorted by `fecha` (string comparison), returning the
    /// `[skip, skip+limit)` window clipped to the available length. `limit`
    /// is capped at [`MAX_LIMIT`].
    pub fn list(&self, skip: usize, limit: usize) -> Result<Vec<Event>, ServiceError> {
        let mut events = self.store.load_all()?;
        events.sort_by(|a, b| a.fecha.cmp(&b.fecha));
        Ok(events
            .into_iter()
            .skip(skip)
            .take(limit.min(MAX_LIMIT))
            .collect())
    }

    /// Encode the full store, in on-disk order (no sort), for bulk
    /// download.
    pub fn export(&self) -> Result<String, ServiceError> {
        let events = self.store.load_all()?;
        Ok(codec::encode(&events))
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
