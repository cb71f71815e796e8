//! Form data model.
//!
//! `FormRecord` is the six-field aggregate that gets persisted; `FormState`
//! wraps it together with the per-field touched-empty flags that the submit
//! gate reads.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString, IntoEnumIterator};

/// One input of the registration form, in form order.
///
/// The string form (`lastName`, `addressCode`, ...) matches the keys of the
/// persisted JSON record.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
    EnumCount,
)]
#[strum(serialize_all = "camelCase")]
pub enum Field {
    LastName = 0,
    FirstName = 1,
    Email = 2,
    Birthday = 3,
    City = 4,
    AddressCode = 5,
}

impl Field {
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human label as shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            Field::LastName => "Nom",
            Field::FirstName => "Prénom",
            Field::Email => "Email",
            Field::Birthday => "Date de naissance",
            Field::City => "Ville",
            Field::AddressCode => "Code postal",
        }
    }
}

/// The registrant's input at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormRecord {
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    /// `DD/MM/YYYY`
    pub birthday: String,
    pub city: String,
    /// Five-digit French postal code.
    pub address_code: String,
}

impl FormRecord {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::LastName => &self.last_name,
            Field::FirstName => &self.first_name,
            Field::Email => &self.email,
            Field::Birthday => &self.birthday,
            Field::City => &self.city,
            Field::AddressCode => &self.address_code,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::LastName => &mut self.last_name,
            Field::FirstName => &mut self.first_name,
            Field::Email => &mut self.email,
            Field::Birthday => &mut self.birthday,
            Field::City => &mut self.city,
            Field::AddressCode => &mut self.address_code,
        };
        *slot = value.into();
    }

    pub fn values(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::iter().map(move |field| (field, self.get(field)))
    }

    /// True if at least one value is empty once surrounding whitespace is trimmed.
    pub fn has_blank_value(&self) -> bool {
        self.values().any(|(_, value)| value.trim().is_empty())
    }
}

/// One boolean per field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldFlags([bool; Field::COUNT]);

impl FieldFlags {
    pub fn get(&self, field: Field) -> bool {
        self.0[field.index()]
    }

    pub fn set(&mut self, field: Field, flag: bool) {
        self.0[field.index()] = flag;
    }

    pub fn any(&self) -> bool {
        self.0.iter().any(|flag| *flag)
    }

    /// Fields whose flag is raised, in form order.
    pub fn raised(&self) -> impl Iterator<Item = Field> + '_ {
        Field::iter().filter(move |field| self.get(*field))
    }
}

/// Mutable state captured while editing the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    record: FormRecord,
    /// True iff the field was blank at the moment of its last edit.
    touched_empty: FieldFlags,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) -> &FormRecord {
        &self.record
    }

    pub fn touched_empty(&self) -> &FieldFlags {
        &self.touched_empty
    }

    pub fn value(&self, field: Field) -> &str {
        self.record.get(field)
    }

    /// Apply one edit: store the value and recompute that field's touched-empty flag.
    pub fn edit(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        self.touched_empty.set(field, value.trim().is_empty());
        self.record.set(field, value);
    }

    /// Back to the mount-time state: every value empty, every flag lowered.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn field_names_match_record_keys() {
        let names: Vec<String> = Field::iter().map(|f| f.to_string()).collect();
        assert_eq!(
            names,
            [
                "lastName",
                "firstName",
                "email",
                "birthday",
                "city",
                "addressCode"
            ]
        );
        assert_eq!(Field::from_str("addressCode").unwrap(), Field::AddressCode);
        assert!(Field::from_str("zip").is_err());
    }

    #[test]
    fn record_serializes_with_camel_case_keys() {
        let mut record = FormRecord::default();
        record.set(Field::LastName, "Jean");
        record.set(Field::AddressCode, "06130");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["lastName"], "Jean");
        assert_eq!(json["addressCode"], "06130");
        assert_eq!(json.as_object().unwrap().len(), 6);
    }

    #[test]
    fn edit_tracks_touched_empty_per_field() {
        let mut state = FormState::new();
        assert!(!state.touched_empty().any());

        state.edit(Field::Email, "   ");
        assert!(state.touched_empty().get(Field::Email));

        // A malformed but non-blank value lowers the flag again.
        state.edit(Field::Email, "efzf");
        assert!(!state.touched_empty().get(Field::Email));
        assert_eq!(state.value(Field::Email), "efzf");
    }

    #[test]
    fn reset_clears_values_and_flags() {
        let mut state = FormState::new();
        state.edit(Field::City, "Grasse");
        state.edit(Field::LastName, "");
        state.reset();

        assert_eq!(state, FormState::default());
        assert!(state.record().has_blank_value());
    }
}
