//! The two views derived from one `FormState`.
//!
//! - gate view: whether the submit control is disabled (blank values or
//!   touched-empty flags only, never format checks)
//! - display view: which inputs should be drawn as erroneous, from the live
//!   field predicates
//!
//! Both are recomputed from scratch on every call; nothing is cached between
//! edits.

use strum::IntoEnumIterator;

use crate::form::{Field, FieldFlags, FormRecord, FormState};
use crate::validators;

/// Disabled iff a value is blank after trim or a touched-empty flag is raised.
pub fn is_submit_disabled(record: &FormRecord, touched_empty: &FieldFlags) -> bool {
    record.has_blank_value() || touched_empty.any()
}

/// Per-field "show as erroneous" flags.
///
/// Fields with a format rule use the live predicate; city, which has none,
/// falls back to its touched-empty flag.
pub fn display_errors(
    record: &FormRecord,
    touched_empty: &FieldFlags,
    current_year: i32,
) -> FieldFlags {
    let mut errors = FieldFlags::default();
    for field in Field::iter() {
        let erroneous = match validators::check_field(field, record.get(field), current_year) {
            Some(valid) => !valid,
            None => touched_empty.get(field),
        };
        errors.set(field, erroneous);
    }
    errors
}

/// Snapshot of both views for a front end to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormView {
    pub submit_disabled: bool,
    pub field_errors: FieldFlags,
}

impl FormView {
    pub fn derive(state: &FormState, current_year: i32) -> Self {
        Self {
            submit_disabled: is_submit_disabled(state.record(), state.touched_empty()),
            field_errors: display_errors(state.record(), state.touched_empty(), current_year),
        }
    }
}
