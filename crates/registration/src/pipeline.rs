//! Submit-time validation.
//!
//! Rules run in a fixed order and stop at the first failure, so a rejected
//! submit always carries exactly one `ValidationError`.

use tracing::debug;

use crate::errors::ValidationError;
use crate::form::FormRecord;
use crate::validators;

type Check = fn(&FormRecord, i32) -> bool;

/// A named check over the whole record paired with the error it raises.
#[derive(Clone)]
pub struct ValidationRule {
    pub name: &'static str,
    pub error: ValidationError,
    check: Check,
}

impl ValidationRule {
    pub fn new(name: &'static str, error: ValidationError, check: Check) -> Self {
        Self { name, error, check }
    }

    pub fn passes(&self, record: &FormRecord, current_year: i32) -> bool {
        (self.check)(record, current_year)
    }
}

impl std::fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationRule")
            .field("name", &self.name)
            .field("error", &self.error)
            .finish()
    }
}

/// Ordered, short-circuiting list of rules.
#[derive(Debug, Clone)]
pub struct ValidationPipeline {
    /// When set, a blank value is rejected with `EmptyField` before any rule runs.
    require_all_fields: bool,
    rules: Vec<ValidationRule>,
}

impl Default for ValidationPipeline {
    fn default() -> Self {
        Self::standard(true)
    }
}

impl ValidationPipeline {
    /// The registration rules: date of birth, postal code, names, email.
    pub fn standard(require_all_fields: bool) -> Self {
        let rules = vec![
            ValidationRule::new("date_of_birth", ValidationError::InvalidAge, |r, year| {
                validators::is_date_of_birth_valid_in(&r.birthday, year)
            }),
            ValidationRule::new("postal_code", ValidationError::InvalidPostalCode, |r, _| {
                validators::is_french_postal_code_valid(&r.address_code)
            }),
            ValidationRule::new("person_names", ValidationError::InvalidName, |r, _| {
                validators::is_person_name_valid(&r.last_name)
                    && validators::is_person_name_valid(&r.first_name)
            }),
            ValidationRule::new("email", ValidationError::InvalidEmail, |r, _| {
                validators::is_email_valid(&r.email)
            }),
        ];

        Self {
            require_all_fields,
            rules,
        }
    }

    pub fn requires_all_fields(&self) -> bool {
        self.require_all_fields
    }

    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    /// Run every check in order; the first failure is returned.
    pub fn run(&self, record: &FormRecord, current_year: i32) -> Result<(), ValidationError> {
        if self.require_all_fields && record.has_blank_value() {
            debug!("validation stopped: blank field");
            return Err(ValidationError::EmptyField);
        }

        match self
            .rules
            .iter()
            .find(|rule| !rule.passes(record, current_year))
        {
            Some(rule) => {
                debug!(rule = rule.name, "validation rule failed");
                Err(rule.error)
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEAR: i32 = 2024;

    fn valid_record() -> FormRecord {
        FormRecord {
            last_name: "Jean".into(),
            first_name: "Dupont".into(),
            email: "email@example.com".into(),
            birthday: "02/02/1994".into(),
            city: "Grasse".into(),
            address_code: "06130".into(),
        }
    }

    #[test]
    fn valid_record_passes() {
        let pipeline = ValidationPipeline::default();
        assert_eq!(pipeline.run(&valid_record(), YEAR), Ok(()));
    }

    #[test]
    fn rule_order_is_fixed() {
        let names: Vec<_> = ValidationPipeline::default()
            .rules()
            .iter()
            .map(|rule| rule.name)
            .collect();
        assert_eq!(names, ["date_of_birth", "postal_code", "person_names", "email"]);
    }

    #[test]
    fn first_failure_wins() {
        let pipeline = ValidationPipeline::default();
        let mut record = valid_record();
        record.email = "efzf".into();
        record.last_name = "123".into();
        record.address_code = "B6130".into();
        assert_eq!(
            pipeline.run(&record, YEAR),
            Err(ValidationError::InvalidPostalCode)
        );

        record.birthday = "02/02/2020".into();
        assert_eq!(pipeline.run(&record, YEAR), Err(ValidationError::InvalidAge));
    }

    #[test]
    fn either_name_trips_the_name_rule() {
        let pipeline = ValidationPipeline::default();
        let mut record = valid_record();
        record.first_name = "123".into();
        assert_eq!(pipeline.run(&record, YEAR), Err(ValidationError::InvalidName));

        let mut record = valid_record();
        record.last_name = "J3an".into();
        assert_eq!(pipeline.run(&record, YEAR), Err(ValidationError::InvalidName));
    }

    #[test]
    fn blank_field_policy() {
        let mut record = valid_record();
        record.email = " ".into();

        let strict = ValidationPipeline::standard(true);
        assert_eq!(strict.run(&record, YEAR), Err(ValidationError::EmptyField));

        // Without the policy the blank email falls through to the email rule.
        let lenient = ValidationPipeline::standard(false);
        assert_eq!(lenient.run(&record, YEAR), Err(ValidationError::InvalidEmail));

        // A blank city has no rule of its own and passes when lenient.
        let mut record = valid_record();
        record.city.clear();
        assert_eq!(lenient.run(&record, YEAR), Ok(()));
    }
}
