//! Per-field predicates.
//!
//! Every function here is pure and looks at a single string. The age rule
//! additionally needs the current year; `*_in` variants take it explicitly.

use chrono::{Datelike, Local};
use lazy_static::lazy_static;
use regex::Regex;

use crate::form::Field;

/// Minimum age, in calendar years, accepted by the date-of-birth rule.
pub const MINIMUM_AGE: i32 = 18;

lazy_static! {
    // `[0-9]` rather than `\d`: the regex crate's `\d` is Unicode-aware.
    static ref DATE_OF_BIRTH: Regex =
        Regex::new(r"^[0-9]{2}/[0-9]{2}/([0-9]{4})$").expect("date of birth pattern");
    static ref FRENCH_POSTAL_CODE: Regex =
        Regex::new(r"^[0-9]{5}$").expect("postal code pattern");
    static ref PERSON_NAME: Regex =
        Regex::new(r"^[A-Za-zÀ-ÖØ-öø-ÿ \-'’]+$").expect("person name pattern");
    static ref EMAIL: Regex =
        Regex::new(r"^[a-zA-Z0-9._-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,4}$").expect("email pattern");
}

/// Year of the local clock.
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Birth year of a `DD/MM/YYYY` date, `None` if the text is not in that shape.
///
/// Day and month are not range-checked.
pub fn birth_year(date_of_birth: &str) -> Option<i32> {
    DATE_OF_BIRTH
        .captures(date_of_birth)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

/// Age as a plain calendar-year difference: `current_year - birth_year`.
///
/// Someone born on 31/12 counts as one year older on 01/01 of the next year.
pub fn calculate_age(date_of_birth: &str, current_year: i32) -> Option<i32> {
    birth_year(date_of_birth).map(|year| current_year - year)
}

pub fn is_date_of_birth_valid(date_of_birth: &str) -> bool {
    is_date_of_birth_valid_in(date_of_birth, current_year())
}

/// Format is `DD/MM/YYYY` and the calendar-year age is at least [`MINIMUM_AGE`].
pub fn is_date_of_birth_valid_in(date_of_birth: &str, current_year: i32) -> bool {
    calculate_age(date_of_birth, current_year).is_some_and(|age| age >= MINIMUM_AGE)
}

/// Exactly five ASCII digits.
pub fn is_french_postal_code_valid(postal_code: &str) -> bool {
    FRENCH_POSTAL_CODE.is_match(postal_code)
}

/// Letters (accented Latin included), spaces, hyphens and apostrophes; at least one.
pub fn is_person_name_valid(name: &str) -> bool {
    PERSON_NAME.is_match(name)
}

/// `local@domain.tld` with a 2 to 4 letter top-level segment.
pub fn is_email_valid(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Live predicate for a field, evaluated against `current_year` where it matters.
///
/// `None` for fields without a format rule (city).
pub fn check_field(field: Field, value: &str, current_year: i32) -> Option<bool> {
    match field {
        Field::LastName | Field::FirstName => Some(is_person_name_valid(value)),
        Field::Email => Some(is_email_valid(value)),
        Field::Birthday => Some(is_date_of_birth_valid_in(value, current_year)),
        Field::AddressCode => Some(is_french_postal_code_valid(value)),
        Field::City => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_of_birth_relative_to_current_year() {
        let year = current_year();
        assert_eq!(is_date_of_birth_valid("01/01/2000"), year - 2000 >= 18);
        assert_eq!(is_date_of_birth_valid("01/01/2010"), year - 2010 >= 18);
    }

    #[test]
    fn age_is_a_calendar_year_difference() {
        assert_eq!(calculate_age("01/01/2000", 2024), Some(24));
        assert_eq!(calculate_age("31/12/2006", 2024), Some(18));
        assert!(is_date_of_birth_valid_in("31/12/2006", 2024));
        assert!(!is_date_of_birth_valid_in("01/01/2007", 2024));
        assert!(!is_date_of_birth_valid_in("01/01/2010", 2024));
    }

    #[test]
    fn date_of_birth_requires_exact_shape() {
        assert_eq!(birth_year("02/02/1994"), Some(1994));
        for text in ["1994-02-02", "2/2/1994", "02/02/94", "02/02/1994 ", "", "aa/bb/cccc"] {
            assert!(!is_date_of_birth_valid_in(text, 2024), "{text:?} accepted");
        }
        // Non-ASCII digits never match.
        assert_eq!(birth_year("٠١/٠١/٢٠٠٠"), None);
    }

    #[test]
    fn postal_codes() {
        assert!(is_french_postal_code_valid("75000"));
        assert!(is_french_postal_code_valid("06130"));
        assert!(!is_french_postal_code_valid("7500"));
        assert!(!is_french_postal_code_valid("750000"));
        assert!(!is_french_postal_code_valid("B6130"));
    }

    #[test]
    fn person_names() {
        assert!(is_person_name_valid("Jean"));
        assert!(is_person_name_valid("Jean-Étienne d'Aubigné"));
        assert!(is_person_name_valid("Zoë O’Brien"));
        assert!(!is_person_name_valid("Jean123"));
        assert!(!is_person_name_valid("123"));
        assert!(!is_person_name_valid(""));
        assert!(!is_person_name_valid("Jean×"));
    }

    #[test]
    fn emails() {
        assert!(is_email_valid("test@gmail.com"));
        assert!(is_email_valid("first.last-1@mail.example.info"));
        assert!(!is_email_valid("efzf"));
        assert!(!is_email_valid("email@example"));
        assert!(!is_email_valid("email@example.museum"));
        assert!(!is_email_valid("email+tag@example.com"));
    }

    #[test]
    fn city_has_no_format_rule() {
        assert_eq!(check_field(Field::City, "", 2024), None);
        assert_eq!(check_field(Field::Email, "efzf", 2024), Some(false));
        assert_eq!(check_field(Field::Birthday, "02/02/1994", 2024), Some(true));
    }
}
