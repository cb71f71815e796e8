use std::path::PathBuf;
use thiserror::Error;

/// Why a submitted form was turned down.
///
/// The `Display` text of each variant is the exact message shown to the user
/// in the error channel; front ends and tests compare against it verbatim.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationError {
    #[error("Veuillez remplir tous les champs.")]
    EmptyField,

    #[error("La date de naissance n'est pas valide. Assurez-vous d'avoir au moins 18 ans.")]
    InvalidAge,

    #[error("Le code postal doit être au format français (5 chiffres).")]
    InvalidPostalCode,

    #[error("Le nom et le prénom ne doivent contenir que des lettres.")]
    InvalidName,

    #[error("L'email n'est pas valide")]
    InvalidEmail,
}

impl ValidationError {
    /// Stable identifier, handy for logs and machine-readable output.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::EmptyField => "empty_field",
            ValidationError::InvalidAge => "invalid_age",
            ValidationError::InvalidPostalCode => "invalid_postal_code",
            ValidationError::InvalidName => "invalid_name",
            ValidationError::InvalidEmail => "invalid_email",
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store file {0:?} does not contain a JSON object")]
    NotAnObject(PathBuf),

    #[error("value under key {0:?} is not a string")]
    NotAString(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_verbatim() {
        assert_eq!(
            ValidationError::EmptyField.to_string(),
            "Veuillez remplir tous les champs."
        );
        assert_eq!(
            ValidationError::InvalidAge.to_string(),
            "La date de naissance n'est pas valide. Assurez-vous d'avoir au moins 18 ans."
        );
        assert_eq!(
            ValidationError::InvalidPostalCode.to_string(),
            "Le code postal doit être au format français (5 chiffres)."
        );
        assert_eq!(
            ValidationError::InvalidName.to_string(),
            "Le nom et le prénom ne doivent contenir que des lettres."
        );
        assert_eq!(
            ValidationError::InvalidEmail.to_string(),
            "L'email n'est pas valide"
        );
    }
}
