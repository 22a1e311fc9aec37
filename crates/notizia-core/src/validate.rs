//! Advisory validation for client input, run by the UI before saving.
//!
//! The store only enforces the minimum name length (a table `CHECK`); the
//! note length limit exists here and nowhere else.

use crate::client::{ClientFields, sanitize_note};

pub const NAME_MIN_CHARS: usize = 2;
pub const NOTE_MAX_CHARS: usize = 200;

/// Per-field error messages; `None` means the field is fine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInputErrors {
  pub name: Option<&'static str>,
  pub note: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientValidation {
  pub errors: ClientInputErrors,
  /// Cleaned input: trimmed name, note trimmed and `None` when empty.
  pub value:  ClientFields,
}

impl ClientValidation {
  pub fn is_ok(&self) -> bool {
    self.errors.name.is_none() && self.errors.note.is_none()
  }
}

/// Validate raw form input for a client.
pub fn validate_client_input(name: &str, note: &str) -> ClientValidation {
  let name = name.trim();
  let mut errors = ClientInputErrors::default();

  let name_len = name.chars().count();
  if name_len == 0 {
    errors.name = Some("name is required");
  } else if name_len < NAME_MIN_CHARS {
    errors.name = Some("at least 2 characters");
  }

  if note.trim().chars().count() > NOTE_MAX_CHARS {
    errors.note = Some("at most 200 characters");
  }

  ClientValidation {
    errors,
    value: ClientFields { name: name.to_owned(), note: sanitize_note(note) },
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn valid_input_is_cleaned() {
    let v = validate_client_input("  Ana ", "  ");
    assert!(v.is_ok());
    assert_eq!(v.value.name, "Ana");
    assert_eq!(v.value.note, None);
  }

  #[test]
  fn empty_name_is_required() {
    let v = validate_client_input("   ", "");
    assert!(!v.is_ok());
    assert_eq!(v.errors.name, Some("name is required"));
  }

  #[test]
  fn one_character_name_is_too_short() {
    let v = validate_client_input(" A ", "");
    assert_eq!(v.errors.name, Some("at least 2 characters"));
  }

  #[test]
  fn name_length_counts_characters_not_bytes() {
    // Two characters, four bytes.
    assert!(validate_client_input("Ñó", "").is_ok());
  }

  #[test]
  fn note_limit_is_inclusive_and_ignores_surrounding_whitespace() {
    let at_limit = "x".repeat(NOTE_MAX_CHARS);
    assert!(validate_client_input("Ana", &format!("  {at_limit}  ")).is_ok());

    let over = "x".repeat(NOTE_MAX_CHARS + 1);
    let v = validate_client_input("Ana", &over);
    assert_eq!(v.errors.note, Some("at most 200 characters"));
    assert_eq!(v.errors.name, None);
  }
}
