//! Field cipher boundary — optional at-rest protection for free text.
//!
//! When a cipher is configured, [`crate::entry_service::JournalEntryService`]
//! seals the `emotion` and `text` fields before persistence and opens them
//! again on read. The mood stays a typed column so the linking rule remains
//! checkable against stored entries.
//!
//! The trait is object-safe (the services hold `Arc<dyn FieldCipher>`), so
//! errors are boxed rather than an associated type.

use crate::error::BoxError;

/// Abstraction over an external field-encryption service.
pub trait FieldCipher: Send + Sync {
  /// Encrypt one field value for storage.
  fn seal(&self, plaintext: &str) -> Result<String, BoxError>;

  /// Decrypt one stored field value.
  fn open(&self, sealed: &str) -> Result<String, BoxError>;
}

/// Pass-through cipher: fields are stored as given.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCipher;

impl FieldCipher for NoopCipher {
  fn seal(&self, plaintext: &str) -> Result<String, BoxError> {
    Ok(plaintext.to_owned())
  }

  fn open(&self, sealed: &str) -> Result<String, BoxError> {
    Ok(sealed.to_owned())
  }
}
