//! The protected workspace: text and file encryption for a signed-in user.
//!
//! Constructed only after the session guard grants access, so every operation
//! can assume a live server session on the shared `ApiClient` cookie jar.

use thiserror::Error;

use crate::api::{ApiClient, ApiError};

/// Errors from workspace operations.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// The input was empty or otherwise unusable; no network call was made
    #[error("{0}")]
    Input(String),

    /// The backend rejected or failed the operation
    #[error("{0}")]
    Api(#[from] ApiError),
}

impl WorkspaceError {
    /// The message to surface to the user.
    pub fn message(&self) -> String {
        match self {
            Self::Input(msg) => msg.clone(),
            Self::Api(err) => err.message(),
        }
    }
}

/// Output of a file operation: the suggested download name and the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResult {
    pub file_name: String,
    pub contents: Vec<u8>,
}

/// Workspace operations bound to the signed-in user's email.
#[derive(Debug, Clone)]
pub struct Workspace {
    api: ApiClient,
    email: String,
}

impl Workspace {
    pub fn new(api: ApiClient, email: String) -> Self {
        Self { api, email }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Fetches the signed-in user's display name for the greeting.
    pub async fn full_name(&self) -> Result<String, WorkspaceError> {
        Ok(self.api.get_user_full_name(&self.email).await?)
    }

    /// Encrypts a piece of text under the user's key.
    pub async fn encrypt_text(&self, text: &str) -> Result<String, WorkspaceError> {
        if text.is_empty() {
            return Err(WorkspaceError::Input(
                "Please enter text to encrypt".to_string(),
            ));
        }
        Ok(self.api.encrypt_text(&self.email, text).await?)
    }

    /// Decrypts a ciphertext previously produced by `encrypt_text`.
    pub async fn decrypt_text(&self, encrypted_text: &str) -> Result<String, WorkspaceError> {
        if encrypted_text.is_empty() {
            return Err(WorkspaceError::Input(
                "Please enter text to decrypt".to_string(),
            ));
        }
        Ok(self.api.decrypt_text(encrypted_text).await?)
    }

    /// Encrypts a file; the result carries an `encrypted_` download name.
    pub async fn encrypt_file(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<FileResult, WorkspaceError> {
        if file_name.is_empty() {
            return Err(WorkspaceError::Input(
                "Please choose a file to encrypt".to_string(),
            ));
        }
        let encrypted = self
            .api
            .encrypt_file(&self.email, file_name, contents)
            .await?;
        tracing::debug!("Encrypted file {} ({} bytes)", file_name, encrypted.len());
        Ok(FileResult {
            file_name: format!("encrypted_{file_name}"),
            contents: encrypted,
        })
    }

    /// Decrypts a file; the result carries a `decrypted_` download name.
    pub async fn decrypt_file(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<FileResult, WorkspaceError> {
        if file_name.is_empty() {
            return Err(WorkspaceError::Input(
                "Please choose a file to decrypt".to_string(),
            ));
        }
        let decrypted = self.api.decrypt_file(file_name, contents).await?;
        tracing::debug!("Decrypted file {} ({} bytes)", file_name, decrypted.len());
        Ok(FileResult {
            file_name: format!("decrypted_{file_name}"),
            contents: decrypted,
        })
    }
}
