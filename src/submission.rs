/*
submission.rs

Copyright 2025 Hervé Quatremain

This file is part of BBEditor.

BBEditor is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

BBEditor is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
BBEditor. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Submit the designed level so that it can be published in the game.
//!
//! The level is sent as a JSON object with the author name, an optional email, and the two
//! exported grids:
//!
//! ```json
//! {"name": "Alice", "email": null, "color": "rrg ybk", "modifier": "0F0 BUl"}
//! ```
//!
//! The service answers with a JSON object. A success status with a non-empty `message` field
//! means that the level was accepted. The level is deleted only after it is accepted.

use log::{debug, warn};
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Serialize;
use thiserror::Error;

use crate::codec::{CanonicalLevel, to_canonical};
use crate::config::{SUBMIT_CONNECT_TIMEOUT_SEC, SUBMIT_TIMEOUT_SEC};
use crate::errors::GridError;
use crate::grid_store::GridStore;
use crate::saver::level::SaverLevel;
use crate::saver::store::KeyValueStore;

/// Errors raised when submitting a level.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The form is incomplete. Each entry is a message for the user.
    #[error("{}", .0.join(" "))]
    Invalid(Vec<String>),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered, but did not accept the level.
    #[error("Submission failed. Server response: {0}")]
    Rejected(String),
}

/// Details that the author provides with the level.
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    /// Name displayed with the level in the game.
    pub name: String,

    /// Optional contact address.
    pub email: String,

    /// Whether the author agrees to publish the level.
    pub agreed: bool,
}

impl SubmissionForm {
    /// Verify that the name is provided and that the author agreed to publish the level.
    ///
    /// # Errors
    ///
    /// All the problems are reported together in [`SubmitError::Invalid`].
    pub fn validate(&self) -> Result<(), SubmitError> {
        let mut problems: Vec<String> = Vec::new();
        if self.name.trim().is_empty() {
            problems.push("Please enter your name.".to_string());
        }
        if !self.agreed {
            problems.push("Please accept the conditions.".to_string());
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(SubmitError::Invalid(problems))
        }
    }
}

/// Body of the submission request.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub name: String,
    pub email: Option<String>,
    pub color: String,
    pub modifier: String,
}

impl Payload {
    /// Create a [`Payload`] object from a validated form.
    pub fn new(form: &SubmissionForm, canonical: &CanonicalLevel) -> Result<Self, SubmitError> {
        form.validate()?;
        let email: &str = form.email.trim();
        Ok(Self {
            name: form.name.trim().to_string(),
            email: (!email.is_empty()).then(|| email.to_string()),
            color: normalize_whitespace(&canonical.color_grid),
            modifier: normalize_whitespace(&canonical.modifier_grid),
        })
    }
}

/// Collapse whitespace runs into single spaces and trim the ends.
fn normalize_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Deliver a [`Payload`] to the service.
pub trait Submitter {
    /// Send the payload and return the message of the service.
    fn submit(&self, payload: &Payload) -> Result<String, SubmitError>;
}

/// Send the levels with an HTTP POST request.
pub struct HttpSubmitter {
    client: Client,
    url: String,
}

impl HttpSubmitter {
    /// Create a [`HttpSubmitter`] object for the service at the given URL.
    pub fn new(url: &str) -> Result<Self, SubmitError> {
        let client: Client = Client::builder()
            .connect_timeout(Duration::from_secs(SUBMIT_CONNECT_TIMEOUT_SEC))
            .timeout(Duration::from_secs(SUBMIT_TIMEOUT_SEC))
            .build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

impl Submitter for HttpSubmitter {
    fn submit(&self, payload: &Payload) -> Result<String, SubmitError> {
        debug!("Submitting the level to {}", self.url);
        let response = self.client.post(&self.url).json(payload).send()?;
        let status: StatusCode = response.status();
        let body: String = response.text()?;
        debug!("Response {status}: {body}");
        if !status.is_success() {
            return Err(SubmitError::Rejected(format!("{status} {body}")));
        }
        interpret_response(&body)
    }
}

/// Return the message of a successful response, or an error if the response does not have one.
pub fn interpret_response(body: &str) -> Result<String, SubmitError> {
    let message: Option<String> = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("message")?.as_str().map(str::to_string))
        .filter(|m| !m.is_empty());
    message.ok_or_else(|| SubmitError::Rejected(body.to_string()))
}

/// Submit the level of the [`GridStore`] object.
///
/// When the service accepts the level, the level is deleted from the store and from the save
/// file. Otherwise nothing changes, so that the author can try again.
pub fn submit_level<S: KeyValueStore>(
    grid_store: &mut GridStore,
    saver: &SaverLevel<S>,
    form: &SubmissionForm,
    submitter: &dyn Submitter,
) -> Result<String, SubmitError> {
    let level = grid_store.level().ok_or(GridError::NoLevel)?;
    let payload: Payload = Payload::new(form, &to_canonical(level))?;

    match submitter.submit(&payload) {
        Ok(message) => {
            grid_store.reset();
            saver.delete_save();
            Ok(message)
        }
        Err(error) => {
            warn!("Level not submitted: {error}");
            Err(error)
        }
    }
}
