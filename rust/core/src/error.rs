// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for payload handling
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading a massing payload
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed massing payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Massing payload has no scenarios")]
    NoScenarios,
}
