// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::fail;

/// A chapter's status label. Any status can be set from any other.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    OnGoing,
    Next,
    Later,
    Completed,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::OnGoing,
        Status::Next,
        Status::Later,
        Status::Completed,
    ];

    /// The display label.
    pub fn label(&self) -> &'static str {
        match self {
            Status::OnGoing => "On Going",
            Status::Next => "Next",
            Status::Later => "Later",
            Status::Completed => "Completed",
        }
    }

    /// The identifier used in forms, plan files and CSS classes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::OnGoing => "on-going",
            Status::Next => "next",
            Status::Later => "later",
            Status::Completed => "completed",
        }
    }
}

impl TryFrom<String> for Status {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "on-going" => Ok(Status::OnGoing),
            "next" => Ok(Status::Next),
            "later" => Ok(Status::Later),
            "completed" => Ok(Status::Completed),
            _ => fail(format!("Invalid status: {}", value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_form_value() {
        for status in Status::ALL {
            let parsed = Status::try_from(status.as_str().to_string()).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_invalid() {
        assert!(Status::try_from("On Going".to_string()).is_err());
        assert!(Status::try_from("".to_string()).is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(Status::OnGoing.label(), "On Going");
        assert_eq!(Status::Completed.label(), "Completed");
    }
}
