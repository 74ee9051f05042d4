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

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::metrics::DaysLeft;
use crate::metrics::bump_counter;
use crate::metrics::days_left;
use crate::metrics::progress_percent;
use crate::types::date::Date;
use crate::types::status::Status;

pub const DEFAULT_TOTAL_LECTURES: u32 = 10;
pub const DEFAULT_DPPS: u32 = 5;
pub const DEFAULT_ESTIMATED_HOURS: u32 = 15;
pub const DEFAULT_DEADLINE_DAYS: i64 = 30;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChapterId(pub u64);

impl Display for ChapterId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the two progress counters a chapter carries.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    Lectures,
    Dpps,
}

impl Track {
    pub fn as_str(&self) -> &'static str {
        match self {
            Track::Lectures => "lectures",
            Track::Dpps => "dpps",
        }
    }
}

/// A unit of study.
///
/// Invariants: `current_lecture <= total_lectures`,
/// `current_dpps <= dpps`, and `estimated_hours > 0`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    id: ChapterId,
    name: String,
    total_lectures: u32,
    current_lecture: u32,
    dpps: u32,
    current_dpps: u32,
    estimated_hours: u32,
    deadline: Date,
    status: Status,
    start_date: Option<Date>,
}

/// A partial update to a chapter. `None` leaves the field untouched.
///
/// There is no way to clear a start date through a patch.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct ChapterPatch {
    pub total_lectures: Option<u32>,
    pub current_lecture: Option<u32>,
    pub dpps: Option<u32>,
    pub current_dpps: Option<u32>,
    pub estimated_hours: Option<u32>,
    pub deadline: Option<Date>,
    pub status: Option<Status>,
    pub start_date: Option<Date>,
}

/// The result of moving a counter: the patch to apply, and whether the
/// counter just reached its maximum.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Bump {
    pub patch: ChapterPatch,
    pub just_completed: bool,
}

impl Chapter {
    /// A fresh chapter with the default lecture/DPP/hour counts and a
    /// deadline thirty days out.
    pub fn new(id: ChapterId, name: &str, today: Date) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            total_lectures: DEFAULT_TOTAL_LECTURES,
            current_lecture: 0,
            dpps: DEFAULT_DPPS,
            current_dpps: 0,
            estimated_hours: DEFAULT_ESTIMATED_HOURS,
            deadline: today.add_days(DEFAULT_DEADLINE_DAYS),
            status: Status::Next,
            start_date: None,
        }
    }

    pub fn id(&self) -> ChapterId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_lectures(&self) -> u32 {
        self.total_lectures
    }

    pub fn current_lecture(&self) -> u32 {
        self.current_lecture
    }

    pub fn dpps(&self) -> u32 {
        self.dpps
    }

    pub fn current_dpps(&self) -> u32 {
        self.current_dpps
    }

    pub fn estimated_hours(&self) -> u32 {
        self.estimated_hours
    }

    pub fn deadline(&self) -> Date {
        self.deadline
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn start_date(&self) -> Option<Date> {
        self.start_date
    }

    /// Chapters without practice problems have no DPP track.
    pub fn has_dpp_track(&self) -> bool {
        self.dpps > 0
    }

    pub fn lecture_percent(&self) -> f64 {
        progress_percent(self.current_lecture, self.total_lectures)
    }

    pub fn dpp_percent(&self) -> f64 {
        progress_percent(self.current_dpps, self.dpps)
    }

    pub fn days_left(&self, today: Date) -> DaysLeft {
        days_left(self.deadline, today)
    }

    /// Current and maximum value of a track.
    pub fn counter(&self, track: Track) -> (u32, u32) {
        match track {
            Track::Lectures => (self.current_lecture, self.total_lectures),
            Track::Dpps => (self.current_dpps, self.dpps),
        }
    }

    /// Move the lecture counter by `delta`. The first time the counter
    /// becomes positive the chapter is stamped as started `today`.
    pub fn bump_lectures(&self, delta: i64, today: Date) -> Bump {
        let current = bump_counter(self.current_lecture, delta, self.total_lectures);
        let start_date = if current > 0 && self.start_date.is_none() {
            Some(today)
        } else {
            None
        };
        Bump {
            patch: ChapterPatch {
                current_lecture: Some(current),
                start_date,
                ..Default::default()
            },
            just_completed: self.total_lectures > 0 && current == self.total_lectures,
        }
    }

    /// Move the DPP counter by `delta`.
    pub fn bump_dpps(&self, delta: i64) -> Bump {
        let current = bump_counter(self.current_dpps, delta, self.dpps);
        Bump {
            patch: ChapterPatch {
                current_dpps: Some(current),
                ..Default::default()
            },
            just_completed: self.dpps > 0 && current == self.dpps,
        }
    }

    pub fn bump(&self, track: Track, delta: i64, today: Date) -> Bump {
        match track {
            Track::Lectures => self.bump_lectures(delta, today),
            Track::Dpps => self.bump_dpps(delta),
        }
    }

    /// Merge a patch into a copy of this chapter. Returns `None` if the
    /// merged chapter would break an invariant.
    pub fn patched(&self, patch: &ChapterPatch) -> Option<Chapter> {
        let chapter = Chapter {
            id: self.id,
            name: self.name.clone(),
            total_lectures: patch.total_lectures.unwrap_or(self.total_lectures),
            current_lecture: patch.current_lecture.unwrap_or(self.current_lecture),
            dpps: patch.dpps.unwrap_or(self.dpps),
            current_dpps: patch.current_dpps.unwrap_or(self.current_dpps),
            estimated_hours: patch.estimated_hours.unwrap_or(self.estimated_hours),
            deadline: patch.deadline.unwrap_or(self.deadline),
            status: patch.status.unwrap_or(self.status),
            start_date: patch.start_date.or(self.start_date),
        };
        if chapter.is_valid() {
            Some(chapter)
        } else {
            None
        }
    }

    fn is_valid(&self) -> bool {
        self.current_lecture <= self.total_lectures
            && self.current_dpps <= self.dpps
            && self.estimated_hours > 0
    }
}
