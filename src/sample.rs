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

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::plan::Snapshot;
use crate::types::chapter::ChapterPatch;
use crate::types::date::Date;
use crate::types::status::Status;

/// A chapter in the sample plan. Dates are offsets from today.
struct SampleChapter {
    name: &'static str,
    total_lectures: u32,
    current_lecture: u32,
    dpps: u32,
    current_dpps: u32,
    estimated_hours: u32,
    deadline: i64,
    status: Status,
    start_date: Option<i64>,
}

const fn ch(
    name: &'static str,
    lectures: (u32, u32),
    dpps: (u32, u32),
    estimated_hours: u32,
    deadline: i64,
    status: Status,
    start_date: Option<i64>,
) -> SampleChapter {
    SampleChapter {
        name,
        total_lectures: lectures.1,
        current_lecture: lectures.0,
        dpps: dpps.1,
        current_dpps: dpps.0,
        estimated_hours,
        deadline,
        status,
        start_date,
    }
}

const SAMPLE: &[(&str, &[SampleChapter])] = &[
    (
        "Mathematics",
        &[
            ch(
                "Calculus I: Limits & Derivatives",
                (5, 12),
                (1, 3),
                20,
                14,
                Status::OnGoing,
                Some(-3),
            ),
            ch("Linear Algebra: Vectors & Matrices", (0, 15), (0, 5), 25, 30, Status::Next, None),
            ch("Probability & Statistics", (0, 10), (0, 4), 18, 45, Status::Later, None),
            ch("Differential Equations", (14, 14), (5, 5), 22, -10, Status::Completed, Some(-25)),
        ],
    ),
    (
        "Physics",
        &[
            ch("Classical Mechanics", (9, 18), (2, 4), 30, 21, Status::OnGoing, Some(-10)),
            ch("Electromagnetism", (0, 20), (0, 6), 35, 50, Status::Next, None),
            ch("Thermodynamics", (0, 12), (0, 3), 20, 65, Status::Later, None),
        ],
    ),
    (
        "Physical Chemistry",
        &[
            ch("Chemical Kinetics", (1, 10), (0, 2), 15, 18, Status::OnGoing, Some(-1)),
            ch("Quantum Chemistry", (0, 16), (0, 5), 28, 40, Status::Later, None),
            ch("Spectroscopy", (0, 12), (0, 4), 22, 55, Status::Later, None),
        ],
    ),
];

/// The built-in demonstration plan, with dates relative to `today`.
pub fn sample_plan(today: Date) -> Fallible<Snapshot> {
    let mut snapshot = Snapshot::empty();
    for (topic_name, chapters) in SAMPLE {
        snapshot = snapshot
            .try_add_topic(topic_name)
            .map_err(|e| ErrorReport::new(&e.to_string()))?;
        let topic_id = match snapshot.topics().last() {
            Some(topic) => topic.id(),
            None => return Err(ErrorReport::new("sample topic was not added")),
        };
        for c in chapters.iter() {
            let patch = ChapterPatch {
                total_lectures: Some(c.total_lectures),
                current_lecture: Some(c.current_lecture),
                dpps: Some(c.dpps),
                current_dpps: Some(c.current_dpps),
                estimated_hours: Some(c.estimated_hours),
                deadline: Some(today.add_days(c.deadline)),
                status: Some(c.status),
                start_date: c.start_date.map(|offset| today.add_days(offset)),
            };
            snapshot = snapshot
                .try_push_chapter(topic_id, c.name, today, &patch)
                .map_err(|e| ErrorReport::new(&e.to_string()))?;
        }
    }
    Ok(snapshot)
}
