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

//! Reading a plan seed from a TOML file. Plans are read once at startup
//! and never written back.

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::plan::Rejection;
use crate::plan::Snapshot;
use crate::types::chapter::ChapterPatch;
use crate::types::date::Date;
use crate::types::status::Status;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PlanFile {
    #[serde(default)]
    topics: Vec<TopicEntry>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TopicEntry {
    name: String,
    #[serde(default)]
    chapters: Vec<ChapterEntry>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ChapterEntry {
    name: String,
    deadline: Date,
    total_lectures: Option<u32>,
    current_lecture: Option<u32>,
    dpps: Option<u32>,
    current_dpps: Option<u32>,
    estimated_hours: Option<u32>,
    status: Option<Status>,
    start_date: Option<Date>,
}

impl ChapterEntry {
    /// A chapter seeded with lecture progress counts as started today when
    /// the file does not say otherwise.
    fn patch(&self, today: Date) -> ChapterPatch {
        let started = self.current_lecture.is_some_and(|n| n > 0);
        let start_date = match self.start_date {
            Some(date) => Some(date),
            None if started => Some(today),
            None => None,
        };
        ChapterPatch {
            total_lectures: self.total_lectures,
            current_lecture: self.current_lecture,
            dpps: self.dpps,
            current_dpps: self.current_dpps,
            estimated_hours: self.estimated_hours,
            deadline: Some(self.deadline),
            status: self.status,
            start_date,
        }
    }
}

pub fn load_plan(path: &Path, today: Date) -> Fallible<Snapshot> {
    if !path.exists() {
        return fail("plan file does not exist.");
    }
    log::debug!("Loading plan from {}", path.display());
    let content = read_to_string(path)?;
    let plan = parse_plan(&content, today)?;
    log::debug!(
        "Loaded {} topics and {} chapters.",
        plan.topics().len(),
        plan.chapter_count()
    );
    Ok(plan)
}

pub fn parse_plan(content: &str, today: Date) -> Fallible<Snapshot> {
    let file: PlanFile = toml::from_str(content)?;
    let mut snapshot = Snapshot::empty();
    for topic in file.topics {
        snapshot = snapshot
            .try_add_topic(&topic.name)
            .map_err(|_| ErrorReport::new("topic with a blank name."))?;
        let topic_id = match snapshot.topics().last() {
            Some(t) => t.id(),
            None => return fail("topic was not added."),
        };
        for chapter in topic.chapters {
            snapshot = snapshot
                .try_push_chapter(topic_id, &chapter.name, today, &chapter.patch(today))
                .map_err(|e| match e {
                    Rejection::EmptyName => ErrorReport::new(&format!(
                        "chapter with a blank name in topic {:?}.",
                        topic.name
                    )),
                    _ => ErrorReport::new(&format!(
                        "chapter {:?} has progress beyond its totals or zero estimated hours.",
                        chapter.name
                    )),
                })?;
        }
    }
    Ok(snapshot)
}
