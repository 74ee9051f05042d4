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

use clap::ValueEnum;
use serde::Serialize;

use crate::error::Fallible;
use crate::metrics::DaysLeft;
use crate::plan::Snapshot;
use crate::types::chapter::Chapter;
use crate::types::date::Date;
use crate::types::topic::Topic;

#[derive(ValueEnum, Clone)]
pub enum ShowFormat {
    /// Plain text output.
    Text,
    /// JSON output.
    Json,
}

impl Display for ShowFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ShowFormat::Text => write!(f, "text"),
            ShowFormat::Json => write!(f, "json"),
        }
    }
}

pub fn show_plan(plan: &Snapshot, today: Date, format: ShowFormat) -> Fallible<()> {
    match format {
        ShowFormat::Text => {
            print!("{}", render_text(plan, today));
        }
        ShowFormat::Json => {
            let report = PlanReport::new(plan, today);
            let json = serde_json::to_string_pretty(&report)?;
            println!("{}", json);
        }
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanReport<'a> {
    today: Date,
    topics: Vec<TopicReport<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TopicReport<'a> {
    #[serde(flatten)]
    topic: &'a Topic,
    ongoing_count: usize,
    progress: Vec<ChapterReport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChapterReport {
    lecture_percent: f64,
    dpp_percent: f64,
    days_left: DaysLeft,
}

impl<'a> PlanReport<'a> {
    fn new(plan: &'a Snapshot, today: Date) -> Self {
        let topics = plan
            .topics()
            .iter()
            .map(|topic| TopicReport {
                topic,
                ongoing_count: topic.ongoing_count(),
                progress: topic
                    .chapters()
                    .iter()
                    .map(|c| ChapterReport {
                        lecture_percent: c.lecture_percent(),
                        dpp_percent: c.dpp_percent(),
                        days_left: c.days_left(today),
                    })
                    .collect(),
            })
            .collect();
        Self { today, topics }
    }
}

fn render_text(plan: &Snapshot, today: Date) -> String {
    let mut out = String::new();
    if plan.topics().is_empty() {
        out.push_str("No topics.\n");
        return out;
    }
    for topic in plan.topics() {
        out.push_str(topic.name());
        let ongoing = topic.ongoing_count();
        if ongoing > 0 {
            out.push_str(&format!(" ({ongoing} ongoing)"));
        }
        out.push('\n');
        if topic.chapters().is_empty() {
            out.push_str("  No chapters yet.\n");
        }
        for chapter in topic.chapters() {
            out.push_str(&render_chapter(chapter, today));
        }
    }
    out
}

fn render_chapter(chapter: &Chapter, today: Date) -> String {
    let mut line = format!(
        "  {} [{}]\n    lectures {}/{} ({:.0}%)",
        chapter.name(),
        chapter.status().label(),
        chapter.current_lecture(),
        chapter.total_lectures(),
        chapter.lecture_percent()
    );
    if chapter.has_dpp_track() {
        line.push_str(&format!(
            ", dpps {}/{} ({:.0}%)",
            chapter.current_dpps(),
            chapter.dpps(),
            chapter.dpp_percent()
        ));
    }
    line.push_str(&format!(
        ", {} hrs, due {} ({})",
        chapter.estimated_hours(),
        chapter.deadline(),
        chapter.days_left(today).label
    ));
    if let Some(start_date) = chapter.start_date() {
        line.push_str(&format!(", started {}", start_date.short()));
    }
    line.push('\n');
    line
}
