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

use maud::Markup;
use maud::html;

use crate::types::chapter::Chapter;
use crate::types::chapter::ChapterId;
use crate::types::chapter::Track;
use crate::types::date::Date;
use crate::types::status::Status;
use crate::types::topic::Topic;
use crate::types::topic::TopicId;

/// A counter that just reached its maximum. Shown once, then animated away.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Completed {
    pub chapter_id: ChapterId,
    pub track: Track,
}

impl Completed {
    /// Parse the `done` query parameter, e.g. `42-lectures`.
    pub fn parse(value: &str) -> Option<Self> {
        let (id, track) = value.split_once('-')?;
        let chapter_id = ChapterId(id.parse().ok()?);
        let track = match track {
            "lectures" => Track::Lectures,
            "dpps" => Track::Dpps,
            _ => return None,
        };
        Some(Self { chapter_id, track })
    }

    pub fn to_param(self) -> String {
        format!("{}-{}", self.chapter_id, self.track.as_str())
    }
}

pub fn add_topic_form() -> Markup {
    html! {
        form.add-topic action="/" method="post" {
            input type="hidden" name="action" value="AddTopic";
            input type="text" name="name" placeholder="Enter a new topic name..." aria-label="New topic name";
            button type="submit" { "Add Topic" }
        }
    }
}

pub fn render_topic(topic: &Topic, today: Date, completed: Option<Completed>) -> Markup {
    let ongoing = topic.ongoing_count();
    html! {
        details.topic id=(format!("topic-{}", topic.id())) open {
            summary.topic-header {
                h2 { (topic.name()) }
                @if ongoing > 0 {
                    span.badge { (ongoing) " Ongoing" }
                }
                form.delete-topic action="/" method="post"
                    data-confirm="Are you sure you want to delete this topic and all its chapters?" {
                    input type="hidden" name="action" value="DeleteTopic";
                    input type="hidden" name="topic_id" value=(topic.id().to_string());
                    button.delete type="submit" aria-label=(format!("Delete {} topic", topic.name())) { "Delete" }
                }
            }
            div.topic-body {
                @for chapter in topic.chapters() {
                    (render_chapter(topic.id(), chapter, today, completed))
                }
                @if topic.chapters().is_empty() {
                    p.empty { "No chapters yet. Add one to get started!" }
                }
                form.add-chapter action="/" method="post" {
                    input type="hidden" name="action" value="AddChapter";
                    input type="hidden" name="topic_id" value=(topic.id().to_string());
                    input type="text" name="name" placeholder="Add a new chapter..." aria-label="New chapter name";
                    button type="submit" { "Add" }
                }
            }
        }
    }
}

fn render_chapter(
    topic_id: TopicId,
    chapter: &Chapter,
    today: Date,
    completed: Option<Completed>,
) -> Markup {
    let days_left = chapter.days_left(today);
    let check = |track: Track| {
        completed == Some(Completed {
            chapter_id: chapter.id(),
            track,
        })
    };
    html! {
        div.chapter id=(format!("chapter-{}", chapter.id())) {
            div.chapter-header {
                h3 { (chapter.name()) }
                form.status action="/" method="post" {
                    (hidden_ids(topic_id, chapter.id()))
                    input type="hidden" name="action" value="SetStatus";
                    select class=(format!("status {}", chapter.status().as_str())) name="status" onchange="this.form.submit()" {
                        @for status in Status::ALL {
                            @if status == chapter.status() {
                                option value=(status.as_str()) selected { (status.label()) }
                            } @else {
                                option value=(status.as_str()) { (status.label()) }
                            }
                        }
                    }
                    noscript { button type="submit" { "Set" } }
                }
                form.delete-chapter action="/" method="post"
                    data-confirm="Are you sure you want to delete this chapter?" {
                    (hidden_ids(topic_id, chapter.id()))
                    input type="hidden" name="action" value="DeleteChapter";
                    button.delete type="submit" aria-label="Delete chapter" { "Delete" }
                }
            }
            div.details {
                form.deadline action="/" method="post" {
                    (hidden_ids(topic_id, chapter.id()))
                    input type="hidden" name="action" value="SetDeadline";
                    span class=(format!("days-left {}", days_left.urgency.as_str())) { (days_left.label) }
                    input type="date" name="deadline" value=(chapter.deadline().to_string()) onchange="this.form.submit()" aria-label="Deadline";
                }
                form.hours action="/" method="post" {
                    (hidden_ids(topic_id, chapter.id()))
                    input type="hidden" name="action" value="SetHours";
                    input type="number" name="hours" min="1" value=(chapter.estimated_hours()) onchange="this.form.submit()" aria-label="Estimated hours";
                    span { " hrs" }
                }
                @if let Some(start_date) = chapter.start_date() {
                    span.started { "Started: " (start_date.short()) }
                }
            }
            div.progress {
                (render_track(topic_id, chapter, Track::Lectures, check(Track::Lectures)))
                @if chapter.has_dpp_track() {
                    (render_track(topic_id, chapter, Track::Dpps, check(Track::Dpps)))
                }
            }
        }
    }
}

fn render_track(
    topic_id: TopicId,
    chapter: &Chapter,
    track: Track,
    just_completed: bool,
) -> Markup {
    let (current, max) = chapter.counter(track);
    let (title, percent, down, up) = match track {
        Track::Lectures => (
            "Lecture Progress",
            chapter.lecture_percent(),
            "LectureDown",
            "LectureUp",
        ),
        Track::Dpps => ("DPP Progress", chapter.dpp_percent(), "DppDown", "DppUp"),
    };
    let fill_class = if percent > 0.0 && percent < 100.0 {
        "fill pulse"
    } else {
        "fill"
    };
    html! {
        div class=(format!("track {}", track.as_str())) {
            form.counter action="/" method="post" {
                (hidden_ids(topic_id, chapter.id()))
                span.track-title { (title) }
                @if current == 0 {
                    button type="submit" name="action" value=(down) disabled { "-" }
                } @else {
                    button type="submit" name="action" value=(down) { "-" }
                }
                span.count { (current) " / " (max) }
                @if current == max {
                    button type="submit" name="action" value=(up) disabled { "+" }
                } @else {
                    button type="submit" name="action" value=(up) { "+" }
                }
            }
            div.bar {
                div class=(fill_class) style=(format!("width: {percent:.1}%;")) {}
                @if just_completed {
                    span.check { "✓" }
                }
            }
        }
    }
}

fn hidden_ids(topic_id: TopicId, chapter_id: ChapterId) -> Markup {
    html! {
        input type="hidden" name="topic_id" value=(topic_id.to_string());
        input type="hidden" name="chapter_id" value=(chapter_id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Snapshot;
    use crate::types::chapter::ChapterPatch;

    fn today() -> Date {
        "2024-08-15".parse().unwrap()
    }

    fn plan() -> Snapshot {
        let plan = Snapshot::empty().add_topic("Physics");
        let physics = plan.topics()[0].id();
        plan.add_chapter(physics, "Optics", today())
    }

    #[test]
    fn test_completed_param() {
        let c = Completed {
            chapter_id: ChapterId(42),
            track: Track::Dpps,
        };
        assert_eq!(c.to_param(), "42-dpps");
        assert_eq!(Completed::parse("42-dpps"), Some(c));
        assert_eq!(Completed::parse("42"), None);
        assert_eq!(Completed::parse("x-lectures"), None);
        assert_eq!(Completed::parse("42-videos"), None);
    }

    #[test]
    fn test_render_empty_topic() {
        let topic = Topic::new(TopicId(1), "Biology");
        let html = render_topic(&topic, today(), None).into_string();
        assert!(html.contains("BIOLOGY"));
        assert!(html.contains("No chapters yet. Add one to get started!"));
        assert!(!html.contains("Ongoing"));
    }

    #[test]
    fn test_render_chapter() {
        let plan = plan();
        let html = render_topic(&plan.topics()[0], today(), None).into_string();
        assert!(html.contains("Optics"));
        assert!(html.contains("30 days left"));
        assert!(html.contains("0 / 10"));
        assert!(html.contains("0 / 5"));
        assert!(html.contains("DPP Progress"));
        assert!(!html.contains("Started:"));
        assert!(!html.contains("pulse"));
        assert!(!html.contains("✓"));
    }

    #[test]
    fn test_render_hides_empty_dpp_track() {
        let plan = plan();
        let physics = plan.topics()[0].id();
        let optics = plan.topics()[0].chapters()[0].id();
        let patch = ChapterPatch {
            dpps: Some(0),
            status: Some(Status::OnGoing),
            current_lecture: Some(3),
            start_date: Some("2024-10-05".parse().unwrap()),
            ..Default::default()
        };
        let plan = plan.update_chapter(physics, optics, &patch);
        let html = render_topic(&plan.topics()[0], today(), None).into_string();
        assert!(!html.contains("DPP Progress"));
        assert!(html.contains("1 Ongoing"));
        assert!(html.contains("Started: Oct 5"));
        assert!(html.contains("fill pulse"));
        assert!(html.contains("width: 30.0%;"));
    }

    #[test]
    fn test_render_completion_check() {
        let plan = plan();
        let optics = plan.topics()[0].chapters()[0].id();
        let completed = Completed {
            chapter_id: optics,
            track: Track::Lectures,
        };
        let html = render_topic(&plan.topics()[0], today(), Some(completed)).into_string();
        assert!(html.contains("✓"));
    }
}
