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

use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use serde::Deserialize;

use crate::cmd::serve::state::ServerState;
use crate::cmd::serve::view::Completed;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::plan::Rejection;
use crate::types::chapter::ChapterId;
use crate::types::chapter::ChapterPatch;
use crate::types::chapter::Track;
use crate::types::date::Date;
use crate::types::status::Status;
use crate::types::topic::TopicId;

#[derive(Debug, PartialEq, Deserialize)]
enum Action {
    AddTopic,
    DeleteTopic,
    AddChapter,
    DeleteChapter,
    LectureUp,
    LectureDown,
    DppUp,
    DppDown,
    SetStatus,
    SetDeadline,
    SetHours,
}

#[derive(Deserialize)]
pub struct FormData {
    action: Action,
    topic_id: Option<TopicId>,
    chapter_id: Option<ChapterId>,
    name: Option<String>,
    status: Option<String>,
    deadline: Option<String>,
    hours: Option<String>,
}

impl FormData {
    fn topic_id(&self) -> Fallible<TopicId> {
        self.topic_id
            .ok_or_else(|| ErrorReport::new("missing topic_id"))
    }

    fn ids(&self) -> Fallible<(TopicId, ChapterId)> {
        let chapter_id = self
            .chapter_id
            .ok_or_else(|| ErrorReport::new("missing chapter_id"))?;
        Ok((self.topic_id()?, chapter_id))
    }

    /// The chapter patch for the field-setting actions.
    fn patch(&self) -> Fallible<ChapterPatch> {
        let patch = match self.action {
            Action::SetStatus => {
                let status = required(&self.status, "status")?;
                ChapterPatch {
                    status: Some(Status::try_from(status.to_string())?),
                    ..Default::default()
                }
            }
            Action::SetDeadline => {
                let deadline: Date = required(&self.deadline, "deadline")?.parse()?;
                ChapterPatch {
                    deadline: Some(deadline),
                    ..Default::default()
                }
            }
            Action::SetHours => {
                let hours = required(&self.hours, "hours")?;
                let hours: u32 = hours
                    .trim()
                    .parse()
                    .map_err(|_| ErrorReport::new(&format!("invalid hours: {hours}")))?;
                ChapterPatch {
                    estimated_hours: Some(hours),
                    ..Default::default()
                }
            }
            _ => ChapterPatch::default(),
        };
        Ok(patch)
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Fallible<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| ErrorReport::new(&format!("missing {name}")))
}

pub async fn post_handler(
    State(state): State<ServerState>,
    Form(form): Form<FormData>,
) -> Redirect {
    let today = Date::today();
    match action_handler(&state, form, today) {
        Ok(location) => Redirect::to(&location),
        Err(e) => {
            log::error!("{e}");
            Redirect::to("/")
        }
    }
}

/// Apply the action to the current snapshot and return where to send the
/// browser next.
fn action_handler(state: &ServerState, form: FormData, today: Date) -> Fallible<String> {
    log::debug!("{:?}", form.action);
    let name = form.name.as_deref().unwrap_or("");
    let (result, location) = match form.action {
        Action::AddTopic => {
            let result = state.apply(|plan| plan.try_add_topic(name));
            (result, "/".to_string())
        }
        Action::DeleteTopic => {
            let topic_id = form.topic_id()?;
            let result = state.apply(|plan| plan.try_delete_topic(topic_id));
            (result, "/".to_string())
        }
        Action::AddChapter => {
            let topic_id = form.topic_id()?;
            let result = state.apply(|plan| plan.try_add_chapter(topic_id, name, today));
            (result, format!("/#topic-{topic_id}"))
        }
        Action::DeleteChapter => {
            let (topic_id, chapter_id) = form.ids()?;
            let result = state.apply(|plan| plan.try_delete_chapter(topic_id, chapter_id));
            (result, format!("/#topic-{topic_id}"))
        }
        Action::LectureUp => bump_chapter(state, form.ids()?, Track::Lectures, 1, today),
        Action::LectureDown => bump_chapter(state, form.ids()?, Track::Lectures, -1, today),
        Action::DppUp => bump_chapter(state, form.ids()?, Track::Dpps, 1, today),
        Action::DppDown => bump_chapter(state, form.ids()?, Track::Dpps, -1, today),
        Action::SetStatus | Action::SetDeadline | Action::SetHours => {
            let (topic_id, chapter_id) = form.ids()?;
            let patch = form.patch()?;
            let result = state.apply(|plan| plan.try_update_chapter(topic_id, chapter_id, &patch));
            (result, format!("/#chapter-{chapter_id}"))
        }
    };
    if let Err(rejection) = result {
        log::warn!("{:?} ignored: {rejection}", form.action);
    }
    Ok(location)
}

/// Move a counter. The bump is computed from the chapter as it is in the
/// snapshot being replaced, under the same lock.
fn bump_chapter(
    state: &ServerState,
    (topic_id, chapter_id): (TopicId, ChapterId),
    track: Track,
    delta: i64,
    today: Date,
) -> (Result<(), Rejection>, String) {
    let mut completed = None;
    let result = state.apply(|plan| {
        let chapter = match plan.chapter(topic_id, chapter_id) {
            Some(chapter) => chapter,
            None if plan.topic(topic_id).is_none() => {
                return Err(Rejection::TopicNotFound(topic_id));
            }
            None => return Err(Rejection::ChapterNotFound(topic_id, chapter_id)),
        };
        let bump = chapter.bump(track, delta, today);
        if bump.just_completed {
            completed = Some(Completed { chapter_id, track });
        }
        plan.try_update_chapter(topic_id, chapter_id, &bump.patch)
    });
    let location = match completed {
        Some(c) => format!("/?done={}#chapter-{chapter_id}", c.to_param()),
        None => format!("/#chapter-{chapter_id}"),
    };
    (result, location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Snapshot;

    fn today() -> Date {
        "2024-08-15".parse().unwrap()
    }

    fn form(action: Action) -> FormData {
        FormData {
            action,
            topic_id: None,
            chapter_id: None,
            name: None,
            status: None,
            deadline: None,
            hours: None,
        }
    }

    fn state() -> (ServerState, TopicId, ChapterId) {
        let plan = Snapshot::empty().add_topic("Physics");
        let topic_id = plan.topics()[0].id();
        let plan = plan.add_chapter(topic_id, "Optics", today());
        let chapter_id = plan.topics()[0].chapters()[0].id();
        (ServerState::new(plan), topic_id, chapter_id)
    }

    fn chapter_form(action: Action, topic_id: TopicId, chapter_id: ChapterId) -> FormData {
        FormData {
            topic_id: Some(topic_id),
            chapter_id: Some(chapter_id),
            ..form(action)
        }
    }

    #[test]
    fn test_add_topic() -> Fallible<()> {
        let (state, _, _) = state();
        let location = action_handler(
            &state,
            FormData {
                name: Some("chemistry".to_string()),
                ..form(Action::AddTopic)
            },
            today(),
        )?;
        assert_eq!(location, "/");
        assert_eq!(state.snapshot().topics()[1].name(), "CHEMISTRY");
        Ok(())
    }

    #[test]
    fn test_blank_topic_is_ignored() -> Fallible<()> {
        let (state, _, _) = state();
        let before = state.snapshot();
        action_handler(
            &state,
            FormData {
                name: Some("   ".to_string()),
                ..form(Action::AddTopic)
            },
            today(),
        )?;
        assert_eq!(state.snapshot(), before);
        Ok(())
    }

    #[test]
    fn test_missing_ids_are_errors() {
        let (state, _, _) = state();
        assert!(action_handler(&state, form(Action::DeleteTopic), today()).is_err());
        assert!(action_handler(&state, form(Action::LectureUp), today()).is_err());
    }

    #[test]
    fn test_lecture_up_starts_chapter() -> Fallible<()> {
        let (state, topic_id, chapter_id) = state();
        let location = action_handler(
            &state,
            chapter_form(Action::LectureUp, topic_id, chapter_id),
            today(),
        )?;
        assert_eq!(location, format!("/#chapter-{chapter_id}"));
        let plan = state.snapshot();
        let chapter = plan.chapter(topic_id, chapter_id).unwrap();
        assert_eq!(chapter.current_lecture(), 1);
        assert_eq!(chapter.start_date(), Some(today()));
        Ok(())
    }

    #[test]
    fn test_completing_a_track_sets_done() -> Fallible<()> {
        let (state, topic_id, chapter_id) = state();
        let mut location = String::new();
        for _ in 0..5 {
            location = action_handler(
                &state,
                chapter_form(Action::DppUp, topic_id, chapter_id),
                today(),
            )?;
        }
        assert_eq!(
            location,
            format!("/?done={chapter_id}-dpps#chapter-{chapter_id}")
        );
        // Bumping past the maximum stays at the maximum.
        action_handler(
            &state,
            chapter_form(Action::DppUp, topic_id, chapter_id),
            today(),
        )?;
        let plan = state.snapshot();
        assert_eq!(plan.chapter(topic_id, chapter_id).unwrap().current_dpps(), 5);
        Ok(())
    }

    #[test]
    fn test_set_fields() -> Fallible<()> {
        let (state, topic_id, chapter_id) = state();
        action_handler(
            &state,
            FormData {
                status: Some("completed".to_string()),
                ..chapter_form(Action::SetStatus, topic_id, chapter_id)
            },
            today(),
        )?;
        action_handler(
            &state,
            FormData {
                deadline: Some("2024-12-01".to_string()),
                ..chapter_form(Action::SetDeadline, topic_id, chapter_id)
            },
            today(),
        )?;
        action_handler(
            &state,
            FormData {
                hours: Some(" 42 ".to_string()),
                ..chapter_form(Action::SetHours, topic_id, chapter_id)
            },
            today(),
        )?;
        let plan = state.snapshot();
        let chapter = plan.chapter(topic_id, chapter_id).unwrap();
        assert_eq!(chapter.status(), Status::Completed);
        assert_eq!(chapter.deadline(), "2024-12-01".parse()?);
        assert_eq!(chapter.estimated_hours(), 42);
        Ok(())
    }

    #[test]
    fn test_invalid_field_values() -> Fallible<()> {
        let (state, topic_id, chapter_id) = state();
        let before = state.snapshot();
        let bad_status = FormData {
            status: Some("paused".to_string()),
            ..chapter_form(Action::SetStatus, topic_id, chapter_id)
        };
        assert!(action_handler(&state, bad_status, today()).is_err());
        let bad_hours = FormData {
            hours: Some("many".to_string()),
            ..chapter_form(Action::SetHours, topic_id, chapter_id)
        };
        assert!(action_handler(&state, bad_hours, today()).is_err());
        // Zero hours parses, but the update is rejected.
        let zero_hours = FormData {
            hours: Some("0".to_string()),
            ..chapter_form(Action::SetHours, topic_id, chapter_id)
        };
        action_handler(&state, zero_hours, today())?;
        assert_eq!(state.snapshot(), before);
        Ok(())
    }

    #[test]
    fn test_delete_chapter_then_topic() -> Fallible<()> {
        let (state, topic_id, chapter_id) = state();
        action_handler(
            &state,
            chapter_form(Action::DeleteChapter, topic_id, chapter_id),
            today(),
        )?;
        assert!(state.snapshot().topics()[0].chapters().is_empty());
        action_handler(
            &state,
            FormData {
                topic_id: Some(topic_id),
                ..form(Action::DeleteTopic)
            },
            today(),
        )?;
        assert!(state.snapshot().topics().is_empty());
        Ok(())
    }
}
