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

//! The application state: an ordered sequence of topics.
//!
//! Every mutation returns a new [`Snapshot`]. Topics and chapters that a
//! mutation does not touch are shared with the previous snapshot through
//! `Arc`, so producing the next snapshot only rebuilds the path from the
//! root to the changed entity.

use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::Arc;

use serde::Serialize;

use crate::types::chapter::Chapter;
use crate::types::chapter::ChapterId;
use crate::types::chapter::ChapterPatch;
use crate::types::date::Date;
use crate::types::topic::Topic;
use crate::types::topic::TopicId;

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    topics: Vec<Arc<Topic>>,
    /// Topics and chapters draw ids from this one counter, so an id is
    /// never handed out twice in the same process.
    #[serde(skip)]
    next_id: u64,
}

/// Why a mutation left the snapshot unchanged.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Rejection {
    EmptyName,
    TopicNotFound(TopicId),
    ChapterNotFound(TopicId, ChapterId),
    InvalidPatch(TopicId, ChapterId),
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::EmptyName => write!(f, "name is empty"),
            Rejection::TopicNotFound(t) => write!(f, "no topic with id {t}"),
            Rejection::ChapterNotFound(t, c) => {
                write!(f, "no chapter with id {c} in topic {t}")
            }
            Rejection::InvalidPatch(t, c) => {
                write!(f, "update would break the invariants of chapter {c} in topic {t}")
            }
        }
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl Snapshot {
    pub fn empty() -> Self {
        Self {
            topics: Vec::new(),
            next_id: 1,
        }
    }

    pub fn topics(&self) -> &[Arc<Topic>] {
        &self.topics
    }

    pub fn topic(&self, topic_id: TopicId) -> Option<&Arc<Topic>> {
        self.topics.iter().find(|t| t.id() == topic_id)
    }

    pub fn chapter(&self, topic_id: TopicId, chapter_id: ChapterId) -> Option<&Arc<Chapter>> {
        self.topic(topic_id).and_then(|t| t.chapter(chapter_id))
    }

    /// The id the next added topic or chapter will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn chapter_count(&self) -> usize {
        self.topics.iter().map(|t| t.chapters().len()).sum()
    }

    // Total operations: rejections leave the snapshot unchanged.

    pub fn add_topic(&self, name: &str) -> Snapshot {
        self.try_add_topic(name).unwrap_or_else(|_| self.clone())
    }

    pub fn delete_topic(&self, topic_id: TopicId) -> Snapshot {
        self.try_delete_topic(topic_id)
            .unwrap_or_else(|_| self.clone())
    }

    pub fn add_chapter(&self, topic_id: TopicId, name: &str, today: Date) -> Snapshot {
        self.try_add_chapter(topic_id, name, today)
            .unwrap_or_else(|_| self.clone())
    }

    pub fn delete_chapter(&self, topic_id: TopicId, chapter_id: ChapterId) -> Snapshot {
        self.try_delete_chapter(topic_id, chapter_id)
            .unwrap_or_else(|_| self.clone())
    }

    pub fn update_chapter(
        &self,
        topic_id: TopicId,
        chapter_id: ChapterId,
        patch: &ChapterPatch,
    ) -> Snapshot {
        self.try_update_chapter(topic_id, chapter_id, patch)
            .unwrap_or_else(|_| self.clone())
    }

    // Checked operations: same semantics, but report why nothing happened.

    pub fn try_add_topic(&self, name: &str) -> Result<Snapshot, Rejection> {
        if name.trim().is_empty() {
            return Err(Rejection::EmptyName);
        }
        let topic = Topic::new(TopicId(self.next_id), name);
        let mut topics = self.topics.clone();
        topics.push(Arc::new(topic));
        Ok(Snapshot {
            topics,
            next_id: self.next_id + 1,
        })
    }

    pub fn try_delete_topic(&self, topic_id: TopicId) -> Result<Snapshot, Rejection> {
        if self.topic(topic_id).is_none() {
            return Err(Rejection::TopicNotFound(topic_id));
        }
        let topics = self
            .topics
            .iter()
            .filter(|t| t.id() != topic_id)
            .cloned()
            .collect();
        Ok(Snapshot {
            topics,
            next_id: self.next_id,
        })
    }

    pub fn try_add_chapter(
        &self,
        topic_id: TopicId,
        name: &str,
        today: Date,
    ) -> Result<Snapshot, Rejection> {
        if name.trim().is_empty() {
            return Err(Rejection::EmptyName);
        }
        let topic = self
            .topic(topic_id)
            .ok_or(Rejection::TopicNotFound(topic_id))?;
        let chapter = Chapter::new(ChapterId(self.next_id), name, today);
        let topic = topic.with_chapter(chapter);
        Ok(Snapshot {
            topics: self.replace_topic(topic),
            next_id: self.next_id + 1,
        })
    }

    pub fn try_delete_chapter(
        &self,
        topic_id: TopicId,
        chapter_id: ChapterId,
    ) -> Result<Snapshot, Rejection> {
        let topic = self
            .topic(topic_id)
            .ok_or(Rejection::TopicNotFound(topic_id))?;
        if topic.chapter(chapter_id).is_none() {
            return Err(Rejection::ChapterNotFound(topic_id, chapter_id));
        }
        let topic = topic.without_chapter(chapter_id);
        Ok(Snapshot {
            topics: self.replace_topic(topic),
            next_id: self.next_id,
        })
    }

    pub fn try_update_chapter(
        &self,
        topic_id: TopicId,
        chapter_id: ChapterId,
        patch: &ChapterPatch,
    ) -> Result<Snapshot, Rejection> {
        let topic = self
            .topic(topic_id)
            .ok_or(Rejection::TopicNotFound(topic_id))?;
        let chapter = topic
            .chapter(chapter_id)
            .ok_or(Rejection::ChapterNotFound(topic_id, chapter_id))?;
        let chapter = chapter
            .patched(patch)
            .ok_or(Rejection::InvalidPatch(topic_id, chapter_id))?;
        let topic = topic.with_replaced(chapter);
        Ok(Snapshot {
            topics: self.replace_topic(topic),
            next_id: self.next_id,
        })
    }

    /// Insert a fully-formed chapter, keeping its fields. Used when seeding a
    /// snapshot from a plan.
    pub(crate) fn try_push_chapter(
        &self,
        topic_id: TopicId,
        name: &str,
        today: Date,
        patch: &ChapterPatch,
    ) -> Result<Snapshot, Rejection> {
        let added = self.try_add_chapter(topic_id, name, today)?;
        let chapter_id = ChapterId(self.next_id);
        added.try_update_chapter(topic_id, chapter_id, patch)
    }

    fn replace_topic(&self, topic: Topic) -> Vec<Arc<Topic>> {
        let topic_id = topic.id();
        let topic = Arc::new(topic);
        self.topics
            .iter()
            .map(|t| {
                if t.id() == topic_id {
                    topic.clone()
                } else {
                    t.clone()
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::status::Status;

    fn today() -> Date {
        "2024-08-15".parse().unwrap()
    }

    /// Two topics, the first with two chapters.
    fn fixture() -> Snapshot {
        let s = Snapshot::empty().add_topic("Mathematics").add_topic("Physics");
        let math = s.topics()[0].id();
        s.add_chapter(math, "Calculus", today())
            .add_chapter(math, "Algebra", today())
    }

    #[test]
    fn test_add_topic() {
        let s = Snapshot::empty().add_topic("Algebra");
        assert_eq!(s.topics().len(), 1);
        assert_eq!(s.topics()[0].name(), "ALGEBRA");
        assert!(s.topics()[0].chapters().is_empty());
    }

    #[test]
    fn test_add_topic_blank_name_is_noop() {
        let s = fixture();
        assert_eq!(s.add_topic(""), s);
        assert_eq!(s.add_topic("   "), s);
        assert_eq!(s.try_add_topic(" \t "), Err(Rejection::EmptyName));
    }

    #[test]
    fn test_topics_keep_insertion_order() {
        let s = Snapshot::empty().add_topic("b").add_topic("a").add_topic("c");
        let names: Vec<&str> = s.topics().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_delete_topic() {
        let s = fixture();
        let math = s.topics()[0].id();
        let chapter_ids: Vec<ChapterId> =
            s.topics()[0].chapters().iter().map(|c| c.id()).collect();
        let next = s.delete_topic(math);
        assert_eq!(next.topics().len(), 1);
        assert_eq!(next.topics()[0].name(), "PHYSICS");
        for chapter_id in chapter_ids {
            assert!(next.chapter(math, chapter_id).is_none());
            assert!(
                next.topics()
                    .iter()
                    .all(|t| t.chapter(chapter_id).is_none())
            );
        }
        assert_eq!(next.chapter_count(), 0);
    }

    #[test]
    fn test_delete_unknown_topic_is_noop() {
        let s = fixture();
        assert_eq!(s.delete_topic(TopicId(999)), s);
        assert_eq!(
            s.try_delete_topic(TopicId(999)),
            Err(Rejection::TopicNotFound(TopicId(999)))
        );
    }

    #[test]
    fn test_add_chapter() {
        let s = fixture();
        let physics = s.topics()[1].id();
        let next = s.add_chapter(physics, " Optics ", today());
        let chapters = next.topics()[1].chapters();
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].name(), "Optics");
        assert_eq!(chapters[0].status(), Status::Next);
        assert_eq!(chapters[0].deadline(), today().add_days(30));
    }

    #[test]
    fn test_add_chapter_noops() {
        let s = fixture();
        let physics = s.topics()[1].id();
        assert_eq!(s.add_chapter(physics, "  ", today()), s);
        assert_eq!(s.add_chapter(TopicId(999), "Optics", today()), s);
        assert_eq!(
            s.try_add_chapter(TopicId(999), "Optics", today()),
            Err(Rejection::TopicNotFound(TopicId(999)))
        );
    }

    #[test]
    fn test_delete_chapter() {
        let s = fixture();
        let math = s.topics()[0].id();
        let calculus = s.topics()[0].chapters()[0].id();
        let next = s.delete_chapter(math, calculus);
        assert_eq!(next.topics()[0].chapters().len(), 1);
        assert_eq!(next.topics()[0].chapters()[0].name(), "Algebra");
    }

    #[test]
    fn test_delete_chapter_noops() {
        let s = fixture();
        let math = s.topics()[0].id();
        let physics = s.topics()[1].id();
        let calculus = s.topics()[0].chapters()[0].id();
        assert_eq!(s.delete_chapter(TopicId(999), calculus), s);
        assert_eq!(s.delete_chapter(math, ChapterId(999)), s);
        // Right chapter, wrong topic.
        assert_eq!(
            s.try_delete_chapter(physics, calculus),
            Err(Rejection::ChapterNotFound(physics, calculus))
        );
    }

    #[test]
    fn test_update_chapter_partial() {
        let s = fixture();
        let math = s.topics()[0].id();
        let calculus = s.topics()[0].chapters()[0].id();
        let before = s.chapter(math, calculus).unwrap().clone();
        let patch = ChapterPatch {
            status: Some(Status::OnGoing),
            ..Default::default()
        };
        let next = s.update_chapter(math, calculus, &patch);
        let after = next.chapter(math, calculus).unwrap();
        assert_eq!(after.status(), Status::OnGoing);
        assert_eq!(after.name(), before.name());
        assert_eq!(after.total_lectures(), before.total_lectures());
        assert_eq!(after.current_lecture(), before.current_lecture());
        assert_eq!(after.dpps(), before.dpps());
        assert_eq!(after.current_dpps(), before.current_dpps());
        assert_eq!(after.estimated_hours(), before.estimated_hours());
        assert_eq!(after.deadline(), before.deadline());
        assert_eq!(after.start_date(), before.start_date());
        assert_eq!(next.topics()[0].ongoing_count(), 1);
    }

    #[test]
    fn test_update_chapter_noops() {
        let s = fixture();
        let math = s.topics()[0].id();
        let calculus = s.topics()[0].chapters()[0].id();
        let patch = ChapterPatch {
            estimated_hours: Some(3),
            ..Default::default()
        };
        assert_eq!(s.update_chapter(TopicId(999), calculus, &patch), s);
        assert_eq!(s.update_chapter(math, ChapterId(999), &patch), s);
        let invalid = ChapterPatch {
            current_lecture: Some(11),
            ..Default::default()
        };
        assert_eq!(s.update_chapter(math, calculus, &invalid), s);
        assert_eq!(
            s.try_update_chapter(math, calculus, &invalid),
            Err(Rejection::InvalidPatch(math, calculus))
        );
    }

    #[test]
    fn test_untouched_siblings_are_shared() {
        let s = fixture();
        let math = s.topics()[0].id();
        let calculus = s.topics()[0].chapters()[0].id();
        let bump = s.chapter(math, calculus).unwrap().bump_lectures(1, today());
        let next = s.update_chapter(math, calculus, &bump.patch);
        assert!(Arc::ptr_eq(&s.topics()[1], &next.topics()[1]));
        assert!(Arc::ptr_eq(
            &s.topics()[0].chapters()[1],
            &next.topics()[0].chapters()[1]
        ));
        assert!(!Arc::ptr_eq(&s.topics()[0], &next.topics()[0]));
        // The old snapshot is unchanged.
        assert_eq!(s.chapter(math, calculus).unwrap().current_lecture(), 0);
        let started = next.chapter(math, calculus).unwrap();
        assert_eq!(started.current_lecture(), 1);
        assert_eq!(started.start_date(), Some(today()));
    }

    #[test]
    fn test_ids_are_never_reused() {
        let s = Snapshot::empty().add_topic("a");
        let a = s.topics()[0].id();
        let s = s.delete_topic(a).add_topic("b");
        assert_ne!(s.topics()[0].id(), a);
        let b = s.topics()[0].id();
        let s = s.add_chapter(b, "one", today());
        let one = s.topics()[0].chapters()[0].id();
        let s = s.delete_chapter(b, one).add_chapter(b, "two", today());
        let two = s.topics()[0].chapters()[0].id();
        assert_ne!(one, two);
        assert_ne!(two.0, b.0);
    }

    #[test]
    fn test_try_push_chapter() {
        let s = Snapshot::empty().add_topic("Physics");
        let physics = s.topics()[0].id();
        let patch = ChapterPatch {
            total_lectures: Some(18),
            current_lecture: Some(9),
            status: Some(Status::OnGoing),
            start_date: Some(today().add_days(-10)),
            ..Default::default()
        };
        let s = s
            .try_push_chapter(physics, "Mechanics", today(), &patch)
            .unwrap();
        let chapter = &s.topics()[0].chapters()[0];
        assert_eq!(chapter.current_lecture(), 9);
        assert_eq!(chapter.total_lectures(), 18);
        assert_eq!(chapter.start_date(), Some(today().add_days(-10)));
        assert_eq!(s.next_id(), 3);
    }
}
