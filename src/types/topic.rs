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
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::types::chapter::Chapter;
use crate::types::chapter::ChapterId;
use crate::types::status::Status;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicId(pub u64);

impl Display for TopicId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named group of chapters. Chapters are shared with earlier snapshots
/// until they are changed.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    id: TopicId,
    name: String,
    chapters: Vec<Arc<Chapter>>,
}

impl Topic {
    /// A topic with no chapters. The name is trimmed and uppercased.
    pub fn new(id: TopicId, name: &str) -> Self {
        Self {
            id,
            name: name.trim().to_uppercase(),
            chapters: Vec::new(),
        }
    }

    pub fn id(&self) -> TopicId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chapters(&self) -> &[Arc<Chapter>] {
        &self.chapters
    }

    pub fn chapter(&self, chapter_id: ChapterId) -> Option<&Arc<Chapter>> {
        self.chapters.iter().find(|c| c.id() == chapter_id)
    }

    /// Number of chapters currently in progress.
    pub fn ongoing_count(&self) -> usize {
        self.chapters
            .iter()
            .filter(|c| c.status() == Status::OnGoing)
            .count()
    }

    pub(crate) fn with_chapter(&self, chapter: Chapter) -> Topic {
        let mut chapters = self.chapters.clone();
        chapters.push(Arc::new(chapter));
        Topic {
            id: self.id,
            name: self.name.clone(),
            chapters,
        }
    }

    pub(crate) fn with_replaced(&self, chapter: Chapter) -> Topic {
        let chapter_id = chapter.id();
        let chapter = Arc::new(chapter);
        let chapters = self
            .chapters
            .iter()
            .map(|c| {
                if c.id() == chapter_id {
                    chapter.clone()
                } else {
                    c.clone()
                }
            })
            .collect();
        Topic {
            id: self.id,
            name: self.name.clone(),
            chapters,
        }
    }

    pub(crate) fn without_chapter(&self, chapter_id: ChapterId) -> Topic {
        let chapters = self
            .chapters
            .iter()
            .filter(|c| c.id() != chapter_id)
            .cloned()
            .collect();
        Topic {
            id: self.id,
            name: self.name.clone(),
            chapters,
        }
    }
}
