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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use crate::plan::Rejection;
use crate::plan::Snapshot;

#[derive(Clone)]
pub struct ServerState {
    pub mutable: Arc<Mutex<MutableState>>,
}

pub struct MutableState {
    /// The current snapshot. Replaced wholesale on every mutation.
    pub plan: Snapshot,
}

impl ServerState {
    pub fn new(plan: Snapshot) -> Self {
        Self {
            mutable: Arc::new(Mutex::new(MutableState { plan })),
        }
    }

    /// The current snapshot. The lock is released before this returns, so
    /// callers render from a tree no one else can change.
    pub fn snapshot(&self) -> Snapshot {
        self.acquire().plan.clone()
    }

    /// Compute the next snapshot from the current one and swap it in. On
    /// rejection the current snapshot stays.
    pub fn apply<F>(&self, f: F) -> Result<(), Rejection>
    where
        F: FnOnce(&Snapshot) -> Result<Snapshot, Rejection>,
    {
        let mut mutable = self.acquire();
        let next = f(&mutable.plan)?;
        mutable.plan = next;
        Ok(())
    }

    // The swap is a single assignment, so a poisoned lock still holds a
    // whole snapshot.
    fn acquire(&self) -> MutexGuard<'_, MutableState> {
        self.mutable.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
