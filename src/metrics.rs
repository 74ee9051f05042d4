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

//! Derived display values, recomputed from a snapshot on every render.

use serde::Serialize;

use crate::types::date::Date;

/// Percentage of `current` over `total`. A zero total yields zero.
pub fn progress_percent(current: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * f64::from(current) / f64::from(total)
    }
}

/// `current + delta`, clamped to `[0, max]`.
pub fn bump_counter(current: u32, delta: i64, max: u32) -> u32 {
    let bumped = i64::from(current).saturating_add(delta);
    bumped.clamp(0, i64::from(max)) as u32
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Urgency {
    Overdue,
    DueSoon,
    Normal,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Overdue => "overdue",
            Urgency::DueSoon => "due-soon",
            Urgency::Normal => "normal",
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct DaysLeft {
    pub label: String,
    pub urgency: Urgency,
}

/// Bucket the distance from `today` to `deadline`.
pub fn days_left(deadline: Date, today: Date) -> DaysLeft {
    let diff = today.days_until(deadline);
    let (label, urgency) = match diff {
        d if d < 0 => (format!("{} days ago", d.unsigned_abs()), Urgency::Overdue),
        0 => ("Today".to_string(), Urgency::DueSoon),
        1 => ("1 day left".to_string(), Urgency::DueSoon),
        d => (format!("{d} days left"), Urgency::Normal),
    };
    DaysLeft { label, urgency }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(0, 0), 0.0);
        assert_eq!(progress_percent(5, 0), 0.0);
        assert_eq!(progress_percent(0, 10), 0.0);
        assert_eq!(progress_percent(5, 10), 50.0);
        assert_eq!(progress_percent(10, 10), 100.0);
        assert!((progress_percent(1, 3) - 33.333).abs() < 0.01);
    }

    #[test]
    fn test_bump_counter() {
        assert_eq!(bump_counter(3, 1, 10), 4);
        assert_eq!(bump_counter(3, -1, 10), 2);
        assert_eq!(bump_counter(3, 100, 10), 10);
        assert_eq!(bump_counter(3, -100, 10), 0);
        assert_eq!(bump_counter(0, 1, 0), 0);
    }

    #[test]
    fn test_bump_counter_is_idempotent_at_bounds() {
        assert_eq!(bump_counter(10, 1, 10), 10);
        assert_eq!(bump_counter(0, -1, 10), 0);
    }

    #[test]
    fn test_bump_counter_never_escapes_bounds() {
        let max = 7;
        let mut current = 0;
        for delta in [1, 1, -3, 5, 5, 5, -1, -20, 2, 9, -1, 1, 1] {
            current = bump_counter(current, delta, max);
            assert!(current <= max);
        }
        assert_eq!(current, 7);
    }

    #[test]
    fn test_days_left_table() {
        let today: Date = "2024-08-15".parse().unwrap();
        let cases = [
            (-10, "10 days ago", Urgency::Overdue),
            (-1, "1 days ago", Urgency::Overdue),
            (0, "Today", Urgency::DueSoon),
            (1, "1 day left", Urgency::DueSoon),
            (2, "2 days left", Urgency::Normal),
            (5, "5 days left", Urgency::Normal),
        ];
        for (offset, label, urgency) in cases {
            let result = days_left(today.add_days(offset), today);
            assert_eq!(result.label, label);
            assert_eq!(result.urgency, urgency);
        }
    }
}
