//! Workout history grouped by day.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;
use time::{Date, UtcOffset};

use crate::models::{Workout, WorkoutActivityType};

/// Types shown in the workout type filter.
pub const SUPPORTED_TYPES: [WorkoutActivityType; 2] =
    [WorkoutActivityType::Running, WorkoutActivityType::Hiking];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutDay {
    pub date: Date,
    pub workouts: Vec<Workout>,
}

/// Groups workouts by the calendar day they started on in `offset`.
///
/// Days are newest first, as are the workouts within each day.
pub fn group_by_day(workouts: Vec<Workout>, offset: UtcOffset) -> Vec<WorkoutDay> {
    let mut by_day: BTreeMap<Date, Vec<Workout>> = BTreeMap::new();
    for workout in workouts {
        let day = workout.start.to_offset(offset).date();
        by_day.entry(day).or_default().push(workout);
    }

    by_day
        .into_iter()
        .rev()
        .map(|(date, mut workouts)| {
            workouts.sort_by(|a, b| b.start.cmp(&a.start));
            WorkoutDay { date, workouts }
        })
        .collect()
}

/// Keeps workouts of the selected types; an empty selection keeps everything.
/// Days left without workouts are dropped.
pub fn filter_days(
    days: &[WorkoutDay],
    selected: &HashSet<WorkoutActivityType>,
) -> Vec<WorkoutDay> {
    days.iter()
        .filter_map(|day| {
            let workouts: Vec<Workout> = day
                .workouts
                .iter()
                .filter(|w| selected.is_empty() || selected.contains(&w.activity_type))
                .cloned()
                .collect();
            (!workouts.is_empty()).then(|| WorkoutDay {
                date: day.date,
                workouts,
            })
        })
        .collect()
}

/// Distinct supported types present in `days`, in declaration order.
pub fn available_types(days: &[WorkoutDay]) -> Vec<WorkoutActivityType> {
    days.iter()
        .flat_map(|day| day.workouts.iter().map(|w| w.activity_type))
        .filter(|t| SUPPORTED_TYPES.contains(t))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;
    use time::macros::{date, datetime, offset};

    fn workout(activity_type: WorkoutActivityType, start: time::OffsetDateTime) -> Workout {
        Workout::new(activity_type, start, start + Duration::minutes(45))
    }

    fn history() -> Vec<Workout> {
        vec![
            workout(WorkoutActivityType::Running, datetime!(2025-10-28 07:00 UTC)),
            workout(WorkoutActivityType::Hiking, datetime!(2025-10-30 15:00 UTC)),
            workout(WorkoutActivityType::Running, datetime!(2025-10-30 06:00 UTC)),
            workout(WorkoutActivityType::Other, datetime!(2025-10-29 18:00 UTC)),
        ]
    }

    #[test]
    fn test_group_by_day() {
        let days = group_by_day(history(), UtcOffset::UTC);

        let dates: Vec<Date> = days.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date!(2025-10-30), date!(2025-10-29), date!(2025-10-28)]);

        let newest = &days[0].workouts;
        assert_eq!(newest.len(), 2);
        assert!(newest[0].start > newest[1].start);
    }

    #[test]
    fn test_group_by_day_respects_offset() {
        // 06:00 UTC is still the previous evening at UTC-7
        let days = group_by_day(history(), offset!(-7));
        assert_eq!(days[0].date, date!(2025-10-30));
        assert_eq!(days[0].workouts.len(), 1);
        assert_eq!(days[1].date, date!(2025-10-29));
        assert_eq!(days[1].workouts.len(), 2);
    }

    #[test]
    fn test_filter_days() {
        let days = group_by_day(history(), UtcOffset::UTC);

        assert_eq!(filter_days(&days, &HashSet::new()), days);

        let hikes = filter_days(&days, &HashSet::from([WorkoutActivityType::Hiking]));
        assert_eq!(hikes.len(), 1);
        assert_eq!(hikes[0].date, date!(2025-10-30));
        assert_eq!(hikes[0].workouts.len(), 1);
    }

    #[test]
    fn test_available_types() {
        let days = group_by_day(history(), UtcOffset::UTC);
        assert_eq!(
            available_types(&days),
            vec![WorkoutActivityType::Running, WorkoutActivityType::Hiking]
        );
        assert!(available_types(&[]).is_empty());
    }
}
