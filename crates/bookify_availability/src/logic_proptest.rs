#[cfg(test)]
mod tests {
    use crate::logic::{compute_slots, SlotQuery};
    use crate::policy::{ResourceSelector, SchedulingPolicy};
    use crate::test_support::{date, hours, today};
    use bookify_common::TimeInterval;
    use bookify_config::BookingConfig;
    use chrono::{Duration, NaiveTime};
    use proptest::prelude::*;

    // Helper function to build a policy open every day from `start` to `end` minutes
    fn policy_for(start_minutes: u32, end_minutes: u32) -> SchedulingPolicy {
        let fmt = |minutes: u32| format!("{:02}:{:02}", minutes / 60, minutes % 60);
        let config = BookingConfig {
            excluded_weekdays: vec![],
            hours: vec![hours(
                &["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
                &fmt(start_minutes),
                &fmt(end_minutes),
            )],
            ..BookingConfig::default()
        };
        SchedulingPolicy::from_config(&config).unwrap()
    }

    fn minutes(time: NaiveTime) -> i64 {
        (time - NaiveTime::MIN).num_minutes()
    }

    prop_compose! {
        // Half-hour aligned window of at least an hour and a half, inside 06:00-22:00
        fn window()(start in 12u32..36, len in 3u32..20) -> (u32, u32) {
            let start = start * 30;
            (start, (start + len * 30).min(22 * 60))
        }
    }

    proptest! {
        #[test]
        fn test_slot_count_matches_window_without_busy_time(
            (start, end) in window(),
            duration in prop::sample::select(vec![30i64, 60, 90]),
            day in 2u32..30,
        ) {
            let policy = policy_for(start, end);
            let query = SlotQuery {
                date: date(day),
                today: today(),
                duration_minutes: duration,
                resource: &ResourceSelector::Any,
            };

            let slots = compute_slots(&policy, &query, &[]).unwrap();

            let window_minutes = i64::from(end - start);
            let expected = if window_minutes >= duration {
                ((window_minutes - duration) / 30 + 1) as usize
            } else {
                0
            };
            prop_assert_eq!(slots.len(), expected);
            prop_assert!(slots.iter().all(|slot| slot.available));
        }

        #[test]
        fn test_slots_never_run_past_the_window(
            (start, end) in window(),
            duration in prop::sample::select(vec![30i64, 60, 90]),
            busy_start in 0u32..48,
            busy_len in 1u32..8,
        ) {
            let policy = policy_for(start, end);
            let day = date(10);
            let from = NaiveTime::MIN + Duration::minutes(i64::from(busy_start * 30));
            let busy = TimeInterval::starting_at(
                policy.to_instant(day, from).unwrap(),
                Duration::minutes(i64::from(busy_len * 15)),
            ).unwrap();
            let query = SlotQuery {
                date: day,
                today: today(),
                duration_minutes: duration,
                resource: &ResourceSelector::Any,
            };

            let slots = compute_slots(&policy, &query, &[busy]).unwrap();

            for slot in &slots {
                let slot_start = minutes(slot.time);
                prop_assert!(slot_start >= i64::from(start));
                prop_assert!(slot_start + duration <= i64::from(end));
                prop_assert_eq!((slot_start - i64::from(start)) % 30, 0);

                let candidate = TimeInterval::starting_at(
                    policy.to_instant(day, slot.time).unwrap(),
                    Duration::minutes(duration),
                ).unwrap();
                // Available exactly when the candidate does not overlap busy time
                prop_assert_eq!(slot.available, !candidate.overlaps(&busy));
            }
        }

        #[test]
        fn test_overlap_is_symmetric(
            a_start in 0i64..200, a_len in 1i64..100,
            b_start in 0i64..200, b_len in 1i64..100,
        ) {
            let base = policy_for(9 * 60, 18 * 60).to_instant(date(2), NaiveTime::MIN).unwrap();
            let a = TimeInterval::starting_at(base + Duration::minutes(a_start), Duration::minutes(a_len)).unwrap();
            let b = TimeInterval::starting_at(base + Duration::minutes(b_start), Duration::minutes(b_len)).unwrap();

            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
            prop_assert_eq!(
                a.overlaps(&b),
                a_start < b_start + b_len && a_start + a_len > b_start
            );
        }
    }
}
