#[cfg(test)]
mod tests {
    use crate::policy::{Resource, SchedulingPolicy};
    use crate::test_support::{date, every_day_policy, policy_with_hours, staffed_policy, today};
    use crate::validator::{
        ensure_slot_free, validate_and_reserve, validate_and_reserve_with, validate_booking,
        BookingRequest, ContactDetails, Rejection, Verdict,
    };
    use bookify_common::TimeInterval;
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn request(date: &str, time: &str, duration: i64) -> BookingRequest {
        BookingRequest {
            date: date.to_string(),
            time: time.to_string(),
            duration_minutes: Some(duration),
            resource: None,
            contact: ContactDetails {
                first_name: " Ivan ".to_string(),
                last_name: "Petrov".to_string(),
                email: "ivan@example.com".to_string(),
                phone: "+359 888 123 456".to_string(),
                procedure: "Massage".to_string(),
                symptoms: Some("   ".to_string()),
            },
        }
    }

    fn busy(policy: &SchedulingPolicy, day: NaiveDate, from: (u32, u32), to: (u32, u32)) -> TimeInterval {
        TimeInterval::new(
            policy.to_instant(day, hm(from.0, from.1)).unwrap(),
            policy.to_instant(day, hm(to.0, to.1)).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_request_becomes_an_absolute_interval() {
        let policy = policy_with_hours("09:00", "18:30");

        let booking = validate_booking(&request("2025-06-03", "10:00", 60), &policy, today()).unwrap();

        assert_eq!(booking.date, date(3));
        assert_eq!(booking.time, hm(10, 0));
        assert_eq!(booking.duration_minutes, 60);
        assert_eq!(booking.resource, None);
        assert_eq!(booking.interval.start(), Utc.with_ymd_and_hms(2025, 6, 3, 7, 0, 0).unwrap());
        assert_eq!(booking.interval.end(), Utc.with_ymd_and_hms(2025, 6, 3, 8, 0, 0).unwrap());
        assert_eq!(booking.contact.first_name, "Ivan");
        assert_eq!(booking.contact.symptoms, None);
    }

    #[test]
    fn test_field_rejections() {
        let policy = policy_with_hours("09:00", "18:30");
        let check = |req: BookingRequest| validate_booking(&req, &policy, today()).unwrap_err();

        let mut missing_phone = request("2025-06-03", "10:00", 60);
        missing_phone.contact.phone = "  ".to_string();
        assert_eq!(check(missing_phone), Rejection::MissingField("phone"));

        let mut no_duration = request("2025-06-03", "10:00", 60);
        no_duration.duration_minutes = None;
        assert_eq!(check(no_duration), Rejection::MissingField("duration"));

        let mut bad_email = request("2025-06-03", "10:00", 60);
        bad_email.contact.email = "ivan.example.com".to_string();
        assert_eq!(check(bad_email), Rejection::InvalidEmail);

        assert_eq!(
            check(request("03.06.2025", "10:00", 60)),
            Rejection::InvalidDate("03.06.2025".to_string())
        );
        assert_eq!(
            check(request("2025-06-03", "10h", 60)),
            Rejection::InvalidTime("10h".to_string())
        );
        assert_eq!(
            check(request("2025-06-03", "10:00", 45)),
            Rejection::UnsupportedDuration(45)
        );
    }

    #[test]
    fn test_policy_rejections() {
        let policy = policy_with_hours("09:00", "18:30");
        let check = |req: BookingRequest| validate_booking(&req, &policy, today()).unwrap_err();

        assert_eq!(
            check(request("2025-06-01", "10:00", 30)),
            Rejection::OutsideHorizon(today())
        );
        assert_eq!(
            check(request("2025-06-08", "10:00", 30)),
            Rejection::ClosedDay(date(8))
        );
        assert_eq!(
            check(request("2025-06-03", "18:00", 60)),
            Rejection::OutsideWorkingHours {
                time: hm(18, 0),
                duration_minutes: 60
            }
        );
        assert_eq!(
            check(request("2025-06-03", "08:30", 30)),
            Rejection::OutsideWorkingHours {
                time: hm(8, 30),
                duration_minutes: 30
            }
        );
        assert_eq!(check(request("2025-06-03", "10:15", 30)), Rejection::OffGrid(hm(10, 15)));

        let mut ghost = request("2025-06-03", "10:00", 30);
        ghost.resource = Some("ghost".to_string());
        assert_eq!(check(ghost), Rejection::UnknownResource("ghost".to_string()));
    }

    #[test]
    fn test_local_time_skipped_by_dst_is_rejected() {
        let policy = every_day_policy("00:00", "06:00");
        let spring = NaiveDate::from_ymd_opt(2025, 3, 30).unwrap();
        let before = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();

        assert_eq!(
            validate_booking(&request("2025-03-30", "03:00", 30), &policy, before).unwrap_err(),
            Rejection::NonexistentLocalTime {
                date: spring,
                time: hm(3, 0)
            }
        );
        assert!(validate_booking(&request("2025-03-30", "04:00", 30), &policy, before).is_ok());
    }

    #[test]
    fn test_specific_resource_is_checked_against_its_own_shift() {
        let policy = staffed_policy();

        // Monday 14:00: petar works, maria's shift ended at 13:00
        let mut for_maria = request("2025-06-02", "14:00", 30);
        for_maria.resource = Some("maria".to_string());
        assert_eq!(
            validate_booking(&for_maria, &policy, today()).unwrap_err(),
            Rejection::OutsideWorkingHours {
                time: hm(14, 0),
                duration_minutes: 30
            }
        );

        let mut for_anyone = request("2025-06-02", "14:00", 30);
        for_anyone.resource = Some("any".to_string());
        let booking = validate_booking(&for_anyone, &policy, today()).unwrap();
        assert_eq!(booking.resource.map(|r| r.id), Some("petar".to_string()));
    }

    #[test]
    fn test_fresh_busy_data_decides_the_conflict() {
        let policy = policy_with_hours("09:00", "18:30");
        let req = request("2025-06-03", "10:00", 60);

        let booking = validate_booking(&req, &policy, today()).unwrap();
        let touching = vec![busy(&policy, date(3), (11, 0), (12, 0))];
        assert_eq!(ensure_slot_free(&booking, &touching), Ok(()));

        let overlapping = vec![busy(&policy, date(3), (10, 30), (10, 45))];
        assert_eq!(ensure_slot_free(&booking, &overlapping), Err(Rejection::SlotTaken));

        let verdict = validate_and_reserve(&req, &policy, today(), &overlapping);
        assert!(matches!(verdict, Verdict::Rejected(ref r) if r.is_conflict()));

        let verdict = validate_and_reserve(&req, &policy, today(), &touching);
        assert!(matches!(verdict, Verdict::Accepted(_)));
    }

    #[test]
    fn test_validation_failures_are_not_conflicts() {
        let policy = policy_with_hours("09:00", "18:30");
        let verdict = validate_and_reserve(&request("2025-06-03", "10:15", 30), &policy, today(), &[]);

        let rejection = verdict.into_result().unwrap_err();
        assert_eq!(rejection, Rejection::OffGrid(hm(10, 15)));
        assert!(!rejection.is_conflict());
    }

    #[test]
    fn test_any_books_the_first_free_resource() {
        let policy = staffed_policy();
        // Monday 12:00 fits both maria and petar; maria's calendar is busy
        let maria_busy = vec![busy(&policy, date(2), (12, 0), (13, 0))];
        let busy_for = |resource: Option<&Resource>| -> &[TimeInterval] {
            match resource.map(|resource| resource.id.as_str()) {
                Some("maria") => &maria_busy,
                _ => &[],
            }
        };

        let verdict = validate_and_reserve_with(&request("2025-06-02", "12:00", 30), &policy, today(), busy_for);
        let booking = verdict.into_result().unwrap();
        assert_eq!(booking.resource.map(|r| r.id), Some("petar".to_string()));

        let mut for_maria = request("2025-06-02", "12:00", 30);
        for_maria.resource = Some("maria".to_string());
        let verdict = validate_and_reserve_with(&for_maria, &policy, today(), busy_for);
        assert_eq!(verdict, Verdict::Rejected(Rejection::SlotTaken));
    }
}
