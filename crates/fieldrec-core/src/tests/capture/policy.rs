use crate::capture::DurationPolicy;

/// WHAT: Requested seconds <= 0 select until-stopped capture
/// WHY: Zero is the sentinel for "run until the state machine says stop"
#[test]
fn given_non_positive_seconds_when_building_policy_then_until_stopped() {
    assert_eq!(DurationPolicy::from_secs(0), DurationPolicy::UntilStopped);
    assert_eq!(DurationPolicy::from_secs(-5), DurationPolicy::UntilStopped);
}

/// WHAT: Positive seconds select a fixed-length session
/// WHY: Fixed sessions terminate on their own sample target
#[test]
fn given_positive_seconds_when_building_policy_then_fixed() {
    assert_eq!(DurationPolicy::from_secs(1), DurationPolicy::Fixed(1));
    assert_eq!(DurationPolicy::from_secs(90), DurationPolicy::Fixed(90));
}

/// WHAT: Sample target is rate times seconds, unbounded for until-stopped
/// WHY: The loop terminates on exactly this count in fixed mode
#[test]
fn given_policy_when_computing_target_then_rate_times_seconds() {
    assert_eq!(DurationPolicy::Fixed(3).target_samples(16_000), Some(48_000));
    assert_eq!(DurationPolicy::UntilStopped.target_samples(16_000), None);
}
