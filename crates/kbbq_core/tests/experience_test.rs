use kbbq_core::{experience_from_level, level_from_experience, ExperienceRange, LevelProgress};
use rand::{rngs::StdRng, SeedableRng};

#[test]
fn test_known_levels() {
    assert_eq!(level_from_experience(0), 0);
    assert_eq!(level_from_experience(10), 0);
    assert_eq!(level_from_experience(69), 0);
    assert_eq!(level_from_experience(70), 1);
    assert_eq!(level_from_experience(100), 1);
    assert_eq!(level_from_experience(10_000), 12);
    assert_eq!(level_from_experience(9_999), 11);
}

#[test]
fn test_round_trip_stable_at_boundary() {
    for experience in (0..200_000u64).step_by(37) {
        let level = level_from_experience(experience);
        assert_eq!(level_from_experience(experience_from_level(level)), level);
    }
}

#[test]
fn test_threshold_is_smallest_experience_for_level() {
    for level in 1..500u64 {
        let threshold = experience_from_level(level);
        assert_eq!(level_from_experience(threshold), level);
        assert_eq!(level_from_experience(threshold - 1), level - 1);
    }
}

#[test]
fn test_monotonic() {
    let mut previous = 0;
    for experience in 0..50_000u64 {
        let level = level_from_experience(experience);
        assert!(level >= previous, "level dropped at {experience}");
        previous = level;
    }
}

#[test]
fn test_huge_experience_does_not_overflow() {
    let level = level_from_experience(u64::MAX);
    assert!(level > 0);
}

#[test]
fn test_progress() {
    let progress = LevelProgress::from_experience(10_050);
    assert_eq!(*progress.level(), 12);
    assert_eq!(*progress.current_threshold(), 10_000);
    assert_eq!(*progress.next_threshold(), experience_from_level(13));
    assert_eq!(progress.remaining(), experience_from_level(13) - 10_050);
}

#[test]
fn test_range_roll_within_band() {
    let mut rng = StdRng::seed_from_u64(7);
    let band = ExperienceRange::new(15, 30);
    for _ in 0..1_000 {
        let award = band.roll(&mut rng);
        assert!((15..=30).contains(&award));
    }
    assert_eq!(ExperienceRange::fixed(9).roll(&mut rng), 9);
}

#[test]
fn test_range_validation() {
    assert!(ExperienceRange::new(0, 25).validate().is_ok());
    assert!(ExperienceRange::new(30, 15).validate().is_err());
}
