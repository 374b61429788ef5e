#![no_main]
use libfuzzer_sys::fuzz_target;
use windcal_core::{AnglePolicy, SpeedCorrector};

fuzz_target!(|input: (f32, f32, bool)| {
    let (speed, angle, wrap) = input;
    let policy = if wrap { AnglePolicy::Wrap } else { AnglePolicy::Strict };
    let c = SpeedCorrector::builtin().with_policy(policy);
    // Any input either errors or produces a finite value; never panics.
    if let Ok(v) = c.correct(speed, angle) {
        assert!(v.is_finite() || !speed.is_finite());
    }
});
