use crate::settings::Settings;
use pomodesk_ipc::Phase;

/// Decide which phase follows `current` and how long it lasts, in seconds.
///
/// `completed_work_sessions` is the count *before* the phase that just ended;
/// a finishing work phase is counted here prospectively and the caller does
/// the real increment.
pub fn next_phase(current: Phase, completed_work_sessions: u32, settings: &Settings) -> (Phase, u32) {
    match current {
        Phase::Work => {
            let completed = completed_work_sessions.saturating_add(1);
            if completed % settings.long_break_interval.max(1) == 0 {
                (Phase::LongBreak, settings.long_break_seconds())
            } else {
                (Phase::ShortBreak, settings.short_break_seconds())
            }
        }
        Phase::ShortBreak | Phase::LongBreak => (Phase::Work, settings.work_seconds()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn work_leads_to_short_break_until_interval() {
        let settings = Settings::default();
        assert_eq!(next_phase(Phase::Work, 0, &settings), (Phase::ShortBreak, 300));
        assert_eq!(next_phase(Phase::Work, 2, &settings), (Phase::ShortBreak, 300));
        assert_eq!(next_phase(Phase::Work, 3, &settings), (Phase::LongBreak, 900));
        assert_eq!(next_phase(Phase::Work, 4, &settings), (Phase::ShortBreak, 300));
    }

    #[test]
    fn breaks_lead_back_to_work() {
        let settings = Settings::default();
        assert_eq!(next_phase(Phase::ShortBreak, 1, &settings), (Phase::Work, 1500));
        assert_eq!(next_phase(Phase::LongBreak, 4, &settings), (Phase::Work, 1500));
    }

    #[test]
    fn interval_of_one_always_gives_long_breaks() {
        let settings = Settings {
            long_break_interval: 1,
            ..Settings::default()
        };
        for done in 0..10 {
            assert_eq!(next_phase(Phase::Work, done, &settings).0, Phase::LongBreak);
        }
    }

    proptest! {
        #[test]
        fn long_break_exactly_on_multiples_of_interval(
            interval in 1u32..12,
            completed in 0u32..500,
        ) {
            let settings = Settings { long_break_interval: interval, ..Settings::default() };
            let (phase, _) = next_phase(Phase::Work, completed, &settings);
            let expect_long = (completed + 1) % interval == 0;
            prop_assert_eq!(phase == Phase::LongBreak, expect_long);
        }

        #[test]
        fn same_inputs_same_answer(
            completed in 0u32..100,
            work in 1u32..120,
            short in 1u32..60,
        ) {
            let settings = Settings {
                work_minutes: work,
                short_break_minutes: short,
                ..Settings::default()
            };
            for phase in [Phase::Work, Phase::ShortBreak, Phase::LongBreak] {
                prop_assert_eq!(
                    next_phase(phase, completed, &settings),
                    next_phase(phase, completed, &settings)
                );
            }
        }
    }
}
