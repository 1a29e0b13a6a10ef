use hal::{ColorClassifier, EdgeSource};
use localization::{FilterConfig, ResampleOutcome, ResampleSchedule, AMBIENT_COLOR};
use log::debug;

use crate::intake::ColorIntake;
use crate::SharedContext;

/// Color intake and resampling
pub struct FilterTask<L, R, C> {
    intake: ColorIntake<L, R, C>,
    schedule: ResampleSchedule,
    detected_color: u8,
}

impl<L: EdgeSource, R: EdgeSource, C: ColorClassifier> FilterTask<L, R, C> {
    pub fn new(intake: ColorIntake<L, R, C>, config: &FilterConfig) -> Self {
        Self {
            intake,
            schedule: ResampleSchedule::new(config.resample_interval_ms),
            detected_color: AMBIENT_COLOR,
        }
    }

    /// Poll the color sensors and resample when the schedule says so
    pub fn run(&mut self, context: &SharedContext, now_ms: u32) -> Option<ResampleOutcome> {
        let color = self.intake.poll()?;
        self.detected_color = color;
        if !self.schedule.should_resample(color, now_ms) {
            return None;
        }

        let outcome = context.with_population(|population| population.score_and_resample(color));
        self.schedule.mark(color, now_ms);
        debug!("Color {} at {} ms: {:?}", color, now_ms, outcome);
        Some(outcome)
    }

    /// Last color reported by the classifier, sentinel included
    pub fn detected_color(&self) -> u8 {
        self.detected_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{AlwaysReady, SetColor};
    use crate::VehicleConfig;

    fn task() -> FilterTask<AlwaysReady, AlwaysReady, SetColor> {
        let config = VehicleConfig::default();
        FilterTask::new(
            ColorIntake::new(AlwaysReady, AlwaysReady, SetColor(AMBIENT_COLOR)),
            &config.filter,
        )
    }

    #[test]
    fn test_resamples_on_change_and_interval() {
        let context = SharedContext::new(&VehicleConfig::default()).expect("valid configuration");
        let mut task = task();

        assert_eq!(task.run(&context, 0), None, "sentinel never resamples");
        assert_eq!(task.detected_color(), AMBIENT_COLOR);

        task.intake.classifier_mut().0 = 3;
        assert!(task.run(&context, 100).is_some());
        assert_eq!(task.run(&context, 200), None);
        assert!(task.run(&context, 2100).is_some());

        task.intake.classifier_mut().0 = 5;
        assert!(task.run(&context, 2200).is_some());
        assert_eq!(task.detected_color(), 5);
    }
}
