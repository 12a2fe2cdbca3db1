//! Timeline seeding and the onboarding status derivation rule.

use crate::{OnboardingStatus, StepStatus};

/// Label and initial status for one seeded timeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineSeed {
    /// Display label
    pub label: &'static str,
    /// Initial status
    pub status: StepStatus,
}

/// The four steps every new student starts with, in `sort_order` 1..=4.
pub fn default_timeline() -> [TimelineSeed; 4] {
    [
        TimelineSeed {
            label: "Form Submitted",
            status: StepStatus::Completed,
        },
        TimelineSeed {
            label: "Payment Verification",
            status: StepStatus::Current,
        },
        TimelineSeed {
            label: "Auto Logged",
            status: StepStatus::Pending,
        },
        TimelineSeed {
            label: "Role Assigned",
            status: StepStatus::Pending,
        },
    ]
}

/// Derive a student's onboarding status from their timeline steps.
///
/// This is the single authority for the rule; both the direct status PATCH
/// and the step-triggered recompute route through it so the two call sites
/// cannot drift.
///
/// `failed` steps are excluded from both the completed count and the
/// denominator: they neither count toward completion nor block it. A
/// timeline with no completed steps derives Not Started, even when every
/// step has failed.
///
/// # Examples
///
/// ```
/// use mentora_core::{derive_onboarding_status, OnboardingStatus, StepStatus};
///
/// let steps = [StepStatus::Completed, StepStatus::Current, StepStatus::Pending];
/// assert_eq!(derive_onboarding_status(&steps), OnboardingStatus::InProgress);
/// ```
pub fn derive_onboarding_status(steps: &[StepStatus]) -> OnboardingStatus {
    let completed = steps
        .iter()
        .filter(|s| matches!(s, StepStatus::Completed))
        .count();
    let countable = steps
        .iter()
        .filter(|s| !matches!(s, StepStatus::Failed))
        .count();

    if completed == 0 {
        OnboardingStatus::NotStarted
    } else if completed == countable {
        OnboardingStatus::Completed
    } else {
        OnboardingStatus::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_shape_is_fixed() {
        let seeds = default_timeline();
        assert_eq!(seeds.len(), 4);
        assert_eq!(seeds[0].label, "Form Submitted");
        assert_eq!(seeds[0].status, StepStatus::Completed);
        assert_eq!(seeds[1].label, "Payment Verification");
        assert_eq!(seeds[1].status, StepStatus::Current);
        assert_eq!(seeds[2].status, StepStatus::Pending);
        assert_eq!(seeds[3].status, StepStatus::Pending);
    }

    #[test]
    fn no_completed_steps_derives_not_started() {
        let steps = [StepStatus::Pending, StepStatus::Current, StepStatus::Pending];
        assert_eq!(derive_onboarding_status(&steps), OnboardingStatus::NotStarted);
    }

    #[test]
    fn all_completed_derives_completed() {
        let steps = [StepStatus::Completed; 4];
        assert_eq!(derive_onboarding_status(&steps), OnboardingStatus::Completed);
    }

    #[test]
    fn partial_completion_derives_in_progress() {
        let steps = [
            StepStatus::Completed,
            StepStatus::Current,
            StepStatus::Pending,
            StepStatus::Pending,
        ];
        assert_eq!(derive_onboarding_status(&steps), OnboardingStatus::InProgress);
    }

    #[test]
    fn failed_steps_do_not_block_completion() {
        let steps = [
            StepStatus::Completed,
            StepStatus::Completed,
            StepStatus::Failed,
        ];
        assert_eq!(derive_onboarding_status(&steps), OnboardingStatus::Completed);
    }

    #[test]
    fn failed_steps_do_not_count_as_completed() {
        let steps = [StepStatus::Failed, StepStatus::Failed];
        assert_eq!(derive_onboarding_status(&steps), OnboardingStatus::NotStarted);
    }

    #[test]
    fn empty_timeline_derives_not_started() {
        assert_eq!(derive_onboarding_status(&[]), OnboardingStatus::NotStarted);
    }
}
