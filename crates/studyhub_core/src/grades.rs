//! Academic calculators.
//!
//! # Responsibility
//! - GPA/CGPA/marks-percentage math and grade-target projections.
//!
//! # Invariants
//! - Every function is pure; empty inputs yield zero instead of dividing
//!   by zero.

use crate::analytics::percentage;

/// Letter grade on the 4.0 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeLetter {
    APlus,
    A,
    BPlus,
    B,
    C,
    D,
    F,
}

impl GradeLetter {
    /// Grade points on the 4.0 scale.
    pub fn points(self) -> f64 {
        match self {
            Self::APlus => 4.0,
            Self::A => 3.7,
            Self::BPlus => 3.3,
            Self::B => 3.0,
            Self::C => 2.0,
            Self::D => 1.0,
            Self::F => 0.0,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "A+" => Some(Self::APlus),
            "A" => Some(Self::A),
            "B+" => Some(Self::BPlus),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "F" => Some(Self::F),
            _ => None,
        }
    }
}

/// Credit-weighted GPA over `(grade, credits)` pairs.
///
/// Returns `0.0` when total credits are zero.
pub fn gpa(subjects: &[(GradeLetter, u32)]) -> f64 {
    let total_credits: u32 = subjects.iter().map(|(_, credits)| credits).sum();
    if total_credits == 0 {
        return 0.0;
    }
    let weighted: f64 = subjects
        .iter()
        .map(|(grade, credits)| grade.points() * f64::from(*credits))
        .sum();
    weighted / f64::from(total_credits)
}

/// Mean of semester GPAs. Returns `0.0` for an empty input.
pub fn cgpa(semester_gpas: &[f64]) -> f64 {
    if semester_gpas.is_empty() {
        return 0.0;
    }
    semester_gpas.iter().sum::<f64>() / semester_gpas.len() as f64
}

/// Marks obtained as a percentage of total marks.
pub fn marks_percentage(obtained: f64, total: f64) -> f64 {
    percentage(obtained, total)
}

/// Whether a grade target is still reachable, and at what cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetOutlook {
    /// The current weighted score alone already clears the target.
    AlreadyAchieved,
    /// Reachable with this average score on the remaining weight.
    Achievable { required_pct: f64 },
    /// Would need more than 100% on the remaining weight.
    OutOfReach,
}

/// Projects the score required on remaining work to hit `target_pct`.
///
/// `current_pct` is the grade earned so far; `current_weight_pct` is how
/// much of the final grade it covers.
pub fn project_target(current_pct: f64, current_weight_pct: f64, target_pct: f64) -> TargetOutlook {
    let banked = current_pct * current_weight_pct / 100.0;
    let remaining_weight = 100.0 - current_weight_pct;

    if banked >= target_pct {
        return TargetOutlook::AlreadyAchieved;
    }
    if remaining_weight <= 0.0 {
        return TargetOutlook::OutOfReach;
    }

    let required = (target_pct - banked) / (remaining_weight / 100.0);
    if required > 100.0 {
        TargetOutlook::OutOfReach
    } else if required < 0.0 {
        TargetOutlook::AlreadyAchieved
    } else {
        TargetOutlook::Achievable {
            required_pct: required,
        }
    }
}

/// Projects a standard ladder of grade targets.
pub fn grade_scenarios(
    current_pct: f64,
    current_weight_pct: f64,
    targets: &[f64],
) -> Vec<(f64, TargetOutlook)> {
    targets
        .iter()
        .map(|target| (*target, project_target(current_pct, current_weight_pct, *target)))
        .collect()
}
