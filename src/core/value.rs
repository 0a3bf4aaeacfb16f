#![forbid(unsafe_code)]

use time::PrimitiveDateTime;

use crate::core::resource::ResourceId;

/// Which representation of a property's value is requested.
///
/// `Raw` is the canonical in-memory form, `Edit` the typed program-usable
/// form, `Display` the human-readable string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    Raw,
    #[default]
    Edit,
    Display,
}

impl Role {
    #[must_use]
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Some(Self::Raw),
            "edit" | "editrole" => Some(Self::Edit),
            "display" | "displayrole" => Some(Self::Display),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Edit => "edit",
            Self::Display => "display",
        }
    }
}

/// Base unit of a duration estimate. The unit used on input is part of the
/// canonical value and is preserved on output, never normalized away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Hour,
    Day,
}

impl TimeUnit {
    #[must_use]
    pub fn from_suffix(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'h' => Some(Self::Hour),
            'd' => Some(Self::Day),
            _ => None,
        }
    }

    #[must_use]
    pub fn suffix(self) -> char {
        match self {
            Self::Hour => 'h',
            Self::Day => 'd',
        }
    }
}

/// Scheduling constraint attached to a task. Labels are matched
/// case-sensitively on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    AsSoonAsPossible,
    AsLateAsPossible,
    FixedInterval,
    MustStartOn,
    MustFinishOn,
    StartNotEarlier,
    FinishNotLater,
}

impl ConstraintType {
    pub const LABELS: &'static [&'static str] = &[
        "ASAP",
        "ALAP",
        "FixedInterval",
        "MustStartOn",
        "MustFinishOn",
        "StartNotEarlier",
        "FinishNotLater",
    ];

    pub const ALL: [Self; 7] = [
        Self::AsSoonAsPossible,
        Self::AsLateAsPossible,
        Self::FixedInterval,
        Self::MustStartOn,
        Self::MustFinishOn,
        Self::StartNotEarlier,
        Self::FinishNotLater,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::AsSoonAsPossible => "ASAP",
            Self::AsLateAsPossible => "ALAP",
            Self::FixedInterval => "FixedInterval",
            Self::MustStartOn => "MustStartOn",
            Self::MustFinishOn => "MustFinishOn",
            Self::StartNotEarlier => "StartNotEarlier",
            Self::FinishNotLater => "FinishNotLater",
        }
    }

    #[must_use]
    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == s)
    }
}

/// Whether an estimate expresses calendar duration or work effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateKind {
    Duration,
    Effort,
}

impl EstimateKind {
    pub const ALL: [Self; 2] = [Self::Duration, Self::Effort];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Duration => "Duration",
            Self::Effort => "Effort",
        }
    }

    #[must_use]
    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.label() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const LABELS: &'static [&'static str] = &["Low", "Medium", "High"];

    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    #[must_use]
    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.label() == s)
    }
}

/// Canonical property value. One variant per property kind; a task holds
/// exactly one of these for every registered property at all times.
///
/// Money is stored in minor units (cents for a two-decimal currency) so
/// amounts stay exact. `Resource(None)` is the explicit unallocated state.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Duration { amount: f64, unit: TimeUnit },
    DateTime(PrimitiveDateTime),
    Constraint(ConstraintType),
    EstimateKind(EstimateKind),
    Risk(RiskLevel),
    Percent(i32),
    Money(i64),
    Resource(Option<ResourceId>),
}

impl Value {
    /// The text payload, for values that carry one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}
