#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use time::macros::datetime;

use crate::config::DefaultsConfig;
use crate::core::codec;
use crate::core::value::{ConstraintType, EstimateKind, RiskLevel, Role, Value};
use crate::error::PlaneditError;

/// The value type of a property. Drives which codec parses and formats it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Text,
    Duration,
    DateTime,
    Constraint,
    EstimateKind,
    Risk,
    Percent,
    Money,
    Resource,
}

impl PropertyKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Duration => "duration",
            Self::DateTime => "datetime",
            Self::Constraint => "constraint",
            Self::EstimateKind => "estimate-type",
            Self::Risk => "risk",
            Self::Percent => "percent",
            Self::Money => "money",
            Self::Resource => "resource",
        }
    }
}

pub const ALL_ROLES: &[Role] = &[Role::Raw, Role::Edit, Role::Display];

/// A registered property: identity, type, roles it answers to, and the
/// canonical value every new task starts out with. Immutable once built.
#[derive(Debug, Clone)]
pub struct PropertyDef {
    pub name: &'static str,
    pub kind: PropertyKind,
    pub default: Value,
    pub roles: &'static [Role],
}

/// The process-wide property table. Built once at startup from config
/// defaults and read-only afterwards.
#[derive(Debug, Clone)]
pub struct PropertyRegistry {
    defs: Vec<PropertyDef>,
    index: BTreeMap<&'static str, usize>,
}

impl PropertyRegistry {
    /// Builds the standard task property set. Defaults for estimate,
    /// constraint, risk and the ratio pair come from config.
    pub fn standard(defaults: &DefaultsConfig) -> Result<Self, PlaneditError> {
        let estimate = codec::parse_duration(&defaults.estimate)
            .map_err(|msg| PlaneditError::Config(format!("defaults.estimate: {msg}")))?;
        let constraint = ConstraintType::from_label(&defaults.constraint)
            .map(Value::Constraint)
            .ok_or_else(|| {
                PlaneditError::Config(format!(
                    "defaults.constraint: unknown label '{}'",
                    defaults.constraint
                ))
            })?;
        let risk = RiskLevel::from_label(&defaults.risk)
            .map(Value::Risk)
            .ok_or_else(|| {
                PlaneditError::Config(format!("defaults.risk: unknown label '{}'", defaults.risk))
            })?;

        // Unset-like states still need a canonical value: constraint
        // windows default to the epoch instant, allocation to unallocated.
        let epoch = Value::DateTime(datetime!(1970-01-01 00:00:00));

        let defs = vec![
            def("Name", PropertyKind::Text, Value::Text(String::new())),
            def("Responsible", PropertyKind::Text, Value::Text(String::new())),
            def("Allocation", PropertyKind::Resource, Value::Resource(None)),
            def("Estimate", PropertyKind::Duration, estimate),
            def(
                "EstimateType",
                PropertyKind::EstimateKind,
                Value::EstimateKind(EstimateKind::Duration),
            ),
            def("Constraint", PropertyKind::Constraint, constraint),
            def("ConstraintStart", PropertyKind::DateTime, epoch.clone()),
            def("ConstraintEnd", PropertyKind::DateTime, epoch),
            def(
                "OptimisticRatio",
                PropertyKind::Percent,
                Value::Percent(defaults.optimistic_ratio),
            ),
            def(
                "PessimisticRatio",
                PropertyKind::Percent,
                Value::Percent(defaults.pessimistic_ratio),
            ),
            def("Risk", PropertyKind::Risk, risk),
            def("StartupCost", PropertyKind::Money, Value::Money(0)),
            def("ShutdownCost", PropertyKind::Money, Value::Money(0)),
            def("Description", PropertyKind::Text, Value::Text(String::new())),
        ];

        let mut index = BTreeMap::new();
        for (i, d) in defs.iter().enumerate() {
            index.insert(d.name, i);
        }
        Ok(Self { defs, index })
    }

    pub fn resolve(&self, name: &str) -> Result<&PropertyDef, PlaneditError> {
        self.index
            .get(name)
            .map(|&i| &self.defs[i])
            .ok_or_else(|| PlaneditError::UnknownProperty(name.to_owned()))
    }

    /// Properties in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &PropertyDef> {
        self.defs.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

fn def(name: &'static str, kind: PropertyKind, default: Value) -> PropertyDef {
    PropertyDef {
        name,
        kind,
        default,
        roles: ALL_ROLES,
    }
}
