// EMR Log Analyser - core/filter.rs
//
// Exact-match field filters over record sets.
// Multiple predicates are applied by chaining, which makes them AND-combined.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::{AccessLogRecord, AppLogRecord, LogFamily, RecordSet};
use crate::util::error::SelectionError;
use std::fmt;
use std::str::FromStr;

/// A record field that can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    /// Access log: client address.
    ClientAddress,
    /// Access log: request path.
    RequestPath,
    /// Access log: status code.
    StatusCode,
    /// App log: severity level.
    Level,
    /// App log: thread name.
    Thread,
    /// App log: class identifier.
    Class,
}

impl FilterField {
    /// Every field, access-log fields first.
    pub fn all() -> &'static [FilterField] {
        &[
            FilterField::ClientAddress,
            FilterField::RequestPath,
            FilterField::StatusCode,
            FilterField::Level,
            FilterField::Thread,
            FilterField::Class,
        ]
    }

    /// Flag name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            FilterField::ClientAddress => "ip",
            FilterField::RequestPath => "path",
            FilterField::StatusCode => "status",
            FilterField::Level => "level",
            FilterField::Thread => "thread",
            FilterField::Class => "class",
        }
    }

    /// The log family whose records carry this field.
    pub fn family(&self) -> LogFamily {
        match self {
            FilterField::ClientAddress | FilterField::RequestPath | FilterField::StatusCode => {
                LogFamily::Apache
            }
            FilterField::Level | FilterField::Thread | FilterField::Class => LogFamily::Catalina,
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterField {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterField::all()
            .iter()
            .copied()
            .find(|field| field.name() == s)
            .ok_or_else(|| SelectionError::UnknownField {
                value: s.to_string(),
            })
    }
}

/// Records that expose filterable fields.
pub trait Filterable {
    /// Family whose fields this record type carries.
    const FAMILY: LogFamily;

    /// Value of `field`, or `None` if this record type has no such field.
    fn field_value(&self, field: FilterField) -> Option<&str>;
}

impl Filterable for AccessLogRecord {
    const FAMILY: LogFamily = LogFamily::Apache;

    fn field_value(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::ClientAddress => Some(self.client_address.as_str()),
            FilterField::RequestPath => Some(self.path.as_str()),
            FilterField::StatusCode => Some(self.status.as_str()),
            _ => None,
        }
    }
}

impl Filterable for AppLogRecord {
    const FAMILY: LogFamily = LogFamily::Catalina;

    fn field_value(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Level => Some(self.level.as_str()),
            FilterField::Thread => Some(self.thread_name()),
            FilterField::Class => Some(self.class.as_str()),
            _ => None,
        }
    }
}

fn check_supported(field: FilterField, family: LogFamily) -> Result<(), SelectionError> {
    if field.family() == family {
        Ok(())
    } else {
        Err(SelectionError::FieldNotSupported { field, family })
    }
}

/// Return the records whose `field` equals `value` exactly (case-sensitive),
/// preserving their relative order. The input is left untouched.
///
/// A value that no record carries yields an empty set. A field that the
/// record type does not have is an `InvalidSelection`.
pub fn filter_by_field<R>(
    records: &[R],
    field: FilterField,
    value: &str,
) -> Result<RecordSet<R>, SelectionError>
where
    R: Filterable + Clone,
{
    check_supported(field, R::FAMILY)?;

    Ok(records
        .iter()
        .filter(|record| record.field_value(field) == Some(value))
        .cloned()
        .collect())
}

/// An ordered list of field predicates, applied one after another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    predicates: Vec<(FilterField, String)>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate. An empty value means "do not filter on this field"
    /// and is ignored.
    pub fn with(mut self, field: FilterField, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.predicates.push((field, value));
        }
        self
    }

    /// Returns true if no predicates are active.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn predicates(&self) -> &[(FilterField, String)] {
        &self.predicates
    }

    /// Check every predicate against `family` without touching any records.
    pub fn validate(&self, family: LogFamily) -> Result<(), SelectionError> {
        self.predicates
            .iter()
            .try_for_each(|(field, _)| check_supported(*field, family))
    }

    /// Apply each predicate in order, each narrowing the previous result.
    ///
    /// Takes the set by value and filters it in place; surviving records
    /// keep their relative order.
    pub fn apply<R>(&self, mut records: RecordSet<R>) -> Result<RecordSet<R>, SelectionError>
    where
        R: Filterable,
    {
        self.validate(R::FAMILY)?;

        for (field, value) in &self.predicates {
            let before = records.len();
            records.retain(|record| record.field_value(*field) == Some(value.as_str()));
            tracing::debug!(
                field = field.name(),
                value = %value,
                before,
                after = records.len(),
                "Filter applied"
            );
        }
        Ok(records)
    }
}
