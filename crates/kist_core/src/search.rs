//! The comparison-operator search model.

use kist_codec::FieldValue;
use std::cmp::Ordering;

/// The comparison operators a search can apply.
///
/// `Prefix`, `Suffix`, and `Contains` are defined for text values only;
/// the ordering operators cover every type that orders (numbers,
/// timestamps, text, and byte payloads).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompOp {
    /// Exact equality.
    #[default]
    Equals,
    /// Strictly less than.
    LessThan,
    /// Less than or equal.
    LessThanEquals,
    /// Strictly greater than.
    GreaterThan,
    /// Greater than or equal.
    GreaterThanEquals,
    /// Text starts with the target.
    Prefix,
    /// Text ends with the target.
    Suffix,
    /// Text contains the target.
    Contains,
}

impl CompOp {
    /// Applies this operator to a candidate value against a target.
    ///
    /// Values of different types never match, and neither do float
    /// comparisons involving NaN. The string operators answer `false` for
    /// non-text values.
    #[must_use]
    pub fn matches(self, candidate: &FieldValue, target: &FieldValue) -> bool {
        match self {
            CompOp::Equals => candidate.compare(target) == Some(Ordering::Equal),
            CompOp::LessThan => candidate.compare(target) == Some(Ordering::Less),
            CompOp::LessThanEquals => matches!(
                candidate.compare(target),
                Some(Ordering::Less | Ordering::Equal)
            ),
            CompOp::GreaterThan => candidate.compare(target) == Some(Ordering::Greater),
            CompOp::GreaterThanEquals => matches!(
                candidate.compare(target),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            CompOp::Prefix => match (candidate.as_text(), target.as_text()) {
                (Some(c), Some(t)) => c.starts_with(t),
                _ => false,
            },
            CompOp::Suffix => match (candidate.as_text(), target.as_text()) {
                (Some(c), Some(t)) => c.ends_with(t),
                _ => false,
            },
            CompOp::Contains => match (candidate.as_text(), target.as_text()) {
                (Some(c), Some(t)) => c.contains(t),
                _ => false,
            },
        }
    }
}

/// The options application code can specify for a search.
///
/// Not every entity type need honor every option, but the table search
/// honors them all.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Operator the predicate should apply.
    pub operator: CompOp,
    /// Key where the search begins. If that key is absent from the store,
    /// iteration begins at the first key greater than it. Zero starts at
    /// the first key.
    pub start_at: u64,
    /// Maximum number of results to collect; zero for unlimited.
    pub limit: u64,
    /// IDs of the fields to decode and make available to the predicate.
    /// Judicious use of this speeds searches up considerably, particularly
    /// for large entities. Empty decodes the entire record, which is the
    /// expensive path.
    pub fields: Vec<u8>,
}
