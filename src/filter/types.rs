//! Comparison type tags submitted by the filter form layer.

/// Comparison selected for a single-value date filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateType {
    GreaterEqual,
    GreaterThan,
    Equal,
    LessEqual,
    LessThan,
    Null,
    NotNull,
}

impl DateType {
    /// Numeric tag used by the form layer
    pub fn tag(self) -> i64 {
        match self {
            DateType::GreaterEqual => 1,
            DateType::GreaterThan => 2,
            DateType::Equal => 3,
            DateType::LessEqual => 4,
            DateType::LessThan => 5,
            DateType::Null => 6,
            DateType::NotNull => 7,
        }
    }

    pub fn from_tag(tag: i64) -> Option<Self> {
        match tag {
            1 => Some(DateType::GreaterEqual),
            2 => Some(DateType::GreaterThan),
            3 => Some(DateType::Equal),
            4 => Some(DateType::LessEqual),
            5 => Some(DateType::LessThan),
            6 => Some(DateType::Null),
            7 => Some(DateType::NotNull),
            _ => None,
        }
    }
}

/// Comparison selected for a date range filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateRangeType {
    Between,
    NotBetween,
}

impl DateRangeType {
    pub fn tag(self) -> i64 {
        match self {
            DateRangeType::Between => 1,
            DateRangeType::NotBetween => 2,
        }
    }

    pub fn from_tag(tag: i64) -> Option<Self> {
        match tag {
            1 => Some(DateRangeType::Between),
            2 => Some(DateRangeType::NotBetween),
            _ => None,
        }
    }
}
