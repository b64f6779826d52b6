use std::cmp::Ordering;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::engine::rollup::dedup::UniquePing;
use crate::engine::rollup::spec::{AggKind, ColumnSpec, CountPredicate};
use crate::engine::types::ScalarValue;
use crate::shared::datetime::TimezoneContract;

/// Per-group facts an aggregator may consult while updating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupContext {
    pub activity_date: NaiveDate,
    pub contract: TimezoneContract,
}

/// Aggregator enum with concrete implementations per kind
#[derive(Debug, Clone, PartialEq)]
pub enum AggregatorImpl {
    Sum(Sum),
    Mean(Mean),
    Max(Max),
    FirstSkipNull(FirstSkipNull),
    Count(Count),
}

impl AggregatorImpl {
    pub fn from_spec(spec: &ColumnSpec) -> Self {
        let field = spec.source.clone();
        match spec.kind {
            AggKind::Sum => Self::Sum(Sum::new(field)),
            AggKind::Mean => Self::Mean(Mean::new(field)),
            AggKind::Max => Self::Max(Max::new(field)),
            AggKind::FirstSkipNull => Self::FirstSkipNull(FirstSkipNull::new(field)),
            AggKind::Count(predicate) => Self::Count(Count::new(field, predicate)),
        }
    }

    /// Update aggregator with one ping of the group
    pub fn update(&mut self, ping: &UniquePing, ctx: &GroupContext) {
        match self {
            AggregatorImpl::Sum(a) => a.update_value(ping.ping.get(&a.field)),
            AggregatorImpl::Mean(a) => a.update_value(ping.ping.get(&a.field)),
            AggregatorImpl::Max(a) => a.update_value(ping.ping.get(&a.field)),
            AggregatorImpl::FirstSkipNull(a) => a.update(ping),
            AggregatorImpl::Count(a) => a.update(ping, ctx),
        }
    }

    /// Merge another aggregator of the same variant
    pub fn merge(&mut self, other: &AggregatorImpl) {
        match (self, other) {
            (AggregatorImpl::Sum(a), AggregatorImpl::Sum(b)) => a.merge(b),
            (AggregatorImpl::Mean(a), AggregatorImpl::Mean(b)) => a.merge(b),
            (AggregatorImpl::Max(a), AggregatorImpl::Max(b)) => a.merge(b),
            (AggregatorImpl::FirstSkipNull(a), AggregatorImpl::FirstSkipNull(b)) => a.merge(b),
            (AggregatorImpl::Count(a), AggregatorImpl::Count(b)) => a.merge(b),
            _ => {}
        }
    }

    pub fn finalize(&self) -> ScalarValue {
        match self {
            AggregatorImpl::Sum(a) => a.finalize(),
            AggregatorImpl::Mean(a) => a.finalize(),
            AggregatorImpl::Max(a) => a.finalize(),
            AggregatorImpl::FirstSkipNull(a) => a.finalize(),
            AggregatorImpl::Count(a) => a.finalize(),
        }
    }
}

/// Integer inputs sum exactly; any float input turns the result into a float.
#[derive(Debug, Clone, PartialEq)]
pub struct Sum {
    pub field: String,
    int_sum: i64,
    float_sum: f64,
    saw_float: bool,
    non_null: u64,
}

impl Sum {
    pub fn new(field: String) -> Self {
        Self {
            field,
            int_sum: 0,
            float_sum: 0.0,
            saw_float: false,
            non_null: 0,
        }
    }

    pub fn update_value(&mut self, value: &ScalarValue) {
        match value {
            ScalarValue::Int64(i) => {
                self.int_sum = self.int_sum.saturating_add(*i);
                self.non_null += 1;
            }
            ScalarValue::Float64(f) => {
                self.float_sum += f;
                self.saw_float = true;
                self.non_null += 1;
            }
            _ => {}
        }
    }

    pub fn merge(&mut self, other: &Sum) {
        self.int_sum = self.int_sum.saturating_add(other.int_sum);
        self.float_sum += other.float_sum;
        self.saw_float |= other.saw_float;
        self.non_null += other.non_null;
    }

    pub fn finalize(&self) -> ScalarValue {
        if self.non_null == 0 {
            ScalarValue::Null
        } else if self.saw_float {
            ScalarValue::Float64(self.int_sum as f64 + self.float_sum)
        } else {
            ScalarValue::Int64(self.int_sum)
        }
    }
}

/// Arithmetic mean over non-null values; nulls do not enter the denominator.
#[derive(Debug, Clone, PartialEq)]
pub struct Mean {
    pub field: String,
    int_sum: i128,
    float_sum: f64,
    count: u64,
}

impl Mean {
    pub fn new(field: String) -> Self {
        Self {
            field,
            int_sum: 0,
            float_sum: 0.0,
            count: 0,
        }
    }

    pub fn update_value(&mut self, value: &ScalarValue) {
        match value {
            ScalarValue::Int64(i) => {
                self.int_sum += *i as i128;
                self.count += 1;
            }
            ScalarValue::Float64(f) => {
                self.float_sum += f;
                self.count += 1;
            }
            _ => {}
        }
    }

    pub fn merge(&mut self, other: &Mean) {
        self.int_sum += other.int_sum;
        self.float_sum += other.float_sum;
        self.count += other.count;
    }

    pub fn finalize(&self) -> ScalarValue {
        if self.count == 0 {
            return ScalarValue::Null;
        }
        let total = self.int_sum as f64 + self.float_sum;
        ScalarValue::Float64(total / self.count as f64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Max {
    pub field: String,
    max: Option<ScalarValue>,
}

impl Max {
    pub fn new(field: String) -> Self {
        Self { field, max: None }
    }

    pub fn update_value(&mut self, value: &ScalarValue) {
        if value.is_null() {
            return;
        }
        let replace = match &self.max {
            Some(current) => value.compare(current) == Ordering::Greater,
            None => true,
        };
        if replace {
            self.max = Some(value.clone());
        }
    }

    pub fn merge(&mut self, other: &Max) {
        if let Some(v) = &other.max {
            self.update_value(v);
        }
    }

    pub fn finalize(&self) -> ScalarValue {
        self.max.clone().unwrap_or(ScalarValue::Null)
    }
}

/// Value from the earliest ping (by subsession start, then fingerprint)
/// that has a non-null value. The order key makes the choice independent of
/// update and merge order.
#[derive(Debug, Clone, PartialEq)]
pub struct FirstSkipNull {
    pub field: String,
    best: Option<(i64, Arc<str>, ScalarValue)>,
}

impl FirstSkipNull {
    pub fn new(field: String) -> Self {
        Self { field, best: None }
    }

    pub fn update(&mut self, ping: &UniquePing) {
        let value = ping.ping.get(&self.field);
        if value.is_null() {
            return;
        }
        self.offer(ping.ping.subsession_start, &ping.fingerprint, value);
    }

    fn offer(&mut self, start: i64, fingerprint: &Arc<str>, value: &ScalarValue) {
        let earlier = match &self.best {
            Some((best_start, best_fp, _)) => {
                (start, fingerprint.as_ref()) < (*best_start, best_fp.as_ref())
            }
            None => true,
        };
        if earlier {
            self.best = Some((start, Arc::clone(fingerprint), value.clone()));
        }
    }

    pub fn merge(&mut self, other: &FirstSkipNull) {
        if let Some((start, fingerprint, value)) = &other.best {
            self.offer(*start, fingerprint, value);
        }
    }

    pub fn finalize(&self) -> ScalarValue {
        match &self.best {
            Some((_, _, value)) => value.clone(),
            None => ScalarValue::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Count {
    pub field: String,
    predicate: CountPredicate,
    count: i64,
}

impl Count {
    pub fn new(field: String, predicate: CountPredicate) -> Self {
        Self {
            field,
            predicate,
            count: 0,
        }
    }

    pub fn update(&mut self, ping: &UniquePing, ctx: &GroupContext) {
        let value = ping.ping.get(&self.field);
        let qualifies = match self.predicate {
            CountPredicate::NonNull => !value.is_null(),
            CountPredicate::OnActivityDate => match value {
                ScalarValue::Timestamp(ts, offset) => {
                    ctx.contract.date_of_recorded(*ts, *offset) == Some(ctx.activity_date)
                }
                _ => false,
            },
        };
        if qualifies {
            self.count += 1;
        }
    }

    pub fn merge(&mut self, other: &Count) {
        self.count += other.count;
    }

    pub fn finalize(&self) -> ScalarValue {
        ScalarValue::Int64(self.count)
    }
}
