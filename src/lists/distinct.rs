// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Per-row deduplication of list elements.

use std::ops::Range;

use arrow::array::{Array, ArrayRef, GenericListArray, OffsetSizeTrait};
use arrow::datatypes::{DataType, FieldRef};
use hashbrown::HashTable;

use super::comparator::{equal, hash_value};
use super::hash::operation_seed;
use super::rebuild::{Pick, RowOutput, plan_rows, rebuild_list};
use super::validity::push_down_nulls;
use super::view::ValueView;
use crate::common::types::{EqualityPolicy, SetOpError};

/// Representatives of the equivalence classes seen so far in one row.
///
/// Buckets hold `(element index, hash)`; colliding hashes fall back to
/// [`equal`], so an element that is unequal to itself (a null or NaN under
/// an `Unequal` policy) always forms a class of its own.
pub(crate) struct RowSet<'v, 'a> {
    view: &'v ValueView<'a>,
    table: HashTable<(usize, u64)>,
    policy: EqualityPolicy,
    seed: u64,
}

impl<'v, 'a> RowSet<'v, 'a> {
    pub(crate) fn new(
        view: &'v ValueView<'a>,
        capacity: usize,
        policy: EqualityPolicy,
        seed: u64,
    ) -> Self {
        Self {
            view,
            table: HashTable::with_capacity(capacity),
            policy,
            seed,
        }
    }

    /// Builds the set of classes over `range`, returning it together with
    /// the first element of every class in input order.
    pub(crate) fn from_range(
        view: &'v ValueView<'a>,
        range: Range<usize>,
        policy: EqualityPolicy,
        seed: u64,
    ) -> (Self, Vec<usize>) {
        let mut set = Self::new(view, range.len(), policy, seed);
        let reps = range.filter(|&idx| set.insert(idx)).collect();
        (set, reps)
    }

    /// Adds `idx` unless an equal element is already present. Returns
    /// whether it was added.
    pub(crate) fn insert(&mut self, idx: usize) -> bool {
        let hash = hash_value(self.view, idx, self.seed);
        let (view, policy) = (self.view, self.policy);
        if self
            .table
            .find(hash, |&(j, _)| equal(view, j, view, idx, policy))
            .is_some()
        {
            return false;
        }
        self.table.insert_unique(hash, (idx, hash), |&(_, h)| h);
        true
    }

    /// Whether some member is equal to `other[idx]`.
    pub(crate) fn contains(&self, other: &ValueView<'_>, idx: usize) -> bool {
        let hash = hash_value(other, idx, self.seed);
        self.table
            .find(hash, |&(j, _)| equal(self.view, j, other, idx, self.policy))
            .is_some()
    }
}

pub(crate) fn distinct_list<O: OffsetSizeTrait>(
    list: &GenericListArray<O>,
    policy: EqualityPolicy,
) -> Result<ArrayRef, SetOpError> {
    validate_list(list)?;
    let field = list_field(list.data_type())?;
    let view = ValueView::try_new(list)?;
    let (offsets, elements) = view
        .as_list()
        .ok_or_else(|| SetOpError::InvalidInput("distinct expects a list column".to_string()))?;
    let seed = operation_seed();

    let rows = plan_rows("distinct", list.len(), |row| {
        if view.is_null(row) {
            return RowOutput::null();
        }
        let (_, reps) = RowSet::from_range(elements, offsets.range(row), policy, seed);
        RowOutput::valid(reps.into_iter().map(|idx| Pick::new(0, idx)).collect())
    });

    let values = push_down_nulls(list.values())?;
    rebuild_list::<O>(&field, &[values], &rows)
}

/// Element field of a list type.
pub(crate) fn list_field(data_type: &DataType) -> Result<FieldRef, SetOpError> {
    match data_type {
        DataType::List(field) | DataType::LargeList(field) => Ok(field.clone()),
        other => Err(SetOpError::InvalidInput(format!(
            "expected a list column, got {:?}",
            other
        ))),
    }
}

/// Checks the offsets invariants: non-decreasing, and within the child.
pub(crate) fn validate_list<O: OffsetSizeTrait>(
    list: &GenericListArray<O>,
) -> Result<(), SetOpError> {
    validate_offsets(list.value_offsets(), list.values().len())
}

fn validate_offsets<O: OffsetSizeTrait>(offsets: &[O], child_len: usize) -> Result<(), SetOpError> {
    if let Some(first) = offsets.first()
        && first.as_usize() > child_len
    {
        return Err(SetOpError::InvalidInput(format!(
            "first offset {} is past child length {}",
            first.as_usize(),
            child_len
        )));
    }
    if let Some(row) = offsets.windows(2).position(|w| w[0] > w[1]) {
        return Err(SetOpError::InvalidInput(format!(
            "offsets decrease at row {}",
            row
        )));
    }
    if let Some(last) = offsets.last()
        && last.as_usize() > child_len
    {
        return Err(SetOpError::InvalidInput(format!(
            "last offset {} exceeds child length {}",
            last.as_usize(),
            child_len
        )));
    }
    Ok(())
}
