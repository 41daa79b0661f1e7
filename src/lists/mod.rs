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

//! Per-row set algebra over list columns.
//!
//! Every operation treats each row of a list column as a set of elements
//! under an [`EqualityPolicy`]. Element order inside an output row is not
//! part of the contract; call [`sort_lists`] before comparing results.

pub mod comparator;
mod distinct;
mod hash;
mod rebuild;
mod set_ops;
mod shape;
mod sort;
pub mod validity;
mod view;

#[cfg(test)]
mod test_utils;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::DataType;

use crate::common::logging::debug;
use crate::common::types::{
    EqualityPolicy, NanEquality, NullEquality, NullOrder, SetOpError, SortOrder,
};
use set_ops::{SetOp, check_operands, combine_lists};

pub use view::ValueView;

/// Reduces every row to one element per equivalence class.
pub fn distinct(
    list: &dyn Array,
    nulls: NullEquality,
    nans: NanEquality,
) -> Result<ArrayRef, SetOpError> {
    let policy = EqualityPolicy::new(nulls, nans);
    debug!(op = "distinct", rows = list.len(), %policy, "list set operation");
    match list.data_type() {
        DataType::List(_) => distinct::distinct_list(list.as_list::<i32>(), policy),
        DataType::LargeList(_) => distinct::distinct_list(list.as_list::<i64>(), policy),
        other => Err(not_a_list("distinct", other)),
    }
}

/// Elements present in both rows, one per equivalence class.
pub fn intersect_distinct(
    lhs: &dyn Array,
    rhs: &dyn Array,
    nulls: NullEquality,
    nans: NanEquality,
) -> Result<ArrayRef, SetOpError> {
    combine(SetOp::Intersect, lhs, rhs, EqualityPolicy::new(nulls, nans))
}

/// Elements present in either row, one per equivalence class.
pub fn union_distinct(
    lhs: &dyn Array,
    rhs: &dyn Array,
    nulls: NullEquality,
    nans: NanEquality,
) -> Result<ArrayRef, SetOpError> {
    combine(SetOp::Union, lhs, rhs, EqualityPolicy::new(nulls, nans))
}

/// Elements of the `lhs` row not matched by any element of the `rhs` row.
pub fn difference_distinct(
    lhs: &dyn Array,
    rhs: &dyn Array,
    nulls: NullEquality,
    nans: NanEquality,
) -> Result<ArrayRef, SetOpError> {
    combine(SetOp::Difference, lhs, rhs, EqualityPolicy::new(nulls, nans))
}

/// Sorts the elements of every row.
pub fn sort_lists(
    list: &dyn Array,
    order: SortOrder,
    null_order: NullOrder,
) -> Result<ArrayRef, SetOpError> {
    debug!(
        op = "sort_lists",
        rows = list.len(),
        ?order,
        ?null_order,
        "list set operation"
    );
    match list.data_type() {
        DataType::List(_) => sort::sort_list(list.as_list::<i32>(), order, null_order),
        DataType::LargeList(_) => sort::sort_list(list.as_list::<i64>(), order, null_order),
        other => Err(not_a_list("sort_lists", other)),
    }
}

fn combine(
    op: SetOp,
    lhs: &dyn Array,
    rhs: &dyn Array,
    policy: EqualityPolicy,
) -> Result<ArrayRef, SetOpError> {
    debug!(op = op.name(), rows = lhs.len(), %policy, "list set operation");
    check_operands(lhs, rhs)?;
    match lhs.data_type() {
        DataType::List(_) => {
            combine_lists(op, lhs.as_list::<i32>(), rhs.as_list::<i32>(), policy)
        }
        DataType::LargeList(_) => {
            combine_lists(op, lhs.as_list::<i64>(), rhs.as_list::<i64>(), policy)
        }
        other => Err(not_a_list(op.name(), other)),
    }
}

fn not_a_list(op: &str, data_type: &DataType) -> SetOpError {
    SetOpError::InvalidInput(format!("{} expects a list column, got {:?}", op, data_type))
}
