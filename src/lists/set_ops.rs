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

//! Row-aligned intersect, union and difference of two list columns.

use std::fmt;

use arrow::array::{Array, ArrayRef, GenericListArray, OffsetSizeTrait};

use super::distinct::{RowSet, list_field, validate_list};
use super::hash::operation_seed;
use super::rebuild::{Pick, RowOutput, plan_rows, rebuild_list};
use super::shape::{align_to, merge_fields, merge_types, same_shape};
use super::validity::push_down_nulls;
use super::view::ValueView;
use crate::common::types::{EqualityPolicy, SetOpError};

const LHS: usize = 0;
const RHS: usize = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SetOp {
    Intersect,
    Union,
    Difference,
}

impl SetOp {
    pub(crate) fn name(self) -> &'static str {
        match self {
            SetOp::Intersect => "intersect_distinct",
            SetOp::Union => "union_distinct",
            SetOp::Difference => "difference_distinct",
        }
    }
}

impl fmt::Display for SetOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Checks that `lhs` and `rhs` can be combined row by row.
pub(crate) fn check_operands(lhs: &dyn Array, rhs: &dyn Array) -> Result<(), SetOpError> {
    if lhs.len() != rhs.len() {
        return Err(SetOpError::ShapeMismatch(format!(
            "row count {} vs {}",
            lhs.len(),
            rhs.len()
        )));
    }
    if !same_shape(lhs.data_type(), rhs.data_type()) {
        return Err(SetOpError::ShapeMismatch(format!(
            "element type {:?} vs {:?}",
            lhs.data_type(),
            rhs.data_type()
        )));
    }
    Ok(())
}

pub(crate) fn combine_lists<O: OffsetSizeTrait>(
    op: SetOp,
    lhs: &GenericListArray<O>,
    rhs: &GenericListArray<O>,
    policy: EqualityPolicy,
) -> Result<ArrayRef, SetOpError> {
    check_operands(lhs, rhs)?;
    validate_list(lhs)?;
    validate_list(rhs)?;
    let field = merge_fields(&list_field(lhs.data_type())?, &list_field(rhs.data_type())?);

    let lview = ValueView::try_new(lhs)?;
    let rview = ValueView::try_new(rhs)?;
    let (Some((l_offsets, l_elems)), Some((r_offsets, r_elems))) =
        (lview.as_list(), rview.as_list())
    else {
        return Err(SetOpError::InvalidInput(format!(
            "{} expects list columns",
            op
        )));
    };
    let seed = operation_seed();

    let rows = plan_rows(op.name(), lhs.len(), |row| {
        if lview.is_null(row) || rview.is_null(row) {
            return RowOutput::null();
        }
        let l_range = l_offsets.range(row);
        let r_range = r_offsets.range(row);
        match op {
            SetOp::Intersect | SetOp::Difference => {
                let (_, l_reps) = RowSet::from_range(l_elems, l_range, policy, seed);
                let (r_set, _) = RowSet::from_range(r_elems, r_range, policy, seed);
                let keep_matched = op == SetOp::Intersect;
                let picks = l_reps
                    .into_iter()
                    .filter(|&idx| r_set.contains(l_elems, idx) == keep_matched)
                    .map(|idx| Pick::new(LHS, idx))
                    .collect();
                RowOutput::valid(picks)
            }
            SetOp::Union => {
                let (l_set, l_reps) = RowSet::from_range(l_elems, l_range, policy, seed);
                let (_, r_reps) = RowSet::from_range(r_elems, r_range, policy, seed);
                let mut picks = l_reps
                    .into_iter()
                    .map(|idx| Pick::new(LHS, idx))
                    .collect::<Vec<_>>();
                picks.extend(
                    r_reps
                        .into_iter()
                        .filter(|&idx| !l_set.contains(r_elems, idx))
                        .map(|idx| Pick::new(RHS, idx)),
                );
                RowOutput::valid(picks)
            }
        }
    });

    let l_values = push_down_nulls(lhs.values())?;
    let sources = match op {
        SetOp::Intersect | SetOp::Difference => vec![l_values],
        SetOp::Union => {
            let r_values = push_down_nulls(rhs.values())?;
            let target = merge_types(l_values.data_type(), r_values.data_type());
            vec![align_to(&l_values, &target)?, align_to(&r_values, &target)?]
        }
    };
    rebuild_list::<O>(&field, &sources, &rows)
}
