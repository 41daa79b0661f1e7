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

//! Materializes per-row element selections into a new list column.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, GenericListArray, OffsetSizeTrait, make_array};
use arrow::datatypes::FieldRef;
use arrow_buffer::{NullBufferBuilder, OffsetBuffer};
use arrow_data::transform::MutableArrayData;
use rayon::prelude::*;

use super::validity::retyped_field;
use crate::common::config::{set_ops_parallel, set_ops_parallel_min_rows};
use crate::common::logging::trace;
use crate::common::types::SetOpError;

/// One surviving element: position `index` of child column `source`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Pick {
    pub source: usize,
    pub index: usize,
}

impl Pick {
    pub(crate) fn new(source: usize, index: usize) -> Self {
        Self { source, index }
    }
}

/// The planned content of one output row.
#[derive(Clone, Debug, Default)]
pub(crate) struct RowOutput {
    pub valid: bool,
    pub picks: Vec<Pick>,
}

impl RowOutput {
    pub(crate) fn null() -> Self {
        Self {
            valid: false,
            picks: Vec::new(),
        }
    }

    pub(crate) fn valid(picks: Vec<Pick>) -> Self {
        Self { valid: true, picks }
    }
}

/// Runs `plan` for every row, on the rayon pool when enabled and the column
/// is large enough. The result is in row order in both modes.
pub(crate) fn plan_rows<F>(op: &str, num_rows: usize, plan: F) -> Vec<RowOutput>
where
    F: Fn(usize) -> RowOutput + Sync + Send,
{
    let parallel = set_ops_parallel() && num_rows >= set_ops_parallel_min_rows().max(1);
    trace!(op, num_rows, parallel, "plan list rows");
    if parallel {
        (0..num_rows).into_par_iter().map(plan).collect()
    } else {
        (0..num_rows).map(plan).collect()
    }
}

/// Builds a list column from planned rows.
///
/// Every source must already carry the data type of the output child;
/// `field` supplies the element field name and metadata. Null rows are
/// emitted with zero length.
pub(crate) fn rebuild_list<O: OffsetSizeTrait>(
    field: &FieldRef,
    sources: &[ArrayRef],
    rows: &[RowOutput],
) -> Result<ArrayRef, SetOpError> {
    let total: usize = rows.iter().filter(|r| r.valid).map(|r| r.picks.len()).sum();
    // reject before allocating the child
    if O::from_usize(total).is_none() {
        return Err(SetOpError::OffsetOverflow);
    }

    let source_data = sources.iter().map(|s| s.to_data()).collect::<Vec<_>>();
    let source_refs = source_data.iter().collect::<Vec<_>>();
    let mut mutable = MutableArrayData::new(source_refs, false, total);

    let mut offsets = Vec::with_capacity(rows.len() + 1);
    offsets.push(O::usize_as(0));
    let mut current = 0usize;
    let mut null_builder = NullBufferBuilder::new(rows.len());

    for row in rows {
        if row.valid {
            extend_runs(&mut mutable, &row.picks);
            current += row.picks.len();
            null_builder.append_non_null();
        } else {
            null_builder.append_null();
        }
        offsets.push(O::from_usize(current).ok_or(SetOpError::OffsetOverflow)?);
    }

    let values = make_array(mutable.freeze());
    let field = retyped_field(field, &values);
    let out = GenericListArray::<O>::try_new(
        field,
        OffsetBuffer::new(offsets.into()),
        values,
        null_builder.finish(),
    )?;
    Ok(Arc::new(out) as ArrayRef)
}

/// Copies picks, coalescing adjacent positions of one source into a
/// single slice copy.
fn extend_runs(mutable: &mut MutableArrayData<'_>, picks: &[Pick]) {
    let mut iter = picks.iter();
    let Some(first) = iter.next() else {
        return;
    };
    let (mut source, mut start, mut end) = (first.source, first.index, first.index + 1);
    for pick in iter {
        if pick.source == source && pick.index == end {
            end += 1;
            continue;
        }
        mutable.extend(source, start, end);
        (source, start, end) = (pick.source, pick.index, pick.index + 1);
    }
    mutable.extend(source, start, end);
}
