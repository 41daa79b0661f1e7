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

//! Effective nullity of nested values.
//!
//! A value is effectively null when its own validity bit is unset or when
//! any enclosing list row or struct row is effectively null. Source arrays
//! are never modified: every function here returns freshly built buffers.

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, AsArray, GenericListArray, OffsetSizeTrait, StructArray, make_array,
};
use arrow::datatypes::{DataType, Field, FieldRef, Fields};
use arrow_buffer::{BooleanBufferBuilder, NullBuffer, OffsetBuffer};

use crate::common::types::SetOpError;

/// Validity of a value given its own bitmap and the bitmap inherited from
/// its ancestors (both aligned to the value's positions).
pub fn effective_nulls(
    own: Option<&NullBuffer>,
    inherited: Option<&NullBuffer>,
) -> Option<NullBuffer> {
    NullBuffer::union(own, inherited).filter(|n| n.null_count() > 0)
}

/// Projects list-row validity onto the child positions each row covers.
///
/// Child positions outside every row range are left valid; they are never
/// addressed through the list.
pub fn list_child_nulls<O: OffsetSizeTrait>(
    row_nulls: Option<&NullBuffer>,
    offsets: &OffsetBuffer<O>,
    child_len: usize,
) -> Option<NullBuffer> {
    let rows = row_nulls.filter(|n| n.null_count() > 0)?;
    let mut builder = BooleanBufferBuilder::new(child_len);
    builder.append_n(child_len, true);
    let mut cleared = 0usize;
    for (row, window) in offsets.windows(2).enumerate() {
        if rows.is_valid(row) {
            continue;
        }
        let start = window[0].as_usize().min(child_len);
        let end = window[1].as_usize().min(child_len);
        for idx in start..end {
            builder.set_bit(idx, false);
        }
        cleared += end.saturating_sub(start);
    }
    if cleared == 0 {
        return None;
    }
    Some(NullBuffer::new(builder.finish()))
}

/// Returns `array` with every nested level's validity replaced by its
/// effective validity. Levels whose validity is already effective are
/// shared with the input rather than copied.
pub fn push_down_nulls(array: &ArrayRef) -> Result<ArrayRef, SetOpError> {
    push_down(array, None)
}

fn push_down(array: &ArrayRef, inherited: Option<&NullBuffer>) -> Result<ArrayRef, SetOpError> {
    let own = array.logical_nulls();
    let effective = effective_nulls(own.as_ref(), inherited);
    let nulls_changed = null_count(effective.as_ref()) != null_count(own.as_ref());

    match array.data_type() {
        DataType::Null => Ok(array.clone()),
        DataType::Struct(fields) => {
            let s = array.as_struct();
            if fields.is_empty() {
                return Ok(array.clone());
            }
            let children = s
                .columns()
                .iter()
                .map(|c| push_down(c, effective.as_ref()))
                .collect::<Result<Vec<_>, _>>()?;
            let children_changed = children
                .iter()
                .zip(s.columns())
                .any(|(new, old)| !Arc::ptr_eq(new, old));
            if !nulls_changed && !children_changed {
                return Ok(array.clone());
            }
            let fields = fields
                .iter()
                .zip(&children)
                .map(|(f, c)| retyped_field(f, c))
                .collect::<Fields>();
            Ok(Arc::new(StructArray::try_new(fields, children, effective)?))
        }
        DataType::List(field) => push_down_list(
            array,
            array.as_list::<i32>(),
            field,
            effective,
            nulls_changed,
        ),
        DataType::LargeList(field) => push_down_list(
            array,
            array.as_list::<i64>(),
            field,
            effective,
            nulls_changed,
        ),
        _ => {
            if !nulls_changed {
                return Ok(array.clone());
            }
            let data = array.to_data().into_builder().nulls(effective).build()?;
            Ok(make_array(data))
        }
    }
}

fn push_down_list<O: OffsetSizeTrait>(
    array: &ArrayRef,
    list: &GenericListArray<O>,
    field: &FieldRef,
    effective: Option<NullBuffer>,
    nulls_changed: bool,
) -> Result<ArrayRef, SetOpError> {
    let child_nulls = list_child_nulls(effective.as_ref(), list.offsets(), list.values().len());
    let values = push_down(list.values(), child_nulls.as_ref())?;
    if !nulls_changed && Arc::ptr_eq(&values, list.values()) {
        return Ok(array.clone());
    }
    let field = retyped_field(field, &values);
    let out = GenericListArray::<O>::try_new(field, list.offsets().clone(), values, effective)?;
    Ok(Arc::new(out))
}

/// Keeps a field's name and metadata while following the child's new type
/// and nullability.
pub(crate) fn retyped_field(field: &FieldRef, child: &ArrayRef) -> FieldRef {
    let nullable = field.is_nullable() || child.null_count() > 0;
    if field.data_type() == child.data_type() && nullable == field.is_nullable() {
        return field.clone();
    }
    Arc::new(
        Field::new(field.name(), child.data_type().clone(), nullable)
            .with_metadata(field.metadata().clone()),
    )
}

fn null_count(nulls: Option<&NullBuffer>) -> usize {
    nulls.map(|n| n.null_count()).unwrap_or(0)
}
