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
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, GenericListArray, OffsetSizeTrait, StructArray};
use arrow::datatypes::{DataType, Field, FieldRef, Fields};

use crate::common::types::SetOpError;

/// Whether two types nest the same way. Field names and nullability are
/// ignored; leaf types must be identical.
pub(crate) fn same_shape(left: &DataType, right: &DataType) -> bool {
    match (left, right) {
        (DataType::List(l), DataType::List(r)) | (DataType::LargeList(l), DataType::LargeList(r)) => {
            same_shape(l.data_type(), r.data_type())
        }
        (DataType::Struct(l), DataType::Struct(r)) => {
            l.len() == r.len()
                && l
                    .iter()
                    .zip(r.iter())
                    .all(|(lf, rf)| same_shape(lf.data_type(), rf.data_type()))
        }
        (DataType::List(_) | DataType::LargeList(_) | DataType::Struct(_), _)
        | (_, DataType::List(_) | DataType::LargeList(_) | DataType::Struct(_)) => false,
        _ => left == right,
    }
}

/// The common type of two same-shaped types: names and metadata follow
/// `left`, every field is nullable when either side's field is.
pub(crate) fn merge_types(left: &DataType, right: &DataType) -> DataType {
    match (left, right) {
        (DataType::List(l), DataType::List(r)) => DataType::List(merge_fields(l, r)),
        (DataType::LargeList(l), DataType::LargeList(r)) => DataType::LargeList(merge_fields(l, r)),
        (DataType::Struct(l), DataType::Struct(r)) => DataType::Struct(
            l.iter()
                .zip(r.iter())
                .map(|(lf, rf)| merge_fields(lf, rf))
                .collect::<Fields>(),
        ),
        _ => left.clone(),
    }
}

pub(crate) fn merge_fields(left: &FieldRef, right: &FieldRef) -> FieldRef {
    let data_type = merge_types(left.data_type(), right.data_type());
    let nullable = left.is_nullable() || right.is_nullable();
    if &data_type == left.data_type() && nullable == left.is_nullable() {
        return left.clone();
    }
    Arc::new(
        Field::new(left.name(), data_type, nullable).with_metadata(left.metadata().clone()),
    )
}

/// Relabels `array` with `target`, a type of the same shape that differs at
/// most in field names and nullability. Buffers are shared, not copied.
pub(crate) fn align_to(array: &ArrayRef, target: &DataType) -> Result<ArrayRef, SetOpError> {
    if array.data_type() == target {
        return Ok(array.clone());
    }
    match target {
        DataType::Struct(fields) => {
            let s = array.as_struct_opt().ok_or_else(|| mismatch(array, target))?;
            let children = s
                .columns()
                .iter()
                .zip(fields.iter())
                .map(|(c, f)| align_to(c, f.data_type()))
                .collect::<Result<Vec<_>, _>>()?;
            let out = StructArray::try_new(fields.clone(), children, s.nulls().cloned())?;
            Ok(Arc::new(out))
        }
        DataType::List(field) => {
            let list = array.as_list_opt::<i32>().ok_or_else(|| mismatch(array, target))?;
            align_list(list, field)
        }
        DataType::LargeList(field) => {
            let list = array.as_list_opt::<i64>().ok_or_else(|| mismatch(array, target))?;
            align_list(list, field)
        }
        _ => Err(mismatch(array, target)),
    }
}

fn align_list<O: OffsetSizeTrait>(
    list: &GenericListArray<O>,
    field: &FieldRef,
) -> Result<ArrayRef, SetOpError> {
    let values = align_to(list.values(), field.data_type())?;
    let out = GenericListArray::<O>::try_new(
        field.clone(),
        list.offsets().clone(),
        values,
        list.nulls().cloned(),
    )?;
    Ok(Arc::new(out))
}

fn mismatch(array: &ArrayRef, target: &DataType) -> SetOpError {
    SetOpError::ShapeMismatch(format!(
        "cannot align {:?} to {:?}",
        array.data_type(),
        target
    ))
}
