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

use arrow::array::{
    Array, ArrayRef, AsArray, Int32Array, ListArray, StringArray, StructArray,
};
use arrow::datatypes::{DataType, Field, Fields, Float64Type, Int32Type};
use arrow_buffer::{NullBuffer, OffsetBuffer};

pub(crate) fn int32_list(rows: Vec<Option<Vec<Option<i32>>>>) -> ArrayRef {
    Arc::new(ListArray::from_iter_primitive::<Int32Type, _, _>(rows))
}

pub(crate) fn float64_list(rows: Vec<Option<Vec<Option<f64>>>>) -> ArrayRef {
    Arc::new(ListArray::from_iter_primitive::<Float64Type, _, _>(rows))
}

/// Elements of one row of an `Int32` list column.
pub(crate) fn row_i32s(list: &ArrayRef, row: usize) -> Vec<Option<i32>> {
    let value = list.as_list::<i32>().value(row);
    value.as_primitive::<Int32Type>().iter().collect()
}

pub(crate) fn row_f64s(list: &ArrayRef, row: usize) -> Vec<Option<f64>> {
    let value = list.as_list::<i32>().value(row);
    value.as_primitive::<Float64Type>().iter().collect()
}

pub(crate) fn sorted<T: Ord>(mut values: Vec<T>) -> Vec<T> {
    values.sort();
    values
}

/// One row holding `struct{inner: struct{id: int32, name: utf8}}` values.
/// The inner struct is null at child position 1 while its fields there
/// are valid.
pub(crate) fn nested_struct_list() -> ArrayRef {
    let inner_fields = Fields::from(vec![
        Field::new("id", DataType::Int32, true),
        Field::new("name", DataType::Utf8, true),
    ]);
    let inner = StructArray::new(
        inner_fields.clone(),
        vec![
            Arc::new(Int32Array::from(vec![1, 2, 3])) as ArrayRef,
            Arc::new(StringArray::from(vec!["Banana", "Apple", "Cherry"])) as ArrayRef,
        ],
        Some(NullBuffer::from(vec![true, false, true])),
    );
    let outer_fields = Fields::from(vec![Field::new(
        "inner",
        DataType::Struct(inner_fields),
        true,
    )]);
    let outer = StructArray::new(outer_fields.clone(), vec![Arc::new(inner) as ArrayRef], None);
    let field = Arc::new(Field::new("item", DataType::Struct(outer_fields), true));
    Arc::new(ListArray::new(
        field,
        OffsetBuffer::from_lengths([3]),
        Arc::new(outer),
        None,
    ))
}

/// One row `[{0, [1]}, {1, [0, 2]}, {3, [3, 4, 5]}, {1, [0, 2]}]` of
/// `struct{a: int32, b: list<int32>}`.
pub(crate) fn struct_of_lists_list() -> ArrayRef {
    let b = int32_list(vec![
        Some(vec![Some(1)]),
        Some(vec![Some(0), Some(2)]),
        Some(vec![Some(3), Some(4), Some(5)]),
        Some(vec![Some(0), Some(2)]),
    ]);
    let fields = Fields::from(vec![
        Field::new("a", DataType::Int32, true),
        Field::new("b", b.data_type().clone(), true),
    ]);
    let structs = StructArray::new(
        fields.clone(),
        vec![Arc::new(Int32Array::from(vec![0, 1, 3, 1])) as ArrayRef, b],
        None,
    );
    let field = Arc::new(Field::new("item", DataType::Struct(fields), true));
    Arc::new(ListArray::new(
        field,
        OffsetBuffer::from_lengths([4]),
        Arc::new(structs),
        None,
    ))
}
