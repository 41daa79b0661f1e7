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
use std::ops::Range;

use arrow::array::{Array, AsArray, BooleanArray, GenericListArray, OffsetSizeTrait};
use arrow::datatypes::{
    ArrowPrimitiveType, DataType, Date32Type, Date64Type, Decimal128Type, DurationMicrosecondType,
    DurationMillisecondType, DurationNanosecondType, DurationSecondType, Float16Type, Float32Type,
    Float64Type, Int8Type, Int16Type, Int32Type, Int64Type, Time32MillisecondType,
    Time32SecondType, Time64MicrosecondType, Time64NanosecondType, TimeUnit,
    TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType, UInt8Type, UInt16Type, UInt32Type, UInt64Type,
};
use arrow_buffer::NullBuffer;

use super::validity::{effective_nulls, list_child_nulls};
use crate::common::types::SetOpError;

/// A read-only, type-resolved view over one column and everything nested
/// below it, carrying the effective validity of every level.
///
/// Building the view resolves the arrow type once so that element
/// comparisons only dispatch on [`ValueKind`].
pub struct ValueView<'a> {
    nulls: Option<NullBuffer>,
    kind: ValueKind<'a>,
}

pub(crate) enum ValueKind<'a> {
    /// Every position is null.
    Null,
    Boolean(&'a BooleanArray),
    /// Fixed-width non-floating values widened losslessly to `i128`.
    Integer(ValueAt<'a, i128>),
    Float(ValueAt<'a, f64>),
    Bytes(ValueAt<'a, &'a [u8]>),
    List {
        offsets: ListOffsets<'a>,
        child: Box<ValueView<'a>>,
    },
    Struct(Vec<ValueView<'a>>),
}

/// Element reader over an array downcast once, when the view is built.
pub(crate) type ValueAt<'a, T> = Box<dyn Fn(usize) -> T + Send + Sync + 'a>;

#[derive(Clone, Copy)]
pub(crate) enum ListOffsets<'a> {
    Small(&'a [i32]),
    Large(&'a [i64]),
}

impl ListOffsets<'_> {
    #[inline]
    pub(crate) fn range(&self, idx: usize) -> Range<usize> {
        match self {
            ListOffsets::Small(o) => o[idx] as usize..o[idx + 1] as usize,
            ListOffsets::Large(o) => o[idx] as usize..o[idx + 1] as usize,
        }
    }
}

impl<'a> ValueView<'a> {
    pub fn try_new(array: &'a dyn Array) -> Result<Self, SetOpError> {
        Self::with_inherited(array, None)
    }

    /// Builds a view whose validity also accounts for `inherited`, the
    /// validity of the enclosing value at each of `array`'s positions.
    pub fn with_inherited(
        array: &'a dyn Array,
        inherited: Option<&NullBuffer>,
    ) -> Result<Self, SetOpError> {
        let own = array.logical_nulls();
        let nulls = effective_nulls(own.as_ref(), inherited);
        let kind = match array.data_type() {
            DataType::Null => ValueKind::Null,
            DataType::Boolean => ValueKind::Boolean(array.as_boolean()),
            DataType::Int8 => integer::<Int8Type>(array),
            DataType::Int16 => integer::<Int16Type>(array),
            DataType::Int32 => integer::<Int32Type>(array),
            DataType::Int64 => integer::<Int64Type>(array),
            DataType::UInt8 => integer::<UInt8Type>(array),
            DataType::UInt16 => integer::<UInt16Type>(array),
            DataType::UInt32 => integer::<UInt32Type>(array),
            DataType::UInt64 => integer::<UInt64Type>(array),
            DataType::Date32 => integer::<Date32Type>(array),
            DataType::Date64 => integer::<Date64Type>(array),
            DataType::Decimal128(_, _) => integer::<Decimal128Type>(array),
            DataType::Time32(TimeUnit::Second) => integer::<Time32SecondType>(array),
            DataType::Time32(TimeUnit::Millisecond) => integer::<Time32MillisecondType>(array),
            DataType::Time64(TimeUnit::Microsecond) => integer::<Time64MicrosecondType>(array),
            DataType::Time64(TimeUnit::Nanosecond) => integer::<Time64NanosecondType>(array),
            DataType::Timestamp(TimeUnit::Second, _) => integer::<TimestampSecondType>(array),
            DataType::Timestamp(TimeUnit::Millisecond, _) => {
                integer::<TimestampMillisecondType>(array)
            }
            DataType::Timestamp(TimeUnit::Microsecond, _) => {
                integer::<TimestampMicrosecondType>(array)
            }
            DataType::Timestamp(TimeUnit::Nanosecond, _) => {
                integer::<TimestampNanosecondType>(array)
            }
            DataType::Duration(TimeUnit::Second) => integer::<DurationSecondType>(array),
            DataType::Duration(TimeUnit::Millisecond) => integer::<DurationMillisecondType>(array),
            DataType::Duration(TimeUnit::Microsecond) => integer::<DurationMicrosecondType>(array),
            DataType::Duration(TimeUnit::Nanosecond) => integer::<DurationNanosecondType>(array),
            DataType::Float16 => float::<Float16Type>(array),
            DataType::Float32 => float::<Float32Type>(array),
            DataType::Float64 => float::<Float64Type>(array),
            DataType::Utf8 => {
                let arr = array.as_string::<i32>();
                bytes(move |i| arr.value(i).as_bytes())
            }
            DataType::LargeUtf8 => {
                let arr = array.as_string::<i64>();
                bytes(move |i| arr.value(i).as_bytes())
            }
            DataType::Utf8View => {
                let arr = array.as_string_view();
                bytes(move |i| arr.value(i).as_bytes())
            }
            DataType::Binary => {
                let arr = array.as_binary::<i32>();
                bytes(move |i| arr.value(i))
            }
            DataType::LargeBinary => {
                let arr = array.as_binary::<i64>();
                bytes(move |i| arr.value(i))
            }
            DataType::BinaryView => {
                let arr = array.as_binary_view();
                bytes(move |i| arr.value(i))
            }
            DataType::FixedSizeBinary(_) => {
                let arr = array.as_fixed_size_binary();
                bytes(move |i| arr.value(i))
            }
            DataType::List(_) => {
                let list = array.as_list::<i32>();
                ValueKind::List {
                    offsets: ListOffsets::Small(list.value_offsets()),
                    child: Box::new(list_child(list, nulls.as_ref())?),
                }
            }
            DataType::LargeList(_) => {
                let list = array.as_list::<i64>();
                ValueKind::List {
                    offsets: ListOffsets::Large(list.value_offsets()),
                    child: Box::new(list_child(list, nulls.as_ref())?),
                }
            }
            DataType::Struct(_) => {
                let fields = array
                    .as_struct()
                    .columns()
                    .iter()
                    .map(|c| ValueView::with_inherited(c.as_ref(), nulls.as_ref()))
                    .collect::<Result<Vec<_>, _>>()?;
                ValueKind::Struct(fields)
            }
            other => return Err(SetOpError::UnsupportedType(other.clone())),
        };
        Ok(Self { nulls, kind })
    }

    /// Effective nullity of the value at `idx`.
    #[inline]
    pub fn is_null(&self, idx: usize) -> bool {
        match &self.kind {
            ValueKind::Null => true,
            _ => self.nulls.as_ref().is_some_and(|n| n.is_null(idx)),
        }
    }

    pub fn nulls(&self) -> Option<&NullBuffer> {
        self.nulls.as_ref()
    }

    pub(crate) fn kind(&self) -> &ValueKind<'a> {
        &self.kind
    }

    /// Offsets and element view when this view is a list column.
    pub(crate) fn as_list(&self) -> Option<(ListOffsets<'a>, &ValueView<'a>)> {
        match &self.kind {
            ValueKind::List { offsets, child } => Some((*offsets, child.as_ref())),
            _ => None,
        }
    }
}

fn list_child<'a, O: OffsetSizeTrait>(
    list: &'a GenericListArray<O>,
    row_nulls: Option<&NullBuffer>,
) -> Result<ValueView<'a>, SetOpError> {
    let inherited = list_child_nulls(row_nulls, list.offsets(), list.values().len());
    ValueView::with_inherited(list.values().as_ref(), inherited.as_ref())
}

fn integer<'a, T>(array: &'a dyn Array) -> ValueKind<'a>
where
    T: ArrowPrimitiveType,
    T::Native: Into<i128>,
{
    let arr = array.as_primitive::<T>();
    ValueKind::Integer(Box::new(move |i: usize| -> i128 { arr.value(i).into() }))
}

fn float<'a, T>(array: &'a dyn Array) -> ValueKind<'a>
where
    T: ArrowPrimitiveType,
    T::Native: Into<f64>,
{
    let arr = array.as_primitive::<T>();
    ValueKind::Float(Box::new(move |i: usize| -> f64 { arr.value(i).into() }))
}

fn bytes<'a, F>(value_at: F) -> ValueKind<'a>
where
    F: Fn(usize) -> &'a [u8] + Send + Sync + 'a,
{
    ValueKind::Bytes(Box::new(value_at))
}
