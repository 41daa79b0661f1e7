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
use std::cmp::Ordering;

use arrow::array::{Array, ArrayRef, GenericListArray, OffsetSizeTrait};

use super::comparator::compare;
use super::distinct::{list_field, validate_list};
use super::rebuild::{Pick, RowOutput, plan_rows, rebuild_list};
use super::validity::push_down_nulls;
use super::view::ValueView;
use crate::common::types::{NullOrder, SetOpError, SortOrder};

/// Sorts the elements of every valid row. Top-level null elements go to
/// the end chosen by `null_order` in both directions; nulls nested inside
/// elements follow the element order. The sort is stable.
pub(crate) fn sort_list<O: OffsetSizeTrait>(
    list: &GenericListArray<O>,
    order: SortOrder,
    null_order: NullOrder,
) -> Result<ArrayRef, SetOpError> {
    validate_list(list)?;
    let field = list_field(list.data_type())?;
    let view = ValueView::try_new(list)?;
    let (offsets, elements) = view
        .as_list()
        .ok_or_else(|| SetOpError::InvalidInput("sort_lists expects a list column".to_string()))?;

    let rows = plan_rows("sort_lists", list.len(), |row| {
        if view.is_null(row) {
            return RowOutput::null();
        }
        let mut indices = offsets.range(row).collect::<Vec<_>>();
        indices.sort_by(|&a, &b| {
            match (elements.is_null(a), elements.is_null(b)) {
                (true, true) => return Ordering::Equal,
                (true, false) | (false, true) => {
                    return compare(elements, a, elements, b, null_order);
                }
                (false, false) => {}
            }
            let ord = compare(elements, a, elements, b, null_order);
            match order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });
        RowOutput::valid(indices.into_iter().map(|idx| Pick::new(0, idx)).collect())
    });

    let values = push_down_nulls(list.values())?;
    rebuild_list::<O>(&field, &[values], &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lists::test_utils::{float64_list, int32_list, row_f64s, row_i32s};
    use arrow::array::AsArray;

    #[test]
    fn ascending_with_nulls_before() {
        let list = int32_list(vec![
            Some(vec![Some(3), None, Some(1), Some(2)]),
            None,
            Some(vec![]),
        ]);
        let out = sort_list(list.as_list::<i32>(), SortOrder::Ascending, NullOrder::Before).unwrap();
        assert_eq!(row_i32s(&out, 0), vec![None, Some(1), Some(2), Some(3)]);
        assert!(out.is_null(1));
        assert!(out.is_valid(2));
    }

    #[test]
    fn descending_keeps_null_placement() {
        let list = int32_list(vec![Some(vec![Some(3), None, Some(1), Some(2)])]);
        let out = sort_list(list.as_list::<i32>(), SortOrder::Descending, NullOrder::Before).unwrap();
        assert_eq!(row_i32s(&out, 0), vec![None, Some(3), Some(2), Some(1)]);
        let out = sort_list(list.as_list::<i32>(), SortOrder::Descending, NullOrder::After).unwrap();
        assert_eq!(row_i32s(&out, 0), vec![Some(3), Some(2), Some(1), None]);
    }

    #[test]
    fn floats_sort_nan_last_and_zeros_together() {
        let list = float64_list(vec![Some(vec![
            Some(f64::NAN),
            Some(f64::INFINITY),
            Some(0.0),
            Some(f64::NEG_INFINITY),
            Some(-0.0),
        ])]);
        let out = sort_list(list.as_list::<i32>(), SortOrder::Ascending, NullOrder::Before).unwrap();
        let row = row_f64s(&out, 0);
        assert_eq!(row[0], Some(f64::NEG_INFINITY));
        // stable: +0.0 came before -0.0
        assert!(row[1].unwrap().is_sign_positive());
        assert!(row[2].unwrap().is_sign_negative());
        assert_eq!(row[3], Some(f64::INFINITY));
        assert!(row[4].unwrap().is_nan());
    }
}
