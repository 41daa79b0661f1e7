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

//! Element equality, canonical ordering and structural hashing.
//!
//! All three recurse through list and struct values and agree with each
//! other: values that are `equal` under a policy always produce the same
//! `hash_value`, and values `compare` as `Equal` whenever they are `equal`
//! under the collapsing policy (`NullEquality::Equal`, `NanEquality::AllEqual`).

use std::cmp::Ordering;

use super::hash::{float_key, fold, hash_bytes, hash_null, hash_wide, hash_word};
pub use super::view::ValueView;

use super::view::ValueKind;
use crate::common::types::{EqualityPolicy, NullOrder};

/// Whether the value at `left[li]` and the value at `right[ri]` belong to the
/// same equivalence class under `policy`.
pub fn equal(
    left: &ValueView<'_>,
    li: usize,
    right: &ValueView<'_>,
    ri: usize,
    policy: EqualityPolicy,
) -> bool {
    match (left.is_null(li), right.is_null(ri)) {
        (true, true) => return policy.nulls_equal(),
        (true, false) | (false, true) => return false,
        (false, false) => {}
    }
    match (left.kind(), right.kind()) {
        (ValueKind::Boolean(l), ValueKind::Boolean(r)) => l.value(li) == r.value(ri),
        (ValueKind::Integer(lv), ValueKind::Integer(rv)) => lv(li) == rv(ri),
        (ValueKind::Float(lv), ValueKind::Float(rv)) => floats_equal(lv(li), rv(ri), policy),
        (ValueKind::Bytes(lv), ValueKind::Bytes(rv)) => lv(li) == rv(ri),
        (
            ValueKind::List {
                offsets: lo,
                child: lc,
            },
            ValueKind::List {
                offsets: ro,
                child: rc,
            },
        ) => {
            let (lr, rr) = (lo.range(li), ro.range(ri));
            lr.len() == rr.len() && lr.zip(rr).all(|(i, j)| equal(lc, i, rc, j, policy))
        }
        (ValueKind::Struct(lf), ValueKind::Struct(rf)) => {
            lf.len() == rf.len()
                && lf
                    .iter()
                    .zip(rf)
                    .all(|(l, r)| equal(l, li, r, ri, policy))
        }
        _ => false,
    }
}

#[inline]
fn floats_equal(l: f64, r: f64, policy: EqualityPolicy) -> bool {
    match (l.is_nan(), r.is_nan()) {
        (true, true) => policy.nans_equal(),
        (true, false) | (false, true) => false,
        // IEEE equality already treats -0.0 and +0.0 as equal
        (false, false) => l == r,
    }
}

/// Canonical total order over values of one shape.
///
/// Nulls sort according to `null_order` at every nesting level. Floats
/// order as `-inf < .. < -0.0 == +0.0 < .. < +inf < NaN` with every NaN
/// equal. Lists compare element-wise, then by length. Structs compare
/// field by field.
pub fn compare(
    left: &ValueView<'_>,
    li: usize,
    right: &ValueView<'_>,
    ri: usize,
    null_order: NullOrder,
) -> Ordering {
    match (left.is_null(li), right.is_null(ri)) {
        (true, true) => return Ordering::Equal,
        (true, false) => return null_first(null_order),
        (false, true) => return null_first(null_order).reverse(),
        (false, false) => {}
    }
    match (left.kind(), right.kind()) {
        (ValueKind::Boolean(l), ValueKind::Boolean(r)) => l.value(li).cmp(&r.value(ri)),
        (ValueKind::Integer(lv), ValueKind::Integer(rv)) => lv(li).cmp(&rv(ri)),
        (ValueKind::Float(lv), ValueKind::Float(rv)) => compare_floats(lv(li), rv(ri)),
        (ValueKind::Bytes(lv), ValueKind::Bytes(rv)) => lv(li).cmp(rv(ri)),
        (
            ValueKind::List {
                offsets: lo,
                child: lc,
            },
            ValueKind::List {
                offsets: ro,
                child: rc,
            },
        ) => {
            let (lr, rr) = (lo.range(li), ro.range(ri));
            let (l_len, r_len) = (lr.len(), rr.len());
            lr.zip(rr)
                .map(|(i, j)| compare(lc, i, rc, j, null_order))
                .find(|ord| ord.is_ne())
                .unwrap_or_else(|| l_len.cmp(&r_len))
        }
        (ValueKind::Struct(lf), ValueKind::Struct(rf)) => lf
            .iter()
            .zip(rf)
            .map(|(l, r)| compare(l, li, r, ri, null_order))
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| lf.len().cmp(&rf.len())),
        _ => Ordering::Equal,
    }
}

pub fn less_than(
    left: &ValueView<'_>,
    li: usize,
    right: &ValueView<'_>,
    ri: usize,
    null_order: NullOrder,
) -> bool {
    compare(left, li, right, ri, null_order) == Ordering::Less
}

#[inline]
fn null_first(null_order: NullOrder) -> Ordering {
    match null_order {
        NullOrder::Before => Ordering::Less,
        NullOrder::After => Ordering::Greater,
    }
}

fn compare_floats(l: f64, r: f64) -> Ordering {
    match (l.is_nan(), r.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => l.partial_cmp(&r).unwrap_or(Ordering::Equal),
    }
}

/// Structural hash of the value at `view[idx]`.
///
/// Independent of policy: null and NaN values hash to fixed values, which
/// is consistent with every policy because an `Unequal` policy only splits
/// classes apart.
pub fn hash_value(view: &ValueView<'_>, idx: usize, seed: u64) -> u64 {
    if view.is_null(idx) {
        return hash_null(seed);
    }
    match view.kind() {
        ValueKind::Null => hash_null(seed),
        ValueKind::Boolean(arr) => hash_word(seed, arr.value(idx) as u64),
        ValueKind::Integer(value_at) => hash_wide(seed, value_at(idx)),
        ValueKind::Float(value_at) => hash_word(seed, float_key(value_at(idx))),
        ValueKind::Bytes(value_at) => hash_bytes(seed, value_at(idx)),
        ValueKind::List { offsets, child } => {
            let range = offsets.range(idx);
            let mut acc = hash_word(seed, range.len() as u64);
            for i in range {
                acc = fold(acc, hash_value(child, i, seed));
            }
            acc
        }
        ValueKind::Struct(fields) => {
            let mut acc = hash_word(seed, fields.len() as u64);
            for field in fields {
                acc = fold(acc, hash_value(field, idx, seed));
            }
            acc
        }
    }
}
