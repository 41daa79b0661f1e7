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
use std::fmt;

use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use serde::Deserialize;

/// Whether two null elements belong to the same equivalence class.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullEquality {
    #[default]
    Equal,
    Unequal,
}

/// Whether two NaN elements belong to the same equivalence class.
/// The NaN payload and sign never matter.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NanEquality {
    #[default]
    AllEqual,
    Unequal,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct EqualityPolicy {
    pub nulls: NullEquality,
    pub nans: NanEquality,
}

impl EqualityPolicy {
    pub fn new(nulls: NullEquality, nans: NanEquality) -> Self {
        Self { nulls, nans }
    }

    #[inline]
    pub fn nulls_equal(&self) -> bool {
        self.nulls == NullEquality::Equal
    }

    #[inline]
    pub fn nans_equal(&self) -> bool {
        self.nans == NanEquality::AllEqual
    }
}

impl fmt::Display for EqualityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nulls={:?} nans={:?}", self.nulls, self.nans)
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Placement of null elements inside a sorted row, independent of the
/// sort direction.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullOrder {
    #[default]
    Before,
    After,
}

#[derive(Debug)]
pub enum SetOpError {
    /// Operands differ in row count or in nested element shape.
    ShapeMismatch(String),
    /// The input breaks a list-column invariant.
    InvalidInput(String),
    UnsupportedType(DataType),
    OffsetOverflow,
    Arrow(ArrowError),
}

impl fmt::Display for SetOpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetOpError::ShapeMismatch(msg) => write!(f, "shape mismatch: {}", msg),
            SetOpError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            SetOpError::UnsupportedType(dt) => {
                write!(f, "list set operation unsupported element type: {:?}", dt)
            }
            SetOpError::OffsetOverflow => write!(f, "list offset overflow"),
            SetOpError::Arrow(err) => write!(f, "arrow error: {}", err),
        }
    }
}

impl std::error::Error for SetOpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SetOpError::Arrow(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ArrowError> for SetOpError {
    fn from(err: ArrowError) -> Self {
        SetOpError::Arrow(err)
    }
}
