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
//! Common utilities and helpers for integration tests.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::path::PathBuf;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, ListArray, ListBuilder, StringBuilder};
use arrow::datatypes::{Float64Type, Int32Type};
use tempfile::TempDir;

use novaset::{NullOrder, SortOrder, novaset_config, novaset_logging, sort_lists};

/// Test configuration for integration tests.
pub struct TestConfig {
    /// Temporary directory for test artifacts
    pub temp_dir: TempDir,
    /// Test config path
    pub config_path: PathBuf,
}

impl TestConfig {
    /// Create a configuration that sends every operation through the
    /// parallel row planner.
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let config_path = temp_dir.path().join("test_novaset.toml");

        let config_content = r#"
log_level = "debug"

[set_ops]
parallel = true
parallel_min_rows = 1
"#;

        std::fs::write(&config_path, config_content)?;

        Ok(Self {
            temp_dir,
            config_path,
        })
    }

    /// Initialize logging for tests.
    pub fn init_logging(&self) {
        novaset_logging::init_with_level("debug");
    }

    /// Load the test configuration.
    pub fn load_config(&self) -> anyhow::Result<&'static novaset_config::NovaSetConfig> {
        novaset_config::init_from_path(&self.config_path)
    }
}

impl Default for TestConfig {
    fn default() -> Self {
        Self::new().expect("Failed to create test config")
    }
}

/// A valid row holding `values`, none of them null.
pub fn row<T: Copy>(values: &[T]) -> Option<Vec<Option<T>>> {
    Some(values.iter().copied().map(Some).collect())
}

pub fn int_lists(rows: Vec<Option<Vec<Option<i32>>>>) -> ArrayRef {
    Arc::new(ListArray::from_iter_primitive::<Int32Type, _, _>(rows))
}

pub fn float_lists(rows: Vec<Option<Vec<Option<f64>>>>) -> ArrayRef {
    Arc::new(ListArray::from_iter_primitive::<Float64Type, _, _>(rows))
}

pub fn string_lists(rows: Vec<Option<Vec<Option<&str>>>>) -> ArrayRef {
    let mut builder = ListBuilder::new(StringBuilder::new());
    for row in rows {
        match row {
            Some(values) => {
                for value in values {
                    builder.values().append_option(value);
                }
                builder.append(true);
            }
            None => builder.append(false),
        }
    }
    Arc::new(builder.finish())
}

/// Sorts every row ascending with nulls first so results can be compared.
pub fn sort_asc(list: &ArrayRef) -> ArrayRef {
    sort_lists(list.as_ref(), SortOrder::Ascending, NullOrder::Before)
        .unwrap_or_else(|e| panic!("sort_lists failed: {:?}", e))
}

pub fn int_rows(list: &ArrayRef) -> Vec<Option<Vec<Option<i32>>>> {
    let sorted = sort_asc(list);
    let list = sorted.as_list::<i32>();
    (0..list.len())
        .map(|i| {
            list.is_valid(i)
                .then(|| list.value(i).as_primitive::<Int32Type>().iter().collect::<Vec<_>>())
        })
        .collect()
}

pub fn float_rows(list: &ArrayRef) -> Vec<Option<Vec<Option<f64>>>> {
    let sorted = sort_asc(list);
    let list = sorted.as_list::<i32>();
    (0..list.len())
        .map(|i| {
            list.is_valid(i)
                .then(|| list.value(i).as_primitive::<Float64Type>().iter().collect::<Vec<_>>())
        })
        .collect()
}

pub fn string_rows(list: &ArrayRef) -> Vec<Option<Vec<Option<String>>>> {
    let sorted = sort_asc(list);
    let list = sorted.as_list::<i32>();
    (0..list.len())
        .map(|i| {
            list.is_valid(i).then(|| {
                list.value(i)
                    .as_string::<i32>()
                    .iter()
                    .map(|v| v.map(str::to_string))
                    .collect::<Vec<_>>()
            })
        })
        .collect()
}

/// Compares float rows treating every NaN as equal to every other NaN.
pub fn assert_float_rows_eq(
    actual: &[Option<Vec<Option<f64>>>],
    expected: &[Option<Vec<Option<f64>>>],
) {
    let same = |a: &Option<f64>, b: &Option<f64>| match (a, b) {
        (Some(x), Some(y)) => (x.is_nan() && y.is_nan()) || x == y,
        (None, None) => true,
        _ => false,
    };
    let rows_match = actual.len() == expected.len()
        && actual.iter().zip(expected).all(|(a, e)| match (a, e) {
            (Some(a), Some(e)) => a.len() == e.len() && a.iter().zip(e).all(|(x, y)| same(x, y)),
            (None, None) => true,
            _ => false,
        });
    assert!(rows_match, "expected {:?}, got {:?}", expected, actual);
}

/// Assert that a result is Ok and return the value.
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that a result is Err.
#[macro_export]
macro_rules! assert_err {
    ($result:expr) => {
        match $result {
            Ok(value) => panic!("Expected Err, got Ok: {:?}", value),
            Err(e) => e,
        }
    };
}
