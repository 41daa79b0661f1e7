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
use crate::novaset_config::config as novaset_app_config;

pub(crate) fn set_ops_parallel() -> bool {
    novaset_app_config()
        .ok()
        .map(|c| c.set_ops.parallel)
        .unwrap_or(true)
}

pub(crate) fn set_ops_parallel_min_rows() -> usize {
    novaset_app_config()
        .ok()
        .map(|c| c.set_ops.parallel_min_rows)
        .unwrap_or(4096)
}
