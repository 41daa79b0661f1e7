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

//! glog-style `tracing` output for the set-operation kernels.
//!
//! Events go to `$NOVASET_LOG_FILE`, else `$NOVASET_LOG_DIR/novaset.log`,
//! else stderr. Initialization happens at most once per process.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use chrono::{DateTime, Local};
use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt};

pub use tracing::{debug, error, info, trace, warn};

const LOG_FILE_ENV: &str = "NOVASET_LOG_FILE";
const LOG_DIR_ENV: &str = "NOVASET_LOG_DIR";
const LOG_FILE_NAME: &str = "novaset.log";

static INIT: OnceLock<()> = OnceLock::new();

/// `Lyyyymmdd hh:mm:ss.uuuuuu tid file:line] msg`
struct GlogFormatter;

impl<S, N> FormatEvent<S, N> for GlogFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        let prefix = glog_prefix(
            *metadata.level(),
            &Local::now(),
            current_thread_id(),
            metadata.file().unwrap_or("unknown"),
            metadata.line().unwrap_or(0),
        );
        writer.write_str(&prefix)?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn glog_prefix(level: Level, now: &DateTime<Local>, thread: u64, file: &str, line: u32) -> String {
    let severity = match level {
        Level::ERROR => 'E',
        Level::WARN => 'W',
        Level::INFO => 'I',
        Level::DEBUG => 'D',
        Level::TRACE => 'T',
    };
    format!(
        "{}{} {} {}:{}] ",
        severity,
        now.format("%Y%m%d %H:%M:%S%.6f"),
        thread,
        file,
        line
    )
}

fn current_thread_id() -> u64 {
    let id = format!("{:?}", std::thread::current().id());
    id.trim_start_matches("ThreadId(")
        .trim_end_matches(')')
        .parse()
        .unwrap_or(0)
}

/// Appends to one shared file from every thread.
#[derive(Clone)]
struct FileSink {
    file: Arc<Mutex<File>>,
}

struct FileSinkWriter {
    file: Arc<Mutex<File>>,
}

impl<'a> MakeWriter<'a> for FileSink {
    type Writer = FileSinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        FileSinkWriter {
            file: Arc::clone(&self.file),
        }
    }
}

impl FileSinkWriter {
    fn with_file<T>(&self, f: impl FnOnce(&mut File) -> io::Result<T>) -> io::Result<T> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        f(&mut file)
    }
}

impl io::Write for FileSinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.with_file(|file| file.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with_file(|file| file.flush())
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// `None` means no file sink was requested.
fn log_file_path() -> Option<PathBuf> {
    env_path(LOG_FILE_ENV).or_else(|| env_path(LOG_DIR_ENV).map(|dir| dir.join(LOG_FILE_NAME)))
}

fn open_file_sink(path: &Path) -> io::Result<FileSink> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(FileSink {
        file: Arc::new(Mutex::new(file)),
    })
}

/// Subscriber writing glog lines to `writer`. The writer and ANSI choice
/// must be set before the event format replaces the default one.
fn glog_subscriber<W>(filter: EnvFilter, writer: W, ansi: bool) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .event_format(GlogFormatter)
        .finish()
}

pub fn init_with_level(level: &str) {
    INIT.get_or_init(|| {
        let filter = EnvFilter::new(level);

        if let Some(path) = log_file_path() {
            match open_file_sink(&path) {
                Ok(sink) => {
                    let _ = glog_subscriber(filter, sink, false).try_init();
                    return;
                }
                Err(err) => eprintln!(
                    "failed to open log file {}: {}, fallback to stderr",
                    path.display(),
                    err
                ),
            }
        }

        let ansi = atty::is(atty::Stream::Stderr);
        let _ = glog_subscriber(filter, io::stderr, ansi).try_init();
    });
}

pub fn init() {
    init_with_level("info");
}

/// Initializes logging from the loaded configuration, falling back to
/// `info` when the configuration cannot be read.
pub fn init_from_config() {
    match crate::novaset_config::config() {
        Ok(cfg) => init_with_level(cfg.effective_log_filter()),
        Err(err) => {
            init();
            warn!("failed to load novaset config, using defaults: {:#}", err);
        }
    }
}
