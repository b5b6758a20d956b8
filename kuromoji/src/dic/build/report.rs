/*
 * Copyright (c) 2021 Works Applications Co., Ltd.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::time::{Duration, Instant};

/// Statistics of one dictionary build phase
#[derive(Debug, Clone)]
pub struct DictPartReport {
    part: String,
    time: Duration,
    size: usize,
    write: bool,
}

impl DictPartReport {
    pub fn part(&self) -> &str {
        &self.part
    }

    pub fn time(&self) -> Duration {
        self.time
    }

    /// Number of items read or bytes written
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_write(&self) -> bool {
        self.write
    }
}

#[derive(Default)]
pub(crate) struct Reporter {
    reports: Vec<DictPartReport>,
}

impl Reporter {
    pub fn new() -> Reporter {
        Self {
            reports: Vec::with_capacity(12),
        }
    }

    pub fn collect(&mut self, size: usize, report: ReportBuilder) {
        let mut rep = report.report;
        rep.time = Instant::now().duration_since(report.start);
        rep.size = size;
        log::debug!("{}: {} in {:.3} sec", rep.part, rep.size, rep.time.as_secs_f32());
        self.reports.push(rep);
    }

    pub fn collect_r<T>(
        &mut self,
        result: Result<usize, T>,
        report: ReportBuilder,
    ) -> Result<usize, T> {
        if let Ok(size) = result {
            self.collect(size, report);
        }
        result
    }

    pub fn reports(&self) -> &[DictPartReport] {
        &self.reports
    }

    pub fn into_reports(self) -> Vec<DictPartReport> {
        self.reports
    }
}

pub(crate) struct ReportBuilder {
    start: Instant,
    report: DictPartReport,
}

impl ReportBuilder {
    pub fn new<S: Into<String>>(desc: S) -> Self {
        Self {
            start: Instant::now(),
            report: DictPartReport {
                part: desc.into(),
                size: 0,
                time: Duration::default(),
                write: true,
            },
        }
    }

    pub fn read(mut self) -> Self {
        self.report.write = false;
        self
    }
}
