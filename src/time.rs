// Copyright (c) 2026 vivo Mobile Communication Co., Ltd.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//       http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::error::{Error, Result};
use libc::{c_long, time_t, timespec};

pub const NSEC_PER_SEC: i64 = 1_000_000_000;

/// Ktime represents a point in time, or a duration, in signed nanoseconds.
///
/// Use i64 to keep arithmetic cheap and to allow negative durations, e.g.
/// the remaining time of an already expired sleep.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Ktime(i64);

impl Ktime {
    pub const ZERO: Self = Ktime(0);
    pub const MAX: Self = Ktime(i64::MAX);

    pub const fn from_ns(ns: i64) -> Self {
        Ktime(ns)
    }

    pub fn new(sec: i64, nsec: i64) -> Self {
        Ktime(sec.saturating_mul(NSEC_PER_SEC).saturating_add(nsec))
    }

    pub const fn as_ns(self) -> i64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn add(self, other: Self) -> Self {
        Ktime(self.0.saturating_add(other.0))
    }

    // Saturating addition for absolute deadlines built from caller-supplied
    // relative values. A huge relative request must pin to the far future
    // instead of wrapping into the past.
    pub fn add_safe(self, other: Self) -> Self {
        Ktime(self.0.saturating_add(other.0))
    }

    pub fn sub(self, other: Self) -> Self {
        Ktime(self.0.saturating_sub(other.0))
    }

    // Rejects denormalized timespecs the way the syscall boundary must.
    pub fn from_timespec(ts: &timespec) -> Result<Self> {
        if ts.tv_nsec < 0 || ts.tv_nsec as i64 >= NSEC_PER_SEC {
            return Err(Error::Invalid);
        }
        let seconds = ts.tv_sec as i64;
        let nanos = ts.tv_nsec as i64;
        seconds
            .checked_mul(NSEC_PER_SEC)
            .and_then(|base| base.checked_add(nanos))
            .map(Ktime)
            .ok_or(Error::Invalid)
    }

    pub fn to_timespec(self) -> timespec {
        let mut seconds = self.0 / NSEC_PER_SEC;
        let mut nanoseconds = self.0 % NSEC_PER_SEC;
        if nanoseconds < 0 {
            seconds -= 1;
            nanoseconds += NSEC_PER_SEC;
        }
        timespec {
            tv_sec: seconds as time_t,
            tv_nsec: nanoseconds as c_long,
        }
    }
}
