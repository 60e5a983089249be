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

use crate::time::Ktime;
use libc::clockid_t;

/// A reference clock backing an alarm base. Reading it must be pure: no
/// locks, no side effects, callable from the dispatch timer callback.
pub trait Clock: Send + Sync {
    /// The clockid naming this reference clock.
    fn clockid(&self) -> clockid_t;

    fn read_time(&self) -> Ktime;

    fn resolution(&self) -> Ktime;
}

/// The single hardware-backed high resolution timer of an alarm base,
/// always programmed in absolute mode.
pub trait DispatchTimer: Send + Sync {
    /// Program the timer to call back at `expires`. Supersedes any pending
    /// programming, so there is no separate cancel-then-start dance.
    fn interrupt_at(&self, expires: Ktime);

    /// Disarm the timer.
    fn stop(&self);
}
