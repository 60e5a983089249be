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

// Alarm timers track wall-clock or monotonic-since-boot time, fire callbacks
// at programmed instants, and stay accurate across a machine suspend by
// arming an RTC wakeup before the host goes down. The hardware collaborators
// (high resolution timer, RTC device, scheduler and freezer) are consumed
// through traits so a platform integration supplies them at init.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod alarm;
pub mod clock;
pub mod config;
pub mod error;
pub mod posix;
pub mod rtc;
pub mod sched;
mod suspend;
pub(crate) mod sync;
pub mod time;

#[cfg(test)]
pub(crate) mod testing;

pub use alarm::{Alarm, AlarmHandler, AlarmTimer, AlarmType, ALARM_NUMTYPE};
pub use clock::{Clock, DispatchTimer};
pub use error::{Error, Result};
pub use posix::{
    alarmtimer_init, PosixClockOps, PosixClockRegistry, PosixTimer, TimerEventFn,
    CLOCK_BOOTTIME_ALARM, CLOCK_REALTIME_ALARM, TIMER_ABSTIME,
};
pub use rtc::{RtcClass, RtcDevice};
pub use sched::{Capability, RestartBlock, SchedOps, Task, TaskRef};
pub use time::Ktime;
