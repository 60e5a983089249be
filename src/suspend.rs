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

use crate::{alarm::AlarmTimer, config, time::Ktime};

impl AlarmTimer {
    /// Suspend hook, run by the power management path right before the host
    /// goes down. Programs the RTC so the soonest pending wakeup, either a
    /// queued alarm or a frozen sleeper's remaining time, brings the
    /// machine back. Never fails; with nothing pending the RTC stays idle.
    pub fn suspend(&self) {
        // Consume the freezer delta even if no RTC ends up programmed.
        let mut min;
        {
            let mut delta = self.freezer_delta.lock();
            min = *delta;
            *delta = Ktime::ZERO;
        }

        let Some(rtc) = self.rtcdev() else {
            return;
        };

        // Fold in the soonest queued alarm across all bases. A zero min
        // means nothing has been found yet.
        for base in self.bases.iter() {
            let next = {
                let q = base.queue.lock();
                q.next_expires()
            };
            let Some(expires) = next else {
                continue;
            };
            let delta = expires.sub(base.gettime.read_time());
            if min.is_zero() || delta < min {
                min = delta;
            }
        }
        if min.is_zero() {
            return;
        }

        if min < Ktime::from_ns(config::MIN_WAKEUP_WARN_NS) {
            // Wake-back intervals this short usually mean a caller error.
            log::warn!(
                "alarmtimer: rtc wakeup programmed only {} ns ahead",
                min.as_ns()
            );
        }

        rtc.cancel_alarm();
        let now = rtc.read_time();
        rtc.set_alarm(now.add(min));
    }
}
