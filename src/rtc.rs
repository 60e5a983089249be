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

use crate::{sync::SpinLock, time::Ktime};
use alloc::{sync::Arc, vec::Vec};

/// A real-time clock device. Only devices that can both program an alarm
/// and wake the machine from suspend are eligible for alarm wakeups.
pub trait RtcDevice: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the device can program an alarm line at all.
    fn supports_alarm(&self) -> bool;

    /// Whether a programmed alarm can wake the machine from suspend.
    fn may_wakeup(&self) -> bool;

    fn read_time(&self) -> Ktime;

    /// Program the one-shot alarm line to fire at `expires` on this
    /// device's own clock.
    fn set_alarm(&self, expires: Ktime);

    fn cancel_alarm(&self);
}

/// Registry of probed RTC devices, filled by drivers at boot.
pub struct RtcClass {
    devices: SpinLock<Vec<Arc<dyn RtcDevice>>>,
}

impl RtcClass {
    pub const fn new() -> Self {
        Self {
            devices: SpinLock::new(Vec::new()),
        }
    }

    pub fn register(&self, dev: Arc<dyn RtcDevice>) {
        self.devices.lock().push(dev);
    }

    fn find_wakealarm(&self) -> Option<Arc<dyn RtcDevice>> {
        self.devices
            .lock()
            .iter()
            .find(|dev| dev.supports_alarm() && dev.may_wakeup())
            .cloned()
    }
}

impl Default for RtcClass {
    fn default() -> Self {
        Self::new()
    }
}

// The one RTC used for suspend wakeups. Selection is lazy and sticky:
// queries retry until a wakealarm-capable device has been registered, and
// the first one found is kept for the life of the process.
pub(crate) struct RtcSlot {
    class: Arc<RtcClass>,
    chosen: SpinLock<Option<Arc<dyn RtcDevice>>>,
}

impl RtcSlot {
    pub(crate) fn new(class: Arc<RtcClass>) -> Self {
        Self {
            class,
            chosen: SpinLock::new(None),
        }
    }

    pub(crate) fn get(&self) -> Option<Arc<dyn RtcDevice>> {
        let mut chosen = self.chosen.lock();
        if chosen.is_none() {
            if let Some(dev) = self.class.find_wakealarm() {
                log::debug!("alarmtimer: using rtc device {}", dev.name());
                *chosen = Some(dev);
            }
        }
        chosen.clone()
    }
}
