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

use core::fmt;
use libc::c_int;

// Signal-restart codes are kernel internal and absent from libc.
pub const ERESTARTNOHAND: c_int = 514;
pub const ERESTART_RESTARTBLOCK: c_int = 516;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// No wakealarm-capable RTC is present, or the clock id is not an alarm
    /// clock.
    NotSupported,
    /// The caller lacks the wake-alarm capability.
    PermissionDenied,
    /// Copying the remaining time out to the caller failed.
    Fault,
    /// Malformed caller input, e.g. a denormalized timespec.
    Invalid,
    /// Interrupted by a signal; the caller already knows the absolute
    /// deadline, so the call must not be restarted automatically.
    RestartNoHand,
    /// Interrupted by a signal; restart via the registered restart block.
    RestartBlock,
}

impl Error {
    pub fn errno(self) -> c_int {
        match self {
            Error::NotSupported => libc::ENOTSUP,
            Error::PermissionDenied => libc::EPERM,
            Error::Fault => libc::EFAULT,
            Error::Invalid => libc::EINVAL,
            Error::RestartNoHand => ERESTARTNOHAND,
            Error::RestartBlock => ERESTART_RESTARTBLOCK,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::NotSupported => "not supported",
            Error::PermissionDenied => "permission denied",
            Error::Fault => "bad address",
            Error::Invalid => "invalid argument",
            Error::RestartNoHand => "interrupted, no automatic restart",
            Error::RestartBlock => "interrupted, restart via restart block",
        };
        write!(f, "{}", msg)
    }
}

pub type Result<T> = core::result::Result<T, Error>;
