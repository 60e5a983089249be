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

use crate::time::NSEC_PER_SEC;

// Floor for posix alarm timer intervals. A shorter period would let one
// caller monopolize the dispatch loop. Policy, not semantics.
pub const TIMER_MIN_INTERVAL_NS: i64 = 100_000;

// Suspend warns when the programmed RTC wakeup is closer than this.
pub const MIN_WAKEUP_WARN_NS: i64 = NSEC_PER_SEC;
