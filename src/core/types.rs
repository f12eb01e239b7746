/*!
 * Core Types
 * Common types used across the emulator
 */

use time::macros::format_description;
use time::OffsetDateTime;

/// Process ID type (monotonically assigned, starts at 1)
pub type Pid = u32;

/// Index of a CPU core in the core table
pub type CoreId = usize;

/// Virtual clock reading, in ticks since initialization
pub type Tick = u64;

/// Value stored in a process variable
pub type Word = u16;

/// Arena slot of a process inside the scheduler registry
pub(crate) type Slot = usize;

/// Render a wall-clock instant as `MM/DD/YYYY hh:mm:ss AM`
pub fn format_timestamp(at: OffsetDateTime) -> String {
    let format =
        format_description!("[month]/[day]/[year] [hour repr:12]:[minute]:[second] [period]");
    at.format(&format).unwrap_or_default()
}
