/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process ID type
pub type Pid = u32;

/// Priority level (0-9, lower is more important)
pub type Priority = u8;

/// Discrete simulated time unit
pub type Tick = u64;

/// CPU time units a process needs
pub type Burst = u32;

/// Pid of the permanent init process
pub const INIT_PID: Pid = 0;

/// Clamp any integer priority request into the valid range
#[inline]
pub fn clamp_priority(priority: i64) -> Priority {
    priority.clamp(
        crate::core::limits::HIGHEST_PRIORITY as i64,
        crate::core::limits::LOWEST_PRIORITY as i64,
    ) as Priority
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_priority() {
        assert_eq!(clamp_priority(-3), 0);
        assert_eq!(clamp_priority(4), 4);
        assert_eq!(clamp_priority(42), 9);
    }
}
