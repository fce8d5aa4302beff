/// Outbound update pacing
///
/// Every genuine count change is sent on the next tick; an unchanged count
/// is re-sent at least once per heartbeat so a late or reconnecting observer
/// converges without a separate resync message.
mod throttle;

pub use throttle::UpdateThrottler;

use std::time::Duration;

/// Heartbeat interval (send update even if no changes)
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(2);
