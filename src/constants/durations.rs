/// Confinement duration bounds, in minutes
pub const MIN_CONFINEMENT_MINUTES: u32 = 1;
pub const MAX_CONFINEMENT_MINUTES: u32 = 1440; // 24 hours

/// Interval between heartbeat log lines
pub const HEARTBEAT_INTERVAL_SECONDS: u64 = 5 * 60;

/// Default port for the keep-alive HTTP endpoint
pub const DEFAULT_KEEPALIVE_PORT: u16 = 3000;
