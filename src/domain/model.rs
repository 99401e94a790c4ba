use chrono::{DateTime, Local};

/// One sample taken from the inverter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Energy produced today, Wh
    pub energy_wh: u32,
    /// Input 1 voltage, V
    pub voltage_v: f32,
    /// Local wall-clock time of the sample
    pub taken_at: DateTime<Local>,
}

impl Reading {
    pub fn new(energy_wh: u32, voltage_v: f32, taken_at: DateTime<Local>) -> Self {
        Self {
            energy_wh,
            voltage_v,
            taken_at,
        }
    }

    pub fn now(energy_wh: u32, voltage_v: f32) -> Self {
        Self::new(energy_wh, voltage_v, Local::now())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Accepted,
    /// The server answered with a non-success status
    Rejected(u16),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// Daylight ended
    Nightfall,
    /// The link to the inverter dropped; the service reconnects
    Interrupted(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub readings: usize,
    pub rejected_uploads: usize,
    pub end: SessionEnd,
}
