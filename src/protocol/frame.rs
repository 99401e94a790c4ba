use super::crc::{crc16, crc_bytes};
use crate::utils::error::{AuroraError, Result};

pub const REQUEST_LEN: usize = 10;
pub const RESPONSE_LEN: usize = 8;

pub const CMD_MEASURE: u8 = 59;
pub const CMD_CUMULATED_ENERGY: u8 = 78;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CumulativePeriod {
    Daily = 0,
    Weekly = 1,
    Monthly = 3,
    Yearly = 4,
    Total = 5,
    Partial = 6,
}

/// DSP measurement selectors for command 59.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MeasurementType {
    GridVoltage = 1,
    GridCurrent = 2,
    GridPower = 3,
    Frequency = 4,
    BulkVoltage = 5,
    LeakCurrentDcDc = 6,
    LeakCurrentInverter = 7,
    Input1Power = 8,
    Input2Power = 9,
    InverterTemperature = 21,
    BoosterTemperature = 22,
    Input1Voltage = 23,
    Input1Current = 25,
    Input2Voltage = 26,
    Input2Current = 27,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    CumulativeEnergy(CumulativePeriod),
    Measure { kind: MeasurementType, global: bool },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Response {
    CumulativeEnergy {
        period: CumulativePeriod,
        global_state: u8,
        value: u32,
    },
    Measure {
        kind: MeasurementType,
        global_state: u8,
        value: f32,
    },
}

impl Request {
    pub fn command(&self) -> u8 {
        match self {
            Request::CumulativeEnergy(_) => CMD_CUMULATED_ENERGY,
            Request::Measure { .. } => CMD_MEASURE,
        }
    }

    pub fn encode(&self, address: u8) -> [u8; REQUEST_LEN] {
        let mut frame = [0u8; REQUEST_LEN];
        frame[0] = address;
        frame[1] = self.command();
        match *self {
            Request::CumulativeEnergy(period) => frame[2] = period as u8,
            Request::Measure { kind, global } => {
                frame[2] = kind as u8;
                frame[3] = u8::from(global);
            }
        }
        let crc = crc_bytes(&frame[..REQUEST_LEN - 2]);
        frame[REQUEST_LEN - 2..].copy_from_slice(&crc);
        frame
    }

    /// Interprets a checked response frame as the answer to this request.
    pub fn interpret(&self, frame: &ResponseFrame) -> Result<Response> {
        if frame.transmission_state != 0 {
            return Err(AuroraError::InverterError {
                command: self.command(),
                state: frame.transmission_state,
                description: describe_transmission_state(frame.transmission_state).to_string(),
            });
        }

        Ok(match *self {
            Request::CumulativeEnergy(period) => Response::CumulativeEnergy {
                period,
                global_state: frame.global_state,
                value: u32::from_be_bytes(frame.data),
            },
            Request::Measure { kind, .. } => Response::Measure {
                kind,
                global_state: frame.global_state,
                value: f32::from_be_bytes(frame.data),
            },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseFrame {
    pub transmission_state: u8,
    pub global_state: u8,
    pub data: [u8; 4],
}

impl ResponseFrame {
    pub fn decode(bytes: &[u8; RESPONSE_LEN]) -> Result<Self> {
        let expected = crc16(&bytes[..RESPONSE_LEN - 2]);
        let received = u16::from_le_bytes([bytes[RESPONSE_LEN - 2], bytes[RESPONSE_LEN - 1]]);
        if expected != received {
            return Err(AuroraError::ProtocolError {
                message: format!(
                    "CRC mismatch: expected {:#06x}, received {:#06x}",
                    expected, received
                ),
            });
        }

        Ok(Self {
            transmission_state: bytes[0],
            global_state: bytes[1],
            data: [bytes[2], bytes[3], bytes[4], bytes[5]],
        })
    }

    pub fn encode(&self) -> [u8; RESPONSE_LEN] {
        let mut bytes = [0u8; RESPONSE_LEN];
        bytes[0] = self.transmission_state;
        bytes[1] = self.global_state;
        bytes[2..6].copy_from_slice(&self.data);
        let crc = crc_bytes(&bytes[..RESPONSE_LEN - 2]);
        bytes[RESPONSE_LEN - 2..].copy_from_slice(&crc);
        bytes
    }
}

pub fn describe_transmission_state(state: u8) -> &'static str {
    match state {
        0 => "everything is OK",
        51 => "command is not implemented",
        52 => "variable does not exist",
        53 => "variable value is out of range",
        54 => "EEPROM not accessible",
        55 => "not toggled service mode",
        56 => "cannot send the command to internal micro",
        57 => "command not executed",
        58 => "the variable is not available, retry",
        _ => "unknown transmission state",
    }
}
