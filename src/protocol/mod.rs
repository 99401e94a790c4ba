// Aurora inverter serial protocol: fixed-size frames, CRC-16/X-25 trailer.

pub mod crc;
pub mod frame;

pub use frame::{
    CumulativePeriod, MeasurementType, Request, Response, ResponseFrame, REQUEST_LEN,
    RESPONSE_LEN,
};
