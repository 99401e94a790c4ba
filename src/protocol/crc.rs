/// CRC-16/X-25 as used on the Aurora serial bus: reflected polynomial
/// 0x8408, initial value 0xFFFF, complemented result.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xffff;
    for &byte in data {
        let mut bits = byte;
        for _ in 0..8 {
            if (crc ^ u16::from(bits)) & 0x0001 != 0 {
                crc = (crc >> 1) ^ 0x8408;
            } else {
                crc >>= 1;
            }
            bits >>= 1;
        }
    }
    !crc
}

/// Low byte first, as transmitted.
pub fn crc_bytes(data: &[u8]) -> [u8; 2] {
    crc16(data).to_le_bytes()
}
