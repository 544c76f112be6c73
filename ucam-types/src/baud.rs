//! Serial baud rates supported by SET_BAUD_RATE

use std::fmt;

/// Baud rate with its firmware divider pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaudRate {
    B2400,
    B4800,
    B9600,
    B19200,
    B38400,
    B57600,
    B115200,
    B153600,
    B230400,
    B460800,
    B921600,
    B1228800,
    B1843200,
    B3686400,
}

impl BaudRate {
    /// Bits per second
    pub fn bps(self) -> u32 {
        match self {
            Self::B2400 => 2_400,
            Self::B4800 => 4_800,
            Self::B9600 => 9_600,
            Self::B19200 => 19_200,
            Self::B38400 => 38_400,
            Self::B57600 => 57_600,
            Self::B115200 => 115_200,
            Self::B153600 => 153_600,
            Self::B230400 => 230_400,
            Self::B460800 => 460_800,
            Self::B921600 => 921_600,
            Self::B1228800 => 1_228_800,
            Self::B1843200 => 1_843_200,
            Self::B3686400 => 3_686_400,
        }
    }

    /// First and second divider sent as SET_BAUD_RATE parameters
    pub fn dividers(self) -> (u8, u8) {
        match self {
            Self::B2400 => (0x1F, 0x2F),
            Self::B4800 => (0x1F, 0x17),
            Self::B9600 => (0x1F, 0x0B),
            Self::B19200 => (0x1F, 0x05),
            Self::B38400 => (0x1F, 0x02),
            Self::B57600 => (0x1F, 0x01),
            Self::B115200 => (0x1F, 0x00),
            Self::B153600 => (0x07, 0x02),
            Self::B230400 => (0x07, 0x01),
            Self::B460800 => (0x07, 0x00),
            Self::B921600 => (0x01, 0x01),
            Self::B1228800 => (0x02, 0x00),
            Self::B1843200 => (0x01, 0x00),
            Self::B3686400 => (0x00, 0x00),
        }
    }
}

impl From<BaudRate> for u32 {
    fn from(rate: BaudRate) -> u32 {
        rate.bps()
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bps", self.bps())
    }
}
