//! AS7341 register addresses and bit masks.
//!
//! Addresses below 0x80 (CONFIG, GPIO, LED) are only reachable with the
//! REG_BANK bit in CFG_0 set. Everything from 0x80 upward lives in bank 0,
//! and CFG_0 itself is mapped in both banks.

/// Default 7-bit I2C address.
pub const I2C_ADDR: u8 = 0x39;

/// Expected value of the ID register with the two revision bits masked off.
pub const ID_VALUE: u8 = 0x24;
pub const ID_MASK: u8 = 0xFC;

// Bank 1
pub const CONFIG: u8 = 0x70;
pub const CONFIG_MODE_MASK: u8 = 0b0000_0011;
pub const CONFIG_INT_SEL: u8 = 1 << 2;
pub const CONFIG_LED_SEL: u8 = 1 << 3;

pub const STAT: u8 = 0x71;
pub const STAT_READY: u8 = 1 << 0;
pub const STAT_WAIT_SYNC: u8 = 1 << 1;

pub const EDGE: u8 = 0x72;

pub const GPIO: u8 = 0x73;
pub const GPIO_PD_INT: u8 = 1 << 0;
pub const GPIO_PD_GPIO: u8 = 1 << 1;

pub const LED: u8 = 0x74;
pub const LED_ACT: u8 = 1 << 7;
pub const LED_DRIVE_MASK: u8 = 0x7F;

// Bank 0
pub const ENABLE: u8 = 0x80;
pub const ENABLE_PON: u8 = 1 << 0;
pub const ENABLE_SP_EN: u8 = 1 << 1;
pub const ENABLE_WEN: u8 = 1 << 3;
pub const ENABLE_SMUXEN: u8 = 1 << 4;
pub const ENABLE_FDEN: u8 = 1 << 6;

pub const ATIME: u8 = 0x81;
pub const WTIME: u8 = 0x83;
pub const SP_TH_LOW: u8 = 0x84; // word
pub const SP_TH_HIGH: u8 = 0x86; // word
pub const AUXID: u8 = 0x90;
pub const REVID: u8 = 0x91;
pub const ID: u8 = 0x92;

pub const STATUS: u8 = 0x93;
pub const STATUS_SINT: u8 = 1 << 0;
pub const STATUS_C_INT: u8 = 1 << 1;
pub const STATUS_FINT: u8 = 1 << 2;
pub const STATUS_AINT: u8 = 1 << 3;
pub const STATUS_ASAT: u8 = 1 << 7;
pub const STATUS_CLEAR_ALL: u8 = 0xFF;

/// ASTATUS, immediately followed by CH0..CH5 (little-endian words).
/// Reading from here latches all six channels at once.
pub const ASTATUS: u8 = 0x94;
pub const ASTATUS_ASAT: u8 = 1 << 7;
pub const ASTATUS_AGAIN_MASK: u8 = 0x0F;

pub const CH0_DATA_L: u8 = 0x95;

pub const STATUS_2: u8 = 0xA3;
pub const STATUS_2_AVALID: u8 = 1 << 6;

pub const CFG_0: u8 = 0xA9;
pub const CFG_0_WLONG: u8 = 1 << 2;
pub const CFG_0_REG_BANK: u8 = 1 << 4;
pub const CFG_0_LOW_POWER: u8 = 1 << 5;

pub const CFG_1: u8 = 0xAA; // AGAIN
pub const CFG_1_AGAIN_MASK: u8 = 0x1F;

pub const CFG_6: u8 = 0xAF;
pub const CFG_6_SMUX_CMD_ROM: u8 = 0x00;
pub const CFG_6_SMUX_CMD_READ: u8 = 0x08;
pub const CFG_6_SMUX_CMD_WRITE: u8 = 0x10;

pub const CFG_12: u8 = 0xB5; // SP_TH_CH
pub const PERS: u8 = 0xBD;

pub const GPIO_2: u8 = 0xBE;
pub const GPIO_2_GPIO_IN: u8 = 1 << 0;
pub const GPIO_2_GPIO_OUT: u8 = 1 << 1;
pub const GPIO_2_GPIO_IN_EN: u8 = 1 << 2;
pub const GPIO_2_GPIO_INV: u8 = 1 << 3;

pub const ASTEP: u8 = 0xCA; // word

pub const FD_STATUS: u8 = 0xDB;
pub const FD_STATUS_100HZ: u8 = 1 << 0;
pub const FD_STATUS_120HZ: u8 = 1 << 1;
pub const FD_STATUS_100_VALID: u8 = 1 << 2;
pub const FD_STATUS_120_VALID: u8 = 1 << 3;
pub const FD_STATUS_SAT_DETECT: u8 = 1 << 4;
pub const FD_STATUS_MEAS_VALID: u8 = 1 << 5;
/// Write-1-to-clear mask for the result and valid bits.
pub const FD_STATUS_CLEAR: u8 = 0x3C;

pub const INTENAB: u8 = 0xF9;
pub const INTENAB_SP_IEN: u8 = 1 << 3;

/// SMUX RAM starts at address 0 when CFG_6 holds the write command.
pub const SMUX_RAM: u8 = 0x00;
pub const SMUX_TABLE_LEN: usize = 20;

/// Longest payload accepted by a single burst write.
pub const MAX_BURST_LEN: usize = SMUX_TABLE_LEN;

/// Post-write settle times.
pub const WORD_SETTLE_MS: u32 = 20;
pub const BURST_SETTLE_MS: u32 = 100;
/// Wait after PON before the ID register is trusted.
pub const POWER_ON_SETTLE_MS: u32 = 10;

// SMUX routing tables. ADC order in the latched data is the same for all of
// them: ADC0..ADC3 carry the four colour channels, ADC4 Clear, ADC5 NIR.

/// F1, F2, F3, F4, Clear, NIR
pub const SMUX_F1F4CN: [u8; SMUX_TABLE_LEN] = [
    0x30, 0x01, 0x00, 0x00, 0x00, 0x42, 0x00, 0x00, 0x50, 0x00,
    0x00, 0x00, 0x20, 0x04, 0x00, 0x30, 0x01, 0x50, 0x00, 0x06,
];

/// F5, F6, F7, F8, Clear, NIR
pub const SMUX_F5F8CN: [u8; SMUX_TABLE_LEN] = [
    0x00, 0x00, 0x00, 0x40, 0x02, 0x00, 0x10, 0x03, 0x50, 0x10,
    0x03, 0x00, 0x00, 0x00, 0x24, 0x00, 0x00, 0x50, 0x00, 0x06,
];

/// Flicker photodiode only
pub const SMUX_FD: [u8; SMUX_TABLE_LEN] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x60,
];
