//! Simulated AS7341 register file for driver tests.
//!
//! Models the bank-switched address space, the self-clearing SMUXEN bit,
//! write-1-to-clear status registers and a scripted FD_STATUS sequence.
//! Time is shared between [`SimDelay`] and [`SimClock`], so bounded polls
//! run instantly but still observe their ceilings.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};

use super::As7341;
use crate::ports::Clock;
use crate::registers::*;

/// Nanosecond time source shared by the fake delay and clock
#[derive(Clone, Default)]
pub struct SimTime(Rc<Cell<u64>>);

impl SimTime {
    pub fn now_ms(&self) -> u64 {
        self.0.get() / 1_000_000
    }

    fn advance_ns(&self, ns: u64) {
        self.0.set(self.0.get() + ns);
    }
}

pub struct SimDelay(pub SimTime);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.advance_ns(u64::from(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.0.advance_ns(u64::from(us) * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.advance_ns(u64::from(ms) * 1_000_000);
    }
}

pub struct SimClock(pub SimTime);

impl Clock for SimClock {
    fn now_ms(&self) -> u64 {
        self.0.now_ms()
    }
}

/// One register write as seen on the bus
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Write {
    pub reg: u8,
    pub data: Vec<u8>,
    /// REG_BANK was set when the write happened
    pub bank1: bool,
}

pub struct SimState {
    bank0: [u8; 256],
    bank1: [u8; 0x80],
    pub writes: Vec<Write>,
    pub reads: Vec<u8>,
    /// Fail every transfer
    pub fail_all: bool,
    /// Fail any transfer that addresses this register
    pub fail_reg: Option<u8>,
    /// AVALID rises as soon as SP_EN is set
    pub complete_measurement: bool,
    /// SMUXEN never self-clears
    pub smux_sticks: bool,
    /// Successive FD_STATUS values; the last one sticks
    pub fd_script: VecDeque<u8>,
}

impl SimState {
    fn bank1_selected(&self) -> bool {
        self.bank0[CFG_0 as usize] & CFG_0_REG_BANK != 0
    }

    fn load(&mut self, addr: u8) -> u8 {
        if addr < 0x80 && self.bank1_selected() {
            return self.bank1[addr as usize];
        }
        if addr == FD_STATUS {
            if let Some(next) = self.fd_script.pop_front() {
                self.bank0[FD_STATUS as usize] = next;
            }
        }
        self.bank0[addr as usize]
    }

    fn store(&mut self, addr: u8, value: u8) {
        if addr < 0x80 && self.bank1_selected() {
            self.bank1[addr as usize] = value;
            return;
        }
        let slot = &mut self.bank0[addr as usize];
        match addr {
            FD_STATUS | STATUS => *slot &= !value,
            ENABLE => {
                *slot = value;
                if value & ENABLE_SMUXEN != 0 && !self.smux_sticks {
                    *slot &= !ENABLE_SMUXEN;
                }
                if value & ENABLE_SP_EN == 0 {
                    self.bank0[STATUS_2 as usize] &= !STATUS_2_AVALID;
                } else if self.complete_measurement {
                    self.bank0[STATUS_2 as usize] |= STATUS_2_AVALID;
                }
            }
            _ => *slot = value,
        }
    }
}

/// Cloneable handle: the driver owns one clone, the test inspects another.
#[derive(Clone)]
pub struct SimAs7341(Rc<RefCell<SimState>>);

impl SimAs7341 {
    pub fn new() -> Self {
        let mut bank0 = [0u8; 256];
        bank0[ID as usize] = ID_VALUE | 0x01;
        let state = SimState {
            bank0,
            bank1: [0u8; 0x80],
            writes: Vec::new(),
            reads: Vec::new(),
            fail_all: false,
            fail_reg: None,
            complete_measurement: true,
            smux_sticks: false,
            fd_script: VecDeque::new(),
        };
        Self(Rc::new(RefCell::new(state)))
    }

    pub fn state(&self) -> std::cell::RefMut<'_, SimState> {
        self.0.borrow_mut()
    }

    /// Bank 0 (or bank-independent) register value
    pub fn reg(&self, addr: u8) -> u8 {
        self.0.borrow().bank0[addr as usize]
    }

    pub fn set_reg(&self, addr: u8, value: u8) {
        self.0.borrow_mut().bank0[addr as usize] = value;
    }

    pub fn bank1_reg(&self, addr: u8) -> u8 {
        self.0.borrow().bank1[addr as usize]
    }

    pub fn set_bank1_reg(&self, addr: u8, value: u8) {
        self.0.borrow_mut().bank1[addr as usize] = value;
    }

    pub fn bank1_selected(&self) -> bool {
        self.0.borrow().bank1_selected()
    }

    /// Load the ASTATUS + CH0..CH5 block
    pub fn set_latch(&self, astatus: u8, channels: [u16; 6]) {
        let mut st = self.0.borrow_mut();
        st.bank0[ASTATUS as usize] = astatus;
        for (i, ch) in channels.iter().enumerate() {
            let [lo, hi] = ch.to_le_bytes();
            st.bank0[CH0_DATA_L as usize + 2 * i] = lo;
            st.bank0[CH0_DATA_L as usize + 2 * i + 1] = hi;
        }
    }

    pub fn writes(&self) -> Vec<Write> {
        self.0.borrow().writes.clone()
    }

    pub fn writes_to(&self, reg: u8) -> Vec<Vec<u8>> {
        self.0
            .borrow()
            .writes
            .iter()
            .filter(|w| w.reg == reg)
            .map(|w| w.data.clone())
            .collect()
    }

    pub fn clear_log(&self) {
        let mut st = self.0.borrow_mut();
        st.writes.clear();
        st.reads.clear();
    }

    pub fn transfer_count(&self) -> usize {
        let st = self.0.borrow();
        st.writes.len() + st.reads.len()
    }
}

impl ErrorType for SimAs7341 {
    type Error = ErrorKind;
}

impl I2c for SimAs7341 {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        assert_eq!(address, I2C_ADDR, "unexpected device address");
        let mut st = self.0.borrow_mut();
        let target = match operations.first() {
            Some(Operation::Write(bytes)) => bytes.first().copied(),
            _ => None,
        };
        if st.fail_all || (target.is_some() && target == st.fail_reg) {
            return Err(ErrorKind::Other);
        }

        let mut pointer = None;
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    let reg = bytes[0];
                    pointer = Some(reg);
                    if bytes.len() > 1 {
                        let bank1 = st.bank1_selected();
                        st.writes.push(Write {
                            reg,
                            data: bytes[1..].to_vec(),
                            bank1,
                        });
                        for (i, &b) in bytes[1..].iter().enumerate() {
                            st.store(reg.wrapping_add(i as u8), b);
                        }
                    }
                }
                Operation::Read(buf) => {
                    let reg = pointer.expect("read without register pointer");
                    st.reads.push(reg);
                    for (i, b) in buf.iter_mut().enumerate() {
                        *b = st.load(reg.wrapping_add(i as u8));
                    }
                }
            }
        }
        Ok(())
    }
}

pub type SimDriver = As7341<SimAs7341, SimDelay, SimClock>;

/// Fresh driver on a simulated device, plus handles to inspect it
pub fn driver() -> (SimDriver, SimAs7341, SimTime) {
    let sim = SimAs7341::new();
    let time = SimTime::default();
    let drv = As7341::new(sim.clone(), SimDelay(time.clone()), SimClock(time.clone()));
    (drv, sim, time)
}
