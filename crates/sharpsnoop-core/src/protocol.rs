//! Line-addressed write protocol.
//!
//! Outside a write, each byte is a command. `WRITE_LINE` starts a write
//! sequence made of one or more lines, each an address byte followed by
//! data bytes until the line's bit budget is used. At the end of a line a
//! zero byte arms the line break; a second zero ends the write, while any
//! non-zero byte is the address of the next line.

use crate::config::BitOrder;
use crate::framebuffer::Framebuffer;

/// Write-line command, with and without the VCOM bit.
pub const WRITE_LINE: [u8; 2] = [0x01, 0x03];
pub const TOGGLE_VCOM: u8 = 0x02;
/// Clear command, with and without the VCOM bit.
pub const CLEAR_DISPLAY: [u8; 2] = [0x04, 0x06];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    WriteLine,
    ToggleVcom,
    Clear,
    Unknown(u8),
}

impl Command {
    pub fn classify(byte: u8) -> Self {
        if WRITE_LINE.contains(&byte) {
            Command::WriteLine
        } else if byte == TOGGLE_VCOM {
            Command::ToggleVcom
        } else if CLEAR_DISPLAY.contains(&byte) {
            Command::Clear
        } else {
            Command::Unknown(byte)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Static,
    Write,
}

/// Sub-states of a write sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePhase {
    /// Next byte is a line address.
    AwaitingAddress,
    /// Address set; data bytes fill the line until its bit budget is used.
    Line,
    /// One zero seen at end of line; another zero ends the write.
    LineBreak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Static,
    Write(WritePhase),
}

/// What a single byte did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Command(Command),
    Address(u8),
    /// Data byte; `written` cells landed inside the display.
    Data { written: usize },
    LineBreak,
    EndOfWrite,
}

#[derive(Debug, Clone)]
pub struct Protocol {
    state: State,
    active_address: u8,
    active_bit_offset: usize,
    bit_order: BitOrder,
}

impl Protocol {
    pub fn new(bit_order: BitOrder) -> Self {
        Self {
            state: State::Static,
            active_address: 0,
            active_bit_offset: 0,
            bit_order,
        }
    }

    pub fn mode(&self) -> Mode {
        match self.state {
            State::Static => Mode::Static,
            State::Write(_) => Mode::Write,
        }
    }

    pub fn phase(&self) -> Option<WritePhase> {
        match self.state {
            State::Static => None,
            State::Write(phase) => Some(phase),
        }
    }

    pub fn address_set(&self) -> bool {
        self.state == State::Write(WritePhase::Line)
    }

    pub fn linebreak_pending(&self) -> bool {
        self.state == State::Write(WritePhase::LineBreak)
    }

    pub fn active_address(&self) -> u8 {
        self.active_address
    }

    pub fn active_bit_offset(&self) -> usize {
        self.active_bit_offset
    }

    /// Interprets one byte clocked while selected.
    pub fn process(&mut self, byte: u8, fb: &mut Framebuffer) -> Effect {
        match self.state {
            State::Static => self.command(byte, fb),
            State::Write(WritePhase::AwaitingAddress) => self.start_line(byte),
            State::Write(WritePhase::Line) => {
                if self.active_bit_offset + 1 < fb.bits_per_line() {
                    let written = fb.write_byte(
                        self.active_address as usize,
                        self.active_bit_offset,
                        byte,
                        self.bit_order,
                    );
                    self.active_bit_offset += 8;
                    Effect::Data { written }
                } else if byte == 0 {
                    self.state = State::Write(WritePhase::LineBreak);
                    Effect::LineBreak
                } else {
                    self.start_line(byte)
                }
            }
            State::Write(WritePhase::LineBreak) => {
                if byte == 0 {
                    log::trace!("end of write after line {:#04x}", self.active_address);
                    self.state = State::Static;
                    self.active_bit_offset = 0;
                    Effect::EndOfWrite
                } else {
                    self.start_line(byte)
                }
            }
        }
    }

    fn command(&mut self, byte: u8, fb: &mut Framebuffer) -> Effect {
        let command = Command::classify(byte);
        log::trace!("command {byte:#04x}: {command:?}");
        match command {
            Command::WriteLine => self.state = State::Write(WritePhase::AwaitingAddress),
            Command::Clear => fb.clear(),
            Command::ToggleVcom | Command::Unknown(_) => {}
        }
        Effect::Command(command)
    }

    fn start_line(&mut self, address: u8) -> Effect {
        self.active_address = address;
        self.active_bit_offset = 0;
        self.state = State::Write(WritePhase::Line);
        Effect::Address(address)
    }
}
