//! Multiplexer wiring for the reed matrix.
//!
//! The controller I/O assignment is fixed by the board wiring and must not
//! be reinterpreted. A target HAL implementation maps `BoardHal` onto it as
//! follows: electromagnet driver on pin 6; file-axis stepper dir/step on
//! 11/10 and rank-axis dir/step on 13/12; the four shared multiplexer
//! address lines on A3/A2/A1/A0; one signal line per reed bank on 5/4/3/2;
//! white and black override buttons on 0/1.

/// 4-bit address pattern per multiplexer channel, in wiring order. The upper
/// half of the table absorbs a physical wiring inversion; entry 8 is the
/// flipped one.
pub const MUX_CHANNEL: [[bool; 4]; 16] = [
    [false, false, false, false],
    [true, false, false, false],
    [false, true, false, false],
    [true, true, false, false],
    [false, false, true, false],
    [true, false, true, false],
    [false, true, true, false],
    [true, true, true, false],
    [true, true, true, true], // flipped
    [false, true, true, true],
    [true, false, true, true],
    [false, false, true, true],
    [true, true, false, true],
    [false, true, false, true],
    [true, false, false, true],
    [false, false, false, true],
];

/// Address pattern for a channel. Channels are masked to 0..15; callers
/// validate upstream.
pub fn channel_pattern(channel: u8) -> [bool; 4] {
    MUX_CHANNEL[(channel & 0x0f) as usize]
}
