//! Header pin assignments for the PowerBlock test fixture.
//!
//! Single source of truth: every signal references this module rather than
//! hard-coding pin numbers.  Numbers are physical positions on the 40-pin
//! Raspberry Pi header (BOARD numbering), which is how the fixture cable is
//! wired.  They must not change without rewiring the fixture.

// ---------------------------------------------------------------------------
// Inputs (pull-down)
// ---------------------------------------------------------------------------

/// Shutdown request raised by the board under test.
pub const SHUTDOWN_SIGNAL_PIN: u8 = 7;
/// 5V supply rail of the board under test.
pub const SUPPLY_5V_PIN: u8 = 13;
/// Fixture contact that closes when a board is seated.
pub const BOARD_ATTACHED_PIN: u8 = 18;

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Host status line fed to the board (active HIGH = host alive).
pub const STATUS_PIN: u8 = 11;
/// Simulated power button (active LOW = pressed).
pub const BUTTON_PIN: u8 = 12;

// ---------------------------------------------------------------------------
// Status indicator (software PWM)
// ---------------------------------------------------------------------------

pub const INDICATOR_PIN: u8 = 22;

// ---------------------------------------------------------------------------
// Header → BCM translation
// ---------------------------------------------------------------------------

/// BCM GPIO number for each header position, `None` for power/ground pins.
/// Index 0 is unused so the table can be indexed by header number directly.
const HEADER_TO_BCM: [Option<u8>; 41] = [
    None,     // 0 (unused)
    None,     // 1  3V3
    None,     // 2  5V
    Some(2),  // 3
    None,     // 4  5V
    Some(3),  // 5
    None,     // 6  GND
    Some(4),  // 7
    Some(14), // 8
    None,     // 9  GND
    Some(15), // 10
    Some(17), // 11
    Some(18), // 12
    Some(27), // 13
    None,     // 14 GND
    Some(22), // 15
    Some(23), // 16
    None,     // 17 3V3
    Some(24), // 18
    Some(10), // 19
    None,     // 20 GND
    Some(9),  // 21
    Some(25), // 22
    Some(11), // 23
    Some(8),  // 24
    None,     // 25 GND
    Some(7),  // 26
    Some(0),  // 27 ID_SD
    Some(1),  // 28 ID_SC
    Some(5),  // 29
    None,     // 30 GND
    Some(6),  // 31
    Some(12), // 32
    Some(13), // 33
    None,     // 34 GND
    Some(19), // 35
    Some(16), // 36
    Some(26), // 37
    Some(20), // 38
    None,     // 39 GND
    Some(21), // 40
];

/// Translate a physical header position into its BCM GPIO number.
pub const fn header_to_bcm(header_pin: u8) -> Option<u8> {
    if header_pin as usize >= HEADER_TO_BCM.len() {
        return None;
    }
    HEADER_TO_BCM[header_pin as usize]
}
