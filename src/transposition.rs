use std::fmt;

use serde::Serialize;

use crate::scoring::types::Pitch;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Scientific pitch name, MIDI 60 = "C4".
pub fn midi_to_name(midi: Pitch) -> String {
    let name = NOTE_NAMES[usize::from(midi % 12)];
    let octave = i32::from(midi) / 12 - 1;
    format!("{}{}", name, octave)
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

/// A constant pitch displacement between the attempt and the reference.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shift {
    pub semitones: u8,
    pub direction: Direction,
}

impl Shift {
    /// From a substitution offset (`reference_pitch - user_pitch`).
    /// A positive offset means the attempt sits below the reference and is
    /// phrased as "down"; zero is no shift at all.
    pub fn from_offset(offset: i16) -> Option<Shift> {
        let semitones = u8::try_from(offset.unsigned_abs()).ok()?;
        match offset.signum() {
            1 => Some(Shift {
                semitones,
                direction: Direction::Down,
            }),
            -1 => Some(Shift {
                semitones,
                direction: Direction::Up,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            Direction::Up => "up",
            Direction::Down => "down",
        };
        let unit = if self.semitones == 1 {
            "semitone"
        } else {
            "semitones"
        };
        write!(f, "{} by {} {}", direction, self.semitones, unit)
    }
}
