use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A guest's answer to the invitation. Serialized as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Attendance {
    Yes = 1,
    No = 2,
    Later = 3,
}

/// Human-readable labels used by exports.
pub const ATTENDANCE_LABELS: [(Attendance, &str); 3] = [
    (Attendance::Yes, "Да, с удовольствием"),
    (Attendance::No, "К сожалению не смогу"),
    (Attendance::Later, "Отвечу позже (до 25.04.2026)"),
];

pub const UNKNOWN_ATTENDANCE_LABEL: &str = "Неизвестно";

impl Attendance {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        attendance_label(self.code().into())
    }
}

/// Label for a stored code. Codes outside the enum get the unknown label.
pub fn attendance_label(code: i64) -> &'static str {
    ATTENDANCE_LABELS
        .iter()
        .find(|(option, _)| i64::from(option.code()) == code)
        .map_or(UNKNOWN_ATTENDANCE_LABEL, |(_, label)| *label)
}

impl From<Attendance> for u8 {
    fn from(value: Attendance) -> Self {
        value.code()
    }
}

impl TryFrom<u8> for Attendance {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Yes),
            2 => Ok(Self::No),
            3 => Ok(Self::Later),
            other => Err(format!("attendance must be 1, 2 or 3, got {other}")),
        }
    }
}

/// A single persisted (guest name, attendance) pair.
///
/// `attendance` is the raw stored code. New records always carry a valid
/// `Attendance`, but older files may hold codes outside 1..=3 and those are
/// kept as-is rather than dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestRecord {
    pub guest: String,
    pub attendance: i64,
}

impl GuestRecord {
    pub fn new(guest: impl Into<String>, attendance: Attendance) -> Self {
        Self {
            guest: guest.into(),
            attendance: attendance.code().into(),
        }
    }

    pub fn attendance_label(&self) -> &'static str {
        attendance_label(self.attendance)
    }
}

/// Coerce a stored attendance value to an integer code.
///
/// Integers pass through, integral-looking strings (`"2"`) and floats are
/// truncated to their integer value, booleans count as 0/1.
pub(crate) fn coerce_attendance(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
