//! Linked PWM parameters.
//!
//! The generator is driven by two stored quantities, the period length and the
//! pulse length, both in microseconds. Frequency and duty cycle are derived
//! views that can also be edited; editing them rewrites the stored quantities.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Period, Frequency, Pulse Width and Duty Cycle
=============================================

    high ┌──────┐             ┌──────┐
         │      │             │      │
    low  ┘      └─────────────┘      └──────
         |<-w ->|
         |<-------- λ -------->|

  λ (period)     Length of one full cycle, in microseconds.
  f (frequency)  Cycles per second: f = 1e6 / λ
  w (pulse)      How long the signal stays high, in microseconds.
  duty           Fraction of the period spent high: duty = w / λ * 100 %

Editing rules
-------------

  period     λ' = clamp(v);             w' = min(w, λ')
  frequency  λ' = 1e6 / clamp(v);       w' = w * λ' / λ   (duty preserved)
  pulse      w' = clamp(v, 0, λ)
  duty       w' = λ * clamp(v, 0, 100) / 100

The period is held inside the audible band: 20 Hz (50 000 µs) down to
20 kHz (50 µs).
*/

/// Lowest selectable frequency in Hz
pub const FREQ_MIN_HZ: f64 = 20.0;
/// Highest selectable frequency in Hz
pub const FREQ_MAX_HZ: f64 = 20_000.0;
/// Shortest period in microseconds (highest frequency)
pub const PERIOD_MIN_US: f64 = 1e6 / FREQ_MAX_HZ;
/// Longest period in microseconds (lowest frequency)
pub const PERIOD_MAX_US: f64 = 1e6 / FREQ_MIN_HZ;

/// Step sizes used by the form for increment/decrement
pub const PERIOD_STEP_US: f64 = 100.0;
pub const FREQUENCY_STEP_HZ: f64 = 1.0;
pub const PULSE_STEP_US: f64 = 100.0;
pub const DUTY_STEP_PERCENT: f64 = 0.5;

/// Numeric parameter fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Period,
    Frequency,
    Pulse,
    Duty,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Period => "period",
            Field::Frequency => "frequency",
            Field::Pulse => "pulse width",
            Field::Duty => "duty cycle",
        }
    }
}

/// A single user edit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamEdit {
    /// Period length in microseconds
    Period(f64),
    /// Frequency in Hz
    Frequency(f64),
    /// Pulse length in microseconds
    Pulse(f64),
    /// Duty cycle in percent
    Duty(f64),
    /// Phase-invert the right channel
    Inverted(bool),
    /// Shift levels so the waveform has zero mean
    DcCut(bool),
}

impl ParamEdit {
    fn numeric(&self) -> Option<(Field, f64)> {
        match *self {
            ParamEdit::Period(v) => Some((Field::Period, v)),
            ParamEdit::Frequency(v) => Some((Field::Frequency, v)),
            ParamEdit::Pulse(v) => Some((Field::Pulse, v)),
            ParamEdit::Duty(v) => Some((Field::Duty, v)),
            ParamEdit::Inverted(_) | ParamEdit::DcCut(_) => None,
        }
    }
}

/// Errors produced when an edit cannot be applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamError {
    /// The value was NaN or infinite
    NotFinite { field: Field, value: f64 },
}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamError::NotFinite { field, value } => {
                write!(f, "{} must be a finite number, got {}", field.name(), value)
            }
        }
    }
}

impl std::error::Error for ParamError {}

/// Generator parameters
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "StoredParams"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PwmParams {
    period_us: f64,
    pulse_us: f64,
    inverted: bool,
    dc_cut: bool,
}

impl PwmParams {
    /// 50 Hz with a 1.5 ms pulse, mono, no DC cut
    pub fn new() -> Self {
        Self {
            period_us: 20_000.0,
            pulse_us: 1_500.0,
            inverted: false,
            dc_cut: false,
        }
    }

    /// Builder form of [`apply`](Self::apply). Non-finite values are ignored.
    pub fn with_period_us(mut self, period_us: f64) -> Self {
        let _ = self.apply(ParamEdit::Period(period_us));
        self
    }

    pub fn with_frequency_hz(mut self, frequency_hz: f64) -> Self {
        let _ = self.apply(ParamEdit::Frequency(frequency_hz));
        self
    }

    pub fn with_pulse_us(mut self, pulse_us: f64) -> Self {
        let _ = self.apply(ParamEdit::Pulse(pulse_us));
        self
    }

    pub fn with_duty_percent(mut self, duty_percent: f64) -> Self {
        let _ = self.apply(ParamEdit::Duty(duty_percent));
        self
    }

    pub fn with_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    pub fn with_dc_cut(mut self, dc_cut: bool) -> Self {
        self.dc_cut = dc_cut;
        self
    }

    pub fn period_us(&self) -> f64 {
        self.period_us
    }

    pub fn pulse_us(&self) -> f64 {
        self.pulse_us
    }

    pub fn inverted(&self) -> bool {
        self.inverted
    }

    pub fn dc_cut(&self) -> bool {
        self.dc_cut
    }

    pub fn frequency_hz(&self) -> f64 {
        1e6 / self.period_us
    }

    pub fn duty_percent(&self) -> f64 {
        self.pulse_us / self.period_us * 100.0
    }

    /// Current value of a numeric field, unrounded
    pub fn value(&self, field: Field) -> f64 {
        match field {
            Field::Period => self.period_us,
            Field::Frequency => self.frequency_hz(),
            Field::Pulse => self.pulse_us,
            Field::Duty => self.duty_percent(),
        }
    }

    /// Value of a field as the form shows it.
    ///
    /// Period, frequency and pulse are whole numbers; duty keeps one decimal.
    pub fn display_value(&self, field: Field) -> f64 {
        let value = self.value(field);
        match field {
            Field::Duty => (value * 10.0).round() / 10.0,
            _ => value.round(),
        }
    }

    /// Apply an edit, keeping the linked quantities consistent.
    ///
    /// Returns whether anything changed. Out-of-range values are clamped;
    /// non-finite values are rejected and leave the parameters untouched.
    pub fn apply(&mut self, edit: ParamEdit) -> Result<bool, ParamError> {
        if let Some((field, value)) = edit.numeric() {
            if !value.is_finite() {
                return Err(ParamError::NotFinite { field, value });
            }
        }

        let before = *self;
        match edit {
            ParamEdit::Period(v) => {
                self.period_us = v.clamp(PERIOD_MIN_US, PERIOD_MAX_US);
                self.pulse_us = self.pulse_us.min(self.period_us);
            }
            ParamEdit::Frequency(v) => {
                let period_us = 1e6 / v.clamp(FREQ_MIN_HZ, FREQ_MAX_HZ);
                self.pulse_us = (self.pulse_us * period_us / self.period_us).min(period_us);
                self.period_us = period_us;
            }
            ParamEdit::Pulse(v) => {
                self.pulse_us = v.clamp(0.0, self.period_us);
            }
            ParamEdit::Duty(v) => {
                self.pulse_us = self.period_us * v.clamp(0.0, 100.0) / 100.0;
            }
            ParamEdit::Inverted(inverted) => self.inverted = inverted,
            ParamEdit::DcCut(dc_cut) => self.dc_cut = dc_cut,
        }
        Ok(*self != before)
    }
}

impl Default for PwmParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Unchecked field values as they appear in serialized form
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct StoredParams {
    period_us: f64,
    pulse_us: f64,
    inverted: bool,
    dc_cut: bool,
}

/// Stored values go through the same clamping as user edits
#[cfg(feature = "serde")]
impl TryFrom<StoredParams> for PwmParams {
    type Error = ParamError;

    fn try_from(stored: StoredParams) -> Result<Self, ParamError> {
        let mut params = PwmParams::new()
            .with_inverted(stored.inverted)
            .with_dc_cut(stored.dc_cut);
        params.apply(ParamEdit::Period(stored.period_us))?;
        params.apply(ParamEdit::Pulse(stored.pulse_us))?;
        Ok(params)
    }
}
