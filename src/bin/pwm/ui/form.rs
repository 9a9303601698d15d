//! Parameter form state - field selection, stepping and typed entry

use pwm_player::params::{
    Field, ParamEdit, PwmParams, DUTY_STEP_PERCENT, FREQUENCY_STEP_HZ, PERIOD_STEP_US,
    PULSE_STEP_US,
};

/// Longest accepted typed value
const MAX_ENTRY_LEN: usize = 12;

/// Rows of the form, top to bottom
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Period,
    Frequency,
    Pulse,
    Duty,
    Invert,
    DcCut,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Period,
        FormField::Frequency,
        FormField::Pulse,
        FormField::Duty,
        FormField::Invert,
        FormField::DcCut,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Period => "Period",
            FormField::Frequency => "Frequency",
            FormField::Pulse => "Pulse width",
            FormField::Duty => "Duty cycle",
            FormField::Invert => "Invert right channel",
            FormField::DcCut => "DC cut",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            FormField::Period | FormField::Pulse => "µs",
            FormField::Frequency => "Hz",
            FormField::Duty => "%",
            FormField::Invert | FormField::DcCut => "",
        }
    }

    fn numeric(self) -> Option<Field> {
        match self {
            FormField::Period => Some(Field::Period),
            FormField::Frequency => Some(Field::Frequency),
            FormField::Pulse => Some(Field::Pulse),
            FormField::Duty => Some(Field::Duty),
            FormField::Invert | FormField::DcCut => None,
        }
    }

    /// Rendered value: rounded number or checkbox
    pub fn value_text(self, params: &PwmParams) -> String {
        match self {
            FormField::Invert => checkbox(params.inverted()),
            FormField::DcCut => checkbox(params.dc_cut()),
            FormField::Duty => format!("{:.1}", params.display_value(Field::Duty)),
            field => match field.numeric() {
                Some(numeric) => format!("{:.0}", params.display_value(numeric)),
                None => String::new(),
            },
        }
    }
}

fn checkbox(checked: bool) -> String {
    let mark = if checked { "[x]" } else { "[ ]" };
    mark.to_string()
}

fn step_size(field: Field) -> f64 {
    match field {
        Field::Period => PERIOD_STEP_US,
        Field::Frequency => FREQUENCY_STEP_HZ,
        Field::Pulse => PULSE_STEP_US,
        Field::Duty => DUTY_STEP_PERCENT,
    }
}

fn edit_for(field: Field, value: f64) -> ParamEdit {
    match field {
        Field::Period => ParamEdit::Period(value),
        Field::Frequency => ParamEdit::Frequency(value),
        Field::Pulse => ParamEdit::Pulse(value),
        Field::Duty => ParamEdit::Duty(value),
    }
}

/// Typed entry that does not parse as a number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEntry {
    pub field: &'static str,
    pub text: String,
}

impl std::fmt::Display for InvalidEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:?} is not a number", self.field, self.text)
    }
}

impl std::error::Error for InvalidEntry {}

/// Selection and in-progress typed entry
#[derive(Debug, Default)]
pub struct Form {
    selected: usize,
    entry: Option<String>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> FormField {
        FormField::ALL[self.selected]
    }

    pub fn is_entering(&self) -> bool {
        self.entry.is_some()
    }

    /// Text typed so far, if an entry is in progress
    pub fn entry(&self) -> Option<&str> {
        self.entry.as_deref()
    }

    pub fn select_next(&mut self) {
        self.entry = None;
        self.selected = (self.selected + 1) % FormField::ALL.len();
    }

    pub fn select_prev(&mut self) {
        self.entry = None;
        self.selected = (self.selected + FormField::ALL.len() - 1) % FormField::ALL.len();
    }

    /// Step the selected field up (`direction > 0`) or down from its shown value
    pub fn step(&self, params: &PwmParams, direction: f64, coarse: bool) -> Option<ParamEdit> {
        let selected = self.selected();
        match selected.numeric() {
            Some(field) => {
                let step = step_size(field) * if coarse { 10.0 } else { 1.0 };
                let value = params.display_value(field) + direction.signum() * step;
                Some(edit_for(field, value))
            }
            None => self.toggle(params),
        }
    }

    /// Flip the selected checkbox; `None` on numeric rows
    pub fn toggle(&self, params: &PwmParams) -> Option<ParamEdit> {
        match self.selected() {
            FormField::Invert => Some(ParamEdit::Inverted(!params.inverted())),
            FormField::DcCut => Some(ParamEdit::DcCut(!params.dc_cut())),
            _ => None,
        }
    }

    /// Feed a typed character. Returns whether it was accepted.
    ///
    /// Only digits and a single decimal point on numeric rows are taken.
    pub fn input_char(&mut self, c: char) -> bool {
        if self.selected().numeric().is_none() {
            return false;
        }
        let entry = self.entry.get_or_insert_with(String::new);
        let accepted = entry.len() < MAX_ENTRY_LEN
            && (c.is_ascii_digit() || (c == '.' && !entry.contains('.')));
        if accepted {
            entry.push(c);
        }
        if entry.is_empty() {
            self.entry = None;
        }
        accepted
    }

    pub fn backspace(&mut self) {
        if let Some(entry) = &mut self.entry {
            entry.pop();
        }
    }

    pub fn cancel(&mut self) {
        self.entry = None;
    }

    /// Finish typed entry, producing the edit to apply.
    ///
    /// An empty entry is treated as a cancel.
    pub fn commit(&mut self) -> Result<Option<ParamEdit>, InvalidEntry> {
        let Some(text) = self.entry.take() else {
            return Ok(None);
        };
        let Some(field) = self.selected().numeric() else {
            return Ok(None);
        };
        if text.is_empty() {
            return Ok(None);
        }
        match text.parse::<f64>() {
            Ok(value) => Ok(Some(edit_for(field, value))),
            Err(_) => Err(InvalidEntry {
                field: field.name(),
                text,
            }),
        }
    }
}
