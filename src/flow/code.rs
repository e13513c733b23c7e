//! Six-slot one-time code input with focus handling.

/// Number of slots in the code input.
pub const CODE_LENGTH: usize = 6;

const LAST_SLOT: usize = CODE_LENGTH - 1;

/// Result of writing into a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotInput {
    /// Slot updated; the code is not ready for verification.
    Pending,
    /// The last slot received a value and every slot is filled.
    Complete,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeInput {
    slots: [String; CODE_LENGTH],
    focus: usize,
}

impl CodeInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn slots(&self) -> &[String; CODE_LENGTH] {
        &self.slots
    }

    /// Index of the slot that currently has focus.
    #[must_use]
    pub fn focus(&self) -> usize {
        self.focus
    }

    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.slots.iter().all(|slot| !slot.is_empty())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(String::is_empty)
    }

    /// Concatenation of all slots.
    #[must_use]
    pub fn code(&self) -> String {
        self.slots.concat()
    }

    /// Write `value` into slot `index`.
    ///
    /// A non-empty value moves focus to the next slot. Completion is only
    /// checked when the last slot is written, so out-of-order edits to earlier
    /// slots never trigger it.
    ///
    /// # Errors
    /// Returns a reason if the index is out of range or the value is longer
    /// than one character.
    pub fn input(&mut self, index: usize, value: &str) -> Result<SlotInput, &'static str> {
        if index >= CODE_LENGTH {
            return Err("slot index out of range");
        }
        if value.chars().count() > 1 {
            return Err("slot accepts a single character");
        }

        self.slots[index] = value.to_string();
        self.focus = index;

        if !value.is_empty() && index < LAST_SLOT {
            self.focus = index + 1;
        }

        if index == LAST_SLOT && !value.is_empty() && self.is_filled() {
            return Ok(SlotInput::Complete);
        }

        Ok(SlotInput::Pending)
    }

    /// Backspace pressed on slot `index`. Only moves focus; an empty slot
    /// hands focus to its predecessor without clearing it.
    ///
    /// # Errors
    /// Returns a reason if the index is out of range.
    pub fn backspace(&mut self, index: usize) -> Result<(), &'static str> {
        if index >= CODE_LENGTH {
            return Err("slot index out of range");
        }
        self.focus = if self.slots[index].is_empty() && index > 0 {
            index - 1
        } else {
            index
        };
        Ok(())
    }

    /// Empty every slot and focus the first one.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
