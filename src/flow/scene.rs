//! Step and background visibility as one descriptor.

use std::fmt;

/// Discrete step of the login wizard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowState {
    Email,
    Code,
    Success,
    Error,
}

impl FlowState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Email => "email",
            Self::Code => "code",
            Self::Success => "success",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Which background effects are mounted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Backdrop {
    /// Only the intro effect.
    Intro,
    /// Both effects overlap while the outro fades in.
    CrossFade,
    /// Only the reverse (outro) effect.
    Outro,
}

impl Backdrop {
    #[must_use]
    pub const fn initial_visible(self) -> bool {
        matches!(self, Self::Intro | Self::CrossFade)
    }

    #[must_use]
    pub const fn reverse_visible(self) -> bool {
        matches!(self, Self::CrossFade | Self::Outro)
    }
}

/// A valid `(step, backdrop)` pair. Fields are private so the machine can
/// only move between the pairs listed in [`Scene::ALL`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Scene {
    step: FlowState,
    backdrop: Backdrop,
}

impl Scene {
    pub const ALL: [Scene; 6] = [
        Scene::email(),
        Scene::code(),
        Scene::resolving(),
        Scene::settling(),
        Scene::success(),
        Scene::error(),
    ];

    #[must_use]
    pub const fn email() -> Self {
        Self {
            step: FlowState::Email,
            backdrop: Backdrop::Intro,
        }
    }

    #[must_use]
    pub const fn code() -> Self {
        Self {
            step: FlowState::Code,
            backdrop: Backdrop::Intro,
        }
    }

    /// Verification resolved; outro mounted on top of the intro.
    #[must_use]
    pub const fn resolving() -> Self {
        Self {
            step: FlowState::Code,
            backdrop: Backdrop::CrossFade,
        }
    }

    /// Intro removed; waiting for the terminal step.
    #[must_use]
    pub const fn settling() -> Self {
        Self {
            step: FlowState::Code,
            backdrop: Backdrop::Outro,
        }
    }

    #[must_use]
    pub const fn success() -> Self {
        Self {
            step: FlowState::Success,
            backdrop: Backdrop::Outro,
        }
    }

    #[must_use]
    pub const fn error() -> Self {
        Self {
            step: FlowState::Error,
            backdrop: Backdrop::Outro,
        }
    }

    #[must_use]
    pub const fn step(self) -> FlowState {
        self.step
    }

    #[must_use]
    pub const fn backdrop(self) -> Backdrop {
        self.backdrop
    }

    #[must_use]
    pub const fn initial_visible(self) -> bool {
        self.backdrop.initial_visible()
    }

    #[must_use]
    pub const fn reverse_visible(self) -> bool {
        self.backdrop.reverse_visible()
    }
}
