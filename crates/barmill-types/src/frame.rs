//! Tables carried between pipeline steps.

use crate::{Bar, Tick};

/// Kind of rows held by a [`Frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// Raw trade ticks.
    Ticks,
    /// Aggregated bars.
    Bars,
}

impl FrameKind {
    /// Returns the kind as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ticks => "ticks",
            Self::Bars => "bars",
        }
    }
}

impl std::fmt::Display for FrameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An ordered, in-memory table of ticks or bars.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// A tick table.
    Ticks(Vec<Tick>),
    /// A bar table.
    Bars(Vec<Bar>),
}

impl Frame {
    /// Returns the kind of rows in this frame.
    #[must_use]
    pub const fn kind(&self) -> FrameKind {
        match self {
            Self::Ticks(_) => FrameKind::Ticks,
            Self::Bars(_) => FrameKind::Bars,
        }
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Ticks(ticks) => ticks.len(),
            Self::Bars(bars) => bars.len(),
        }
    }

    /// Returns true if the frame has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the ticks if this is a tick table.
    #[must_use]
    pub fn as_ticks(&self) -> Option<&[Tick]> {
        match self {
            Self::Ticks(ticks) => Some(ticks),
            Self::Bars(_) => None,
        }
    }

    /// Returns the bars if this is a bar table.
    #[must_use]
    pub fn as_bars(&self) -> Option<&[Bar]> {
        match self {
            Self::Bars(bars) => Some(bars),
            Self::Ticks(_) => None,
        }
    }
}

impl From<Vec<Tick>> for Frame {
    fn from(ticks: Vec<Tick>) -> Self {
        Self::Ticks(ticks)
    }
}

impl From<Vec<Bar>> for Frame {
    fn from(bars: Vec<Bar>) -> Self {
        Self::Bars(bars)
    }
}
