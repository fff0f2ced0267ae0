/// Player input sampled once per tick by the input layer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Normalized horizontal axis: negative moves left, positive moves right.
    pub horizontal: f32,
    /// The rotate button went down during this tick.
    pub rotate: bool,
    /// The drop button went down during this tick.
    pub drop: bool,
}

impl TickInput {
    pub const NONE: Self = Self {
        horizontal: 0.0,
        rotate: false,
        drop: false,
    };

    #[must_use]
    pub fn direction(&self) -> Option<HorizontalDirection> {
        HorizontalDirection::from_axis(self.horizontal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum HorizontalDirection {
    Left,
    Right,
}

impl HorizontalDirection {
    #[must_use]
    pub fn from_axis(axis: f32) -> Option<Self> {
        if axis < 0.0 {
            Some(Self::Left)
        } else if axis > 0.0 {
            Some(Self::Right)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn dx(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }
}
