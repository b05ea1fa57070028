/// Logical gameplay buttons. The core never sees physical keys; the host
/// maps whatever device it polls onto these before each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Right,
    Up,
    Down,
    Jump,
    Dash,
    Grab,
}

const BUTTON_COUNT: usize = 7;

#[derive(Debug, Clone, Copy, Default)]
struct ButtonStates {
    down: [bool; BUTTON_COUNT],
}

impl ButtonStates {
    fn set(&mut self, button: Button, is_down: bool) {
        self.down[button.index()] = is_down;
    }

    fn is_down(&self, button: Button) -> bool {
        self.down[button.index()]
    }
}

impl Button {
    const fn index(self) -> usize {
        match self {
            Button::Left => 0,
            Button::Right => 1,
            Button::Up => 2,
            Button::Down => 3,
            Button::Jump => 4,
            Button::Dash => 5,
            Button::Grab => 6,
        }
    }
}

/// Held-state snapshot for one simulation tick. Edge detection (pressed
/// this tick) is computed by consumers from a held/previously-held
/// comparison, not stored here.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    buttons: ButtonStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_down(&self, button: Button) -> bool {
        self.buttons.is_down(button)
    }

    pub fn with_button_down(mut self, button: Button, is_down: bool) -> Self {
        self.buttons.set(button, is_down);
        self
    }

    /// Horizontal direction from held buttons: -1, 0, or +1.
    pub fn x_axis(&self) -> i32 {
        let mut axis = 0;
        if self.is_down(Button::Right) {
            axis += 1;
        }
        if self.is_down(Button::Left) {
            axis -= 1;
        }
        axis
    }

    /// Vertical direction from held buttons: -1 (up), 0, or +1 (down).
    pub fn y_axis(&self) -> i32 {
        let mut axis = 0;
        if self.is_down(Button::Down) {
            axis += 1;
        }
        if self.is_down(Button::Up) {
            axis -= 1;
        }
        axis
    }
}
