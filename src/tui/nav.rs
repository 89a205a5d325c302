//! Screen declaration and the stack that tracks where the user is.
//!
//! This is layout declaration only: screens are tags, the stack is a Vec,
//! and every transition is an explicit push/pop/replace from the event
//! loop. There is no routing table and no parameterized navigation.

/// Every screen the app can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Boot screen, shown until the readiness gate opens.
    Splash,
    /// Circle list, the post-boot home screen.
    Circles,
    /// Member roster of the selected circle.
    Roster,
    /// Position map of the selected circle.
    Map,
}

impl Screen {
    /// Title shown in the status bar.
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Splash => "Starting",
            Screen::Circles => "Circles",
            Screen::Roster => "Roster",
            Screen::Map => "Map",
        }
    }

    /// Tab order: Circles → Roster → Map → Circles. Splash does not cycle.
    pub fn next_tab(&self) -> Screen {
        match self {
            Screen::Splash => Screen::Splash,
            Screen::Circles => Screen::Roster,
            Screen::Roster => Screen::Map,
            Screen::Map => Screen::Circles,
        }
    }
}

/// Stack of screens; the top is what gets drawn.
#[derive(Debug, Clone)]
pub struct NavStack {
    stack: Vec<Screen>,
}

impl NavStack {
    /// Boot starts on the splash screen.
    pub fn new() -> Self {
        Self {
            stack: vec![Screen::Splash],
        }
    }

    pub fn current(&self) -> Screen {
        // The stack is never empty: pop() refuses to remove the last entry
        *self.stack.last().unwrap_or(&Screen::Splash)
    }

    pub fn push(&mut self, screen: Screen) {
        self.stack.push(screen);
    }

    /// Pops back one screen. The last entry stays put, so Esc on the home
    /// screen is a no-op.
    pub fn pop(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    /// Swaps the current screen without growing the stack. Used for the
    /// splash → home transition and for Tab cycling.
    pub fn replace_top(&mut self, screen: Screen) {
        if let Some(top) = self.stack.last_mut() {
            *top = screen;
        }
    }

    /// Tab: advance through the cycle. Leaving home pushes (so Esc returns
    /// there); completing the cycle pops back to home instead of stacking
    /// a second copy of it.
    pub fn cycle(&mut self) {
        let current = self.current();
        match current.next_tab() {
            next if next == current => {}
            Screen::Circles => {
                self.pop();
            }
            next => {
                if current == Screen::Circles {
                    self.push(next);
                } else {
                    self.replace_top(next);
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl Default for NavStack {
    fn default() -> Self {
        Self::new()
    }
}
