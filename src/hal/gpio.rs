//! GPIO Abstractions
//!
//! Keys, the status lines from the RF module and the switched outputs of
//! the handheld. Written against the `embedded-hal` digital traits so the
//! same wrappers take embassy `Input`/`Output` pins or expander pins.

use embedded_hal::digital::{InputPin, OutputPin};

/// Debounced active-low key
pub struct Key<P> {
    pin: P,
    pressed: bool,
    last_raw: bool,
    stable_count: u8,
}

impl<P: InputPin> Key<P> {
    /// Consecutive equal samples before a level is accepted
    const DEBOUNCE_SAMPLES: u8 = 3;

    /// Create a key (active low with pull-up)
    #[must_use]
    pub const fn new(pin: P) -> Self {
        Self {
            pin,
            pressed: false,
            last_raw: false,
            stable_count: 0,
        }
    }

    /// Sample the pin once per tick.
    ///
    /// Returns `Some(pressed)` when the debounced level changes.
    pub fn update(&mut self) -> Option<bool> {
        // a pin that cannot be read counts as released
        let raw = self.pin.is_low().unwrap_or(false);

        if raw == self.last_raw {
            self.stable_count = self.stable_count.saturating_add(1);
        } else {
            self.stable_count = 0;
            self.last_raw = raw;
        }

        if self.stable_count >= Self::DEBOUNCE_SAMPLES && raw != self.pressed {
            self.pressed = raw;
            return Some(raw);
        }
        None
    }

    /// Debounced level
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.pressed
    }
}

/// Active-high status line from the RF module (squelch, tone detect)
pub struct StatusLine<P> {
    pin: P,
    last: bool,
}

impl<P: InputPin> StatusLine<P> {
    /// Wrap an input pin
    #[must_use]
    pub const fn new(pin: P) -> Self {
        Self { pin, last: false }
    }

    /// Current level
    pub fn is_active(&mut self) -> bool {
        self.pin.is_high().unwrap_or(false)
    }

    /// Edge since the previous call: `Some(true)` rising, `Some(false)` falling
    pub fn edge(&mut self) -> Option<bool> {
        let now = self.is_active();
        let edge = (now != self.last).then_some(now);
        self.last = now;
        edge
    }

    /// Forget the previous level so an active line reports a rising edge again
    pub fn rearm(&mut self) {
        self.last = false;
    }
}

/// On/off output (audio amplifier, transmit enable, RF sleep, LED)
pub struct Switch<P> {
    pin: P,
    on: bool,
}

impl<P: OutputPin> Switch<P> {
    /// Create a switch, initially off
    pub fn new(pin: P) -> Self {
        let mut switch = Self { pin, on: true };
        switch.set(false);
        switch
    }

    /// Switch on or off
    pub fn set(&mut self, on: bool) {
        let result = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if result.is_ok() {
            self.on = on;
        }
    }

    /// Current state
    #[must_use]
    pub const fn is_on(&self) -> bool {
        self.on
    }
}
