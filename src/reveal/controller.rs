use std::collections::VecDeque;
use std::fmt;

use crate::foundation::config::TypingConfig;
use crate::foundation::core::PackedColor;
use crate::markup::tokenizer::{ControlKind, ControlToken};

/// Lifecycle of a reveal run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RevealState {
    /// Nothing shown yet; the first `advance` starts the run.
    #[default]
    Stopped,
    /// Revealing.
    Running,
    /// Frozen by `pause`.
    Paused,
    /// Every glyph is visible.
    Ended,
}

/// Called with the name of every fired event.
pub type EventCallback = Box<dyn FnMut(&str)>;
/// Called once when a run ends.
pub type EndCallback = Box<dyn FnMut()>;

/// Typewriter cursor over a glyph sequence.
///
/// Time only moves in [`RevealController::advance`]; everything is deterministic for a given
/// sequence of `dt` values.
pub struct RevealController {
    seconds_per_char: f64,
    char_limit: Option<usize>,
    tokens: Vec<ControlToken>,
    total: usize,

    state: RevealState,
    visible: usize,
    next_token: usize,
    accumulator: f64,
    hold: f64,
    token_speed: f64,
    global_speed: f64,
    skip_budget: usize,
    active_color: Option<PackedColor>,
    pending_events: VecDeque<String>,
    end_fired: bool,

    on_event: Option<EventCallback>,
    on_end: Option<EndCallback>,
}

impl fmt::Debug for RevealController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevealController")
            .field("state", &self.state)
            .field("visible", &self.visible)
            .field("total", &self.total)
            .field("next_token", &self.next_token)
            .field("hold", &self.hold)
            .field("token_speed", &self.token_speed)
            .field("global_speed", &self.global_speed)
            .finish_non_exhaustive()
    }
}

impl RevealController {
    /// Controller over `total` glyphs with the given control tokens (sorted by position).
    pub fn new(config: &TypingConfig, tokens: Vec<ControlToken>, total: usize) -> Self {
        Self {
            seconds_per_char: config.seconds_per_char.max(0.0),
            char_limit: config.char_limit_per_frame,
            tokens,
            total,
            state: RevealState::Stopped,
            visible: 0,
            next_token: 0,
            accumulator: 0.0,
            hold: 0.0,
            token_speed: 1.0,
            global_speed: 1.0,
            skip_budget: 0,
            active_color: None,
            pending_events: VecDeque::new(),
            end_fired: false,
            on_event: None,
            on_end: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RevealState {
        self.state
    }

    /// Number of glyphs currently visible.
    pub fn visible_count(&self) -> usize {
        self.visible
    }

    /// Number of glyphs in the sequence.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Return `true` once every glyph is visible.
    pub fn is_finished(&self) -> bool {
        self.state == RevealState::Ended
    }

    /// Color set by the last `{COLOR}` token passed, if any.
    pub fn active_color(&self) -> Option<PackedColor> {
        self.active_color
    }

    /// Delay multiplier set by the last speed token.
    pub fn token_speed(&self) -> f64 {
        self.token_speed
    }

    /// Global time scale.
    pub fn speed(&self) -> f64 {
        self.global_speed
    }

    /// Scale elapsed time; `2.0` reveals twice as fast. Non-positive values are ignored.
    pub fn set_speed(&mut self, multiplier: f64) {
        if multiplier.is_finite() && multiplier > 0.0 {
            self.global_speed = multiplier;
        } else {
            tracing::warn!(multiplier, "ignoring invalid reveal speed");
        }
    }

    /// Register the event callback.
    pub fn on_event(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_event = Some(Box::new(callback));
    }

    /// Register the completion callback.
    pub fn on_end(&mut self, callback: impl FnMut() + 'static) {
        self.on_end = Some(Box::new(callback));
    }

    /// Take every event fired since the last drain.
    pub fn drain_events(&mut self) -> Vec<String> {
        self.pending_events.drain(..).collect()
    }

    /// Advance by `dt` seconds. Returns the number of glyphs revealed by this call.
    pub fn advance(&mut self, dt: f64) -> usize {
        match self.state {
            RevealState::Stopped => self.state = RevealState::Running,
            RevealState::Running => {}
            RevealState::Paused | RevealState::Ended => return 0,
        }
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            tracing::warn!(dt, "ignoring invalid frame delta");
            0.0
        };
        self.accumulator += dt * self.global_speed;

        let before = self.visible;
        loop {
            if self.hold > 0.0 {
                if self.accumulator < self.hold {
                    self.hold -= self.accumulator;
                    self.accumulator = 0.0;
                    break;
                }
                self.accumulator -= self.hold;
                self.hold = 0.0;
            }

            if self.apply_next_token() {
                continue;
            }

            if self.visible >= self.total {
                self.flush_tokens(true);
                self.finish();
                break;
            }

            if self.skip_budget > 0 {
                self.skip_budget -= 1;
                self.visible += 1;
                continue;
            }

            if self
                .char_limit
                .is_some_and(|limit| self.visible - before >= limit)
            {
                break;
            }

            let cost = self.seconds_per_char * self.token_speed;
            if self.accumulator < cost {
                break;
            }
            self.accumulator -= cost;
            self.visible += 1;
        }
        self.visible - before
    }

    /// Freeze a stopped or running controller.
    pub fn pause(&mut self) {
        if matches!(self.state, RevealState::Stopped | RevealState::Running) {
            self.state = RevealState::Paused;
        }
    }

    /// Unfreeze a paused controller.
    pub fn resume(&mut self) {
        if self.state == RevealState::Paused {
            self.state = RevealState::Running;
        }
    }

    /// Reveal everything now. Remaining events fire in order unless `fire_events` is false.
    pub fn skip_to_end(&mut self, fire_events: bool) {
        if self.state == RevealState::Ended {
            return;
        }
        self.flush_tokens(fire_events);
        self.visible = self.total;
        self.hold = 0.0;
        self.skip_budget = 0;
        self.finish();
    }

    /// Hide everything and return to [`RevealState::Stopped`].
    pub fn restart(&mut self) {
        self.state = RevealState::Stopped;
        self.visible = 0;
        self.next_token = 0;
        self.accumulator = 0.0;
        self.hold = 0.0;
        self.token_speed = 1.0;
        self.skip_budget = 0;
        self.active_color = None;
        self.pending_events.clear();
        self.end_fired = false;
    }

    /// Replace tokens and glyph count, then restart.
    pub fn retokenize(&mut self, tokens: Vec<ControlToken>, total: usize) {
        self.tokens = tokens;
        self.total = total;
        self.restart();
    }

    /// Change the glyph count without losing progress (after a re-layout).
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        if self.visible > total {
            self.visible = total;
        }
        if self.state == RevealState::Ended && self.visible < total {
            self.state = RevealState::Running;
        }
    }

    /// Apply every token not yet reached, including ones placed past a truncated end.
    /// Waits and skips have nothing left to act on.
    fn flush_tokens(&mut self, fire_events: bool) {
        while let Some(token) = self.tokens.get(self.next_token).cloned() {
            self.next_token += 1;
            match token.kind {
                ControlKind::Event(name) if fire_events => self.fire_event(name),
                ControlKind::Event(_) | ControlKind::Wait(_) | ControlKind::Skip(_) => {}
                kind => self.apply(kind),
            }
        }
    }

    fn apply_next_token(&mut self) -> bool {
        let Some(token) = self.tokens.get(self.next_token) else {
            return false;
        };
        if token.position > self.visible {
            return false;
        }
        let kind = token.kind.clone();
        self.next_token += 1;
        self.apply(kind);
        true
    }

    fn apply(&mut self, kind: ControlKind) {
        match kind {
            ControlKind::Wait(secs) => {
                if self.skip_budget == 0 {
                    self.hold += secs;
                }
            }
            ControlKind::Event(name) => self.fire_event(name),
            ControlKind::Speed(multiplier) => self.token_speed = multiplier,
            ControlKind::Skip(count) => {
                let left = self.total.saturating_sub(self.visible);
                self.skip_budget = count.map_or(left, |n| n.min(left));
            }
            ControlKind::Color(color) => self.active_color = Some(color),
            ControlKind::ClearColor => self.active_color = None,
        }
    }

    fn fire_event(&mut self, name: String) {
        tracing::debug!(event = name.as_str(), "reveal event");
        if let Some(callback) = self.on_event.as_mut() {
            callback(&name);
        }
        self.pending_events.push_back(name);
    }

    fn finish(&mut self) {
        self.state = RevealState::Ended;
        self.hold = 0.0;
        if !self.end_fired {
            self.end_fired = true;
            if let Some(callback) = self.on_end.as_mut() {
                callback();
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/controller.rs"]
mod tests;
