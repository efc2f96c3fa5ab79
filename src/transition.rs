//! Height transitions across content swaps.
//!
//! A [`TransitionSequencer`] owns the content a container currently shows and an optional
//! explicit height override. The draw loop calls [`TransitionSequencer::advance`] once per
//! frame with a `measure` function returning the natural row count of some content; the
//! sequencer uses it to pin, interpolate and finally release the container height.
//!
//! Reveal (new content):
//! 1. capture the current height and pin it;
//! 2. next frame: commit the new content, height still pinned (`Settled`);
//! 3. next frame: measure the new natural height and start interpolating old -> new;
//! 4. when the duration elapses, drop the override.
//!
//! Collapse: capture the current height, interpolate it to zero, then commit the
//! replacement content and drop the override.
//!
//! Requests arriving while a transition runs are queued and started in order.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const DEFAULT_DURATION: Duration = Duration::from_millis(400);
pub const DEFAULT_STAGGER: Duration = Duration::from_millis(80);

/// Timing knobs for one container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionConfig {
    pub duration: Duration,
    /// Delay added per item index before that item reaches full visibility.
    pub stagger: Duration,
    pub enabled: bool,
}

impl TransitionConfig {
    pub fn animated(&self) -> bool {
        self.enabled && !self.duration.is_zero()
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self { duration: DEFAULT_DURATION, stagger: DEFAULT_STAGGER, enabled: true }
    }
}

/// Externally visible state of a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionPhase {
    Idle,
    Collapsing,
    Expanding,
    /// New content committed, height still pinned to the old value.
    Settled,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TransitionRequest<C> {
    /// Shrink to zero, then show `C` (usually empty content).
    Collapse(C),
    /// Swap to `C` and grow or shrink to its natural height.
    Reveal(C),
    /// Like `Reveal`, but the first `kept` items are already on screen and do not replay
    /// their entrance; only the rest stagger in.
    Append { next: C, kept: usize },
}

#[derive(Debug)]
enum Stage<C> {
    Idle,
    Collapsing { from: f32, started: Instant, next: C },
    Capturing { from: f32, next: C, kept: usize },
    Pinned { from: f32 },
    Resizing { from: f32, to: f32, started: Instant },
}

#[derive(Debug)]
pub struct TransitionSequencer<C> {
    config: TransitionConfig,
    content: C,
    stage: Stage<C>,
    queue: VecDeque<TransitionRequest<C>>,
    height_override: Option<f32>,
    revealed_at: Option<Instant>,
    /// Index of the first item that entered with the last reveal.
    first_new: usize,
    exiting_since: Option<Instant>,
}

impl<C> TransitionSequencer<C> {
    pub fn new(content: C, config: TransitionConfig) -> Self {
        Self {
            config,
            content,
            stage: Stage::Idle,
            queue: VecDeque::new(),
            height_override: None,
            revealed_at: None,
            first_new: 0,
            exiting_since: None,
        }
    }

    pub fn config(&self) -> TransitionConfig {
        self.config
    }

    /// Content currently committed for rendering.
    pub fn content(&self) -> &C {
        &self.content
    }

    /// In-place tweaks to the committed content that do not warrant a transition.
    pub fn content_mut(&mut self) -> &mut C {
        &mut self.content
    }

    pub fn phase(&self) -> TransitionPhase {
        match self.stage {
            Stage::Idle => TransitionPhase::Idle,
            Stage::Collapsing { .. } => TransitionPhase::Collapsing,
            Stage::Capturing { .. } | Stage::Resizing { .. } => TransitionPhase::Expanding,
            Stage::Pinned { .. } => TransitionPhase::Settled,
        }
    }

    /// No transition running and none queued.
    pub fn is_idle(&self) -> bool {
        matches!(self.stage, Stage::Idle) && self.queue.is_empty()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn height_override(&self) -> Option<f32> {
        self.height_override
    }

    pub fn is_exiting(&self) -> bool {
        self.exiting_since.is_some()
    }

    pub fn request(&mut self, request: TransitionRequest<C>) {
        self.queue.push_back(request);
    }

    /// Rows the container should occupy this frame.
    pub fn visible_height(&self, natural: u16) -> u16 {
        match self.height_override {
            Some(h) => h.round().clamp(0.0, f32::from(u16::MAX)) as u16,
            None => natural,
        }
    }

    /// Opacity-like factor in `[0, 1]` for the item at `index`.
    pub fn item_visibility(&self, index: usize, now: Instant) -> f32 {
        if !self.config.animated() {
            return 1.0;
        }
        if let Some(since) = self.exiting_since {
            let delay = self.stagger_delay(index);
            return 1.0 - progress(since + delay, now, self.config.duration);
        }
        match self.revealed_at {
            Some(at) if index >= self.first_new => {
                let delay = self.stagger_delay(index - self.first_new);
                progress(at + delay, now, self.config.duration)
            }
            _ => 1.0,
        }
    }

    /// Whether anything still moves: a running/queued transition or a pending item stagger.
    pub fn is_animating(&self, now: Instant, item_count: usize) -> bool {
        if !self.is_idle() {
            return true;
        }
        match self.revealed_at {
            Some(at) if self.config.animated() => {
                let last_new = item_count.saturating_sub(1).saturating_sub(self.first_new);
                let tail = self.stagger_delay(last_new) + self.config.duration;
                now < at + tail
            }
            _ => false,
        }
    }

    /// Step the state machine by one frame. Returns `true` while a transition is in flight.
    pub fn advance<F>(&mut self, now: Instant, measure: F) -> bool
    where
        F: Fn(&C) -> u16,
    {
        loop {
            match std::mem::replace(&mut self.stage, Stage::Idle) {
                Stage::Idle => {
                    let Some(request) = self.queue.pop_front() else {
                        return false;
                    };
                    let from = self
                        .height_override
                        .unwrap_or_else(|| f32::from(measure(&self.content)));
                    if !self.config.animated() {
                        self.commit_immediately(request);
                        continue;
                    }
                    self.height_override = Some(from);
                    self.stage = match request {
                        TransitionRequest::Collapse(next) => {
                            self.exiting_since = Some(now);
                            Stage::Collapsing { from, started: now, next }
                        }
                        TransitionRequest::Reveal(next) => Stage::Capturing { from, next, kept: 0 },
                        TransitionRequest::Append { next, kept } => {
                            Stage::Capturing { from, next, kept }
                        }
                    };
                    return true;
                }
                Stage::Collapsing { from, started, next } => {
                    let p = progress(started, now, self.config.duration);
                    if p >= 1.0 {
                        self.content = next;
                        self.height_override = None;
                        self.exiting_since = None;
                        self.revealed_at = None;
                        self.first_new = 0;
                        continue;
                    }
                    self.height_override = Some(lerp(from, 0.0, standard_ease(p)));
                    self.stage = Stage::Collapsing { from, started, next };
                    return true;
                }
                Stage::Capturing { from, next, kept } => {
                    self.content = next;
                    self.exiting_since = None;
                    self.revealed_at = Some(now);
                    self.first_new = kept;
                    self.height_override = Some(from);
                    self.stage = Stage::Pinned { from };
                    return true;
                }
                Stage::Pinned { from } => {
                    let to = f32::from(measure(&self.content));
                    self.stage = Stage::Resizing { from, to, started: now };
                    return true;
                }
                Stage::Resizing { from, to, started } => {
                    let p = progress(started, now, self.config.duration);
                    if p >= 1.0 {
                        self.height_override = None;
                        continue;
                    }
                    self.height_override = Some(lerp(from, to, standard_ease(p)));
                    self.stage = Stage::Resizing { from, to, started };
                    return true;
                }
            }
        }
    }

    fn commit_immediately(&mut self, request: TransitionRequest<C>) {
        let (TransitionRequest::Collapse(next)
        | TransitionRequest::Reveal(next)
        | TransitionRequest::Append { next, .. }) = request;
        self.content = next;
        self.height_override = None;
        self.exiting_since = None;
        self.revealed_at = None;
        self.first_new = 0;
    }

    fn stagger_delay(&self, index: usize) -> Duration {
        self.config.stagger.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
    }
}

/// Fraction of `duration` elapsed since `start`, clamped to `[0, 1]`.
pub fn progress(start: Instant, now: Instant, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start).as_secs_f32();
    (elapsed / duration.as_secs_f32()).clamp(0.0, 1.0)
}

pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// `cubic-bezier(0.4, 0, 0.2, 1)`: fast start, long soft landing.
pub fn standard_ease(t: f32) -> f32 {
    cubic_bezier(0.4, 0.0, 0.2, 1.0, t)
}

/// CSS-style cubic bezier timing function with endpoints fixed at (0,0) and (1,1).
pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let curve = |a: f32, b: f32, s: f32| {
        let u = 1.0 - s;
        3.0 * u * u * s * a + 3.0 * u * s * s * b + s * s * s
    };
    let slope = |s: f32| {
        let u = 1.0 - s;
        3.0 * u * u * x1 + 6.0 * u * s * (x2 - x1) + 3.0 * s * s * (1.0 - x2)
    };

    // Newton first, bisection if it wanders off.
    let mut s = t;
    for _ in 0..8 {
        let err = curve(x1, x2, s) - t;
        if err.abs() < 1e-6 {
            break;
        }
        let d = slope(s);
        if d.abs() < 1e-6 {
            break;
        }
        s = (s - err / d).clamp(0.0, 1.0);
    }
    if (curve(x1, x2, s) - t).abs() > 1e-4 {
        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        s = t;
        for _ in 0..40 {
            let x = curve(x1, x2, s);
            if (x - t).abs() < 1e-6 {
                break;
            }
            if x < t {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
        }
    }
    curve(y1, y2, s)
}
