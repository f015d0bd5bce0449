//! Layout text flip: a static lead-in followed by a word that cycles on a
//! fixed timer.
//!
//! Each word occupies one interval. The first `fade` of the interval fades
//! the word in, the last `fade` fades it out, and the timer then advances to
//! the next word. The timer is started once on mount; replacing the word
//! list later keeps the current timing.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::WidgetError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TextFlipProps {
    /// Static text rendered before the flipping word.
    pub text: String,
    pub words: Vec<String>,
    pub interval_ms: u64,
    /// Length of each of the fade-in and fade-out phases.
    pub fade_ms: u64,
}

impl Default for TextFlipProps {
    fn default() -> Self {
        Self {
            text: "Build Amazing".to_owned(),
            words: vec!["Landing Pages".to_owned(), "Component Blocks".to_owned()],
            interval_ms: 3000,
            fade_ms: 500,
        }
    }
}

impl TextFlipProps {
    /// # Errors
    ///
    /// Returns [`WidgetError`] if there are no words, the interval is zero,
    /// or the two fades do not fit inside one interval.
    pub fn validate(&self) -> Result<(), WidgetError> {
        if self.words.is_empty() {
            return Err(WidgetError::Empty { prop: "words" });
        }
        if self.interval_ms == 0 {
            return Err(WidgetError::invalid("interval_ms", "must be greater than 0"));
        }
        if self.fade_ms.saturating_mul(2) > self.interval_ms {
            return Err(WidgetError::invalid(
                "fade_ms",
                format!(
                    "two fades of {}ms do not fit in an interval of {}ms",
                    self.fade_ms, self.interval_ms
                ),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipPhase {
    FadingIn,
    Showing,
    FadingOut,
    Unmounted,
}

#[derive(Debug)]
pub struct TextFlip {
    text: String,
    words: Vec<String>,
    index: usize,
    interval: Duration,
    fade: Duration,
    /// Time spent on the current word.
    elapsed: Duration,
    mounted: bool,
}

impl TextFlip {
    /// Mount the widget; the timer starts now.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError`] if the props are invalid.
    pub fn mount(props: TextFlipProps) -> Result<Self, WidgetError> {
        props.validate()?;
        Ok(Self {
            text: props.text,
            words: props.words,
            index: 0,
            interval: Duration::from_millis(props.interval_ms),
            fade: Duration::from_millis(props.fade_ms),
            elapsed: Duration::ZERO,
            mounted: true,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn current_word(&self) -> &str {
        &self.words[self.index]
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Advance the timer. Returns `true` if the displayed word changed.
    ///
    /// A long gap (for example a throttled background tab) may skip several
    /// words at once; the phase within the current interval is preserved.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if !self.mounted {
            return false;
        }
        let total = self.elapsed.saturating_add(dt);
        let interval = self.interval.as_nanos();
        let ticks = total.as_nanos() / interval;
        if ticks == 0 {
            self.elapsed = total;
            return false;
        }
        let remainder = total.as_nanos() % interval;
        self.elapsed = Duration::from_nanos(u64::try_from(remainder).unwrap_or(0));
        let len = self.words.len();
        let step = usize::try_from(ticks % len as u128).unwrap_or(0);
        let before = self.index;
        self.index = (self.index + step) % len;
        if self.index != before {
            debug!(index = self.index, "text flip advanced");
        }
        self.index != before
    }

    /// Replace the word list without restarting the timer.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Empty`] if `words` is empty; the widget keeps
    /// its previous words.
    pub fn set_words(&mut self, words: Vec<String>) -> Result<(), WidgetError> {
        if words.is_empty() {
            return Err(WidgetError::Empty { prop: "words" });
        }
        self.index %= words.len();
        self.words = words;
        Ok(())
    }

    #[must_use]
    pub fn phase(&self) -> FlipPhase {
        if !self.mounted {
            FlipPhase::Unmounted
        } else if self.elapsed < self.fade {
            FlipPhase::FadingIn
        } else if self.elapsed >= self.interval.saturating_sub(self.fade) {
            FlipPhase::FadingOut
        } else {
            FlipPhase::Showing
        }
    }

    /// Opacity of the current word, `0..=1`.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        let fade = self.fade.as_secs_f32();
        match self.phase() {
            FlipPhase::Unmounted => 0.0,
            FlipPhase::Showing => 1.0,
            FlipPhase::FadingIn => (self.elapsed.as_secs_f32() / fade).clamp(0.0, 1.0),
            FlipPhase::FadingOut => {
                let left = self.interval.saturating_sub(self.elapsed).as_secs_f32();
                (left / fade).clamp(0.0, 1.0)
            }
        }
    }

    /// Stop the timer.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn flip(words: &[&str]) -> TextFlip {
        TextFlip::mount(TextFlipProps {
            words: words.iter().map(|w| (*w).to_owned()).collect(),
            ..TextFlipProps::default()
        })
        .unwrap()
    }

    #[test]
    fn cycles_on_the_interval() {
        let mut f = flip(&["one", "two", "three"]);
        assert_eq!(f.current_word(), "one");
        assert!(!f.advance(Duration::from_millis(2999)));
        assert!(f.advance(Duration::from_millis(1)));
        assert_eq!(f.current_word(), "two");
        f.advance(Duration::from_secs(3));
        f.advance(Duration::from_secs(3));
        assert_eq!(f.current_word(), "one");
    }

    #[test]
    fn long_gap_skips_words_and_keeps_phase() {
        let mut f = flip(&["a", "b", "c"]);
        f.advance(Duration::from_millis(6_200));
        assert_eq!(f.current_word(), "c");
        assert_eq!(f.phase(), FlipPhase::FadingIn);
    }

    #[test]
    fn cross_fade_phases() {
        let mut f = flip(&["x", "y"]);
        assert_eq!(f.phase(), FlipPhase::FadingIn);
        assert_eq!(f.opacity(), 0.0);
        f.advance(Duration::from_millis(250));
        assert!((f.opacity() - 0.5).abs() < 1e-3);
        f.advance(Duration::from_millis(1000));
        assert_eq!(f.phase(), FlipPhase::Showing);
        assert_eq!(f.opacity(), 1.0);
        f.advance(Duration::from_millis(1500));
        assert_eq!(f.phase(), FlipPhase::FadingOut);
        assert!((f.opacity() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn replacing_words_keeps_the_timer() {
        let mut f = flip(&["a", "b", "c"]);
        f.advance(Duration::from_millis(4_000));
        assert_eq!(f.current_word(), "b");
        f.set_words(vec!["p".to_owned(), "q".to_owned()]).unwrap();
        assert_eq!(f.current_word(), "q");
        assert!(f.advance(Duration::from_millis(2_000)));
        assert_eq!(f.current_word(), "p");
    }

    #[test]
    fn empty_replacement_is_rejected() {
        let mut f = flip(&["a"]);
        assert!(f.set_words(Vec::new()).is_err());
        assert_eq!(f.current_word(), "a");
    }

    #[test]
    fn single_word_never_reports_change() {
        let mut f = flip(&["solo"]);
        assert!(!f.advance(Duration::from_secs(10)));
    }

    #[test]
    fn unmount_stops_the_timer() {
        let mut f = flip(&["a", "b"]);
        f.unmount();
        assert!(!f.advance(Duration::from_secs(30)));
        assert_eq!(f.current_word(), "a");
        assert_eq!(f.phase(), FlipPhase::Unmounted);
        assert_eq!(f.opacity(), 0.0);
    }

    #[test]
    fn fades_must_fit_in_interval() {
        let props = TextFlipProps {
            interval_ms: 800,
            fade_ms: 500,
            ..TextFlipProps::default()
        };
        assert!(TextFlip::mount(props).is_err());
    }
}
