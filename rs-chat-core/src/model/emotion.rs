/// Synthetic mood attached to the model.
///
/// Each emotion carries a fixed boost factor applied when an already
/// known transition is observed again. A model starts `Calm`; nothing in
/// the interactive flow changes it, so by default the factor acts as a
/// constant multiplier. The setter on the model exists for hosts that
/// want a different one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Emotion {
	#[default]
	Calm,
	Happy,
	Sad,
	Angry,
	Curious,
}

impl Emotion {
	/// Weight-boost factor in `(0, 1]` for repeated transitions.
	pub fn weight(self) -> f64 {
		match self {
			Emotion::Calm => 0.3,
			Emotion::Happy => 0.6,
			Emotion::Sad => 0.4,
			Emotion::Angry => 0.2,
			Emotion::Curious => 0.8,
		}
	}
}
