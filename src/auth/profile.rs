//! User profile returned by `auth/read_current_user` and the goal arithmetic derived from it.

// self
use crate::_prelude::*;

/// Daily intake assumed to keep weight stable, in kcal.
pub const MAINTENANCE_CALORIES: f64 = 2500.0;
/// Lowest daily goal ever suggested, in kcal.
pub const MINIMUM_DAILY_CALORIES: f64 = 1200.0;

/// Profile of the signed-in user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
	/// Account username.
	pub username: String,
	/// Height in centimetres.
	pub height: u32,
	/// Current weight in kilograms.
	pub weight: f64,
	/// Target weight in kilograms.
	pub target_weight: f64,
	/// Days allotted to reach the target.
	pub time_frame: u32,
}
impl UserProfile {
	/// Body-mass index, or `None` when the height is zero.
	pub fn bmi(&self) -> Option<f64> {
		if self.height == 0 {
			return None;
		}

		let meters = f64::from(self.height) / 100.0;

		Some(self.weight / (meters * meters))
	}

	/// BMI rounded to two decimals for display.
	pub fn bmi_display(&self) -> Option<String> {
		self.bmi().map(|bmi| format!("{bmi:.2}"))
	}

	/// Suggested daily intake for reaching the target weight, never below the floor.
	pub fn daily_calorie_goal(&self) -> f64 {
		let deficit = match self.time_frame {
			0 => 0.0,
			days => (self.weight - self.target_weight) / f64::from(days),
		};

		(MAINTENANCE_CALORIES - deficit).max(MINIMUM_DAILY_CALORIES)
	}
}
