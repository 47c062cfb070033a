use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};

/// Stable handle to a node inside one loaded [`Graph`](super::Graph).
///
/// The generation tag changes on every reload, so a handle kept from a
/// previous graph resolves to nothing instead of aliasing a new node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
	index: u32,
	generation: u32,
}

impl NodeId {
	pub(crate) fn new(index: usize, generation: u32) -> Self {
		Self {
			index: index as u32,
			generation,
		}
	}

	/// Position of the node in the graph's node list.
	pub fn index(self) -> usize {
		self.index as usize
	}

	/// Load generation this handle belongs to.
	pub fn generation(self) -> u32 {
		self.generation
	}
}

/// 2-D vector used for positions, velocities and forces.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
	/// Horizontal component.
	pub x: f32,
	/// Vertical component.
	pub y: f32,
}

impl Vec2 {
	/// The zero vector.
	pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

	/// Create a vector from its components.
	pub const fn new(x: f32, y: f32) -> Self {
		Self { x, y }
	}

	/// Squared Euclidean length.
	pub fn length_sq(self) -> f32 {
		self.x * self.x + self.y * self.y
	}

	/// Euclidean length.
	pub fn length(self) -> f32 {
		self.length_sq().sqrt()
	}
}

impl Add for Vec2 {
	type Output = Vec2;
	fn add(self, rhs: Vec2) -> Vec2 {
		Vec2::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl Sub for Vec2 {
	type Output = Vec2;
	fn sub(self, rhs: Vec2) -> Vec2 {
		Vec2::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl Mul<f32> for Vec2 {
	type Output = Vec2;
	fn mul(self, rhs: f32) -> Vec2 {
		Vec2::new(self.x * rhs, self.y * rhs)
	}
}

impl AddAssign for Vec2 {
	fn add_assign(&mut self, rhs: Vec2) {
		self.x += rhs.x;
		self.y += rhs.y;
	}
}

impl SubAssign for Vec2 {
	fn sub_assign(&mut self, rhs: Vec2) {
		self.x -= rhs.x;
		self.y -= rhs.y;
	}
}

impl MulAssign<f32> for Vec2 {
	fn mul_assign(&mut self, rhs: f32) {
		self.x *= rhs;
		self.y *= rhs;
	}
}

/// Severity tag attached to an extracted fact.
///
/// Ordered from least to most severe so `max` picks the worst one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
	/// Missing or unrecognised tag.
	#[default]
	Unrated,
	/// `"low"`
	Low,
	/// `"medium"`
	Medium,
	/// `"high"`
	High,
}

impl Severity {
	/// Parse a tag. Matching is exact and case-sensitive; anything else is
	/// [`Severity::Unrated`].
	pub fn from_tag(tag: &str) -> Self {
		match tag {
			"high" => Severity::High,
			"medium" => Severity::Medium,
			"low" => Severity::Low,
			_ => Severity::Unrated,
		}
	}

	/// Edge weight derived from this severity.
	pub fn weight(self) -> f32 {
		match self {
			Severity::High => 0.8,
			Severity::Medium => 0.4,
			Severity::Low => 0.1,
			Severity::Unrated => 0.0,
		}
	}
}

impl fmt::Display for Severity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Severity::High => "high",
			Severity::Medium => "medium",
			Severity::Low => "low",
			Severity::Unrated => "unrated",
		})
	}
}

/// One extracted `(subject, predicate, object, severity)` fact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Triple {
	/// Subject entity text.
	pub subject: String,
	/// Relation label; may be empty.
	pub predicate: String,
	/// Object entity text.
	pub object: String,
	/// Parsed severity tag.
	pub severity: Severity,
}

impl Triple {
	/// Build a triple from raw text, parsing the severity tag.
	pub fn new(
		subject: impl Into<String>,
		predicate: impl Into<String>,
		object: impl Into<String>,
		severity: &str,
	) -> Self {
		Self {
			subject: subject.into(),
			predicate: predicate.into(),
			object: object.into(),
			severity: Severity::from_tag(severity),
		}
	}
}
