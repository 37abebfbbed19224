//! Visual theming for the network graph.
//!
//! Node and edge colours come from the monitor service; the theme only covers
//! the canvas around them and the fallbacks for records without a colour.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Centre color of the radial gradient
	pub color_secondary: Color,
	pub use_gradient: bool,
}

/// Edge visual style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Used when the service sent no colour.
	pub fallback_color: Color,
	/// Halo drawn under the selected edge.
	pub selected_color: Color,
	/// Arrowhead length in world units.
	pub arrow_size: f64,
	/// Extra pick distance around the line, in screen pixels.
	pub hit_slop: f64,
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Radius in world units.
	pub radius: f64,
	/// Used when the service sent no colour.
	pub fallback_color: Color,
	pub border_color: Color,
	pub border_width: f64,
	/// Ring drawn around the selected node.
	pub selected_ring: Color,
	/// Label colour when the node font names none.
	pub label_color: Color,
	/// Gap between the node and its label.
	pub label_offset: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: BackgroundStyle,
	pub edge: EdgeStyle,
	pub node: NodeStyle,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(30, 35, 42),
				use_gradient: true,
			},
			edge: EdgeStyle {
				fallback_color: Color::rgba(140, 160, 180, 0.7),
				selected_color: Color::rgba(255, 255, 255, 0.25),
				arrow_size: 9.0,
				hit_slop: 4.0,
			},
			node: NodeStyle {
				radius: 12.0,
				fallback_color: Color::rgb(128, 128, 128),
				border_color: Color::rgba(255, 255, 255, 0.35),
				border_width: 1.5,
				selected_ring: Color::rgba(255, 255, 255, 0.85),
				label_color: Color::rgb(255, 255, 255),
				label_offset: 6.0,
			},
		}
	}
}

/// Split a vis-style font string (`"14px arial white"`) into a canvas font and a
/// fill colour. A font without a trailing colour keeps `fallback`.
pub fn split_font(font: &str, fallback: Color) -> (String, String) {
	let parts: Vec<&str> = font.split_whitespace().collect();
	match parts.as_slice() {
		[] => ("14px sans-serif".to_string(), fallback.to_css()),
		[size] => (format!("{size} sans-serif"), fallback.to_css()),
		[size, face] => (format!("{size} {face}"), fallback.to_css()),
		[rest @ .., color] => (rest.join(" "), (*color).to_string()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn colors_render_as_css() {
		assert_eq!(Color::rgb(22, 27, 34).to_css(), "#161b22");
		assert_eq!(Color::rgb(255, 0, 0).with_alpha(0.5).to_css(), "rgba(255, 0, 0, 0.5)");
	}

	#[test]
	fn font_strings_split_into_font_and_color() {
		let white = Color::rgb(255, 255, 255);
		assert_eq!(
			split_font("14px arial white", white),
			("14px arial".to_string(), "white".to_string())
		);
		assert_eq!(
			split_font("bold 12px arial red", white),
			("bold 12px arial".to_string(), "red".to_string())
		);
		assert_eq!(split_font("16px", white), ("16px sans-serif".to_string(), "#ffffff".to_string()));
		assert_eq!(split_font("", white).0, "14px sans-serif");
	}
}
