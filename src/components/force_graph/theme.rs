//! Visual theming for the force graph.
//!
//! Colours for the canvas background, edges and node fills, plus the
//! highlight colours used for selection and hover direction.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red.
	pub r: u8,
	/// Green.
	pub g: u8,
	/// Blue.
	pub b: u8,
	/// Opacity, 0.0 to 1.0.
	pub a: f64,
}

impl Color {
	/// Opaque colour.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Colour with explicit opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same colour at opacity `a`.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// CSS notation: `#rrggbb` when opaque, `rgba()` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parses `#RRGGBB` and `rgb()`/`rgba()` notation; anything else is grey.
	pub fn parse(css: &str) -> Self {
		if let Some(hex) = css.strip_prefix('#').filter(|h| h.len() == 6) {
			let channel = |i: usize| {
				hex.get(i..i + 2)
					.and_then(|c| u8::from_str_radix(c, 16).ok())
					.unwrap_or(128)
			};
			return Color::rgb(channel(0), channel(2), channel(4));
		}
		if css.starts_with("rgb") {
			let nums: Vec<&str> = css
				.trim_start_matches("rgba(")
				.trim_start_matches("rgb(")
				.trim_end_matches(')')
				.split(',')
				.map(str::trim)
				.collect();
			let channel = |i: usize| nums.get(i).and_then(|s| s.parse().ok()).unwrap_or(128);
			let a = nums.get(3).and_then(|s| s.parse().ok()).unwrap_or(1.0);
			return Color::rgba(channel(0), channel(1), channel(2), a);
		}
		Color::rgb(128, 128, 128)
	}
}

/// Fallback colours for node types without a fixed colour.
#[derive(Clone, Debug)]
pub struct NodePalette {
	/// Colours cycled through by [`NodePalette::for_key`].
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// Muted slate blues and teals (default)
	pub fn slate() -> Self {
		Self {
			colors: vec![
				Color::rgb(94, 129, 172),
				Color::rgb(129, 161, 193),
				Color::rgb(100, 148, 160),
				Color::rgb(136, 160, 175),
				Color::rgb(108, 142, 173),
				Color::rgb(119, 158, 165),
			],
		}
	}

	/// Warm earth tones
	pub fn earth() -> Self {
		Self {
			colors: vec![
				Color::rgb(180, 136, 100),
				Color::rgb(160, 125, 100),
				Color::rgb(170, 145, 115),
				Color::rgb(145, 120, 95),
				Color::rgb(175, 150, 120),
				Color::rgb(155, 130, 105),
			],
		}
	}

	/// Cool teals and purples
	pub fn aurora() -> Self {
		Self {
			colors: vec![
				Color::rgb(100, 145, 135),
				Color::rgb(115, 135, 155),
				Color::rgb(130, 120, 150),
				Color::rgb(105, 140, 145),
				Color::rgb(120, 130, 160),
				Color::rgb(125, 145, 140),
			],
		}
	}

	/// Stable colour for a type name, so a type keeps its colour across queries.
	pub fn for_key(&self, key: &str) -> Color {
		let hash = key
			.bytes()
			.fold(0usize, |h, b| h.wrapping_mul(31).wrapping_add(b as usize));
		self.colors
			.get(hash % self.colors.len().max(1))
			.copied()
			.unwrap_or(Color::rgb(128, 128, 128))
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Canvas fill, or the outer gradient colour.
	pub color: Color,
	/// Centre colour of the radial gradient
	pub color_secondary: Color,
	/// Draw a radial gradient instead of a flat fill.
	pub use_gradient: bool,
	/// Vignette intensity (0.0 = none, 1.0 = strong)
	pub vignette: f64,
}

/// Edge visual style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Line colour of unrelated edges.
	pub color: Color,
	/// Edges leading into the hovered node
	pub incoming: Color,
	/// Edges leaving the hovered node
	pub outgoing: Color,
	/// Relationship type text.
	pub label: Color,
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Shade node circles with a radial gradient.
	pub use_gradient: bool,
	/// Fill for nodes without a `type`
	pub untyped: Color,
	/// Ring and label colour of the selected node
	pub selected: Color,
	/// Backdrop behind node labels.
	pub label_background: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Name accepted by [`Theme::by_name`].
	pub name: &'static str,
	/// Canvas background.
	pub background: BackgroundStyle,
	/// Relationship lines.
	pub edge: EdgeStyle,
	/// Node circles and labels.
	pub node: NodeStyle,
	/// Fills for types without a fixed colour.
	pub palette: NodePalette,
}

impl Theme {
	/// Every built-in theme name.
	pub const NAMES: [&'static str; 3] = ["default", "midnight", "ember"];

	/// Theme with the given name, or the default one.
	pub fn by_name(name: &str) -> Self {
		match name {
			"midnight" => Self::midnight(),
			"ember" => Self::ember(),
			_ => Self::default_theme(),
		}
	}

	/// Dark blue-black canvas (default)
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			background: BackgroundStyle {
				color: Color::rgb(0, 0, 26),
				color_secondary: Color::rgb(14, 18, 40),
				use_gradient: true,
				vignette: 0.15,
			},
			edge: Self::edge_style(Color::rgba(102, 99, 98, 0.8)),
			node: Self::node_style(true),
			palette: NodePalette::slate(),
		}
	}

	/// Slate canvas with teal and purple nodes
	pub fn midnight() -> Self {
		Self {
			name: "midnight",
			background: BackgroundStyle {
				color: Color::rgb(18, 20, 28),
				color_secondary: Color::rgb(25, 28, 38),
				use_gradient: true,
				vignette: 0.2,
			},
			edge: Self::edge_style(Color::rgba(100, 120, 150, 0.6)),
			node: Self::node_style(true),
			palette: NodePalette::aurora(),
		}
	}

	/// Flat warm canvas with earth-tone nodes
	pub fn ember() -> Self {
		Self {
			name: "ember",
			background: BackgroundStyle {
				color: Color::rgb(28, 24, 22),
				color_secondary: Color::rgb(28, 24, 22),
				use_gradient: false,
				vignette: 0.0,
			},
			edge: Self::edge_style(Color::rgba(160, 130, 110, 0.6)),
			node: Self::node_style(false),
			palette: NodePalette::earth(),
		}
	}

	fn edge_style(color: Color) -> EdgeStyle {
		EdgeStyle {
			color,
			incoming: Color::rgb(252, 106, 3),
			outgoing: Color::rgb(160, 250, 130),
			label: Color::rgba(255, 255, 255, 0.8),
		}
	}

	fn node_style(use_gradient: bool) -> NodeStyle {
		NodeStyle {
			use_gradient,
			untyped: Color::rgb(92, 99, 112),
			selected: Color::rgb(255, 127, 0),
			label_background: Color::rgba(0, 0, 26, 0.7),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}
