//! Which overlays are drawn and in which style.

use crate::map::Color;
use crate::render::OverlayStyle;

/// Default visibility limit of constellation boundaries, about 91.7°.
pub const BOUNDARY_LIMIT: f64 = 1.6;
/// Default visibility limit of constellation lines, about 91.7°.
pub const LINE_LIMIT: f64 = 1.6;
/// Default visibility limit of the ecliptic, about 91.7°.
pub const ECLIPTIC_LIMIT: f64 = 1.6;
/// Default limit for the center of a Milky Way section, about 125°.
pub const MILKY_WAY_LIMIT: f64 = 2.18;

/// The overlays of a chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    /// The Milky Way patches.
    MilkyWay,
    /// Constellation boundaries.
    Boundaries,
    /// Constellation figures.
    Lines,
    /// The ecliptic.
    Ecliptic,
}

impl Layer {
    /// Back to front.
    pub const DRAW_ORDER: [Layer; 4] = [
        Layer::MilkyWay,
        Layer::Boundaries,
        Layer::Lines,
        Layer::Ecliptic,
    ];
}

/// Enable flags and styles of every overlay.
///
/// Use `with_*` functions to change the defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayConfig {
    /// Draw the Milky Way.
    pub show_milky_way: bool,
    /// Draw the constellation boundaries.
    pub show_boundaries: bool,
    /// Draw the constellation figures.
    pub show_lines: bool,
    /// Draw the ecliptic.
    pub show_ecliptic: bool,
    /// Style of the Milky Way.
    pub milky_way: OverlayStyle,
    /// Style of the constellation boundaries.
    pub boundaries: OverlayStyle,
    /// Style of the constellation figures.
    pub lines: OverlayStyle,
    /// Style of the ecliptic.
    pub ecliptic: OverlayStyle,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            show_milky_way: true,
            show_boundaries: true,
            show_lines: true,
            show_ecliptic: true,
            milky_way: OverlayStyle::new(MILKY_WAY_LIMIT, Color::rgb(32, 40, 72))
                .with_print_color(Color::rgb(224, 224, 224)),
            boundaries: OverlayStyle::new(BOUNDARY_LIMIT, Color::rgb(112, 88, 0))
                .with_print_color(Color::rgb(128, 128, 128)),
            lines: OverlayStyle::new(LINE_LIMIT, Color::rgb(0, 128, 160)),
            ecliptic: OverlayStyle::new(ECLIPTIC_LIMIT, Color::rgb(176, 48, 48))
                .with_print_color(Color::rgb(96, 96, 96)),
        }
    }
}

impl OverlayConfig {
    /// Show or hide the Milky Way.
    pub fn with_milky_way(mut self, show: bool) -> Self {
        self.show_milky_way = show;
        self
    }

    /// Show or hide the constellation boundaries.
    pub fn with_boundaries(mut self, show: bool) -> Self {
        self.show_boundaries = show;
        self
    }

    /// Show or hide the constellation lines.
    pub fn with_lines(mut self, show: bool) -> Self {
        self.show_lines = show;
        self
    }

    /// Show or hide the ecliptic.
    pub fn with_ecliptic(mut self, show: bool) -> Self {
        self.show_ecliptic = show;
        self
    }

    /// Set the style of a layer.
    pub fn with_style(mut self, layer: Layer, style: OverlayStyle) -> Self {
        *self.style_mut(layer) = style;
        self
    }

    /// Whether `layer` is drawn.
    pub fn is_enabled(&self, layer: Layer) -> bool {
        match layer {
            Layer::MilkyWay => self.show_milky_way,
            Layer::Boundaries => self.show_boundaries,
            Layer::Lines => self.show_lines,
            Layer::Ecliptic => self.show_ecliptic,
        }
    }

    /// Style of `layer`.
    pub fn style(&self, layer: Layer) -> &OverlayStyle {
        match layer {
            Layer::MilkyWay => &self.milky_way,
            Layer::Boundaries => &self.boundaries,
            Layer::Lines => &self.lines,
            Layer::Ecliptic => &self.ecliptic,
        }
    }

    /// Mutable style of `layer`.
    pub fn style_mut(&mut self, layer: Layer) -> &mut OverlayStyle {
        match layer {
            Layer::MilkyWay => &mut self.milky_way,
            Layer::Boundaries => &mut self.boundaries,
            Layer::Lines => &mut self.lines,
            Layer::Ecliptic => &mut self.ecliptic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = OverlayConfig::default();
        assert!(Layer::DRAW_ORDER.iter().all(|l| config.is_enabled(*l)));
        assert_eq!(config.style(Layer::Ecliptic).limit, ECLIPTIC_LIMIT);
        assert_eq!(config.style(Layer::MilkyWay).limit, MILKY_WAY_LIMIT);
        assert_eq!(config.style(Layer::Lines).print_color, Color::BLACK);
    }

    #[test]
    fn builders() {
        let red = OverlayStyle::new(0.5, Color::rgb(255, 0, 0));
        let config = OverlayConfig::default()
            .with_milky_way(false)
            .with_ecliptic(false)
            .with_style(Layer::Boundaries, red);

        assert!(!config.is_enabled(Layer::MilkyWay));
        assert!(!config.is_enabled(Layer::Ecliptic));
        assert!(config.is_enabled(Layer::Lines));
        assert_eq!(*config.style(Layer::Boundaries), red);

        let config = config.with_lines(false).with_boundaries(false).with_milky_way(true);
        assert!(!config.is_enabled(Layer::Lines));
        assert!(!config.is_enabled(Layer::Boundaries));
        assert!(config.is_enabled(Layer::MilkyWay));
    }
}
