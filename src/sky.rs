//! All overlays of a chart, drawn back to front.

use log::debug;

use crate::catalog::{Catalog, Dataset};
use crate::config::{Layer, OverlayConfig};
use crate::ecliptic::Ecliptic;
use crate::map::{MapParams, Projector, Surface};
use crate::render::{DrawMode, DrawStats, Overlay};

/// The overlays drawn from one catalog.
pub struct SkyOverlays<'c> {
    catalog: &'c Catalog,
    ecliptic: Ecliptic,
    config: OverlayConfig,
}

impl<'c> SkyOverlays<'c> {
    /// Overlays of `catalog` in the given configuration.
    pub fn new(catalog: &'c Catalog, config: OverlayConfig) -> Self {
        Self {
            catalog,
            ecliptic: Ecliptic::new(),
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Change the configuration between draws.
    pub fn config_mut(&mut self) -> &mut OverlayConfig {
        &mut self.config
    }

    /// The overlay of one layer, enabled or not.
    pub fn overlay(&self, layer: Layer) -> Overlay<'_> {
        let style = *self.config.style(layer);
        match layer {
            Layer::MilkyWay => Overlay::new(
                self.catalog.stream(Dataset::MilkyWay),
                DrawMode::FilledSection,
                style,
            ),
            Layer::Boundaries => Overlay::new(
                self.catalog.stream(Dataset::ConstellationBoundaries),
                DrawMode::Polyline,
                style,
            ),
            Layer::Lines => Overlay::new(
                self.catalog.stream(Dataset::ConstellationLines),
                DrawMode::BrokenLine,
                style,
            ),
            Layer::Ecliptic => self.ecliptic.overlay(style),
        }
    }

    /// Draw every enabled layer in [`Layer::DRAW_ORDER`], stopping once cancelled.
    pub fn draw<P: Projector, S: Surface>(&self, params: &mut MapParams<'_, P, S>) -> DrawStats {
        let mut stats = DrawStats::default();
        for layer in Layer::DRAW_ORDER {
            if !self.config.is_enabled(layer) {
                continue;
            }
            if !params.is_drawing() {
                stats.cancelled = true;
                break;
            }
            stats.merge(self.overlay(layer).draw(params));
        }
        debug!(
            "Drew sky overlays: {} primitives from {} projections.",
            stats.primitives, stats.projected
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use nalgebra::Point2;
    use simplelog::{Config, LevelFilter, TestLogger};

    use super::*;
    use crate::display_list::{ClipRect, DisplayList, Shape};
    use crate::map::{CancelToken, Projection, RenderMode};
    use crate::projection::Stereographic;
    use crate::stream::{PointStream, RaDec, SectionLayout};

    fn init_logger() {
        let _ = TestLogger::init(LevelFilter::Debug, Config::default());
    }

    /// A small sky around Orion, seen from RA 5.5h, Dec 0°.
    fn catalog() -> Catalog {
        let bounds = PointStream::from_sections(
            [vec![
                RaDec::new(4.7, -11.),
                RaDec::new(4.7, 23.),
                RaDec::new(6.4, 23.),
                RaDec::new(6.4, -11.),
                RaDec::new(4.7, -11.),
            ]],
            SectionLayout::Plain,
        );
        let lines = PointStream::from_sections(
            [
                vec![RaDec::new(5.92, 7.4), RaDec::new(5.42, 6.35)],
                vec![RaDec::new(5.6, -1.2), RaDec::new(5.68, -1.94), RaDec::new(5.53, -0.3)],
            ],
            SectionLayout::Plain,
        );
        let milky_way = PointStream::from_sections(
            [
                vec![
                    RaDec::new(6.5, 5.),
                    RaDec::new(6., 0.),
                    RaDec::new(7., 0.),
                    RaDec::new(7., 10.),
                    RaDec::new(6., 10.),
                ],
                // Around the opposite point of the sky.
                vec![
                    RaDec::new(17.5, 0.),
                    RaDec::new(17., -5.),
                    RaDec::new(18., -5.),
                    RaDec::new(18., 5.),
                ],
            ],
            SectionLayout::Centered,
        );
        Catalog::new(HashMap::from([
            ("conbounds.bin".to_string(), bounds.to_bytes()),
            ("conlines.bin".to_string(), lines.to_bytes()),
            ("milkyway.bin".to_string(), milky_way.to_bytes()),
        ]))
    }

    fn projector() -> Stereographic {
        Stereographic::new(5.5 * std::f64::consts::PI / 12., 0., 500., Point2::new(400., 300.))
    }

    #[test]
    fn draws_back_to_front() {
        init_logger();
        let catalog = catalog();
        let sky = SkyOverlays::new(&catalog, OverlayConfig::default());
        let projector = projector();
        let mut list = DisplayList::new();
        let stats = sky.draw(&mut MapParams::new(&projector, &mut list));

        let config = sky.config();
        let colors = list.primitives().iter().map(|p| p.color).collect::<Vec<_>>();
        let first_of = |layer: Layer| colors.iter().position(|c| *c == config.style(layer).color);

        let order = Layer::DRAW_ORDER.map(first_of);
        assert!(order.iter().all(Option::is_some));
        assert!(order.windows(2).all(|w| w[0] < w[1]));

        // One Milky Way polygon, the far section is skipped.
        assert_eq!(stats.skipped_sections, 1);
        assert_eq!(list.in_color(config.milky_way.color).len(), 1);
        // One boundary polyline, three constellation segments.
        assert_eq!(list.in_color(config.boundaries.color).len(), 1);
        assert_eq!(list.in_color(config.lines.color).len(), 3);
        assert!(!stats.cancelled);
    }

    #[test]
    fn disabled_layers() {
        let catalog = catalog();
        let config = OverlayConfig::default()
            .with_milky_way(false)
            .with_boundaries(false)
            .with_ecliptic(false);
        let sky = SkyOverlays::new(&catalog, config);
        let projector = projector();
        let mut list = DisplayList::new();
        let stats = sky.draw(&mut MapParams::new(&projector, &mut list));

        assert_eq!(stats.primitives, 3);
        assert!(list.primitives().iter().all(|p| matches!(p.shape, Shape::Line(..))));
        assert!(!catalog.is_loaded(Dataset::MilkyWay));
    }

    #[test]
    fn missing_dataset_leaves_the_rest() {
        init_logger();
        let catalog = Catalog::new(HashMap::<String, Vec<u8>>::new());
        let sky = SkyOverlays::new(&catalog, OverlayConfig::default());
        let projector = projector();
        let mut list = DisplayList::new();
        let stats = sky.draw(&mut MapParams::new(&projector, &mut list));

        // Only the ecliptic remains.
        assert!(stats.primitives > 0);
        assert_eq!(list.in_color(sky.config().ecliptic.color).len(), list.len());
    }

    #[test]
    fn print_mode() {
        let catalog = catalog();
        let sky = SkyOverlays::new(&catalog, OverlayConfig::default());
        let projector = projector();
        let screen = ClipRect::new(0., 0., 800., 600.);
        let mut list = DisplayList::with_clip(screen);

        let mut params = MapParams::new(&projector, &mut list)
            .with_mode(RenderMode::Print)
            .with_secondary_clip(ClipRect::new(100., 100., 700., 500.));
        sky.draw(&mut params);
        let region = params.visible_region.take().unwrap();

        assert_eq!(region.polygons().len(), 1);
        assert_eq!(list.clip(), screen);
        assert!(list
            .primitives()
            .iter()
            .all(|p| p.clip == ClipRect::new(100., 100., 700., 500.)));
        assert!(list.in_color(sky.config().milky_way.color).is_empty());
        assert_eq!(list.in_color(sky.config().milky_way.print_color).len(), 1);
    }

    #[test]
    fn cancelled_between_layers() {
        let catalog = catalog();
        let sky = SkyOverlays::new(&catalog, OverlayConfig::default());
        let projector = projector();
        let token = CancelToken::new();
        token.cancel();
        let mut list = DisplayList::new();
        let stats = sky.draw(&mut MapParams::new(&projector, &mut list).with_cancel(token));

        assert!(stats.cancelled);
        assert_eq!(stats.projected, 0);
        assert!(list.is_empty());
    }

    #[test]
    fn single_layer() {
        let catalog = catalog();
        let sky = SkyOverlays::new(&catalog, OverlayConfig::default());
        let projector = |ra: f64, dec: f64| Projection::new(ra, dec, 0.);
        let mut list = DisplayList::new();
        sky.overlay(Layer::Boundaries)
            .draw(&mut MapParams::new(&projector, &mut list));

        match &list.primitives()[0].shape {
            Shape::Polyline(points) => assert_eq!(points.len(), 5),
            other => panic!("unexpected {other:?}"),
        }
    }
}
