//! Map style table.
//!
//! Rules use the conventional map-style JSON shape so the table can be
//! handed to any styled-map consumer unchanged:
//! `{"featureType":"water","elementType":"geometry","stylers":[{"color":"#c9d6df"}]}`.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
    #[serde(rename = "all")]
    All,
    #[serde(rename = "administrative")]
    Administrative,
    #[serde(rename = "landscape")]
    Landscape,
    #[serde(rename = "poi")]
    Poi,
    #[serde(rename = "road")]
    Road,
    #[serde(rename = "road.highway")]
    RoadHighway,
    #[serde(rename = "road.arterial")]
    RoadArterial,
    #[serde(rename = "road.local")]
    RoadLocal,
    #[serde(rename = "transit")]
    Transit,
    #[serde(rename = "water")]
    Water,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementType {
    #[serde(rename = "all")]
    All,
    #[serde(rename = "geometry")]
    Geometry,
    #[serde(rename = "geometry.fill")]
    GeometryFill,
    #[serde(rename = "geometry.stroke")]
    GeometryStroke,
    #[serde(rename = "labels")]
    Labels,
    #[serde(rename = "labels.icon")]
    LabelsIcon,
    #[serde(rename = "labels.text.fill")]
    LabelsTextFill,
    #[serde(rename = "labels.text.stroke")]
    LabelsTextStroke,
}

impl ElementType {
    /// Whole-feature element types; fill and stroke adjustments are too narrow
    /// to approximate on a whole tile.
    fn covers_geometry(self) -> bool {
        matches!(self, ElementType::All | ElementType::Geometry)
    }

    /// Element types that set the feature's fill color.
    fn paints_fill(self) -> bool {
        self.covers_geometry() || self == ElementType::GeometryFill
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    On,
    Off,
    Simplified,
}

/// A single visual override. Saturation and lightness range over -100..=100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Styler {
    Color(String),
    Hue(String),
    Saturation(i32),
    Lightness(i32),
    Gamma(f64),
    Weight(f64),
    Visibility(Visibility),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRule {
    pub feature_type: FeatureType,
    pub element_type: ElementType,
    pub stylers: Vec<Styler>,
}

fn rule(feature_type: FeatureType, element_type: ElementType, stylers: Vec<Styler>) -> StyleRule {
    StyleRule {
        feature_type,
        element_type,
        stylers,
    }
}

/// The project map's muted greyscale theme.
pub fn default_styles() -> Vec<StyleRule> {
    use ElementType as E;
    use FeatureType as F;

    vec![
        rule(F::All, E::Geometry, vec![Styler::Saturation(-100), Styler::Lightness(5)]),
        rule(F::All, E::LabelsIcon, vec![Styler::Visibility(Visibility::Off)]),
        rule(F::All, E::LabelsTextFill, vec![Styler::Color("#616161".into())]),
        rule(F::All, E::LabelsTextStroke, vec![Styler::Color("#f5f5f5".into())]),
        rule(F::Administrative, E::Geometry, vec![Styler::Visibility(Visibility::Simplified)]),
        rule(
            F::Landscape,
            E::Geometry,
            vec![Styler::Color("#f5f5f5".into()), Styler::Lightness(20)],
        ),
        rule(F::Poi, E::All, vec![Styler::Visibility(Visibility::Off)]),
        rule(F::Road, E::Geometry, vec![Styler::Color("#ffffff".into())]),
        rule(
            F::RoadHighway,
            E::Geometry,
            vec![Styler::Color("#dadada".into()), Styler::Weight(0.8)],
        ),
        rule(F::RoadLocal, E::Labels, vec![Styler::Visibility(Visibility::Off)]),
        rule(F::Transit, E::All, vec![Styler::Visibility(Visibility::Off)]),
        rule(F::Water, E::Geometry, vec![Styler::Color("#c9d6df".into())]),
    ]
}

/// CSS `filter` approximating the land-wide adjustments of `rules` on raster tiles.
///
/// Only `all`/`landscape` rules on `all` or `geometry` elements contribute. The last
/// saturation, lightness and gamma win. Hue rotation is not applied.
pub fn tile_filter(rules: &[StyleRule]) -> String {
    let mut saturation = None;
    let mut lightness = None;
    let mut gamma = None;

    for r in rules {
        if !matches!(r.feature_type, FeatureType::All | FeatureType::Landscape)
            || !r.element_type.covers_geometry()
        {
            continue;
        }
        for styler in &r.stylers {
            match styler {
                Styler::Saturation(s) => saturation = Some(*s),
                Styler::Lightness(l) => lightness = Some(*l),
                Styler::Gamma(g) => gamma = Some(*g),
                _ => {}
            }
        }
    }

    let mut parts = Vec::new();
    if let Some(s) = saturation {
        let s = s.clamp(-100, 100);
        parts.push(format!("saturate({})", (100 + s) as f64 / 100.0));
    }
    if let Some(l) = lightness {
        let l = l.clamp(-100, 100);
        parts.push(format!("brightness({})", 1.0 + l as f64 / 100.0));
    }
    if let Some(g) = gamma {
        parts.push(format!("contrast({})", g));
    }
    parts.join(" ")
}

/// Color of the last water rule that paints the fill (`all`, `geometry` or `geometry.fill`).
pub fn water_color(rules: &[StyleRule]) -> Option<&str> {
    rules
        .iter()
        .filter(|r| r.feature_type == FeatureType::Water && r.element_type.paints_fill())
        .flat_map(|r| r.stylers.iter())
        .filter_map(|s| match s {
            Styler::Color(c) => Some(c.as_str()),
            _ => None,
        })
        .last()
}
