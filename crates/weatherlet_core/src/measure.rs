use desklet_logging::desklet_debug;

use crate::entities::decode_entities;
use crate::{DeskletConfig, MeasureConfig, Pattern};

pub const FOOTER_LABEL: &str = "Last Update:";

/// Result of running one measure against fetched text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeasureValue {
    Separator,
    Matched(String),
    NoMatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measure {
    pub config: MeasureConfig,
    pattern: Option<Pattern>,
}

impl Measure {
    fn from_config(config: &MeasureConfig) -> Self {
        // Separators never extract, so their pattern is not compiled at all.
        let pattern = if config.is_separator {
            None
        } else {
            Pattern::compile_opt(config.pattern())
        };
        Self {
            config: config.clone(),
            pattern,
        }
    }

    fn evaluate(&self, text: &str) -> MeasureValue {
        if self.config.is_separator {
            return MeasureValue::Separator;
        }
        extract_decoded(self.pattern.as_ref(), text)
    }
}

/// Ordered measures in display order. Rebuilt as a whole on every
/// configuration change; never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MeasureSet {
    measures: Vec<Measure>,
}

impl MeasureSet {
    pub fn from_configs(configs: &[MeasureConfig]) -> Self {
        Self {
            measures: configs.iter().map(Measure::from_config).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.measures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Measure> {
        self.measures.iter()
    }
}

/// The single "Last Update:" slot below the measures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterConfig {
    pub label: &'static str,
    pattern: Pattern,
}

impl FooterConfig {
    /// `None` when no last-update pattern is configured; the footer row is
    /// then not shown at all.
    pub fn from_pattern(source: Option<&str>) -> Option<Self> {
        Pattern::compile_opt(source).map(|pattern| Self {
            label: FOOTER_LABEL,
            pattern,
        })
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }
}

/// Deterministic mapping from (configuration, fetched text) to display values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MeasurementModel {
    measures: MeasureSet,
    footer: Option<FooterConfig>,
    offline: Option<Pattern>,
}

impl MeasurementModel {
    pub fn from_config(config: &DeskletConfig) -> Self {
        let model = Self {
            measures: MeasureSet::from_configs(&config.measures),
            footer: FooterConfig::from_pattern(config.last_update_pattern.as_deref()),
            offline: Pattern::compile_opt(config.offline_pattern.as_deref()),
        };
        desklet_debug!(
            "Built measurement model: {} measures, footer={}, offline pattern={}",
            model.measures.len(),
            model.footer.is_some(),
            model.offline.is_some()
        );
        model
    }

    pub fn measures(&self) -> &MeasureSet {
        &self.measures
    }

    pub fn footer(&self) -> Option<&FooterConfig> {
        self.footer.as_ref()
    }

    /// Whether the page reports the station as unavailable.
    pub fn is_offline(&self, text: &str) -> bool {
        self.offline.as_ref().is_some_and(|p| p.is_match(text))
    }

    /// One value per configured measure, in display order.
    pub fn build_display_values(&self, text: &str) -> Vec<MeasureValue> {
        self.measures.iter().map(|m| m.evaluate(text)).collect()
    }

    pub fn footer_value(&self, text: &str) -> Option<MeasureValue> {
        self.footer
            .as_ref()
            .map(|footer| extract_decoded(Some(&footer.pattern), text))
    }
}

fn extract_decoded(pattern: Option<&Pattern>, text: &str) -> MeasureValue {
    match pattern.and_then(|p| p.first_group(text)) {
        Some(raw) => MeasureValue::Matched(decode_entities(raw).into_owned()),
        None => MeasureValue::NoMatch,
    }
}
