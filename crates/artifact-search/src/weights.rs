//! Per-field query boosts.
//!
//! Weights are applied when a query is parsed, never baked into the index,
//! so changing them takes effect for every record on the next open.

use tantivy::schema::Field;
use tantivy::Score;

use artifact_types::FieldWeightSettings;

use crate::schema::ArtifactSchema;

/// Boosts applied to each searchable field.
#[derive(Debug, Clone)]
pub struct FieldWeights {
    settings: FieldWeightSettings,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self::new(FieldWeightSettings::default())
    }
}

impl FieldWeights {
    pub fn new(settings: FieldWeightSettings) -> Self {
        Self { settings }
    }

    /// Query fields and their boosts.
    ///
    /// A field weighted zero is not searched at all.
    pub fn boosts(&self, schema: &ArtifactSchema) -> Vec<(Field, Score)> {
        let w = &self.settings;
        [
            (schema.title, w.title),
            (schema.overview, w.overview),
            (schema.approach, w.approach),
            (schema.goal, w.goal),
            (schema.session_name, w.session_name),
            (schema.state_now, w.state_now),
            (schema.key_decisions, w.key_decisions),
            (schema.files, w.files),
        ]
        .into_iter()
        .filter(|(_, boost)| *boost > 0.0)
        .collect()
    }
}
