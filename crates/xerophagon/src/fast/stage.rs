//! Named physiological stages of a fast, keyed by elapsed hours.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FastingStage {
    /// Elapsed whole hours at which this stage begins.
    pub hours: u32,
    pub name: &'static str,
    pub description: &'static str,
}

pub const STAGES: &[FastingStage] = &[
    FastingStage {
        hours: 0,
        name: "Blood sugar is rising",
        description: "The body is digesting and absorbing nutrients. Blood sugar and insulin levels are elevated",
    },
    FastingStage {
        hours: 4,
        name: "Blood sugar drops",
        description: "Blood sugar and insulin levels begin to drop, and the body starts to use stored glycogen for energy",
    },
    FastingStage {
        hours: 8,
        name: "Fat burning phase",
        description: "Glycogen stores are depleted and the body begins to shift towards using fat for energy",
    },
    FastingStage {
        hours: 12,
        name: "Ketosis phase",
        description: "The body enters ketosis, where fat stores are converted into ketones, providing an alternative energy source",
    },
    FastingStage {
        hours: 18,
        name: "Higher ketosis phase",
        description: "Higher ketone levels signal the body to ramp up stress busting pathways to reduce inflammation and repair DNA damage",
    },
    FastingStage {
        hours: 24,
        name: "Autophagy phase",
        description: "The body relies heavily on ketones for energy. Cellular repair and detoxification processes are at their peak",
    },
    FastingStage {
        hours: 36,
        name: "Enhanced autophagy phase",
        description: "Body begins to recycle damaged cells and misfolded proteins",
    },
    FastingStage {
        hours: 48,
        name: "Growth hormone peak phase",
        description: "Growth hormones reach the highest level (500%)",
    },
    FastingStage {
        hours: 54,
        name: "Low insulin level phase",
        description: "Insulin levels drop to the lowest point. The body becomes more insulin sensitive",
    },
    FastingStage {
        hours: 72,
        name: "Immune cell reformation phase",
        description: "Breakdown of old immune cells and generation of new ones",
    },
    FastingStage {
        hours: 96,
        name: "Metabolic shift phase",
        description: "The body transitions to full ketosis, utilizing fatty acids and ketone bodies as primary energy sources",
    },
    FastingStage {
        hours: 120,
        name: "Multi-Organ response phase",
        description: "Significant changes in protein levels across multiple organs, indicating systemic adaptation to prolonged fasting",
    },
    FastingStage {
        hours: 144,
        name: "Protein level phase",
        description: "Systemic changes are occurring in protein levels, indicating widespread physiological adaptations",
    },
];

impl FastingStage {
    /// The stage reached after `elapsed_hours`.
    pub fn for_elapsed(elapsed_hours: f64) -> &'static FastingStage {
        let whole = if elapsed_hours.is_finite() && elapsed_hours > 0.0 {
            elapsed_hours.floor() as u32
        } else {
            0
        };

        STAGES
            .iter()
            .rev()
            .find(|stage| whole >= stage.hours)
            .unwrap_or(&STAGES[0])
    }

    /// CSS class used by the fasting page, e.g. `stage-12`.
    pub fn css_class(&self) -> String {
        format!("stage-{}", self.hours)
    }
}
