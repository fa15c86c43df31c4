//! Display classification of free-text tooth status labels.

/// Display category of a tooth status.
///
/// The status vocabulary is open, so anything unrecognised falls into [`ToothStatusCategory::Other`]
/// carrying the raw label.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ToothStatusCategory {
    Normal,
    Decay,
    Missing,
    Other(String),
}

impl ToothStatusCategory {
    /// Label shown next to the tooth. `Other` shows the raw status text.
    pub fn label(&self) -> &str {
        match self {
            ToothStatusCategory::Normal => "Normal",
            ToothStatusCategory::Decay => "Decay",
            ToothStatusCategory::Missing => "Missing",
            ToothStatusCategory::Other(raw) => raw,
        }
    }

    /// Hex colour used to paint the tooth.
    pub fn color(&self) -> &'static str {
        match self {
            ToothStatusCategory::Normal => "#52c41a",
            ToothStatusCategory::Decay => "#ff4d4f",
            ToothStatusCategory::Missing => "#8c8c8c",
            ToothStatusCategory::Other(_) => "#faad14",
        }
    }

    /// Single-character marker for text renderings of the chart.
    pub fn symbol(&self) -> &'static str {
        match self {
            ToothStatusCategory::Normal => "✓",
            ToothStatusCategory::Decay => "●",
            ToothStatusCategory::Missing => "✗",
            ToothStatusCategory::Other(_) => "?",
        }
    }
}

impl std::fmt::Display for ToothStatusCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a free-text status to its display category.
///
/// Checks run in order: exact `normal`, then substrings `cavity`/`caries`, then `missing`.
/// Matching is case-sensitive.
pub fn classify(status: &str) -> ToothStatusCategory {
    if status == "normal" {
        ToothStatusCategory::Normal
    } else if status.contains("cavity") || status.contains("caries") {
        ToothStatusCategory::Decay
    } else if status.contains("missing") {
        ToothStatusCategory::Missing
    } else {
        ToothStatusCategory::Other(status.to_owned())
    }
}
