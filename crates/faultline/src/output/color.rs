//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Healthy/Low:     green  (healthy status, scores below 0.4)
//!   - Warning/Medium:  yellow (warning and degraded status, scores below 0.7)
//!   - Critical/High:   red    (critical status, scores from 0.7)
//!   - Reference:       cyan   (component ids)
//!   - Muted:           dimmed (field labels, unknown and maintenance status)
//!   - Emphasis:        bold   (section headers)

use crate::domain::ComponentStatus;
use colored::Colorize;

use super::OutputConfig;

/// Score at or above which a result is shown as high impact.
pub const HIGH_SCORE: f64 = 0.7;

/// Score at or above which a result is shown as medium impact.
pub const MEDIUM_SCORE: f64 = 0.4;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Apply color to status text.
pub(crate) fn colorize_status(status: ComponentStatus, config: &OutputConfig) -> String {
    let text = status.to_string();
    if !config.use_colors {
        return text;
    }
    match status {
        ComponentStatus::Healthy => text.green().to_string(),
        ComponentStatus::Degraded | ComponentStatus::Warning => text.yellow().to_string(),
        ComponentStatus::Critical => text.red().bold().to_string(),
        ComponentStatus::Unknown | ComponentStatus::Maintenance => text.dimmed().to_string(),
    }
}

/// Status icon, with ASCII fallback.
pub(crate) fn colored_status_icon(status: ComponentStatus, config: &OutputConfig) -> String {
    let icon = if config.use_ascii {
        match status {
            ComponentStatus::Healthy => "+",
            ComponentStatus::Degraded | ComponentStatus::Warning => "!",
            ComponentStatus::Critical => "x",
            ComponentStatus::Unknown => "?",
            ComponentStatus::Maintenance => "-",
        }
    } else {
        match status {
            ComponentStatus::Healthy => "●",
            ComponentStatus::Degraded | ComponentStatus::Warning => "▲",
            ComponentStatus::Critical => "✗",
            ComponentStatus::Unknown => "?",
            ComponentStatus::Maintenance => "◌",
        }
    };

    if !config.use_colors {
        return icon.to_string();
    }

    match status {
        ComponentStatus::Healthy => icon.green().to_string(),
        ComponentStatus::Degraded | ComponentStatus::Warning => icon.yellow().to_string(),
        ComponentStatus::Critical => icon.red().to_string(),
        ComponentStatus::Unknown | ComponentStatus::Maintenance => icon.dimmed().to_string(),
    }
}

/// Format an impact score with two decimals, colored by band.
pub(crate) fn colorize_score(score: f64, config: &OutputConfig) -> String {
    let text = format!("{score:.2}");
    if !config.use_colors {
        return text;
    }
    if score >= HIGH_SCORE {
        text.red().bold().to_string()
    } else if score >= MEDIUM_SCORE {
        text.yellow().to_string()
    } else {
        text.green().to_string()
    }
}

/// Colorize a component ID (cyan).
pub(crate) fn colorize_id(id: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return id.to_string();
    }
    id.cyan().to_string()
}

/// Apply dimmed style to text (for field labels).
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Apply bold style to text (for section headers).
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}
