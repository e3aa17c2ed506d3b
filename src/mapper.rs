//! Render attributes per hit module
//!
//! Turns each module's hits into the two visual channels of the display:
//! sphere radius from total charge, color from average arrival time.

use crate::config::{EventViewConfig, ZeroChargePolicy};
use crate::error::{EventViewError, Result};
use crate::hit::{Hit, HitLog, ModuleKey};
use crate::palette::Color;
use crate::window::TimeWindow;
use serde::Serialize;
use tracing::{debug, warn};

/// Derived display attributes of one module
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleRenderAttributes {
    pub key: ModuleKey,
    pub total_charge: f64,
    pub average_time: f64,
    pub hit_count: usize,
    pub radius: f64,
    pub color: Color,
}

/// Sum of hit charges
pub fn total_charge(hits: &[Hit]) -> f64 {
    hits.iter().map(|h| h.charge).sum()
}

/// Mean hit time, 0 for an empty slice
pub fn average_time(hits: &[Hit]) -> f64 {
    if hits.is_empty() {
        return 0.0;
    }
    hits.iter().map(|h| h.time).sum::<f64>() / hits.len() as f64
}

/// `base_radius + (charge / max_charge) * radius_span`
pub fn radius_for_charge(charge: f64, max_charge: f64, config: &EventViewConfig) -> f64 {
    config.base_radius + (charge / max_charge) * config.radius_span
}

/// Largest module total charge in the event, `None` if the log is empty
pub fn max_total_charge(log: &HitLog) -> Option<f64> {
    log.iter()
        .map(|(_, hits)| total_charge(hits))
        .reduce(f64::max)
}

/// One attribute record per module in `log`, ordered by module key
pub fn map_attributes(
    log: &HitLog,
    window: &TimeWindow,
    config: &EventViewConfig,
) -> Result<Vec<ModuleRenderAttributes>> {
    let Some(max_charge) = max_total_charge(log) else {
        return Ok(Vec::new());
    };
    debug!("Maximum total charge in any module: {:.2}", max_charge);

    let scale_by_charge = if max_charge > 0.0 {
        true
    } else {
        match config.zero_charge_policy {
            ZeroChargePolicy::Fail => {
                return Err(EventViewError::DegenerateCharge { max_charge });
            }
            ZeroChargePolicy::MinimumRadius => {
                warn!(
                    max_charge,
                    "No module has positive charge, using base radius for all modules"
                );
                false
            }
        }
    };

    let attributes = log
        .iter()
        .map(|(key, hits)| {
            let total_charge = total_charge(hits);
            let average_time = average_time(hits);
            let radius = if scale_by_charge {
                radius_for_charge(total_charge, max_charge, config)
            } else {
                config.base_radius
            };
            let color = config.palette.color_for_time(average_time, window);
            debug!(
                "Module {}: Qtot: {:.2}, tave: {:.2}, r: {:.2}, color: {}",
                key, total_charge, average_time, radius, color
            );

            ModuleRenderAttributes {
                key: *key,
                total_charge,
                average_time,
                hit_count: hits.len(),
                radius,
                color,
            }
        })
        .collect();

    Ok(attributes)
}
