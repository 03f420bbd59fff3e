//! Built-in tip rules
//!
//! Priorities are banded: critical alerts (50-60), print optimisation (40-49),
//! material and energy (30-39), live monitoring (20-29), general guidance
//! (5-19) and the maintenance reminder at 1, which always applies.

use printpass_core::{PrinterSnapshot, PrinterStatus};

use crate::template::TipTemplate;

/// Predicate deciding whether a rule applies to a snapshot
pub type Predicate = fn(&PrinterSnapshot) -> bool;

/// One prioritised piece of advice
#[derive(Debug, Clone, Copy)]
pub struct TipRule {
    pub id: &'static str,
    pub priority: i32,
    pub applies: Predicate,
    pub template: TipTemplate,
}

impl TipRule {
    pub const fn new(
        id: &'static str,
        priority: i32,
        applies: Predicate,
        template: TipTemplate,
    ) -> Self {
        Self {
            id,
            priority,
            applies,
            template,
        }
    }

    /// The rule's message, if it applies and every field it needs is present
    pub fn evaluate(&self, snapshot: &PrinterSnapshot) -> Option<String> {
        if (self.applies)(snapshot) {
            self.template.render(snapshot)
        } else {
            None
        }
    }
}

fn printing(p: &PrinterSnapshot) -> bool {
    p.is(PrinterStatus::Printing)
}

fn dash(value: Option<f64>) -> String {
    value.map_or_else(|| "--".to_string(), |v| v.to_string())
}

/// The rule table in declaration order.
pub fn builtin_rules() -> Vec<TipRule> {
    vec![
        // critical alerts
        TipRule::new(
            "PRINTER_OFFLINE",
            60,
            |p| p.is(PrinterStatus::Offline),
            TipTemplate::Text(
                "🔴 Action Required: '{friendlyName}' is offline. Check power and network connection immediately.",
            ),
        ),
        TipRule::new(
            "PRINTER_ERROR",
            55,
            |p| p.is(PrinterStatus::Error),
            TipTemplate::Text(
                "⚠️ Critical Error: '{friendlyName}' has encountered an error. Check printer display and resolve immediately.",
            ),
        ),
        // print optimisation
        TipRule::new(
            "HIGH_INFILL_OPTIMIZATION",
            48,
            |p| {
                let job = p.job();
                printing(p)
                    && job.infill_percent.unwrap_or(0.0) >= 35.0
                    && job.dimensions_z.unwrap_or(0.0) > 30.0
            },
            TipTemplate::Computed(|p| {
                let job = p.job_details?;
                Some(format!(
                    "💡 Optimization Opportunity: High infill ({}%) on tall part ({}mm height). Consider reducing to 25-30% for ~30% time/material savings while maintaining structural integrity for most applications.",
                    job.infill_percent?,
                    job.dimensions_z?
                ))
            }),
        ),
        TipRule::new(
            "EXCESSIVE_INFILL_WARNING",
            47,
            |p| {
                let job = p.job();
                printing(p) && job.infill_percent.unwrap_or(0.0) >= 50.0 && job.volume() > 50_000.0
            },
            TipTemplate::Computed(|p| {
                let job = p.job_details?;
                let volume = job.dimensions_x? * job.dimensions_y? * job.dimensions_z?;
                Some(format!(
                    "⚡ Energy Alert: Exceptionally high infill ({}%) on large part (volume ~{:.1}cm³). Unless structural requirements demand it, 20-30% infill typically suffices. Current settings may extend print time by 60-80%.",
                    job.infill_percent?,
                    volume / 1000.0
                ))
            }),
        ),
        TipRule::new(
            "LOW_INFILL_STRENGTH_WARNING",
            46,
            |p| {
                let job = p.job();
                printing(p)
                    && job.infill_percent.unwrap_or(0.0) < 15.0
                    && job.dimensions_z.unwrap_or(0.0) > 50.0
                    && p.material_in(&["PLA", "PETG"])
            },
            TipTemplate::Computed(|p| {
                let job = p.job_details?;
                Some(format!(
                    "🔧 Strength Advisory: Low infill ({}%) on {}mm tall part may compromise strength. For functional parts, 18-25% infill recommended. Current settings suitable only for decorative models.",
                    job.infill_percent?,
                    job.dimensions_z?
                ))
            }),
        ),
        TipRule::new(
            "OPTIMAL_LAYER_HEIGHT_DETECTED",
            45,
            |p| {
                let job = p.job();
                let infill = job.infill_percent.unwrap_or(0.0);
                printing(p)
                    && (job.layer_height_mm.unwrap_or(0.0) - 0.2).abs() < 1e-9
                    && (20.0..=30.0).contains(&infill)
            },
            TipTemplate::Computed(|p| {
                Some(format!(
                    "✅ Optimal Settings Detected: 0.2mm layer height with {}% infill provides excellent strength-to-speed balance. This configuration is industry-standard for functional prototypes.",
                    p.job_details?.infill_percent?
                ))
            }),
        ),
        TipRule::new(
            "FINE_LAYER_TIME_WARNING",
            44,
            |p| {
                let job = p.job();
                printing(p)
                    && job.layer_height_mm.unwrap_or(0.0) <= 0.12
                    && job.total_layers.unwrap_or(0.0) > 300.0
            },
            TipTemplate::Computed(|p| {
                let job = p.job_details?;
                Some(format!(
                    "⏱️ Time Advisory: Fine layer height ({}mm) with {} layers = extended print time. Consider 0.15-0.2mm for faster results unless surface quality is critical. Estimated time savings: 25-40%.",
                    job.layer_height_mm?,
                    job.total_layers?
                ))
            }),
        ),
        TipRule::new(
            "LARGE_PART_WARPING_RISK",
            43,
            |p| {
                printing(p)
                    && p.job().footprint() > 15_000.0
                    && p.material_in(&["ABS", "ASA", "PC"])
                    && p.bed_temp_actual.unwrap_or(0.0) < 90.0
            },
            TipTemplate::Computed(|p| {
                let material = p.current_material.as_deref()?;
                let job = p.job_details?;
                Some(format!(
                    "🌡️ Warping Risk: Large {material} print ({}×{}mm footprint) at {}°C bed temp. Consider increasing to 100-110°C and using enclosure. Corner lifting common with large {material} parts at lower temps.",
                    job.dimensions_x?,
                    job.dimensions_y?,
                    p.bed_temp_actual.unwrap_or(0.0)
                ))
            }),
        ),
        TipRule::new(
            "SMALL_PART_BATCH_SUGGESTION",
            42,
            |p| {
                let job = p.job();
                printing(p)
                    && job.dimensions_x.unwrap_or(0.0) < 40.0
                    && job.dimensions_y.unwrap_or(0.0) < 40.0
                    && job.dimensions_z.unwrap_or(0.0) < 30.0
                    && p.job_kwh_consumed.unwrap_or(0.0) < 0.05
            },
            TipTemplate::Computed(|p| {
                let job = p.job_details?;
                Some(format!(
                    "📦 Batch Efficiency: Small part ({}×{}×{}mm) using only {:.3} kWh. Batch printing 3-5 similar parts together can reduce per-part energy cost by up to 60% by amortizing heating overhead.",
                    job.dimensions_x?,
                    job.dimensions_y?,
                    job.dimensions_z?,
                    p.job_kwh_consumed.unwrap_or(0.0)
                ))
            }),
        ),
        TipRule::new(
            "DIMENSION_ACCURACY_TIP",
            41,
            |p| {
                let job = p.job();
                printing(p)
                    && job.dimensions_x.unwrap_or(0.0) < 15.0
                    && job.dimensions_y.unwrap_or(0.0) < 15.0
                    && job.layer_height_mm.unwrap_or(0.0) > 0.2
            },
            TipTemplate::Computed(|p| {
                let job = p.job_details?;
                Some(format!(
                    "🔬 Precision Tip: Very small part ({}×{}mm) with {}mm layers. For fine details on parts <20mm, consider 0.1-0.15mm layer height. Current settings suitable for rapid prototyping only.",
                    job.dimensions_x?,
                    job.dimensions_y?,
                    job.layer_height_mm?
                ))
            }),
        ),
        // material and energy
        TipRule::new(
            "MATERIAL_TEMPERATURE_OPTIMIZATION",
            38,
            |p| {
                printing(p)
                    && p.material_in(&["PETG"])
                    && p.nozzle_temp_actual.unwrap_or(0.0) > 250.0
            },
            TipTemplate::Computed(|p| {
                Some(format!(
                    "🌡️ Temperature Optimization: PETG printing at {}°C. Standard range is 230-245°C. Higher temps increase energy use and may cause stringing. Consider reducing to 240°C unless layer adhesion issues occur.",
                    p.nozzle_temp_actual.unwrap_or(0.0)
                ))
            }),
        ),
        TipRule::new(
            "PLA_ENERGY_EFFICIENT_CHOICE",
            37,
            |p| {
                printing(p)
                    && p.material_in(&["ABS", "ASA", "PC", "Nylon"])
                    && p.job().dimensions_z.unwrap_or(0.0) < 50.0
            },
            TipTemplate::Computed(|p| {
                let material = p.current_material.as_deref()?;
                let nozzle = p.nozzle_temp_actual.unwrap_or(0.0);
                Some(format!(
                    "💰 Material Choice: Printing {material} at {nozzle}°C. For non-structural parts <50mm, PLA offers 25-30% energy savings (prints at 200-210°C vs {nozzle}°C) with similar surface quality."
                ))
            }),
        ),
        TipRule::new(
            "HIGH_ENERGY_CONSUMPTION_ALERT",
            36,
            |p| {
                printing(p)
                    && p.job_kwh_consumed.unwrap_or(0.0) > 0.3
                    && p.job_progress_percent.unwrap_or(0.0) < 70.0
            },
            TipTemplate::Computed(|p| {
                let kwh = p.job_kwh_consumed.unwrap_or(0.0);
                let divisor = p.job_progress_percent.unwrap_or(1.0);
                if divisor == 0.0 {
                    return None;
                }
                Some(format!(
                    "⚡ Energy Monitor: Current job has consumed {:.2} kWh at {:.0}% completion. Projected total: {:.2} kWh. Consider print time reduction strategies for future jobs of this scale.",
                    kwh,
                    p.job_progress_percent.unwrap_or(0.0),
                    kwh / divisor * 100.0
                ))
            }),
        ),
        TipRule::new(
            "IDLE_HIGH_CONSUMPTION",
            35,
            |p| p.is(PrinterStatus::Idle) && p.kwh_last_24h.unwrap_or(0.0) > 0.8,
            TipTemplate::Computed(|p| {
                Some(format!(
                    "⚠️ Energy Waste Alert: '{}' is idle but consumed {:.2} kWh in 24h. Extended idle periods waste ~0.005-0.01 kWh/hour. Power down when not in use. Annual savings potential: ~$15-30 per printer.",
                    p.friendly_name.as_deref()?,
                    p.kwh_last_24h?
                ))
            }),
        ),
        TipRule::new(
            "EFFICIENT_MATERIAL_USAGE",
            34,
            |p| {
                let job = p.job();
                printing(p)
                    && job.infill_percent.unwrap_or(0.0) <= 20.0
                    && job.total_layers.unwrap_or(0.0) > 150.0
            },
            TipTemplate::Computed(|p| {
                let job = p.job_details?;
                Some(format!(
                    "♻️ Eco-Efficient Print: {}% infill with {} layers demonstrates excellent material efficiency. This configuration reduces waste while maintaining functionality—great for sustainable manufacturing.",
                    job.infill_percent?,
                    job.total_layers?
                ))
            }),
        ),
        // live monitoring
        TipRule::new(
            "FIRST_LAYER_CRITICAL",
            28,
            |p| {
                let progress = p.job_progress_percent.unwrap_or(0.0);
                printing(p)
                    && progress > 0.0
                    && progress < 5.0
                    && p.job().current_layer.unwrap_or(0.0) <= 3.0
            },
            TipTemplate::Computed(|p| {
                Some(format!(
                    "🎯 Critical Phase: Layer {}/3 of first layer sequence. Bed adhesion makes or breaks the print. Monitor closely for lifting corners or poor adhesion. Z-offset and bed level are key factors.",
                    p.job_details?.current_layer.unwrap_or(1.0)
                ))
            }),
        ),
        TipRule::new(
            "MID_PRINT_PROGRESS",
            25,
            |p| {
                let progress = p.job_progress_percent.unwrap_or(0.0);
                printing(p)
                    && progress > 30.0
                    && progress < 70.0
                    && p.job_time_left_seconds.unwrap_or(0.0) > 0.0
            },
            TipTemplate::Computed(|p| {
                let job = p.job();
                Some(format!(
                    "📊 Print Progress: {:.0}% complete, ~{} minutes remaining. Part dimensions: {}×{}×{}mm. Monitor for layer shifting or filament issues.",
                    p.job_progress_percent.unwrap_or(0.0),
                    (p.job_time_left_seconds.unwrap_or(0.0) / 60.0).floor(),
                    dash(job.dimensions_x),
                    dash(job.dimensions_y),
                    dash(job.dimensions_z)
                ))
            }),
        ),
        TipRule::new(
            "NEAR_COMPLETION_PREP",
            24,
            |p| printing(p) && p.job_progress_percent.unwrap_or(0.0) > 92.0,
            TipTemplate::Computed(|p| {
                Some(format!(
                    "🏁 Final Phase: {:.1}% complete—prepare for part removal. Allow bed to cool below 40°C before removing {} prints to prevent warping. Clean bed surface for next print.",
                    p.job_progress_percent.unwrap_or(0.0),
                    p.current_material.as_deref().unwrap_or("part")
                ))
            }),
        ),
        TipRule::new(
            "HEATING_PHASE_INFO",
            22,
            |p| p.is(PrinterStatus::Heating),
            TipTemplate::Computed(|p| {
                Some(format!(
                    "🔥 Pre-heating: '{}' warming up for {} (Target: Nozzle {}°C, Bed {}°C). Proper pre-heat ensures consistent first layer quality and reduces print failures.",
                    p.friendly_name.as_deref()?,
                    p.current_material.as_deref().unwrap_or("unknown"),
                    dash(p.nozzle_temp_target),
                    dash(p.bed_temp_target)
                ))
            }),
        ),
        TipRule::new(
            "COOLING_POST_PRINT",
            21,
            |p| p.is(PrinterStatus::Cooling),
            TipTemplate::Text(
                "❄️ Post-Print Cooling: Print complete. Allow bed to cool below 40°C before part removal to prevent thermal stress warping. Clean nozzle tip while still warm for easier maintenance.",
            ),
        ),
        // general guidance
        TipRule::new(
            "IDLE_READY_ADVANCED",
            15,
            |p| p.is(PrinterStatus::Idle) && p.last_job_kwh.unwrap_or(0.0) > 0.0,
            TipTemplate::Computed(|p| {
                Some(format!(
                    "✅ Ready for Next Job: '{}' completed last print using {:.3} kWh in {} min. Printer ready. Consider similar settings: {:.1}g material used.",
                    p.friendly_name.as_deref()?,
                    p.last_job_kwh.unwrap_or(0.0),
                    dash(p.last_job_duration_minutes),
                    p.last_job_filament_grams.unwrap_or(0.0)
                ))
            }),
        ),
        TipRule::new(
            "GENERAL_PRINTING_SMART",
            12,
            |p| printing(p) && p.job_filename.as_deref().is_some_and(|f| !f.is_empty()),
            TipTemplate::Computed(|p| {
                Some(format!(
                    "🖨️ Active Print: '{}' in progress on {} printer. Material: {}. Current energy: {:.3} kWh.",
                    p.job_filename.as_deref()?,
                    p.printer_size_category.as_deref().unwrap_or("standard"),
                    p.current_material.as_deref().unwrap_or("N/A"),
                    p.job_kwh_consumed.unwrap_or(0.0)
                ))
            }),
        ),
        TipRule::new(
            "DEFAULT_IDLE",
            5,
            |p| p.is(PrinterStatus::Idle),
            TipTemplate::Text(
                "🟢 Idle & Ready: Printer available for your next project. For optimal results: check bed levelness, clean build surface, verify filament loaded and dry.",
            ),
        ),
        TipRule::new(
            "DEFAULT_OPERATIONAL",
            1,
            |_| true,
            TipTemplate::Text(
                "🔧 Maintenance Reminder: Regular printer calibration, nozzle cleaning, and belt tensioning ensure consistent print quality and extend printer lifespan. Schedule monthly maintenance checks.",
            ),
        ),
    ]
}
