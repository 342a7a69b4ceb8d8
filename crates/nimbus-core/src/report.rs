/// Plain-text rainfall report writers.

use std::io::{self, Write};

use crate::aggregate::Likelihood;
use crate::config::ReportStyle;
use crate::pipeline::Analysis;

const RULE_WIDTH: usize = 70;

fn heavy_rule(w: &mut impl Write) -> io::Result<()> {
    writeln!(w, "{}", "=".repeat(RULE_WIDTH))
}

fn light_rule(w: &mut impl Write) -> io::Result<()> {
    writeln!(w, "{}", "-".repeat(RULE_WIDTH))
}

/// Write the report for `analysis` in the given style.
pub fn write_report(w: &mut impl Write, analysis: &Analysis, style: ReportStyle) -> io::Result<()> {
    match style {
        ReportStyle::Table => write_table(w, analysis),
        ReportStyle::Detailed => write_detailed(w, analysis),
    }
}

/// Region names grouped by likelihood, ranked order within each group.
/// Labels with no regions are omitted.
pub fn summary_groups(analysis: &Analysis) -> Vec<(Likelihood, Vec<&str>)> {
    Likelihood::ALL
        .iter()
        .filter_map(|&l| {
            let names: Vec<&str> = analysis.by_likelihood(l).map(|r| r.name.as_str()).collect();
            (!names.is_empty()).then_some((l, names))
        })
        .collect()
}

fn write_group(w: &mut impl Write, heading: &str, names: &[&str]) -> io::Result<()> {
    writeln!(w)?;
    writeln!(w, "{heading}")?;
    for name in names {
        writeln!(w, "  - {name}")?;
    }
    Ok(())
}

// ── Table ─────────────────────────────────────────────────────────────────────

fn write_table(w: &mut impl Write, analysis: &Analysis) -> io::Result<()> {
    heavy_rule(w)?;
    writeln!(w, "RAINFALL PROBABILITY ANALYSIS - Thermal IR Image")?;
    heavy_rule(w)?;
    writeln!(w)?;

    writeln!(w, "{:<45} {:>8} {:>8} {:>12}", "Region", "Dense%", "Medium%", "Likelihood")?;
    light_rule(w)?;
    for r in &analysis.regions {
        writeln!(
            w,
            "{:<45} {:>7.1}% {:>7.1}% {:>12}",
            r.name,
            r.dense_pct(),
            r.medium_pct(),
            r.likelihood
        )?;
    }

    writeln!(w)?;
    heavy_rule(w)?;
    writeln!(w, "SUMMARY - Areas with Rainfall Potential:")?;
    heavy_rule(w)?;

    for (likelihood, names) in summary_groups(analysis) {
        match likelihood {
            Likelihood::High => write_group(w, "HIGH PROBABILITY:", &names)?,
            Likelihood::Moderate => write_group(w, "MODERATE PROBABILITY:", &names)?,
            Likelihood::Low | Likelihood::Unlikely => {}
        }
    }
    Ok(())
}

// ── Detailed ──────────────────────────────────────────────────────────────────

fn write_detailed(w: &mut impl Write, analysis: &Analysis) -> io::Result<()> {
    let t = &analysis.thresholds;
    let sym = analysis.edge.symbol();
    let scene = &analysis.scene;

    heavy_rule(w)?;
    writeln!(w, "SATELLITE IMAGE RAINFALL ANALYSIS REPORT")?;
    writeln!(w, "Thermal Infrared Brightness Classification")?;
    heavy_rule(w)?;

    writeln!(w)?;
    writeln!(w, "OVERALL CLOUD STATISTICS:")?;
    let dense_label = format!("Dense cloud cover ({sym}{} brightness):", t.dense);
    let medium_label = format!("Medium cloud cover ({}-{}):", t.medium, t.dense);
    writeln!(w, "  {dense_label:<37}{:.1}%", scene.percentages.dense)?;
    writeln!(w, "  {medium_label:<37}{:.1}%", scene.percentages.medium)?;
    writeln!(w, "  {:<37}{:.1}", "Mean brightness:", scene.mean_brightness)?;

    writeln!(w)?;
    light_rule(w)?;
    writeln!(w, "REGIONAL RAINFALL ANALYSIS:")?;
    light_rule(w)?;

    for r in &analysis.regions {
        writeln!(w)?;
        writeln!(w, "{}", r.name)?;
        if let Some(desc) = &r.description {
            writeln!(w, "  Areas: {desc}")?;
        }
        writeln!(
            w,
            "  Dense clouds: {:.1}% | Medium clouds: {:.1}%",
            r.dense_pct(),
            r.medium_pct()
        )?;
        writeln!(w, "  >>> RAINFALL LIKELIHOOD: {}", r.likelihood)?;
    }

    writeln!(w)?;
    heavy_rule(w)?;
    writeln!(w, "SUMMARY:")?;
    heavy_rule(w)?;

    for (likelihood, names) in summary_groups(analysis) {
        match likelihood {
            Likelihood::High => write_group(w, "HIGH probability of rain in:", &names)?,
            Likelihood::Moderate => write_group(w, "MODERATE probability of rain in:", &names)?,
            Likelihood::Unlikely => write_group(w, "Likely to remain DRY:", &names)?,
            Likelihood::Low => {}
        }
    }
    Ok(())
}
