//! Analyze a simulated 2x2 crossover study, or a CSV given as the first argument

use bioeq::prelude::*;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let data = match std::env::args().nth(1) {
        Some(path) => read_csv(path)?,
        None => simulate::crossover_2x2(&SimulationConfig::default())?,
    };
    let study = Crossover2x2::new(data, ColumnMapping::default())?;

    for row in study.summarize_pk_parameters()? {
        println!(
            "{:<6} {:<10} n={:<3} mean={:>9.3} sd={:>8.3} cv={:>6.2}%",
            row.parameter, row.formulation, row.n, row.mean, row.sd, row.cv_pct
        );
    }

    for metric in [Metric::LogAuc, Metric::LogCmax] {
        let anova = study.run_anova(metric)?;
        println!("\n{}", anova.formula);
        for row in &anova.anova_table {
            println!(
                "  {:<16} df={:<4} SS={:>10.5} F={:>8} p={:>8}",
                row.term,
                row.df,
                row.sum_sq,
                row.f_value.map_or("".to_string(), |f| format!("{f:.3}")),
                row.p_value.map_or("".to_string(), |p| format!("{p:.4}")),
            );
        }

        let pe = study.calculate_point_estimate(metric)?.estimate;
        println!(
            "  T/R = {:.2}% ({:.0}% CI {:.2} - {:.2}), bioequivalent: {}",
            pe.point_estimate, pe.confidence_level, pe.lower_90ci, pe.upper_90ci, pe.be_criteria_met
        );
    }

    let model = study.run_nlme(Metric::LogAuc)?;
    println!("\n{}", serde_json::to_string_pretty(&model.to_value()?)?);

    Ok(())
}
