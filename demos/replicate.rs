//! Reference-scaled bioequivalence on a simulated full replicate study

use bioeq::prelude::*;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = SimulationConfig::default()
        .with_subjects(36)
        .with_variability(0.25, 0.45, 0.1);

    let partial = ReplicateCrossover::new(
        simulate::partial_replicate(&config)?,
        ColumnMapping::default(),
        "partial",
    )?;
    let cv = partial.calculate_within_subject_cv(Metric::LogCmax)?;
    println!(
        "partial replicate: CVwr({}) = {:.1}% on {} df",
        cv.parameter, cv.cv.within_subject_cv, cv.cv.df
    );

    let full = ReplicateCrossover::new(
        simulate::full_replicate(&config)?,
        ColumnMapping::default(),
        "full",
    )?;
    for metric in [Metric::LogAuc, Metric::LogCmax] {
        let result = full.run_rsabe(metric)?;
        println!(
            "{}: swr={:.3} PE={:.2}% [{:.2}, {:.2}] scaled={} bound={:.4} limits=({:.2}, {:.2}) BE={}",
            result.parameter,
            result.swr,
            result.point_estimate,
            result.lower_90ci,
            result.upper_90ci,
            result.scaled,
            result.upper_bound,
            result.limits.0,
            result.limits.1,
            result.be_conclusion,
        );
    }

    Ok(())
}
