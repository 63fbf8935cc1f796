//! Report output port trait.

use crate::domain::error::BreakscanError;
use crate::domain::evaluation::EvaluationReport;

/// Port for writing evaluation results.
pub trait ReportPort {
    /// One row per simulated trade across all strategies.
    fn write_trades(&self, report: &EvaluationReport, output_path: &str)
    -> Result<(), BreakscanError>;

    /// One row per strategy.
    fn write_metrics(
        &self,
        report: &EvaluationReport,
        output_path: &str,
    ) -> Result<(), BreakscanError>;

    /// One row per bar with indicator values and signal flags.
    fn write_series(&self, report: &EvaluationReport, output_path: &str)
    -> Result<(), BreakscanError>;
}
